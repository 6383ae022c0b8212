//! Domain records persisted in PostgreSQL.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A role grouping users; `admin` grants cross-user visibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    pub id: Uuid,
    pub name: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub enabled: bool,
}

impl Role {
    pub const ADMIN: &'static str = "admin";

    pub fn is_admin(&self) -> bool {
        self.name == Self::ADMIN
    }
}

/// A registered account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    /// Stored credential hash. Blanked before the record is serialized into
    /// a response.
    #[serde(default)]
    pub password: String,
    pub email: String,
    pub role_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub enabled: bool,
}

impl User {
    /// Replace the stored credential with the hash of `password`.
    pub fn set_password(&mut self, password: &str) {
        self.password = crate::db::hash::hash(password);
    }
}

/// Fields for inserting a user. `password` must already be hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub email: String,
    pub role_id: Uuid,
    pub enabled: bool,
}

/// Fields for inserting a role.
#[derive(Debug, Clone)]
pub struct NewRole {
    pub name: String,
    pub enabled: bool,
}

/// A lambda definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lambda {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub dockerfile: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub enabled: bool,
    pub created_by: Uuid,
    /// Creator, populated by the listing join.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

/// Fields for inserting a lambda.
#[derive(Debug, Clone)]
pub struct NewLambda {
    pub name: String,
    pub description: String,
    pub dockerfile: String,
    pub enabled: bool,
    pub created_by: Uuid,
}

/// One recorded run of a lambda.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LambdaExecution {
    pub id: Uuid,
    pub lambda_id: Uuid,
    pub status: String,
    pub result: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub enabled: bool,
}

/// Fields for inserting a lambda execution.
#[derive(Debug, Clone)]
pub struct NewLambdaExecution {
    pub lambda_id: Uuid,
    pub status: String,
    pub result: Option<String>,
    pub enabled: bool,
}
