//! Persistence subsystem.
//!
//! # Data Flow
//! ```text
//! controllers
//!     → users.rs / roles.rs / lambdas.rs / executions.rs (SQL operations)
//!     → pool.rs (deadpool-postgres connection checkout)
//!     → PostgreSQL
//!
//! Writes run inside explicit transactions; an error before commit rolls
//! the transaction back when the guard drops.
//! ```
//!
//! # Design Decisions
//! - Plain async functions per resource, mirroring the table layout
//! - Explicit column lists everywhere (joins alias to avoid collisions)
//! - Credential hashes never leave this module unverified (hash.rs)

pub mod executions;
pub mod hash;
pub mod lambdas;
pub mod pool;
pub mod roles;
pub mod types;
pub mod users;

pub use pool::{Db, DbError};
pub use types::{Lambda, LambdaExecution, NewLambda, NewLambdaExecution, NewRole, NewUser, Role, User};
