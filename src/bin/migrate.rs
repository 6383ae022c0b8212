//! Schema migration runner.
//!
//! Migrations are embedded in the binary, ordered by name, and tracked in a
//! `migrations` bookkeeping table so each one runs at most once. Each
//! migration applies inside a single transaction; the first failure aborts
//! the run.

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;

use clap::{Parser, Subcommand};
use tokio_postgres::{NoTls, Transaction};
use uuid::Uuid;

use lambda_host::config::{load_config, DatabaseConfig};
use lambda_host::db::hash;

type StepResult<'a> =
    Pin<Box<dyn Future<Output = Result<(), tokio_postgres::Error>> + Send + 'a>>;

struct Migration {
    name: &'static str,
    up: for<'a> fn(&'a Transaction<'a>) -> StepResult<'a>,
    down: for<'a> fn(&'a Transaction<'a>) -> StepResult<'a>,
}

const MIGRATIONS: &[Migration] = &[Migration {
    name: "0001_initial",
    up: initial_up,
    down: initial_down,
}];

// matches the admin role id seeded by 0001_initial_up.sql
const ADMIN_ROLE_ID: Uuid = Uuid::from_u128(1);

fn initial_up<'a>(tx: &'a Transaction<'a>) -> StepResult<'a> {
    Box::pin(async move {
        tx.batch_execute(include_str!("../../migrations/0001_initial_up.sql"))
            .await?;

        // the default admin credential is hashed at migration time, so it
        // cannot live in the static SQL
        let role_id = ADMIN_ROLE_ID;
        let password = hash::hash("password");
        tx.execute(
            "INSERT INTO users (username, email, password, role_id) VALUES ($1, $2, $3, $4)",
            &[&"admin", &"admin@localhost.com", &password, &role_id],
        )
        .await?;
        Ok(())
    })
}

fn initial_down<'a>(tx: &'a Transaction<'a>) -> StepResult<'a> {
    Box::pin(async move {
        tx.batch_execute(include_str!("../../migrations/0001_initial_down.sql"))
            .await
    })
}

#[derive(Parser)]
#[command(name = "migrate")]
#[command(about = "Schema migration runner for lambda-host", long_about = None)]
struct Cli {
    /// Optional TOML config file; DB_* environment variables still win.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply every pending migration (the default).
    Run,
    /// Show which migrations have run.
    Status,
    /// Roll one migration back by name.
    Rollback { name: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    let mut client = connect(&config.database).await?;
    ensure_migrations_table(&client).await?;

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_pending(&mut client).await?,
        Commands::Status => print_status(&client).await?,
        Commands::Rollback { name } => rollback(&mut client, &name).await?,
    }

    Ok(())
}

async fn connect(
    config: &DatabaseConfig,
) -> Result<tokio_postgres::Client, tokio_postgres::Error> {
    let mut pg = tokio_postgres::Config::new();
    pg.user(&config.user)
        .password(&config.password)
        .dbname(&config.dbname)
        .host(&config.host)
        .port(config.port);

    let (client, connection) = pg.connect(NoTls).await?;
    tokio::spawn(async move {
        if let Err(err) = connection.await {
            eprintln!("connection error: {}", err);
        }
    });
    Ok(client)
}

async fn ensure_migrations_table(
    client: &tokio_postgres::Client,
) -> Result<(), tokio_postgres::Error> {
    let exists: bool = client
        .query_one(
            "SELECT EXISTS ( \
                 SELECT 1 FROM information_schema.tables WHERE table_name = 'migrations' \
             )",
            &[],
        )
        .await?
        .get(0);

    if exists {
        println!("migrations table exists");
        return Ok(());
    }

    client
        .batch_execute(
            "CREATE TABLE migrations ( \
                 id SERIAL PRIMARY KEY, \
                 name VARCHAR(255) NOT NULL, \
                 created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP \
             )",
        )
        .await
}

async fn ran_migrations(
    client: &tokio_postgres::Client,
) -> Result<Vec<String>, tokio_postgres::Error> {
    let rows = client.query("SELECT name FROM migrations", &[]).await?;
    Ok(rows.iter().map(|row| row.get(0)).collect())
}

async fn run_pending(
    client: &mut tokio_postgres::Client,
) -> Result<(), Box<dyn std::error::Error>> {
    let ran = ran_migrations(client).await?;

    for migration in MIGRATIONS {
        if ran.iter().any(|name| name == migration.name) {
            continue;
        }

        println!("running {}", migration.name);
        let tx = client.transaction().await?;
        (migration.up)(&tx).await?;
        tx.execute(
            "INSERT INTO migrations (name) VALUES ($1)",
            &[&migration.name],
        )
        .await?;
        tx.commit().await?;
    }

    println!("migrations complete");
    Ok(())
}

async fn print_status(
    client: &tokio_postgres::Client,
) -> Result<(), Box<dyn std::error::Error>> {
    let ran = ran_migrations(client).await?;
    for migration in MIGRATIONS {
        let state = if ran.iter().any(|name| name == migration.name) {
            "ran"
        } else {
            "pending"
        };
        println!("{:40} {}", migration.name, state);
    }
    Ok(())
}

async fn rollback(
    client: &mut tokio_postgres::Client,
    name: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let Some(migration) = MIGRATIONS.iter().find(|m| m.name == name) else {
        return Err(format!("unknown migration: {}", name).into());
    };

    let ran = ran_migrations(client).await?;
    if !ran.iter().any(|n| n == name) {
        return Err(format!("migration {} has not run", name).into());
    }

    println!("rolling back {}", name);
    let tx = client.transaction().await?;
    (migration.down)(&tx).await?;
    tx.execute("DELETE FROM migrations WHERE name = $1", &[&name])
        .await?;
    tx.commit().await?;
    Ok(())
}
