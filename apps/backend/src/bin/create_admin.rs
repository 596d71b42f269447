//! Create an admin account, or promote an existing account to admin.
//!
//! Admins cannot sign up through the API, so this is the only way in.

use clap::Parser;
use db_infra::db::{DbKind, RuntimeEnv};
use food_backend::auth::password::hash_password;
use food_backend::error::AppError;
use food_backend::infra::state::build_state;
use food_backend::repos::users;
use food_backend::services::auth::{normalize_email, validate_password};
use food_backend::telemetry;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "create-admin")]
#[command(about = "Create or promote a platform administrator")]
struct Args {
    #[arg(long)]
    email: String,

    #[arg(long)]
    password: String,

    #[arg(long)]
    first_name: Option<String>,

    #[arg(long)]
    last_name: Option<String>,
}

async fn run(args: Args) -> Result<(), AppError> {
    let email = normalize_email(&args.email)?;
    validate_password(&args.password)?;
    let password_hash = hash_password(&args.password)?;

    let state = build_state()
        .with_env(RuntimeEnv::Prod)
        .with_db(DbKind::Postgres)
        .build()
        .await?;
    let db = food_backend::db::require_db(&state)?;

    let (user, created) =
        users::upsert_admin(db, &email, password_hash, args.first_name, args.last_name).await?;
    if created {
        info!(user_id = user.id, "admin created");
    } else {
        info!(user_id = user.id, "existing account promoted to admin");
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    telemetry::init_tracing();

    if let Err(e) = run(Args::parse()).await {
        error!(error = %e, "create-admin failed");
        std::process::exit(1);
    }
}
