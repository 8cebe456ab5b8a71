//! Seed the initial admin account
//!
//! Run once against a migrated database:
//! `cargo run --bin seed`

use anyhow::Result;
use postline_backend::auth::PasswordService;
use postline_backend::repositories::UserRepository;
use postline_backend::{config, db};
use tracing::info;

const ADMIN_NAME: &str = "Admin";
const ADMIN_EMAIL: &str = "admin@yopmail.com";
const ADMIN_PHONE: &str = "9999999999";
const ADMIN_PASSWORD: &str = "Admin@123";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let config = config::AppConfig::load()?;
    let pool = db::create_pool(&config.database.url, 2).await?;
    db::run_migrations(&pool).await?;

    if UserRepository::email_exists(&pool, ADMIN_EMAIL).await? {
        info!(email = ADMIN_EMAIL, "admin account already exists");
        return Ok(());
    }

    let password_hash = PasswordService::hash_async(ADMIN_PASSWORD.to_string()).await?;
    let admin = UserRepository::create(&pool, ADMIN_NAME, ADMIN_EMAIL, ADMIN_PHONE, &password_hash)
        .await?;

    sqlx::query("UPDATE users SET role = 'ADMIN' WHERE id = $1")
        .bind(admin.id)
        .execute(&pool)
        .await?;

    info!(email = ADMIN_EMAIL, "admin account created");
    Ok(())
}
