//! Operational CLI: create the first admin, seed default permissions, and
//! generate demo data for local development.

use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use fake::Fake;
use fake::faker::address::en::{CityName, ZipCode};
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::{FirstName, LastName};
use sqlx::PgPool;

use propdesk::modules::role_permissions::service::RolePermissionService;
use propdesk::utils::password::hash_password;

#[derive(Parser)]
#[command(name = "propdesk-cli", about = "Propdesk administration tasks")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create an admin user (idempotent on email)
    CreateAdmin {
        first_name: String,
        last_name: String,
        email: String,
        password: String,
    },
    /// Seed read-only default permissions for every (role, resource) pair
    SeedPermissions,
    /// Insert demo owners, clients, and properties for local development
    SeedDemo {
        /// Rows per entity
        #[arg(long, default_value_t = 10)]
        count: usize,
    },
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    let cli = Cli::parse();

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to database");

    let result = match cli.command {
        Command::CreateAdmin {
            first_name,
            last_name,
            email,
            password,
        } => create_admin(&pool, &first_name, &last_name, &email, &password).await,
        Command::SeedPermissions => seed_permissions(&pool).await,
        Command::SeedDemo { count } => seed_demo(&pool, count).await,
    };

    if let Err(e) = result {
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }
}

async fn create_admin(
    pool: &PgPool,
    first_name: &str,
    last_name: &str,
    email: &str,
    password: &str,
) -> Result<(), String> {
    let hashed = hash_password(password).map_err(|e| e.error.to_string())?;

    let result = sqlx::query(
        "INSERT INTO users (first_name, last_name, email, password, role)
         VALUES ($1, $2, $3, $4, 'admin')
         ON CONFLICT (email) DO NOTHING",
    )
    .bind(first_name)
    .bind(last_name)
    .bind(email.to_lowercase())
    .bind(&hashed)
    .execute(pool)
    .await
    .map_err(|e| e.to_string())?;

    if result.rows_affected() == 0 {
        return Err("A user with this email already exists".to_string());
    }

    println!("✅ Admin created: {} ({} {})", email, first_name, last_name);
    Ok(())
}

async fn seed_permissions(pool: &PgPool) -> Result<(), String> {
    let created = RolePermissionService::seed_defaults(pool)
        .await
        .map_err(|e| e.error.to_string())?;
    println!("✅ Default permissions seeded ({} created)", created);
    Ok(())
}

async fn seed_demo(pool: &PgPool, count: usize) -> Result<(), String> {
    for _ in 0..count {
        let first: String = FirstName().fake();
        let last: String = LastName().fake();
        let email: String = SafeEmail().fake();
        sqlx::query(
            "INSERT INTO owners (first_name, last_name, email, contact_number)
             VALUES ($1, $2, $3, $4) ON CONFLICT (email) DO NOTHING",
        )
        .bind(&first)
        .bind(&last)
        .bind(email.to_lowercase())
        .bind(format!("+961-{}", (1000000..9999999).fake::<u32>()))
        .execute(pool)
        .await
        .map_err(|e| e.to_string())?;
    }

    for _ in 0..count {
        let first: String = FirstName().fake();
        let last: String = LastName().fake();
        let email: String = SafeEmail().fake();
        sqlx::query(
            "INSERT INTO clients (first_name, last_name, email, contact_number)
             VALUES ($1, $2, $3, $4) ON CONFLICT (email) DO NOTHING",
        )
        .bind(&first)
        .bind(&last)
        .bind(email.to_lowercase())
        .bind(format!("+961-{}", (1000000..9999999).fake::<u32>()))
        .execute(pool)
        .await
        .map_err(|e| e.to_string())?;
    }

    let categories = ["apartment", "shop", "office", "villa", "house"];
    for i in 0..count {
        let city: String = CityName().fake();
        let zip: String = ZipCode().fake();
        sqlx::query(
            "INSERT INTO properties \
             (reference_id, title, category, listing_type, city, zip_code, size_value, rent_amount) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) ON CONFLICT (reference_id) DO NOTHING",
        )
        .bind(format!("DEMO-{:04}", i))
        .bind(format!("{} in {}", categories[i % categories.len()], city))
        .bind(categories[i % categories.len()])
        .bind(if i % 2 == 0 { "rent" } else { "sale" })
        .bind(&city)
        .bind(&zip)
        .bind((40.0..400.0).fake::<f64>())
        .bind((300.0..5000.0).fake::<f64>())
        .execute(pool)
        .await
        .map_err(|e| e.to_string())?;
    }

    println!("✅ Demo data seeded ({} rows per entity)", count);
    Ok(())
}
