use anyhow::{anyhow, Result};
use std::env;
use std::io;
use std::path::Path;
use team_invite_bot::config::Config;
use team_invite_bot::database::connection::{
    remove_database_files, sqlite_file_path, DatabaseManager,
};
use team_invite_bot::error::DirectoryError;
use team_invite_bot::services::UserDirectory;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize basic logging for the operator tool
    env_logger::init();
    dotenvy::dotenv().ok();

    let args: Vec<String> = env::args().collect();
    let command = args.get(1).map(|s| s.as_str()).unwrap_or("migrate");

    match command {
        "migrate" | "up" => run_migrations().await,
        "check" => check_database().await,
        "reset" => reset_database().await,
        "grant-admin" => set_admin(args.get(2), true).await,
        "revoke-admin" => set_admin(args.get(2), false).await,
        "help" | "--help" | "-h" => {
            print_help();
            Ok(())
        }
        _ => {
            eprintln!("Unknown command: {command}");
            print_help();
            std::process::exit(1);
        }
    }
}

async fn connect() -> Result<DatabaseManager> {
    let database_url = Config::database_url_from_env();
    println!("📊 Database URL: {}", mask_url(&database_url));

    DatabaseManager::new(&database_url)
        .await
        .map_err(|e| anyhow!("Failed to connect to database: {}", e))
}

async fn run_migrations() -> Result<()> {
    println!("🔧 Team Invite Bot - Database Tool");
    println!("==================================");

    let db_manager = connect().await?;

    println!("🚀 Running database migrations...");
    match db_manager.run_migrations().await {
        Ok(_) => println!("✅ Migrations completed successfully!"),
        Err(e) => {
            eprintln!("❌ Migration failed: {e}");
            std::process::exit(1);
        }
    }

    Ok(())
}

async fn check_database() -> Result<()> {
    println!("🔍 Checking database connection and schema...");

    let db_manager = connect().await?;

    match check_tables(&db_manager).await {
        Ok(tables) => {
            println!("✅ Database connection successful!");
            println!("📋 Found tables:");
            for table in &tables {
                println!("  • {table}");
            }
            if !tables.iter().any(|t| t == "invite_tokens") {
                println!("💡 Try running 'teamctl migrate' to create the schema");
            }
        }
        Err(e) => {
            println!("⚠️  Database check failed: {e}");
            println!("💡 Try running 'teamctl migrate' to create the schema");
        }
    }

    Ok(())
}

async fn reset_database() -> Result<()> {
    println!("⚠️  WARNING: This will delete ALL users and invites!");
    println!("🤔 Are you sure you want to continue? (yes/no)");

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    if input.trim().to_lowercase() != "yes" {
        println!("❌ Reset cancelled.");
        return Ok(());
    }

    let database_url = Config::database_url_from_env();
    let Some(db_path) = sqlite_file_path(&database_url) else {
        return Err(anyhow!("Reset is only supported for SQLite database files"));
    };

    for removed in remove_database_files(db_path)? {
        println!("🗑️  Deleted {}", removed.display());
    }

    println!("🔄 Recreating database schema...");
    run_migrations().await?;

    println!("✅ Database reset completed!");
    Ok(())
}

/// The only way to change an admin flag after registration.
async fn set_admin(actor_id: Option<&String>, is_admin: bool) -> Result<()> {
    let actor_id: i64 = actor_id
        .ok_or_else(|| anyhow!("Missing actor id"))?
        .parse()
        .map_err(|_| anyhow!("Actor id must be a number"))?;

    let db_manager = connect().await?;
    let directory = UserDirectory::new(db_manager.pool.clone());

    match directory.set_admin_status(actor_id, is_admin).await {
        Ok(()) => {
            let verb = if is_admin { "granted to" } else { "revoked from" };
            println!("✅ Admin rights {verb} user {actor_id}");
            Ok(())
        }
        Err(DirectoryError::NotFound(id)) => {
            eprintln!("❌ User {id} is not registered");
            std::process::exit(1);
        }
        Err(DirectoryError::Storage(e)) => Err(e.into()),
    }
}

async fn check_tables(db_manager: &DatabaseManager) -> Result<Vec<String>> {
    let tables = sqlx::query_scalar::<_, String>(
        "SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name",
    )
    .fetch_all(&db_manager.pool)
    .await?;

    Ok(tables)
}

fn mask_url(url: &str) -> String {
    match sqlite_file_path(url).and_then(Path::file_name) {
        Some(filename) => format!("sqlite:.../{}", filename.to_string_lossy()),
        None => url.to_string(),
    }
}

fn print_help() {
    println!("👥 Team Invite Bot - Database Tool");
    println!();
    println!("USAGE:");
    println!("    teamctl [COMMAND]");
    println!();
    println!("COMMANDS:");
    println!("    migrate, up            Run database migrations (default)");
    println!("    check                  Check database connection and schema");
    println!("    reset                  Reset database (SQLite only) - DESTRUCTIVE!");
    println!("    grant-admin <USER_ID>  Give a registered user admin rights");
    println!("    revoke-admin <USER_ID> Remove admin rights from a user");
    println!("    help                   Show this help message");
    println!();
    println!("ENVIRONMENT:");
    println!("    DATABASE_URL   Database connection string (default: sqlite:./data/team_bot.db)");
    println!();
    println!("EXAMPLES:");
    println!("    teamctl                      # Run migrations");
    println!("    teamctl check                # Check database status");
    println!("    teamctl grant-admin 12345    # Make user 12345 an admin");
    println!();
}
