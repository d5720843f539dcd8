use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use dialoguer::Confirm;
use dotenvy::dotenv;

use aress::modules::admin::cleanup::CleanupQueue;
use aress::modules::admin::service::{DeleteUser, sweep_orphans};
use aress::modules::users::service::UserService;
use aress_backend::{GoTrueClient, IdentityStore, PgProfileStore, ProfileStore};
use aress_config::{BackendConfig, DatabaseConfig};
use aress_models::{ProfileUpdate, Role, UserId};

#[derive(Parser)]
#[command(name = "aress-cli")]
#[command(about = "Aress CLI - Administrative tools for the Aress CRM", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all user profiles, newest first
    ListUsers,
    /// Assign a role to a user (this is how the first admin is created)
    SetRole {
        #[arg(short = 'u', long)]
        user_id: String,

        /// admin, manager or sales_rep
        #[arg(short = 'r', long)]
        role: Role,
    },
    /// Delete a user's identity and profile
    DeleteUser {
        #[arg(short = 'u', long)]
        user_id: String,

        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
    /// Remove profiles whose identity no longer exists
    SweepOrphans,
}

struct Stores {
    identities: Arc<dyn IdentityStore>,
    profiles: Arc<dyn ProfileStore>,
}

async fn connect() -> anyhow::Result<Stores> {
    let backend = BackendConfig::from_env()?;
    let database = DatabaseConfig::from_env()?;

    Ok(Stores {
        identities: Arc::new(GoTrueClient::new(&backend)?),
        profiles: Arc::new(PgProfileStore::connect(&database).await?),
    })
}

fn parse_user_id(value: &str) -> anyhow::Result<UserId> {
    Ok(UserId::parse(value)?)
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();

    let cli = Cli::parse();

    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\n❌ {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands) -> anyhow::Result<()> {
    let stores = connect().await?;

    match command {
        Commands::ListUsers => handle_list_users(&stores).await,
        Commands::SetRole { user_id, role } => {
            handle_set_role(&stores, parse_user_id(&user_id)?, role).await
        }
        Commands::DeleteUser { user_id, yes } => {
            handle_delete_user(&stores, parse_user_id(&user_id)?, yes).await
        }
        Commands::SweepOrphans => handle_sweep_orphans(&stores).await,
    }
}

async fn handle_list_users(stores: &Stores) -> anyhow::Result<()> {
    let users = UserService::list_users(stores.profiles.as_ref())
        .await
        .map_err(|e| e.error)?;

    if users.is_empty() {
        println!("No users found.");
        return Ok(());
    }

    println!("{:<38} {:<10} {:<32} NAME", "ID", "ROLE", "EMAIL");
    for user in users {
        println!(
            "{:<38} {:<10} {:<32} {}",
            user.id.to_string(),
            user.role.as_str(),
            user.email,
            user.name
        );
    }

    Ok(())
}

async fn handle_set_role(stores: &Stores, id: UserId, role: Role) -> anyhow::Result<()> {
    let update = ProfileUpdate {
        role: Some(role),
        ..Default::default()
    };
    let profile = UserService::update_user(stores.profiles.as_ref(), id, update)
        .await
        .map_err(|e| e.error)?;

    println!("\n✅ Role updated");
    println!("   User: {} <{}>", profile.name, profile.email);
    println!("   Role: {}", profile.role.label());
    Ok(())
}

async fn handle_delete_user(stores: &Stores, id: UserId, yes: bool) -> anyhow::Result<()> {
    if !yes {
        let confirmed = Confirm::new()
            .with_prompt(format!("Permanently delete user {id}?"))
            .default(false)
            .interact()?;
        if !confirmed {
            println!("Aborted.");
            return Ok(());
        }
    }

    DeleteUser::new(
        stores.identities.clone(),
        stores.profiles.clone(),
        CleanupQueue::disabled(),
    )
    .execute(id)
    .await
    .map_err(|e| e.error)?;

    println!("\n✅ User {id} deleted");
    Ok(())
}

async fn handle_sweep_orphans(stores: &Stores) -> anyhow::Result<()> {
    let report = sweep_orphans(stores.identities.as_ref(), stores.profiles.as_ref())
        .await
        .map_err(|e| e.error)?;

    println!("\n✅ Sweep finished");
    println!("   Scanned: {}", report.scanned);
    println!("   Removed: {}", report.removed.len());
    for id in &report.removed {
        println!("     - {id}");
    }
    if !report.failed.is_empty() {
        println!("   Failed:  {}", report.failed.len());
        for id in &report.failed {
            println!("     - {id}");
        }
    }

    Ok(())
}
