mod profiles;
mod serve;

use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use cpstats_clients::PlatformClients;
use cpstats_core::{AppConfig, Platform};
use cpstats_sync::{limiter_for, BulkRefreshJob, JsonFileDirectory, ProfileService};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

#[derive(Debug, Parser)]
#[command(name = "cpstats")]
#[command(about = "Competitive-programming profile statistics")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the daily refresh scheduler until interrupted
    Serve,
    /// Refresh every stored profile now, bypassing the scheduler
    RefreshAll,
    /// Fetch a handle's current stats without storing them
    Fetch {
        /// `leetcode` or `codechef`
        platform: Platform,
        username: String,
    },
    /// Check whether a handle exists on a platform
    Verify {
        platform: Platform,
        username: String,
    },
    /// Link a handle to a user and store its first fetch
    Add {
        #[arg(long)]
        user: Uuid,
        platform: Platform,
        username: String,
        /// Create the user record if it does not exist yet
        #[arg(long)]
        create: bool,
    },
    /// Refetch one platform for a user
    Refresh {
        #[arg(long)]
        user: Uuid,
        platform: Platform,
    },
    /// Unlink a platform from a user
    Remove {
        #[arg(long)]
        user: Uuid,
        platform: Platform,
    },
    /// Print a user's stored profiles
    Show {
        #[arg(long)]
        user: Uuid,
    },
}

/// Everything a command needs, built once from configuration.
struct AppContext {
    config: AppConfig,
    clients: PlatformClients,
    directory: Arc<JsonFileDirectory>,
}

impl AppContext {
    fn from_config(config: AppConfig) -> anyhow::Result<Self> {
        let clients = PlatformClients::from_config(&config)?;
        let directory = Arc::new(JsonFileDirectory::new(config.users_path.clone()));
        Ok(Self {
            config,
            clients,
            directory,
        })
    }

    fn service(&self) -> ProfileService {
        ProfileService::new(self.directory.clone(), self.clients.clone())
    }

    fn refresh_job(&self) -> BulkRefreshJob {
        BulkRefreshJob::new(
            self.directory.clone(),
            self.clients.clone(),
            limiter_for(
                self.config.refresh_limiter,
                Duration::from_millis(self.config.refresh_delay_ms),
            ),
        )
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse first so --help and usage errors never depend on the environment.
    let cli = Cli::parse();

    let config = cpstats_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let ctx = AppContext::from_config(config)?;

    match cli.command {
        Commands::Serve => serve::run_serve(&ctx).await,
        Commands::RefreshAll => serve::run_refresh_all(&ctx).await,
        Commands::Fetch { platform, username } => {
            profiles::run_fetch(&ctx, platform, &username).await
        }
        Commands::Verify { platform, username } => {
            profiles::run_verify(&ctx, platform, &username).await;
            Ok(())
        }
        Commands::Add {
            user,
            platform,
            username,
            create,
        } => profiles::run_add(&ctx, user, platform, &username, create).await,
        Commands::Refresh { user, platform } => profiles::run_refresh(&ctx, user, platform).await,
        Commands::Remove { user, platform } => profiles::run_remove(&ctx, user, platform).await,
        Commands::Show { user } => profiles::run_show(&ctx, user).await,
    }
}
