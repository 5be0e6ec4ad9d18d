use clap::{Parser, Subcommand};
use std::path::PathBuf;

use timerfreak::config::AppConfig;
use timerfreak::{db, serve};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Compose, share, and replay countdown timer sequences"
)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Initialize the database schema and seed the sound catalog
    Init {
        /// Path to config file (TOML format)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Run the HTTP server
    Serve {
        /// Path to config file (TOML format)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Port to listen on (overrides config file)
        #[arg(short, long)]
        port: Option<u16>,
    },
}

fn load_config(path: Option<&PathBuf>) -> Result<AppConfig, Box<dyn std::error::Error>> {
    match path {
        Some(p) => AppConfig::load(p),
        None => Ok(AppConfig::default()),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    match args.command {
        Command::Init { config } => {
            let config = load_config(config.as_ref())?;
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(async {
                let pool = db::open_database_pool(&config.database_path).await?;
                db::init_database_schema(&pool).await?;
                db::seed_sounds(&pool, db::SEED_SOUNDS).await?;
                Ok::<(), Box<dyn std::error::Error + Send + Sync>>(())
            })
            .map_err(|e| e as Box<dyn std::error::Error>)?;
            println!(
                "Initialized database at {}",
                config.database_path.display()
            );
            Ok(())
        }
        Command::Serve { config, port } => {
            let config = load_config(config.as_ref())?;
            let port = port.unwrap_or(config.port);
            serve::run(config, port)
        }
    }
}
