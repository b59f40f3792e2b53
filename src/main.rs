use anyhow::Result;
use clap::{Parser, Subcommand};

mod cli {
    pub mod estimate;
    pub mod server;
}

/// savor - surplus food marketplace emissions service
#[derive(Parser)]
#[command(name = "savor")]
#[command(about = "Carbon emissions estimates for rescued dishes", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Server host address (overrides config file)
        #[arg(long)]
        host: Option<String>,

        /// Server port (overrides config file)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Estimate emissions for a single dish and print the result as JSON
    Estimate {
        /// Dish name
        #[arg(long)]
        dish: String,

        /// Ingredients, one per argument
        #[arg(required = true)]
        ingredients: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = savor::config::Config::load(cli.config.clone())?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    savor::observability::init_observability(
        "savor",
        env!("CARGO_PKG_VERSION"),
        &config.observability.log_level,
    )?;

    match cli.command {
        Commands::Serve { host, port } => cli::server::serve(config, host, port).await,
        Commands::Estimate { dish, ingredients } => {
            cli::estimate::estimate(config, dish, ingredients).await
        }
    }
}
