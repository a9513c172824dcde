use clap::{Parser, Subcommand};
use rst_common::with_tokio::tokio;

use prople_heraldd::errors::HeraldError;
use prople_heraldd::svc::http::Http;

#[derive(Parser)]
#[command(name = "heraldd")]
#[command(version = "1.0")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(name = "serve")]
    #[command(about = "Running the agent HTTP server")]
    Serve {
        #[arg(short, long, value_name = "FILE")]
        #[arg(required = true)]
        config: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), HeraldError> {
    let cli = Cli::parse();
    match &cli.command {
        Commands::Serve { config } => {
            let http_server = Http::new(config.to_owned());
            http_server.serve().await?;
        }
    }

    Ok(())
}
