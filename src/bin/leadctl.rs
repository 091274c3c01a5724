use clap::Parser;
use lead_board::config::DEFAULT_API_URL;
use lead_board::{shell, HttpLeadClient, LeadBoard};
use tokio::io::{stdin, BufReader};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "leadctl", version, about = "Record weekly leads against a target")]
struct Cli {
    /// API root of the lead board server
    #[arg(long, env = "LEAD_BOARD_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive("warn".parse()?))
        .init();

    let cli = Cli::parse();
    let client = HttpLeadClient::new(cli.api_url)?;
    let mut board = LeadBoard::new(client);

    let mut stdout = std::io::stdout();
    shell::run(&mut board, BufReader::new(stdin()), &mut stdout).await?;
    Ok(())
}
