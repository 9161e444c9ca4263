use anyhow::Context;
use boardscout::{configuration::get_configuration, startup::build_board_discovery};
use clap::Parser;
use env_logger::Env;

/// Find an organization's board of directors on the web.
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Organization name
    #[arg(short, long)]
    name: Option<String>,

    /// Only search the organization's own website
    #[arg(short = 'o', long = "orgdomain")]
    orgdomain: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let Some(name) = args.name.filter(|n| !n.trim().is_empty()) else {
        println!("Org name required");
        std::process::exit(1);
    };

    let configuration = get_configuration().context("Failed to read configuration.")?;
    let discovery = build_board_discovery(&configuration)?;

    let result = discovery.get_board_members(&name, args.orgdomain).await?;

    println!("{} board:", name);
    println!("{}", serde_json::to_string_pretty(&result)?);

    Ok(())
}
