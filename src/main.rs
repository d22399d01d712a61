use boostwatch::adapter::inbound::cli::{
    check, command::Cli, command::Commands, output, run, subscribers, sweep,
};
use clap::Parser;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    output::configure(output::OutputConfig::new(cli.json, cli.quiet));

    if let Err(e) = dispatch(&cli).await {
        output::error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

async fn dispatch(cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Run(args) => run::execute(args).await?,
        Commands::Check(args) => check::execute(args).await?,
        Commands::Subscribers(args) => subscribers::execute(args).await?,
        Commands::Sweep(args) => sweep::execute(args).await?,
    }
    Ok(())
}
