use clap::Parser;
use env_logger::Env;
use trawl::{cli::Cli, configuration::get_configuration, startup::run};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let mut configuration = get_configuration().expect("Failed to read configuration.");
    if let Some(output) = cli.output {
        configuration.output.directory = output;
    }
    if cli.headless {
        configuration.webdriver.headless = true;
    }

    let records = run(&configuration, &cli.query, cli.max_pages).await?;
    log::info!("Done: {} listings for {:?}", records.len(), cli.query);

    Ok(())
}
