use clap::Parser;

use paystub_cli::{Cli, logging, run};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.log_level.as_deref())?;

    let registry = paystub_data::default_registry();
    let output = run(&cli, &registry).await?;
    print!("{}", output.report);

    Ok(())
}
