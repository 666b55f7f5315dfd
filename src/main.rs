use anyhow::Context;
use clap::Parser;

fn main() -> anyhow::Result<()> {
    // Load .env early; ignore if missing.
    dotenvy::dotenv().ok();

    let cli = cardex::Cli::parse();
    cardex::logging::init(cli.debug);

    // Pure-local commands get the lighter runtime.
    let runtime = if cli.command.needs_network() {
        tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
    } else {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
    }
    .context("building runtime")?;

    match runtime.block_on(cardex::run(cli)) {
        Ok(()) => Ok(()),
        Err(err) => {
            eprintln!("error: {err:#}");
            std::process::exit(1);
        }
    }
}
