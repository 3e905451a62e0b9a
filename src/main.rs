mod cli;
mod config;
mod dispatcher;
mod error;
mod format;
mod link;
mod prompt;
mod provider;
mod registry;
mod report;
mod selector;
mod surface;

use clap::Parser;
use cli::Cli;
use tracing_subscriber::EnvFilter;

use config::Config;
use dispatcher::Dispatcher;
use error::GrabError;
use prompt::TerminalPrompt;
use surface::HostSurface;
use surface::store::JsonlLinkStore;

fn main() {
    // stdout carries the inserted link; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        tracing::error!(error = %e, "grab failed");
        eprintln!("grab-link: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), GrabError> {
    let config_path = cli.config.clone().unwrap_or_else(config::config_path);
    let config = Config::load(&config_path)?;

    let clipboard = surface::clipboard::default_clipboard();
    let apps = config::build_apps(&config, clipboard.clone())?;
    let link_types = config::build_link_types(&config)?;
    tracing::debug!(
        apps = apps.len(),
        link_types = link_types.len(),
        config = %config_path.display(),
        "registries built"
    );

    if cli.list {
        print!("{}", report::render(&apps, &link_types));
        return Ok(());
    }

    let prefs = config.preferences(&link_types)?;
    let store = config.stored_links_file.clone().map(JsonlLinkStore::new);
    let mut surface = HostSurface::new(
        Box::new(std::io::stdout()),
        clipboard,
        cli.context.clone(),
        store,
    );

    let outcome = Dispatcher::new(&apps, &link_types, &prefs).run(
        &cli.mode(),
        &mut TerminalPrompt,
        &mut surface,
    )?;

    if let Some(message) = report::delivery_message(&outcome) {
        eprintln!("{message}");
    }
    Ok(())
}
