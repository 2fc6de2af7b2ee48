// Command-line front end for the catalog

use anyhow::Context;
use launch_catalog::commands::{execute, Command};
use launch_catalog::{logging, Catalog, CatalogConfig};
use std::path::PathBuf;

const CONFIG_ENV: &str = "LAUNCH_CATALOG_CONFIG";

fn load_config() -> anyhow::Result<CatalogConfig> {
    match std::env::var_os(CONFIG_ENV) {
        Some(path) => CatalogConfig::load(&PathBuf::from(path)),
        None => Ok(CatalogConfig::default()),
    }
}

fn main() -> anyhow::Result<()> {
    let config = load_config()?;
    let dispatch = logging::init(&config.log)?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = Command::parse(&args)?;
    tracing::debug!(event = "command_received", component = "catalog", command = ?command);

    let catalog = Catalog::new(config).with_dispatch(dispatch);
    let output = execute(&catalog, &command).context("command failed")?;
    println!("{output}");
    Ok(())
}
