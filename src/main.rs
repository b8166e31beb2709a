//! Binary entry point: resolve the data directory, start logging, open the
//! equipment database and hand control to the terminal UI until the user
//! quits.
use anyhow::Context;
use playground_inventory::{logging, run_app, App, AppConfig, EquipmentStore, InventoryService};
use tracing::info;

fn main() -> anyhow::Result<()> {
    let config = AppConfig::load()?;
    logging::init(&config)?;
    info!(version = env!("CARGO_PKG_VERSION"), data_dir = %config.data_dir.display(), "starting");

    let store = EquipmentStore::open(config.database_path())
        .context("failed to open equipment database")?;
    let service = InventoryService::new(store);

    let mut app = App::new(service, config.report_dir())?;
    run_app(&mut app)?;

    info!("shutting down");
    Ok(())
}
