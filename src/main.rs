use anyhow::Context;
use cart_sync::utils::{logger, validation::Validate};
use cart_sync::{
    CartCommand, CartError, CartManager, CliConfig, FileStore, HttpInventory, TracingNotifier,
};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load configuration: {}", e);
            std::process::exit(e.exit_code());
        }
    };

    logger::init_logger(config.verbose(), config.json_logs());
    tracing::debug!("Resolved config: {:?}", config);

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(e.exit_code());
    }

    let inventory = HttpInventory::with_timeout(config.endpoint(), config.timeout())
        .context("building inventory client")?;
    let store = FileStore::new(&config.storage.directory);
    let manager = CartManager::open(
        inventory,
        store,
        TracingNotifier::new(),
        config.cart_options(),
    );

    let outcome = match cli.command {
        CartCommand::Show => Ok(manager.current_cart()),
        CartCommand::Add { id } => manager.add_item(id.into()).await,
        CartCommand::Remove { id } => manager.remove_item(id.into()),
        CartCommand::Update { id, amount } => manager.update_amount(id.into(), amount).await,
    };

    // the cart is printed either way; failures leave it unchanged
    let cart = manager.current_cart();
    println!(
        "{}",
        serde_json::to_string_pretty(cart.as_ref()).context("serializing cart")?
    );
    tracing::info!(
        lines = cart.len(),
        quantity = cart.total_quantity(),
        "cart stored under {}",
        manager.storage_key()
    );

    if let Err(e) = outcome {
        exit_with(&e);
    }

    Ok(())
}

fn exit_with(error: &CartError) -> ! {
    tracing::debug!("Exiting after failed operation: {}", error);
    std::process::exit(error.exit_code())
}
