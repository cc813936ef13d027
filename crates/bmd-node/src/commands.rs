use std::sync::Arc;

use anyhow::Context;
use bmd_store::tags::pubkey_tag;
use bmd_store::{BacklogCursor, DriverRegistry, ObjectStore, StoredObject};
use bmd_types::ObjectType;
use bmd_wire::GetPubKeyObject;
use colored::Colorize;
use tokio::sync::broadcast;
use tracing::info;

use crate::cli::*;
use crate::config::NodeConfig;
use crate::sweeper::spawn_sweeper;

const KNOWN_TYPES: [ObjectType; 4] = [
    ObjectType::GET_PUBKEY,
    ObjectType::PUBKEY,
    ObjectType::MSG,
    ObjectType::BROADCAST,
];

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Run(args) => {
            let mut config = match &args.config {
                Some(path) => NodeConfig::load(path)?,
                None => NodeConfig::default(),
            };
            if let Some(driver) = args.driver {
                config.driver = driver;
            }
            crate::init_logging(if cli.verbose { "debug" } else { &config.log_level });
            cmd_run(config).await
        }
        Command::Drivers => {
            crate::init_logging(if cli.verbose { "debug" } else { "warn" });
            cmd_drivers()
        }
        Command::Inspect(args) => {
            crate::init_logging(if cli.verbose { "debug" } else { "warn" });
            cmd_inspect(args)
        }
    }
}

async fn cmd_run(config: NodeConfig) -> anyhow::Result<()> {
    let registry = DriverRegistry::with_builtin();
    let store = registry
        .open(&config.driver, &config.store)
        .with_context(|| format!("opening {} store", config.driver))?;
    info!(driver = %config.driver, "store opened");

    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    let sweeper = spawn_sweeper(Arc::clone(&store), config.sweep_interval(), shutdown_rx);
    println!(
        "{} bmd running with {} store (sweep every {}s). Press Ctrl-C to stop.",
        "✓".green().bold(),
        config.driver.bold(),
        config.sweep_interval_secs
    );

    tokio::signal::ctrl_c().await.context("waiting for Ctrl-C")?;
    info!("shutdown requested");
    // The sweeper may already have stopped on its own.
    let _ = shutdown_tx.send(());
    let swept = sweeper.await.context("sweeper task failed")?;

    for (object_type, live, counter) in backlog_summary(store.as_ref(), config.backlog_batch_size)? {
        println!("  {:<10} {} stored, counter {}", object_type.to_string().cyan(), live, counter);
    }
    store.sync()?;
    store.close()?;
    println!("{} Store closed. {} expired objects swept.", "✓".green().bold(), swept);
    Ok(())
}

fn cmd_drivers() -> anyhow::Result<()> {
    for name in DriverRegistry::with_builtin().supported_drivers() {
        println!("  {}", name.bold());
    }
    Ok(())
}

fn cmd_inspect(args: InspectArgs) -> anyhow::Result<()> {
    let raw = std::fs::read(&args.file)
        .with_context(|| format!("reading {}", args.file.display()))?;
    let data = decode_input(raw, args.hex)?;
    let object = StoredObject::decode(&data).context("decoding object header")?;

    println!("Object {}", object.hash.to_hex().yellow().bold());
    println!("  Type:    {}", object.object_type.to_string().cyan());
    println!("  Version: {}", object.version);
    println!("  Stream:  {}", object.stream);
    println!("  Expires: {}", object.expires_at.to_rfc3339());
    println!("  Size:    {} bytes", object.size());

    match object.object_type {
        ObjectType::PUBKEY => match pubkey_tag(&object) {
            Ok(tag) => println!("  Tag:     {}", tag.to_hex().blue()),
            Err(e) => println!("  Tag:     {} ({e})", "invalid".red()),
        },
        ObjectType::GET_PUBKEY => match GetPubKeyObject::decode(&object.data) {
            Ok((_, GetPubKeyObject::Ripe(ripe))) => {
                println!("  Wants:   ripe {}", hex::encode(ripe).blue())
            }
            Ok((_, GetPubKeyObject::Tag(tag))) => println!("  Wants:   tag {}", tag.to_hex().blue()),
            Err(e) => println!("  Wants:   {} ({e})", "invalid".red()),
        },
        _ => {}
    }
    Ok(())
}

/// Raw file bytes, or the bytes spelled out by hex text.
fn decode_input(raw: Vec<u8>, is_hex: bool) -> anyhow::Result<Vec<u8>> {
    if !is_hex {
        return Ok(raw);
    }
    let text = String::from_utf8(raw).context("hex input is not text")?;
    hex::decode(text.trim()).context("invalid hex input")
}

/// `(type, live objects, counter)` for each known type, walked in pages of
/// `batch_size`.
fn backlog_summary(
    store: &dyn ObjectStore,
    batch_size: usize,
) -> anyhow::Result<Vec<(ObjectType, usize, u64)>> {
    KNOWN_TYPES
        .iter()
        .map(|&object_type| -> anyhow::Result<(ObjectType, usize, u64)> {
            let mut live = 0;
            for batch in BacklogCursor::new(store, object_type, 1, batch_size) {
                live += batch?.len();
            }
            Ok((object_type, live, store.get_counter(object_type)?))
        })
        .collect()
}
