// SlotCode CLI - command-line companion to the tray indicator
// This binary sets up the secret word and prints the current code

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};
use slotcode::codegen::{unix_now, CodeSpec};
use slotcode::config_file::ConfigStore;
use slotcode::constants::HEARTBEAT_INTERVAL_MS;
use slotcode::scheduler::Heartbeat;
use std::time::Duration;

/// Print the current slot code for your secret word
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Print the current slot code for your secret word",
    long_about = "Print the current slot code for your secret word.

SETUP:
  Before first use, store your secret word:
    slotcode --setup

  The secret is kept in the same config file the tray indicator uses,
  so both always show the same code.

OUTPUT:
  <code> <seconds left in the current slot>"
)]
struct Args {
    /// Run interactive setup to store the secret word
    #[arg(long)]
    setup: bool,

    /// Keep running and print every new code as the slot rolls over
    #[arg(short, long)]
    watch: bool,

    /// Print the code for this Unix time instead of now (ignored with --watch)
    #[arg(long, value_name = "UNIX")]
    at: Option<u64>,
}

/// Run interactive setup to store the secret word
fn run_setup(store: &ConfigStore) -> Result<()> {
    println!("SlotCode Setup");
    println!("==============\n");

    let secret = rpassword::prompt_password("Enter secret word: ")
        .context("Failed to read secret word")?;

    if secret.trim().is_empty() {
        anyhow::bail!("Error: Secret word cannot be empty");
    }

    let confirm = rpassword::prompt_password("Confirm secret word: ")
        .context("Failed to read confirmation")?;

    if secret != confirm {
        anyhow::bail!("Error: Secret words do not match");
    }

    // Keep the other preferences the tray may have saved
    let mut cfg = store.load_or_default();
    cfg.set_secret(&secret);
    store.save(&cfg).context("Failed to save configuration")?;

    println!("\nConfiguration saved to: {}", store.path().display());
    println!("Setup complete!");

    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let store = ConfigStore::from_env();

    if args.setup {
        return run_setup(&store);
    }

    // Initialize logger
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Warn)
        .init();

    let cfg = match store.load() {
        Ok(cfg) if cfg.has_secret() => cfg,
        Ok(_) => anyhow::bail!("No secret word configured. Run 'slotcode --setup' first."),
        Err(e) => {
            error!("Failed to load configuration: {:#}", e);
            anyhow::bail!("No secret word configured. Run 'slotcode --setup' first.");
        }
    };
    info!("Configuration loaded from: {}", store.path().display());

    let spec = CodeSpec::from_env()?;
    if !args.watch {
        let slot = spec.slot_at(args.at.unwrap_or_else(unix_now));
        println!("{} {}", spec.derive(&cfg.secret, slot.index), slot.remaining);
        return Ok(());
    }

    let slot = spec.slot_at(unix_now());
    let code = spec.derive(&cfg.secret, slot.index);
    println!("{} {}", code, slot.remaining);

    let mut last = code;
    let _heartbeat = Heartbeat::start(Duration::from_millis(HEARTBEAT_INTERVAL_MS), move || {
        let slot = spec.slot_at(unix_now());
        let code = spec.derive(&cfg.secret, slot.index);
        if code != last {
            println!("{} {}", code, slot.remaining);
            last = code;
        }
        true
    })?;

    // Runs until interrupted
    loop {
        std::thread::park();
    }
}
