use std::path::Path;

use anyhow::{anyhow, Context};
use colored::Colorize;
use serde_json::json;

use dax_registry::{Intent, Registry, RegistryConfig, Transaction};
use dax_store::{ChaincodeEvent, EventFilter, InMemoryLedger, KeyValue, TxReceipt};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_deref())?;
    match cli.command {
        Command::Invoke(args) => cmd_invoke(&cli.state, config, args, cli.format),
        Command::Events(args) => cmd_events(&cli.state, args, cli.format),
        Command::Dump(args) => cmd_dump(&cli.state, args, cli.format),
        Command::Config => cmd_config(&config),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<RegistryConfig> {
    match path {
        Some(path) => RegistryConfig::load(path).map_err(|e| anyhow!("{}: {e}", e.code())),
        None => Ok(RegistryConfig::default()),
    }
}

/// Load the ledger snapshot, or start empty if there is none yet.
fn open_ledger(state: &Path) -> anyhow::Result<InMemoryLedger> {
    if state.exists() {
        InMemoryLedger::load_snapshot(state)
            .with_context(|| format!("failed to load ledger state from {}", state.display()))
    } else {
        Ok(InMemoryLedger::new())
    }
}

/// Result of one CLI invocation.
#[derive(Debug)]
struct Outcome {
    function: String,
    intent: Intent,
    response: String,
    receipt: Option<TxReceipt>,
}

/// Run one transaction. SUBMIT transactions are committed and the state
/// file rewritten; EVALUATE transactions are discarded.
fn invoke(
    state: &Path,
    registry: &Registry,
    function: &str,
    args: &[String],
) -> anyhow::Result<Outcome> {
    let ledger = open_ledger(state)?;
    let tx = Transaction::parse(function, args).map_err(|e| anyhow!("{}: {e}", e.code()))?;
    let intent = tx.intent();

    let mut inv = ledger.begin();
    let response = registry
        .execute(&mut inv, tx)
        .map_err(|e| anyhow!("{}: {e}", e.code()))?;

    let receipt = match intent {
        Intent::Submit => {
            let receipt = inv.commit()?;
            ledger
                .save_snapshot(state)
                .with_context(|| format!("failed to write ledger state to {}", state.display()))?;
            Some(receipt)
        }
        Intent::Evaluate => {
            inv.rollback();
            None
        }
    };

    Ok(Outcome {
        function: function.to_string(),
        intent,
        response,
        receipt,
    })
}

fn cmd_invoke(
    state: &Path,
    config: RegistryConfig,
    args: InvokeArgs,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let registry = Registry::with_config(config);
    let outcome = invoke(state, &registry, &args.function, &args.args)?;

    match format {
        OutputFormat::Json => {
            let response = serde_json::from_str::<serde_json::Value>(&outcome.response)
                .unwrap_or_else(|_| json!(outcome.response));
            let mut out = json!({
                "function": outcome.function,
                "intent": outcome.intent.to_string(),
                "response": response,
            });
            if let Some(receipt) = &outcome.receipt {
                out["txId"] = json!(receipt.tx_id);
                out["height"] = json!(receipt.height);
                out["event"] = json!(receipt.event);
            }
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Text => {
            println!("{}", outcome.response);
            if let Some(receipt) = &outcome.receipt {
                println!(
                    "{} {} committed at height {} (tx {})",
                    "✓".green().bold(),
                    outcome.function.bold(),
                    receipt.height.to_string().yellow(),
                    receipt.tx_id.get(..12).unwrap_or(receipt.tx_id.as_str()).dimmed(),
                );
                if let Some(event) = &receipt.event {
                    println!("  Event: {}", event.cyan());
                }
            }
        }
    }
    Ok(())
}

fn select_events(state: &Path, args: &EventsArgs) -> anyhow::Result<Vec<ChaincodeEvent>> {
    let ledger = open_ledger(state)?;
    let filter = EventFilter {
        names: args.name.clone().map(|name| vec![name]),
        after_height: args.after,
    };
    Ok(ledger.events(&filter)?)
}

fn cmd_events(state: &Path, args: EventsArgs, format: OutputFormat) -> anyhow::Result<()> {
    let events = select_events(state, &args)?;
    match format {
        OutputFormat::Json => {
            let out: Vec<serde_json::Value> = events
                .iter()
                .map(|event| {
                    let payload = event
                        .payload_str()
                        .map(str::to_string)
                        .unwrap_or_else(|| hex_payload(event));
                    json!({
                        "height": event.height,
                        "txId": event.tx_id,
                        "name": event.name,
                        "payload": payload,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Text => {
            if events.is_empty() {
                println!("No events.");
            }
            for event in &events {
                println!("{}", event.to_string().yellow());
                match event.payload_str() {
                    Some(text) => println!("  {}", text.dimmed()),
                    None => println!("  {}", hex_payload(event).dimmed()),
                }
            }
        }
    }
    Ok(())
}

fn hex_payload(event: &ChaincodeEvent) -> String {
    hex::encode(&event.payload)
}

fn select_entries(state: &Path, args: &DumpArgs) -> anyhow::Result<Vec<KeyValue>> {
    let ledger = open_ledger(state)?;
    let mut entries = ledger.entries()?;
    if let Some(prefix) = &args.prefix {
        entries.retain(|entry| entry.key.starts_with(prefix.as_str()));
    }
    Ok(entries)
}

fn cmd_dump(state: &Path, args: DumpArgs, format: OutputFormat) -> anyhow::Result<()> {
    let entries = select_entries(state, &args)?;
    match format {
        OutputFormat::Json => {
            let mut out = serde_json::Map::new();
            for entry in &entries {
                let value = serde_json::from_slice(&entry.value)
                    .unwrap_or_else(|_| json!(String::from_utf8_lossy(&entry.value)));
                out.insert(entry.key.clone(), value);
            }
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Text => {
            if entries.is_empty() {
                println!("Ledger is empty.");
            }
            for entry in &entries {
                println!("{}  {}", entry.key.bold(), String::from_utf8_lossy(&entry.value));
            }
        }
    }
    Ok(())
}

fn cmd_config(config: &RegistryConfig) -> anyhow::Result<()> {
    print!("{}", config.to_toml_string().map_err(|e| anyhow!("{e}"))?);
    Ok(())
}
