use std::fs;
use std::path::Path;

use anyhow::{bail, Context};
use colored::Colorize;
use serde_json::Value;
use tracing::debug;
use vaj_store::{journal_view, verify, ArtifactStore, StoreConfig};
use vaj_types::{ArtifactPayload, VersionRecord, VersionSelector};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_deref(), cli.root.as_deref())?;
    debug!(root = %config.root.display(), "using journal root");
    let format = cli.format;
    match cli.command {
        Command::Show(args) => cmd_show(&config, &format, args),
        Command::Get(args) => cmd_get(&config, &format, args),
        Command::Add(args) => cmd_add(&config, args),
        Command::Types(_) => cmd_types(&config),
        Command::Verify(_) => cmd_verify(&config, &format),
        Command::Reset(args) => cmd_reset(&config, args),
    }
}

fn load_config(file: Option<&Path>, root: Option<&Path>) -> anyhow::Result<StoreConfig> {
    let mut config = match file {
        Some(path) => StoreConfig::from_toml_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => StoreConfig::default(),
    };
    if let Some(root) = root {
        config.root = root.to_path_buf();
    }
    Ok(config)
}

fn cmd_show(config: &StoreConfig, format: &OutputFormat, args: ShowArgs) -> anyhow::Result<()> {
    let store = ArtifactStore::open(config)?;
    let view = journal_view(store.data());
    let selected = match &args.network {
        Some(network) => match view.get(network) {
            Some(contracts) => Some(contracts),
            None => bail!("no network {network} in {}", config.root.display()),
        },
        None => None,
    };

    if let OutputFormat::Json = format {
        let value = match selected {
            Some(contracts) => serde_json::to_value(contracts)?,
            None => serde_json::to_value(&view)?,
        };
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    if store.is_empty() {
        println!("No deployments recorded in {}", config.root.display().to_string().bold());
        return Ok(());
    }
    for (network, contracts) in view.iter() {
        if args.network.as_deref().is_some_and(|n| n != network) {
            continue;
        }
        println!("{}", network.bold());
        for (contract, aliases) in contracts.iter() {
            println!("  {}", contract.cyan());
            for (alias, versions) in aliases.iter() {
                println!("    {}", alias.yellow());
                for (tag, version) in versions.iter() {
                    let updated = version
                        .updated_at
                        .map(|ms| format!("  updated {ms}"))
                        .unwrap_or_default();
                    println!("      {:<8} {}{}", tag.green(), version.address, updated.dimmed());
                }
            }
        }
    }
    Ok(())
}

fn cmd_get(config: &StoreConfig, format: &OutputFormat, args: GetArgs) -> anyhow::Result<()> {
    let store = ArtifactStore::open(config)?;
    let found = match &args.version {
        Some(tag) => store
            .get(&args.network, &args.contract, &args.alias, tag)
            .map(|record| (tag.as_str(), record)),
        None => store.last(&args.network, &args.contract, &args.alias),
    };
    let Some((tag, record)) = found else {
        bail!(
            "no version {} of {}/{}/{}",
            args.version.as_deref().unwrap_or("(last)"),
            args.network,
            args.contract,
            args.alias
        );
    };

    match format {
        OutputFormat::Json => {
            let mut value = serde_json::to_value(record.to_journal())?;
            if let Value::Object(map) = &mut value {
                map.insert("version".into(), Value::String(tag.to_string()));
            }
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Text => println!("{}", record.address),
    }
    Ok(())
}

fn cmd_add(config: &StoreConfig, args: AddArgs) -> anyhow::Result<()> {
    let payload = ArtifactPayload {
        abi: read_input(&args.abi)?,
        tvc: read_input(&args.tvc)?,
        code: read_input(&args.code)?,
    };
    let mut record = VersionRecord::new(args.address, args.code_hash)
        .with_init_params(parse_params("init params", args.init_params.as_deref())?)
        .with_constructor_params(parse_params(
            "constructor params",
            args.constructor_params.as_deref(),
        )?)
        .with_payload(payload);
    record.public_key = args.public_key;

    let mut store = ArtifactStore::open(config)?;
    let selector = VersionSelector::from(args.version.as_deref());
    let tag = store.add_contract(&args.network, &args.contract, &args.alias, selector, record)?;
    println!(
        "{} Recorded {}/{}/{} as {}",
        "✓".green().bold(),
        args.network,
        args.contract.cyan(),
        args.alias.yellow(),
        tag.green()
    );
    Ok(())
}

fn cmd_types(config: &StoreConfig) -> anyhow::Result<()> {
    let store = ArtifactStore::open(config)?;
    store.save_declaration()?;
    println!(
        "{} Wrote {} ({} versions)",
        "✓".green().bold(),
        store.declaration_path().display().to_string().bold(),
        store.len()
    );
    Ok(())
}

fn cmd_verify(config: &StoreConfig, format: &OutputFormat) -> anyhow::Result<()> {
    let report = verify(config)?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => {
            for missing in &report.missing {
                println!(
                    "  {} {}/{}/{}/{} missing {}",
                    "✗".red(),
                    missing.network,
                    missing.contract,
                    missing.alias,
                    missing.version,
                    missing.files.join(", ")
                );
            }
            for orphan in &report.orphans {
                println!("  {} unlisted directory {}", "?".yellow(), orphan.display());
            }
            if report.is_consistent() {
                println!("{} {} versions, no issues.", "✓".green().bold(), report.versions);
            }
        }
    }
    if !report.is_consistent() {
        bail!(
            "journal is inconsistent: {} incomplete versions, {} unlisted directories",
            report.missing.len(),
            report.orphans.len()
        );
    }
    Ok(())
}

fn cmd_reset(config: &StoreConfig, args: ResetArgs) -> anyhow::Result<()> {
    if !args.yes {
        bail!("reset deletes every recorded deployment; pass --yes to confirm");
    }
    let mut store = ArtifactStore::open(config)?;
    let count = store.len();
    store.reset()?;
    println!("{} Removed {} versions from {}", "✓".green().bold(), count, config.root.display());
    Ok(())
}

fn read_input(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn parse_params(what: &str, text: Option<&str>) -> anyhow::Result<Value> {
    match text {
        Some(text) => serde_json::from_str(text).with_context(|| format!("parsing {what} as JSON")),
        None => Ok(Value::Null),
    }
}
