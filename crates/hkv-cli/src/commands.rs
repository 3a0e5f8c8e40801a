use std::path::PathBuf;

use anyhow::Context;
use colored::Colorize;
use hkv_codec::{peek_format, CodecError};
use hkv_container::NodeKind;
use hkv_store::{
    AddOptions, OpenMode, Presence, StoragePolicy, Store, StoreConfig, StoreError,
};
use serde::{Deserialize, Serialize};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = resolve_config(&cli)?;
    match cli.command {
        Command::Put(args) => cmd_put(config, args),
        Command::Get(args) => cmd_get(config, args),
        Command::Contains(args) => cmd_contains(config, args),
        Command::Rm(args) => cmd_rm(config, args),
        Command::Ls(args) => cmd_ls(config, args, &cli.format),
        Command::Demo(args) => cmd_demo(config, args),
    }
}

/// Config file first, then command-line overrides.
fn resolve_config(cli: &Cli) -> anyhow::Result<StoreConfig> {
    let mut config = match &cli.config {
        Some(path) => StoreConfig::load(path)?,
        None => StoreConfig::default(),
    };
    if let Some(file) = &cli.file {
        config.location = Some(file.clone());
    }
    if let Some(prefix) = &cli.prefix {
        config.prefix = prefix.clone();
    }
    Ok(config)
}

fn open_store(config: &StoreConfig, mode: OpenMode) -> anyhow::Result<Store> {
    let config = config.clone().with_mode(mode);
    let store = Store::open(&config)
        .with_context(|| format!("opening store {:?}", config.location))?;
    if !store.is_enabled() {
        eprintln!("{} no container file given; store is disabled", "!".yellow().bold());
    }
    Ok(store)
}

fn cmd_put(config: StoreConfig, args: PutArgs) -> anyhow::Result<()> {
    let value: serde_json::Value =
        serde_json::from_str(&args.value).context("value must be valid JSON")?;

    let mut opts = AddOptions::default()
        .overwrite(!args.no_overwrite)
        .allow_delete_group(args.replace_group);
    if args.uncompressed {
        opts = opts.policy(StoragePolicy::stored());
    } else if let Some(level) = args.level {
        opts = opts.policy(StoragePolicy::zstd(level));
    }

    let mut store = open_store(&config, OpenMode::Create)?;
    let added = store.add_with(&args.key, &value, opts)?;
    store.close()?;

    if added {
        println!("{} stored {}", "✓".green().bold(), args.key.yellow());
    } else {
        println!("{} {} not stored", "✗".red().bold(), args.key.yellow());
    }
    Ok(())
}

fn cmd_get(config: StoreConfig, args: GetArgs) -> anyhow::Result<()> {
    let store = open_store(&config, OpenMode::ReadOnly)?;

    if args.raw {
        match store.get_raw(&args.key)? {
            Some(bytes) => println!("{}", hex::encode(bytes)),
            None => println!("{} {}", args.key.yellow(), "(not found)".dimmed()),
        }
        return Ok(());
    }

    match store.get::<serde_json::Value>(&args.key) {
        Ok(Some(value)) => println!("{}", serde_json::to_string_pretty(&value)?),
        Ok(None) => println!("{} {}", args.key.yellow(), "(not found)".dimmed()),
        Err(StoreError::Codec(CodecError::FormatMismatch { actual, .. })) => {
            println!(
                "{} holds a {} payload; use {} to dump it",
                args.key.yellow(),
                actual.to_string().cyan(),
                "--raw".bold()
            );
        }
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

fn cmd_contains(config: StoreConfig, args: KeyArgs) -> anyhow::Result<()> {
    let store = open_store(&config, OpenMode::ReadOnly)?;
    let presence = store.contains(&args.key)?;
    println!("{} {}", args.key.yellow(), describe(presence));
    Ok(())
}

fn cmd_rm(config: StoreConfig, args: RmArgs) -> anyhow::Result<()> {
    let mut store = open_store(&config, OpenMode::ReadWrite)?;
    let removed = store.remove_with(&args.key, args.recursive)?;
    store.close()?;

    if removed {
        println!("{} removed {}", "✓".green().bold(), args.key.yellow());
    } else {
        println!("{} {} not removed", "✗".red().bold(), args.key.yellow());
    }
    Ok(())
}

#[derive(Serialize)]
struct KeyListing {
    key: String,
    len: Option<u64>,
    stored_len: Option<u64>,
}

fn cmd_ls(config: StoreConfig, args: LsArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let store = open_store(&config, OpenMode::ReadOnly)?;
    let keys = store.list_keys()?;

    let mut rows = Vec::with_capacity(keys.len());
    for key in keys {
        let info = match store.container() {
            Some(container) if args.long => container.leaf_info(&store.qualify(&key))?,
            _ => None,
        };
        rows.push(KeyListing {
            key,
            len: info.map(|i| i.len),
            stored_len: info.map(|i| i.stored_len),
        });
    }

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
        OutputFormat::Text => {
            for row in &rows {
                match (row.len, row.stored_len) {
                    (Some(len), Some(stored)) => {
                        println!("{:>10} {:>10}  {}", len, stored, row.key.yellow())
                    }
                    _ => println!("{}", row.key.yellow()),
                }
            }
        }
    }
    Ok(())
}

/// Nested value standing in for the arrays a caller would typically pickle.
#[derive(Debug, Serialize, Deserialize)]
struct DemoValue {
    grid: Vec<Vec<i64>>,
    noise: Vec<Vec<f32>>,
}

impl DemoValue {
    fn sample() -> Self {
        let noise = (0..40)
            .map(|r| (0..30).map(|c| ((r * 30 + c) % 97) as f32 / 97.0).collect())
            .collect();
        Self {
            grid: vec![vec![10; 400]; 300],
            noise,
        }
    }
}

fn cmd_demo(config: StoreConfig, args: DemoArgs) -> anyhow::Result<()> {
    let path: PathBuf = args
        .path
        .or_else(|| config.location.clone())
        .unwrap_or_else(|| PathBuf::from("database.hkv"));
    let config = StoreConfig {
        location: Some(path.clone()),
        ..config
    };

    // Write a pickled value plus a plain leaf beside the namespace.
    let mut store = Store::open(&config.clone().with_mode(OpenMode::Create))?;
    if !store.add("/something", &DemoValue::sample())? {
        anyhow::bail!("/something was not stored in {}", path.display());
    }
    if let Some(container) = store.container_mut() {
        if container.exists("/something_else")? {
            container.delete("/something_else")?;
        }
        container.create_leaf("/something_else", &[0, 1, 2, 3], &StoragePolicy::stored())?;
    }
    store.close()?;
    println!("{} wrote {}", "✓".green().bold(), path.display().to_string().bold());

    let store = Store::open(&config.with_mode(OpenMode::ReadOnly))?;
    if let Some(container) = store.container() {
        let mut top = Vec::new();
        container.visit("/", &mut |p, kind| {
            if !p.contains('/') {
                top.push(format!("{p} ({kind})"));
            }
        })?;
        println!("top-level: {}", top.join(", ").cyan());
        if let Some(raw) = container.read_leaf("/something_else")? {
            println!("/something_else = {raw:?}");
        }
    }

    println!("keys: {:?}", store.list_keys()?);
    println!("/missed {}", describe(store.contains("/missed")?));
    println!("/something {}", describe(store.contains("/something")?));

    match store.get::<DemoValue>("/something")? {
        Some(value) => println!(
            "{} restored grid {}x{}, noise {}x{}",
            "✓".green().bold(),
            value.grid.len(),
            value.grid.first().map_or(0, Vec::len),
            value.noise.len(),
            value.noise.first().map_or(0, Vec::len),
        ),
        None => println!("{} /something missing", "✗".red().bold()),
    }

    if let Some(bytes) = store.get_raw("/something")? {
        let format = peek_format(&bytes).context("reading /something payload header")?;
        println!("payload: {} bytes ({format})", bytes.len());
    }
    Ok(())
}

fn describe(presence: Presence) -> String {
    match presence {
        Presence::Absent => "absent".dimmed().to_string(),
        Presence::Leaf => format!("{}", NodeKind::Leaf).green().to_string(),
        Presence::Group => format!("{}", NodeKind::Group).cyan().to_string(),
    }
}
