use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use colored::Colorize;
use ocfl_fs::{init_root, locate_root, CommitInfo, Driver, FsConfig, FsDriver, OpenOptions, Session, Walker};
use ocfl_types::{EntityRef, EntityType, Select};

use crate::cli::*;
use crate::copy::{copy_into, CopyPlan};

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match &cli.command {
        Command::Mkroot(args) => cmd_mkroot(&cli, args),
        Command::Ls(args) => cmd_ls(&cli, args),
        Command::Cp(args) => cmd_cp(&cli, args),
    }
}

fn cmd_mkroot(cli: &Cli, args: &MkrootArgs) -> anyhow::Result<()> {
    let dir = match args.dir.clone().or_else(|| cli.root.clone()) {
        Some(dir) => dir,
        None => std::env::current_dir().context("could not determine the current directory")?,
    };
    init_root(&dir).with_context(|| format!("could not create an OCFL root at {}", dir.display()))?;
    println!("{} OCFL root at {}", "✓".green().bold(), dir.display().to_string().bold());
    Ok(())
}

fn cmd_ls(cli: &Cli, args: &LsArgs) -> anyhow::Result<()> {
    // Physical paths can be listed without a root.
    let driver = build_driver(cli, false)?;
    let loc: Vec<&str> = args.loc.iter().map(String::as_str).collect();
    let select = Select {
        kind: args.kind,
        head: args.head,
    };

    driver.walk(select, &loc, |entity| {
        if let Some(line) = listing(&entity, args.physical) {
            println!("{line}");
        }
        Ok::<(), anyhow::Error>(())
    })
}

/// One `ls` output line: coordinates separated by four spaces, optionally
/// followed by the physical path. Roots and intermediates are not listed.
fn listing(entity: &EntityRef, physical: bool) -> Option<String> {
    if matches!(entity.kind, EntityType::Root | EntityType::Intermediate) {
        return None;
    }
    let mut fields = entity.coords();
    if physical {
        fields.push(entity.addr.display().to_string());
    }
    Some(fields.join("    "))
}

fn cmd_cp(cli: &Cli, args: &CpArgs) -> anyhow::Result<()> {
    let driver = build_driver(cli, true)?;
    let object = args.object_id();
    let session = driver
        .open(object, OpenOptions::create())
        .with_context(|| format!("could not open a session on {object}"))?;
    let session = Arc::new(session);

    let plan = CopyPlan {
        sources: args.sources().iter().map(PathBuf::from).collect(),
        destination: args.destination().to_string(),
        recursive: args.recursive,
    };
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("could not start the copy runtime")?;
    let copied = runtime.block_on(copy_into(Arc::clone(&session), plan))?;

    let name = user_name(cli);
    let address = address(cli, &name);
    session
        .commit(CommitInfo {
            name,
            address,
            message: args.message.clone(),
            date: Utc::now(),
        })
        .with_context(|| format!("could not commit {object}"))?;

    println!(
        "{} Copied {} file(s) into {} {}",
        "✓".green().bold(),
        copied.to_string().bold(),
        object.yellow(),
        session.version().to_string().cyan()
    );
    Ok(())
}

/// Driver for the configured root. `--root` (or `OCFL_ROOT`) and the config
/// file's root may point anywhere inside a root; without either, the root is
/// searched for from the current directory.
fn build_driver(cli: &Cli, require_root: bool) -> anyhow::Result<FsDriver> {
    let mut config = match &cli.config {
        Some(path) => FsConfig::load(path).with_context(|| format!("could not load {}", path.display()))?,
        None => FsConfig::default(),
    };

    let named = cli.root.clone().or_else(|| config.root.clone());
    let start = match &named {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().context("could not determine the current directory")?,
    };
    config.root = match locate_root(&start) {
        Ok(root) => Some(root),
        Err(e) if require_root || named.is_some() => {
            return Err(e).with_context(|| format!("no OCFL root at or above {}", start.display()))
        }
        Err(_) => None,
    };

    FsDriver::new(config).context("could not initialize the filesystem driver")
}

fn user_name(cli: &Cli) -> String {
    cli.user
        .clone()
        .filter(|u| !u.is_empty())
        .or_else(|| std::env::var("USERNAME").ok())
        .unwrap_or_default()
}

fn address(cli: &Cli, name: &str) -> String {
    if let Some(address) = cli.address.clone().filter(|a| !a.is_empty()) {
        return address;
    }
    let host = std::env::var("HOSTNAME").unwrap_or_else(|_| "localhost".into());
    format!("{name}@{host}")
}
