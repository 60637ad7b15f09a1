use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use ocfl_types::EntityType;

#[derive(Parser)]
#[command(name = "ocfl", about = "OCFL command-line utilities", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// OCFL root directory
    #[arg(long, global = true, env = "OCFL_ROOT")]
    pub root: Option<PathBuf>,

    /// Driver configuration file (TOML)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// User name recorded in commits
    #[arg(short, long, global = true, env = "USER")]
    pub user: Option<String>,

    /// User address recorded in commits
    #[arg(short, long, global = true, env = "ADDRESS")]
    pub address: Option<String>,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create an OCFL root by writing its marker file
    Mkroot(MkrootArgs),
    /// List OCFL entities (objects, versions, files)
    Ls(LsArgs),
    /// Copy local files into a new version of an OCFL object
    Cp(CpArgs),
}

/// A missing directory is created; an existing one must be empty.
#[derive(Args)]
pub struct MkrootArgs {
    pub dir: Option<PathBuf>,
}

/// Locations are either one physical path, or logical coordinates:
/// `OBJECT [VERSION [LOGICAL_PATH]]`. Without any, the whole root is listed.
#[derive(Args)]
pub struct LsArgs {
    pub loc: Vec<String>,
    /// Only the head version of each object
    #[arg(long)]
    pub head: bool,
    /// Append the physical path of each entity
    #[arg(short, long)]
    pub physical: bool,
    /// Only entities of this type (object, version, file)
    #[arg(short = 't', long = "type", default_value = "any")]
    pub kind: EntityType,
}

/// Without `-o`, DEST is the object ID. With `-o`, DEST is a directory
/// inside that object.
#[derive(Args)]
pub struct CpArgs {
    #[arg(required = true, num_args = 2..)]
    pub paths: Vec<String>,
    /// Recurse into directories
    #[arg(short, long)]
    pub recursive: bool,
    /// Object to copy into
    #[arg(short, long)]
    pub object: Option<String>,
    /// Commit message
    #[arg(short, long, default_value = "")]
    pub message: String,
}

impl CpArgs {
    /// Source paths: everything but the last argument.
    pub fn sources(&self) -> &[String] {
        &self.paths[..self.paths.len().saturating_sub(1)]
    }

    fn last(&self) -> &str {
        self.paths.last().map(String::as_str).unwrap_or_default()
    }

    /// The object to write into.
    pub fn object_id(&self) -> &str {
        self.object.as_deref().unwrap_or_else(|| self.last())
    }

    /// Directory inside the object that receives the copies.
    pub fn destination(&self) -> &str {
        match self.object {
            Some(_) => self.last().trim_start_matches('/'),
            None => "",
        }
    }
}
