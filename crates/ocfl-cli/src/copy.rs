//! Parallel copy of local files into an object session.
//!
//! A scanner feeds a bounded queue that a fixed pool of workers drains, each
//! worker streaming one file at a time into the session. The first failed
//! `put` closes the queue, which stops the scanner and the other workers.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context};
use ocfl_fs::{FsSession, Session};
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;
use tracing::{debug, warn};
use walkdir::WalkDir;

const QUEUE_DEPTH: usize = 10;
const WORKERS: usize = 10;

/// What to copy and where it lands inside the object.
#[derive(Clone, Debug)]
pub struct CopyPlan {
    pub sources: Vec<PathBuf>,
    /// Directory inside the object, empty for the object's top level.
    pub destination: String,
    pub recursive: bool,
}

/// One local file and the logical path it is stored under.
#[derive(Clone, Debug, PartialEq, Eq)]
struct Job {
    source: PathBuf,
    logical: String,
}

/// Copy everything in `plan` into `session`. Returns the number of files
/// stored. Does not commit.
pub async fn copy_into(session: Arc<FsSession>, plan: CopyPlan) -> anyhow::Result<usize> {
    let (tx, rx) = mpsc::channel::<Job>(QUEUE_DEPTH);
    let rx = Arc::new(Mutex::new(rx));

    let mut workers = JoinSet::new();
    for _ in 0..WORKERS {
        workers.spawn(worker(Arc::clone(&session), Arc::clone(&rx)));
    }
    let scanner = tokio::task::spawn_blocking(move || scan(&plan, &tx));

    let mut copied = 0;
    let mut failure = None;
    while let Some(joined) = workers.join_next().await {
        match joined.context("copy worker panicked")? {
            Ok(n) => copied += n,
            Err(e) => {
                failure.get_or_insert(e);
            }
        }
    }
    let scanned = scanner.await.context("file scanner panicked")?;

    if let Some(e) = failure {
        return Err(e);
    }
    scanned?;
    Ok(copied)
}

async fn worker(session: Arc<FsSession>, queue: Arc<Mutex<mpsc::Receiver<Job>>>) -> anyhow::Result<usize> {
    let mut copied = 0;
    loop {
        let next = queue.lock().await.recv().await;
        let Some(job) = next else {
            return Ok(copied);
        };

        let session = Arc::clone(&session);
        let stored = tokio::task::spawn_blocking(move || put(&session, &job))
            .await
            .context("copy task panicked")
            .and_then(|r| r);
        if let Err(e) = stored {
            queue.lock().await.close();
            return Err(e);
        }
        copied += 1;
    }
}

fn put(session: &FsSession, job: &Job) -> anyhow::Result<()> {
    let file = File::open(&job.source).with_context(|| format!("could not open {}", job.source.display()))?;
    session
        .put(&job.logical, BufReader::new(file))
        .with_context(|| format!("could not store {} as {}", job.source.display(), job.logical))?;
    debug!(source = %job.source.display(), logical = %job.logical, "copied file");
    Ok(())
}

/// Enqueue every file named by `plan`. Fails once the queue is closed.
fn scan(plan: &CopyPlan, tx: &mpsc::Sender<Job>) -> anyhow::Result<()> {
    let send = |job: Job| {
        tx.blocking_send(job)
            .map_err(|_| anyhow::anyhow!("file scan cancelled"))
    };

    for source in &plan.sources {
        let source = std::path::absolute(source).with_context(|| format!("bad path {}", source.display()))?;
        let base = source.parent().unwrap_or(&source).to_path_buf();
        let meta = std::fs::metadata(&source).with_context(|| format!("could not stat {}", source.display()))?;

        if !meta.is_dir() {
            send(Job {
                logical: logical_path(&plan.destination, &base, &source)?,
                source,
            })?;
            continue;
        }
        if !plan.recursive {
            warn!(path = %source.display(), "skipping directory");
            continue;
        }

        for entry in WalkDir::new(&source).follow_links(true) {
            let entry = entry.with_context(|| format!("walk of {} failed", source.display()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.into_path();
            send(Job {
                logical: logical_path(&plan.destination, &base, &path)?,
                source: path,
            })?;
        }
    }
    Ok(())
}

/// `destination` joined with `path` relative to `base`, `/`-separated.
fn logical_path(destination: &str, base: &Path, path: &Path) -> anyhow::Result<String> {
    let Ok(rel) = path.strip_prefix(base) else {
        bail!("{} is not under {}", path.display(), base.display());
    };
    let mut parts: Vec<String> = destination
        .split('/')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    parts.extend(rel.components().map(|c| c.as_os_str().to_string_lossy().into_owned()));
    Ok(parts.join("/"))
}
