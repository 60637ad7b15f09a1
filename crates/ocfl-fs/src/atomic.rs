//! Durable writes: content goes to a temporary sibling file that is renamed
//! over the target only once it is complete and synced.

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::{FsError, FsResult, IoContext};

/// Prefix of the temporary file created next to a write target.
pub const ATOMIC_PREFIX: &str = ".ocfl.atomic.";

/// A write that becomes visible at its target path only on [`commit`].
///
/// The temporary file `.ocfl.atomic.<name>` is created exclusively, so an
/// existing temporary file (a concurrent or crashed writer) is an error.
/// Dropping an uncommitted write removes the temporary file.
///
/// [`commit`]: ManagedWrite::commit
#[derive(Debug)]
pub struct ManagedWrite {
    target: PathBuf,
    temp: PathBuf,
    file: Option<File>,
    finished: bool,
}

impl ManagedWrite {
    /// Start a write to `target`.
    pub fn begin(target: impl Into<PathBuf>) -> FsResult<Self> {
        let target = target.into();
        let name = target.file_name().ok_or_else(|| FsError::InvalidPath {
            path: target.display().to_string(),
            reason: "no file name".into(),
        })?;

        let mut temp_name = OsString::from(ATOMIC_PREFIX);
        temp_name.push(name);
        let temp = target.with_file_name(temp_name);

        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&temp)
            .at(&temp)?;

        Ok(Self {
            target,
            temp,
            file: Some(file),
            finished: false,
        })
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    pub fn temp_path(&self) -> &Path {
        &self.temp
    }

    /// Flush, sync and rename the temporary file over the target.
    pub fn commit(mut self) -> FsResult<()> {
        if let Some(mut file) = self.file.take() {
            file.flush().at(&self.temp)?;
            file.sync_all().at(&self.temp)?;
        }
        fs::rename(&self.temp, &self.target).at(&self.target)?;
        self.finished = true;
        Ok(())
    }

    /// Discard the write, removing the temporary file.
    pub fn rollback(mut self) -> FsResult<()> {
        self.file.take();
        self.finished = true;
        fs::remove_file(&self.temp).at(&self.temp)
    }
}

impl Write for ManagedWrite {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self.file.as_mut() {
            Some(file) => file.write(buf),
            None => Err(io::Error::new(io::ErrorKind::Other, "write already finished")),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.file.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

impl Drop for ManagedWrite {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        self.file.take();
        if let Err(e) = fs::remove_file(&self.temp) {
            if e.kind() != io::ErrorKind::NotFound {
                warn!(path = %self.temp.display(), error = %e, "could not remove temporary file");
            }
        }
    }
}

/// Durably write `bytes` to `target`.
pub fn write_file(target: &Path, bytes: &[u8]) -> FsResult<()> {
    let mut write = ManagedWrite::begin(target)?;
    write.write_all(bytes).at(write.temp_path())?;
    write.commit()
}
