//! Keeps `compile_commands.json` in the working directory pointing at the
//! build tree's copy, for language servers.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::{
    config::Context,
    error::{Error, Result},
};

pub const COMPILE_COMMANDS: &str = "compile_commands.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncMode {
    Copy,
    Symlink,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompileCommandsSync {
    pub from: PathBuf,
    pub to: PathBuf,
    pub mode: SyncMode,
}

impl CompileCommandsSync {
    /// Copies on Windows, symlinks elsewhere.
    pub fn new(build_dir: &Path, ctx: &Context) -> Self {
        Self {
            from: build_dir.join(COMPILE_COMMANDS),
            to: ctx.cwd.join(COMPILE_COMMANDS),
            mode: if ctx.is_windows() { SyncMode::Copy } else { SyncMode::Symlink },
        }
    }

    /// Returns `false` when the build tree has no database yet.
    pub fn run(&self) -> Result<bool> {
        if !self.from.is_file() {
            tracing::warn!("{:?} does not exist, skipping sync", self.from);
            return Ok(false);
        }

        if std::fs::symlink_metadata(&self.to).is_ok() {
            std::fs::remove_file(&self.to).map_err(|e| Error::io(&self.to, e))?;
        }

        match self.mode {
            SyncMode::Copy => {
                std::fs::copy(&self.from, &self.to).map_err(|e| Error::io(&self.to, e))?;
            }
            SyncMode::Symlink => link(&self.from, &self.to)?,
        }

        tracing::debug!("synced {:?} -> {:?}", self.from, self.to);
        Ok(true)
    }
}

#[cfg(unix)]
fn link(from: &Path, to: &Path) -> Result<()> {
    std::os::unix::fs::symlink(from, to).map_err(|e| Error::io(to, e))
}

#[cfg(not(unix))]
fn link(from: &Path, to: &Path) -> Result<()> {
    std::fs::copy(from, to).map(|_| ()).map_err(|e| Error::io(to, e))
}
