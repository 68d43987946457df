//! Atomic replacement of the running executable
//!
//! Install steps, each aborting the rest on failure:
//! 1. Open the downloaded archive
//! 2. Unpack it into a scratch directory inside the install directory
//! 3. Release the archive handle
//! 4. Mark `<scratch>/<command>` executable
//! 5. Copy it to `<dir>/<command>.tmp`, synced to disk
//! 6. With [`SwapStrategy::MoveAside`], rename `<dir>/<command>` to `<command>.old`
//! 7. Rename `<dir>/<command>.tmp` to `<dir>/<command>` (the commit point)
//!
//! The scratch directory is removed on every exit path. A `.old` file is
//! never cleaned up; it marks the last update on platforms that lock
//! running executables.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use upswap_core::SwapStrategy;

use crate::archive;
use crate::error::{InstallStage, Result, UpdateError};

/// Filesystem location of the executable being replaced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallTarget {
    executable: PathBuf,
    dir: PathBuf,
}

impl InstallTarget {
    /// Resolve the currently running executable.
    ///
    /// Symlinks and relative segments are resolved; fails if the path cannot
    /// be determined or the file no longer exists.
    pub fn current() -> Result<Self> {
        let exe = std::env::current_exe()
            .map_err(|e| UpdateError::fs(InstallStage::ResolveExecutable, e))?;
        Self::from_executable(&exe)
    }

    /// Resolve an explicit executable path, which must exist
    pub fn from_executable(path: &Path) -> Result<Self> {
        let executable = path
            .canonicalize()
            .map_err(|e| UpdateError::fs(InstallStage::ResolveExecutable, e))?;
        let dir = executable
            .parent()
            .map(Path::to_path_buf)
            .ok_or_else(|| {
                UpdateError::fs(
                    InstallStage::ResolveExecutable,
                    io::Error::new(io::ErrorKind::NotFound, "executable has no parent directory"),
                )
            })?;

        debug!("install target {}", executable.display());
        Ok(Self { executable, dir })
    }

    /// Target an install directory directly, without an existing executable
    pub fn in_dir(dir: impl Into<PathBuf>, command_name: &str) -> Self {
        let dir = dir.into();
        Self {
            executable: dir.join(command_name),
            dir,
        }
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// Directory the new binary is installed into
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

/// Unpacks an archive and swaps its binary in for the installed one
#[derive(Debug, Clone)]
pub struct Installer {
    /// Binary name inside the archive and in the install directory
    command_name: String,

    strategy: SwapStrategy,
}

impl Installer {
    /// Create an installer using the running platform's swap strategy
    pub fn new(command_name: impl Into<String>) -> Self {
        Self {
            command_name: command_name.into(),
            strategy: SwapStrategy::for_current_platform(),
        }
    }

    /// Override the swap strategy
    pub fn with_strategy(mut self, strategy: SwapStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn command_name(&self) -> &str {
        &self.command_name
    }

    pub fn strategy(&self) -> SwapStrategy {
        self.strategy
    }

    /// Install the binary from `archive_path` over the target's executable
    pub fn install(&self, archive_path: &Path, target: &InstallTarget) -> Result<()> {
        self.install_to(archive_path, target.dir())
    }

    /// Install the binary from `archive_path` as `<dir>/<command_name>`
    pub fn install_to(&self, archive_path: &Path, dir: &Path) -> Result<()> {
        debug!("unpacking {}", archive_path.display());

        let mut file =
            File::open(archive_path).map_err(|e| UpdateError::fs(InstallStage::OpenArchive, e))?;

        let scratch = tempfile::Builder::new()
            .prefix(".upswap-unpack-")
            .tempdir_in(dir)
            .map_err(|e| UpdateError::fs(InstallStage::Unpack, e))?;

        archive::unpack(&mut file, scratch.path())?;
        drop(file);

        let latest_binary = scratch.path().join(&self.command_name);
        make_executable(&latest_binary).map_err(|e| UpdateError::fs(InstallStage::Chmod, e))?;

        let current_binary = dir.join(&self.command_name);
        let staged_binary = dir.join(format!("{}.tmp", self.command_name));

        debug!(
            "copy {} to {}",
            latest_binary.display(),
            staged_binary.display()
        );
        copy_file(&latest_binary, &staged_binary)
            .map_err(|e| UpdateError::fs(InstallStage::Copy, e))?;

        self.swap(&staged_binary, &current_binary)?;

        if let Err(e) = scratch.close() {
            warn!("Failed to remove unpack directory: {}", e);
        }
        Ok(())
    }

    /// Commit the staged binary. All platform-specific handling lives here.
    fn swap(&self, staged: &Path, current: &Path) -> Result<()> {
        match self.strategy {
            SwapStrategy::RenameOver => {}
            SwapStrategy::MoveAside => {
                let old = old_path(current);
                debug!(
                    "windows workaround renaming {} to {}",
                    current.display(),
                    old.display()
                );
                fs::rename(current, &old)
                    .map_err(|e| UpdateError::fs(InstallStage::MoveAside, e))?;
            }
        }

        debug!("renaming {} to {}", staged.display(), current.display());
        fs::rename(staged, current).map_err(|e| UpdateError::fs(InstallStage::Rename, e))
    }
}

/// `<path>.old`, keeping any existing extension (`tool.exe` -> `tool.exe.old`)
fn old_path(current: &Path) -> PathBuf {
    let mut name = current.as_os_str().to_os_string();
    name.push(".old");
    PathBuf::from(name)
}

#[cfg(unix)]
fn make_executable(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
}

#[cfg(not(unix))]
fn make_executable(path: &Path) -> io::Result<()> {
    // Executability follows the file name here; only require the file to exist.
    fs::metadata(path).map(|_| ())
}

/// Copy `src` to `dst`, syncing the data and carrying over the permission bits
fn copy_file(src: &Path, dst: &Path) -> io::Result<()> {
    let mut input = File::open(src)?;
    let mut output = File::create(dst)?;

    io::copy(&mut input, &mut output)?;
    output.sync_all()?;

    let permissions = fs::metadata(src)?.permissions();
    fs::set_permissions(dst, permissions)?;
    Ok(())
}
