//! Glyph asset files
//!
//! Every tick writes a fresh PNG under the scratch directory with a random
//! suffix. Once the display has accepted the new file it becomes the active
//! asset and the previous one is deleted. Anything left behind by a crash is
//! removed by [`AssetStore::sweep`], keyed on the filename prefix.

use crate::config;
use crate::constants::{APP_DIR_NAME, ASSET_EXTENSION, ASSET_PREFIX, ASSET_SUFFIX_BYTES};
use log::{debug, info, warn};
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to create scratch directory {path}: {source}")]
    CreateDir { path: PathBuf, source: io::Error },
    #[error("failed to write glyph asset {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error("failed to generate asset name: {0}")]
    Name(String),
}

/// Sandboxed runtime the process may be confined to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sandbox {
    Flatpak { app_id: String },
    Snap { user_common: PathBuf },
}

impl Sandbox {
    pub fn detect() -> Option<Self> {
        if let Ok(app_id) = env::var("FLATPAK_ID") {
            if !app_id.is_empty() {
                return Some(Sandbox::Flatpak { app_id });
            }
        }
        match env::var_os("SNAP_USER_COMMON") {
            Some(dir) if !dir.is_empty() => Some(Sandbox::Snap {
                user_common: PathBuf::from(dir),
            }),
            _ => None,
        }
    }
}

/// Pick the scratch directory for the given environment
///
/// Sandboxes get their private writable area, everything else the user
/// cache directory; the system temp dir is the last resort.
pub fn scratch_dir_for(
    sandbox: Option<&Sandbox>,
    runtime_dir: Option<PathBuf>,
    cache_dir: Option<PathBuf>,
) -> PathBuf {
    match sandbox {
        Some(Sandbox::Flatpak { app_id }) => {
            if let Some(runtime) = runtime_dir {
                return runtime.join("app").join(app_id).join(APP_DIR_NAME);
            }
        }
        Some(Sandbox::Snap { user_common }) => return user_common.join("glyphs"),
        None => {}
    }

    cache_dir
        .map(|cache| cache.join(APP_DIR_NAME).join("glyphs"))
        .unwrap_or_else(|| env::temp_dir().join(APP_DIR_NAME).join("glyphs"))
}

/// Scratch directory for this process (SLOTCODE_SCRATCH_DIR wins)
pub fn resolve_scratch_dir() -> PathBuf {
    if let Some(dir) = config::scratch_dir_override() {
        return dir;
    }
    let dir = scratch_dir_for(Sandbox::detect().as_ref(), dirs::runtime_dir(), dirs::cache_dir());
    debug!("Glyph scratch directory: {}", dir.display());
    dir
}

/// New collision-resistant asset filename, e.g. `slotcode-glyph-3f9a0c1d2e4b5a69.png`
pub fn unique_asset_name() -> Result<String, AssetError> {
    let mut suffix = [0u8; ASSET_SUFFIX_BYTES];
    getrandom::getrandom(&mut suffix).map_err(|e| AssetError::Name(e.to_string()))?;
    Ok(format!(
        "{}{}.{}",
        ASSET_PREFIX,
        hex::encode(suffix),
        ASSET_EXTENSION
    ))
}

/// Whether `name` follows the glyph asset naming convention
pub fn is_asset_name(name: &str) -> bool {
    name.starts_with(ASSET_PREFIX)
        && Path::new(name)
            .extension()
            .is_some_and(|ext| ext == ASSET_EXTENSION)
}

/// Owner of the scratch directory and of the single active asset
#[derive(Debug)]
pub struct AssetStore {
    dir: PathBuf,
    active: Option<PathBuf>,
}

impl AssetStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            active: None,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path currently installed as the display icon
    pub fn active(&self) -> Option<&Path> {
        self.active.as_deref()
    }

    /// Write `png` to a new uniquely named file; it is not active yet
    pub fn write(&self, png: &[u8]) -> Result<PathBuf, AssetError> {
        fs::create_dir_all(&self.dir).map_err(|source| AssetError::CreateDir {
            path: self.dir.clone(),
            source,
        })?;

        let path = self.dir.join(unique_asset_name()?);
        fs::write(&path, png).map_err(|source| AssetError::Write {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }

    /// Mark `path` as installed and delete the previously active asset
    pub fn activate(&mut self, path: PathBuf) {
        if let Some(previous) = self.active.replace(path) {
            if Some(previous.as_path()) != self.active.as_deref() {
                remove_asset(&previous);
            }
        }
    }

    /// Delete the active asset; the display fell back to its default icon
    pub fn retire(&mut self) {
        if let Some(previous) = self.active.take() {
            remove_asset(&previous);
        }
    }

    /// Delete a written asset that never became active
    pub fn discard(&self, path: &Path) {
        if Some(path) != self.active.as_deref() {
            remove_asset(path);
        }
    }

    /// Delete every asset in the scratch directory except the active one.
    /// Returns the number of files removed.
    pub fn sweep(&self) -> usize {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return 0,
            Err(e) => {
                warn!("Failed to scan {}: {}", self.dir.display(), e);
                return 0;
            }
        };

        let mut removed = 0;
        for entry in entries.flatten() {
            let path = entry.path();
            let is_asset = entry.file_name().to_str().is_some_and(is_asset_name);
            if !is_asset || Some(path.as_path()) == self.active.as_deref() {
                continue;
            }
            if remove_asset(&path) {
                removed += 1;
            }
        }

        if removed > 0 {
            info!("Swept {} stale glyph asset(s) from {}", removed, self.dir.display());
        }
        removed
    }
}

/// Best-effort delete; failures are logged and not retried
fn remove_asset(path: &Path) -> bool {
    match fs::remove_file(path) {
        Ok(()) => true,
        Err(e) if e.kind() == io::ErrorKind::NotFound => false,
        Err(e) => {
            warn!("Failed to delete glyph asset {}: {}", path.display(), e);
            false
        }
    }
}
