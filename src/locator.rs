//! Locating the Sku installation on disk.
//!
//! On Windows the World of Warcraft install path comes from the registry
//! (the same `WOW6432Node` key the Blizzard launcher writes), and Sku is
//! expected under `_classic_/Interface/AddOns/Sku`. On every platform an
//! explicit `--path` override skips the lookup entirely.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::constants::CHANGELOG_FILE;
use crate::core::error::UpdaterError;

/// A located Sku installation.
///
/// Read-only from the workflow's perspective: the updater only ever reads
/// the changelog and extracts archives next to `root_path`.
#[derive(Debug, Clone)]
pub struct LocalInstallation {
    /// The Sku add-on directory itself.
    pub root_path: PathBuf,
    /// `CHANGELOG.md` inside the add-on directory.
    pub changelog_path: PathBuf,
}

impl LocalInstallation {
    /// Wraps an existing Sku directory.
    ///
    /// # Errors
    ///
    /// [`UpdaterError::InstallationNotFound`] if the directory does not exist.
    pub fn at(sku_dir: &Path) -> Result<Self, UpdaterError> {
        if !sku_dir.is_dir() {
            return Err(UpdaterError::InstallationNotFound {
                path: sku_dir.display().to_string(),
            });
        }
        Ok(Self {
            changelog_path: sku_dir.join(CHANGELOG_FILE),
            root_path: sku_dir.to_path_buf(),
        })
    }

    /// The directory archives are extracted into (the AddOns folder).
    ///
    /// Release archives carry a top-level `Sku/` entry, so extraction targets
    /// the parent of the installation.
    #[must_use]
    pub fn parent_dir(&self) -> &Path {
        self.root_path.parent().unwrap_or(&self.root_path)
    }
}

/// Locates the Sku installation, honoring an explicit path override.
///
/// # Errors
///
/// [`UpdaterError::InstallationNotFound`] when neither the override nor the
/// platform lookup yields an existing directory.
pub fn locate(override_path: Option<&Path>) -> Result<LocalInstallation, UpdaterError> {
    let sku_dir = match override_path {
        Some(path) => path.to_path_buf(),
        None => default_sku_dir()?,
    };
    debug!("Expecting Sku installation at {}", sku_dir.display());
    LocalInstallation::at(&sku_dir)
}

#[cfg(windows)]
fn default_sku_dir() -> Result<PathBuf, UpdaterError> {
    use winreg::RegKey;
    use winreg::enums::HKEY_LOCAL_MACHINE;

    const WOW_KEY: &str = r"SOFTWARE\WOW6432Node\Blizzard Entertainment\World of Warcraft";

    let not_found = || UpdaterError::InstallationNotFound {
        path: format!(r"HKLM\{WOW_KEY}"),
    };

    let key = RegKey::predef(HKEY_LOCAL_MACHINE)
        .open_subkey(WOW_KEY)
        .map_err(|_| not_found())?;
    let install_path: String = key.get_value("InstallPath").map_err(|_| not_found())?;
    debug!("Registry reports WoW install path {install_path}");

    // InstallPath points at the retail directory; Classic lives beside it.
    let classic = Path::new(&install_path)
        .parent()
        .ok_or_else(not_found)?
        .join("_classic_");
    Ok(classic.join("Interface").join("AddOns").join("Sku"))
}

#[cfg(not(windows))]
fn default_sku_dir() -> Result<PathBuf, UpdaterError> {
    // No registry to consult off Windows; the user must point us at the
    // add-on directory.
    Err(UpdaterError::InstallationNotFound {
        path: "<no registry lookup available on this platform>".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locate_with_override() {
        let dir = tempfile::tempdir().unwrap();
        let sku = dir.path().join("Sku");
        std::fs::create_dir(&sku).unwrap();

        let installation = locate(Some(&sku)).unwrap();
        assert_eq!(installation.root_path, sku);
        assert_eq!(installation.changelog_path, sku.join("CHANGELOG.md"));
        assert_eq!(installation.parent_dir(), dir.path());
    }

    #[test]
    fn test_locate_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(
            locate(Some(&missing)),
            Err(UpdaterError::InstallationNotFound { .. })
        ));
    }
}
