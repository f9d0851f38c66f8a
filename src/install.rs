//! Archive installation over the existing add-on tree.
//!
//! Extraction writes every entry straight into the target directory,
//! overwriting files at matching relative paths. It is deliberately not
//! atomic: a failure partway through leaves a mixed old/new tree with no
//! automatic recovery, matching the updater's no-rollback contract.

use std::fs::{self, File};
use std::path::Path;

use tracing::{debug, info};
use zip::ZipArchive;

use crate::core::error::UpdaterError;

/// Extracts `archive_path` into `target_parent_dir`.
///
/// Entries without a safe enclosed name (absolute paths, `..` traversal)
/// are skipped. The caller removes the archive afterwards.
///
/// # Errors
///
/// [`UpdaterError::Install`] when the archive cannot be opened or an entry
/// cannot be written.
pub fn extract_archive(archive_path: &Path, target_parent_dir: &Path) -> Result<(), UpdaterError> {
    let fail = |reason: String| UpdaterError::Install {
        archive: archive_path.display().to_string(),
        reason,
    };

    info!(
        "Extracting {} into {}",
        archive_path.display(),
        target_parent_dir.display()
    );
    let file = File::open(archive_path).map_err(|e| fail(e.to_string()))?;
    let mut archive = ZipArchive::new(file).map_err(|e| fail(e.to_string()))?;

    for index in 0..archive.len() {
        let mut entry = archive.by_index(index).map_err(|e| fail(e.to_string()))?;
        let Some(relative) = entry.enclosed_name() else {
            debug!("Skipping unsafe archive entry '{}'", entry.name());
            continue;
        };
        let outpath = target_parent_dir.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&outpath).map_err(|e| fail(e.to_string()))?;
        } else {
            if let Some(parent) = outpath.parent() {
                fs::create_dir_all(parent).map_err(|e| fail(e.to_string()))?;
            }
            let mut outfile = File::create(&outpath).map_err(|e| fail(e.to_string()))?;
            std::io::copy(&mut entry, &mut outfile).map_err(|e| fail(e.to_string()))?;
        }

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Some(mode) = entry.unix_mode() {
                fs::set_permissions(&outpath, fs::Permissions::from_mode(mode))
                    .map_err(|e| fail(e.to_string()))?;
            }
        }
    }

    debug!("Extraction completed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::ZipWriter;
    use zip::write::SimpleFileOptions;

    fn build_archive(path: &Path, entries: &[(&str, &str)]) {
        let file = File::create(path).unwrap();
        let mut writer = ZipWriter::new(file);
        for (name, contents) in entries {
            writer
                .start_file(*name, SimpleFileOptions::default())
                .unwrap();
            writer.write_all(contents.as_bytes()).unwrap();
        }
        writer.finish().unwrap();
    }

    #[test]
    fn test_extract_creates_tree() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("Sku.zip");
        build_archive(
            &archive,
            &[
                ("Sku/CHANGELOG.md", "# Sku (2.0)\n"),
                ("Sku/core/init.lua", "-- init"),
            ],
        );

        extract_archive(&archive, dir.path()).unwrap();
        assert_eq!(
            fs::read_to_string(dir.path().join("Sku/CHANGELOG.md")).unwrap(),
            "# Sku (2.0)\n"
        );
        assert!(dir.path().join("Sku/core/init.lua").is_file());
    }

    #[test]
    fn test_extract_overwrites_existing_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("Sku")).unwrap();
        fs::write(dir.path().join("Sku/CHANGELOG.md"), "# Sku (1.0)\n").unwrap();

        let archive = dir.path().join("Sku.zip");
        build_archive(&archive, &[("Sku/CHANGELOG.md", "# Sku (2.0)\n")]);

        extract_archive(&archive, dir.path()).unwrap();
        assert_eq!(
            fs::read_to_string(dir.path().join("Sku/CHANGELOG.md")).unwrap(),
            "# Sku (2.0)\n"
        );
    }

    #[test]
    fn test_extract_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let bogus = dir.path().join("not-a-zip.zip");
        fs::write(&bogus, b"definitely not a zip").unwrap();

        assert!(matches!(
            extract_archive(&bogus, dir.path()),
            Err(UpdaterError::Install { .. })
        ));
    }
}
