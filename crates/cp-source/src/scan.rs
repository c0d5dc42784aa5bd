use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Extensions audio reconnues.
pub const AUDIO_EXTS: &[&str] = &["wav"];

/// Extrait récursivement les fichiers audio reconnus sous `root`, triés.
///
/// Sorting makes discovery order, and therefore corpus order, independent of
/// the filesystem. Unreadable subdirectories are logged and skipped; only an
/// unreadable `root` is an error. Symbolic links to directories are not
/// followed, so a link cycle cannot recurse forever.
///
/// # Errors
/// Returns an error if `root` itself cannot be listed.
pub fn discover_audio(root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let entries =
        fs::read_dir(root).with_context(|| format!("Cannot list {}", root.display()))?;
    scan_entries(entries, &mut files);
    files.sort();
    Ok(files)
}

fn scan_dir(dir: &Path, files: &mut Vec<PathBuf>) {
    match fs::read_dir(dir) {
        Ok(entries) => scan_entries(entries, files),
        Err(e) => log::warn!("Dossier illisible {} : {e}", dir.display()),
    }
}

fn scan_entries(entries: fs::ReadDir, files: &mut Vec<PathBuf>) {
    for entry in entries {
        let (path, is_dir) = match entry.and_then(|e| Ok((e.path(), e.file_type()?.is_dir()))) {
            Ok(found) => found,
            Err(e) => {
                log::warn!("Entrée illisible : {e}");
                continue;
            }
        };
        // symlinked directories are not followed
        if is_dir {
            scan_dir(&path, files);
        } else if is_audio(&path) {
            files.push(path);
        }
    }
}

/// True for files with a recognised audio extension (case-insensitive).
#[must_use]
pub fn is_audio(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| AUDIO_EXTS.contains(&ext.to_lowercase().as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_nested_wavs_in_sorted_order() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let nested = dir.path().join("p2_style");
        fs::create_dir_all(&nested)?;
        fs::write(nested.join("b.WAV"), b"")?;
        fs::write(dir.path().join("a.wav"), b"")?;
        fs::write(dir.path().join("notes.txt"), b"")?;
        fs::write(dir.path().join("c.mid"), b"")?;

        let files = discover_audio(dir.path())?;
        let names: Vec<_> = files
            .iter()
            .filter_map(|p| p.file_name().and_then(|n| n.to_str()))
            .collect();
        assert_eq!(names, vec!["a.wav", "b.WAV"]);
        Ok(())
    }

    #[test]
    fn missing_root_is_an_error() {
        assert!(discover_audio(Path::new("/definitely/not/here")).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn directory_link_cycle_is_not_followed() -> Result<()> {
        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join("a.wav"), b"")?;
        std::os::unix::fs::symlink(dir.path(), dir.path().join("loop"))?;
        let files = discover_audio(dir.path())?;
        assert_eq!(files, vec![dir.path().join("a.wav")]);
        Ok(())
    }
}
