//! Crash-safe file replacement shared by the config manager and the
//! directory-backed store.

use std::{
    fs::{self, File},
    io::{self, Write},
    path::{Path, PathBuf},
};

const TMP_SUFFIX: &str = "tmp";

/// Sibling path a write to `path` is staged through (`config.json.tmp`).
pub fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

/// Writes `data` to the staging sibling, then renames it over `path`.
/// Readers see either the old contents or the new ones.
pub fn write_atomic(path: &Path, data: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = tmp_path(path);
    let mut file = File::create(&tmp)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    fs::rename(&tmp, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn staging_path_keeps_existing_extension() {
        assert_eq!(tmp_path(Path::new("a/config.json")), PathBuf::from("a/config.json.tmp"));
        assert_eq!(tmp_path(Path::new("a/members")), PathBuf::from("a/members.tmp"));
    }

    #[test]
    fn replaces_contents_and_leaves_no_staging_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("value.dat");
        write_atomic(&path, "first").unwrap();
        write_atomic(&path, "second").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
        assert!(!tmp_path(&path).exists());
    }
}
