use std::{
    fs::{self, File},
    path::{Path, PathBuf},
};

use crate::{core::utils::ensure_dir, errors::Result};

const TMP_SUFFIX: &str = "tmp";

/// Staging path next to `path`: `orders.csv` stages as `orders.csv.tmp`.
pub(crate) fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{existing}.{TMP_SUFFIX}"),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

/// Writes `path` atomically by filling a staged sibling file and renaming it into place.
/// The target is left untouched when `fill` fails.
pub(crate) fn write_atomic<F>(path: &Path, fill: F) -> Result<()>
where
    F: FnOnce(&mut File) -> Result<()>,
{
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let tmp = tmp_path(path);
    let mut file = File::create(&tmp)?;
    let filled = fill(&mut file).and_then(|()| Ok(file.sync_all()?));
    drop(file);
    if let Err(err) = filled {
        let _ = fs::remove_file(&tmp);
        return Err(err);
    }
    fs::rename(&tmp, path)?;
    Ok(())
}
