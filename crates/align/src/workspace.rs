use std::path::{Path, PathBuf};

use crate::Result;

const TEMP_DIR_PREFIX: &str = ".rastermatch-";

/// Private directory for the intermediate rasters of a run, removed when the run finishes.
pub struct TempWorkspace {
    dir: tempfile::TempDir,
}

impl TempWorkspace {
    pub fn create_in(output_dir: &Path) -> Result<Self> {
        let dir = tempfile::Builder::new().prefix(TEMP_DIR_PREFIX).tempdir_in(output_dir)?;
        log::debug!("Intermediate rasters are stored in {}", dir.path().display());
        Ok(TempWorkspace { dir })
    }

    /// Path for an intermediate raster, the candidate index keeps the names unique when candidates share a file name
    pub fn intermediate_path(&self, index: usize, stage: &str, source: &Path) -> PathBuf {
        let stem = source.file_stem().map(|stem| stem.to_string_lossy()).unwrap_or_default();
        self.dir.path().join(format!("{index:04}_{stem}_{stage}.tif"))
    }

    /// Removes the directory and its contents, failures are only logged
    pub fn cleanup(self) {
        let path = self.dir.path().to_path_buf();
        if let Err(err) = self.dir.close() {
            log::warn!("Failed to remove intermediate directory {}: {err}", path.display());
        }
    }
}
