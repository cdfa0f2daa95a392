//! Normalization of the candidate rasters and naming of the produced outputs.

use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Raster extensions that are picked up when a directory is provided as input
const RASTER_EXTENSIONS: [&str; 2] = ["tif", "tiff"];

/// Output extension for sources without an extension
const DEFAULT_OUTPUT_EXTENSION: &str = "tif";

/// The rasters to align: a single raster, a directory containing rasters or an explicit list of rasters
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateInput {
    Path(PathBuf),
    List(Vec<PathBuf>),
}

impl From<PathBuf> for CandidateInput {
    fn from(path: PathBuf) -> Self {
        CandidateInput::Path(path)
    }
}

impl From<&Path> for CandidateInput {
    fn from(path: &Path) -> Self {
        CandidateInput::Path(path.to_path_buf())
    }
}

impl From<Vec<PathBuf>> for CandidateInput {
    fn from(paths: Vec<PathBuf>) -> Self {
        CandidateInput::List(paths)
    }
}

impl From<&[PathBuf]> for CandidateInput {
    fn from(paths: &[PathBuf]) -> Self {
        CandidateInput::List(paths.to_vec())
    }
}

/// Expands the input into the ordered list of rasters to process.
/// Directories are expanded to the GeoTiff files they contain in sorted order, explicit paths are kept as is.
pub fn expand_to_list(input: &CandidateInput) -> Result<Vec<PathBuf>> {
    let paths = match input {
        CandidateInput::Path(path) if path.is_dir() => rasters_in_directory(path)?,
        CandidateInput::Path(path) => vec![path.clone()],
        CandidateInput::List(paths) => paths.clone(),
    };

    if paths.is_empty() {
        return Err(Error::NoCandidates);
    }

    Ok(paths)
}

pub fn must_exist(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(Error::MissingRaster(path.to_path_buf()));
    }

    Ok(())
}

/// `<output_dir>/<stem>_<qualifier>.<ext>` for the source raster
pub fn derive_output_name(output_dir: &Path, source: &Path, qualifier: &str) -> Result<PathBuf> {
    let stem = source
        .file_stem()
        .ok_or_else(|| Error::InvalidArgument(format!("Raster path has no file name: {}", source.display())))?
        .to_string_lossy();

    let ext = source
        .extension()
        .map(|ext| ext.to_string_lossy())
        .unwrap_or(DEFAULT_OUTPUT_EXTENSION.into());

    Ok(output_dir.join(format!("{stem}_{qualifier}.{ext}")))
}

fn rasters_in_directory(dir: &Path) -> Result<Vec<PathBuf>> {
    let match_options = glob::MatchOptions {
        case_sensitive: false,
        ..Default::default()
    };

    let escaped_dir = glob::Pattern::escape(&dir.to_string_lossy());

    let mut paths = Vec::new();
    for ext in RASTER_EXTENSIONS {
        let pattern = format!("{escaped_dir}/*.{ext}");
        let entries = glob::glob_with(&pattern, match_options)
            .map_err(|err| Error::InvalidArgument(format!("Invalid raster search pattern '{pattern}': {err}")))?;

        for entry in entries {
            let path = entry.map_err(|err| Error::IOError(err.into()))?;
            if path.is_file() {
                paths.push(path);
            }
        }
    }

    paths.sort();
    Ok(paths)
}
