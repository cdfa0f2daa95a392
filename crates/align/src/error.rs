use std::path::PathBuf;

use geo::CellSize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Raster does not exist: {}", .0.display())]
    MissingRaster(PathBuf),
    #[error("No candidate rasters to align")]
    NoCandidates,
    #[error("Candidates {} and {} both map onto output {}", .first.display(), .second.display(), .output.display())]
    DuplicateOutputName { output: PathBuf, first: PathBuf, second: PathBuf },
    #[error(
        "Resolution mismatch for {}: reference cell size {reference} <-> candidate cell size {candidate}, a resample method is required",
        .path.display()
    )]
    ResolutionMismatch {
        path: PathBuf,
        reference: CellSize,
        candidate: CellSize,
    },
    #[error("Failed to reproject {} from '{from}' to '{to}': {source}", .path.display())]
    ReprojectionFailed {
        path: PathBuf,
        from: String,
        to: String,
        source: Box<Error>,
    },
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("{0}")]
    Geo(#[from] geo::Error),
    #[error("IO error: {0}")]
    IOError(#[from] std::io::Error),
}
