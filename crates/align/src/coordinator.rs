use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use bon::bon;
use geo::{ArrayDataType, RasterGrid, ResampleMethod};

use crate::{
    AlignmentBackend, AlignmentPlan, AxisStrictness, Error, Result,
    inputs::{self, CandidateInput},
    workspace::TempWorkspace,
};

/// Qualifier appended to the file name of the aligned rasters
pub const OUTPUT_QUALIFIER: &str = "matched";

/// How the run reacts to a candidate that can not be aligned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// The first failure aborts the run
    #[default]
    AbortRun,
    /// Failures are collected in the report and the remaining candidates are processed
    ContinueOnError,
}

#[derive(Debug, Clone, Default)]
pub struct AlignOptions {
    /// Storage type of the outputs, the type of each candidate when not provided
    pub data_type: Option<ArrayDataType>,
    /// Nodata value of the outputs, derived from each candidate when not provided
    pub nodata: Option<f64>,
    /// Required to align candidates with a different resolution than the reference
    pub resample_method: Option<ResampleMethod>,
    pub strictness: AxisStrictness,
    pub failure_policy: FailurePolicy,
    /// Number of candidates processed concurrently, values below 2 process sequentially
    pub num_threads: usize,
}

#[bon]
impl AlignOptions {
    #[builder]
    pub fn new(
        data_type: Option<ArrayDataType>,
        nodata: Option<f64>,
        resample_method: Option<ResampleMethod>,
        strictness: Option<AxisStrictness>,
        failure_policy: Option<FailurePolicy>,
        num_threads: Option<usize>,
    ) -> Self {
        AlignOptions {
            data_type,
            nodata,
            resample_method,
            strictness: strictness.unwrap_or_default(),
            failure_policy: failure_policy.unwrap_or_default(),
            num_threads: num_threads.unwrap_or(1),
        }
    }
}

#[derive(Debug)]
pub struct AlignedRaster {
    pub source: PathBuf,
    pub output: PathBuf,
    pub plan: AlignmentPlan,
}

#[derive(Debug)]
pub struct FailedRaster {
    pub source: PathBuf,
    pub error: Error,
}

/// Outcome of a run, candidates are listed in processing order
#[derive(Debug, Default)]
pub struct AlignmentReport {
    pub aligned: Vec<AlignedRaster>,
    /// Only populated with [`FailurePolicy::ContinueOnError`]
    pub failed: Vec<FailedRaster>,
}

impl AlignmentReport {
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }

    pub fn outputs(&self) -> impl Iterator<Item = &Path> {
        self.aligned.iter().map(|aligned| aligned.output.as_path())
    }
}

struct Candidate {
    index: usize,
    source: PathBuf,
    output: PathBuf,
}

struct Run<'a> {
    reference: &'a Path,
    reference_grid: &'a RasterGrid,
    workspace: &'a TempWorkspace,
}

/// Brings candidate rasters onto the grid of a reference raster using the operations of the backend.
pub struct AlignmentCoordinator<'a, B: AlignmentBackend> {
    backend: &'a B,
    options: AlignOptions,
}

impl<'a, B: AlignmentBackend> AlignmentCoordinator<'a, B> {
    pub fn new(backend: &'a B, options: AlignOptions) -> Self {
        AlignmentCoordinator { backend, options }
    }

    /// Writes an aligned copy of every candidate in `output_dir`.
    /// Intermediate rasters are stored in a temporary directory inside `output_dir` which is removed at the end of the run.
    pub fn align_all(&self, reference: &Path, candidates: impl Into<CandidateInput>, output_dir: &Path) -> Result<AlignmentReport> {
        inputs::must_exist(reference)?;
        let reference_grid = self.backend.read_grid(reference)?;
        log::info!("Reference {}: {reference_grid}", reference.display());

        let candidates = create_candidates(&candidates.into(), output_dir)?;

        std::fs::create_dir_all(output_dir)?;
        let workspace = TempWorkspace::create_in(output_dir)?;

        let run = Run {
            reference,
            reference_grid: &reference_grid,
            workspace: &workspace,
        };

        let results = self.process(&run, &candidates);
        workspace.cleanup();

        self.create_report(candidates, results?)
    }

    /// Results in candidate order, candidates that were not started because the run was aborted have no result
    fn process(&self, run: &Run, candidates: &[Candidate]) -> Result<Vec<Option<Result<AlignmentPlan>>>> {
        if self.options.num_threads > 1 {
            #[cfg(feature = "rayon")]
            {
                return self.process_parallel(run, candidates);
            }

            #[cfg(not(feature = "rayon"))]
            log::warn!("Parallel processing is not available, candidates are processed sequentially");
        }

        let mut results = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            let result = self.align_candidate(run, candidate);
            let abort = result.is_err() && self.options.failure_policy == FailurePolicy::AbortRun;
            results.push(Some(result));

            if abort {
                break;
            }
        }

        Ok(results)
    }

    /// With [`FailurePolicy::AbortRun`] no new candidates are started after a failure,
    /// candidates that are being processed by the other workers are completed
    #[cfg(feature = "rayon")]
    fn process_parallel(&self, run: &Run, candidates: &[Candidate]) -> Result<Vec<Option<Result<AlignmentPlan>>>> {
        use rayon::prelude::*;
        use std::sync::atomic::{AtomicBool, Ordering};

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.options.num_threads)
            .build()
            .map_err(|e| Error::InvalidArgument(format!("Failed to create threadpool: {e}")))?;

        let aborted = AtomicBool::new(false);
        let results: Vec<Option<Result<AlignmentPlan>>> = pool.install(|| {
            candidates
                .par_iter()
                .map(|candidate| {
                    if aborted.load(Ordering::Acquire) {
                        return None;
                    }

                    let result = self.align_candidate(run, candidate);
                    if result.is_err() && self.options.failure_policy == FailurePolicy::AbortRun {
                        aborted.store(true, Ordering::Release);
                    }

                    Some(result)
                })
                .collect()
        });

        let skipped = results.iter().filter(|result| result.is_none()).count();
        if skipped > 0 {
            log::info!("Run aborted, {skipped} candidates were not processed");
        }

        Ok(results)
    }

    fn align_candidate(&self, run: &Run, candidate: &Candidate) -> Result<AlignmentPlan> {
        let source = &candidate.source;
        inputs::must_exist(source)?;

        let grid = self.backend.read_grid(source)?;
        let plan = AlignmentPlan::evaluate(run.reference_grid, &grid, self.options.strictness);
        log::info!("Align {}: {plan}", source.display());
        log::debug!("Candidate grid: {grid}");

        let mut working_path = source.clone();

        if plan.needs_reprojection {
            let dst = run.workspace.intermediate_path(candidate.index, "reprojected", source);
            let method = self.options.resample_method.unwrap_or_default();
            self.backend
                .reproject(&working_path, &dst, run.reference_grid, method)
                .map_err(|err| Error::ReprojectionFailed {
                    path: source.clone(),
                    from: grid.projection_name().to_string(),
                    to: run.reference_grid.projection_name().to_string(),
                    source: Box::new(err),
                })?;
            working_path = dst;
        }

        if plan.needs_resampling {
            let method = self.options.resample_method.ok_or_else(|| Error::ResolutionMismatch {
                path: source.clone(),
                reference: run.reference_grid.cell_size(),
                candidate: grid.cell_size(),
            })?;

            let dst = run.workspace.intermediate_path(candidate.index, "resampled", source);
            self.backend
                .resample(&working_path, &dst, run.reference_grid.cell_size(), method, run.reference_grid)?;
            working_path = dst;
        }

        let output_grid = self.backend.reconcile(
            run.reference,
            &working_path,
            &candidate.output,
            self.options.data_type,
            self.options.nodata,
        )?;

        log::debug!("Wrote {}: {output_grid}", candidate.output.display());
        Ok(plan)
    }

    fn create_report(&self, candidates: Vec<Candidate>, results: Vec<Option<Result<AlignmentPlan>>>) -> Result<AlignmentReport> {
        let mut report = AlignmentReport::default();

        for (candidate, result) in candidates.into_iter().zip(results) {
            let Some(result) = result else {
                continue;
            };

            match result {
                Ok(plan) => report.aligned.push(AlignedRaster {
                    source: candidate.source,
                    output: candidate.output,
                    plan,
                }),
                Err(err) => match self.options.failure_policy {
                    FailurePolicy::AbortRun => return Err(err),
                    FailurePolicy::ContinueOnError => {
                        log::error!("Failed to align {}: {err}", candidate.source.display());
                        report.failed.push(FailedRaster {
                            source: candidate.source,
                            error: err,
                        });
                    }
                },
            }
        }

        log::info!("Aligned {} rasters, {} failures", report.aligned.len(), report.failed.len());
        Ok(report)
    }
}

fn create_candidates(input: &CandidateInput, output_dir: &Path) -> Result<Vec<Candidate>> {
    let mut outputs: HashMap<PathBuf, PathBuf> = HashMap::new();
    let mut candidates = Vec::new();

    for (index, source) in inputs::expand_to_list(input)?.into_iter().enumerate() {
        let output = inputs::derive_output_name(output_dir, &source, OUTPUT_QUALIFIER)?;
        if let Some(first) = outputs.insert(output.clone(), source.clone()) {
            return Err(Error::DuplicateOutputName {
                output,
                first,
                second: source,
            });
        }

        candidates.push(Candidate { index, source, output });
    }

    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use geo::{CellSize, Point, RasterSize};

    use super::*;
    use crate::testutils::{Call, FakeBackend, LATLON, UTM, latlon_grid, utm_grid};

    struct Setup {
        tmp: tempfile::TempDir,
        backend: FakeBackend,
        reference: PathBuf,
    }

    impl Setup {
        /// Reference raster of 10x10 cells of 30m
        fn new() -> Self {
            Self::with_backend(FakeBackend::default())
        }

        fn with_backend(backend: FakeBackend) -> Self {
            let tmp = tempfile::tempdir().expect("Failed to create temp dir");
            let reference = tmp.path().join("snap.tif");
            backend.add_raster(
                &reference,
                utm_grid(Point::new(500000.0, 4000000.0), RasterSize::square(10), CellSize::square(30.0)),
            );

            Setup { tmp, backend, reference }
        }

        fn add_candidate(&self, name: &str, grid: RasterGrid) -> PathBuf {
            let path = self.tmp.path().join(name);
            self.backend.add_raster(&path, grid);
            path
        }

        fn output_dir(&self) -> PathBuf {
            self.tmp.path().join("out")
        }

        fn reference_grid(&self) -> RasterGrid {
            self.backend.read_grid(&self.reference).expect("reference grid")
        }

        fn align(&self, candidates: impl Into<CandidateInput>, options: AlignOptions) -> Result<AlignmentReport> {
            AlignmentCoordinator::new(&self.backend, options).align_all(&self.reference, candidates, &self.output_dir())
        }

        fn output_files(&self) -> Vec<String> {
            let mut names: Vec<String> = std::fs::read_dir(self.output_dir())
                .expect("output dir")
                .map(|entry| entry.expect("dir entry").file_name().to_string_lossy().to_string())
                .collect();
            names.sort();
            names
        }
    }

    fn shifted_utm(cell_size: CellSize) -> RasterGrid {
        utm_grid(Point::new(500015.0, 3999950.0), RasterSize::with_rows_cols(8, 12), cell_size)
    }

    #[test_log::test]
    fn outputs_share_the_reference_grid() -> Result<()> {
        let setup = Setup::new();
        let candidates = vec![
            setup.add_candidate("same.tif", shifted_utm(CellSize::square(30.0))),
            setup.add_candidate("fine.tif", shifted_utm(CellSize::square(10.0))),
            setup.add_candidate("latlon.tif", latlon_grid(Point::new(-117.0, 36.1), RasterSize::square(20), 0.0003)),
        ];

        let opts = AlignOptions::builder().resample_method(ResampleMethod::Bilinear).build();
        let report = setup.align(candidates, opts)?;

        assert!(!report.has_failures());
        assert_eq!(report.aligned.len(), 3);
        for output in report.outputs() {
            assert!(setup.backend.read_grid(output)?.has_same_geometry(&setup.reference_grid()));
        }

        assert_eq!(setup.output_files(), vec!["fine_matched.tif", "latlon_matched.tif", "same_matched.tif"]);
        Ok(())
    }

    #[test]
    fn matching_grid_is_only_snapped() -> Result<()> {
        let setup = Setup::new();
        let candidate = setup.add_candidate("landuse.tif", shifted_utm(CellSize::square(30.0)));

        let report = setup.align(candidate.clone(), AlignOptions::default())?;
        assert!(report.aligned[0].plan.is_snap_only());

        let output = setup.output_dir().join("landuse_matched.tif");
        assert_eq!(
            setup.backend.calls(),
            vec![Call::Reconcile {
                src: candidate,
                dst: output.clone(),
                data_type: None,
                nodata: None,
            }]
        );

        let grid = setup.backend.read_grid(&output)?;
        assert_eq!(grid.bounding_box(), setup.reference_grid().bounding_box());
        Ok(())
    }

    #[test]
    fn output_type_and_nodata_are_forwarded() -> Result<()> {
        let setup = Setup::new();
        let candidate = setup.add_candidate("landuse.tif", shifted_utm(CellSize::square(30.0)));

        let opts = AlignOptions::builder().data_type(ArrayDataType::Uint8).nodata(255.0).build();
        setup.align(candidate, opts)?;

        assert!(matches!(
            setup.backend.calls().as_slice(),
            [Call::Reconcile {
                data_type: Some(ArrayDataType::Uint8),
                nodata: Some(255.0),
                ..
            }]
        ));
        Ok(())
    }

    #[test]
    fn single_axis_resolution_difference_is_ignored_by_default() -> Result<()> {
        let setup = Setup::new();
        let candidate = setup.add_candidate("landuse.tif", shifted_utm(CellSize::from_height_width(30.0, 10.0)));

        let report = setup.align(candidate, AlignOptions::default())?;
        assert!(report.aligned[0].plan.is_snap_only());
        assert_eq!(setup.backend.calls().len(), 1);
        Ok(())
    }

    #[test]
    fn single_axis_resolution_difference_with_any_axis_strictness() -> Result<()> {
        let setup = Setup::new();
        let candidate = setup.add_candidate("landuse.tif", shifted_utm(CellSize::from_height_width(30.0, 10.0)));

        let opts = AlignOptions::builder()
            .strictness(AxisStrictness::Any)
            .resample_method(ResampleMethod::Nearest)
            .build();
        let report = setup.align(candidate, opts)?;
        assert!(report.aligned[0].plan.needs_resampling);

        let calls = setup.backend.calls();
        assert!(matches!(calls[0], Call::Resample { cell_size, .. } if cell_size == CellSize::square(30.0)));
        Ok(())
    }

    #[test]
    fn resolution_difference_is_resampled() -> Result<()> {
        let setup = Setup::new();
        let candidate = setup.add_candidate("dem.tif", shifted_utm(CellSize::square(10.0)));

        let opts = AlignOptions::builder().resample_method(ResampleMethod::Cubic).build();
        setup.align(candidate.clone(), opts)?;

        let calls = setup.backend.calls();
        assert_eq!(calls.len(), 2);
        let Call::Resample { src, dst, method, .. } = &calls[0] else {
            panic!("Expected a resample call, got {:?}", calls[0]);
        };
        assert_eq!(src, &candidate);
        assert_eq!(*method, ResampleMethod::Cubic);
        assert!(matches!(&calls[1], Call::Reconcile { src, .. } if src == dst));
        Ok(())
    }

    #[test]
    fn resolution_difference_without_resample_method() -> Result<()> {
        let setup = Setup::new();
        let candidate = setup.add_candidate("dem.tif", shifted_utm(CellSize::square(10.0)));

        let err = setup.align(candidate, AlignOptions::default()).expect_err("resolution mismatch");
        assert!(matches!(err, Error::ResolutionMismatch { .. }));

        let msg = err.to_string();
        assert!(msg.contains("dem.tif"));
        assert!(msg.contains("(30, 30)"));
        assert!(msg.contains("(10, 10)"));

        assert!(setup.backend.calls().is_empty());
        assert!(!setup.output_dir().join("dem_matched.tif").exists());
        Ok(())
    }

    #[test]
    fn other_projection_is_reprojected_before_snapping() -> Result<()> {
        let setup = Setup::new();
        let candidate = setup.add_candidate("latlon.tif", latlon_grid(Point::new(-117.0, 36.1), RasterSize::square(20), 0.0003));

        let opts = AlignOptions::builder().resample_method(ResampleMethod::Bilinear).build();
        let report = setup.align(candidate.clone(), opts)?;
        assert!(report.aligned[0].plan.needs_reprojection);
        assert!(!report.aligned[0].plan.needs_resampling);

        let calls = setup.backend.calls();
        assert_eq!(calls.len(), 2);
        let Call::Reproject { src, dst, method } = &calls[0] else {
            panic!("Expected a reproject call, got {:?}", calls[0]);
        };
        assert_eq!(src, &candidate);
        assert_eq!(*method, ResampleMethod::Bilinear);
        assert!(matches!(&calls[1], Call::Reconcile { src, .. } if src == dst));

        let output = setup.backend.read_grid(&setup.output_dir().join("latlon_matched.tif"))?;
        assert_eq!(output.projection_name(), UTM);
        Ok(())
    }

    #[test]
    fn reprojection_defaults_to_nearest() -> Result<()> {
        let setup = Setup::new();
        let candidate = setup.add_candidate("latlon.tif", latlon_grid(Point::new(-117.0, 36.1), RasterSize::square(20), 0.0003));

        setup.align(candidate, AlignOptions::default())?;
        assert!(matches!(
            setup.backend.calls()[0],
            Call::Reproject {
                method: ResampleMethod::Nearest,
                ..
            }
        ));
        Ok(())
    }

    #[test]
    fn intermediate_rasters_are_removed() -> Result<()> {
        let setup = Setup::new();
        let candidates = vec![
            setup.add_candidate("dem.tif", shifted_utm(CellSize::square(10.0))),
            setup.add_candidate("latlon.tif", latlon_grid(Point::new(-117.0, 36.1), RasterSize::square(20), 0.0003)),
        ];

        let opts = AlignOptions::builder().resample_method(ResampleMethod::Nearest).build();
        setup.align(candidates, opts)?;

        for call in setup.backend.calls() {
            if let Call::Reproject { dst, .. } | Call::Resample { dst, .. } = call {
                assert!(!dst.exists());
            }
        }

        assert_eq!(setup.output_files(), vec!["dem_matched.tif", "latlon_matched.tif"]);
        Ok(())
    }

    #[test]
    fn missing_reference_aborts_before_processing() {
        let setup = Setup::new();
        let candidate = setup.add_candidate("dem.tif", shifted_utm(CellSize::square(30.0)));

        let res = AlignmentCoordinator::new(&setup.backend, AlignOptions::default()).align_all(
            &setup.tmp.path().join("missing.tif"),
            candidate,
            &setup.output_dir(),
        );

        assert!(matches!(res, Err(Error::MissingRaster(_))));
        assert!(setup.backend.calls().is_empty());
        assert!(!setup.output_dir().exists());
    }

    #[test]
    fn missing_candidate_aborts_the_run() {
        let setup = Setup::new();
        let candidates = vec![
            setup.tmp.path().join("missing.tif"),
            setup.add_candidate("dem.tif", shifted_utm(CellSize::square(30.0))),
        ];

        let res = setup.align(candidates, AlignOptions::default());
        assert!(matches!(res, Err(Error::MissingRaster(p)) if p.ends_with("missing.tif")));
        assert!(setup.backend.calls().is_empty());
        assert!(setup.output_files().is_empty());
    }

    #[test]
    fn continue_on_error_reports_failures() -> Result<()> {
        let setup = Setup::new();
        let candidates = vec![
            setup.tmp.path().join("missing.tif"),
            setup.add_candidate("fine.tif", shifted_utm(CellSize::square(10.0))),
            setup.add_candidate("dem.tif", shifted_utm(CellSize::square(30.0))),
        ];

        let opts = AlignOptions::builder().failure_policy(FailurePolicy::ContinueOnError).build();
        let report = setup.align(candidates, opts)?;

        assert!(report.has_failures());
        assert_eq!(report.failed.len(), 2);
        assert!(matches!(report.failed[0].error, Error::MissingRaster(_)));
        assert!(matches!(report.failed[1].error, Error::ResolutionMismatch { .. }));
        assert_eq!(report.aligned.len(), 1);
        assert_eq!(report.aligned[0].output, setup.output_dir().join("dem_matched.tif"));
        assert_eq!(setup.output_files(), vec!["dem_matched.tif"]);
        Ok(())
    }

    #[test]
    fn duplicate_output_names_are_rejected() {
        let setup = Setup::new();
        std::fs::create_dir(setup.tmp.path().join("2020")).expect("create dir");
        let candidates = vec![
            setup.add_candidate("dem.tif", shifted_utm(CellSize::square(30.0))),
            setup.add_candidate("2020/dem.tif", shifted_utm(CellSize::square(30.0))),
        ];

        let res = setup.align(candidates, AlignOptions::default());
        assert!(matches!(res, Err(Error::DuplicateOutputName { .. })));
        assert!(setup.backend.calls().is_empty());
    }

    #[test]
    fn empty_candidate_list() {
        let setup = Setup::new();
        let res = setup.align(Vec::<PathBuf>::new(), AlignOptions::default());
        assert!(matches!(res, Err(Error::NoCandidates)));
    }

    #[test]
    fn directory_of_candidates() -> Result<()> {
        let setup = Setup::new();
        let input_dir = setup.tmp.path().join("input");
        std::fs::create_dir(&input_dir)?;
        for name in ["b.tif", "a.tif"] {
            setup.backend.add_raster(&input_dir.join(name), shifted_utm(CellSize::square(30.0)));
        }

        let report = setup.align(input_dir.clone(), AlignOptions::default())?;
        let sources: Vec<PathBuf> = report.aligned.iter().map(|aligned| aligned.source.clone()).collect();
        assert_eq!(sources, vec![input_dir.join("a.tif"), input_dir.join("b.tif")]);
        Ok(())
    }

    #[test]
    fn reference_as_candidate() -> Result<()> {
        let setup = Setup::new();
        let report = setup.align(setup.reference.clone(), AlignOptions::default())?;
        assert!(report.aligned[0].plan.is_snap_only());
        assert_eq!(setup.output_files(), vec!["snap_matched.tif"]);
        Ok(())
    }

    #[test]
    fn repeated_runs_produce_the_same_geometry() -> Result<()> {
        let setup = Setup::new();
        let candidate = setup.add_candidate("latlon.tif", latlon_grid(Point::new(-117.0, 36.1), RasterSize::square(20), 0.0003));
        let output = setup.output_dir().join("latlon_matched.tif");

        setup.align(candidate.clone(), AlignOptions::default())?;
        let first = setup.backend.read_grid(&output)?;
        setup.align(candidate, AlignOptions::default())?;
        let second = setup.backend.read_grid(&output)?;

        assert!(first.has_same_geometry(&second));
        assert_ne!(first.projection_name(), LATLON);
        Ok(())
    }

    #[cfg(feature = "rayon")]
    #[test_log::test]
    fn parallel_processing_keeps_candidate_order() -> Result<()> {
        let setup = Setup::new();
        let candidates: Vec<PathBuf> = (0..8)
            .map(|i| {
                let cell_size = if i % 2 == 0 { 30.0 } else { 10.0 };
                setup.add_candidate(&format!("raster_{i}.tif"), shifted_utm(CellSize::square(cell_size)))
            })
            .collect();

        let opts = AlignOptions::builder()
            .resample_method(ResampleMethod::Nearest)
            .num_threads(4)
            .build();
        let report = setup.align(candidates.clone(), opts)?;

        let sources: Vec<PathBuf> = report.aligned.iter().map(|aligned| aligned.source.clone()).collect();
        assert_eq!(sources, candidates);
        for output in report.outputs() {
            assert!(setup.backend.read_grid(output)?.has_same_geometry(&setup.reference_grid()));
        }
        Ok(())
    }

    #[cfg(feature = "rayon")]
    #[test_log::test]
    fn parallel_processing_stops_after_a_failure() {
        let setup = Setup::with_backend(FakeBackend::with_reconcile_delay(std::time::Duration::from_millis(50)));
        let mut candidates = vec![setup.tmp.path().join("missing.tif")];
        candidates.extend((0..16).map(|i| setup.add_candidate(&format!("raster_{i}.tif"), shifted_utm(CellSize::square(30.0)))));

        let res = setup.align(candidates, AlignOptions::builder().num_threads(2).build());
        assert!(matches!(res, Err(Error::MissingRaster(p)) if p.ends_with("missing.tif")));

        // at most the candidate that was in flight on each worker is written
        let written = setup.backend.calls().len();
        assert!(written <= 2, "{written} candidates processed after the failure");
        assert!(setup.output_files().len() <= 2);
    }
}
