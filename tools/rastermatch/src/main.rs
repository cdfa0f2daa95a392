use std::path::PathBuf;

use align::{AlignOptions, AxisStrictness, CandidateInput, FailurePolicy};
use clap::Parser;
use env_logger::{Env, TimestampPrecision};
use geo::{ArrayDataType, ResampleMethod};

pub type Result<T> = anyhow::Result<T>;

#[derive(Parser, Debug)]
#[clap(name = "rastermatch", about = "Align rasters onto the pixel grid of a reference raster")]
pub struct Opt {
    /// The raster that defines the target grid
    #[arg(long = "reference", short = 'r')]
    pub reference: PathBuf,

    /// Rasters to align, a single directory is expanded to the GeoTiff files it contains
    #[arg(long = "input", short = 'i', num_args = 1.., required = true)]
    pub input: Vec<PathBuf>,

    #[arg(long = "output", short = 'o')]
    pub output: PathBuf,

    #[arg(long = "data-type", value_name = "uint8|int16|uint16|int32|uint32|float32|float64")]
    pub data_type: Option<ArrayDataType>,

    #[arg(long = "nodata", allow_negative_numbers = true)]
    pub nodata: Option<f64>,

    #[arg(long = "resample", value_name = "nearest|bilinear|cubic")]
    pub resample: Option<ResampleMethod>,

    /// Resample when the resolution differs on a single axis
    #[arg(long = "any-axis")]
    pub any_axis: bool,

    /// Continue with the remaining rasters when a raster fails
    #[arg(long = "keep-going")]
    pub keep_going: bool,

    #[arg(long = "threads", default_value = "1")]
    pub threads: usize,

    /// Directory containing the proj.db file
    #[arg(long = "proj-db")]
    pub proj_db: Option<PathBuf>,

    #[arg(long = "gdal-debug")]
    pub gdal_debug: bool,
}

impl Opt {
    fn candidates(&self) -> CandidateInput {
        match self.input.as_slice() {
            [single] => CandidateInput::Path(single.clone()),
            paths => CandidateInput::List(paths.to_vec()),
        }
    }

    fn align_options(&self) -> AlignOptions {
        AlignOptions::builder()
            .maybe_data_type(self.data_type)
            .maybe_nodata(self.nodata)
            .maybe_resample_method(self.resample)
            .strictness(if self.any_axis { AxisStrictness::Any } else { AxisStrictness::Both })
            .failure_policy(if self.keep_going {
                FailurePolicy::ContinueOnError
            } else {
                FailurePolicy::AbortRun
            })
            .num_threads(self.threads)
            .build()
    }
}

fn main() -> Result<()> {
    let opt = Opt::parse();

    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp(Some(TimestampPrecision::Millis))
        .init();

    let gdal_config = geo::RuntimeConfiguration::builder()
        .maybe_proj_db(opt.proj_db.as_deref())
        .gdal_debug_log(opt.gdal_debug)
        .config_options(vec![("GDAL_PAM_ENABLED".into(), "NO".into())])
        .build();
    gdal_config.apply()?;

    let report = align::align_all(&opt.reference, opt.candidates(), &opt.output, &opt.align_options())?;

    for aligned in &report.aligned {
        log::info!("{} -> {} ({})", aligned.source.display(), aligned.output.display(), aligned.plan);
    }

    if report.has_failures() {
        for failed in &report.failed {
            log::error!("{}: {}", failed.source.display(), failed.error);
        }

        anyhow::bail!("Failed to align {} of {} rasters", report.failed.len(), report.failed.len() + report.aligned.len());
    }

    Ok(())
}
