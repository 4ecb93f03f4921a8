use anyhow::{Context, Result};
use burn::tensor::backend::Backend;
use burn::tensor::ElementConversion;
use burn_ndarray::NdArray;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

mod progress_bar;
mod synthetic;

use progress_bar::BarProgress;
use stk_core::{IntensityRange, Volume};
use stk_denoise::{ConsoleProgressCallback, DenoiseConfig, DenoiseContext, ExecutionStrategy, ProgressTracker, SliceDenoiser};
use stk_io::{read_volume_glob, write_volume, TableLayout};
use stk_model::GaussianModel;

type CpuBackend = NdArray<f32>;

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Developer tasks for the seismic slice denoiser")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a noisy synthetic volume as a Parquet table
    Synthesize {
        /// Output table
        #[arg(short, long, default_value = "test_data/synthetic.parquet")]
        output: PathBuf,

        /// Volume shape as inline,crossline,time
        #[arg(long, value_delimiter = ',', default_values_t = [64usize, 48, 160])]
        shape: Vec<usize>,

        /// Standard deviation of the additive noise
        #[arg(long, default_value_t = 8.0)]
        noise: f32,

        #[arg(long, default_value_t = 42)]
        seed: u64,
    },

    /// Load a volume and report its shape, range and orthogonal sections
    Inspect {
        /// Parquet file or glob pattern
        input: String,

        /// Volume shape as inline,crossline,time
        #[arg(long, value_delimiter = ',', required = true)]
        shape: Vec<usize>,

        /// Voxel the sections pass through; defaults to the volume center
        #[arg(long, value_delimiter = ',')]
        at: Option<Vec<usize>>,
    },

    /// Denoise a volume slice by slice and write the result
    Denoise {
        /// Parquet file or glob pattern
        input: String,

        /// Volume shape as inline,crossline,time
        #[arg(long, value_delimiter = ',', required = true)]
        shape: Vec<usize>,

        /// Output table
        #[arg(short, long)]
        output: PathBuf,

        /// JSON pipeline configuration; flags below override it
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Axis to slice along
        #[arg(long)]
        axis: Option<usize>,

        /// Gaussian smoothing sigma in samples at model resolution
        #[arg(long, default_value_t = 1.0)]
        sigma: f64,

        /// Spread slices over a thread pool
        #[arg(long)]
        parallel: bool,

        /// Worker threads for --parallel
        #[arg(long)]
        threads: Option<usize>,

        /// Write original amplitudes instead of the display range
        #[arg(long)]
        amplitudes: bool,
    },

    /// Remove generated data
    Clean {
        #[arg(short, long, default_value = "test_data")]
        data_dir: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Synthesize { output, shape, noise, seed } => {
            synthesize(&output, parse_shape(&shape)?, noise, seed)?;
        }
        Commands::Inspect { input, shape, at } => {
            inspect(&input, parse_shape(&shape)?, at)?;
        }
        Commands::Denoise {
            input,
            shape,
            output,
            config,
            axis,
            sigma,
            parallel,
            threads,
            amplitudes,
        } => {
            let mut pipeline = match config {
                Some(path) => DenoiseConfig::from_json_file(&path)
                    .with_context(|| format!("loading config {}", path.display()))?,
                None => DenoiseConfig::default(),
            };
            if let Some(axis) = axis {
                pipeline = pipeline.with_axis(axis);
            }
            if parallel {
                pipeline = pipeline.with_strategy(ExecutionStrategy::Parallel { threads });
            }
            denoise(&input, parse_shape(&shape)?, &output, pipeline, sigma, amplitudes)?;
        }
        Commands::Clean { data_dir } => {
            clean(&data_dir)?;
        }
    }

    Ok(())
}

fn parse_shape(shape: &[usize]) -> Result<[usize; 3]> {
    match shape {
        [d, h, w] => Ok([*d, *h, *w]),
        _ => anyhow::bail!("shape needs three values, got {:?}", shape),
    }
}

fn synthesize(output: &Path, shape: [usize; 3], noise: f32, seed: u64) -> Result<()> {
    info!("Synthesizing {:?} volume (noise {}, seed {})", shape, noise, seed);
    if let Some(parent) = output.parent() {
        std::fs::create_dir_all(parent)?;
    }

    stk_core::volume::sample_count(shape).with_context(|| format!("shape {:?} is too large", shape))?;
    let device = Default::default();
    let values = synthetic::layered_volume(shape, noise, seed);
    let volume = Volume::<CpuBackend>::from_vec(values, shape, &device)?;
    write_volume(output, &volume, &TableLayout::default())?;

    info!("Synthetic volume written to {}", output.display());
    Ok(())
}

fn inspect(input: &str, shape: [usize; 3], at: Option<Vec<usize>>) -> Result<()> {
    let device = Default::default();
    let volume = read_volume_glob::<CpuBackend>(input, shape, &TableLayout::default(), &device)
        .with_context(|| format!("reading {}", input))?;

    println!("Shape: {:?}", volume.shape());
    match IntensityRange::compute(volume.data()) {
        Ok(range) => println!("Range: [{}, {}]", range.min, range.max),
        Err(e) => warn!("{}", e),
    }

    let at = match at {
        Some(at) => parse_shape(&at)?,
        None => shape.map(|n| n / 2),
    };
    let sections = volume.orthogonal_slices(at[0], at[1], at[2])?;
    for section in sections.iter() {
        let [rows, cols] = section.data.dims();
        println!(
            "  {:<16} {:>4} x {:<4} crosshair {:?} mean {:.3}",
            section.title(),
            rows,
            cols,
            section.crosshair,
            mean(section.data.clone())
        );
    }
    Ok(())
}

fn mean<B: Backend>(data: burn::tensor::Tensor<B, 2>) -> f32 {
    data.mean().into_scalar().elem::<f32>()
}

fn denoise(
    input: &str,
    shape: [usize; 3],
    output: &Path,
    config: DenoiseConfig,
    sigma: f64,
    amplitudes: bool,
) -> Result<()> {
    let device = Default::default();
    let volume = read_volume_glob::<CpuBackend>(input, shape, &TableLayout::default(), &device)
        .with_context(|| format!("reading {}", input))?;

    let model = GaussianModel::new([sigma, sigma])?;
    let progress = ProgressTracker::new()
        .with_callback(Arc::new(BarProgress::new()?))
        .with_callback(Arc::new(ConsoleProgressCallback::default()));
    let denoiser = SliceDenoiser::new(config, DenoiseContext::new(device, model))?.with_progress(progress);

    let denoised = denoiser.denoise(&volume)?;
    let result = if amplitudes {
        denoised.to_amplitudes()
    } else {
        denoised.volume
    };

    if let Some(parent) = output.parent() {
        std::fs::create_dir_all(parent)?;
    }
    write_volume(output, &result, &TableLayout::default())?;
    info!("Denoised volume written to {}", output.display());
    Ok(())
}

fn clean(data_dir: &Path) -> Result<()> {
    if data_dir.exists() {
        info!("Removing data directory: {}", data_dir.display());
        std::fs::remove_dir_all(data_dir)?;
        info!("Data cleaned successfully");
    } else {
        info!("No data to clean");
    }
    Ok(())
}
