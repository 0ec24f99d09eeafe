use chrono::Local;
use clap::Parser;
use env_logger::{Builder, Env, Target};
use log::{error, info};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use s2stack::config::{Config, ConfigOverrides};
use s2stack::processor::BatchProcessor;

/// Stack Sentinel-2 L2A bands into a single compressed GeoTIFF.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Products to stack (.SAFE directories or .zip archives)
    products: Vec<PathBuf>,

    /// JSON configuration file; command-line values override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output folder (default: GTIFF_PRODUCT inside each .SAFE)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Stack to build: "all" or "rgbn"
    #[arg(short, long)]
    product: Option<String>,

    /// Upsampling for the 20m and 60m bands: nearest, bilinear or cubic
    #[arg(short, long)]
    resample: Option<String>,

    /// Skip the .aux.xml statistics sidecar
    #[arg(long)]
    no_xml: bool,

    /// Skip the .ovr pyramids
    #[arg(long)]
    no_pyramids: bool,

    /// GeoTIFF tile size in pixels
    #[arg(long)]
    block_size: Option<usize>,

    /// Threads for GDAL's codecs (default: all CPUs)
    #[arg(long)]
    threads: Option<usize>,

    /// Append log output to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            products: self.products.clone(),
            output_directory: self.output.clone(),
            product: self.product.clone(),
            resampling: self.resample.clone(),
            xml: self.no_xml.then_some(false),
            pyramids: self.no_pyramids.then_some(false),
            block_size: self.block_size,
            num_threads: self.threads,
        }
    }
}

fn logger_builder(log_file: Option<&Path>) -> std::io::Result<Builder> {
    let mut builder = Builder::from_env(Env::default().default_filter_or("info"));
    builder.format(|buf, record| {
        writeln!(
            buf,
            "{} - {}",
            Local::now().format("%d-%m-%Y - %H:%M:%S"),
            record.args()
        )
    });

    if let Some(path) = log_file {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        builder.target(Target::Pipe(Box::new(file)));
    }

    Ok(builder)
}

fn run(cli: &Cli) -> s2stack::Result<Vec<PathBuf>> {
    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    let config = config.with_overrides(cli.overrides())?;

    BatchProcessor::new(config).process()
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match logger_builder(cli.log_file.as_deref()) {
        Ok(mut builder) => builder.init(),
        Err(e) => {
            eprintln!("Could not open log file: {e}");
            return ExitCode::FAILURE;
        }
    }

    match run(&cli) {
        Ok(outputs) => {
            for output in outputs {
                info!("Written: {}", output.display());
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
