use std::{
    path::PathBuf,
    sync::mpsc,
    thread,
};

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};

use pixseq::{
    PixelDecoderBuilder, PixelEncoderBuilder, RasterFormat, DEFAULT_ENCODE_CHUNK,
    DEFAULT_RESTORE_CHUNK,
};

/// pixseq - paint sequencing reads into an image and back
///
/// Each base becomes one pixel: the nucleotide sets the hue and the quality score the
/// saturation. Restoring is lossy (qualities within one step, N comes back as A).
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    #[clap(subcommand)]
    command: Command,

    /// More logging
    #[clap(short = 'v', long = "verbose", global = true)]
    verbose: bool,

    /// Only log warnings and errors, and hide the progress bar
    #[clap(short = 'q', long = "quiet", global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Encode a FASTQ file (optionally compressed) into <FASTQ>.<format>
    Encode {
        /// Input FASTQ file
        #[clap(value_name = "FASTQ")]
        input: PathBuf,

        /// Write record headers to <FASTQ>.hdr so restore can rebuild records
        #[clap(short = 'p', long = "preserve-headers")]
        preserve_headers: bool,

        /// Bases painted between progress updates
        #[clap(short = 'c', long = "chunk-size", default_value_t = DEFAULT_ENCODE_CHUNK)]
        chunk_size: usize,

        /// Raster container (png, bmp, tiff)
        #[clap(short = 'f', long = "format", default_value = "png")]
        format: RasterFormat,
    },
    /// Restore an encoded image into <IMAGE>.restored.fastq
    Restore {
        /// Encoded image
        #[clap(value_name = "IMAGE")]
        image: PathBuf,

        /// Pixels decoded between progress updates
        #[clap(short = 'c', long = "chunk-size", default_value_t = DEFAULT_RESTORE_CHUNK)]
        chunk_size: usize,
    },
}

fn init_logger(args: &Args) {
    let level = if args.verbose {
        "debug"
    } else if args.quiet {
        "warn"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn progress_bar(quiet: bool) -> Result<ProgressBar> {
    if quiet {
        return Ok(ProgressBar::hidden());
    }
    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos:>3}% {msg}")?
            .progress_chars("=> "),
    );
    Ok(pb)
}

/// Runs `job` on a worker thread, relaying its progress reports to `pb`
///
/// The worker sends percentages through a channel; the main thread owns the progress bar and
/// only redraws it. The job is not interruptible once started.
fn run_with_progress<T, J>(pb: &ProgressBar, job: J) -> Result<T>
where
    T: Send + 'static,
    J: FnOnce(&mut dyn FnMut(f64)) -> pixseq::Result<T> + Send + 'static,
{
    let (tx, rx) = mpsc::channel::<f64>();
    let handle = thread::spawn(move || {
        let mut relay = |percent: f64| {
            // the receiver only disappears once the worker is done
            let _ = tx.send(percent);
        };
        job(&mut relay)
    });

    for percent in rx {
        pb.set_position(percent.round() as u64);
    }

    let outcome = handle
        .join()
        .map_err(|_| anyhow!("worker thread panicked"))?;
    Ok(outcome?)
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(&args);
    let pb = progress_bar(args.quiet)?;

    match args.command {
        Command::Encode {
            input,
            preserve_headers,
            chunk_size,
            format,
        } => {
            info!("Encoding {}", input.display());
            debug!(
                "preserve_headers={preserve_headers} chunk_size={chunk_size} format={format}"
            );
            let encoder = PixelEncoderBuilder::default()
                .preserve_headers(preserve_headers)
                .chunk_size(chunk_size)
                .format(format)
                .build();
            pb.set_message("encoding");
            let summary = run_with_progress(&pb, move |progress| {
                encoder.encode_path(&input, progress)
            })?;
            pb.finish_and_clear();

            info!(
                "Painted {} bases on a {}x{} canvas",
                summary.total_bases, summary.dimensions.width, summary.dimensions.height
            );
            if let Some(path) = &summary.sidecar_path {
                info!("Headers saved to {}", path.display());
            }
            info!(
                "Saved {} ({:.2} MiB) in {:.2}s",
                summary.output_path.display(),
                summary.size_mib(),
                summary.seconds()
            );
        }
        Command::Restore { image, chunk_size } => {
            info!("Restoring {}", image.display());
            debug!("chunk_size={chunk_size}");
            let decoder = PixelDecoderBuilder::default().chunk_size(chunk_size).build();
            pb.set_message("restoring");
            let summary =
                run_with_progress(&pb, move |progress| decoder.restore(&image, progress))?;
            pb.finish_and_clear();

            if summary.used_sidecar {
                info!(
                    "Rebuilt {} records from the header sidecar",
                    summary.num_records
                );
            } else {
                info!("No header sidecar found, wrote a single record");
            }
            info!(
                "Restored {} bases to {} in {:.2}s",
                summary.total_bases,
                summary.output_path.display(),
                summary.seconds()
            );
        }
    }

    Ok(())
}
