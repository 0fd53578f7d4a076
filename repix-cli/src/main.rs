//! repix - convert a PNG still image to a baseline JPEG.

use anyhow::Context;
use clap::Parser;
use console::style;
use repix_images::{JpegEncoder, PngDecoder};
use std::path::PathBuf;
use tracing::debug;

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(name = "repix")]
#[command(version)]
#[command(about = "Convert a PNG image to a baseline JPEG")]
#[command(long_about = "Convert a PNG image to a baseline JPEG.\n\n\
    Accepts 8-bit, non-interlaced PNGs in any color type; alpha channels\n\
    are dropped. Output is a JFIF 1.1 stream with 4:4:4 sampling.\n\n\
    EXAMPLES:\n    \
    repix photo.png photo.jpg\n    \
    repix photo.png photo.jpg 92")]
struct Args {
    /// Input PNG file
    input: PathBuf,

    /// Output JPEG file
    output: PathBuf,

    /// JPEG quality (1-100)
    #[arg(default_value_t = 85)]
    quality: i64,

    /// Verbose output (debug-level logging)
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    // try_parse so that missing arguments exit with code 1; --help and
    // --version still exit cleanly.
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            use clap::error::ErrorKind;
            let _ = e.print();
            let code = match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
            std::process::exit(code);
        }
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(if args.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_target(false)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    if let Err(e) = run(&args) {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    let quality = args.quality.clamp(1, 100) as u8;

    println!(
        "{} {}",
        style("Loading PNG:").cyan(),
        args.input.display()
    );
    let png_data = std::fs::read(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    debug!(bytes = png_data.len(), "input file read");

    let mut decoder = PngDecoder::new();
    let image = decoder
        .decode(&png_data)
        .with_context(|| format!("failed to decode {}", args.input.display()))?;
    println!(
        "{} {}x{}",
        style("PNG loaded:").cyan(),
        image.width(),
        image.height()
    );

    println!(
        "{} quality {}...",
        style("Encoding JPEG with").cyan(),
        quality
    );
    let jpeg = JpegEncoder::new(quality).encode(&image);

    std::fs::write(&args.output, &jpeg)
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    println!(
        "{} {}",
        style("Successfully converted to:").green(),
        args.output.display()
    );
    println!("File size: {} bytes", jpeg.len());

    Ok(())
}
