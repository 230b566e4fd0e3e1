//! snapjpeg CLI - Raw frame to JPEG converter
//!
//! A command-line interface for the snapjpeg encoding library.
//! Reads headerless RGB565, RGB888, or RGBA8888 pixel dumps and writes
//! baseline JFIF streams.

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, ValueEnum};

use snapjpeg::jpeg::JpegOptions;
use snapjpeg::PixelFormat;

/// Encode raw RGB pixel dumps as baseline JPEG.
///
/// Input is a headerless dump, so the dimensions and pixel layout must be
/// given on the command line.
#[derive(Parser, Debug)]
#[command(name = "snapjpeg")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "\
EXAMPLES:
    snapjpeg frame.raw --width 640 --height 480           Encode a 24-bit RGB dump
    snapjpeg frame.raw --width 640 --height 480 -q 3      Near-lossless output
    snapjpeg cap.565 --width 320 --height 240 -f rgb565   16-bit framebuffer capture
    snapjpeg - --width 640 --height 480 -o out.jpg        Read pixel data from stdin")]
struct Args {
    /// Input raw pixel dump, or - for stdin
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output file path, or - for stdout (defaults to INPUT with a .jpg extension)
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Frame width in pixels
    #[arg(long, value_name = "PIXELS")]
    width: u32,

    /// Frame height in pixels
    #[arg(long, value_name = "PIXELS")]
    height: u32,

    /// Pixel layout of the input dump
    #[arg(short, long, value_enum, default_value = "rgb888")]
    format: FormatArg,

    /// Quality tier (1 = smallest file, 3 = near lossless)
    #[arg(short, long, default_value = "1", value_parser = clap::value_parser!(u8).range(1..=3))]
    quality: u8,

    /// Show verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(long)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    /// 16-bit packed 5-6-5, little-endian words
    Rgb565,
    /// 24-bit RGB, three bytes per pixel
    Rgb888,
    /// 32-bit RGBA, alpha byte ignored
    Rgba8888,
}

impl From<FormatArg> for PixelFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Rgb565 => PixelFormat::Rgb565,
            FormatArg::Rgb888 => PixelFormat::Rgb888,
            FormatArg::Rgba8888 => PixelFormat::Rgba8888,
        }
    }
}

fn main() {
    // Show concise help if no arguments provided
    if std::env::args().len() == 1 {
        print_concise_help();
        std::process::exit(0);
    }

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn print_concise_help() {
    eprintln!("snapjpeg - Encode raw RGB pixel dumps as baseline JPEG");
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("    snapjpeg <INPUT> --width <PIXELS> --height <PIXELS> [OPTIONS]");
    eprintln!();
    eprintln!("EXAMPLES:");
    eprintln!("    snapjpeg frame.raw --width 640 --height 480           Encode a 24-bit RGB dump");
    eprintln!("    snapjpeg cap.565 --width 320 --height 240 -f rgb565   16-bit framebuffer capture");
    eprintln!();
    eprintln!("For more options, run: snapjpeg --help");
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let is_stdin = args.input.as_os_str() == "-";
    let is_stdout = args
        .output
        .as_ref()
        .map(|p| p.as_os_str() == "-")
        .unwrap_or(false);

    // Load input pixels
    let start = Instant::now();
    let pixels = if is_stdin {
        read_stdin().map_err(|e| format!("Can't read from stdin: {e}"))?
    } else {
        fs::read(&args.input).map_err(|e| {
            if args.input.exists() {
                format!("Can't read '{}': {e}", args.input.display())
            } else {
                format!(
                    "File not found: '{}'. Check that the path is correct.",
                    args.input.display()
                )
            }
        })?
    };
    let load_time = start.elapsed();

    if args.verbose {
        let input = &args.input;
        let width = args.width;
        let height = args.height;
        let format = args.format;
        eprintln!("Loaded: {input:?}");
        eprintln!("  Dimensions: {width}x{height}");
        eprintln!("  Pixel format: {format:?}");
        eprintln!("  Load time: {load_time:.2?}");
    }

    // When reading from stdin, output must be specified
    let output_path = if is_stdin {
        args.output.clone().ok_or(
            "When reading from stdin (-), you must specify an output file with -o/--output",
        )?
    } else {
        args.output.clone().unwrap_or_else(|| {
            let mut path = args.input.clone();
            path.set_extension("jpg");
            path
        })
    };

    let options = JpegOptions::builder(args.width, args.height)
        .pixel_format(args.format.into())
        .quality(args.quality)
        .build();

    // Encode
    let encode_start = Instant::now();
    let jpeg = snapjpeg::jpeg::encode(&pixels, &options)?;
    let encode_time = encode_start.elapsed();

    let input_size = pixels.len() as u64;
    let output_size = jpeg.len() as u64;
    let ratio = if input_size > 0 {
        (output_size as f64 / input_size as f64) * 100.0
    } else {
        0.0
    };

    // Write output
    if is_stdout {
        io::stdout()
            .write_all(&jpeg)
            .map_err(|e| format!("Can't write to stdout: {e}"))?;
    } else {
        fs::write(&output_path, &jpeg).map_err(|e| {
            format!(
                "Can't write to '{}': {}. Check that the directory exists and is writable.",
                output_path.display(),
                e
            )
        })?;
    }

    // Output results (to stderr if writing to stdout, to avoid mixing with output data)
    let print_results = |msg: &str| {
        if is_stdout {
            eprintln!("{msg}");
        } else {
            println!("{msg}");
        }
    };

    let output_display = if is_stdout {
        "<stdout>".to_string()
    } else {
        output_path.display().to_string()
    };

    if args.verbose {
        let quality = args.quality;
        eprintln!("Output: {output_display}");
        eprintln!("  Quality tier: {quality}");
        eprintln!("  Encode time: {encode_time:.2?}");
        eprintln!(
            "  Size: {} -> {} ({:.1}%)",
            format_size(input_size),
            format_size(output_size),
            ratio
        );
    } else if !args.quiet {
        print_results(&format!(
            "{} -> {} ({:.1}%)",
            format_size(input_size),
            format_size(output_size),
            ratio
        ));
    }

    Ok(())
}

/// Read all bytes from stdin
fn read_stdin() -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    let mut buffer = Vec::new();
    io::stdin().read_to_end(&mut buffer)?;
    Ok(buffer)
}

fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        let mb = bytes as f64 / MB as f64;
        format!("{mb:.2} MB")
    } else if bytes >= KB {
        let kb = bytes as f64 / KB as f64;
        format!("{kb:.2} KB")
    } else {
        format!("{bytes} B")
    }
}
