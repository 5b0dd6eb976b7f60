// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr};
use jpeglite::{DecoderOptions, EncoderOptions, Quality, decode_with_options, encode_with_options};
use jpeglite_cli::{dec, enc, report};

#[derive(Parser)]
#[command(about = "Lossy block-DCT image codec")]
struct Opt {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compress a PNG image
    Encode {
        /// Input PNG file
        input: PathBuf,

        /// Output container file
        output: PathBuf,

        /// Quality, 1 (smallest) to 100 (best)
        #[arg(short, long, default_value_t = 75)]
        quality: u32,

        /// Edge length of the square transform blocks
        #[arg(short, long, default_value_t = 8)]
        block_size: usize,
    },
    /// Decompress a container into a PNG image
    Decode {
        /// Input container file
        input: PathBuf,

        /// Output PNG file
        output: PathBuf,

        /// Reject images with more pixels than this
        #[arg(long)]
        pixel_limit: Option<usize>,
    },
    /// Print the header of a container
    Info {
        input: PathBuf,

        /// Also list the size of every sub-stream
        #[arg(short, long)]
        verbose: bool,
    },
    /// Encode a PNG at a range of qualities and print the resulting sizes
    Sweep {
        input: PathBuf,

        #[arg(long, default_value_t = 2)]
        from: u32,

        #[arg(long, default_value_t = 98)]
        to: u32,

        #[arg(long, default_value_t = 2)]
        step: u32,

        #[arg(short, long, default_value_t = 8)]
        block_size: usize,
    },
}

fn read(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).wrap_err_with(|| format!("Cannot read {}", path.display()))
}

fn main() -> Result<()> {
    color_eyre::install()?;

    #[cfg(feature = "tracing-subscriber")]
    {
        use tracing_subscriber::{EnvFilter, fmt, prelude::*};
        tracing_subscriber::registry()
            .with(fmt::layer())
            .with(EnvFilter::from_default_env())
            .init();
    }

    match Opt::parse().command {
        Command::Encode {
            input,
            output,
            quality,
            block_size,
        } => {
            let image = dec::png::from_png(&read(&input)?)?;
            let options = EncoderOptions::default()
                .with_quality(Quality::new(quality)?)
                .with_block_size(block_size);
            let bytes = encode_with_options(&image, &options)?;
            println!(
                "{} x {} -> {} bytes ({:.4} bpp)",
                image.width(),
                image.height(),
                bytes.len(),
                bytes.len() as f64 * 8.0 / (image.width() * image.height()) as f64
            );
            fs::write(&output, bytes)
                .wrap_err_with(|| format!("Cannot write {}", output.display()))?;
        }
        Command::Decode {
            input,
            output,
            pixel_limit,
        } => {
            let options = DecoderOptions { pixel_limit };
            let image = decode_with_options(&read(&input)?, &options)?;
            let file = fs::File::create(&output)
                .wrap_err_with(|| format!("Cannot create {}", output.display()))?;
            enc::png::to_png(&image, std::io::BufWriter::new(file))?;
        }
        Command::Info { input, verbose } => {
            let bytes = read(&input)?;
            print!("{}", report::format_header(&jpeglite::read_header(&bytes)?));
            if verbose {
                print!("{}", report::format_stats(&jpeglite::inspect(&bytes)?));
            }
        }
        Command::Sweep {
            input,
            from,
            to,
            step,
            block_size,
        } => {
            let image = dec::png::from_png(&read(&input)?)?;
            let qualities = report::quality_range(from, to, step)?;
            let points = report::sweep(&image, &qualities, block_size)?;
            print!("{}", report::format_sweep(&points));
        }
    }
    Ok(())
}
