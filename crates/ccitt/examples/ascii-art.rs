use std::path::PathBuf;

use ccitt_fax::{ascii_art, decode, DecoderConfig, UNICODE};
use clap::Parser;
use color_eyre::eyre;

#[derive(Parser)]
/// Load a Group 4 encoded file and write it to console
struct Options {
    /// Path to input file
    file: PathBuf,
    /// Width of the image
    #[clap(long)]
    width: u32,
    /// Invert black and white
    #[clap(long)]
    invert: bool,
}

fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    let opt = Options::parse();
    let file = std::fs::read(&opt.file)?;

    let config = DecoderConfig {
        black_is_one: true,
        ..DecoderConfig::group4(opt.width)
    };
    let bitmap = decode(&file, &config)?;

    let mut string = String::new();
    ascii_art(
        &mut string,
        &bitmap,
        config.columns,
        config.raster(),
        !opt.invert,
        UNICODE,
    )?;
    print!("{}", string);

    Ok(())
}
