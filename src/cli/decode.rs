use std::{fs::File, io::Read};

use ccitt_fax::{ascii_art, Decoder, DecoderConfig, Status, UNICODE};
use color_eyre::eyre::{self, eyre};
use image::{GrayImage, ImageFormat, Luma};
use log::info;
use prettytable::{cell, format, row, Table};

use super::opt::{DecodeOptions, Format};

/// A decoded image, one row of `raster` bytes per line
pub struct Bitmap {
    pub config: DecoderConfig,
    pub data: Vec<u8>,
}

impl Bitmap {
    pub fn rows(&self) -> usize {
        self.data.len() / self.config.raster()
    }

    fn is_black(&self, x: usize, y: usize) -> bool {
        let byte = self.data[y * self.config.raster() + x / 8];
        (byte & (0x80 >> (x % 8)) != 0) == self.config.black_is_one
    }

    /// Binary PBM, where `1` is black
    pub fn write_pbm(&self, out: &mut Vec<u8>) {
        let columns = self.config.columns as usize;
        let bytes = columns.div_ceil(8);
        out.extend_from_slice(format!("P4\n{} {}\n", columns, self.rows()).as_bytes());
        for line in self.data.chunks_exact(self.config.raster()) {
            let line = &line[..bytes];
            if self.config.black_is_one {
                out.extend_from_slice(line);
            } else {
                out.extend(line.iter().map(|byte| !byte));
            }
        }
    }

    pub fn to_image(&self) -> GrayImage {
        GrayImage::from_fn(self.config.columns, self.rows() as u32, |x, y| {
            if self.is_black(x as usize, y as usize) {
                Luma([0])
            } else {
                Luma([255])
            }
        })
    }
}

struct Summary {
    rows: u32,
    damaged: u32,
    bytes_in: usize,
    bytes_out: usize,
}

fn decode_stream<R: Read>(
    mut reader: R,
    config: DecoderConfig,
    chunk_size: usize,
) -> eyre::Result<(Bitmap, Summary)> {
    let mut decoder = Decoder::new(config)?;
    let mut input = vec![0; chunk_size.max(1)];
    let mut output = vec![0; decoder.config().raster() * 64];
    let mut data = Vec::new();
    let (mut start, mut end) = (0, 0);
    let mut at_end = false;
    let mut bytes_in = 0;

    loop {
        if start == end && !at_end {
            start = 0;
            end = reader.read(&mut input)?;
            at_end = end == 0;
        }
        let progress = decoder.feed(&input[start..end], &mut output, at_end)?;
        start += progress.consumed;
        bytes_in += progress.consumed;
        data.extend_from_slice(&output[..progress.produced]);
        match progress.status {
            Status::EndOfData => break,
            Status::NeedOutput => {}
            Status::NeedInput if at_end => break,
            Status::NeedInput => {
                // keep the unconsumed tail
                input.copy_within(start..end, 0);
                end -= start;
                start = 0;
                if end == input.len() {
                    input.resize(input.len() * 2, 0);
                }
                let n = reader.read(&mut input[end..])?;
                end += n;
                at_end = n == 0;
            }
        }
    }

    let summary = Summary {
        rows: decoder.rows(),
        damaged: decoder.damaged_rows(),
        bytes_in,
        bytes_out: data.len(),
    };
    let config = decoder.config().clone();
    Ok((Bitmap { config, data }, summary))
}

fn print_summary(summary: &Summary) {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
    table.set_titles(row!["rows", "damaged", "bytes in", "bytes out"]);
    table.add_row(row![
        summary.rows,
        summary.damaged,
        summary.bytes_in,
        summary.bytes_out,
    ]);
    table.printstd();
}

pub fn run(opt: DecodeOptions) -> eyre::Result<()> {
    let config = opt.params.config()?;
    let file = File::open(&opt.file)
        .map_err(|err| eyre!("Failed to open '{}': {}", opt.file.display(), err))?;
    let (bitmap, summary) = decode_stream(file, config, opt.chunk_size)?;
    info!("Decoded {} rows of {} pixels", summary.rows, bitmap.config.columns);

    match opt.format {
        Format::Pbm => {
            let mut out = Vec::new();
            bitmap.write_pbm(&mut out);
            let out_path = opt.out.unwrap_or_else(|| opt.file.with_extension("pbm"));
            std::fs::write(&out_path, out)?;
            info!("Saved image as '{}'", out_path.display());
        }
        Format::Png => {
            if bitmap.rows() == 0 {
                return Err(eyre!("No rows to save"));
            }
            let out_path = opt.out.unwrap_or_else(|| opt.file.with_extension("png"));
            bitmap
                .to_image()
                .save_with_format(&out_path, ImageFormat::Png)?;
            info!("Saved image as '{}'", out_path.display());
        }
        Format::Ascii => {
            let mut out = String::new();
            let config = &bitmap.config;
            ascii_art(
                &mut out,
                &bitmap.data,
                config.columns,
                config.raster(),
                config.black_is_one,
                UNICODE,
            )?;
            match &opt.out {
                Some(out_path) => std::fs::write(out_path, out)?,
                None => print!("{}", out),
            }
        }
    }

    print_summary(&summary);
    Ok(())
}

#[cfg(test)]
mod tests {
    use ccitt_fax::{DecoderConfig, Encoder};

    use super::{decode_stream, Bitmap};

    #[test]
    fn test_pbm() {
        let bitmap = Bitmap {
            config: DecoderConfig {
                decoded_byte_align: 2,
                ..DecoderConfig::group4(3)
            },
            data: vec![0b0101_1111, 0xFF, 0xFF, 0xFF],
        };
        assert_eq!(bitmap.rows(), 2);
        let mut out = Vec::new();
        bitmap.write_pbm(&mut out);
        assert_eq!(out, b"P4\n3 2\n\xA0\x00");
        let image = bitmap.to_image();
        assert_eq!(image.get_pixel(0, 0).0, [0]);
        assert_eq!(image.get_pixel(1, 0).0, [255]);
    }

    #[test]
    fn test_decode_stream_in_chunks() {
        let config = DecoderConfig::group4(20);
        let rows = [[0xF0, 0x0F, 0xFF], [0x00, 0xFF, 0x0F], [0xAA, 0x55, 0xAF]];
        let mut encoder = Encoder::new(&config).unwrap();
        for row in &rows {
            encoder.encode_row(row).unwrap();
        }
        let data = encoder.finish();
        for chunk_size in [1, 2, 4096] {
            let (bitmap, summary) = decode_stream(&data[..], config.clone(), chunk_size).unwrap();
            assert_eq!(bitmap.data, rows.concat());
            assert_eq!(summary.rows, 3);
            assert_eq!(summary.bytes_in, data.len());
        }
    }
}
