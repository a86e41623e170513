#![allow(dead_code)]

use ccitt_fax::{Decoder, DecoderConfig, Encoder, Status};

/// A small deterministic random number generator
pub struct XorShift(u64);

impl XorShift {
    pub fn new(seed: u64) -> Self {
        Self(seed.max(1))
    }

    pub fn next(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }

    pub fn below(&mut self, n: u64) -> u64 {
        self.next() % n
    }
}

/// Pack a row of pixels (`true` is black) in the output format of `config`
pub fn pack(pixels: &[bool], config: &DecoderConfig) -> Vec<u8> {
    let white = if config.black_is_one { 0x00 } else { 0xFF };
    let mut row = vec![white; config.raster()];
    for (i, black) in pixels.iter().enumerate() {
        if *black {
            row[i / 8] ^= 0x80 >> (i % 8);
        }
    }
    row
}

/// A random image where each row is a variation of the row above it
pub fn image(rng: &mut XorShift, config: &DecoderConfig, rows: usize) -> Vec<Vec<u8>> {
    let columns = config.columns as usize;
    let mut pixels = vec![false; columns];
    let mut image = Vec::with_capacity(rows);
    for _ in 0..rows {
        let mut i = 0;
        while i < columns {
            let max = if rng.below(8) == 0 { 200 } else { 12 };
            let len = 1 + rng.below(max) as usize;
            let end = (i + len).min(columns);
            match rng.below(6) {
                0 => pixels[i..end].iter_mut().for_each(|p| *p = !*p),
                1 => pixels[i..end].iter_mut().for_each(|p| *p = true),
                2 => pixels[i..end].iter_mut().for_each(|p| *p = false),
                _ => {}
            }
            i = end;
        }
        image.push(pack(&pixels, config));
    }
    image
}

pub fn encode(rows: &[Vec<u8>], config: &DecoderConfig) -> Vec<u8> {
    let mut encoder = Encoder::new(config).unwrap();
    for row in rows {
        encoder.encode_row(row).unwrap();
    }
    encoder.finish()
}

/// Feed the data in pieces of `chunk` bytes, with room for `room` bytes of output
pub fn decode_chunked(data: &[u8], config: &DecoderConfig, chunk: usize, room: usize) -> Vec<u8> {
    let mut decoder = Decoder::new(config.clone()).unwrap();
    let mut image = Vec::new();
    let mut output = vec![0; room];
    let mut pos = 0;
    loop {
        let end = (pos + chunk).min(data.len());
        let progress = decoder.feed(&data[pos..end], &mut output, end == data.len()).unwrap();
        pos += progress.consumed;
        image.extend_from_slice(&output[..progress.produced]);
        if progress.status == Status::EndOfData {
            return image;
        }
    }
}
