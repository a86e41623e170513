mod common;

use ccitt_fax::{decode, Decoder, DecoderConfig, Encoder, FaxError, Status};
use common::{image, pack, XorShift};

const COLUMNS: u32 = 48;

fn config() -> DecoderConfig {
    DecoderConfig {
        columns: COLUMNS,
        end_of_line: true,
        encoded_byte_align: true,
        damaged_rows_before_error: 2,
        ..DecoderConfig::default()
    }
}

/// Encode each row on its own, so that it can be replaced
fn encode_rows(rows: &[Vec<u8>], config: &DecoderConfig) -> Vec<Vec<u8>> {
    let single = DecoderConfig {
        end_of_block: false,
        ..config.clone()
    };
    rows.iter()
        .map(|row| {
            let mut encoder = Encoder::new(&single).unwrap();
            encoder.encode_row(row).unwrap();
            encoder.finish()
        })
        .collect()
}

fn assemble(chunks: &[Vec<u8>], config: &DecoderConfig) -> Vec<u8> {
    let mut data = chunks.concat();
    data.extend(Encoder::new(config).unwrap().finish());
    data
}

/// An EOL, then a code that is not in the white table
const CORRUPT: [u8; 5] = [0x00, 0x01, 0x00, 0x40, 0x00];

#[test]
fn test_one_damaged_row() {
    let config = config();
    let mut rng = XorShift::new(21);
    let rows = image(&mut rng, &config, 10);
    let mut chunks = encode_rows(&rows, &config);
    chunks[4] = CORRUPT.to_vec();
    let data = assemble(&chunks, &config);

    let mut decoder = Decoder::new(config.clone()).unwrap();
    let mut output = vec![0; 1000];
    let progress = decoder.feed(&data, &mut output, true).unwrap();
    assert_eq!(progress.status, Status::EndOfData);
    assert_eq!(decoder.rows(), 10);
    assert_eq!(decoder.damaged_rows(), 1);

    let mut expected = rows.clone();
    expected[4] = vec![0xFF; config.raster()];
    assert_eq!(&output[..progress.produced], &expected.concat()[..]);
}

#[test]
fn test_damage_is_not_consecutive() {
    let config = config();
    let mut rng = XorShift::new(22);
    let rows = image(&mut rng, &config, 10);
    let mut chunks = encode_rows(&rows, &config);
    for i in [1, 2, 4, 5, 7, 8] {
        chunks[i] = CORRUPT.to_vec();
    }
    let data = assemble(&chunks, &config);
    let decoded = decode(&data, &config).unwrap();
    assert_eq!(decoded.len(), 10 * config.raster());
}

#[test]
fn test_too_many_damaged_rows() {
    let config = config();
    let mut rng = XorShift::new(23);
    let rows = image(&mut rng, &config, 10);
    let mut chunks = encode_rows(&rows, &config);
    for chunk in &mut chunks[3..6] {
        *chunk = CORRUPT.to_vec();
    }
    let data = assemble(&chunks, &config);
    assert_eq!(
        decode(&data, &config),
        Err(FaxError::TooManyDamagedRows { row: 5, count: 3 })
    );
}

#[test]
fn test_damage_without_recovery() {
    let config = DecoderConfig {
        damaged_rows_before_error: 0,
        ..config()
    };
    let mut rng = XorShift::new(24);
    let rows = image(&mut rng, &config, 4);
    let mut chunks = encode_rows(&rows, &config);
    chunks[2] = CORRUPT.to_vec();
    let data = assemble(&chunks, &config);
    assert_eq!(
        decode(&data, &config),
        Err(FaxError::TooManyDamagedRows { row: 2, count: 1 })
    );

    let lenient = DecoderConfig {
        errors_as_end_of_data: true,
        ..config
    };
    assert_eq!(decode(&data, &lenient).unwrap(), rows[..2].concat());
}

#[test]
fn test_mixed_mode_recovery() {
    let config = DecoderConfig {
        k: 1,
        ..config()
    };
    let mut rng = XorShift::new(25);
    let rows = image(&mut rng, &config, 6);
    let mut chunks = encode_rows(&rows, &config);
    // an EOL with a 1-D tag, then an invalid code
    chunks[3] = vec![0x00, 0x01, 0x80, 0x40, 0x00];
    let data = assemble(&chunks, &config);

    let decoded = decode(&data, &config).unwrap();
    let mut expected = rows.clone();
    expected[3] = vec![0xFF; config.raster()];
    assert_eq!(decoded, expected.concat());
}

/// Runs of 2, 4 and 7 pixels, whose codes all end in a one bit
fn short_runs() -> Vec<bool> {
    let runs = [2, 2, 4, 4, 7, 2, 2, 4, 4, 2, 7, 4, 4];
    let mut pixels = Vec::new();
    for (i, len) in runs.iter().enumerate() {
        pixels.extend(std::iter::repeat(i % 2 == 1).take(*len));
    }
    pixels
}

#[test]
fn test_single_bit_errors() {
    let config = config();
    let mut rng = XorShift::new(26);
    let mut rows = image(&mut rng, &config, 10);
    let pixels = short_runs();
    assert_eq!(pixels.len(), COLUMNS as usize);
    rows[4] = pack(&pixels, &config);
    let chunks = encode_rows(&rows, &config);
    let raster = config.raster();

    // skip the fill bits and the EOL
    for bit in 16..chunks[4].len() * 8 {
        let mut damaged = chunks.clone();
        damaged[4][bit / 8] ^= 0x80 >> (bit % 8);
        let data = assemble(&damaged, &config);

        let mut decoder = Decoder::new(config.clone()).unwrap();
        let mut output = vec![0; 1000];
        let progress = decoder.feed(&data, &mut output, true).unwrap();
        assert_eq!(progress.status, Status::EndOfData, "bit {}", bit);
        assert_eq!(decoder.rows(), 10, "bit {}", bit);
        assert!(decoder.damaged_rows() <= 1, "bit {}", bit);
        assert_eq!(progress.produced, 10 * raster, "bit {}", bit);

        for (i, row) in output[..progress.produced].chunks(raster).enumerate() {
            if i != 4 {
                assert_eq!(row, &rows[i][..], "bit {} row {}", bit, i);
            }
        }
    }
}
