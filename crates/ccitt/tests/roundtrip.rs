mod common;

use ccitt_fax::{decode, DecoderConfig};
use common::{encode, image, pack, XorShift};

fn roundtrip(config: DecoderConfig, rows: usize, seed: u64) {
    let mut rng = XorShift::new(seed);
    let rows = image(&mut rng, &config, rows);
    let data = encode(&rows, &config);
    let decoded = decode(&data, &config).unwrap();
    assert_eq!(decoded, rows.concat(), "{:?}", config);
}

#[test]
fn test_group3_1d() {
    for columns in [8, 37, 1728] {
        roundtrip(DecoderConfig::group3(columns), 24, u64::from(columns));
    }
}

#[test]
fn test_group3_1d_with_eol() {
    let config = DecoderConfig {
        columns: 203,
        end_of_line: true,
        black_is_one: true,
        ..DecoderConfig::default()
    };
    roundtrip(config, 30, 7);
}

#[test]
fn test_group3_mixed() {
    for (k, align) in [(2, false), (4, true)] {
        let config = DecoderConfig {
            columns: 100,
            k,
            end_of_line: true,
            encoded_byte_align: align,
            ..DecoderConfig::default()
        };
        roundtrip(config, 40, 11);
    }
}

#[test]
fn test_group3_mixed_without_eol() {
    let config = DecoderConfig {
        columns: 64,
        k: 3,
        ..DecoderConfig::default()
    };
    roundtrip(config, 25, 5);
}

#[test]
fn test_group4() {
    for columns in [1, 16, 45, 2480] {
        roundtrip(DecoderConfig::group4(columns), 32, u64::from(columns) + 3);
    }
}

#[test]
fn test_group4_byte_aligned() {
    let config = DecoderConfig {
        encoded_byte_align: true,
        black_is_one: true,
        ..DecoderConfig::group4(77)
    };
    roundtrip(config, 20, 13);
}

#[test]
fn test_group4_without_eofb() {
    let config = DecoderConfig {
        end_of_block: false,
        ..DecoderConfig::group4(300)
    };
    roundtrip(config, 20, 17);
}

#[test]
fn test_decoded_byte_align() {
    let config = DecoderConfig {
        decoded_byte_align: 4,
        ..DecoderConfig::group4(20)
    };
    assert_eq!(config.raster(), 4);
    roundtrip(config, 10, 19);
}

#[test]
fn test_long_runs() {
    let config = DecoderConfig::group3(6000);
    let mut rows = vec![];
    for split in [0, 1, 2560, 2561, 5120, 5999, 6000] {
        let pixels: Vec<bool> = (0..6000).map(|i| i >= split).collect();
        rows.push(pack(&pixels, &config));
    }
    let data = encode(&rows, &config);
    assert_eq!(decode(&data, &config).unwrap(), rows.concat());

    let config = DecoderConfig::group4(6000);
    let data = encode(&rows, &config);
    assert_eq!(decode(&data, &config).unwrap(), rows.concat());
}
