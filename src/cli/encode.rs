use ccitt_fax::{DecoderConfig, Encoder};
use color_eyre::eyre::{self, eyre};
use image::GrayImage;
use log::info;

use super::opt::EncodeOptions;

/// Pack the rows of `image` into rasters in the polarity of `config`
pub fn threshold(image: &GrayImage, threshold: u8, config: &DecoderConfig) -> Vec<Vec<u8>> {
    let white = if config.black_is_one { 0x00 } else { 0xFF };
    image
        .rows()
        .map(|pixels| {
            let mut row = vec![white; config.raster()];
            for (x, pixel) in pixels.enumerate() {
                if pixel.0[0] < threshold {
                    row[x / 8] ^= 0x80 >> (x % 8);
                }
            }
            row
        })
        .collect()
}

pub fn run(opt: EncodeOptions) -> eyre::Result<()> {
    let image = image::open(&opt.file)
        .map_err(|err| eyre!("Failed to load '{}': {}", opt.file.display(), err))?
        .to_luma8();

    let mut config = opt.params.config()?;
    if opt.params.columns.is_some_and(|columns| columns != image.width()) {
        return Err(eyre!(
            "Image is {} pixels wide, not {}",
            image.width(),
            config.columns
        ));
    }
    config.columns = image.width();

    let mut encoder = Encoder::new(&config)?;
    let rows = threshold(&image, opt.threshold, &config);
    for row in &rows {
        encoder.encode_row(row)?;
    }
    let data = encoder.finish();

    let out_path = opt.out.unwrap_or_else(|| opt.file.with_extension("g4"));
    std::fs::write(&out_path, &data)?;
    info!(
        "Encoded {}x{} pixels into {} bytes as '{}'",
        image.width(),
        image.height(),
        data.len(),
        out_path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use ccitt_fax::{decode, DecoderConfig};
    use image::{GrayImage, Luma};

    use super::threshold;

    #[test]
    fn test_threshold() {
        let image = GrayImage::from_fn(10, 2, |x, y| if x == y { Luma([20]) } else { Luma([200]) });
        let config = DecoderConfig::group3(10);
        let rows = threshold(&image, 128, &config);
        assert_eq!(rows, vec![vec![0x7F, 0xFF], vec![0xBF, 0xFF]]);

        let config = DecoderConfig {
            black_is_one: true,
            ..DecoderConfig::group4(10)
        };
        let rows = threshold(&image, 128, &config);
        assert_eq!(rows, vec![vec![0x80, 0x00], vec![0x40, 0x00]]);

        let mut encoder = ccitt_fax::Encoder::new(&config).unwrap();
        for row in &rows {
            encoder.encode_row(row).unwrap();
        }
        assert_eq!(decode(&encoder.finish(), &config).unwrap(), rows.concat());
    }
}
