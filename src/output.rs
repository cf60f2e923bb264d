//! Range remapping, quantization and encoding of normalized fields.

use crate::decay::NormalizedField;
use crate::error::{Result, SdfError};
use image::{GrayImage, ImageBuffer, ImageFormat, Luma, RgbaImage};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};


/// A normalized field mapped affinely from `[-1, 1]` into `[min, max]`.
#[derive(Clone, PartialEq, Debug)]
pub struct RemappedField {
    pub width: u32,
    pub height: u32,
    pub values: Vec<f32>,
    pub range: (f32, f32),
}

/// The number of bits per sample of a single channel raster.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum BitDepth {
    Eight,
    Sixteen,
}

/// An encoded distance field, ready to be saved.
#[derive(Clone, PartialEq, Debug)]
pub enum OutputRaster {
    Gray8(GrayImage),
    Gray16(ImageBuffer<Luma<u16>, Vec<u16>>),

    /// One independently decayed field per color channel.
    Rgba8(RgbaImage),
}


/// Maps `[-1, 1]` onto `[0, 1]`, and then onto `[target_min, target_max]`.
pub fn remap_range(field: &NormalizedField, target_min: f32, target_max: f32) -> Result<RemappedField> {
    check_range(target_min, target_max)?;

    Ok(RemappedField {
        width: field.width,
        height: field.height,
        values: field.values.iter().map(|&value| remap_value(value, target_min, target_max)).collect(),
        range: (target_min, target_max),
    })
}

pub(crate) fn check_range(target_min: f32, target_max: f32) -> Result<()> {
    if !(target_min.is_finite() && target_max.is_finite()) {
        return Err(SdfError::invalid(format!("range ({}, {}) must be finite", target_min, target_max)));
    }

    if target_min > target_max {
        return Err(SdfError::invalid(format!("range minimum {} exceeds maximum {}", target_min, target_max)));
    }

    Ok(())
}

#[inline]
pub(crate) fn remap_value(value: f32, target_min: f32, target_max: f32) -> f32 {
    let unit = (value + 1.0) * 0.5;
    unit * (target_max - target_min) + target_min
}


impl RemappedField {

    /// Inverts the affine mapping, recovering the values in `[-1, 1]`.
    /// A degenerate range has lost all information, and maps to `0`.
    pub fn to_normalized(&self) -> NormalizedField {
        let (min, max) = self.range;
        let span = max - min;

        NormalizedField {
            width: self.width,
            height: self.height,
            values: self.values.iter()
                .map(|&value| if span > 0.0 { (value - min) / span * 2.0 - 1.0 } else { 0.0 })
                .collect(),
        }
    }
}


impl BitDepth {
    pub fn bits(self) -> u8 {
        match self {
            BitDepth::Eight => 8,
            BitDepth::Sixteen => 16,
        }
    }

    /// The largest sample value, `2^bits - 1`.
    pub fn max_sample(self) -> u32 {
        (1_u32 << self.bits()) - 1
    }
}

impl TryFrom<u8> for BitDepth {
    type Error = SdfError;

    fn try_from(bits: u8) -> Result<Self> {
        match bits {
            8 => Ok(BitDepth::Eight),
            16 => Ok(BitDepth::Sixteen),
            other => Err(SdfError::invalid(format!("unsupported bit depth {}, expected 8 or 16", other))),
        }
    }
}

impl From<BitDepth> for u8 {
    fn from(depth: BitDepth) -> u8 {
        depth.bits()
    }
}


/// Converts a remapped value into an integer sample of the bit depth.
/// The value is clamped into its declared range and into `[0, 1]` first,
/// so that the mapping is monotonic and never overflows.
#[inline]
pub fn quantize_value(value: f32, range: (f32, f32), depth: BitDepth) -> u32 {
    let clamped = value.max(range.0).min(range.1).max(0.0).min(1.0);
    let max_sample = depth.max_sample() as f32;
    (clamped * max_sample).round() as u32
}

/// Quantizes the field into a single channel grey-scale raster.
pub fn quantize(field: &RemappedField, depth: BitDepth) -> OutputRaster {
    let sample = |x: u32, y: u32| {
        let value = field.values[field.width as usize * y as usize + x as usize];
        quantize_value(value, field.range, depth)
    };

    match depth {
        BitDepth::Eight => OutputRaster::Gray8(
            ImageBuffer::from_fn(field.width, field.height, |x, y| Luma([sample(x, y) as u8]))
        ),

        BitDepth::Sixteen => OutputRaster::Gray16(
            ImageBuffer::from_fn(field.width, field.height, |x, y| Luma([sample(x, y) as u16]))
        ),
    }
}


impl OutputRaster {
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            OutputRaster::Gray8(image) => image.dimensions(),
            OutputRaster::Gray16(image) => image.dimensions(),
            OutputRaster::Rgba8(image) => image.dimensions(),
        }
    }

    pub fn channel_count(&self) -> usize {
        match self {
            OutputRaster::Gray8(_) | OutputRaster::Gray16(_) => 1,
            OutputRaster::Rgba8(_) => 4,
        }
    }

    /// Writes the raster to the path, choosing the format by the file extension.
    ///
    /// The image is encoded into a hidden sibling file first, which is then renamed,
    /// so the path either receives the complete image or remains untouched.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let format = ImageFormat::from_path(path).map_err(|error| SdfError::image(path, error))?;
        let partial = partial_path(path)?;

        let encoded = match self {
            OutputRaster::Gray8(image) => image.save_with_format(&partial, format),
            OutputRaster::Gray16(image) => image.save_with_format(&partial, format),
            OutputRaster::Rgba8(image) => image.save_with_format(&partial, format),
        };

        if let Err(error) = encoded {
            // the partial file may or may not exist at this point
            let _ = fs::remove_file(&partial);
            return Err(SdfError::image(path, error));
        }

        fs::rename(&partial, path).map_err(|error| {
            let _ = fs::remove_file(&partial);
            SdfError::io(path, error)
        })?;

        log::info!("wrote {:?} ({}x{}, {} channel)", path, self.dimensions().0, self.dimensions().1, self.channel_count());
        Ok(())
    }
}

fn partial_path(path: &Path) -> Result<PathBuf> {
    let file_name = path.file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| SdfError::invalid(format!("output path {:?} has no file name", path)))?;

    Ok(path.with_file_name(format!(".{}.partial", file_name)))
}


#[cfg(test)]
mod tests {
    use super::*;

    fn normalized(values: Vec<f32>) -> NormalizedField {
        NormalizedField { width: values.len() as u32, height: 1, values }
    }

    #[test]
    fn remaps_into_target_range(){
        let field = remap_range(&normalized(vec![-1.0, 0.0, 1.0]), 0.0, 1.0).unwrap();
        assert_eq!(field.values, vec![0.0, 0.5, 1.0]);

        let field = remap_range(&normalized(vec![-1.0, 0.0, 1.0]), 0.2, 0.6).unwrap();
        assert!((field.values[0] - 0.2).abs() < 1e-6);
        assert!((field.values[1] - 0.4).abs() < 1e-6);
        assert!((field.values[2] - 0.6).abs() < 1e-6);
    }

    #[test]
    fn rejects_inverted_range(){
        let field = normalized(vec![0.0]);
        assert!(matches!(remap_range(&field, 1.0, 0.0), Err(SdfError::InvalidArgument(_))));
        assert!(matches!(remap_range(&field, f32::NAN, 1.0), Err(SdfError::InvalidArgument(_))));
        assert!(remap_range(&field, 0.5, 0.5).is_ok());
    }

    #[test]
    fn remap_round_trip(){
        let values: Vec<f32> = (-20 ..= 20).map(|step| step as f32 / 20.0).collect();
        let field = normalized(values.clone());

        for &(min, max) in &[(0.0, 1.0), (-3.0, 7.5), (0.25, 0.3), (-1.0, 1.0)] {
            let recovered = remap_range(&field, min, max).unwrap().to_normalized();

            for (original, recovered) in values.iter().zip(recovered.values.iter()) {
                assert!((original - recovered).abs() < 1e-4, "({}, {}): {} != {}", min, max, original, recovered);
            }
        }
    }

    #[test]
    fn parses_bit_depths(){
        assert_eq!(BitDepth::try_from(8).unwrap(), BitDepth::Eight);
        assert_eq!(BitDepth::try_from(16).unwrap(), BitDepth::Sixteen);
        assert!(matches!(BitDepth::try_from(12), Err(SdfError::InvalidArgument(_))));
        assert_eq!(BitDepth::Eight.max_sample(), 255);
        assert_eq!(BitDepth::Sixteen.max_sample(), 65535);
    }

    #[test]
    fn quantization_rounds_to_nearest(){
        assert_eq!(quantize_value(0.0, (0.0, 1.0), BitDepth::Eight), 0);
        assert_eq!(quantize_value(1.0, (0.0, 1.0), BitDepth::Eight), 255);
        assert_eq!(quantize_value(0.5, (0.0, 1.0), BitDepth::Eight), 128);
        assert_eq!(quantize_value(0.5, (0.0, 1.0), BitDepth::Sixteen), 32768);
        assert_eq!(quantize_value(1.0, (0.0, 1.0), BitDepth::Sixteen), 65535);
    }

    #[test]
    fn quantization_clamps_to_declared_range(){
        assert_eq!(quantize_value(0.9, (0.0, 0.5), BitDepth::Eight), 128);
        assert_eq!(quantize_value(-0.5, (-1.0, 2.0), BitDepth::Eight), 0);
        assert_eq!(quantize_value(1.5, (-1.0, 2.0), BitDepth::Sixteen), 65535);
    }

    #[test]
    fn quantization_is_monotonic(){
        let values: Vec<f32> = (0 ..= 2000).map(|step| step as f32 / 2000.0).collect();

        for &depth in &[BitDepth::Eight, BitDepth::Sixteen] {
            for &range in &[(0.0, 1.0), (0.1, 0.9), (-2.0, 3.0)] {
                let samples: Vec<u32> = values.iter().map(|&value| quantize_value(value, range, depth)).collect();
                assert!(samples.windows(2).all(|pair| pair[0] <= pair[1]));
            }
        }
    }

    #[test]
    fn quantize_produces_single_channel_rasters(){
        let field = remap_range(&normalized(vec![-1.0, 0.0, 1.0]), 0.0, 1.0).unwrap();

        match quantize(&field, BitDepth::Eight) {
            OutputRaster::Gray8(image) => assert_eq!(image.into_raw(), vec![0, 128, 255]),
            other => panic!("unexpected raster {:?}", other),
        }

        match quantize(&field, BitDepth::Sixteen) {
            OutputRaster::Gray16(image) => assert_eq!(image.into_raw(), vec![0, 32768, 65535]),
            other => panic!("unexpected raster {:?}", other),
        }
    }

    #[test]
    fn saves_atomically(){
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("field.png");

        let field = remap_range(&normalized(vec![-1.0, -0.5, 0.5, 1.0]), 0.0, 1.0).unwrap();
        quantize(&field, BitDepth::Sixteen).save(&path).unwrap();

        let decoded = image::open(&path).unwrap().into_luma16();
        assert_eq!(decoded.dimensions(), (4, 1));
        assert_eq!(decoded.get_pixel(3, 0)[0], 65535);

        let leftovers: Vec<_> = fs::read_dir(directory.path()).unwrap().collect();
        assert_eq!(leftovers.len(), 1);
    }

    #[test]
    fn unknown_extension_writes_nothing(){
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("field.unknown");

        let field = remap_range(&normalized(vec![0.0]), 0.0, 1.0).unwrap();
        assert!(quantize(&field, BitDepth::Eight).save(&path).is_err());
        assert_eq!(fs::read_dir(directory.path()).unwrap().count(), 0);
    }
}
