//! File level operations: load a mask image, compute its distance field and save the result.

use crate::config::{MultiChannelOptions, SdfOptions};
use crate::decay::apply_decay;
use crate::distance_field::{Degeneracy, F32DistanceStorage, SignedDistanceField};
use crate::error::{Result, SdfError};
use crate::mask::Mask;
use crate::multi_channel::compute_multi_channel;
use crate::output::{quantize, remap_range};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};


/// File extensions picked up by `batch_process_sdf`, compared case-insensitively.
pub const MASK_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];

/// What was written by a single channel conversion.
#[derive(Clone, Debug, PartialEq)]
pub struct SdfSummary {
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
    pub degeneracy: Degeneracy,

    /// The smallest and largest raw signed distance, in pixels.
    pub distance_range: (f32, f32),
}


/// Decodes the image as 8-bit grayscale and thresholds it into a mask.
pub fn load_mask(path: impl AsRef<Path>, output_size: (u32, u32), antialiasing: bool) -> Result<Mask> {
    let path = path.as_ref();
    let image = image::open(path).map_err(|error| SdfError::image(path, error))?.into_luma8();
    log::debug!("loaded {:?} with {}x{} pixels", path, image.width(), image.height());

    Mask::from_gray_image(&image, output_size, antialiasing)
}

/// Converts the mask image at `input` into a single channel distance field at `output`.
/// All options are validated before the input is read, and nothing is written on failure.
pub fn generate_sdf(input: impl AsRef<Path>, output: impl AsRef<Path>, options: &SdfOptions) -> Result<SdfSummary> {
    options.validate()?;
    let decay = options.decay()?;

    let mask = load_mask(&input, options.output_size, options.antialiasing)?;
    let field = SignedDistanceField::<F32DistanceStorage>::compute(&mask);

    let normalized = apply_decay(&field, decay);
    let (min, max) = options.normalize_range;
    let remapped = remap_range(&normalized, min, max)?;

    let output = output.as_ref();
    quantize(&remapped, options.bit_depth).save(output)?;

    Ok(SdfSummary {
        output: output.to_path_buf(),
        width: field.width,
        height: field.height,
        degeneracy: field.degeneracy,
        distance_range: field.distance_range(),
    })
}

/// Converts the mask image at `input` into a packed RGBA distance field at `output`.
pub fn generate_multichannel_sdf(input: impl AsRef<Path>, output: impl AsRef<Path>, options: &MultiChannelOptions) -> Result<()> {
    options.validate()?;

    let mask = load_mask(&input, options.output_size, options.antialiasing)?;
    let raster = compute_multi_channel(&mask, &options.distances, options.edge_mode, options.fill_policy)?;
    raster.save(output)
}

/// Converts every mask image in `input_folder` into `output_folder/sdf_<file name>`,
/// in file name order. Stops at the first failing image.
/// The output is always PNG, so `.png` is appended to the names of other formats,
/// as they cannot hold 16-bit grayscale.
pub fn batch_process_sdf(
    input_folder: impl AsRef<Path>, output_folder: impl AsRef<Path>, options: &SdfOptions
) -> Result<Vec<SdfSummary>> {
    let input_folder = input_folder.as_ref();
    let output_folder = output_folder.as_ref();
    options.validate()?;

    let entries = fs::read_dir(input_folder).map_err(|error| SdfError::io(input_folder, error))?;
    let mut inputs = Vec::new();

    for entry in entries {
        let entry = entry.map_err(|error| SdfError::io(input_folder, error))?;
        let path = entry.path();

        if path.is_file() && is_mask_file(&path) {
            inputs.push(path);
        }
    }

    inputs.sort();

    let mut jobs = Vec::with_capacity(inputs.len());
    let mut output_names = HashSet::with_capacity(inputs.len());

    for input in inputs {
        let name = batch_output_name(&input);

        if !output_names.insert(name.to_lowercase()) {
            return Err(SdfError::invalid(format!(
                "{:?} would overwrite the output of another mask as `{}`", input, name
            )));
        }

        jobs.push((input, output_folder.join(name)));
    }

    fs::create_dir_all(output_folder).map_err(|error| SdfError::io(output_folder, error))?;

    let mut summaries = Vec::with_capacity(jobs.len());
    for (input, output) in jobs {
        log::info!("processing {:?}", input);
        summaries.push(generate_sdf(&input, output, options)?);
    }

    Ok(summaries)
}

/// `sdf_mask.png` for `mask.png`, and `sdf_mask.bmp.png` for `mask.bmp`.
fn batch_output_name(input: &Path) -> String {
    // only paths with a file name pass `is_mask_file`
    let name = input.file_name().map(|name| name.to_string_lossy().into_owned()).unwrap_or_default();

    let is_png = input.extension()
        .and_then(|extension| extension.to_str())
        .map_or(false, |extension| extension.eq_ignore_ascii_case("png"));

    if is_png { format!("sdf_{}", name) } else { format!("sdf_{}.png", name) }
}

fn is_mask_file(path: &Path) -> bool {
    path.extension()
        .and_then(|extension| extension.to_str())
        .map(|extension| MASK_EXTENSIONS.iter().any(|known| extension.eq_ignore_ascii_case(known)))
        .unwrap_or(false)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_mask_extensions(){
        assert!(is_mask_file(Path::new("a/mask.png")));
        assert!(is_mask_file(Path::new("mask.JPEG")));
        assert!(is_mask_file(Path::new("mask.Bmp")));
        assert!(!is_mask_file(Path::new("mask.tga")));
        assert!(!is_mask_file(Path::new("png")));
    }

    #[test]
    fn batch_output_keeps_the_whole_file_name(){
        assert_eq!(batch_output_name(Path::new("masks/a.png")), "sdf_a.png");
        assert_eq!(batch_output_name(Path::new("masks/a.PNG")), "sdf_a.PNG");
        assert_eq!(batch_output_name(Path::new("masks/a.bmp")), "sdf_a.bmp.png");
        assert_eq!(batch_output_name(Path::new("a.b.jpg")), "sdf_a.b.jpg.png");
    }

    #[test]
    fn missing_input_is_io_failure(){
        let directory = tempfile::tempdir().unwrap();
        let output = directory.path().join("out.png");

        let result = generate_sdf(directory.path().join("missing.png"), &output, &SdfOptions::default());
        assert!(matches!(result, Err(SdfError::Io { .. })), "{:?}", result);
        assert!(!output.exists());
    }
}
