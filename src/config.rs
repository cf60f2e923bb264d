use crate::decay::{Decay, EdgeMode};
use crate::error::{Result, SdfError};
use crate::multi_channel::{ChannelFillPolicy, CHANNEL_COUNT};
use crate::output::{check_range, BitDepth};
use serde::Deserialize;
use std::{fs, path::Path};


/// Parameters of a single channel distance field.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SdfOptions {
    /// Pixel distance at which the decay saturates.
    pub decay_distance: f32,

    /// Target `(width, height)`, or `(0, 0)` to keep the input size.
    pub output_size: (u32, u32),

    pub edge_mode: EdgeMode,
    pub normalize_range: (f32, f32),
    pub bit_depth: BitDepth,

    /// Blur the grayscale input slightly before thresholding.
    pub antialiasing: bool,
}

impl Default for SdfOptions {
    fn default() -> Self {
        Self {
            decay_distance: 20.0,
            output_size: (0, 0),
            edge_mode: EdgeMode::Linear,
            normalize_range: (0.0, 1.0),
            bit_depth: BitDepth::Sixteen,
            antialiasing: true,
        }
    }
}

impl SdfOptions {
    pub fn decay(&self) -> Result<Decay> {
        Decay::new(self.decay_distance, self.edge_mode)
    }

    /// Checks every parameter, so that no file is touched with invalid options.
    pub fn validate(&self) -> Result<()> {
        self.decay()?;
        check_range(self.normalize_range.0, self.normalize_range.1)?;
        check_output_size(self.output_size)
    }
}


/// Parameters of a packed multi channel distance field.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct MultiChannelOptions {
    /// One decay distance per channel, in red, green, blue, alpha order.
    pub distances: Vec<f32>,
    pub edge_mode: EdgeMode,
    pub fill_policy: ChannelFillPolicy,
    pub output_size: (u32, u32),
    pub antialiasing: bool,
}

impl Default for MultiChannelOptions {
    fn default() -> Self {
        Self {
            distances: vec![10.0, 20.0, 40.0],
            edge_mode: EdgeMode::Smooth,
            fill_policy: ChannelFillPolicy::OpaqueAlpha,
            output_size: (0, 0),
            antialiasing: false,
        }
    }
}

impl MultiChannelOptions {
    pub fn validate(&self) -> Result<()> {
        if self.distances.is_empty() || self.distances.len() > CHANNEL_COUNT {
            return Err(SdfError::invalid(format!(
                "between 1 and {} distances required, got {}", CHANNEL_COUNT, self.distances.len()
            )));
        }

        for &distance in &self.distances {
            Decay::new(distance, self.edge_mode)?;
        }

        if self.fill_policy == ChannelFillPolicy::Explicit && self.distances.len() != CHANNEL_COUNT {
            return Err(SdfError::invalid(format!(
                "explicit channels require {} distances, got {}", CHANNEL_COUNT, self.distances.len()
            )));
        }

        check_output_size(self.output_size)
    }
}

fn check_output_size(output_size: (u32, u32)) -> Result<()> {
    match output_size {
        (0, 0) => Ok(()),
        (0, _) | (_, 0) => Err(SdfError::invalid(format!(
            "output size {:?} must be (0, 0) or have both dimensions positive", output_size
        ))),
        _ => Ok(()),
    }
}


/// The contents of an options file, with a table per mode:
///
/// ```toml
/// [single]
/// decay_distance = 30.0
/// edge_mode = "smooth"
/// output_size = [512, 512]
///
/// [multi]
/// distances = [10.0, 25.0, 50.0]
/// ```
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
#[serde(default, deny_unknown_fields)]
pub struct OptionsFile {
    pub single: SdfOptions,
    pub multi: MultiChannelOptions,
}

impl OptionsFile {
    pub fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|error| SdfError::Config(error.to_string()))
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|error| SdfError::io(path, error))?;

        let options = Self::parse(&text)?;
        log::debug!("loaded options from {:?}: {:?}", path, options);
        Ok(options)
    }
}
