//! Packing of several independently decayed distance fields into the channels of one RGBA raster.

use crate::decay::{Decay, EdgeMode};
use crate::distance_field::{F32DistanceStorage, SignedDistanceField};
use crate::error::{Result, SdfError};
use crate::mask::Mask;
use crate::output::{quantize_value, remap_value, BitDepth, OutputRaster};
use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};


/// The number of channels of a packed raster.
pub const CHANNEL_COUNT: usize = 4;

/// How channels without a decay distance are filled.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelFillPolicy {
    /// Unused color channels are black and an unused alpha channel is fully opaque.
    #[default]
    OpaqueAlpha,

    /// Every channel must have its own decay distance.
    Explicit,
}

/// The content of a single output channel.
#[derive(Clone, Copy, PartialEq, Debug)]
enum Channel {
    Decayed(Decay),
    Constant(f32),
}


impl ChannelFillPolicy {
    fn fill_value(self, channel_index: usize) -> f32 {
        if channel_index == CHANNEL_COUNT - 1 { 1.0 } else { 0.0 }
    }
}

/// Decide what each of the four channels contains.
fn plan_channels(decay_distances: &[f32], edge_mode: EdgeMode, policy: ChannelFillPolicy) -> Result<[Channel; CHANNEL_COUNT]> {
    if decay_distances.is_empty() {
        return Err(SdfError::invalid("at least one decay distance is required"));
    }

    if decay_distances.len() > CHANNEL_COUNT {
        return Err(SdfError::invalid(format!(
            "{} decay distances given, but a raster has only {} channels",
            decay_distances.len(), CHANNEL_COUNT
        )));
    }

    if policy == ChannelFillPolicy::Explicit && decay_distances.len() != CHANNEL_COUNT {
        return Err(SdfError::invalid(format!(
            "explicit channels require {} decay distances, got {}",
            CHANNEL_COUNT, decay_distances.len()
        )));
    }

    let mut channels = [Channel::Constant(0.0); CHANNEL_COUNT];
    for (index, channel) in channels.iter_mut().enumerate() {
        *channel = match decay_distances.get(index) {
            Some(&distance) => Channel::Decayed(Decay::new(distance, edge_mode)?),
            None => Channel::Constant(policy.fill_value(index)),
        };
    }

    Ok(channels)
}


/// Computes one signed distance field of the mask and packs it into an 8-bit RGBA raster,
/// decaying it with a different distance for each channel and remapping each channel to `[0, 1]`.
///
/// Up to four distances are accepted, assigned to red, green, blue and alpha in that order.
/// With `ChannelFillPolicy::OpaqueAlpha`, missing channels are filled with constants,
/// so three distances produce an alpha channel of 255 regardless of the mask.
pub fn compute_multi_channel(
    mask: &Mask, decay_distances: &[f32], edge_mode: EdgeMode, policy: ChannelFillPolicy
) -> Result<OutputRaster> {
    let channels = plan_channels(decay_distances, edge_mode, policy)?;
    let field = SignedDistanceField::<F32DistanceStorage>::compute(mask);

    Ok(pack_channels(&field, &channels))
}

fn pack_channels(field: &SignedDistanceField<F32DistanceStorage>, channels: &[Channel; CHANNEL_COUNT]) -> OutputRaster {
    log::debug!("packing channels {:?}", channels);

    let image = RgbaImage::from_fn(field.width, field.height, |x, y| {
        let distance = field.get_distance(x, y);
        let mut pixel = [0_u8; CHANNEL_COUNT];

        for (sample, channel) in pixel.iter_mut().zip(channels.iter()) {
            let value = match channel {
                Channel::Decayed(decay) => remap_value(decay.apply(distance), 0.0, 1.0),
                Channel::Constant(value) => *value,
            };

            *sample = quantize_value(value, (0.0, 1.0), BitDepth::Eight) as u8;
        }

        Rgba(pixel)
    });

    OutputRaster::Rgba8(image)
}
