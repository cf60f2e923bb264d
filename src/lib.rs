//! This crate converts binary mask images into signed distance fields,
//! as used for texture effects in game engine materials.
//!
//! The signed distance is measured with an exact euclidean distance transform
//! (Felzenszwalb & Huttenlocher), positive inside the mask and negative outside of it.
//! It is then compressed into `[-1, 1]` by a decay function, remapped into an output range,
//! and quantized into an 8-bit or 16-bit grey-scale image.
//! Alternatively, up to four differently decayed fields can be packed
//! into the channels of a single RGBA image.

pub mod config;
pub mod decay;
pub mod distance_field;
pub mod distance_transform;
pub mod error;
pub mod mask;
pub mod multi_channel;
pub mod output;
pub mod pipeline;

pub mod prelude {
    pub use crate::{
        compute_signed_field,
        compute_f16_signed_field,
        compute_approximate_signed_field,
    };

    pub use crate::mask::{ BinaryImage, Mask };

    pub use crate::distance_field::{
        SignedDistanceField, Degeneracy, DistanceStorage,
        F16DistanceStorage, F32DistanceStorage
    };

    pub use crate::distance_transform::{ DistanceTransform, ExactEuclidean, DeadReckoning };
    pub use crate::decay::{ apply_decay, Decay, EdgeMode, NormalizedField };
    pub use crate::output::{ remap_range, quantize, BitDepth, OutputRaster, RemappedField };
    pub use crate::multi_channel::{ compute_multi_channel, ChannelFillPolicy };
    pub use crate::config::{ SdfOptions, MultiChannelOptions, OptionsFile };
    pub use crate::pipeline::{ generate_sdf, generate_multichannel_sdf, batch_process_sdf, SdfSummary };
    pub use crate::error::{ SdfError, Result };
}


use prelude::*;

/// Compute the exact signed distance field of the mask with an `f32` distance storage.
pub fn compute_signed_field(mask: &Mask) -> SignedDistanceField<F32DistanceStorage> {
    SignedDistanceField::compute(mask)
}

/// Compute the exact signed distance field of the mask with an `f16` distance storage.
pub fn compute_f16_signed_field(mask: &Mask) -> SignedDistanceField<F16DistanceStorage> {
    SignedDistanceField::compute(mask)
}

/// Approximate the signed distance field of the mask with the faster dead reckoning transform.
pub fn compute_approximate_signed_field(mask: &Mask) -> SignedDistanceField<F32DistanceStorage> {
    SignedDistanceField::compute_with(mask, &DeadReckoning)
}
