//! Compression of unbounded signed distances into the range `[-1, 1]`.

use crate::distance_field::{DistanceStorage, SignedDistanceField};
use crate::error::{Result, SdfError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;


/// The function family used to squash signed distances into `[-1, 1]`.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeMode {
    /// `clamp(distance / decay, -1, 1)`, reaching the bounds at the decay distance.
    #[default]
    Linear,

    /// `sign(distance) * (1 - exp(-|distance| / decay))`, approaching the bounds asymptotically.
    Exponential,

    /// `tanh(distance / decay)`.
    Smooth,
}

/// A validated decay configuration for one channel.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Decay {
    distance: f32,
    mode: EdgeMode,
}

/// Signed distances compressed into `[-1, 1]`, row-major.
#[derive(Clone, PartialEq, Debug)]
pub struct NormalizedField {
    pub width: u32,
    pub height: u32,
    pub values: Vec<f32>,
}


impl EdgeMode {
    pub const ALL: [EdgeMode; 3] = [EdgeMode::Linear, EdgeMode::Exponential, EdgeMode::Smooth];

    pub fn name(self) -> &'static str {
        match self {
            EdgeMode::Linear => "linear",
            EdgeMode::Exponential => "exponential",
            EdgeMode::Smooth => "smooth",
        }
    }
}

impl FromStr for EdgeMode {
    type Err = SdfError;

    fn from_str(text: &str) -> Result<Self> {
        EdgeMode::ALL.iter().copied()
            .find(|mode| mode.name() == text)
            .ok_or_else(|| SdfError::invalid(format!(
                "unknown edge mode `{}`, expected one of linear, exponential, smooth", text
            )))
    }
}

impl fmt::Display for EdgeMode {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.name())
    }
}


impl Decay {

    /// Fails if the decay distance is not a positive, finite number of pixels.
    pub fn new(distance: f32, mode: EdgeMode) -> Result<Self> {
        if !(distance.is_finite() && distance > 0.0) {
            return Err(SdfError::invalid(format!("decay distance must be positive, got {}", distance)));
        }

        Ok(Decay { distance, mode })
    }

    pub fn distance(&self) -> f32 { self.distance }
    pub fn mode(&self) -> EdgeMode { self.mode }

    /// Maps a single signed distance into `[-1, 1]`.
    #[inline]
    pub fn apply(&self, signed_distance: f32) -> f32 {
        let scaled = signed_distance / self.distance;

        match self.mode {
            EdgeMode::Linear => scaled.clamp(-1.0, 1.0),

            // not clamped, the curve only approaches its bounds
            EdgeMode::Exponential => {
                if scaled == 0.0 { 0.0 }
                else { scaled.signum() * -(-scaled.abs()).exp_m1() }
            },

            EdgeMode::Smooth => scaled.tanh(),
        }
    }
}


/// Compresses every distance of the field with the specified decay.
pub fn apply_decay<D: DistanceStorage>(field: &SignedDistanceField<D>, decay: Decay) -> NormalizedField {
    log::debug!("applying {} decay over {} pixels", decay.mode, decay.distance);

    NormalizedField {
        width: field.width,
        height: field.height,
        values: field.iter_distances().map(|distance| decay.apply(distance)).collect(),
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance_field::F32DistanceStorage;
    use crate::mask::Mask;

    fn samples() -> Vec<f32> {
        (-400 ..= 400).map(|step| step as f32 * 0.25).collect()
    }

    #[test]
    fn parses_known_modes(){
        assert_eq!("linear".parse::<EdgeMode>().unwrap(), EdgeMode::Linear);
        assert_eq!("exponential".parse::<EdgeMode>().unwrap(), EdgeMode::Exponential);
        assert_eq!("smooth".parse::<EdgeMode>().unwrap(), EdgeMode::Smooth);
        assert_eq!(EdgeMode::Smooth.to_string(), "smooth");
    }

    #[test]
    fn rejects_bogus_mode(){
        assert!(matches!("bogus".parse::<EdgeMode>(), Err(SdfError::InvalidArgument(_))));
        assert!(matches!("Linear".parse::<EdgeMode>(), Err(SdfError::InvalidArgument(_))));
    }

    #[test]
    fn rejects_non_positive_distances(){
        for &distance in &[0.0, -1.0, f32::NAN, f32::INFINITY] {
            assert!(matches!(Decay::new(distance, EdgeMode::Linear), Err(SdfError::InvalidArgument(_))));
        }
    }

    #[test]
    fn values_stay_within_bounds(){
        for &mode in EdgeMode::ALL.iter() {
            let decay = Decay::new(7.5, mode).unwrap();

            for distance in samples() {
                let value = decay.apply(distance);
                assert!(value >= -1.0 && value <= 1.0, "{} gave {} for {}", mode, value, distance);
                assert!(value.signum() * distance.signum() >= 0.0);
            }

            assert_eq!(decay.apply(0.0), 0.0);
        }
    }

    #[test]
    fn decay_is_monotonic(){
        for &mode in EdgeMode::ALL.iter() {
            let decay = Decay::new(20.0, mode).unwrap();
            let values: Vec<f32> = samples().into_iter().map(|distance| decay.apply(distance)).collect();
            assert!(values.windows(2).all(|pair| pair[0] <= pair[1]), "{} is not monotonic", mode);
        }
    }

    #[test]
    fn strictly_increasing_within_saturation(){
        let distances: Vec<f32> = (-30 ..= 30).map(|step| step as f32 * 0.5).collect();

        for &mode in EdgeMode::ALL.iter() {
            let decay = Decay::new(16.0, mode).unwrap();
            let values: Vec<f32> = distances.iter().map(|&distance| decay.apply(distance)).collect();
            assert!(values.windows(2).all(|pair| pair[0] < pair[1]), "{} is not strictly increasing", mode);
        }
    }

    #[test]
    fn linear_saturates_at_decay_distance(){
        let decay = Decay::new(2.0, EdgeMode::Linear).unwrap();
        assert_eq!(decay.apply(1.0), 0.5);
        assert_eq!(decay.apply(2.0), 1.0);
        assert_eq!(decay.apply(-2.83), -1.0);
        assert_eq!(decay.apply(100.0), 1.0);
    }

    #[test]
    fn exponential_is_not_clamped(){
        let decay = Decay::new(10.0, EdgeMode::Exponential).unwrap();
        let expected = 1.0 - (-1.0_f32).exp();

        assert!((decay.apply(10.0) - expected).abs() < 1e-6);
        assert!((decay.apply(-10.0) + expected).abs() < 1e-6);
        assert!(decay.apply(30.0) < 1.0);
        assert!(decay.apply(30.0) > decay.apply(20.0));
    }

    #[test]
    fn smooth_is_tanh(){
        let decay = Decay::new(4.0, EdgeMode::Smooth).unwrap();
        assert!((decay.apply(4.0) - 1_f32.tanh()).abs() < 1e-6);
        assert!((decay.apply(-2.0) + 0.5_f32.tanh()).abs() < 1e-6);
    }

    #[test]
    fn single_pixel_corners_clamp_to_minus_one(){
        let mask = Mask::from_fn(5, 5, |x, y| (x, y) == (2, 2)).unwrap();
        let field = SignedDistanceField::<F32DistanceStorage>::compute(&mask);
        let normalized = apply_decay(&field, Decay::new(2.0, EdgeMode::Linear).unwrap());

        assert_eq!(normalized.values[field.flatten_index(2, 2)], 0.5);
        for &(x, y) in &[(0, 0), (4, 0), (0, 4), (4, 4)] {
            assert_eq!(normalized.values[field.flatten_index(x, y)], -1.0);
        }
    }
}
