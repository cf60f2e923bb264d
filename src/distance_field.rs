use crate::distance_transform::{DistanceTransform, ExactEuclidean};
use crate::mask::{BinaryImage, Mask};



/// The raw signed distance of every pixel of a mask to the shape boundary:
/// positive inside the shape, negative outside of it.
#[derive(Clone, PartialEq, Debug)]
pub struct SignedDistanceField<D: DistanceStorage> {
    pub width: u32,
    pub height: u32,
    pub distances: D,
    pub degeneracy: Degeneracy,
}

/// Whether the mask contained a boundary at all.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Degeneracy {
    /// The mask contains both inside and outside pixels.
    None,

    /// Every pixel is inside, so every distance is `+diagonal`.
    AllInside,

    /// Every pixel is outside, so every distance is `-diagonal`.
    AllOutside,
}

/// Needs less storage with sufficient precision, but takes about
/// twice as long because of conversions between f16 and f32.
pub type F16DistanceStorage = Vec<half::f16>;

/// Needs more storage with high precision, but takes about
/// half as long because no conversions between f16 and f32 must be made.
pub type F32DistanceStorage = Vec<f32>;

pub trait DistanceStorage {
    fn new(length: usize) -> Self;

    fn get(&self, index: usize) -> f32;

    fn set(&mut self, index: usize, distance: f32);
}



impl<D> SignedDistanceField<D> where D: DistanceStorage {

    /// Computes the exact signed euclidean distance field of the mask.
    pub fn compute(mask: &Mask) -> Self {
        Self::compute_with(mask, &ExactEuclidean)
    }

    /// Computes the signed distance field of the mask with the specified transform.
    /// The inside distances are measured to the nearest outside pixel,
    /// the outside distances to the nearest inside pixel.
    ///
    /// A mask without any boundary has no finite distances.
    /// In that case, every pixel is set to the image diagonal,
    /// which is larger than any distance that can be measured inside the image,
    /// positive for an all-inside mask and negative for an all-outside mask.
    pub fn compute_with(mask: &Mask, transform: &impl DistanceTransform) -> Self {
        let width = mask.width();
        let height = mask.height();
        let length = width as usize * height as usize;

        let mut distance_field = SignedDistanceField {
            width, height,
            distances: D::new(length),
            degeneracy: Degeneracy::None,
        };

        if mask.is_uniform() {
            let inside = mask.is_inside(0, 0);
            let diagonal = diagonal(width, height);

            log::warn!(
                "mask of {}x{} pixels is entirely {}, using a constant distance of {}",
                width, height, if inside { "inside" } else { "outside" }, diagonal
            );

            distance_field.degeneracy = if inside { Degeneracy::AllInside } else { Degeneracy::AllOutside };
            let distance = if inside { diagonal } else { -diagonal };

            for index in 0..length {
                distance_field.distances.set(index, distance);
            }

            return distance_field;
        }

        let internal = transform.unsigned_distances(mask);
        let external = transform.unsigned_distances(&mask.complement());

        for y in 0..height {
            for x in 0..width {
                let index = distance_field.flatten_index(x, y);

                let distance = if mask.is_inside(x, y) { internal[index] }
                    else { - external[index] };

                distance_field.distances.set(index, distance);
            }
        }

        distance_field
    }

    #[inline(always)]
    pub fn get_distance(&self, x: u32, y: u32) -> f32 {
        self.distances.get(self.flatten_index(x, y))
    }

    /// All distances in row-major order.
    pub fn iter_distances(&self) -> impl Iterator<Item = f32> + '_ {
        (0 .. self.len()).map(move |index| self.distances.get(index))
    }

    /// The smallest and largest signed distance.
    pub fn distance_range(&self) -> (f32, f32) {
        self.iter_distances().fold(
            (f32::INFINITY, f32::NEG_INFINITY),
            |(min, max), distance| (min.min(distance), max.max(distance))
        )
    }

    pub fn is_degenerate(&self) -> bool {
        self.degeneracy != Degeneracy::None
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.width as usize * self.height as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn flatten_index(&self, x: u32, y: u32) -> usize {
        self.width as usize * y as usize + x as usize
    }
}

/// The length of the image diagonal, an upper bound for any distance between two pixels.
pub fn diagonal(width: u32, height: u32) -> f32 {
    let width = width as f32;
    let height = height as f32;
    (width * width + height * height).sqrt()
}


impl DistanceStorage for F16DistanceStorage {
    fn new(length: usize) -> Self {
        vec![half::f16::INFINITY; length]
    }

    #[inline]
    fn get(&self, index: usize) -> f32 {
        self[index].to_f32()
    }

    #[inline]
    fn set(&mut self, index: usize, distance: f32) {
        self[index] = half::f16::from_f32(distance)
    }
}

impl DistanceStorage for F32DistanceStorage {
    fn new(length: usize) -> Self {
        vec![f32::INFINITY; length]
    }

    #[inline]
    fn get(&self, index: usize) -> f32 {
        self[index]
    }

    #[inline]
    fn set(&mut self, index: usize, distance: f32) {
        self[index] = distance
    }
}
