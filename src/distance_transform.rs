//! Unsigned distance transforms of binary images.
//!
//! A transform measures, for every pixel inside the shape,
//! the distance to the nearest pixel outside of the shape.
//! Pixels outside the shape have a distance of zero.

use crate::mask::BinaryImage;
use image::{GrayImage, Luma};


/// Computes the unsigned distance from every inside pixel to the nearest outside pixel.
pub trait DistanceTransform {

    /// Returns a row-major buffer with one distance per pixel.
    /// If the image contains no outside pixel at all,
    /// every distance is `f32::INFINITY`.
    fn unsigned_distances(&self, image: &impl BinaryImage) -> Vec<f32>;
}


/// The exact euclidean distance transform by Felzenszwalb & Huttenlocher,
/// as provided by `imageproc`. Runs in linear time.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct ExactEuclidean;

/// Approximates the euclidean distance transform.
/// The algorithm used is based on the paper `The "dead reckoning" signed distance transform`
/// by George J. Grevara, 2004. Two raster passes propagate the nearest outside pixel
/// through the image, which is faster but may be off by a fraction of a pixel on large shapes.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct DeadReckoning;


impl DistanceTransform for ExactEuclidean {
    fn unsigned_distances(&self, image: &impl BinaryImage) -> Vec<f32> {
        let width = image.width();
        let height = image.height();

        // imageproc measures the distance to the nearest non-zero pixel,
        // so the outside pixels become the foreground
        let mut any_outside = false;
        let targets = GrayImage::from_fn(width, height, |x, y| {
            let outside = !image.is_inside(x, y);
            any_outside |= outside;
            Luma([if outside { 255 } else { 0 }])
        });

        if !any_outside {
            return vec![f32::INFINITY; width as usize * height as usize];
        }

        let squared = imageproc::distance_transform::euclidean_squared_distance_transform(&targets);
        squared.pixels().map(|pixel| pixel[0].sqrt() as f32).collect()
    }
}


impl DistanceTransform for DeadReckoning {
    fn unsigned_distances(&self, image: &impl BinaryImage) -> Vec<f32> {
        let mut field = ReckoningField::new(image.width(), image.height());

        // every outside pixel is its own nearest target
        for y in 0..field.height {
            for x in 0..field.width {
                if !image.is_inside(x, y) {
                    field.set_target_and_distance(x, y, x, y, 0.0);
                }
            }
        }

        // perform forwards iteration
        for y in 0..field.height {
            for x in 0..field.width {
                let mut distance = field.get_distance(x, y);
                let mut target = field.get_distance_target(x, y);

                let top_left = field.update_distance(x, y, -1, -1, &mut distance, &mut target);
                let top = field.update_distance(x, y,  0, -1, &mut distance, &mut target);
                let top_right = field.update_distance(x, y,  1, -1, &mut distance, &mut target);
                let left = field.update_distance(x, y, -1,  0, &mut distance, &mut target);

                if top_left || top || top_right || left {
                    field.set_target_and_distance(x, y, target.0, target.1, distance);
                }
            }
        }

        // perform backwards iteration,
        // which only writes the pixels that found a closer target
        for y in (0..field.height).rev() {
            for x in (0..field.width).rev() {
                let mut distance = field.get_distance(x, y);
                let mut target = field.get_distance_target(x, y);

                let right = field.update_distance(x, y,  1,  0, &mut distance, &mut target);
                let bottom_left = field.update_distance(x, y, -1,  1, &mut distance, &mut target);
                let bottom = field.update_distance(x, y,  0,  1, &mut distance, &mut target);
                let bottom_right = field.update_distance(x, y,  1,  1, &mut distance, &mut target);

                if right || bottom_left || bottom || bottom_right {
                    field.set_target_and_distance(x, y, target.0, target.1, distance);
                }
            }
        }

        field.distances
    }
}


/// Working state of the dead reckoning passes:
/// the current distance of each pixel and the outside pixel it was measured to.
struct ReckoningField {
    width: u32,
    height: u32,
    distances: Vec<f32>,
    distance_targets: Vec<(u32, u32)>,
}

impl ReckoningField {
    fn new(width: u32, height: u32) -> Self {
        let length = width as usize * height as usize;

        ReckoningField {
            width, height,
            distances: vec![f32::INFINITY; length],
            distance_targets: vec![(0, 0); length],
        }
    }

    #[inline(always)]
    fn update_distance(
        &self, x: u32, y: u32, neighbour_x: i64, neighbour_y: i64,
        own_distance: &mut f32, own_target: &mut (u32, u32)
    ) -> bool {
        // this should be const per function call, as `neighbour` is const per function call
        let distance_to_neighbour = length(neighbour_x, neighbour_y);

        let neighbour_x = x as i64 + neighbour_x;
        let neighbour_y = y as i64 + neighbour_y;

        if !check_coordinates(neighbour_x, neighbour_y, self.width, self.height) {
            return false;
        }

        let neighbour_x = neighbour_x as u32;
        let neighbour_y = neighbour_y as u32;
        let neighbour_distance = self.get_distance(neighbour_x, neighbour_y);

        // if neighbour is closer to a target than ourselves,
        // adopt its target and measure the real distance to it
        if neighbour_distance + distance_to_neighbour < *own_distance {
            let neighbour_target = self.get_distance_target(neighbour_x, neighbour_y);
            *own_distance = distance(x, y, neighbour_target.0, neighbour_target.1);
            *own_target = neighbour_target;
            return true;
        }

        false
    }

    #[inline(always)]
    fn get_distance(&self, x: u32, y: u32) -> f32 {
        self.distances[self.flatten_index(x, y)]
    }

    #[inline(always)]
    fn get_distance_target(&self, x: u32, y: u32) -> (u32, u32) {
        self.distance_targets[self.flatten_index(x, y)]
    }

    #[inline(always)]
    fn set_target_and_distance(&mut self, x: u32, y: u32, target_x: u32, target_y: u32, distance: f32) {
        let index = self.flatten_index(x, y);
        self.distances[index] = distance;
        self.distance_targets[index] = (target_x, target_y);
    }

    #[inline]
    fn flatten_index(&self, x: u32, y: u32) -> usize {
        self.width as usize * y as usize + x as usize
    }
}

#[inline]
fn length(x: i64, y: i64) -> f32 {
    ((x * x + y * y) as f32).sqrt()
}

#[inline]
fn distance(x: u32, y: u32, target_x: u32, target_y: u32) -> f32 {
    length(x as i64 - target_x as i64, y as i64 - target_y as i64)
}

#[inline]
fn check_coordinates(x: i64, y: i64, width: u32, height: u32) -> bool {
    x >= 0 && y >= 0 && x < width as i64 && y < height as i64
}
