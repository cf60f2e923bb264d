use crate::error::{Result, SdfError};
use image::{GrayImage, ImageBuffer, Luma};
use image::imageops::FilterType;


/// Represents an image with each pixel being either true or false,
/// corresponding to inside-the-shape and outside-of-the-shape respectively.
pub trait BinaryImage {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    fn is_inside(&self, x: u32, y: u32) -> bool;

    /// Whether every pixel is on the same side of the shape.
    fn is_uniform(&self) -> bool {
        let first = self.is_inside(0, 0);
        (0 .. self.height()).all(|y| (0 .. self.width()).all(|x| self.is_inside(x, y) == first))
    }
}


/// An owned, row-major binary mask.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Mask {
    width: u32,
    height: u32,
    inside: Vec<bool>,
}

/// Grayscale intensity above which a pixel is inside the mask,
/// relative to the full intensity range.
pub const THRESHOLD: f32 = 0.5;

/// Gaussian sigma of the antialiasing blur, which yields a 3x3 kernel.
pub const ANTIALIASING_SIGMA: f32 = 0.5;


impl Mask {

    /// Create a mask by evaluating the shape function for every pixel.
    pub fn from_fn(width: u32, height: u32, shape: impl Fn(u32, u32) -> bool) -> Result<Self> {
        check_dimensions(width, height)?;

        let mut inside = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                inside.push(shape(x, y));
            }
        }

        Ok(Mask { width, height, inside })
    }

    /// Create a mask from one byte per pixel,
    /// with all pixels brighter than half intensity being inside-the-shape.
    pub fn from_bytes(width: u32, height: u32, buffer: &[u8]) -> Result<Self> {
        check_dimensions(width, height)?;

        if buffer.len() != width as usize * height as usize {
            return Err(SdfError::invalid(format!(
                "buffer of {} bytes does not match {}x{} pixels", buffer.len(), width, height
            )));
        }

        let inside = buffer.iter()
            .map(|&value| value as f32 / 255.0 > THRESHOLD)
            .collect();

        Ok(Mask { width, height, inside })
    }

    /// Threshold a grey-scale image after optionally resizing
    /// and blurring its continuous intensities.
    ///
    /// The image is resampled with a Lanczos filter when `output_size` is not `(0, 0)`
    /// and differs from the image size. The blur is applied to the intensities,
    /// never to the thresholded mask, so only the threshold decisions are smoothed.
    pub fn from_gray_image(image: &GrayImage, output_size: (u32, u32), antialiasing: bool) -> Result<Self> {
        let resized;
        let image = match output_size {
            (0, 0) => image,
            (0, _) | (_, 0) => return Err(SdfError::invalid(format!(
                "output size {:?} must be (0, 0) or have both dimensions positive", output_size
            ))),

            (width, height) if (width, height) == image.dimensions() => image,
            (width, height) => {
                log::debug!("resampling mask from {:?} to {:?}", image.dimensions(), output_size);
                resized = image::imageops::resize(image, width, height, FilterType::Lanczos3);
                &resized
            }
        };

        let (width, height) = image.dimensions();
        check_dimensions(width, height)?;

        let intensities: ImageBuffer<Luma<f32>, Vec<f32>> = ImageBuffer::from_fn(width, height, |x, y| {
            Luma([image.get_pixel(x, y)[0] as f32 / 255.0])
        });

        let intensities = if antialiasing { blur_reflected(&intensities) } else { intensities };

        let inside = intensities.pixels()
            .map(|pixel| pixel[0] > THRESHOLD)
            .collect();

        Ok(Mask { width, height, inside })
    }

    /// A mask where every pixel has the opposite membership.
    pub fn complement(&self) -> Self {
        Mask {
            width: self.width,
            height: self.height,
            inside: self.inside.iter().map(|inside| !inside).collect(),
        }
    }

    pub fn count_inside(&self) -> usize {
        self.inside.iter().filter(|&&inside| inside).count()
    }

    #[inline]
    pub fn flatten_index(&self, x: u32, y: u32) -> usize {
        self.width as usize * y as usize + x as usize
    }
}

impl BinaryImage for Mask {
    #[inline]
    fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn is_inside(&self, x: u32, y: u32) -> bool {
        self.inside[self.flatten_index(x, y)]
    }

    fn is_uniform(&self) -> bool {
        self.inside.windows(2).all(|pair| pair[0] == pair[1])
    }
}

type Intensities = ImageBuffer<Luma<f32>, Vec<f32>>;

/// Border pixels around the image while blurring, wide enough for the whole kernel.
const BLUR_PADDING: u32 = 2;

/// Gaussian blur that mirrors the image at its edges, excluding the edge pixel itself,
/// instead of repeating the edge pixel.
fn blur_reflected(intensities: &Intensities) -> Intensities {
    let (width, height) = intensities.dimensions();

    let padded: Intensities = ImageBuffer::from_fn(width + 2 * BLUR_PADDING, height + 2 * BLUR_PADDING, |x, y| {
        let source_x = reflect_101(x as i64 - BLUR_PADDING as i64, width);
        let source_y = reflect_101(y as i64 - BLUR_PADDING as i64, height);
        *intensities.get_pixel(source_x, source_y)
    });

    let blurred = imageproc::filter::gaussian_blur_f32(&padded, ANTIALIASING_SIGMA);
    image::imageops::crop_imm(&blurred, BLUR_PADDING, BLUR_PADDING, width, height).to_image()
}

/// Maps an index outside `0 .. length` back inside by mirroring at the first and last index,
/// so that `-1` becomes `1` and `length` becomes `length - 2`.
fn reflect_101(index: i64, length: u32) -> u32 {
    if length == 1 { return 0; }

    let period = 2 * (length as i64 - 1);
    let index = index.rem_euclid(period);
    (if index < length as i64 { index } else { period - index }) as u32
}

fn check_dimensions(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(SdfError::invalid(format!("mask must be at least 1x1, got {}x{}", width, height)));
    }

    Ok(())
}
