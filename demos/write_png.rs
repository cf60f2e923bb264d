fn main(){
    let width = 31;
    let height = 79;

    write_distance_field(512, 512, |x, y|{
        // this is a checkerboard pattern
        (x % width < width / 2) != (y % height < height / 2)
    });
}

fn write_distance_field(
    width: u32, height: u32,
    shape_function: impl Fn(u32, u32) -> bool
){
    use mask_to_sdf::prelude::*;

    let mask = Mask::from_fn(width, height, shape_function).unwrap();
    let distance_field = compute_signed_field(&mask);

    for &mode in EdgeMode::ALL.iter() {
        let normalized = apply_decay(&distance_field, Decay::new(12.0, mode).unwrap());
        let remapped = remap_range(&normalized, 0.0, 1.0).unwrap();

        quantize(&remapped, BitDepth::Eight)
            .save(format!("distance_field_{}.png", mode))
            .unwrap();
    }
}
