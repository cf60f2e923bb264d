fn main(){
    use mask_to_sdf::prelude::*;

    env_logger::init();

    let options = SdfOptions {
        decay_distance: 30.0,
        output_size: (512, 512),
        edge_mode: EdgeMode::Smooth,
        ..SdfOptions::default()
    };

    let summary = generate_sdf("images/sketch.png", "images/sketch_distance.png", &options).unwrap();
    println!("raw distances range from {} to {}", summary.distance_range.0, summary.distance_range.1);

    let options = MultiChannelOptions {
        distances: vec![10.0, 25.0, 50.0],
        ..MultiChannelOptions::default()
    };

    generate_multichannel_sdf("images/sketch.png", "images/sketch_multichannel.png", &options).unwrap();
}
