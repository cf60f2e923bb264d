//! Mask to signed distance field converter.
//!
//! Examples:
//!   mask-to-sdf single mask.png sdf.png --decay-distance 30 --edge-mode smooth --output-size 512x512
//!   mask-to-sdf multi mask.png sdf_rgba.png --distances 10,25,50
//!   mask-to-sdf batch masks/ sdf/ --bit-depth 8
//!
//! Options can also be read from a TOML file with `[single]` and `[multi]` tables,
//! command line flags override the values of the file.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::info;

use mask_to_sdf::prelude::*;


#[derive(Parser, Debug)]
#[command(author, version, about = "Convert mask images into signed distance field textures", long_about = None)]
struct Cli {
    /// TOML file with `[single]` and `[multi]` option tables.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a single channel distance field.
    Single {
        input: PathBuf,
        output: PathBuf,
        #[command(flatten)] options: SingleArgs,
    },

    /// Pack up to four decay distances into the channels of an RGBA image.
    Multi {
        input: PathBuf,
        output: PathBuf,
        #[command(flatten)] options: MultiArgs,
    },

    /// Convert every mask image of a folder into `sdf_<file name>`, as PNG.
    Batch {
        input_folder: PathBuf,
        output_folder: PathBuf,
        #[command(flatten)] options: SingleArgs,
    },
}

#[derive(Args, Debug)]
struct SingleArgs {
    /// Pixel distance at which the decay saturates.
    #[arg(long)] decay_distance: Option<f32>,
    /// Resize the mask before thresholding, as `WIDTHxHEIGHT`.
    #[arg(long, value_parser = parse_size)] output_size: Option<(u32, u32)>,
    /// One of linear, exponential, smooth.
    #[arg(long)] edge_mode: Option<String>,
    /// Output range as `MIN,MAX`.
    #[arg(long, value_parser = parse_range)] normalize_range: Option<(f32, f32)>,
    /// 8 or 16.
    #[arg(long)] bit_depth: Option<u8>,
    /// Skip the blur before thresholding.
    #[arg(long)] no_antialiasing: bool,
}

#[derive(Args, Debug)]
struct MultiArgs {
    /// Comma separated decay distances, one per channel, at most four.
    #[arg(long, value_delimiter = ',')] distances: Vec<f32>,
    #[arg(long)] edge_mode: Option<String>,
    #[arg(long, value_parser = parse_size)] output_size: Option<(u32, u32)>,
    /// Require a decay distance for every channel instead of filling the alpha channel.
    #[arg(long)] explicit_channels: bool,
    /// Blur the mask before thresholding.
    #[arg(long)] antialiasing: bool,
}


impl SingleArgs {
    fn apply(self, options: &mut SdfOptions) -> Result<()> {
        if let Some(distance) = self.decay_distance { options.decay_distance = distance; }
        if let Some(size) = self.output_size { options.output_size = size; }
        if let Some(mode) = self.edge_mode { options.edge_mode = mode.parse()?; }
        if let Some(range) = self.normalize_range { options.normalize_range = range; }
        if let Some(bits) = self.bit_depth { options.bit_depth = BitDepth::try_from(bits)?; }
        if self.no_antialiasing { options.antialiasing = false; }
        Ok(())
    }
}

impl MultiArgs {
    fn apply(self, options: &mut MultiChannelOptions) -> Result<()> {
        if !self.distances.is_empty() { options.distances = self.distances; }
        if let Some(mode) = self.edge_mode { options.edge_mode = mode.parse()?; }
        if let Some(size) = self.output_size { options.output_size = size; }
        if self.explicit_channels { options.fill_policy = ChannelFillPolicy::Explicit; }
        if self.antialiasing { options.antialiasing = true; }
        Ok(())
    }
}

fn parse_size(text: &str) -> std::result::Result<(u32, u32), String> {
    let (width, height) = text.split_once('x').ok_or_else(|| format!("expected WIDTHxHEIGHT, got `{}`", text))?;
    let width = width.trim().parse().map_err(|e| format!("width: {e}"))?;
    let height = height.trim().parse().map_err(|e| format!("height: {e}"))?;
    Ok((width, height))
}

fn parse_range(text: &str) -> std::result::Result<(f32, f32), String> {
    let (min, max) = text.split_once(',').ok_or_else(|| format!("expected MIN,MAX, got `{}`", text))?;
    let min = min.trim().parse().map_err(|e| format!("min: {e}"))?;
    let max = max.trim().parse().map_err(|e| format!("max: {e}"))?;
    Ok((min, max))
}


fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .init();

    let cli = Cli::parse();

    let file = match &cli.config {
        Some(path) => OptionsFile::load_from_file(path)
            .with_context(|| format!("load options {:?}", path))?,
        None => OptionsFile::default(),
    };

    match cli.command {
        Command::Single { input, output, options: args } => {
            let mut options = file.single;
            args.apply(&mut options)?;

            let summary = generate_sdf(&input, &output, &options)
                .with_context(|| format!("convert {:?}", input))?;

            info!(
                "{}x{} distance field, raw distances {:?}, degeneracy {:?}",
                summary.width, summary.height, summary.distance_range, summary.degeneracy
            );
        }

        Command::Multi { input, output, options: args } => {
            let mut options = file.multi;
            args.apply(&mut options)?;

            generate_multichannel_sdf(&input, &output, &options)
                .with_context(|| format!("convert {:?}", input))?;
        }

        Command::Batch { input_folder, output_folder, options: args } => {
            let mut options = file.single;
            args.apply(&mut options)?;

            let summaries = batch_process_sdf(&input_folder, &output_folder, &options)
                .with_context(|| format!("convert folder {:?}", input_folder))?;

            info!("converted {} masks into {:?}", summaries.len(), output_folder);
        }
    }

    Ok(())
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_sizes_and_ranges(){
        assert_eq!(parse_size("512x256"), Ok((512, 256)));
        assert!(parse_size("512").is_err());
        assert_eq!(parse_range("0.25, 0.75"), Ok((0.25, 0.75)));
        assert!(parse_range("0.25").is_err());
    }

    #[test]
    fn flags_override_file_options(){
        let cli = Cli::parse_from([
            "mask-to-sdf", "single", "in.png", "out.png",
            "--edge-mode", "exponential", "--bit-depth", "8", "--no-antialiasing",
        ]);

        let mut options = SdfOptions { decay_distance: 30.0, ..SdfOptions::default() };
        match cli.command {
            Command::Single { options: args, .. } => args.apply(&mut options).unwrap(),
            other => panic!("unexpected command {:?}", other),
        }

        assert_eq!(options.decay_distance, 30.0);
        assert_eq!(options.edge_mode, EdgeMode::Exponential);
        assert_eq!(options.bit_depth, BitDepth::Eight);
        assert!(!options.antialiasing);
    }

    #[test]
    fn bogus_edge_mode_is_rejected(){
        let cli = Cli::parse_from(["mask-to-sdf", "single", "in.png", "out.png", "--edge-mode", "bogus"]);

        let mut options = SdfOptions::default();
        match cli.command {
            Command::Single { options: args, .. } => assert!(args.apply(&mut options).is_err()),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn multi_distances_are_comma_separated(){
        let cli = Cli::parse_from(["mask-to-sdf", "multi", "in.png", "out.png", "--distances", "10,25,50"]);

        let mut options = MultiChannelOptions::default();
        match cli.command {
            Command::Multi { options: args, .. } => args.apply(&mut options).unwrap(),
            other => panic!("unexpected command {:?}", other),
        }

        assert_eq!(options.distances, vec![10.0, 25.0, 50.0]);
        assert_eq!(options.fill_policy, ChannelFillPolicy::OpaqueAlpha);
    }
}
