use argh::FromArgs;
use std::path::PathBuf;

use trimorph::config::MorphConfig;
use trimorph::pipeline;

#[derive(FromArgs)]
/// Morph two images along their landmarks and write the sequence as an animated GIF
struct Args {
    /// path to the JSON morph config
    #[argh(option, short = 'c')]
    config: PathBuf,

    /// path to the output GIF, overrides the config
    #[argh(option, short = 'o')]
    output: Option<PathBuf>,

    /// directory to write every frame as PNG, overrides the config
    #[argh(option)]
    frames_dir: Option<PathBuf>,

    /// number of frames of a linear schedule, overrides the config fractions
    #[argh(option, short = 'n')]
    num_frames: Option<usize>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let mut config = MorphConfig::from_file(&args.config)?;

    // command line paths are relative to the working directory
    if let Some(output) = args.output {
        config.output = output;
    }
    if let Some(frames_dir) = args.frames_dir {
        config.frames_dir = Some(frames_dir);
    }
    if let Some(num_frames) = args.num_frames {
        config.num_frames = num_frames;
        config.warp_fractions = None;
        config.dissolve_fractions = None;
    }

    let summary = pipeline::run(&config)?;
    log::debug!("{summary:?}");

    println!(
        "Wrote {} frames of {} to {}",
        summary.num_frames,
        summary.image_size,
        summary.output.display()
    );
    if let Some(dir) = summary.frames_dir {
        println!("Frames saved in {}", dir.display());
    }

    Ok(())
}
