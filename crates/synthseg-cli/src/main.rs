use argh::FromArgs;
use std::path::PathBuf;

use synthseg::dataset::{DatasetLayout, Generator, GeneratorConfig};

#[derive(FromArgs)]
/// Generate a synthetic segmentation dataset by pasting warped instance
/// cutouts onto warped backgrounds
struct Args {
    /// directory with one "<index> <name>" subdirectory per class
    #[argh(option, short = 'i')]
    instances: PathBuf,

    /// directory with the background images
    #[argh(option, short = 'b')]
    backgrounds: PathBuf,

    /// output dataset directory
    #[argh(option, short = 'o', default = "PathBuf::from(\"dataset\")")]
    output: PathBuf,

    /// JSON configuration file, overridden by the flags below
    #[argh(option, short = 'c')]
    config: Option<PathBuf>,

    /// number of samples to generate
    #[argh(option, short = 'n')]
    samples: Option<usize>,

    /// fraction of the samples in the train split
    #[argh(option)]
    split: Option<f64>,

    /// base random seed
    #[argh(option, short = 's')]
    seed: Option<u64>,

    /// number of draws tried per sample before skipping it
    #[argh(option)]
    max_attempts: Option<usize>,

    /// keep the instance brightness unchanged
    #[argh(switch)]
    no_brightness: bool,

    /// manifest path, defaults to data.yaml in the output directory
    #[argh(option, short = 'm')]
    manifest: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let mut config = match &args.config {
        Some(path) => GeneratorConfig::from_json_file(path)?,
        None => GeneratorConfig::default(),
    };

    if let Some(samples) = args.samples {
        config.samples = samples;
    }
    if let Some(split) = args.split {
        config.train_val_split = split;
    }
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if let Some(max_attempts) = args.max_attempts {
        config.max_attempts = max_attempts;
    }
    if args.no_brightness {
        config.brightness = None;
    }
    config.validate()?;

    let generator = Generator::from_dirs(config, &args.instances, &args.backgrounds)?;

    let mut layout = DatasetLayout::new(&args.output);
    if let Some(manifest) = args.manifest {
        layout = layout.with_manifest_path(manifest);
    }

    let report = generator.run(&layout)?;
    log::info!("dataset written to {:?}", layout.root());

    println!("{report}");
    for skipped in &report.skipped {
        println!("  sample {}: {}", skipped.index, skipped.reason);
    }

    Ok(())
}
