use argh::FromArgs;
use std::{
    path::PathBuf,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use facewarp::augment::{presets, AugmentConfig, Augmentor, MethodSelector};

#[derive(FromArgs, Debug)]
/// Generate augmented variants of the processed face images of one or all identities
struct Args {
    /// root of the dataset holding the processed/ directory
    #[argh(option, short = 'd', default = "PathBuf::from(\"data\")")]
    data_root: PathBuf,

    /// identity to augment, all identities if omitted
    #[argh(option, short = 'p')]
    person: Option<String>,

    /// rotation, perspective, distortion, lighting or random (default)
    #[argh(option, short = 'm')]
    method: Option<String>,

    /// rotate every variant by this exact angle in degrees, instead of a method
    #[argh(option, short = 'a')]
    angle: Option<f64>,

    /// variants to generate per source image
    #[argh(option, short = 'c', default = "1")]
    count: usize,

    /// seed of the random preset selection, combined with each identity name
    #[argh(option, short = 's', default = "42")]
    seed: u64,

    /// replace variants that already exist
    #[argh(switch)]
    overwrite: bool,

    /// list the identities and exit
    #[argh(switch, short = 'l')]
    list: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Args = argh::from_env();

    let cancel_token = Arc::new(AtomicBool::new(false));

    ctrlc::set_handler({
        let cancel_token = cancel_token.clone();
        move || {
            println!("Received Ctrl-C signal. Stopping after the current variant.");
            cancel_token.store(true, Ordering::SeqCst);
        }
    })?;

    let augmentor = Augmentor::new(AugmentConfig::with_data_root(args.data_root))
        .with_cancel_flag(cancel_token.clone());

    let identities = match args.person {
        Some(person) => vec![person],
        None => augmentor.list_identities()?,
    };

    if args.list {
        for identity in identities.iter() {
            let sources = augmentor.source_images(identity)?;
            println!("{identity}: {} processed images", sources.len());
        }
        return Ok(());
    }

    let method = MethodSelector::from_options(args.method.as_deref(), args.angle)?;

    let mut total_augmented = 0;
    for identity in identities.iter() {
        if cancel_token.load(Ordering::SeqCst) {
            break;
        }

        // same seed and identity, same file names on every rerun
        let mut rng = presets::identity_rng(args.seed, identity);
        match augmentor.augment_identity(identity, method, args.count, args.overwrite, &mut rng) {
            Ok(report) => total_augmented += report.images_augmented,
            Err(e) => log::error!("Skipping {identity}: {e}"),
        }
    }

    println!(
        "Created {total_augmented} augmented images for {} identities",
        identities.len()
    );

    Ok(())
}
