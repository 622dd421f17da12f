mod config;
mod logging;
mod ui;

use std::cell::RefCell;
use std::path::PathBuf;
use std::process::ExitCode;
use std::rc::Rc;

use config::AppConfig;
use tracing::info;
use voc_verifier_adapters::{
    present_annotation, present_sample_row, present_status, present_subset_counts,
    DirectoryImageLister, FsFileMover, ImageCrateDecoder, JsonSnapshotStore, SeededRandomSource,
    VocAnnotationReader,
};
use voc_verifier_application::{
    AnnotationReader, ApplicationError, ImageLister, InitializeSessionCommand, SessionController,
    SessionOptions, SessionPorts, SnapshotStore,
};
use voc_verifier_domain::{
    DatasetLayout, Sample, SampleLocation, SessionSnapshot, StatusCounts, Subset,
};

fn main() -> ExitCode {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::from(2);
        }
    };
    logging::init_logging(&config.log_filter);

    let args: Vec<String> = std::env::args().collect();
    let command = parse_command(&args);
    match run_command(command, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(CommandError::Usage(msg)) => {
            eprintln!("{msg}");
            print_usage();
            ExitCode::from(2)
        }
        Err(CommandError::Runtime(msg)) => {
            eprintln!("{msg}");
            ExitCode::from(1)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Review {
        dataset: PathBuf,
        resume: bool,
        seed: Option<u64>,
    },
    Stats {
        dataset: PathBuf,
    },
    Inspect {
        dataset: PathBuf,
        subset: Subset,
        file: String,
    },
}

#[derive(Debug, Clone)]
enum CommandError {
    Usage(String),
    Runtime(String),
}

fn parse_command(args: &[String]) -> Result<Command, CommandError> {
    if args.len() <= 1 {
        return Err(CommandError::Usage("missing dataset path".to_string()));
    }

    match args[1].as_str() {
        "review" => parse_review(&args[2..]),
        "stats" => {
            let dataset = args
                .get(2)
                .ok_or_else(|| CommandError::Usage("missing dataset path".to_string()))?;
            Ok(Command::Stats {
                dataset: PathBuf::from(dataset),
            })
        }
        "inspect" => {
            if args.len() < 5 {
                return Err(CommandError::Usage(
                    "inspect needs <dataset> <subset> <file>".to_string(),
                ));
            }
            let subset = args[3]
                .parse::<Subset>()
                .map_err(|error| CommandError::Usage(error.to_string()))?;
            Ok(Command::Inspect {
                dataset: PathBuf::from(&args[2]),
                subset,
                file: args[4].clone(),
            })
        }
        other if other.starts_with('-') => {
            Err(CommandError::Usage(format!("unknown option: {other}")))
        }
        _ => parse_review(&args[1..]),
    }
}

fn parse_review(args: &[String]) -> Result<Command, CommandError> {
    let mut dataset = None;
    let mut resume = false;
    let mut seed = None;

    let mut rest = args.iter();
    while let Some(arg) = rest.next() {
        match arg.as_str() {
            "--resume" => resume = true,
            "--seed" => {
                let raw = rest
                    .next()
                    .ok_or_else(|| CommandError::Usage("missing value for --seed".to_string()))?;
                seed = Some(config::parse_seed(raw).map_err(CommandError::Usage)?);
            }
            flag if flag.starts_with("--") => {
                return Err(CommandError::Usage(format!("unknown option: {flag}")));
            }
            path if dataset.is_none() => dataset = Some(PathBuf::from(path)),
            extra => {
                return Err(CommandError::Usage(format!("unexpected argument: {extra}")));
            }
        }
    }

    let dataset = dataset.ok_or_else(|| CommandError::Usage("missing dataset path".to_string()))?;
    Ok(Command::Review {
        dataset,
        resume,
        seed,
    })
}

fn run_command(
    command: Result<Command, CommandError>,
    config: &AppConfig,
) -> Result<(), CommandError> {
    match command? {
        Command::Review {
            dataset,
            resume,
            seed,
        } => run_review(dataset, resume, seed.or(config.seed), config),
        Command::Stats { dataset } => run_stats(&DatasetLayout::new(dataset)),
        Command::Inspect {
            dataset,
            subset,
            file,
        } => {
            let sample = Sample::new(subset, file)
                .map_err(|error| CommandError::Usage(format!("invalid sample: {error}")))?;
            run_inspect(&DatasetLayout::new(dataset), &sample)
        }
    }
}

fn run_review(
    dataset: PathBuf,
    resume: bool,
    seed: Option<u64>,
    config: &AppConfig,
) -> Result<(), CommandError> {
    let screen = Rc::new(RefCell::new(ui::ReviewScreen::new(
        config.window_width,
        config.window_height,
    )));
    let ports = SessionPorts {
        lister: Box::new(DirectoryImageLister),
        mover: Box::new(FsFileMover),
        annotations: Box::new(VocAnnotationReader),
        snapshots: Box::new(JsonSnapshotStore),
        random: Box::new(SeededRandomSource::new(seed)),
        renderer: Box::new(ui::CanvasRenderer::new(
            screen.clone(),
            Box::new(ImageCrateDecoder),
        )),
    };
    let options = SessionOptions {
        advance_after_decision: config.advance_after_decision,
    };

    info!(dataset = %dataset.display(), resume, ?seed, "starting review session");
    let mut controller = SessionController::initialize(
        InitializeSessionCommand {
            dataset_root: dataset,
            resume,
        },
        ports,
        options,
    )
    .map_err(|error| CommandError::Runtime(format!("could not start session: {error}")))?;

    ui::run_review_window(&mut controller, screen).map_err(CommandError::Runtime)
}

fn run_stats(layout: &DatasetLayout) -> Result<(), CommandError> {
    let lister = DirectoryImageLister;
    let mut quarantined_rows = Vec::new();
    let mut any_listed = false;
    let mut live_total = 0;

    for subset in Subset::ALL {
        let live = count_or_missing(&lister, &layout.subset_dir(subset))?;
        let quarantined = match lister.list_images(&layout.quarantine_dir(subset)) {
            Ok(names) => names,
            Err(ApplicationError::NotFound(_)) => Vec::new(),
            Err(error) => return Err(CommandError::Runtime(error.to_string())),
        };
        any_listed |= live.is_some();
        live_total += live.unwrap_or(0);
        println!(
            "{}",
            present_subset_counts(subset, live.unwrap_or(0), quarantined.len())
        );
        for name in quarantined {
            let sample = Sample::new(subset, name)
                .map_err(|error| CommandError::Runtime(error.to_string()))?;
            quarantined_rows.push(present_sample_row(&sample, SampleLocation::Quarantined));
        }
    }

    if !any_listed {
        return Err(CommandError::Runtime(
            ApplicationError::DatasetUnavailable(layout.root().display().to_string()).to_string(),
        ));
    }

    let snapshot = JsonSnapshotStore
        .load(&layout.snapshot_path())
        .map_err(|error| CommandError::Runtime(error.to_string()))?;
    match snapshot {
        Some(snapshot) => println!(
            "{}",
            saved_session_summary(&snapshot, live_total, quarantined_rows.len())
        ),
        None => println!("no saved session"),
    }

    for row in quarantined_rows {
        println!("{row}");
    }
    Ok(())
}

/// Status line for a saved session; `Total` is the live image count on disk.
fn saved_session_summary(
    snapshot: &SessionSnapshot,
    live_total: usize,
    removed: usize,
) -> String {
    let counts = StatusCounts {
        total: live_total,
        processed: snapshot.processed_samples,
        kept: snapshot.kept_samples,
        removed,
    };
    format!(
        "saved session: {}, History: {}",
        present_status(&counts),
        snapshot.history.len()
    )
}

fn count_or_missing(
    lister: &DirectoryImageLister,
    dir: &std::path::Path,
) -> Result<Option<usize>, CommandError> {
    match lister.list_images(dir) {
        Ok(names) => Ok(Some(names.len())),
        Err(ApplicationError::NotFound(_)) => Ok(None),
        Err(error) => Err(CommandError::Runtime(error.to_string())),
    }
}

fn run_inspect(layout: &DatasetLayout, sample: &Sample) -> Result<(), CommandError> {
    let reader = VocAnnotationReader;
    let live_path = layout.annotation_path(sample, SampleLocation::Live);
    let annotation = match reader.read_annotation(&live_path) {
        Err(ApplicationError::MissingFile(_)) => {
            let quarantined_path = layout.annotation_path(sample, SampleLocation::Quarantined);
            reader.read_annotation(&quarantined_path)
        }
        other => other,
    }
    .map_err(|error| CommandError::Runtime(format!("inspect failed: {error}")))?;

    for line in present_annotation(sample, &annotation) {
        println!("{line}");
    }
    Ok(())
}

fn print_usage() {
    println!("usage:");
    println!("  voc-verifier review <dataset> [--resume] [--seed <n>]");
    println!("  voc-verifier <dataset> [--resume] [--seed <n>]");
    println!("  voc-verifier stats <dataset>");
    println!("  voc-verifier inspect <dataset> <train|validation> <file>");
}
