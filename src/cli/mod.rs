// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Parses arguments with clap and hands off to Layer 2.
//
//   inspect  — availability of images/labels for a split
//   preview  — one sample, shapes and class counts
//   iterate  — a full pass through the batch loader
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, InspectArgs, IterateArgs, PreviewArgs};

use crate::application::{
    inspect_use_case::InspectUseCase,
    iterate_use_case::IterateUseCase,
    preview_use_case::PreviewUseCase,
};
use crate::infra::config_store::ConfigStore;

#[derive(Parser, Debug)]
#[command(
    name = "robustmis-loader",
    version,
    about = "Inspect, preview and iterate ROBUST-MIS segmentation splits."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Dispatch to the matching use case.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Inspect(args) => run_inspect(args),
            Commands::Preview(args) => run_preview(args),
            Commands::Iterate(args) => run_iterate(args),
        }
    }
}

fn run_inspect(args: InspectArgs) -> Result<()> {
    let cfg = args.dataset.resolve()?;
    let summary = InspectUseCase::new(cfg.dataset).execute()?;

    println!("split:           {}", summary.split);
    println!("index file:      {}", summary.index_file.display());
    println!("entries:         {}", summary.entries);
    println!("images missing:  {}", summary.images_missing);
    println!("labels present:  {}", summary.labels_present);
    println!("labels missing:  {}", summary.labels_missing);
    println!("labels unlisted: {}", summary.labels_unlisted);
    if summary.weak_labels {
        println!("(labels resolved from the weak label directory)");
    }

    if let Some(path) = &args.summary_json {
        InspectUseCase::write_json(&summary, path)?;
        println!("Summary written to {}", path.display());
    }
    Ok(())
}

fn run_preview(args: PreviewArgs) -> Result<()> {
    let cfg = args.dataset.resolve()?;
    let use_case = PreviewUseCase::new(cfg.dataset)?;
    let (sample, info) = use_case.sample(args.index)?;

    println!("index:        {}", info.index);
    println!("image id:     {}", info.image_id);
    println!("image shape:  {:?}", info.image_shape);
    println!("label shape:  {:?}", info.label_shape);
    match &info.label_source {
        Some(p) => println!("label source: {} ({:?})", p.display(), info.label_status),
        None => println!("label source: none ({:?})", info.label_status),
    }
    println!("class pixels: {:?}", info.class_pixels);

    if let Some(path) = &args.colorize {
        use_case.write_colorized(&sample, path)?;
        println!("Colorized label written to {}", path.display());
    }
    Ok(())
}

fn run_iterate(args: IterateArgs) -> Result<()> {
    let cfg = args.resolve()?;

    if let Some(path) = &args.save_config {
        let store = ConfigStore::new(path);
        store.save(&cfg)?;
        tracing::info!("Run config saved to '{}'", store.path().display());
    }

    let mut use_case = IterateUseCase::new(cfg);
    if let Some(path) = &args.metrics_csv {
        use_case = use_case.with_metrics(path);
    }
    if let Some(n) = args.max_batches {
        use_case = use_case.with_max_batches(n);
    }
    let report = use_case.execute()?;

    println!(
        "train: {} batches, {} samples",
        report.train_batches, report.train_samples
    );
    if report.val_batches > 0 {
        println!(
            "val:   {} batches, {} samples",
            report.val_batches, report.val_samples
        );
    }
    Ok(())
}
