use std::{
    fs::File,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;
use clap::{Parser, ValueEnum};
use log::debug;
use schemabuilder::{
    EditorConfig, Value,
    data::{AppData, IdSource, OutputFormat, RandomIds, SequentialIds, render},
};

/// How new field ids are generated.
#[derive(ValueEnum, Clone, Copy, Debug)]
enum IdStrategy {
    /// Random UUIDs.
    Random,
    /// Counting UUIDs, reproducible between runs.
    Sequential,
}

/// Build a nested key/value schema in the terminal and print it.
#[derive(Parser, Debug)]
#[command(name = "schemabuilder", version, about)]
struct Cli {
    /// Editor settings file (`.toml` or `.json`).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Format of the submitted object printed on exit.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Field id generation.
    #[arg(long, value_enum, default_value_t = IdStrategy::Random)]
    ids: IdStrategy,

    /// Write log records to this file instead of the in-app debug console.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref())?;

    let config = match &cli.config {
        Some(path) => EditorConfig::load(path)?,
        None => EditorConfig::default(),
    };

    let ids: Box<dyn IdSource> = match cli.ids {
        IdStrategy::Random => Box::new(RandomIds),
        IdStrategy::Sequential => Box::new(SequentialIds::new()),
    };

    // Submissions are logged by the editor and printed below on exit.
    let app = AppData::new(config, ids)
        .with_on_change(Arc::new(|output: &Value| debug!("preview: {output}")));

    let app = schemabuilder::run(app)?;

    match app.submitted {
        Some(output) => println!("{}", render(&output, cli.format)?),
        None => eprintln!("Nothing submitted"),
    }
    Ok(())
}

// stderr belongs to the terminal UI while it runs, so records go either to a
// file or to Cursive's debug console.
fn init_logging(log_file: Option<&Path>) -> anyhow::Result<()> {
    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
                .target(env_logger::Target::Pipe(Box::new(file)))
                .init();
        }
        None => {
            schemabuilder::cursive::logger::init();
            schemabuilder::cursive::logger::set_filter_levels_from_env();
        }
    }
    Ok(())
}
