use crate::action::{run_actions, Context, SplitAction};
use crate::split::SplitConfig;
use anyhow::Context as _;
use byte_unit::Byte;
use clap::Parser;
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;
use tracing_indicatif::IndicatifLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

mod action;
mod split;
#[cfg(test)]
mod test_utils;
mod utils;

/// Split a disk image into chunks small enough for filesystems with file size limits.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Directory holding build inputs. `--file` is relative to it.
    artifact_dir: PathBuf,
    /// Writable workspace. `--output` is relative to it.
    scratch_dir: PathBuf,

    /// JSON step record with `file`, `name`, `suffix`, `chunk` and `output` fields.
    /// Flags given on the command line take precedence.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Image to split
    #[arg(short, long)]
    file: Option<String>,
    /// Base name of the chunks [default: the file name]
    #[arg(short, long)]
    name: Option<String>,
    /// Suffix appended to the base name before the chunk number [default: 0]
    #[arg(short, long)]
    suffix: Option<String>,
    /// Maximum chunk size, such as `4000000` or `4GiB` [default: 4290772992]
    #[arg(short, long)]
    chunk: Option<Byte>,
    /// Output directory [default: the scratch directory]
    #[arg(short, long)]
    output: Option<String>,
}

impl Args {
    fn split_config(&self) -> anyhow::Result<SplitConfig> {
        let mut config = match &self.config {
            None => SplitConfig::default(),
            Some(path) => {
                let content = std::fs::read_to_string(path)
                    .with_context(|| format!("Error reading config {}", path.display()))?;
                SplitConfig::from_json(&content)
                    .with_context(|| format!("Error parsing config {}", path.display()))?
            }
        };
        if self.file.is_some() {
            config.file.clone_from(&self.file);
        }
        if self.name.is_some() {
            config.name.clone_from(&self.name);
        }
        if self.suffix.is_some() {
            config.suffix.clone_from(&self.suffix);
        }
        if let Some(chunk) = self.chunk {
            config.chunk = Some(chunk.as_u64());
        }
        if self.output.is_some() {
            config.output.clone_from(&self.output);
        }
        Ok(config)
    }
}

fn setup_logging() {
    let indicatif_layer = IndicatifLayer::new();
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(indicatif_layer.get_stderr_writer()))
        .with(indicatif_layer)
        .init();
}

fn main() -> anyhow::Result<()> {
    setup_logging();
    let args = Args::parse();

    let config = args.split_config()?;
    let context = Context::new(args.artifact_dir, args.scratch_dir);
    let action = SplitAction::new(config);
    run_actions(&[&action], &context)
}
