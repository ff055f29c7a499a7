use crate::split::{split_file, SplitConfig};
use crate::utils::display_bytes;
use std::path::PathBuf;
use tracing::{debug, info, info_span};

/// Base directories handed to every build step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Context {
    /// Read-only build inputs.
    pub artifact_dir: PathBuf,
    /// Writable workspace, default home for step output.
    pub scratch_dir: PathBuf,
}

impl Context {
    pub fn new(artifact_dir: impl Into<PathBuf>, scratch_dir: impl Into<PathBuf>) -> Self {
        Self {
            artifact_dir: artifact_dir.into(),
            scratch_dir: scratch_dir.into(),
        }
    }
}

/// A build step. `verify` runs for every step before any step's `run`.
pub trait Action {
    fn name(&self) -> &'static str;

    fn verify(&self, context: &Context) -> anyhow::Result<()>;

    fn run(&self, context: &Context) -> anyhow::Result<()>;
}

#[derive(Debug, Clone)]
pub struct SplitAction {
    config: SplitConfig,
}

impl SplitAction {
    pub fn new(config: SplitConfig) -> Self {
        Self { config }
    }
}

impl Action for SplitAction {
    fn name(&self) -> &'static str {
        "split"
    }

    fn verify(&self, _context: &Context) -> anyhow::Result<()> {
        Ok(self.config.verify()?)
    }

    fn run(&self, context: &Context) -> anyhow::Result<()> {
        if let Some(description) = &self.config.description {
            info!("{description}");
        }
        let request = self.config.resolve(context)?;
        let report = split_file(&request)?;
        for chunk in &report.chunks {
            debug!(
                "Chunk {} at {} ({:#.1})",
                chunk.index,
                chunk.path.display(),
                display_bytes(chunk.size)
            );
        }
        info!(
            "Wrote {} chunks ({:#.1}) with {} warnings",
            report.chunks.len(),
            display_bytes(report.source_size),
            report.warnings.len()
        );
        Ok(())
    }
}

/// Verifies every action, then runs them in order, stopping at the first error.
pub fn run_actions(actions: &[&dyn Action], context: &Context) -> anyhow::Result<()> {
    for action in actions {
        action.verify(context)?;
    }
    for action in actions {
        let span = info_span!("action", name = action.name());
        let _entered = span.enter();
        action.run(context)?;
    }
    Ok(())
}
