use crate::action::Context;
use crate::split::chunk::{byte_range_chunks, Chunk};
use crate::split::error::{Result, SplitError};
use itertools::Itertools;
use serde::Deserialize;
use std::path::{Component, Path, PathBuf};

/// Largest file size FAT32 can practically hold.
pub const DEFAULT_CHUNK_SIZE: u64 = 4_290_772_992;
pub const DEFAULT_SUFFIX: &str = "0";
pub const ACTION_NAME: &str = "split";

/// Raw step configuration, as found in the pipeline's step record.
///
/// ```json
/// {"action": "split", "file": "disk.img", "name": "disk", "suffix": "0", "chunk": 4290772992, "output": "out/"}
/// ```
///
/// Only `file` is required. Empty strings and a zero `chunk` are treated as unset.
/// `action` and `description` are the pipeline's common step keys; `action`, when
/// present, must name this step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SplitConfig {
    pub action: Option<String>,
    pub description: Option<String>,
    pub file: Option<String>,
    pub name: Option<String>,
    pub suffix: Option<String>,
    pub chunk: Option<u64>,
    pub output: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

impl SplitConfig {
    pub fn from_json(content: &str) -> serde_json::Result<Self> {
        serde_json::from_str(content)
    }

    pub fn verify(&self) -> Result<()> {
        if let Some(action) = non_empty(&self.action).filter(|a| *a != ACTION_NAME) {
            return Err(SplitError::UnexpectedAction {
                action: action.to_string(),
            });
        }
        match non_empty(&self.file) {
            Some(_) => Ok(()),
            None => Err(SplitError::Configuration { field: "file" }),
        }
    }

    pub fn resolve(&self, context: &Context) -> Result<SplitRequest> {
        let file = non_empty(&self.file).ok_or(SplitError::Configuration { field: "file" })?;

        let output_dir = match non_empty(&self.output) {
            None => context.scratch_dir.clone(),
            Some(output) => join_relative(&context.scratch_dir, output),
        };
        let base_name = non_empty(&self.name).unwrap_or(file);
        let suffix = non_empty(&self.suffix).unwrap_or(DEFAULT_SUFFIX);
        let chunk_size = match self.chunk {
            None | Some(0) => DEFAULT_CHUNK_SIZE,
            Some(size) => size,
        };

        Ok(SplitRequest {
            source_path: join_relative(&context.artifact_dir, file),
            output_dir,
            name_prefix: format!("{base_name}.{suffix}"),
            chunk_size,
        })
    }
}

/// Joins `relative` below `base` even when it is written as an absolute path,
/// so a configured `/disk.img` still resolves inside the base directory.
fn join_relative(base: &Path, relative: impl AsRef<Path>) -> PathBuf {
    let mut path = base.to_path_buf();
    for component in relative.as_ref().components() {
        match component {
            Component::Prefix(_) | Component::RootDir | Component::CurDir => {}
            other => path.push(other),
        }
    }
    path
}

/// A fully resolved split operation. `chunk_size` is never zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitRequest {
    pub source_path: PathBuf,
    pub output_dir: PathBuf,
    pub name_prefix: String,
    pub chunk_size: u64,
}

impl SplitRequest {
    pub fn chunk_path(&self, index: usize) -> PathBuf {
        join_relative(&self.output_dir, Chunk::file_name(&self.name_prefix, index))
    }

    pub fn plan(&self, file_size: u64) -> Vec<Chunk> {
        byte_range_chunks(file_size, self.chunk_size)
            .enumerate()
            .map(|(index, byte_range)| Chunk { index, byte_range })
            .collect_vec()
    }
}
