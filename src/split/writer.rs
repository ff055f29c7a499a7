use crate::split::config::SplitRequest;
use crate::split::error::{Result, SplitError};
use crate::utils::{display_bytes, setup_span_bar};
use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, info_span, warn};
use tracing_indicatif::span_ext::IndicatifSpanExt;

const DEFAULT_BUFFER_SIZE: usize = 4 * 1024 * 1024;

fn new_bufreader<T: Read>(item: T) -> BufReader<T> {
    BufReader::with_capacity(DEFAULT_BUFFER_SIZE, item)
}

fn new_bufwriter<T: Write>(item: T) -> BufWriter<T> {
    BufWriter::with_capacity(DEFAULT_BUFFER_SIZE, item)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum IoFailure {
    AlreadyExists,
    PermissionDenied,
    NotFound,
    Other,
}

impl From<ErrorKind> for IoFailure {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::AlreadyExists => IoFailure::AlreadyExists,
            ErrorKind::PermissionDenied => IoFailure::PermissionDenied,
            ErrorKind::NotFound => IoFailure::NotFound,
            _ => IoFailure::Other,
        }
    }
}

/// Problems that are reported but do not fail the split.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SplitWarning {
    #[error("Couldn't create output directory {path:?} ({kind}): {message}")]
    OutputDirCreate {
        path: PathBuf,
        kind: IoFailure,
        message: String,
    },
    #[error("Output path {path:?} exists but is not a directory")]
    OutputPathNotDirectory { path: PathBuf },
    #[error("Couldn't remove source {path:?} ({kind}): {message}")]
    SourceRemove {
        path: PathBuf,
        kind: IoFailure,
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenChunk {
    pub index: usize,
    pub path: PathBuf,
    pub size: u64,
}

#[derive(Debug, Default)]
pub struct SplitReport {
    pub source_size: u64,
    pub chunks: Vec<WrittenChunk>,
    pub warnings: Vec<SplitWarning>,
}

impl SplitReport {
    fn warn(&mut self, warning: SplitWarning) {
        warn!("{warning}");
        self.warnings.push(warning);
    }
}

/// Splits the request's source into numbered chunk files, then removes the source.
///
/// Chunks already written when a fatal error occurs are left in place and the
/// source is kept.
pub fn split_file(request: &SplitRequest) -> Result<SplitReport> {
    if request.chunk_size == 0 {
        return Err(SplitError::ZeroChunkSize);
    }
    let mut report = SplitReport::default();
    if let Some(warning) = ensure_output_dir(&request.output_dir) {
        report.warn(warning);
    }

    let source_path = &request.source_path;
    let file = File::open(source_path).map_err(|source| SplitError::SourceUnavailable {
        path: source_path.clone(),
        source,
    })?;
    report.source_size = file
        .metadata()
        .map_err(|source| SplitError::SourceMetadata {
            path: source_path.clone(),
            source,
        })?
        .len();

    let chunks = request.plan(report.source_size);
    info!(
        "Splitting {} ({:#.1}) into {} chunks of at most {:#.1}",
        source_path.display(),
        display_bytes(report.source_size),
        chunks.len(),
        display_bytes(request.chunk_size)
    );

    {
        let span = info_span!("split");
        let _entered = span.enter();
        setup_span_bar(&span, report.source_size, "Splitting");

        let mut reader = new_bufreader(file);
        let mut buffer = vec![0u8; DEFAULT_BUFFER_SIZE];
        for chunk in chunks {
            let path = request.chunk_path(chunk.index);
            debug!("Writing {chunk} to {}", path.display());
            write_chunk(&mut reader, &mut buffer, source_path, &path, chunk.size())?;
            span.pb_inc(chunk.size());
            info!("Created {}", path.display());
            report.chunks.push(WrittenChunk {
                index: chunk.index,
                path,
                size: chunk.size(),
            });
        }
    }

    if let Some(warning) = remove_source(source_path) {
        report.warn(warning);
    }

    info!(
        "Split {} into {} chunks in {}",
        source_path.display(),
        report.chunks.len(),
        request.output_dir.display()
    );
    Ok(report)
}

fn ensure_output_dir(path: &Path) -> Option<SplitWarning> {
    match std::fs::metadata(path) {
        Ok(metadata) if metadata.is_dir() => {
            debug!("Output directory {} already exists", path.display());
            None
        }
        Ok(_) => Some(SplitWarning::OutputPathNotDirectory {
            path: path.to_path_buf(),
        }),
        Err(_) => match std::fs::create_dir_all(path) {
            Ok(()) => {
                debug!("Created output directory {}", path.display());
                None
            }
            Err(e) => Some(SplitWarning::OutputDirCreate {
                path: path.to_path_buf(),
                kind: e.kind().into(),
                message: e.to_string(),
            }),
        },
    }
}

fn remove_source(path: &Path) -> Option<SplitWarning> {
    match std::fs::remove_file(path) {
        Ok(()) => {
            debug!("Removed source {}", path.display());
            None
        }
        Err(e) => Some(SplitWarning::SourceRemove {
            path: path.to_path_buf(),
            kind: e.kind().into(),
            message: e.to_string(),
        }),
    }
}

/// Copies the next `size` bytes of `reader` into a new file at `path`.
fn write_chunk(
    reader: &mut impl Read,
    buffer: &mut [u8],
    source_path: &Path,
    path: &Path,
    size: u64,
) -> Result<()> {
    let file = File::create(path).map_err(|source| SplitError::OutputSpace {
        path: path.to_path_buf(),
        source,
    })?;
    let write_error = |source| SplitError::ChunkWrite {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = new_bufwriter(file);
    let mut window = reader.by_ref().take(size);
    let mut copied = 0u64;
    loop {
        let read = match window.read(buffer) {
            Ok(0) => break,
            Ok(read) => read,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(source) => {
                return Err(SplitError::SourceRead {
                    path: source_path.to_path_buf(),
                    source,
                })
            }
        };
        writer.write_all(&buffer[..read]).map_err(write_error)?;
        copied += read as u64;
    }
    writer.flush().map_err(write_error)?;

    if copied != size {
        return Err(SplitError::SourceTruncated {
            path: source_path.to_path_buf(),
            expected: size,
            actual: copied,
        });
    }
    Ok(())
}
