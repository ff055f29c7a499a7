use crate::split::{SplitReport, SplitRequest};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Deterministic content where neighbouring chunks never look alike.
pub fn patterned(size: usize) -> Vec<u8> {
    (0..size).map(|i| (i % 251) as u8).collect()
}

pub fn write_source(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
    path
}

/// Lays out `artifacts/<name>` and an empty `scratch/` below `root`.
pub fn request_for(root: &Path, name: &str, content: &[u8], chunk_size: u64) -> SplitRequest {
    let source_path = write_source(&root.join("artifacts"), name, content);
    let output_dir = root.join("scratch");
    std::fs::create_dir_all(&output_dir).unwrap();
    SplitRequest {
        source_path,
        output_dir,
        name_prefix: format!("{name}.0"),
        chunk_size,
    }
}

pub fn chunk_sizes(report: &SplitReport) -> Vec<u64> {
    report
        .chunks
        .iter()
        .map(|chunk| std::fs::metadata(&chunk.path).unwrap().len())
        .collect()
}

pub fn concat_chunks(report: &SplitReport) -> Vec<u8> {
    let mut content = vec![];
    for chunk in &report.chunks {
        content.extend(std::fs::read(&chunk.path).unwrap());
    }
    content
}

#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Runs `f` with a thread-local subscriber and returns what it logged at INFO and above.
pub fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::INFO)
        .finish();
    let result = tracing::subscriber::with_default(subscriber, f);
    let logs = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
    (result, logs)
}
