mod chunk;
mod config;
mod error;
mod writer;

pub use config::SplitConfig;
pub use writer::split_file;

#[cfg(test)]
pub use config::SplitRequest;
#[cfg(test)]
pub use error::SplitError;
#[cfg(test)]
pub use writer::SplitReport;
