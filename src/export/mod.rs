//! CSV export of a run's result set.
//!
//! Each source kind has its own file name and column set; see
//! [`SourceKind::export_file_name`]. A file always holds records of one kind.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::ExportConfig;
use crate::models::{DiscussionRecord, NewsRecord, NormalizedRecord, ResultSet, SourceKind};

/// Errors that can occur while exporting
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Nothing to export")]
    Empty,

    #[error("Result set for {expected} contains a {found} record")]
    MixedRecords {
        expected: SourceKind,
        found: SourceKind,
    },
}

/// A file written by [`ExportSink::export`]
#[derive(Debug, Clone)]
pub struct ExportedFile {
    pub path: PathBuf,
    pub file_name: &'static str,
    pub mime_type: &'static str,
    pub bytes: u64,
    pub records: usize,
}

/// Writes result sets into a directory
#[derive(Debug, Clone)]
pub struct ExportSink {
    directory: PathBuf,
}

impl ExportSink {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn from_config(config: &ExportConfig) -> Self {
        Self::new(config.directory.clone())
    }

    /// Write the result set, replacing any previous export of the same kind
    pub fn export(&self, result_set: &ResultSet) -> Result<ExportedFile, ExportError> {
        if result_set.is_empty() {
            return Err(ExportError::Empty);
        }

        fs::create_dir_all(&self.directory)?;
        let file_name = result_set.kind.export_file_name();
        let path = self.directory.join(file_name);

        let file = fs::File::create(&path)?;
        write_csv(result_set, file)?;

        let bytes = fs::metadata(&path)?.len();
        tracing::info!(path = %path.display(), records = result_set.len(), "Exported results");

        Ok(ExportedFile {
            path,
            file_name,
            mime_type: result_set.kind.export_mime_type(),
            bytes,
            records: result_set.len(),
        })
    }
}

/// Serialize records as CSV with a header row
pub fn write_csv<W: Write>(result_set: &ResultSet, writer: W) -> Result<(), ExportError> {
    let mut csv = csv::Writer::from_writer(writer);

    for record in result_set.iter() {
        match (result_set.kind, record) {
            (SourceKind::Reddit, NormalizedRecord::Discussion(r)) => csv.serialize(r)?,
            (SourceKind::HackerNews, NormalizedRecord::News(r)) => csv.serialize(r)?,
            (expected, other) => {
                return Err(ExportError::MixedRecords {
                    expected,
                    found: other.kind(),
                })
            }
        }
    }

    csv.flush()?;
    Ok(())
}

/// Read an exported file back into a result set
pub fn read_csv(path: &Path, kind: SourceKind) -> Result<ResultSet, ExportError> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut result_set = ResultSet::new(kind);

    match kind {
        SourceKind::Reddit => {
            for row in reader.deserialize::<DiscussionRecord>() {
                result_set.records.push(row?.into());
            }
        }
        SourceKind::HackerNews => {
            for row in reader.deserialize::<NewsRecord>() {
                result_set.records.push(row?.into());
            }
        }
    }

    Ok(result_set)
}
