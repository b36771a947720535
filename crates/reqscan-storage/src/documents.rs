//! File document sink. Writes go to a sibling temp file which is then
//! renamed over the target, so readers never see a half-written report.

use std::fs;
use std::path::{Path, PathBuf};

use xxhash_rust::xxh3::xxh3_64;

use reqscan_core::errors::SinkError;
use reqscan_core::traits::{DocumentReceipt, DocumentSink};

/// Hex xxh3 digest of document content.
pub fn content_hash(body: &str) -> String {
    format!("{:016x}", xxh3_64(body.as_bytes()))
}

#[derive(Debug, Clone)]
pub struct FileDocumentSink {
    path: PathBuf,
}

impl FileDocumentSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "report".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn write_failed(&self, e: std::io::Error) -> SinkError {
        SinkError::WriteFailed {
            target: self.path.display().to_string(),
            message: e.to_string(),
        }
    }
}

impl DocumentSink for FileDocumentSink {
    /// The title is carried by the body's first heading; the file name stays
    /// fixed so each run replaces the previous report.
    fn replace(&self, title: &str, body: &str) -> Result<DocumentReceipt, SinkError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.write_failed(e))?;
        }
        let tmp = self.temp_path();
        fs::write(&tmp, body).map_err(|e| self.write_failed(e))?;
        if let Err(e) = fs::rename(&tmp, &self.path) {
            let _ = fs::remove_file(&tmp);
            return Err(self.write_failed(e));
        }

        let receipt = DocumentReceipt {
            location: self.path.display().to_string(),
            bytes: body.len(),
            content_hash: content_hash(body),
        };
        tracing::info!(title, location = %receipt.location, bytes = receipt.bytes, "report written");
        Ok(receipt)
    }
}
