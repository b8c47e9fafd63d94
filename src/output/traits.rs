//! Output writer trait and error types

use crate::benchmark::BenchmarkReport;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while writing benchmark artifacts
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize results: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Something that turns a finished benchmark into a file
pub trait ReportWriter {
    /// Short name used in log lines
    fn name(&self) -> &'static str;

    /// Renders the report to the file format this writer produces
    fn render(&self, report: &BenchmarkReport) -> OutputResult<String>;

    /// Renders and writes the report, creating parent directories
    fn write(&self, report: &BenchmarkReport, path: &Path) -> OutputResult<()> {
        let content = self.render(report)?;
        write_file(path, &content)?;
        tracing::info!("Wrote {} to {}", self.name(), path.display());
        Ok(())
    }
}

/// Writes `content` to `path`, creating parent directories
pub fn write_file(path: &Path, content: &str) -> OutputResult<()> {
    let to_error = |source| OutputError::Write {
        path: path.display().to_string(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(to_error)?;
    }
    std::fs::write(path, content).map_err(to_error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_file_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a").join("b").join("out.txt");

        write_file(&path, "hello").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello");
    }

    #[test]
    fn test_write_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the file should go
        let path = dir.path().join("taken");
        std::fs::create_dir(&path).unwrap();

        let err = write_file(&path, "x").unwrap_err();
        assert!(err.to_string().contains("taken"));
    }
}
