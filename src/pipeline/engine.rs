//! HTML to PDF materialization.
//!
//! Handles the low-level details of writing rendered HTML to a temporary
//! file, invoking the converter, and reading the output PDF back. The
//! converter sits behind a trait so the pipeline can be exercised in tests
//! without a `weasyprint` binary on the PATH.

use std::fs;
use std::process::Command;
use tempfile::tempdir;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to create temporary directory: {0}")]
    TempDir(#[source] std::io::Error),
    #[error("failed to write HTML source: {0}")]
    WriteHtml(#[source] std::io::Error),
    #[error("weasyprint execution failed: {0}")]
    ConverterIo(#[source] std::io::Error),
    #[error("weasyprint exited with status {0}")]
    ConverterExit(i32),
    #[error("failed to read generated PDF: {0}")]
    ReadPdf(#[source] std::io::Error),
}

/// Renders a UTF-8 HTML document to PDF bytes.
pub trait PdfEngine: Send + Sync {
    fn render_html(&self, html: &str) -> Result<Vec<u8>, EngineError>;
}

/// Production engine: shells out to the `weasyprint` CLI, which supports
/// page layout from HTML plus embedded styles.
pub struct WeasyPrintEngine;

impl PdfEngine for WeasyPrintEngine {
    fn render_html(&self, html: &str) -> Result<Vec<u8>, EngineError> {
        let temp_dir = tempdir().map_err(EngineError::TempDir)?;
        let html_path = temp_dir.path().join("contract.html");
        let pdf_path = temp_dir.path().join("contract.pdf");

        fs::write(&html_path, html).map_err(EngineError::WriteHtml)?;

        let status = Command::new("weasyprint")
            .arg(&html_path)
            .arg(&pdf_path)
            .current_dir(temp_dir.path())
            .status()
            .map_err(EngineError::ConverterIo)?;

        if !status.success() {
            let code = status.code().unwrap_or(-1);
            return Err(EngineError::ConverterExit(code));
        }

        fs::read(&pdf_path).map_err(EngineError::ReadPdf)
    }
}
