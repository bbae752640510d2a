//! Generation orchestration: resolve the contract, dispatch on the template
//! format, materialize the PDF (plus original-format artifact) and write the
//! resulting paths back onto the contract.
//!
//! One call handles one contract synchronously, start to finish. Two
//! concurrent calls for the same contract number race on the same output
//! path and the last writer wins; there is no cross-request locking.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::db::Database;
use crate::file_store::{remove_quietly, FileStore};
use crate::models::{Contract, TemplateFormat};

use super::engine::PdfEngine;
use super::placeholders::placeholder_table;
use super::resolver::{self, ContractBundle};
use super::{excel, html, word, GenerateError};

/// Paths produced by a successful run. `original_file_path` is set for
/// Excel/Word/PDF templates only.
#[derive(Debug, Clone)]
pub struct GeneratedFiles {
    pub pdf_path: PathBuf,
    pub original_file_path: Option<PathBuf>,
}

#[derive(Clone)]
pub struct DocumentPipeline {
    store: FileStore,
    engine: Arc<dyn PdfEngine>,
}

impl DocumentPipeline {
    pub fn new(store: FileStore, engine: Arc<dyn PdfEngine>) -> Self {
        Self { store, engine }
    }

    pub fn store(&self) -> &FileStore {
        &self.store
    }

    /// Generate the contract document. On success the contract's
    /// `pdf_path`/`original_file_path` are updated in the database; on any
    /// failure nothing is written back and no partial output is recorded.
    pub fn generate(
        &self,
        db: &Database,
        contract_id: i64,
    ) -> Result<GeneratedFiles, GenerateError> {
        let bundle = resolver::resolve(db, contract_id)?;

        let format: TemplateFormat = bundle.template.file_type.parse().map_err(|_| {
            log::error!(
                "unsupported template format `{}` on template {}",
                bundle.template.file_type,
                bundle.template.id
            );
            GenerateError::UnsupportedFormat(bundle.template.file_type.clone())
        })?;

        self.store.ensure_layout()?;
        let number = bundle.contract.contract_number.clone();
        // Regeneration overwrites the same deterministic path; drop any
        // stale PDF first so a failed run cannot leave the old file posing
        // as fresh output.
        remove_quietly(&self.store.pdf_path(&number));

        let files = match format {
            TemplateFormat::Html => self.generate_html(&bundle, &number)?,
            TemplateFormat::Excel => self.generate_excel(&bundle, &number)?,
            TemplateFormat::Word => self.generate_word(&bundle, &number)?,
            TemplateFormat::Pdf => self.generate_pdf_copy(&bundle, &number)?,
        };

        db.update_contract_paths(
            contract_id,
            &files.pdf_path.to_string_lossy(),
            files
                .original_file_path
                .as_ref()
                .map(|p| p.to_string_lossy().to_string())
                .as_deref(),
        );
        log::info!(
            "generated contract document for {number} at {}",
            files.pdf_path.display()
        );
        Ok(files)
    }

    fn generate_html(
        &self,
        bundle: &ContractBundle,
        number: &str,
    ) -> Result<GeneratedFiles, GenerateError> {
        let rendered = html::render_template(&bundle.template.file_content, bundle)?;
        self.store
            .write_original(&format!("contract_{number}.html"), rendered.as_bytes())?;

        let pdf = self.engine.render_html(&rendered)?;
        let pdf_path = self.store.write_pdf(number, &pdf)?;
        Ok(GeneratedFiles {
            pdf_path,
            original_file_path: None,
        })
    }

    fn generate_excel(
        &self,
        bundle: &ContractBundle,
        number: &str,
    ) -> Result<GeneratedFiles, GenerateError> {
        let blob = bundle
            .template
            .file_binary
            .as_deref()
            .ok_or(GenerateError::MissingBinary("excel"))?;

        let table = placeholder_table(bundle);
        let rendered = excel::render_workbook(blob, &table)?;
        let original = self
            .store
            .write_original(&format!("contract_{number}.xlsx"), &rendered.xlsx)?;

        let preview = excel::preview_html(number, &rendered.sheets);
        self.store
            .write_original(&format!("contract_{number}_excel.html"), preview.as_bytes())?;

        let pdf = self.engine.render_html(&preview)?;
        let pdf_path = self.store.write_pdf(number, &pdf)?;
        Ok(GeneratedFiles {
            pdf_path,
            original_file_path: Some(original),
        })
    }

    fn generate_word(
        &self,
        bundle: &ContractBundle,
        number: &str,
    ) -> Result<GeneratedFiles, GenerateError> {
        let blob = bundle
            .template
            .file_binary
            .as_deref()
            .ok_or(GenerateError::MissingBinary("word"))?;

        let table = placeholder_table(bundle);
        let rendered = word::render_document(blob, &table)?;
        let original = self
            .store
            .write_original(&format!("contract_{number}.docx"), &rendered.docx)?;

        let preview = word::preview_html(number, &rendered.blocks);
        self.store
            .write_original(&format!("contract_{number}_word.html"), preview.as_bytes())?;

        let pdf = self.engine.render_html(&preview)?;
        let pdf_path = self.store.write_pdf(number, &pdf)?;
        Ok(GeneratedFiles {
            pdf_path,
            original_file_path: Some(original),
        })
    }

    /// PDF templates are copied verbatim to both output paths. No
    /// placeholder substitution happens for this format; the template bytes
    /// *are* the generated document.
    fn generate_pdf_copy(
        &self,
        bundle: &ContractBundle,
        number: &str,
    ) -> Result<GeneratedFiles, GenerateError> {
        let blob = bundle
            .template
            .file_binary
            .as_deref()
            .ok_or(GenerateError::MissingBinary("pdf"))?;

        let original = self
            .store
            .write_original(&format!("template_{}.pdf", bundle.template.id), blob)?;
        let pdf_path = self.store.write_pdf(number, blob)?;
        Ok(GeneratedFiles {
            pdf_path,
            original_file_path: Some(original),
        })
    }

    /// Delete a contract's generated files, e.g. when the contract itself is
    /// removed. Failures are logged and never block the caller.
    pub fn remove_generated_files(&self, contract: &Contract) {
        if let Some(pdf) = &contract.pdf_path {
            remove_quietly(Path::new(pdf));
        }
        if let Some(original) = &contract.original_file_path {
            remove_quietly(Path::new(original));
        }
    }
}
