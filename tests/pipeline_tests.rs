mod common;

mod pipeline_tests {
    use std::fs;
    use std::io::Read;

    use lease_contract_server::db::Database;
    use lease_contract_server::file_store::FileStore;
    use lease_contract_server::pipeline::GenerateError;

    use crate::common::{binary_template, html_template, minimal_docx, minimal_xlsx, pipeline_at, seed_contract};

    #[test]
    fn test_html_generation_writes_pdf_and_records_paths() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new();
        let pipeline = pipeline_at(dir.path());
        let contract = seed_contract(
            &db,
            html_template("<p>{{ contract.tenant_name }}: {{ contract.rent_amount }}</p>"),
        );

        let files = pipeline.generate(&db, contract.id).unwrap();

        let store = FileStore::new(dir.path());
        assert_eq!(files.pdf_path, store.pdf_path(&contract.contract_number));
        assert!(files.original_file_path.is_none());

        let pdf = fs::read(&files.pdf_path).unwrap();
        assert!(pdf.starts_with(b"%PDF"));
        let pdf_text = String::from_utf8_lossy(&pdf);
        assert!(pdf_text.contains("鈴木一郎: 150,000円"));

        // The intermediate HTML is kept next to the other original-format
        // artifacts even though it is not the contract's original file.
        let html_artifact = store.original_path(&format!(
            "contract_{}.html",
            contract.contract_number
        ));
        assert!(html_artifact.is_file());

        let stored = db.get_contract(contract.id).unwrap();
        assert_eq!(
            stored.pdf_path.as_deref(),
            Some(files.pdf_path.to_string_lossy().as_ref())
        );
        assert!(stored.original_file_path.is_none());
    }

    #[test]
    fn test_regeneration_overwrites_previous_output() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new();
        let pipeline = pipeline_at(dir.path());
        let contract = seed_contract(&db, html_template("<p>v</p>"));

        let first = pipeline.generate(&db, contract.id).unwrap();
        let second = pipeline.generate(&db, contract.id).unwrap();

        assert_eq!(first.pdf_path, second.pdf_path);
        assert!(second.pdf_path.is_file());
    }

    #[test]
    fn test_unknown_contract_is_a_resolution_error() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new();
        let pipeline = pipeline_at(dir.path());

        let err = pipeline.generate(&db, 999).unwrap_err();
        assert!(matches!(err, GenerateError::ContractNotFound(999)));
        assert!(err.is_not_found());
    }

    #[test]
    fn test_broken_relation_fails_without_output() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new();
        let pipeline = pipeline_at(dir.path());
        let contract = seed_contract(&db, html_template("<p>x</p>"));
        db.delete_room(contract.room_id).unwrap();

        let err = pipeline.generate(&db, contract.id).unwrap_err();
        assert!(matches!(err, GenerateError::RoomNotFound(_)));

        let store = FileStore::new(dir.path());
        assert!(!store.pdf_path(&contract.contract_number).exists());
        assert!(db.get_contract(contract.id).unwrap().pdf_path.is_none());
    }

    #[test]
    fn test_unknown_format_tag_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new();
        let pipeline = pipeline_at(dir.path());
        let contract = seed_contract(&db, binary_template("rtf", "keiyaku.rtf", vec![1, 2, 3]));

        let err = pipeline.generate(&db, contract.id).unwrap_err();
        assert!(matches!(err, GenerateError::UnsupportedFormat(tag) if tag == "rtf"));

        let store = FileStore::new(dir.path());
        assert!(!store.pdf_path(&contract.contract_number).exists());
    }

    #[test]
    fn test_office_template_without_binary_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new();
        let pipeline = pipeline_at(dir.path());
        let mut template = binary_template("excel", "keiyaku.xlsx", vec![]);
        template.file_binary = None;
        let contract = seed_contract(&db, template);

        let err = pipeline.generate(&db, contract.id).unwrap_err();
        assert!(matches!(err, GenerateError::MissingBinary("excel")));
    }

    #[test]
    fn test_excel_generation_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new();
        let pipeline = pipeline_at(dir.path());
        let contract = seed_contract(&db, binary_template("excel", "keiyaku.xlsx", minimal_xlsx()));

        let files = pipeline.generate(&db, contract.id).unwrap();

        let store = FileStore::new(dir.path());
        let xlsx_path = store.original_path(&format!("contract_{}.xlsx", contract.contract_number));
        assert_eq!(files.original_file_path.as_deref(), Some(xlsx_path.as_path()));

        // The written workbook must carry the substituted values.
        let file = fs::File::open(&xlsx_path).unwrap();
        let mut archive = zip::ZipArchive::new(file).unwrap();
        let mut shared = String::new();
        archive
            .by_name("xl/sharedStrings.xml")
            .unwrap()
            .read_to_string(&mut shared)
            .unwrap();
        assert!(shared.contains("山田太郎様"));
        assert!(shared.contains("150,000円"));
        assert!(!shared.contains("{{owner.name}}"));

        let preview_path = store.original_path(&format!(
            "contract_{}_excel.html",
            contract.contract_number
        ));
        let preview = fs::read_to_string(preview_path).unwrap();
        assert!(preview.contains(&format!("賃貸借契約書: {}", contract.contract_number)));
        assert!(preview.contains("<h2>契約書</h2>"));
        assert!(preview.contains("山田太郎様"));

        let pdf = fs::read(&files.pdf_path).unwrap();
        assert!(pdf.starts_with(b"%PDF"));

        let stored = db.get_contract(contract.id).unwrap();
        assert_eq!(
            stored.original_file_path.as_deref(),
            Some(xlsx_path.to_string_lossy().as_ref())
        );
    }

    #[test]
    fn test_word_generation_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new();
        let pipeline = pipeline_at(dir.path());
        let contract = seed_contract(&db, binary_template("word", "keiyaku.docx", minimal_docx()));

        let files = pipeline.generate(&db, contract.id).unwrap();

        let store = FileStore::new(dir.path());
        let docx_path = store.original_path(&format!("contract_{}.docx", contract.contract_number));
        assert_eq!(files.original_file_path.as_deref(), Some(docx_path.as_path()));

        let file = fs::File::open(&docx_path).unwrap();
        let mut archive = zip::ZipArchive::new(file).unwrap();
        let mut document = String::new();
        archive
            .by_name("word/document.xml")
            .unwrap()
            .read_to_string(&mut document)
            .unwrap();
        assert!(document.contains("借主: 鈴木一郎"));
        assert!(!document.contains("{{contract.tenant_name}}"));

        let preview = fs::read_to_string(store.original_path(&format!(
            "contract_{}_word.html",
            contract.contract_number
        )))
        .unwrap();
        assert!(preview.contains("借主: 鈴木一郎"));
        assert!(preview.contains("150,000円"));
    }

    #[test]
    fn test_pdf_template_is_copied_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new();
        let pipeline = pipeline_at(dir.path());
        let blob = b"%PDF-1.4 fixed contract document".to_vec();
        let contract = seed_contract(&db, binary_template("pdf", "keiyaku.pdf", blob.clone()));

        let files = pipeline.generate(&db, contract.id).unwrap();

        assert_eq!(fs::read(&files.pdf_path).unwrap(), blob);
        let original = files.original_file_path.unwrap();
        assert_eq!(fs::read(&original).unwrap(), blob);
        assert_eq!(
            original.file_name().unwrap().to_string_lossy(),
            format!("template_{}.pdf", contract.template_id)
        );
    }

    #[test]
    fn test_removing_generated_files_is_best_effort() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new();
        let pipeline = pipeline_at(dir.path());
        let contract = seed_contract(&db, html_template("<p>x</p>"));

        pipeline.generate(&db, contract.id).unwrap();
        let stored = db.get_contract(contract.id).unwrap();
        let pdf_path = stored.pdf_path.clone().unwrap();
        assert!(std::path::Path::new(&pdf_path).is_file());

        pipeline.remove_generated_files(&stored);
        assert!(!std::path::Path::new(&pdf_path).exists());

        // A second pass over already-deleted files must not panic.
        pipeline.remove_generated_files(&stored);
    }
}
