#![allow(dead_code)]

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDate;
use lease_contract_server::db::Database;
use lease_contract_server::file_store::FileStore;
use lease_contract_server::models::{
    Building, Contract, ContractTemplate, Owner, RealEstateAgent, Room,
};
use lease_contract_server::pipeline::{DocumentPipeline, EngineError, PdfEngine};

/// Deterministic in-process stand-in for the external HTML-to-PDF converter.
/// The "PDF" it produces is the input HTML behind a PDF magic prefix, so
/// tests can assert on what reached the converter.
pub struct StubPdfEngine;

impl PdfEngine for StubPdfEngine {
    fn render_html(&self, html: &str) -> Result<Vec<u8>, EngineError> {
        let mut pdf = b"%PDF-1.4 stub\n".to_vec();
        pdf.extend_from_slice(html.as_bytes());
        Ok(pdf)
    }
}

pub fn pipeline_at(root: &Path) -> DocumentPipeline {
    DocumentPipeline::new(FileStore::new(root), Arc::new(StubPdfEngine))
}

pub fn html_template(body: &str) -> ContractTemplate {
    ContractTemplate {
        id: 0,
        name: "標準賃貸借契約書".to_string(),
        description: None,
        file_content: body.to_string(),
        file_type: "html".to_string(),
        file_binary: None,
        file_name: None,
        is_default: true,
    }
}

pub fn binary_template(file_type: &str, file_name: &str, bytes: Vec<u8>) -> ContractTemplate {
    ContractTemplate {
        id: 0,
        name: format!("{file_type} template"),
        description: None,
        file_content: String::new(),
        file_type: file_type.to_string(),
        file_binary: Some(bytes),
        file_name: Some(file_name.to_string()),
        is_default: false,
    }
}

/// Seed the full entity chain (owner, building, room, agent) plus the given
/// template, and return a contract wired to all of them.
pub fn seed_contract(db: &Database, template: ContractTemplate) -> Contract {
    let owner = db.insert_owner(Owner {
        id: 0,
        name: "山田太郎".to_string(),
        address: "東京都新宿区西新宿1-1-1".to_string(),
        phone: Some("03-1234-5678".to_string()),
        email: None,
        notes: None,
    });
    let building = db.insert_building(Building {
        id: 0,
        name: "サンハイツ新宿".to_string(),
        address: "東京都新宿区西新宿2-2-2".to_string(),
        structure: "鉄筋コンクリート造".to_string(),
        roof_structure: None,
        floors: 5,
        total_units: 20,
        building_type: "マンション".to_string(),
        construction_date: None,
        owner_id: owner.id,
        notes: None,
    });
    let room = db.insert_room(Room {
        id: 0,
        room_number: "301".to_string(),
        layout: "1LDK".to_string(),
        floor_area: 25.5,
        floor: 3,
        has_kitchen: true,
        has_air_conditioner: true,
        custom_amenities: Some(r#"["宅配ボックス"]"#.to_string()),
        building_id: building.id,
        ..Room::default()
    });
    let agent = db.insert_agent(RealEstateAgent {
        id: 0,
        name: "佐藤花子".to_string(),
        license_number: "東京都知事 (2) 第12345号".to_string(),
        registration_date: None,
        notes: None,
    });
    let template = db.insert_template(template);

    db.insert_contract(Contract {
        id: 0,
        contract_number: "20240401-0001".to_string(),
        tenant_name: "鈴木一郎".to_string(),
        tenant_address: "東京都中野区中野3-3-3".to_string(),
        tenant_phone: None,
        tenant_email: Some("tenant@example.com".to_string()),
        start_date: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
        end_date: None,
        rent_amount: 150_000,
        security_deposit: None,
        key_money: Some(300_000),
        management_fee: Some(5_000),
        custom_special_terms: None,
        special_term_ids: vec![],
        pdf_path: None,
        original_file_path: None,
        room_id: room.id,
        agent_id: agent.id,
        template_id: template.id,
    })
}

fn zip_parts(parts: &[(&str, &str)]) -> Vec<u8> {
    let mut cursor = std::io::Cursor::new(Vec::new());
    let mut writer = zip::ZipWriter::new(&mut cursor);
    let options = zip::write::SimpleFileOptions::default();
    for (name, content) in parts {
        writer.start_file(name.to_string(), options).unwrap();
        writer.write_all(content.as_bytes()).unwrap();
    }
    writer.finish().unwrap();
    cursor.into_inner()
}

/// One-sheet workbook: A1 and A2/B2 come from the shared-string table
/// (placeholders live there), C1 is a raw numeric cell.
pub fn minimal_xlsx() -> Vec<u8> {
    zip_parts(&[
        (
            "xl/workbook.xml",
            r#"<workbook><sheets><sheet name="契約書" sheetId="1"/></sheets></workbook>"#,
        ),
        (
            "xl/sharedStrings.xml",
            r#"<sst><si><t>{{owner.name}}様</t></si><si><t>賃料</t></si><si><t>{{contract.rent_amount}}</t></si></sst>"#,
        ),
        (
            "xl/worksheets/sheet1.xml",
            r#"<worksheet><sheetData><row r="1"><c r="A1" t="s"><v>0</v></c><c r="C1"><v>42</v></c></row><row r="2"><c r="A2" t="s"><v>1</v></c><c r="B2" t="s"><v>2</v></c></row></sheetData></worksheet>"#,
        ),
    ])
}

/// One paragraph with placeholders followed by a 2x2 table.
pub fn minimal_docx() -> Vec<u8> {
    zip_parts(&[(
        "word/document.xml",
        r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body><w:p><w:r><w:t>借主: {{contract.tenant_name}}</w:t></w:r></w:p><w:tbl><w:tr><w:tc><w:p><w:r><w:t>賃料</w:t></w:r></w:p></w:tc><w:tc><w:p><w:r><w:t>{{contract.rent_amount}}</w:t></w:r></w:p></w:tc></w:tr></w:tbl></w:body></w:document>"#,
    )])
}
