//! Document-generation pipeline.
//!
//! Turns a contract id into a generated PDF (plus an original-format
//! artifact for Office/PDF templates):
//! - `resolver` - loads the contract and its related entity chain
//! - `placeholders` - fixed token vocabulary and display formatting
//! - `html` - Jinja-style rendering for HTML templates
//! - `excel` / `word` - literal token replacement inside OOXML containers
//! - `engine` - HTML to PDF materialization
//! - `generate` - orchestration and format dispatch

pub mod engine;
pub mod excel;
pub mod generate;
pub mod html;
pub mod ooxml;
pub mod placeholders;
pub mod resolver;
pub mod word;

pub use engine::{EngineError, PdfEngine, WeasyPrintEngine};
pub use generate::{DocumentPipeline, GeneratedFiles};
pub use ooxml::OoxmlError;
pub use placeholders::placeholder_table;
pub use resolver::ContractBundle;

use thiserror::Error;

/// Errors that abort a generation run. Resolution failures carry the id of
/// the broken link so callers can report which relation was missing.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("contract {0} not found")]
    ContractNotFound(i64),
    #[error("room {0} not found")]
    RoomNotFound(i64),
    #[error("building {0} not found")]
    BuildingNotFound(i64),
    #[error("owner {0} not found")]
    OwnerNotFound(i64),
    #[error("agent {0} not found")]
    AgentNotFound(i64),
    #[error("template {0} not found")]
    TemplateNotFound(i64),
    #[error("unsupported template format: {0}")]
    UnsupportedFormat(String),
    #[error("{0} template has no binary data")]
    MissingBinary(&'static str),
    #[error("HTML template rendering failed: {0}")]
    Template(#[from] minijinja::Error),
    #[error("failed to process template document: {0}")]
    Document(#[from] OoxmlError),
    #[error("PDF rendering failed: {0}")]
    Pdf(#[from] EngineError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl GenerateError {
    /// True when a related entity failed to resolve.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::ContractNotFound(_)
                | Self::RoomNotFound(_)
                | Self::BuildingNotFound(_)
                | Self::OwnerNotFound(_)
                | Self::AgentNotFound(_)
                | Self::TemplateNotFound(_)
        )
    }
}

#[cfg(test)]
pub(crate) mod test_fixtures {
    use chrono::NaiveDate;

    use crate::models::{
        Building, Contract, ContractTemplate, Owner, RealEstateAgent, Room,
    };

    use super::resolver::ContractBundle;

    /// A fully resolved bundle with a representative mix of present and
    /// absent optional fields.
    pub(crate) fn sample_bundle() -> ContractBundle {
        ContractBundle {
            contract: Contract {
                id: 1,
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
                room_id: 2,
                agent_id: 3,
                template_id: 4,
            },
            room: Room {
                id: 2,
                room_number: "301".to_string(),
                layout: "1LDK".to_string(),
                floor_area: 25.5,
                floor: 3,
                has_kitchen: true,
                has_air_conditioner: true,
                building_id: 5,
                ..Room::default()
            },
            building: Building {
                id: 5,
                name: "サンハイツ新宿".to_string(),
                address: "東京都新宿区西新宿2-2-2".to_string(),
                structure: "鉄筋コンクリート造".to_string(),
                roof_structure: None,
                floors: 5,
                total_units: 20,
                building_type: "マンション".to_string(),
                construction_date: None,
                owner_id: 6,
                notes: None,
            },
            owner: Owner {
                id: 6,
                name: "山田太郎".to_string(),
                address: "東京都新宿区西新宿1-1-1".to_string(),
                phone: Some("03-1234-5678".to_string()),
                email: None,
                notes: None,
            },
            agent: RealEstateAgent {
                id: 3,
                name: "佐藤花子".to_string(),
                license_number: "東京都知事 (2) 第12345号".to_string(),
                registration_date: None,
                notes: None,
            },
            special_terms: vec![],
            custom_amenities: vec![],
            template: ContractTemplate {
                id: 4,
                name: "標準".to_string(),
                description: None,
                file_content: String::new(),
                file_type: "html".to_string(),
                file_binary: None,
                file_name: None,
                is_default: true,
            },
        }
    }
}
