use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// Property owner (貸主).
#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct Owner {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "山田太郎")]
    pub name: String,
    #[schema(example = "東京都新宿区西新宿1-1-1")]
    pub address: String,
    #[schema(example = "03-1234-5678")]
    pub phone: Option<String>,
    #[schema(example = "owner@example.com")]
    pub email: Option<String>,
    pub notes: Option<String>,
}

/// Building owned by exactly one [`Owner`].
#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct Building {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "サンハイツ新宿")]
    pub name: String,
    #[schema(example = "東京都新宿区西新宿2-2-2")]
    pub address: String,
    /// Structure classification, e.g. 木造, 鉄筋コンクリート造. Free-form
    /// "other" values are allowed.
    #[schema(example = "鉄筋コンクリート造")]
    pub structure: String,
    #[schema(example = "陸屋根")]
    pub roof_structure: Option<String>,
    #[schema(example = 5)]
    pub floors: i32,
    #[schema(example = 20)]
    pub total_units: i32,
    #[schema(example = "マンション")]
    pub building_type: String,
    pub construction_date: Option<NaiveDate>,
    pub owner_id: i64,
    pub notes: Option<String>,
}

/// Room inside a [`Building`], with fixed amenity flags plus a free-form
/// custom amenity list stored as a JSON array string.
#[derive(Debug, Serialize, Deserialize, Clone, Default, ToSchema)]
pub struct Room {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "301")]
    pub room_number: String,
    #[schema(example = "1LDK")]
    pub layout: String,
    #[schema(example = 25.5)]
    pub floor_area: f64,
    #[schema(example = 3)]
    pub floor: i32,

    pub has_kitchen: bool,
    pub has_toilet: bool,
    pub has_bath: bool,
    pub has_shower: bool,
    pub has_washroom: bool,
    pub has_hot_water: bool,
    pub has_stove: bool,
    pub has_air_conditioner: bool,
    pub has_lighting: bool,
    pub has_telephone: bool,
    pub has_internet: bool,
    pub has_fire_alarm: bool,
    pub has_tv_connection: bool,
    pub has_elevator_access: bool,
    pub has_parking: bool,
    pub has_bicycle_parking: bool,
    pub has_private_garden: bool,

    /// JSON array of extra amenity names, e.g. `["宅配ボックス","床暖房"]`.
    #[schema(example = r#"["宅配ボックス"]"#)]
    pub custom_amenities: Option<String>,
    pub building_id: i64,
    pub notes: Option<String>,
}

/// Licensed real-estate agent (宅建士). License numbers are globally unique.
#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct RealEstateAgent {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "佐藤花子")]
    pub name: String,
    #[schema(example = "東京都知事 (2) 第12345号")]
    pub license_number: String,
    pub registration_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

/// Reusable special clause attachable to contracts.
#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct SpecialTerm {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "ペット飼育禁止")]
    pub title: String,
    #[schema(example = "借主は本物件においてペットを飼育してはならない。")]
    pub content: String,
    /// Flagged clauses are offered by default in contract forms.
    pub is_common: bool,
}

/// Stored contract template. HTML templates keep their text in
/// `file_content`; Excel/Word/PDF templates carry the uploaded bytes in
/// `file_binary` together with the original filename.
#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct ContractTemplate {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "標準賃貸借契約書")]
    pub name: String,
    pub description: Option<String>,
    pub file_content: String,
    /// Format tag: `html`, `excel`, `word` or `pdf`.
    #[schema(example = "html")]
    pub file_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>, format = Binary)]
    pub file_binary: Option<Vec<u8>>,
    #[schema(example = "keiyaku.xlsx")]
    pub file_name: Option<String>,
    /// At most one template is default at a time; enforced by
    /// [`crate::db::Database::set_default_template`].
    pub is_default: bool,
}

/// Lease contract. `pdf_path` and `original_file_path` are written back by
/// the generation pipeline; everything else is caller-owned.
#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct Contract {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "20240401-0001")]
    pub contract_number: String,
    #[schema(example = "鈴木一郎")]
    pub tenant_name: String,
    #[schema(example = "東京都中野区中野3-3-3")]
    pub tenant_address: String,
    pub tenant_phone: Option<String>,
    pub tenant_email: Option<String>,

    pub start_date: NaiveDate,
    /// Absent means an indefinite term.
    pub end_date: Option<NaiveDate>,
    /// Monthly rent in yen.
    #[schema(example = 150000)]
    pub rent_amount: i64,
    pub security_deposit: Option<i64>,
    pub key_money: Option<i64>,
    pub management_fee: Option<i64>,

    /// Free-text ad hoc terms, independent of the attached special terms.
    pub custom_special_terms: Option<String>,
    pub special_term_ids: Vec<i64>,

    pub pdf_path: Option<String>,
    pub original_file_path: Option<String>,

    pub room_id: i64,
    pub agent_id: i64,
    pub template_id: i64,
}

/// Template format tag, parsed from [`ContractTemplate::file_type`] at
/// dispatch time. The match on this enum in the pipeline is exhaustive, so a
/// new format cannot be added without wiring a renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateFormat {
    Html,
    Excel,
    Word,
    Pdf,
}

impl FromStr for TemplateFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "html" => Ok(Self::Html),
            "excel" => Ok(Self::Excel),
            "word" => Ok(Self::Word),
            "pdf" => Ok(Self::Pdf),
            _ => Err(()),
        }
    }
}

impl fmt::Display for TemplateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            Self::Html => "html",
            Self::Excel => "excel",
            Self::Word => "word",
            Self::Pdf => "pdf",
        };
        f.write_str(tag)
    }
}
