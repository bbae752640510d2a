use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateAgentRequest {
    #[schema(example = "佐藤花子")]
    pub name: String,
    #[schema(example = "東京都知事 (2) 第12345号")]
    pub license_number: String,
    pub registration_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

/// Contract creation payload. The contract number is assigned by the server;
/// when `template_id` is omitted the default template is used.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateContractRequest {
    #[schema(example = "鈴木一郎")]
    pub tenant_name: String,
    #[schema(example = "東京都中野区中野3-3-3")]
    pub tenant_address: String,
    pub tenant_phone: Option<String>,
    pub tenant_email: Option<String>,

    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    #[schema(example = 150000)]
    pub rent_amount: i64,
    pub security_deposit: Option<i64>,
    pub key_money: Option<i64>,
    pub management_fee: Option<i64>,

    pub custom_special_terms: Option<String>,
    #[serde(default)]
    pub special_term_ids: Vec<i64>,

    pub room_id: i64,
    pub agent_id: i64,
    pub template_id: Option<i64>,
}

/// Outcome of an explicit generation run.
#[derive(Debug, Serialize, ToSchema)]
pub struct GenerateResponse {
    #[schema(example = 1)]
    pub contract_id: i64,
    #[schema(example = "/tmp/lease_contracts/contract_20240401-0001.pdf")]
    pub pdf_path: String,
    pub original_file_path: Option<String>,
}
