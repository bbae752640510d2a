use serde::Deserialize;
use utoipa::ToSchema;

/// Multipart template upload. The `file` part carries the template document;
/// `file_type` must be one of `html`, `excel`, `word`, `pdf`.
#[derive(Debug, ToSchema)]
#[allow(dead_code)] // schema-only: the handler reads the multipart stream directly
pub struct UploadTemplateRequest {
    #[schema(example = "標準賃貸借契約書")]
    pub name: String,
    pub description: Option<String>,
    #[schema(example = "html")]
    pub file_type: String,
    pub is_default: Option<bool>,
    #[schema(value_type = String, format = Binary)]
    pub file: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateSpecialTermRequest {
    #[schema(example = "ペット飼育禁止")]
    pub title: String,
    #[schema(example = "借主は本物件においてペットを飼育してはならない。")]
    pub content: String,
    #[serde(default)]
    pub is_common: bool,
}
