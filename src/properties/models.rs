use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOwnerRequest {
    #[schema(example = "山田太郎")]
    pub name: String,
    #[schema(example = "東京都新宿区西新宿1-1-1")]
    pub address: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateBuildingRequest {
    #[schema(example = "サンハイツ新宿")]
    pub name: String,
    #[schema(example = "東京都新宿区西新宿2-2-2")]
    pub address: String,
    #[schema(example = "鉄筋コンクリート造")]
    pub structure: String,
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

/// Room creation payload. Custom amenities arrive as a list and are stored
/// as their JSON serialization on the entity.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateRoomRequest {
    #[schema(example = "301")]
    pub room_number: String,
    #[schema(example = "1LDK")]
    pub layout: String,
    #[schema(example = 25.5)]
    pub floor_area: f64,
    #[schema(example = 3)]
    pub floor: i32,

    #[serde(default)]
    pub has_kitchen: bool,
    #[serde(default)]
    pub has_toilet: bool,
    #[serde(default)]
    pub has_bath: bool,
    #[serde(default)]
    pub has_shower: bool,
    #[serde(default)]
    pub has_washroom: bool,
    #[serde(default)]
    pub has_hot_water: bool,
    #[serde(default)]
    pub has_stove: bool,
    #[serde(default)]
    pub has_air_conditioner: bool,
    #[serde(default)]
    pub has_lighting: bool,
    #[serde(default)]
    pub has_telephone: bool,
    #[serde(default)]
    pub has_internet: bool,
    #[serde(default)]
    pub has_fire_alarm: bool,
    #[serde(default)]
    pub has_tv_connection: bool,
    #[serde(default)]
    pub has_elevator_access: bool,
    #[serde(default)]
    pub has_parking: bool,
    #[serde(default)]
    pub has_bicycle_parking: bool,
    #[serde(default)]
    pub has_private_garden: bool,

    pub custom_amenities: Option<Vec<String>>,
    pub building_id: i64,
    pub notes: Option<String>,
}
