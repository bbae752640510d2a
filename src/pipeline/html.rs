//! HTML template rendering.
//!
//! HTML templates get full structural templating, not flat token
//! replacement: variable interpolation, conditionals on optional fields, and
//! iteration over `special_terms` / `custom_amenities`. The scope exposes
//! the same display formatting as the placeholder table, so
//! `{{ contract.rent_amount }}` renders identically in every format.

use minijinja::{context, Environment, Value};
use serde::Serialize;

use super::placeholders::{
    format_floor_area, format_japanese_date, format_optional_date, format_optional_yen,
    format_yen,
};
use super::resolver::ContractBundle;

/// Render a stored HTML template against the resolved bundle. Any template
/// syntax error is fatal to the generation request.
pub fn render_template(source: &str, bundle: &ContractBundle) -> Result<String, minijinja::Error> {
    let env = Environment::new();
    env.render_str(source, scope(bundle))
}

/// Minimal HTML text escaping for preview output assembled by hand.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

#[derive(Serialize)]
struct ContractScope {
    contract_number: String,
    tenant_name: String,
    tenant_address: String,
    tenant_phone: String,
    tenant_email: String,
    start_date: String,
    end_date: String,
    rent_amount: String,
    security_deposit: String,
    key_money: String,
    management_fee: String,
    custom_special_terms: String,
}

#[derive(Serialize)]
struct OwnerScope {
    name: String,
    address: String,
    phone: String,
    email: String,
}

#[derive(Serialize)]
struct BuildingScope {
    name: String,
    address: String,
    structure: String,
    roof_structure: String,
    #[serde(rename = "type")]
    building_type: String,
    floors: i32,
    total_units: i32,
    construction_date: String,
}

#[derive(Serialize)]
struct RoomScope {
    room_number: String,
    layout: String,
    floor: i32,
    floor_area: String,
    has_kitchen: bool,
    has_toilet: bool,
    has_bath: bool,
    has_shower: bool,
    has_washroom: bool,
    has_hot_water: bool,
    has_stove: bool,
    has_air_conditioner: bool,
    has_lighting: bool,
    has_telephone: bool,
    has_internet: bool,
    has_fire_alarm: bool,
    has_tv_connection: bool,
    has_elevator_access: bool,
    has_parking: bool,
    has_bicycle_parking: bool,
    has_private_garden: bool,
}

#[derive(Serialize)]
struct AgentScope {
    name: String,
    license_number: String,
}

fn scope(bundle: &ContractBundle) -> Value {
    let contract = &bundle.contract;
    let room = &bundle.room;
    let building = &bundle.building;

    context! {
        contract => ContractScope {
            contract_number: contract.contract_number.clone(),
            tenant_name: contract.tenant_name.clone(),
            tenant_address: contract.tenant_address.clone(),
            tenant_phone: contract.tenant_phone.clone().unwrap_or_default(),
            tenant_email: contract.tenant_email.clone().unwrap_or_default(),
            start_date: format_japanese_date(contract.start_date),
            end_date: format_optional_date(contract.end_date),
            rent_amount: format_yen(contract.rent_amount),
            security_deposit: format_optional_yen(contract.security_deposit),
            key_money: format_optional_yen(contract.key_money),
            management_fee: format_optional_yen(contract.management_fee),
            custom_special_terms: contract.custom_special_terms.clone().unwrap_or_default(),
        },
        owner => OwnerScope {
            name: bundle.owner.name.clone(),
            address: bundle.owner.address.clone(),
            phone: bundle.owner.phone.clone().unwrap_or_default(),
            email: bundle.owner.email.clone().unwrap_or_default(),
        },
        building => BuildingScope {
            name: building.name.clone(),
            address: building.address.clone(),
            structure: building.structure.clone(),
            roof_structure: building.roof_structure.clone().unwrap_or_default(),
            building_type: building.building_type.clone(),
            floors: building.floors,
            total_units: building.total_units,
            construction_date: format_optional_date(building.construction_date),
        },
        room => RoomScope {
            room_number: room.room_number.clone(),
            layout: room.layout.clone(),
            floor: room.floor,
            floor_area: format_floor_area(room.floor_area),
            has_kitchen: room.has_kitchen,
            has_toilet: room.has_toilet,
            has_bath: room.has_bath,
            has_shower: room.has_shower,
            has_washroom: room.has_washroom,
            has_hot_water: room.has_hot_water,
            has_stove: room.has_stove,
            has_air_conditioner: room.has_air_conditioner,
            has_lighting: room.has_lighting,
            has_telephone: room.has_telephone,
            has_internet: room.has_internet,
            has_fire_alarm: room.has_fire_alarm,
            has_tv_connection: room.has_tv_connection,
            has_elevator_access: room.has_elevator_access,
            has_parking: room.has_parking,
            has_bicycle_parking: room.has_bicycle_parking,
            has_private_garden: room.has_private_garden,
        },
        agent => AgentScope {
            name: bundle.agent.name.clone(),
            license_number: bundle.agent.license_number.clone(),
        },
        special_terms => bundle.special_terms.clone(),
        custom_amenities => bundle.custom_amenities.clone(),
    }
}
