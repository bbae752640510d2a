//! Entity resolution for a generation run.
//!
//! Loads the full Contract -> Room -> Building -> Owner chain plus the
//! agent, attached special terms and the template, failing with a distinct
//! error for whichever link is broken. Nothing is rendered until the whole
//! chain resolves.

use crate::db::Database;
use crate::models::{
    Building, Contract, ContractTemplate, Owner, RealEstateAgent, Room, SpecialTerm,
};

use super::GenerateError;

/// Everything the renderers need for one contract.
#[derive(Debug, Clone)]
pub struct ContractBundle {
    pub contract: Contract,
    pub room: Room,
    pub building: Building,
    pub owner: Owner,
    pub agent: RealEstateAgent,
    pub special_terms: Vec<SpecialTerm>,
    pub custom_amenities: Vec<String>,
    pub template: ContractTemplate,
}

pub fn resolve(db: &Database, contract_id: i64) -> Result<ContractBundle, GenerateError> {
    let contract = db
        .get_contract(contract_id)
        .ok_or(GenerateError::ContractNotFound(contract_id))?;
    let room = db
        .get_room(contract.room_id)
        .ok_or(GenerateError::RoomNotFound(contract.room_id))?;
    let building = db
        .get_building(room.building_id)
        .ok_or(GenerateError::BuildingNotFound(room.building_id))?;
    let owner = db
        .get_owner(building.owner_id)
        .ok_or(GenerateError::OwnerNotFound(building.owner_id))?;
    let agent = db
        .get_agent(contract.agent_id)
        .ok_or(GenerateError::AgentNotFound(contract.agent_id))?;
    let template = db
        .get_template(contract.template_id)
        .ok_or(GenerateError::TemplateNotFound(contract.template_id))?;

    let special_terms = db.special_terms_for(&contract);
    let custom_amenities = parse_custom_amenities(room.custom_amenities.as_deref());

    Ok(ContractBundle {
        contract,
        room,
        building,
        owner,
        agent,
        special_terms,
        custom_amenities,
        template,
    })
}

/// Custom amenities are stored as a JSON array string. A malformed value is
/// a data anomaly, not a generation failure: log it and carry on with an
/// empty list.
fn parse_custom_amenities(raw: Option<&str>) -> Vec<String> {
    let raw = match raw {
        Some(s) if !s.trim().is_empty() => s,
        _ => return Vec::new(),
    };
    match serde_json::from_str::<Vec<String>>(raw) {
        Ok(list) => list,
        Err(err) => {
            log::warn!("ignoring malformed custom amenities JSON ({err}): {raw}");
            Vec::new()
        }
    }
}
