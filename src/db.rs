//! In-memory persistence layer.
//!
//! Stands in for the external storage the CRUD layer would normally own.
//! Entity tables live behind `parking_lot` RwLocks and the whole store is
//! cheaply cloneable (shared `Arc`), so handlers can move a handle into
//! `web::block` closures. The generation pipeline only reads entities and
//! writes back the two generated-file paths on the contract.

use chrono::NaiveDate;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use crate::models::{
    Building, Contract, ContractTemplate, Owner, RealEstateAgent, Room, SpecialTerm,
};

#[derive(Default)]
struct Tables {
    owners: RwLock<HashMap<i64, Owner>>,
    buildings: RwLock<HashMap<i64, Building>>,
    rooms: RwLock<HashMap<i64, Room>>,
    agents: RwLock<HashMap<i64, RealEstateAgent>>,
    special_terms: RwLock<HashMap<i64, SpecialTerm>>,
    templates: RwLock<HashMap<i64, ContractTemplate>>,
    contracts: RwLock<HashMap<i64, Contract>>,
    next_id: AtomicI64,
}

/// Shared entity store. Cloning shares the underlying tables.
#[derive(Clone, Default)]
pub struct Database {
    inner: Arc<Tables>,
}

impl Database {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&self) -> i64 {
        self.inner.next_id.fetch_add(1, Ordering::Relaxed) + 1
    }

    // ----- owners -----

    pub fn insert_owner(&self, mut owner: Owner) -> Owner {
        owner.id = self.next_id();
        self.inner.owners.write().insert(owner.id, owner.clone());
        owner
    }

    pub fn get_owner(&self, id: i64) -> Option<Owner> {
        self.inner.owners.read().get(&id).cloned()
    }

    // ----- buildings -----

    pub fn insert_building(&self, mut building: Building) -> Building {
        building.id = self.next_id();
        self.inner
            .buildings
            .write()
            .insert(building.id, building.clone());
        building
    }

    pub fn get_building(&self, id: i64) -> Option<Building> {
        self.inner.buildings.read().get(&id).cloned()
    }

    // ----- rooms -----

    pub fn insert_room(&self, mut room: Room) -> Room {
        room.id = self.next_id();
        self.inner.rooms.write().insert(room.id, room.clone());
        room
    }

    pub fn get_room(&self, id: i64) -> Option<Room> {
        self.inner.rooms.read().get(&id).cloned()
    }

    pub fn delete_room(&self, id: i64) -> Option<Room> {
        self.inner.rooms.write().remove(&id)
    }

    // ----- agents -----

    pub fn insert_agent(&self, mut agent: RealEstateAgent) -> RealEstateAgent {
        agent.id = self.next_id();
        self.inner.agents.write().insert(agent.id, agent.clone());
        agent
    }

    pub fn get_agent(&self, id: i64) -> Option<RealEstateAgent> {
        self.inner.agents.read().get(&id).cloned()
    }

    /// License numbers are globally unique; callers check before insert.
    pub fn license_exists(&self, license_number: &str) -> bool {
        self.inner
            .agents
            .read()
            .values()
            .any(|a| a.license_number == license_number)
    }

    // ----- special terms -----

    pub fn insert_special_term(&self, mut term: SpecialTerm) -> SpecialTerm {
        term.id = self.next_id();
        self.inner
            .special_terms
            .write()
            .insert(term.id, term.clone());
        term
    }

    pub fn get_special_term(&self, id: i64) -> Option<SpecialTerm> {
        self.inner.special_terms.read().get(&id).cloned()
    }

    /// Resolve a contract's attached terms in attachment order. Ids that no
    /// longer resolve are skipped.
    pub fn special_terms_for(&self, contract: &Contract) -> Vec<SpecialTerm> {
        let terms = self.inner.special_terms.read();
        contract
            .special_term_ids
            .iter()
            .filter_map(|id| terms.get(id).cloned())
            .collect()
    }

    // ----- templates -----

    pub fn insert_template(&self, mut template: ContractTemplate) -> ContractTemplate {
        template.id = self.next_id();
        let make_default = template.is_default;
        template.is_default = false;
        self.inner
            .templates
            .write()
            .insert(template.id, template.clone());
        if make_default {
            self.set_default_template(template.id);
            template.is_default = true;
        }
        template
    }

    pub fn get_template(&self, id: i64) -> Option<ContractTemplate> {
        self.inner.templates.read().get(&id).cloned()
    }

    pub fn default_template(&self) -> Option<ContractTemplate> {
        self.inner
            .templates
            .read()
            .values()
            .find(|t| t.is_default)
            .cloned()
    }

    /// Mark one template as the default, clearing the flag on every other
    /// template inside a single write-lock critical section so the "at most
    /// one default" invariant can never be observed broken.
    pub fn set_default_template(&self, id: i64) -> bool {
        let mut templates = self.inner.templates.write();
        if !templates.contains_key(&id) {
            return false;
        }
        for template in templates.values_mut() {
            template.is_default = template.id == id;
        }
        true
    }

    // ----- contracts -----

    pub fn insert_contract(&self, mut contract: Contract) -> Contract {
        contract.id = self.next_id();
        self.inner
            .contracts
            .write()
            .insert(contract.id, contract.clone());
        contract
    }

    pub fn get_contract(&self, id: i64) -> Option<Contract> {
        self.inner.contracts.read().get(&id).cloned()
    }

    pub fn delete_contract(&self, id: i64) -> Option<Contract> {
        self.inner.contracts.write().remove(&id)
    }

    /// Assign the next contract number for the given day (`YYYYMMDD-NNNN`,
    /// per-day counter) and insert, inside one write-lock critical section
    /// so two concurrent creations can never be handed the same number.
    pub fn create_contract(&self, date: NaiveDate, mut contract: Contract) -> Contract {
        contract.id = self.next_id();
        let prefix = date.format("%Y%m%d").to_string();
        let mut contracts = self.inner.contracts.write();
        let count = contracts
            .values()
            .filter(|c| c.contract_number.starts_with(&prefix))
            .count()
            + 1;
        contract.contract_number = format!("{prefix}-{count:04}");
        contracts.insert(contract.id, contract.clone());
        contract
    }

    /// Record the generated-file paths after a successful pipeline run. The
    /// original-format path is only overwritten when the run produced one
    /// (HTML generation leaves any previous artifact path in place).
    pub fn update_contract_paths(&self, id: i64, pdf_path: &str, original_file_path: Option<&str>) {
        let mut contracts = self.inner.contracts.write();
        if let Some(contract) = contracts.get_mut(&id) {
            contract.pdf_path = Some(pdf_path.to_string());
            if let Some(original) = original_file_path {
                contract.original_file_path = Some(original.to_string());
            }
        }
    }
}
