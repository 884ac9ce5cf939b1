use genealogy::{FamilyId, MemberPool, Person, PersonId};

use super::persist;
use crate::state::{AppState, DeletionReport, PersonData};

pub fn get_family_members(state: &AppState, family_id: u64) -> Result<Vec<PersonData>, String> {
    let registry = state.registry()?;
    let id = FamilyId(family_id);
    let family = registry.family(id).map_err(|e| e.to_string())?;
    let pool = registry.pool();
    Ok(family
        .members
        .iter()
        .map(|m| PersonData::new(&pool, id, m))
        .collect())
}

pub fn get_person(state: &AppState, person_id: u64) -> Result<PersonData, String> {
    let registry = state.registry()?;
    let (family, person) = registry
        .locate(PersonId(person_id))
        .ok_or_else(|| format!("person {} not found", person_id))?;
    Ok(PersonData::new(&registry.pool(), family.id, person))
}

/// Stored record of a member, for editing and re-saving.
pub fn get_person_record(state: &AppState, person_id: u64) -> Result<(u64, Person), String> {
    let registry = state.registry()?;
    registry
        .locate(PersonId(person_id))
        .map(|(family, person)| (family.id.0, person.clone()))
        .ok_or_else(|| format!("person {} not found", person_id))
}

pub fn allocate_person_id(state: &AppState) -> Result<PersonId, String> {
    Ok(state.registry()?.allocate_person_id())
}

/// Members of the family who could be recorded as father of someone in
/// `generation`.
pub fn get_potential_fathers(
    state: &AppState,
    family_id: u64,
    generation: i32,
) -> Result<Vec<PersonData>, String> {
    let registry = state.registry()?;
    let id = FamilyId(family_id);
    let family = registry.family(id).map_err(|e| e.to_string())?;
    let everyone = registry.pool();
    Ok(MemberPool::new(&family.members)
        .potential_fathers(generation)
        .into_iter()
        .map(|p| PersonData::new(&everyone, id, p))
        .collect())
}

pub fn save_person(state: &AppState, family_id: u64, person: Person) -> Result<PersonData, String> {
    let id = {
        let mut registry = state.registry()?;
        let id = registry
            .save_member(FamilyId(family_id), person)
            .map_err(|e| e.to_string())?;
        persist(state, &registry)?;
        id
    };
    get_person(state, id.0)
}

/// Without `confirmed` only the cascade preview is returned.
pub fn delete_person(
    state: &AppState,
    family_id: u64,
    person_id: u64,
    confirmed: bool,
) -> Result<DeletionReport, String> {
    let mut registry = state.registry()?;
    let plan = registry
        .plan_member_deletion(FamilyId(family_id), PersonId(person_id))
        .map_err(|e| e.to_string())?;
    let mut report = DeletionReport::preview(plan);
    if confirmed {
        registry.apply_deletion(&report.plan).map_err(|e| e.to_string())?;
        persist(state, &registry)?;
        report.applied = true;
    }
    Ok(report)
}
