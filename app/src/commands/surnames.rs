use genealogy::{Hall, Region, SurnameData};

use super::persist;
use crate::state::AppState;

pub fn get_surnames(state: &AppState) -> Result<Vec<SurnameData>, String> {
    Ok(state.registry()?.surnames.clone())
}

pub fn get_surname(state: &AppState, character: &str) -> Result<SurnameData, String> {
    state
        .registry()?
        .surname(character)
        .cloned()
        .ok_or_else(|| format!("surname {} not found", character))
}

/// Add a new encyclopedia entry, or replace an existing one when `replace`.
pub fn save_surname(state: &AppState, data: SurnameData, replace: bool) -> Result<SurnameData, String> {
    let character = data.character.clone();
    {
        let mut registry = state.registry()?;
        if replace {
            registry.update_surname(data).map_err(|e| e.to_string())?;
        } else {
            registry.add_surname(data).map_err(|e| e.to_string())?;
        }
        persist(state, &registry)?;
    }
    get_surname(state, &character)
}

pub fn add_hall(state: &AppState, character: &str, hall: Hall) -> Result<SurnameData, String> {
    {
        let mut registry = state.registry()?;
        registry.add_hall(character, hall).map_err(|e| e.to_string())?;
        persist(state, &registry)?;
    }
    get_surname(state, character)
}

pub fn get_regions(state: &AppState) -> Result<Vec<Region>, String> {
    Ok(state.registry()?.regions.clone())
}

pub fn add_region(state: &AppState, name: &str, province: &str) -> Result<Region, String> {
    let mut registry = state.registry()?;
    let id = registry.add_region(name, province).map_err(|e| e.to_string())?;
    persist(state, &registry)?;
    registry
        .regions
        .iter()
        .find(|r| r.id == id)
        .cloned()
        .ok_or_else(|| format!("region {} not stored", id.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::offline_state;

    fn entry(character: &str) -> SurnameData {
        SurnameData {
            character: character.into(),
            pinyin: "Ōuyáng".into(),
            origin: "源自姒姓，越王勾践之后。".into(),
            totem_description: None,
            halls: Vec::new(),
            famous_ancestors: vec!["欧阳修".into()],
            distribution: "江西、湖南".into(),
            population_rank: None,
        }
    }

    #[test]
    fn test_add_then_replace_surname() {
        let state = offline_state();
        save_surname(&state, entry("欧阳"), false).unwrap();
        assert!(save_surname(&state, entry("欧阳"), false).is_err());

        let mut updated = entry("欧阳");
        updated.population_rank = Some(200);
        let saved = save_surname(&state, updated, true).unwrap();
        assert_eq!(saved.population_rank, Some(200));
    }

    #[test]
    fn test_add_hall_to_known_surname() {
        let state = offline_state();
        let hall = Hall {
            name: "庐陵堂".into(),
            description: "欧阳修故里".into(),
            region: Some("江西".into()),
        };
        assert!(add_hall(&state, "欧阳", hall.clone()).is_err());
        let li = add_hall(&state, "李", hall).unwrap();
        assert_eq!(li.halls.last().map(|h| h.name.as_str()), Some("庐陵堂"));
    }

    #[test]
    fn test_add_region_gets_next_id() {
        let state = offline_state();
        let before = get_regions(&state).unwrap().len();
        let region = add_region(&state, "庐陵", "江西").unwrap();
        assert_eq!(region.id.0, before as u64 + 1);
    }
}
