use genealogy::{ChronicleEvent, ClanInfo, EventCategory, FamilyId, NewFamily};

use super::persist;
use crate::state::{AppState, DeletionReport, FamilyDetail, FamilySummary};

pub fn list_families(state: &AppState) -> Result<Vec<FamilySummary>, String> {
    let registry = state.registry()?;
    Ok(registry.families.iter().map(FamilySummary::from).collect())
}

pub fn get_family(state: &AppState, family_id: u64) -> Result<FamilyDetail, String> {
    let registry = state.registry()?;
    let family = registry.family(FamilyId(family_id)).map_err(|e| e.to_string())?;
    Ok(FamilyDetail {
        summary: FamilySummary::from(family),
        info: family.info.clone(),
        events: family.events.clone(),
    })
}

pub fn create_family(state: &AppState, request: NewFamily) -> Result<FamilySummary, String> {
    let mut registry = state.registry()?;
    let id = registry.create_family(request).map_err(|e| e.to_string())?;
    persist(state, &registry)?;
    let family = registry.family(id).map_err(|e| e.to_string())?;
    Ok(FamilySummary::from(family))
}

pub fn update_clan_info(state: &AppState, family_id: u64, info: ClanInfo) -> Result<FamilyDetail, String> {
    {
        let mut registry = state.registry()?;
        registry
            .update_clan_info(FamilyId(family_id), info)
            .map_err(|e| e.to_string())?;
        persist(state, &registry)?;
    }
    get_family(state, family_id)
}

/// Without `confirmed` only the preview is returned and nothing changes.
pub fn delete_family(state: &AppState, family_id: u64, confirmed: bool) -> Result<DeletionReport, String> {
    let mut registry = state.registry()?;
    let plan = registry
        .plan_family_deletion(FamilyId(family_id))
        .map_err(|e| e.to_string())?;
    let mut report = DeletionReport::preview(plan);
    if confirmed {
        registry.apply_deletion(&report.plan).map_err(|e| e.to_string())?;
        persist(state, &registry)?;
        report.applied = true;
    }
    Ok(report)
}

pub fn add_event(
    state: &AppState,
    family_id: u64,
    year: i32,
    title: String,
    description: String,
    category: EventCategory,
) -> Result<Vec<ChronicleEvent>, String> {
    let mut registry = state.registry()?;
    let id = FamilyId(family_id);
    registry
        .add_event(
            id,
            ChronicleEvent {
                year,
                title,
                description,
                category,
            },
        )
        .map_err(|e| e.to_string())?;
    persist(state, &registry)?;
    Ok(registry.family(id).map_err(|e| e.to_string())?.events.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::offline_state;

    #[test]
    fn test_delete_family_needs_confirmation() {
        let state = offline_state();
        let before = list_families(&state).unwrap().len();

        let preview = delete_family(&state, 2, false).unwrap();
        assert!(!preview.applied);
        assert_eq!(list_families(&state).unwrap().len(), before);

        let done = delete_family(&state, 2, true).unwrap();
        assert!(done.applied);
        assert_eq!(list_families(&state).unwrap().len(), before - 1);
        assert!(get_family(&state, 2).is_err());
    }

    #[test]
    fn test_events_stay_sorted() {
        let state = offline_state();
        let events = add_event(
            &state,
            1,
            1900,
            "修谱".into(),
            "重修族谱".into(),
            EventCategory::Achievement,
        )
        .unwrap();
        let years: Vec<i32> = events.iter().map(|e| e.year).collect();
        let mut sorted = years.clone();
        sorted.sort();
        assert_eq!(years, sorted);
        assert!(events.iter().any(|e| e.title == "修谱"));
    }

    #[test]
    fn test_create_family_adds_founder() {
        let state = offline_state();
        let summary = create_family(
            &state,
            NewFamily {
                surname: "孔".into(),
                hall_name: "阙里堂".into(),
                origin: "山东曲阜".into(),
                ancestor: "丘".into(),
            },
        )
        .unwrap();
        assert_eq!(summary.member_count, 1);
        assert_eq!(summary.hall_name, "阙里堂");
    }
}
