use std::sync::Arc;
use std::time::Duration;

use genealogy::kinship::{cross_family_fallback, fallback_relationship, wufu_chart, RelationshipResult};
use genealogy::narrative::{NarrativeError, NarrativeService, PendingNarrative};
use genealogy::{Family, Person, PersonId, Registry};
use tracing::{info, warn};

use super::persist;
use crate::state::{AppState, BiographyView, WuFuView};

const RETRY_MESSAGE: &str = "请重试";
const SERVICE_DOWN_MESSAGE: &str = "AI服务暂时不可用。";
const KEY_NEEDED_MESSAGE: &str = "AI Key needed for generation.";
const POLL_INTERVAL: Duration = Duration::from_millis(100);
const PROGRESS_EVERY: Duration = Duration::from_secs(3);

pub fn get_wufu_chart(state: &AppState, person_id: u64) -> Result<WuFuView, String> {
    let registry = state.registry()?;
    let pool = registry.pool();
    let focal = pool
        .find_by_id(PersonId(person_id))
        .ok_or_else(|| format!("person {} not found", person_id))?;
    Ok(WuFuView::from(&wufu_chart(&pool, focal)))
}

/// Relationship between two members, possibly recorded in different books.
///
/// With a narrative service the pair is analysed remotely against the
/// members of their book (or every book for a cross-family pair). A failed
/// call comes back as an inline "analysis failed" result.
pub fn analyze_relationship(state: &AppState, a_id: u64, b_id: u64) -> Result<RelationshipResult, String> {
    let Some(narrator) = state.narrator.clone() else {
        return local_relationship(state, a_id, b_id);
    };

    let (a, b, context, same_family) = {
        let registry = state.registry()?;
        let (family_a, a) = locate(&registry, a_id)?;
        let (family_b, b) = locate(&registry, b_id)?;
        let same_family = family_a.id == family_b.id;
        let context: Vec<Person> = if same_family {
            family_a.members.clone()
        } else {
            registry.pool().iter().cloned().collect()
        };
        (a.clone(), b.clone(), context, same_family)
    };

    info!("Analysing relationship of {} and {}", a.full_name(), b.full_name());
    let pending = PendingNarrative::spawn(move || {
        let context: Vec<&Person> = context.iter().collect();
        narrator.analyze_relationship(&a, &b, &context)
    });

    Ok(wait_logged(pending, "relationship analysis").unwrap_or_else(|e| {
        warn!("Relationship analysis failed: {}", e);
        RelationshipResult::failed(if same_family { RETRY_MESSAGE } else { SERVICE_DOWN_MESSAGE })
    }))
}

fn local_relationship(state: &AppState, a_id: u64, b_id: u64) -> Result<RelationshipResult, String> {
    let registry = state.registry()?;
    let (family_a, a) = locate(&registry, a_id)?;
    let (family_b, b) = locate(&registry, b_id)?;
    Ok(if family_a.id == family_b.id {
        fallback_relationship(a, b)
    } else {
        cross_family_fallback(a, &family_a.info.hall_name, b, &family_b.info.hall_name)
    })
}

fn locate(registry: &Registry, person_id: u64) -> Result<(&Family, &Person), String> {
    registry
        .locate(PersonId(person_id))
        .ok_or_else(|| format!("person {} not found", person_id))
}

/// Draft a biography. With `save` the draft replaces the stored one.
pub fn generate_biography(state: &AppState, person_id: u64, save: bool) -> Result<BiographyView, String> {
    let (family_id, person) = {
        let registry = state.registry()?;
        let (family, person) = locate(&registry, person_id)?;
        (family.id, person.clone())
    };
    let name = person.full_name();

    let Some(narrator) = state.narrator.clone() else {
        return Ok(BiographyView {
            person: name,
            text: KEY_NEEDED_MESSAGE.to_string(),
            generated: false,
            saved: false,
        });
    };

    let draft = wait_logged(draft_biography(narrator, person.clone()), "biography");
    let text = match draft {
        Ok(text) => text,
        Err(e) => {
            warn!("Biography generation failed: {}", e);
            return Ok(BiographyView {
                person: name,
                text: SERVICE_DOWN_MESSAGE.to_string(),
                generated: false,
                saved: false,
            });
        }
    };

    if save {
        let mut registry = state.registry()?;
        let mut record = person;
        record.biography = Some(text.clone());
        registry
            .save_member(family_id, record)
            .map_err(|e| e.to_string())?;
        persist(state, &registry)?;
    }

    Ok(BiographyView {
        person: name,
        text,
        generated: true,
        saved: save,
    })
}

/// Wait for a narrative call, logging a loading line every few seconds.
fn wait_logged<T: Send + 'static>(pending: PendingNarrative<T>, what: &str) -> Result<T, NarrativeError> {
    let mut next_report = Duration::ZERO;
    pending.wait_polling(POLL_INTERVAL, |elapsed| {
        if elapsed >= next_report {
            info!("Waiting for {} ({}s)", what, elapsed.as_secs());
            next_report = elapsed + PROGRESS_EVERY;
        }
    })
}

fn draft_biography(narrator: Arc<dyn NarrativeService>, person: Person) -> PendingNarrative<String> {
    PendingNarrative::spawn(move || narrator.generate_biography(&person))
}
