use genealogy::config::AppConfig;
use genealogy::kinship::{WuFuChart, UNKNOWN};
use genealogy::narrative::NarrativeService;
use genealogy::walk::descendant_ids;
use genealogy::{
    ChronicleEvent, ClanInfo, DeletionPlan, Family, FamilyId, Gender, MemberPool, Person, PersonId,
    Reference, Registry,
};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

/// Chart labels from the father upward.
const ANCESTOR_LABELS: [&str; 4] = ["父亲", "祖父", "曾祖", "高祖"];

/// Global application state shared by every command
pub struct AppState {
    pub registry: Arc<Mutex<Registry>>,
    /// `None` when no API key is configured.
    pub narrator: Option<Arc<dyn NarrativeService>>,
    pub config: AppConfig,
    /// Snapshot written back after mutating commands.
    pub data_path: Option<PathBuf>,
}

impl AppState {
    pub fn registry(&self) -> Result<MutexGuard<'_, Registry>, String> {
        self.registry
            .lock()
            .map_err(|_| "registry lock poisoned".to_string())
    }
}

// -- Serializable types returned by commands --

#[derive(Serialize, Clone)]
pub struct ConfigView {
    pub model: String,
    pub base_url: String,
    pub has_api_key: bool,
    pub timeout_secs: Option<u64>,
    pub tree_max_depth: usize,
    pub show_female: bool,
    pub log_level: String,
}

#[derive(Serialize, Clone)]
pub struct FamilySummary {
    pub id: u64,
    pub surname: String,
    pub hall_name: String,
    pub origin: String,
    pub ancestor: String,
    pub member_count: usize,
    pub created_at: String,
}

impl From<&Family> for FamilySummary {
    fn from(family: &Family) -> Self {
        Self {
            id: family.id.0,
            surname: family.info.surname.clone(),
            hall_name: family.info.hall_name.clone(),
            origin: family.info.origin.clone(),
            ancestor: family.info.ancestor.clone(),
            member_count: family.members.len(),
            created_at: family.created_at.format("%Y-%m-%d").to_string(),
        }
    }
}

#[derive(Serialize, Clone)]
pub struct FamilyDetail {
    pub summary: FamilySummary,
    pub info: ClanInfo,
    pub events: Vec<ChronicleEvent>,
}

#[derive(Serialize, Clone)]
pub struct PersonData {
    pub id: u64,
    pub family_id: u64,
    pub name: String,
    pub courtesy_name: Option<String>,
    pub art_name: Option<String>,
    pub is_female: bool,
    pub birth_year: i32,
    pub death_year: Option<i32>,
    pub generation: i32,
    pub generation_name: String,
    pub father: Option<String>,
    pub mother: Option<String>,
    pub spouses: Vec<String>,
    pub children: Vec<String>,
    pub descendant_count: usize,
    pub location: Option<String>,
    pub biography: Option<String>,
}

impl PersonData {
    pub fn new(pool: &MemberPool<'_>, family_id: FamilyId, person: &Person) -> Self {
        let name_of = |id: PersonId| {
            pool.find_by_id(id)
                .map(Person::full_name)
                .unwrap_or_else(|| format!("#{}", id))
        };
        Self {
            id: person.id.0,
            family_id: family_id.0,
            name: person.full_name(),
            courtesy_name: person.courtesy_name.clone(),
            art_name: person.art_name.clone(),
            is_female: person.gender == Gender::Female,
            birth_year: person.birth_year,
            death_year: person.death_year,
            generation: person.generation,
            generation_name: person.generation_name.clone(),
            father: person.father_id.map(name_of),
            mother: person.mother.as_ref().map(|m| pool.display_name(m)),
            spouses: person.spouses.iter().map(|s| pool.display_name(s)).collect(),
            children: person.children.iter().copied().map(name_of).collect(),
            descendant_count: descendant_ids(pool, person).len(),
            location: person.location.as_ref().map(|l| l.name.clone()),
            biography: person.biography.clone(),
        }
    }
}

#[derive(Serialize, Clone)]
pub struct ChartLevel {
    pub label: &'static str,
    pub name: String,
}

#[derive(Serialize, Clone)]
pub struct WuFuView {
    pub focal: String,
    /// 高祖 first, father last.
    pub ancestors: Vec<ChartLevel>,
    pub siblings: Vec<String>,
    pub more_siblings: usize,
    pub children: Vec<String>,
}

impl From<&WuFuChart<'_>> for WuFuView {
    fn from(chart: &WuFuChart<'_>) -> Self {
        let mut ancestors: Vec<ChartLevel> = chart
            .ancestors
            .levels()
            .into_iter()
            .zip(ANCESTOR_LABELS)
            .map(|(person, label)| ChartLevel {
                label,
                name: person.map(Person::full_name).unwrap_or_else(|| UNKNOWN.to_string()),
            })
            .collect();
        ancestors.reverse();

        let (shown, more_siblings) = chart.shown_siblings();
        Self {
            focal: chart.focal.full_name(),
            ancestors,
            siblings: shown.iter().map(|p| p.full_name()).collect(),
            more_siblings,
            children: chart.children.iter().map(|p| p.full_name()).collect(),
        }
    }
}

#[derive(Serialize, Clone)]
pub struct DeletionReport {
    pub applied: bool,
    pub removed: usize,
    pub names: Vec<String>,
    pub plan: DeletionPlan,
}

impl DeletionReport {
    pub fn preview(plan: DeletionPlan) -> Self {
        Self {
            applied: false,
            removed: plan.removed.len(),
            names: plan.names.clone(),
            plan,
        }
    }
}

#[derive(Serialize, Clone)]
pub struct BiographyView {
    pub person: String,
    pub text: String,
    pub generated: bool,
    pub saved: bool,
}

#[derive(Serialize, Clone)]
pub struct SaveResult {
    pub families: usize,
    pub members: usize,
    pub file_bytes: usize,
}

#[derive(Serialize, Clone)]
pub struct LoadResult {
    pub families: usize,
    pub members: usize,
    pub surnames: usize,
    pub regions: usize,
}

/// Parse a spouse or mother argument: `#12` links a record, anything else
/// is kept as a name.
pub fn parse_reference(text: &str) -> Reference {
    let text = text.trim();
    match text.strip_prefix('#').and_then(|id| id.parse().ok()) {
        Some(id) => Reference::Linked(PersonId(id)),
        None => Reference::unlinked(text),
    }
}
