//! Registry - owns every family book, the surname encyclopedia and regions
//!
//! All mutations go through here so that children indexes, generation
//! numbers and cascading deletes stay consistent.

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info};

use crate::components::*;
use crate::error::{GenealogyError, Result};
use crate::graph::MemberPool;
use crate::walk::descendant_ids;

const DEFAULT_MOTTO: &str = "暂无族训";
const DEFAULT_POEM: &str = "暂无字辈";
pub(crate) const FOUNDER_GENERATION_NAME: &str = "始";

/// Fields collected by the create-family dialog.
#[derive(Debug, Clone)]
pub struct NewFamily {
    pub surname: String,
    pub hall_name: String,
    pub origin: String,
    pub ancestor: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum DeletionTarget {
    Family(FamilyId),
    Member { family: FamilyId, person: PersonId },
}

/// What a destructive operation would remove, shown to the user before it
/// is applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeletionPlan {
    pub target: DeletionTarget,
    pub removed: Vec<PersonId>,
    pub names: Vec<String>,
}

#[derive(Debug, Default)]
pub struct Registry {
    pub families: Vec<Family>,
    pub surnames: Vec<SurnameData>,
    pub regions: Vec<Region>,
    pub next_person_id: u64,
    pub next_family_id: u64,
    pub next_region_id: u64,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            next_person_id: 1,
            next_family_id: 1,
            next_region_id: 1,
            ..Default::default()
        }
    }

    // ------------------------------------------------------------------
    // Lookup
    // ------------------------------------------------------------------

    pub fn family(&self, id: FamilyId) -> Result<&Family> {
        self.families
            .iter()
            .find(|f| f.id == id)
            .ok_or(GenealogyError::FamilyNotFound(id))
    }

    fn family_mut(&mut self, id: FamilyId) -> Result<&mut Family> {
        self.families
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or(GenealogyError::FamilyNotFound(id))
    }

    /// Members of every family, for cross-family spouse and father lookups.
    pub fn pool(&self) -> MemberPool<'_> {
        MemberPool::from_families(&self.families)
    }

    /// Family that records `person`, together with the record.
    pub fn locate(&self, person: PersonId) -> Option<(&Family, &Person)> {
        self.families
            .iter()
            .find_map(|f| f.member(person).map(|p| (f, p)))
    }

    pub fn member_count(&self) -> usize {
        self.families.iter().map(|f| f.members.len()).sum()
    }

    pub fn allocate_person_id(&mut self) -> PersonId {
        let id = PersonId(self.next_person_id);
        self.next_person_id += 1;
        id
    }

    fn allocate_family_id(&mut self) -> FamilyId {
        let id = FamilyId(self.next_family_id);
        self.next_family_id += 1;
        id
    }

    // ------------------------------------------------------------------
    // Families
    // ------------------------------------------------------------------

    /// Open a new family book with its founding ancestor as first member.
    pub fn create_family(&mut self, request: NewFamily) -> Result<FamilyId> {
        let surname = request.surname.trim().to_string();
        let hall = request.hall_name.trim().to_string();
        let ancestor = request.ancestor.trim().to_string();
        if surname.is_empty() || hall.is_empty() || ancestor.is_empty() {
            return Err(GenealogyError::InvalidRecord(
                "surname, hall name and ancestor are required".into(),
            ));
        }

        let id = self.allocate_family_id();
        let mut root = Person::new(self.allocate_person_id(), &surname, &ancestor, Gender::Male, 1);
        root.generation_name = FOUNDER_GENERATION_NAME.to_string();
        root.location = Some(Location::new(request.origin.trim(), ""));

        self.families.push(Family {
            id,
            info: ClanInfo {
                surname,
                hall_name: hall,
                origin: request.origin.trim().to_string(),
                ancestor,
                motto: DEFAULT_MOTTO.to_string(),
                generation_poem: DEFAULT_POEM.to_string(),
            },
            members: vec![root],
            events: Vec::new(),
            created_at: Utc::now(),
        });

        info!("Created family {} ({})", id, self.family(id)?.info.hall_name);
        Ok(id)
    }

    pub fn update_clan_info(&mut self, id: FamilyId, info: ClanInfo) -> Result<()> {
        if info.surname.trim().is_empty() || info.hall_name.trim().is_empty() {
            return Err(GenealogyError::InvalidRecord("surname and hall name are required".into()));
        }
        self.family_mut(id)?.info = info;
        debug!("Updated clan info of family {}", id);
        Ok(())
    }

    /// Record a chronicle event, keeping the list ordered by year.
    pub fn add_event(&mut self, id: FamilyId, event: ChronicleEvent) -> Result<()> {
        if event.title.trim().is_empty() {
            return Err(GenealogyError::InvalidRecord("event title is required".into()));
        }
        let family = self.family_mut(id)?;
        let at = family.events.partition_point(|e| e.year <= event.year);
        family.events.insert(at, event);
        Ok(())
    }

    pub fn plan_family_deletion(&self, id: FamilyId) -> Result<DeletionPlan> {
        let family = self.family(id)?;
        Ok(DeletionPlan {
            target: DeletionTarget::Family(id),
            removed: family.members.iter().map(|m| m.id).collect(),
            names: family.members.iter().map(Person::full_name).collect(),
        })
    }

    // ------------------------------------------------------------------
    // Members
    // ------------------------------------------------------------------

    /// Insert a new member or replace the stored record with the same id.
    ///
    /// The father must be recorded in the same family. His generation
    /// number is the base for the member's, and an empty generation-name is filled from the clan's naming poem.
    /// Children indexes are rebuilt afterwards, which also detaches the
    /// member from a previous father.
    pub fn save_member(&mut self, family_id: FamilyId, mut person: Person) -> Result<PersonId> {
        if person.surname.trim().is_empty() || person.given_name.trim().is_empty() {
            return Err(GenealogyError::InvalidRecord("surname and given name are required".into()));
        }
        if let Some((owner, _)) = self.locate(person.id) {
            if owner.id != family_id {
                return Err(GenealogyError::InvalidRecord(format!(
                    "person {} already belongs to family {}",
                    person.id, owner.id
                )));
            }
        }
        if let Some(father_id) = person.father_id {
            self.check_father(family_id, &person, father_id)?;
        }

        let father_generation = {
            let pool = self.pool();
            pool.father(&person).map(|f| f.generation)
        };
        if let Some(generation) = father_generation {
            let derived = generation.checked_add(1).ok_or_else(|| {
                GenealogyError::InvalidRecord(format!("generation {} has no successor", generation))
            })?;
            if person.generation != derived {
                debug!(
                    "Generation of {} set to {} from father",
                    person.full_name(),
                    derived
                );
            }
            person.generation = derived;
        }

        let family = self.family_mut(family_id)?;
        if person.generation_name.trim().is_empty() {
            if let Some(c) = family.info.generation_name_for(person.generation) {
                person.generation_name = c.to_string();
            }
        }

        let id = person.id;
        let next_id = id
            .0
            .checked_add(1)
            .ok_or_else(|| GenealogyError::InvalidRecord(format!("person id {} is out of range", id)))?;
        match family.members.iter_mut().find(|m| m.id == id) {
            Some(existing) => {
                person.children = std::mem::take(&mut existing.children);
                *existing = person;
                debug!("Replaced member {} in family {}", id, family_id);
            }
            None => {
                family.members.push(person);
                debug!("Added member {} to family {}", id, family_id);
            }
        }
        self.next_person_id = self.next_person_id.max(next_id);

        self.reindex();
        Ok(id)
    }

    /// A father must be recorded in the same family book and must not
    /// descend from the member.
    fn check_father(&self, family_id: FamilyId, person: &Person, father_id: PersonId) -> Result<()> {
        if father_id == person.id {
            return Err(GenealogyError::InvalidRecord("a person cannot be their own father".into()));
        }
        if self.family(family_id)?.member(father_id).is_none() {
            return Err(GenealogyError::InvalidRecord(format!(
                "father {} is not recorded in family {}",
                father_id, family_id
            )));
        }
        let pool = self.pool();
        match pool.find_by_id(person.id) {
            Some(stored) if descendant_ids(&pool, stored).contains(&father_id) => {
                Err(GenealogyError::InvalidRecord(format!(
                    "{} descends from {}",
                    father_id, person.id
                )))
            }
            _ => Ok(()),
        }
    }

    /// Everything removed by deleting `person`: the person and every
    /// descendant, whichever family book records them.
    pub fn plan_member_deletion(&self, family_id: FamilyId, person: PersonId) -> Result<DeletionPlan> {
        let family = self.family(family_id)?;
        let target = family.member(person).ok_or(GenealogyError::PersonNotFound {
            family: family_id,
            person,
        })?;

        let pool = self.pool();
        let mut removed = vec![target.id];
        removed.extend(descendant_ids(&pool, target));
        let names = removed
            .iter()
            .filter_map(|id| pool.find_by_id(*id))
            .map(Person::full_name)
            .collect();

        Ok(DeletionPlan {
            target: DeletionTarget::Member { family: family_id, person },
            removed,
            names,
        })
    }

    /// Carry out a confirmed plan. The plan is recomputed first and must
    /// still match, so a stale confirmation never removes the wrong records.
    pub fn apply_deletion(&mut self, plan: &DeletionPlan) -> Result<usize> {
        let current = match &plan.target {
            DeletionTarget::Family(id) => self.plan_family_deletion(*id)?,
            DeletionTarget::Member { family, person } => self.plan_member_deletion(*family, *person)?,
        };
        if current.removed != plan.removed {
            return Err(GenealogyError::StalePlan(format!(
                "expected {} records, found {}",
                plan.removed.len(),
                current.removed.len()
            )));
        }

        let removed_names: Vec<(PersonId, String)> = {
            let pool = self.pool();
            plan.removed
                .iter()
                .filter_map(|id| pool.find_by_id(*id).map(|p| (*id, p.full_name())))
                .collect()
        };

        match &plan.target {
            DeletionTarget::Family(id) => {
                self.families.retain(|f| f.id != *id);
                info!("Deleted family {} with {} members", id, plan.removed.len());
            }
            DeletionTarget::Member { family, person } => {
                for book in self.families.iter_mut() {
                    book.members.retain(|m| !plan.removed.contains(&m.id));
                }
                info!(
                    "Deleted member {} and {} descendants from family {}",
                    person,
                    plan.removed.len() - 1,
                    family
                );
            }
        }

        self.unlink_removed(&removed_names);
        self.reindex();
        Ok(plan.removed.len())
    }

    /// Marriages to removed records are kept as plain names.
    fn unlink_removed(&mut self, removed: &[(PersonId, String)]) {
        let unlink = |reference: &mut Reference| {
            if let Reference::Linked(id) = reference {
                if let Some((_, name)) = removed.iter().find(|(r, _)| r == id) {
                    *reference = Reference::Unlinked(name.clone());
                }
            }
        };
        for member in self.families.iter_mut().flat_map(|f| f.members.iter_mut()) {
            for spouse in member.spouses.iter_mut() {
                unlink(spouse);
            }
            if let Some(mother) = member.mother.as_mut() {
                unlink(mother);
            }
            member.children.retain(|c| !removed.iter().any(|(r, _)| r == c));
        }
    }

    /// Rebuild children indexes across all families.
    pub fn reindex(&mut self) {
        rebuild_children(self.families.iter_mut().flat_map(|f| f.members.iter_mut()));
    }

    // ------------------------------------------------------------------
    // Surnames and regions
    // ------------------------------------------------------------------

    pub fn surname(&self, character: &str) -> Option<&SurnameData> {
        self.surnames.iter().find(|s| s.character == character)
    }

    pub fn add_surname(&mut self, data: SurnameData) -> Result<()> {
        if data.character.trim().is_empty() {
            return Err(GenealogyError::InvalidRecord("surname character is required".into()));
        }
        if self.surname(&data.character).is_some() {
            return Err(GenealogyError::DuplicateSurname(data.character));
        }
        info!("Added surname {}", data.character);
        self.surnames.push(data);
        Ok(())
    }

    pub fn update_surname(&mut self, data: SurnameData) -> Result<()> {
        let slot = self
            .surnames
            .iter_mut()
            .find(|s| s.character == data.character)
            .ok_or_else(|| GenealogyError::SurnameNotFound(data.character.clone()))?;
        *slot = data;
        Ok(())
    }

    pub fn add_hall(&mut self, character: &str, hall: Hall) -> Result<()> {
        if hall.name.trim().is_empty() {
            return Err(GenealogyError::InvalidRecord("hall name is required".into()));
        }
        let data = self
            .surnames
            .iter_mut()
            .find(|s| s.character == character)
            .ok_or_else(|| GenealogyError::SurnameNotFound(character.to_string()))?;
        data.halls.push(hall);
        Ok(())
    }

    pub fn add_region(&mut self, name: &str, province: &str) -> Result<RegionId> {
        if name.trim().is_empty() || province.trim().is_empty() {
            return Err(GenealogyError::InvalidRecord("region name and province are required".into()));
        }
        let id = RegionId(self.next_region_id);
        self.next_region_id += 1;
        self.regions.push(Region {
            id,
            name: name.trim().to_string(),
            historical_name: None,
            province: province.trim().to_string(),
            description: None,
        });
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry_with_family() -> (Registry, FamilyId, PersonId) {
        let mut registry = Registry::new();
        let family = registry
            .create_family(NewFamily {
                surname: "李".into(),
                hall_name: "陇西堂".into(),
                origin: "陇西".into(),
                ancestor: "崇文".into(),
            })
            .unwrap();
        let root = registry.family(family).unwrap().members[0].id;
        (registry, family, root)
    }

    fn child_of(registry: &mut Registry, family: FamilyId, father: PersonId, given: &str) -> PersonId {
        let id = registry.allocate_person_id();
        let person = Person::new(id, "李", given, Gender::Male, 0).with_father(father);
        registry.save_member(family, person).unwrap()
    }

    fn assert_children_consistent(registry: &Registry) {
        let pool = registry.pool();
        for person in pool.iter() {
            for child in &person.children {
                let record = pool.find_by_id(*child).expect("child resolves");
                assert_eq!(record.father_id, Some(person.id));
            }
        }
    }

    #[test]
    fn test_create_family_adds_founder() {
        let (registry, family, root) = registry_with_family();
        let book = registry.family(family).unwrap();
        assert_eq!(book.members.len(), 1);
        assert_eq!(book.members[0].id, root);
        assert_eq!(book.members[0].generation, 1);
        assert_eq!(book.info.motto, DEFAULT_MOTTO);
    }

    #[test]
    fn test_create_family_requires_fields() {
        let mut registry = Registry::new();
        let result = registry.create_family(NewFamily {
            surname: "李".into(),
            hall_name: " ".into(),
            origin: String::new(),
            ancestor: "崇文".into(),
        });
        assert!(matches!(result, Err(GenealogyError::InvalidRecord(_))));
    }

    #[test]
    fn test_save_member_links_father_and_generation() {
        let (mut registry, family, root) = registry_with_family();
        let child = child_of(&mut registry, family, root, "正道");

        let book = registry.family(family).unwrap();
        assert_eq!(book.member(root).unwrap().children, vec![child]);
        assert_eq!(book.member(child).unwrap().generation, 2);
        assert_children_consistent(&registry);
    }

    #[test]
    fn test_generation_name_from_poem() {
        let (mut registry, family, root) = registry_with_family();
        let mut info = registry.family(family).unwrap().info.clone();
        info.generation_poem = "国正天心顺".into();
        registry.update_clan_info(family, info).unwrap();

        let child = child_of(&mut registry, family, root, "道");
        let book = registry.family(family).unwrap();
        assert_eq!(book.member(child).unwrap().generation_name, "正");
    }

    #[test]
    fn test_edit_moves_child_between_fathers() {
        let (mut registry, family, root) = registry_with_family();
        let a = child_of(&mut registry, family, root, "甲");
        let b = child_of(&mut registry, family, root, "乙");
        let c = child_of(&mut registry, family, a, "丙");

        let mut moved = registry.family(family).unwrap().member(c).unwrap().clone();
        moved.father_id = Some(b);
        registry.save_member(family, moved).unwrap();

        let book = registry.family(family).unwrap();
        assert!(book.member(a).unwrap().children.is_empty());
        assert_eq!(book.member(b).unwrap().children, vec![c]);
        assert_children_consistent(&registry);
    }

    #[test]
    fn test_reject_descendant_as_father() {
        let (mut registry, family, root) = registry_with_family();
        let a = child_of(&mut registry, family, root, "甲");
        let mut founder = registry.family(family).unwrap().member(root).unwrap().clone();
        founder.father_id = Some(a);
        assert!(registry.save_member(family, founder).is_err());
    }

    #[test]
    fn test_father_must_be_in_same_family() {
        let (mut registry, family, root) = registry_with_family();
        let other = registry
            .create_family(NewFamily {
                surname: "王".into(),
                hall_name: "太原堂".into(),
                origin: "太原".into(),
                ancestor: "翦".into(),
            })
            .unwrap();

        let id = registry.allocate_person_id();
        let outsider = Person::new(id, "李", "外支", Gender::Male, 2).with_father(root);
        assert!(matches!(
            registry.save_member(other, outsider),
            Err(GenealogyError::InvalidRecord(_))
        ));

        let unknown = Person::new(id, "李", "外支", Gender::Male, 3).with_father(PersonId(999));
        assert!(registry.save_member(family, unknown).is_err());
        assert!(registry.locate(id).is_none());
        assert!(registry.family(family).unwrap().member(root).unwrap().children.is_empty());
    }

    #[test]
    fn test_out_of_range_values_are_rejected() {
        let (mut registry, family, root) = registry_with_family();
        let mut founder = registry.family(family).unwrap().member(root).unwrap().clone();
        founder.generation = i32::MAX;
        registry.save_member(family, founder).unwrap();

        let id = registry.allocate_person_id();
        let child = Person::new(id, "李", "末", Gender::Male, 0).with_father(root);
        assert!(registry.save_member(family, child).is_err());

        let last = Person::new(PersonId(u64::MAX), "李", "末", Gender::Male, 1);
        assert!(registry.save_member(family, last).is_err());
        assert_eq!(registry.family(family).unwrap().members.len(), 1);
    }

    #[test]
    fn test_delete_cascade_crosses_family_books() {
        let (mut registry, family, root) = registry_with_family();
        let a = child_of(&mut registry, family, root, "甲");
        let other = registry
            .create_family(NewFamily {
                surname: "李".into(),
                hall_name: "赵郡堂".into(),
                origin: "赵郡".into(),
                ancestor: "楷".into(),
            })
            .unwrap();

        // books merged from a snapshot can link a child to a father elsewhere
        let id = registry.allocate_person_id();
        let mut outsider = Person::new(id, "李", "外支", Gender::Male, 3);
        outsider.father_id = Some(a);
        registry.family_mut(other).unwrap().members.push(outsider);
        registry.reindex();

        let plan = registry.plan_member_deletion(family, root).unwrap();
        assert_eq!(plan.removed, vec![root, a, id]);
        let descendants = descendant_ids(&registry.pool(), registry.locate(root).unwrap().1);
        assert_eq!(plan.removed.len(), descendants.len() + 1);

        registry.apply_deletion(&plan).unwrap();
        assert!(registry.locate(id).is_none());
        assert_eq!(registry.family(other).unwrap().members.len(), 1);
        assert_children_consistent(&registry);
    }

    #[test]
    fn test_delete_cascades_to_descendants() {
        let (mut registry, family, root) = registry_with_family();
        let a = child_of(&mut registry, family, root, "甲");
        let b = child_of(&mut registry, family, root, "乙");
        let c = child_of(&mut registry, family, a, "丙");
        let d = child_of(&mut registry, family, c, "丁");

        let plan = registry.plan_member_deletion(family, a).unwrap();
        assert_eq!(plan.removed, vec![a, c, d]);
        assert_eq!(registry.apply_deletion(&plan).unwrap(), 3);

        let book = registry.family(family).unwrap();
        assert_eq!(book.members.len(), 2);
        assert_eq!(book.member(root).unwrap().children, vec![b]);
        assert_children_consistent(&registry);
    }

    #[test]
    fn test_delete_leaf_and_fatherless() {
        let (mut registry, family, root) = registry_with_family();
        let a = child_of(&mut registry, family, root, "甲");

        let plan = registry.plan_member_deletion(family, a).unwrap();
        registry.apply_deletion(&plan).unwrap();
        assert!(registry.family(family).unwrap().member(root).unwrap().children.is_empty());

        let plan = registry.plan_member_deletion(family, root).unwrap();
        registry.apply_deletion(&plan).unwrap();
        assert!(registry.family(family).unwrap().members.is_empty());
    }

    #[test]
    fn test_stale_plan_is_rejected() {
        let (mut registry, family, root) = registry_with_family();
        let plan = registry.plan_member_deletion(family, root).unwrap();
        child_of(&mut registry, family, root, "甲");
        assert!(matches!(
            registry.apply_deletion(&plan),
            Err(GenealogyError::StalePlan(_))
        ));
        assert_eq!(registry.family(family).unwrap().members.len(), 2);
    }

    #[test]
    fn test_deleted_spouse_kept_as_name() {
        let (mut registry, family, root) = registry_with_family();
        let wife_id = registry.allocate_person_id();
        let wife = Person::new(wife_id, "王", "淑", Gender::Female, 1);
        registry.save_member(family, wife).unwrap();

        let mut founder = registry.family(family).unwrap().member(root).unwrap().clone();
        founder.spouses.push(Reference::Linked(wife_id));
        registry.save_member(family, founder).unwrap();

        let plan = registry.plan_member_deletion(family, wife_id).unwrap();
        registry.apply_deletion(&plan).unwrap();

        let founder = registry.family(family).unwrap().member(root).unwrap();
        assert_eq!(founder.spouses, vec![Reference::unlinked("王淑")]);
    }

    #[test]
    fn test_delete_family() {
        let (mut registry, family, _) = registry_with_family();
        let plan = registry.plan_family_deletion(family).unwrap();
        registry.apply_deletion(&plan).unwrap();
        assert!(registry.family(family).is_err());
        assert_eq!(registry.member_count(), 0);
    }

    #[test]
    fn test_events_sorted_by_year() {
        let (mut registry, family, _) = registry_with_family();
        for (year, title) in [(1937, "抗战"), (1850, "始祖诞生"), (1880, "迁徙")] {
            registry
                .add_event(
                    family,
                    ChronicleEvent {
                        year,
                        title: title.into(),
                        description: String::new(),
                        category: EventCategory::Migration,
                    },
                )
                .unwrap();
        }
        let years: Vec<_> = registry.family(family).unwrap().events.iter().map(|e| e.year).collect();
        assert_eq!(years, vec![1850, 1880, 1937]);
    }

    #[test]
    fn test_surname_and_hall_management() {
        let mut registry = Registry::new();
        let data = SurnameData {
            character: "向".into(),
            pinyin: "Xiàng".into(),
            origin: "子姓".into(),
            totem_description: None,
            halls: Vec::new(),
            famous_ancestors: Vec::new(),
            distribution: String::new(),
            population_rank: Some(99),
        };
        registry.add_surname(data.clone()).unwrap();
        assert!(matches!(
            registry.add_surname(data),
            Err(GenealogyError::DuplicateSurname(_))
        ));
        registry
            .add_hall(
                "向",
                Hall {
                    name: "河南堂".into(),
                    description: "新增堂号".into(),
                    region: None,
                },
            )
            .unwrap();
        assert_eq!(registry.surname("向").unwrap().halls.len(), 1);
        assert!(registry.add_hall("无", Hall { name: "x".into(), description: String::new(), region: None }).is_err());
    }

    #[test]
    fn test_add_region() {
        let mut registry = Registry::new();
        let id = registry.add_region("陇西", "甘肃").unwrap();
        assert_eq!(registry.regions[0].id, id);
        assert!(registry.add_region("", "甘肃").is_err());
    }
}
