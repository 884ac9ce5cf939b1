//! Relationship queries over a flat pool of person records.
//!
//! The pool may span several families so spouses and fathers recorded in a
//! linked family still resolve. Every query answers with `Option` or an
//! empty `Vec` on a miss.

use crate::components::{Family, Gender, Person, PersonId, Reference};

/// Borrowed view over the members of one or more families.
#[derive(Debug, Clone, Default)]
pub struct MemberPool<'a> {
    members: Vec<&'a Person>,
}

/// Children of one father sharing the same recorded mother.
#[derive(Debug, Clone)]
pub struct SpouseGroup<'a> {
    /// `None` for the unassigned bucket.
    pub spouse: Option<&'a Reference>,
    /// Tracked record of the spouse, when the reference resolves.
    pub record: Option<&'a Person>,
    pub children: Vec<&'a Person>,
}

impl SpouseGroup<'_> {
    pub fn is_unassigned(&self) -> bool {
        self.spouse.is_none()
    }
}

impl<'a> MemberPool<'a> {
    pub fn new(members: &'a [Person]) -> Self {
        Self {
            members: members.iter().collect(),
        }
    }

    pub fn from_families(families: &'a [Family]) -> Self {
        Self {
            members: families.iter().flat_map(|f| f.members.iter()).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Person> + '_ {
        self.members.iter().copied()
    }

    pub fn find_by_id(&self, id: PersonId) -> Option<&'a Person> {
        self.members.iter().copied().find(|m| m.id == id)
    }

    pub fn father(&self, person: &Person) -> Option<&'a Person> {
        person.father_id.and_then(|id| self.find_by_id(id))
    }

    pub fn mother(&self, person: &Person) -> Option<&'a Person> {
        person.mother.as_ref().and_then(|r| self.resolve(r))
    }

    /// Records listed in `person.children`, in stored order.
    pub fn children(&self, person: &Person) -> Vec<&'a Person> {
        person
            .children
            .iter()
            .filter_map(|id| self.find_by_id(*id))
            .collect()
    }

    /// Everyone else with the same father. Fatherless persons have none.
    pub fn siblings(&self, person: &Person) -> Vec<&'a Person> {
        let Some(father_id) = person.father_id else {
            return Vec::new();
        };
        self.members
            .iter()
            .copied()
            .filter(|m| m.id != person.id && m.father_id == Some(father_id))
            .collect()
    }

    /// Best-effort match of a free-text spouse entry.
    ///
    /// Tries the record id, then surname + given name, then given name.
    pub fn resolve_spouse_record(&self, name_or_id: &str) -> Option<&'a Person> {
        let key = name_or_id.trim();
        if key.is_empty() {
            return None;
        }
        if let Ok(raw) = key.parse::<u64>() {
            if let Some(found) = self.find_by_id(PersonId(raw)) {
                return Some(found);
            }
        }
        self.find_by_name(key)
    }

    pub fn resolve(&self, reference: &Reference) -> Option<&'a Person> {
        match reference {
            Reference::Linked(id) => self.find_by_id(*id),
            Reference::Unlinked(name) => self.find_by_name(name.trim()),
        }
    }

    /// Name shown for a reference; unresolved links fall back to the id.
    pub fn display_name(&self, reference: &Reference) -> String {
        match reference {
            Reference::Linked(id) => self
                .find_by_id(*id)
                .map(Person::full_name)
                .unwrap_or_else(|| format!("#{}", id)),
            Reference::Unlinked(name) => name.clone(),
        }
    }

    /// Whether a child's recorded mother names the given spouse entry.
    pub fn same_person(&self, a: &Reference, b: &Reference) -> bool {
        match (a, b) {
            (Reference::Linked(x), Reference::Linked(y)) => x == y,
            (Reference::Unlinked(x), Reference::Unlinked(y)) => x.trim() == y.trim(),
            (Reference::Linked(id), Reference::Unlinked(name))
            | (Reference::Unlinked(name), Reference::Linked(id)) => {
                let name = name.trim();
                self.find_by_id(*id)
                    .map(|p| p.full_name() == name || p.given_name == name)
                    .unwrap_or(false)
            }
        }
    }

    /// Split `children` of `father` into one group per listed spouse.
    ///
    /// A child lands with the first spouse its mother matches. Children whose
    /// mother is unrecorded or not among the spouses go to a trailing
    /// unassigned group, present only when non-empty.
    pub fn group_by_spouse(
        &self,
        father: &'a Person,
        children: Vec<&'a Person>,
    ) -> Vec<SpouseGroup<'a>> {
        let mut groups: Vec<SpouseGroup<'a>> = father
            .spouses
            .iter()
            .map(|spouse| SpouseGroup {
                spouse: Some(spouse),
                record: self.resolve(spouse),
                children: Vec::new(),
            })
            .collect();
        let mut unassigned = Vec::new();

        for child in children {
            let slot = child.mother.as_ref().and_then(|mother| {
                father
                    .spouses
                    .iter()
                    .position(|spouse| self.same_person(mother, spouse))
            });
            match slot {
                Some(i) => groups[i].children.push(child),
                None => unassigned.push(child),
            }
        }

        if !unassigned.is_empty() {
            groups.push(SpouseGroup {
                spouse: None,
                record: None,
                children: unassigned,
            });
        }
        groups
    }

    pub fn spouse_groups(&self, father: &'a Person) -> Vec<SpouseGroup<'a>> {
        self.group_by_spouse(father, self.children(father))
    }

    /// Candidate fathers for a member of `generation`: males one generation up.
    pub fn potential_fathers(&self, generation: i32) -> Vec<&'a Person> {
        self.members
            .iter()
            .copied()
            .filter(|m| m.gender == Gender::Male && m.generation.checked_add(1) == Some(generation))
            .collect()
    }

    fn find_by_name(&self, name: &str) -> Option<&'a Person> {
        self.members
            .iter()
            .copied()
            .find(|m| m.full_name() == name)
            .or_else(|| self.members.iter().copied().find(|m| m.given_name == name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn male(id: u64, given: &str, generation: i32) -> Person {
        Person::new(PersonId(id), "李", given, Gender::Male, generation)
    }

    fn sample() -> Vec<Person> {
        let mut a = male(1, "崇文", 1)
            .with_spouse(Reference::unlinked("王氏"))
            .with_spouse(Reference::unlinked("刘氏"));
        a.children = vec![PersonId(2), PersonId(3), PersonId(4)];
        vec![
            a,
            male(2, "正道", 2)
                .with_father(PersonId(1))
                .with_mother(Reference::unlinked("王氏")),
            male(3, "正德", 2)
                .with_father(PersonId(1))
                .with_mother(Reference::unlinked("刘氏")),
            male(4, "正心", 2)
                .with_father(PersonId(1))
                .with_mother(Reference::unlinked("周氏")),
            male(5, "天佑", 3),
        ]
    }

    #[test]
    fn test_siblings_exclude_self() {
        let members = sample();
        let pool = MemberPool::new(&members);
        let ids: Vec<_> = pool.siblings(&members[1]).iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![PersonId(3), PersonId(4)]);
    }

    #[test]
    fn test_fatherless_has_no_siblings() {
        let members = sample();
        let pool = MemberPool::new(&members);
        assert!(pool.siblings(&members[0]).is_empty());
        assert!(pool.siblings(&members[4]).is_empty());
    }

    #[test]
    fn test_children_in_stored_order() {
        let mut members = sample();
        members[0].children = vec![PersonId(4), PersonId(2)];
        let pool = MemberPool::new(&members);
        let ids: Vec<_> = pool.children(&members[0]).iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![PersonId(4), PersonId(2)]);
    }

    #[test]
    fn test_resolve_spouse_priority() {
        let members = sample();
        let pool = MemberPool::new(&members);
        assert_eq!(pool.resolve_spouse_record("3").map(|p| p.id), Some(PersonId(3)));
        assert_eq!(pool.resolve_spouse_record("李正道").map(|p| p.id), Some(PersonId(2)));
        assert_eq!(pool.resolve_spouse_record("天佑").map(|p| p.id), Some(PersonId(5)));
        assert!(pool.resolve_spouse_record("王氏").is_none());
        assert!(pool.resolve_spouse_record("").is_none());
    }

    #[test]
    fn test_children_grouped_by_mother() {
        let members = sample();
        let pool = MemberPool::new(&members);
        let groups = pool.spouse_groups(&members[0]);

        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].children[0].id, PersonId(2));
        assert_eq!(groups[1].children[0].id, PersonId(3));
        assert!(groups[2].is_unassigned());
        assert_eq!(groups[2].children[0].id, PersonId(4));
    }

    #[test]
    fn test_linked_mother_matches_named_spouse() {
        let mut members = sample();
        members.push(Person::new(PersonId(9), "王", "氏", Gender::Female, 1));
        members[1].mother = Some(Reference::Linked(PersonId(9)));
        let pool = MemberPool::new(&members);

        let groups = pool.spouse_groups(&members[0]);
        assert_eq!(groups[0].children.len(), 1);
        assert_eq!(groups[0].record.map(|p| p.id), Some(PersonId(9)));
    }

    #[test]
    fn test_potential_fathers() {
        let members = sample();
        let pool = MemberPool::new(&members);
        let ids: Vec<_> = pool.potential_fathers(3).iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![PersonId(2), PersonId(3), PersonId(4)]);
        assert!(pool.potential_fathers(i32::MIN).is_empty());
    }
}
