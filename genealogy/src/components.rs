//! Record types for lineage books
//!
//! Persons, families, surname encyclopedia entries and regions. Everything
//! here is plain data; relationship queries live in `graph`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

// ============================================================================
// Identity
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PersonId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FamilyId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RegionId(pub u64);

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for FamilyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Person
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

/// A spouse or mother as recorded on a person.
///
/// Marriages into families outside the system are kept as free text, so a
/// reference is either a tracked record or just a name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum Reference {
    Linked(PersonId),
    Unlinked(String),
}

impl Reference {
    pub fn unlinked(name: impl Into<String>) -> Self {
        Reference::Unlinked(name.into())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Location {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub historical_name: Option<String>,
    pub province: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
}

impl Location {
    pub fn new(name: impl Into<String>, province: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            province: province.into(),
            ..Default::default()
        }
    }

    pub fn at(mut self, lat: f64, lng: f64) -> Self {
        self.coordinates = Some(Coordinates { lat, lng });
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    pub surname: String,
    pub given_name: String,
    /// 字
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub courtesy_name: Option<String>,
    /// 号
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub art_name: Option<String>,
    pub gender: Gender,
    pub birth_year: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub death_year: Option<i32>,
    /// 世
    pub generation: i32,
    /// 字辈
    #[serde(default)]
    pub generation_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub father_id: Option<PersonId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mother: Option<Reference>,
    #[serde(default)]
    pub spouses: Vec<Reference>,
    /// Index of children, rebuilt from `father_id` by the registry.
    #[serde(default)]
    pub children: Vec<PersonId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub portrait: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub biography: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

impl Person {
    pub fn new(
        id: PersonId,
        surname: impl Into<String>,
        given_name: impl Into<String>,
        gender: Gender,
        generation: i32,
    ) -> Self {
        Self {
            id,
            surname: surname.into(),
            given_name: given_name.into(),
            courtesy_name: None,
            art_name: None,
            gender,
            birth_year: 0,
            death_year: None,
            generation,
            generation_name: String::new(),
            father_id: None,
            mother: None,
            spouses: Vec::new(),
            children: Vec::new(),
            portrait: None,
            biography: None,
            location: None,
        }
    }

    /// Surname followed by given name, the way names are written in the book.
    pub fn full_name(&self) -> String {
        format!("{}{}", self.surname, self.given_name)
    }

    pub fn is_female(&self) -> bool {
        self.gender == Gender::Female
    }

    pub fn with_father(mut self, father: PersonId) -> Self {
        self.father_id = Some(father);
        self
    }

    pub fn with_mother(mut self, mother: Reference) -> Self {
        self.mother = Some(mother);
        self
    }

    pub fn with_spouse(mut self, spouse: Reference) -> Self {
        self.spouses.push(spouse);
        self
    }

    pub fn with_years(mut self, birth: i32, death: Option<i32>) -> Self {
        self.birth_year = birth;
        self.death_year = death;
        self
    }
}

// ============================================================================
// Family
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClanInfo {
    pub surname: String,
    /// 堂号
    pub hall_name: String,
    pub origin: String,
    pub ancestor: String,
    /// 族训
    pub motto: String,
    /// 字辈诗
    pub generation_poem: String,
}

impl ClanInfo {
    /// Generation-name character for `generation`, read from the naming poem.
    ///
    /// Punctuation is skipped; generation 1 takes the first character.
    pub fn generation_name_for(&self, generation: i32) -> Option<char> {
        if generation < 1 {
            return None;
        }
        self.generation_poem
            .chars()
            .filter(|c| c.is_alphanumeric())
            .nth((generation - 1) as usize)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventCategory {
    Birth,
    Death,
    Marriage,
    Migration,
    Achievement,
    Disaster,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChronicleEvent {
    pub year: i32,
    pub title: String,
    pub description: String,
    pub category: EventCategory,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Family {
    pub id: FamilyId,
    pub info: ClanInfo,
    pub members: Vec<Person>,
    #[serde(default)]
    pub events: Vec<ChronicleEvent>,
    pub created_at: DateTime<Utc>,
}

impl Family {
    pub fn member(&self, id: PersonId) -> Option<&Person> {
        self.members.iter().find(|m| m.id == id)
    }

    pub fn member_mut(&mut self, id: PersonId) -> Option<&mut Person> {
        self.members.iter_mut().find(|m| m.id == id)
    }

    pub fn contains(&self, id: PersonId) -> bool {
        self.members.iter().any(|m| m.id == id)
    }

    /// Rebuild every `children` list from the members' `father_id`.
    pub fn reindex_children(&mut self) {
        rebuild_children(self.members.iter_mut());
    }
}

/// Recompute `children` of every person from the `father_id` links among them.
///
/// Existing order is kept for children that still point at the father;
/// newly attached children are appended in member order.
pub fn rebuild_children<'a, I>(members: I)
where
    I: IntoIterator<Item = &'a mut Person>,
{
    let mut members: Vec<&'a mut Person> = members.into_iter().collect();

    let mut owned: HashMap<PersonId, Vec<PersonId>> = HashMap::new();
    for member in &members {
        if let Some(father) = member.father_id {
            owned.entry(father).or_default().push(member.id);
        }
    }

    for member in members.iter_mut() {
        let links = owned.remove(&member.id).unwrap_or_default();
        member.children.retain(|c| links.contains(c));
        for child in links {
            if !member.children.contains(&child) {
                member.children.push(child);
            }
        }
    }
}

// ============================================================================
// Reference data
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hall {
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurnameData {
    pub character: String,
    pub pinyin: String,
    pub origin: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub totem_description: Option<String>,
    #[serde(default)]
    pub halls: Vec<Hall>,
    #[serde(default)]
    pub famous_ancestors: Vec<String>,
    #[serde(default)]
    pub distribution: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub population_rank: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub id: RegionId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub historical_name: Option<String>,
    pub province: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
