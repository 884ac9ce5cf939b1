//! Five Degrees of Mourning (五服) chart and the local relationship estimate.
//!
//! The local estimate only looks at the difference in generation numbers.
//! Classical mourning grades count the distance to the common ancestor
//! through both lines, so `WuFuBoundary` here is an approximation: a pair of
//! fifth cousins in the same generation still reads as "within".

use serde::{Deserialize, Serialize};

use crate::components::Person;
use crate::graph::MemberPool;
use crate::walk::{walk, Direction};

/// Generation distance at which the local estimate leaves the five degrees.
pub const WUFU_LIMIT: u32 = 5;

/// Siblings listed by name on the chart before collapsing into a count.
pub const SIBLING_DISPLAY_CAP: usize = 2;

/// Placeholder for a link the book does not record.
pub const UNKNOWN: &str = "不详";

/// Four father hops above a person. A gap leaves every higher level empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct AncestorChain<'a> {
    pub father: Option<&'a Person>,
    /// 祖父
    pub grandfather: Option<&'a Person>,
    /// 曾祖
    pub great_grandfather: Option<&'a Person>,
    /// 高祖
    pub high_ancestor: Option<&'a Person>,
}

impl<'a> AncestorChain<'a> {
    pub fn levels(&self) -> [Option<&'a Person>; 4] {
        [
            self.father,
            self.grandfather,
            self.great_grandfather,
            self.high_ancestor,
        ]
    }
}

pub fn ancestor_chain<'a>(pool: &MemberPool<'a>, person: &Person) -> AncestorChain<'a> {
    let mut levels = walk(pool, person, Direction::Up, 4)
        .into_iter()
        .map(|step| step.person);
    AncestorChain {
        father: levels.next(),
        grandfather: levels.next(),
        great_grandfather: levels.next(),
        high_ancestor: levels.next(),
    }
}

#[derive(Debug, Clone)]
pub struct WuFuChart<'a> {
    pub focal: &'a Person,
    pub ancestors: AncestorChain<'a>,
    pub siblings: Vec<&'a Person>,
    pub children: Vec<&'a Person>,
}

impl<'a> WuFuChart<'a> {
    /// Siblings to name on the chart and how many more are summarised.
    pub fn shown_siblings(&self) -> (&[&'a Person], usize) {
        let shown = self.siblings.len().min(SIBLING_DISPLAY_CAP);
        (&self.siblings[..shown], self.siblings.len() - shown)
    }
}

pub fn wufu_chart<'a>(pool: &MemberPool<'a>, focal: &'a Person) -> WuFuChart<'a> {
    WuFuChart {
        focal,
        ancestors: ancestor_chain(pool, focal),
        siblings: pool.siblings(focal),
        children: pool.children(focal),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KinTier {
    SameGeneration,
    UncleNephew,
    /// Members of different recorded families.
    Clan,
}

impl KinTier {
    pub fn label(self) -> &'static str {
        match self {
            KinTier::SameGeneration => "同辈宗亲",
            KinTier::UncleNephew => "叔侄宗亲",
            KinTier::Clan => "宗亲",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WuFuBoundary {
    Within,
    Beyond,
}

impl WuFuBoundary {
    pub fn from_distance(distance: u32) -> Self {
        if distance < WUFU_LIMIT {
            WuFuBoundary::Within
        } else {
            WuFuBoundary::Beyond
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            WuFuBoundary::Within => "五服之内",
            WuFuBoundary::Beyond => "五服之外",
        }
    }
}

/// Relationship as shown to the user, whether computed here or returned by
/// the narrative service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipResult {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generation_distance: Option<String>,
    #[serde(default)]
    pub wufu: String,
    #[serde(default)]
    pub explanation: String,
}

impl RelationshipResult {
    /// Inline result for a narrative call that did not come back.
    pub fn failed(explanation: impl Into<String>) -> Self {
        Self {
            title: "分析失败".to_string(),
            generation_distance: None,
            wufu: String::new(),
            explanation: explanation.into(),
        }
    }
}

pub fn generation_distance(a: &Person, b: &Person) -> u32 {
    a.generation.abs_diff(b.generation)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalKinship {
    pub distance: u32,
    pub tier: KinTier,
    pub boundary: WuFuBoundary,
}

pub fn local_kinship(a: &Person, b: &Person) -> LocalKinship {
    let distance = generation_distance(a, b);
    LocalKinship {
        distance,
        tier: if distance == 0 {
            KinTier::SameGeneration
        } else {
            KinTier::UncleNephew
        },
        boundary: WuFuBoundary::from_distance(distance),
    }
}

/// Estimate used when no narrative service is configured.
pub fn fallback_relationship(a: &Person, b: &Person) -> RelationshipResult {
    let kin = local_kinship(a, b);
    RelationshipResult {
        title: kin.tier.label().to_string(),
        generation_distance: Some(format!("相差{}代", kin.distance)),
        wufu: kin.boundary.label().to_string(),
        explanation: format!("基于世系分析: 相差 {} 代", kin.distance),
    }
}

/// Estimate for two members recorded in different family books.
pub fn cross_family_fallback(a: &Person, a_hall: &str, b: &Person, b_hall: &str) -> RelationshipResult {
    RelationshipResult {
        title: KinTier::Clan.label().to_string(),
        generation_distance: None,
        wufu: WuFuBoundary::Beyond.label().to_string(),
        explanation: format!(
            "{}与{}分属不同记载的家族分支（{} vs {}），根据辈分与姓氏起源推断，二者可能同源。",
            a.full_name(),
            b.full_name(),
            a_hall,
            b_hall
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Gender, PersonId};

    fn person(id: u64, generation: i32, father: Option<u64>) -> Person {
        let mut p = Person::new(PersonId(id), "李", format!("{}", id), Gender::Male, generation);
        p.father_id = father.map(PersonId);
        p
    }

    #[test]
    fn test_short_chain_leaves_upper_levels_unknown() {
        let members = vec![
            person(1, 1, None),
            person(2, 2, Some(1)),
            person(3, 3, Some(2)),
        ];
        let pool = MemberPool::new(&members);
        let chain = ancestor_chain(&pool, &members[2]);

        assert_eq!(chain.father.map(|p| p.id), Some(PersonId(2)));
        assert_eq!(chain.grandfather.map(|p| p.id), Some(PersonId(1)));
        assert!(chain.great_grandfather.is_none());
        assert!(chain.high_ancestor.is_none());
    }

    #[test]
    fn test_gap_stops_chain() {
        // father of 3 is recorded but missing from the pool
        let members = vec![person(1, 1, None), person(3, 3, Some(2))];
        let pool = MemberPool::new(&members);
        let chain = ancestor_chain(&pool, &members[1]);
        assert!(chain.levels().iter().all(Option::is_none));
    }

    #[test]
    fn test_full_chain_stops_at_high_ancestor() {
        let members: Vec<Person> = (1..=6)
            .map(|i| person(i, i as i32, if i > 1 { Some(i - 1) } else { None }))
            .collect();
        let pool = MemberPool::new(&members);
        let chain = ancestor_chain(&pool, &members[5]);
        assert_eq!(chain.high_ancestor.map(|p| p.id), Some(PersonId(2)));
    }

    #[test]
    fn test_sibling_display_cap() {
        let members = vec![
            person(1, 1, None),
            person(2, 2, Some(1)),
            person(3, 2, Some(1)),
            person(4, 2, Some(1)),
            person(5, 2, Some(1)),
        ];
        let pool = MemberPool::new(&members);
        let chart = wufu_chart(&pool, &members[1]);
        let (shown, rest) = chart.shown_siblings();
        assert_eq!(shown.len(), 2);
        assert_eq!(rest, 1);
    }

    #[test]
    fn test_boundary_is_exclusive_at_five() {
        let a = person(1, 1, None);
        let b = person(2, 6, None);
        let kin = local_kinship(&a, &b);
        assert_eq!(kin.distance, 5);
        assert_eq!(kin.boundary, WuFuBoundary::Beyond);
        assert_eq!(kin.tier, KinTier::UncleNephew);

        let c = person(3, 5, None);
        assert_eq!(local_kinship(&a, &c).boundary, WuFuBoundary::Within);
    }

    #[test]
    fn test_distance_across_full_range() {
        let low = person(1, i32::MIN, None);
        let high = person(2, i32::MAX, None);
        assert_eq!(generation_distance(&low, &high), u32::MAX);
        assert_eq!(local_kinship(&high, &low).boundary, WuFuBoundary::Beyond);
    }

    #[test]
    fn test_fallback_is_symmetric() {
        for (ga, gb) in [(1, 1), (2, 7), (9, 3), (4, 5)] {
            let a = person(1, ga, None);
            let b = person(2, gb, None);
            assert_eq!(local_kinship(&a, &b), local_kinship(&b, &a));
            assert_eq!(fallback_relationship(&a, &b), fallback_relationship(&b, &a));
        }
    }

    #[test]
    fn test_same_generation_label() {
        let a = person(1, 3, None);
        let b = person(2, 3, None);
        let result = fallback_relationship(&a, &b);
        assert_eq!(result.title, "同辈宗亲");
        assert_eq!(result.wufu, "五服之内");
    }
}
