//! Depth-bounded walk along father links (up) or child links (down).

use std::collections::HashSet;

use crate::components::{Person, PersonId};
use crate::graph::MemberPool;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Follow `father_id`.
    Up,
    /// Follow `children`.
    Down,
}

impl Direction {
    pub fn neighbours<'a>(self, pool: &MemberPool<'a>, person: &Person) -> Vec<&'a Person> {
        match self {
            Direction::Up => pool.father(person).into_iter().collect(),
            Direction::Down => pool.children(person),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Step<'a> {
    /// Hops from the start; direct neighbours are at depth 1.
    pub depth: usize,
    pub person: &'a Person,
}

/// Whether a node `depth` hops from its start is still inside the bound.
pub fn within(depth: usize, max_depth: usize) -> bool {
    depth <= max_depth
}

/// Pre-order walk from `start`, excluding `start` itself.
///
/// Each record is visited at most once, so a malformed graph with a cycle
/// terminates.
pub fn walk<'a>(
    pool: &MemberPool<'a>,
    start: &Person,
    direction: Direction,
    max_depth: usize,
) -> Vec<Step<'a>> {
    let mut seen: HashSet<PersonId> = HashSet::new();
    seen.insert(start.id);

    let mut out = Vec::new();
    let mut stack: Vec<Step<'a>> = direction
        .neighbours(pool, start)
        .into_iter()
        .rev()
        .map(|person| Step { depth: 1, person })
        .collect();

    while let Some(step) = stack.pop() {
        if !within(step.depth, max_depth) || !seen.insert(step.person.id) {
            continue;
        }
        out.push(step);
        for next in direction.neighbours(pool, step.person).into_iter().rev() {
            stack.push(Step {
                depth: step.depth + 1,
                person: next,
            });
        }
    }
    out
}

/// Ids of every descendant of `start`, at any depth.
pub fn descendant_ids(pool: &MemberPool<'_>, start: &Person) -> Vec<PersonId> {
    walk(pool, start, Direction::Down, usize::MAX)
        .into_iter()
        .map(|s| s.person.id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Gender;

    fn chain(len: u64) -> Vec<Person> {
        (1..=len)
            .map(|i| {
                let mut p = Person::new(PersonId(i), "李", format!("{}", i), Gender::Male, i as i32);
                if i > 1 {
                    p.father_id = Some(PersonId(i - 1));
                }
                if i < len {
                    p.children = vec![PersonId(i + 1)];
                }
                p
            })
            .collect()
    }

    #[test]
    fn test_walk_up_is_bounded() {
        let members = chain(7);
        let pool = MemberPool::new(&members);
        let steps = walk(&pool, &members[6], Direction::Up, 4);
        let ids: Vec<_> = steps.iter().map(|s| s.person.id.0).collect();
        assert_eq!(ids, vec![6, 5, 4, 3]);
        assert_eq!(steps.last().map(|s| s.depth), Some(4));
    }

    #[test]
    fn test_walk_down_preorder() {
        let mut members = chain(3);
        let mut extra = Person::new(PersonId(4), "李", "四", Gender::Female, 2);
        extra.father_id = Some(PersonId(1));
        members.push(extra);
        members[0].children.push(PersonId(4));

        let pool = MemberPool::new(&members);
        let ids: Vec<_> = walk(&pool, &members[0], Direction::Down, 10)
            .iter()
            .map(|s| s.person.id.0)
            .collect();
        assert_eq!(ids, vec![2, 3, 4]);
    }

    #[test]
    fn test_walk_survives_cycle() {
        let mut members = chain(3);
        members[2].children = vec![PersonId(1)];
        let pool = MemberPool::new(&members);
        assert_eq!(descendant_ids(&pool, &members[0]), vec![PersonId(2), PersonId(3)]);
    }
}
