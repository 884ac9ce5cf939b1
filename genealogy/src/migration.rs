//! Settlement moves between fathers and children, projected onto a fixed
//! map of China.

use serde::Serialize;

use crate::components::{Coordinates, Person, PersonId};
use crate::graph::MemberPool;

const MIN_LNG: f64 = 73.0;
const MAX_LNG: f64 = 136.0;
const MIN_LAT: f64 = 18.0;
const MAX_LAT: f64 = 54.0;

/// Position on the map in percent of width and height, origin top-left.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MapPoint {
    pub x: f64,
    pub y: f64,
}

impl MapPoint {
    fn on_map(&self) -> bool {
        (0.0..=100.0).contains(&self.x) && (0.0..=100.0).contains(&self.y)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Settlement {
    pub person_id: PersonId,
    pub place: String,
    pub point: MapPoint,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    pub father_id: PersonId,
    pub child_id: PersonId,
    pub from: MapPoint,
    pub to: MapPoint,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MigrationMap {
    pub settlements: Vec<Settlement>,
    pub routes: Vec<Route>,
}

pub fn project(coordinates: Coordinates) -> MapPoint {
    MapPoint {
        x: (coordinates.lng - MIN_LNG) / (MAX_LNG - MIN_LNG) * 100.0,
        y: 100.0 - (coordinates.lat - MIN_LAT) / (MAX_LAT - MIN_LAT) * 100.0,
    }
}

fn placed(person: &Person) -> Option<(&str, MapPoint)> {
    let location = person.location.as_ref()?;
    let point = project(location.coordinates?);
    point.on_map().then_some((location.name.as_str(), point))
}

/// Settlements of every located member and a route from each father to a
/// child who settled somewhere else. Members abroad fall off the map.
pub fn migration_map(pool: &MemberPool<'_>) -> MigrationMap {
    let mut map = MigrationMap::default();

    for member in pool.iter() {
        let Some((place, point)) = placed(member) else {
            continue;
        };
        map.settlements.push(Settlement {
            person_id: member.id,
            place: place.to_string(),
            point,
        });

        let Some(father) = pool.father(member) else {
            continue;
        };
        if let Some((father_place, from)) = placed(father) {
            if father_place != place {
                map.routes.push(Route {
                    father_id: father.id,
                    child_id: member.id,
                    from,
                    to: point,
                });
            }
        }
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Gender, Location};

    fn settled(id: u64, father: Option<u64>, location: Location) -> Person {
        let mut p = Person::new(PersonId(id), "李", "某", Gender::Male, id as i32);
        p.father_id = father.map(PersonId);
        p.location = Some(location);
        p
    }

    #[test]
    fn test_route_only_when_place_changes() {
        let members = vec![
            settled(1, None, Location::new("绍兴", "浙江").at(29.9958, 120.5861)),
            settled(2, Some(1), Location::new("杭州", "浙江").at(30.2741, 120.1551)),
            settled(3, Some(2), Location::new("杭州", "浙江").at(30.2741, 120.1551)),
            settled(4, Some(2), Location::new("美国", "海外")),
        ];
        let pool = MemberPool::new(&members);
        let map = migration_map(&pool);

        assert_eq!(map.settlements.len(), 3);
        assert_eq!(map.routes.len(), 1);
        assert_eq!(map.routes[0].child_id, PersonId(2));
    }

    #[test]
    fn test_projection_corners() {
        let top_left = project(Coordinates { lat: MAX_LAT, lng: MIN_LNG });
        assert!(top_left.x.abs() < 1e-9 && top_left.y.abs() < 1e-9);
        let outside = project(Coordinates { lat: 40.0, lng: -74.0 });
        assert!(!outside.on_map());
    }
}
