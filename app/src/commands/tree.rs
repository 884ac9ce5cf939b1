use genealogy::migration::{migration_map, MigrationMap};
use genealogy::tree::{derive_forest, derive_tree, TreeNode, TreeOptions};
use genealogy::{FamilyId, MemberPool, PersonId};

use crate::state::AppState;

/// Ancestry tree of a family, from every root or from `root_id` only.
pub fn get_family_tree(
    state: &AppState,
    family_id: u64,
    root_id: Option<u64>,
    options: Option<TreeOptions>,
) -> Result<Vec<TreeNode>, String> {
    let options = options.unwrap_or(state.config.tree);
    let registry = state.registry()?;
    let family = registry.family(FamilyId(family_id)).map_err(|e| e.to_string())?;
    let pool = registry.pool();

    match root_id {
        Some(root) => {
            if !family.contains(PersonId(root)) {
                return Err(format!("person {} is not in family {}", root, family_id));
            }
            Ok(derive_tree(&pool, PersonId(root), options).into_iter().collect())
        }
        None => Ok(derive_forest(family, &pool, options)),
    }
}

pub fn get_migration_map(state: &AppState, family_id: u64) -> Result<MigrationMap, String> {
    let registry = state.registry()?;
    let family = registry.family(FamilyId(family_id)).map_err(|e| e.to_string())?;
    Ok(migration_map(&MemberPool::new(&family.members)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::offline_state;

    #[test]
    fn test_example_family_tree() {
        let state = offline_state();
        let forest = get_family_tree(&state, 1, None, None).unwrap();
        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].node_count(), 12);
        assert_eq!(forest[0].max_depth(), 4);

        // 李正道 recorded two wives
        let zhengdao = forest[0].find(PersonId(2)).unwrap();
        assert_eq!(zhengdao.branches.len(), 2);
        assert_eq!(zhengdao.branches[0].spouse.as_deref(), Some("张氏"));
        assert_eq!(zhengdao.branches[0].children.len(), 2);
        assert_eq!(zhengdao.branches[1].spouse.as_deref(), Some("刘氏"));
    }

    #[test]
    fn test_options_limit_tree() {
        let state = offline_state();
        let options = TreeOptions {
            max_depth: 1,
            show_female: false,
        };
        let forest = get_family_tree(&state, 1, Some(2), Some(options)).unwrap();
        assert_eq!(forest[0].node_count(), 3);
        assert!(forest[0].find(PersonId(6)).is_none());
    }

    #[test]
    fn test_root_must_belong_to_family() {
        let state = offline_state();
        assert!(get_family_tree(&state, 2, Some(1), None).is_err());
    }

    #[test]
    fn test_migration_routes_for_example_family() {
        let state = offline_state();
        let map = get_migration_map(&state, 1).unwrap();
        // 顺平 settled abroad and is off the map
        assert_eq!(map.settlements.len(), 11);
        assert!(map.routes.iter().any(|r| r.father_id == PersonId(1) && r.child_id == PersonId(2)));
        assert!(!map.routes.iter().any(|r| r.child_id == PersonId(12)));
    }
}
