//! Category tree construction and flattening.
//!
//! Shopify collections are flat; the hierarchy only exists through the
//! [`ParentRef`] carried by each [`Category`]. [`build_tree`] indexes the flat
//! list by parent once and assembles the subtree below the requested parent,
//! so construction is linear in the list size. Sibling order follows the
//! input order.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::types::{Category, ParentRef};

/// One category with its nested children.
///
/// `children` is omitted from the serialized form when empty; its absence
/// marks a leaf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryNode {
    /// Decoded numeric id.
    pub id: String,
    /// Locale-resolved label.
    pub label: String,
    /// Parent this node was attached under (kept for [`flatten`]).
    #[serde(skip)]
    pub parent: ParentRef,
    /// Nested categories.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<CategoryNode>,
}

type ChildIndex<'a> = HashMap<&'a ParentRef, Vec<&'a Category>>;

/// Build the tree of categories below `parent`.
///
/// Entries whose parent chain never reaches `parent` are not part of the
/// result. Every category is emitted at most once: a category whose id is
/// `parent` itself (reached through a cycle) is a leaf, and repeated ids are
/// skipped.
#[must_use]
pub fn build_tree(flat: &[Category], parent: &ParentRef) -> Vec<CategoryNode> {
    let mut index: ChildIndex<'_> = HashMap::new();
    for category in flat {
        index.entry(&category.parent).or_default().push(category);
    }

    let mut seen = HashSet::new();
    assemble(&index, parent, parent, &mut seen)
}

fn assemble<'a>(
    index: &ChildIndex<'a>,
    start: &ParentRef,
    parent: &ParentRef,
    seen: &mut HashSet<&'a str>,
) -> Vec<CategoryNode> {
    let Some(children) = index.get(parent) else {
        return Vec::new();
    };

    let mut nodes = Vec::with_capacity(children.len());
    for &category in children {
        if !seen.insert(category.id.as_str()) {
            continue;
        }
        let own = ParentRef::Id(category.id.clone());
        let nested = if &own == start {
            Vec::new()
        } else {
            assemble(index, start, &own, seen)
        };

        nodes.push(CategoryNode {
            id: category.id.clone(),
            label: category.label.clone(),
            parent: parent.clone(),
            children: nested,
        });
    }
    nodes
}

/// Flatten a tree back into categories, in pre-order.
///
/// Each node is followed by its own subtree before its next sibling.
#[must_use]
pub fn flatten(tree: &[CategoryNode]) -> Vec<Category> {
    let mut flat = Vec::new();
    flatten_into(tree, &mut flat);
    flat
}

fn flatten_into(tree: &[CategoryNode], flat: &mut Vec<Category>) {
    for node in tree {
        flat.push(Category {
            id: node.id.clone(),
            label: node.label.clone(),
            parent: node.parent.clone(),
        });
        flatten_into(&node.children, flat);
    }
}

/// Count every node of the tree, nested children included.
#[must_use]
pub fn count_categories(tree: &[CategoryNode]) -> usize {
    tree.iter()
        .map(|node| 1 + count_categories(&node.children))
        .sum()
}

/// Ids of `flat` that a tree built from `parent` cannot reach.
#[must_use]
pub fn unreachable<'a>(flat: &'a [Category], parent: &ParentRef) -> Vec<&'a str> {
    let reachable: HashSet<String> = flatten(&build_tree(flat, parent))
        .into_iter()
        .map(|category| category.id)
        .collect();

    flat.iter()
        .map(|category| category.id.as_str())
        .filter(|id| !reachable.contains(*id))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn category(id: &str, parent: Option<&str>) -> Category {
        Category {
            id: id.to_string(),
            label: format!("Category {id}"),
            parent: ParentRef::from_optional(parent),
        }
    }

    fn ids(categories: &[Category]) -> Vec<&str> {
        categories.iter().map(|c| c.id.as_str()).collect()
    }

    fn nested_fixture() -> Vec<Category> {
        vec![
            category("1", None),
            category("2", Some("1")),
            category("3", None),
            category("4", Some("2")),
            category("5", Some("1")),
            category("6", Some("99")),
        ]
    }

    #[test]
    fn test_flat_list_is_all_roots() {
        let flat = vec![category("10", None), category("11", None)];
        let tree = build_tree(&flat, &ParentRef::Root);
        assert_eq!(tree.len(), 2);
        assert!(tree.iter().all(|node| node.children.is_empty()));
    }

    #[test]
    fn test_flatten_is_pre_order() {
        let tree = build_tree(&nested_fixture(), &ParentRef::Root);
        let flat = flatten(&tree);
        assert_eq!(ids(&flat), vec!["1", "2", "4", "5", "3"]);
    }

    #[test]
    fn test_flatten_restores_parent_references() {
        let source = nested_fixture();
        let flat = flatten(&build_tree(&source, &ParentRef::Root));
        for category in &flat {
            let original = source.iter().find(|c| c.id == category.id).unwrap();
            assert_eq!(original, category);
        }
    }

    #[test]
    fn test_subtree_from_inner_parent() {
        let tree = build_tree(&nested_fixture(), &ParentRef::Id("1".to_string()));
        assert_eq!(ids(&flatten(&tree)), vec!["2", "4", "5"]);
    }

    #[test]
    fn test_dangling_parent_is_unreachable() {
        let flat = nested_fixture();
        let tree = build_tree(&flat, &ParentRef::Root);
        assert!(!flatten(&tree).iter().any(|c| c.id == "6"));
        assert_eq!(unreachable(&flat, &ParentRef::Root), vec!["6"]);
    }

    #[test]
    fn test_count_includes_nested_children() {
        let flat = nested_fixture();
        let tree = build_tree(&flat, &ParentRef::Root);
        assert_eq!(count_categories(&tree), 5);
        assert!(count_categories(&tree) <= flat.len());
    }

    #[test]
    fn test_count_equals_len_when_every_chain_reaches_root() {
        let flat = vec![
            category("1", None),
            category("2", Some("1")),
            category("3", Some("2")),
        ];
        let tree = build_tree(&flat, &ParentRef::Root);
        assert_eq!(count_categories(&tree), flat.len());
        assert!(unreachable(&flat, &ParentRef::Root).is_empty());
    }

    #[test]
    fn test_unknown_parent_yields_empty_tree() {
        let tree = build_tree(&nested_fixture(), &ParentRef::Id("404".to_string()));
        assert!(tree.is_empty());
        assert_eq!(count_categories(&tree), 0);
    }

    #[test]
    fn test_self_parented_entry_emitted_once() {
        let flat = vec![category("7", Some("7"))];
        let tree = build_tree(&flat, &ParentRef::Id("7".to_string()));
        assert_eq!(ids(&flatten(&tree)), vec!["7"]);
    }

    #[test]
    fn test_cycle_terminates() {
        let flat = vec![category("a", Some("b")), category("b", Some("a"))];
        let tree = build_tree(&flat, &ParentRef::Id("a".to_string()));
        assert_eq!(ids(&flatten(&tree)), vec!["b", "a"]);
        assert!(build_tree(&flat, &ParentRef::Root).is_empty());
    }

    #[test]
    fn test_children_omitted_when_leaf() {
        let flat = vec![category("1", None), category("2", Some("1"))];
        let tree = build_tree(&flat, &ParentRef::Root);
        assert_eq!(
            serde_json::to_value(&tree).unwrap(),
            serde_json::json!([{
                "id": "1",
                "label": "Category 1",
                "children": [{"id": "2", "label": "Category 2"}]
            }])
        );
    }

    #[test]
    fn test_cycle_through_start_emits_each_once() {
        let flat = vec![
            category("b", Some("a")),
            category("c", Some("a")),
            category("a", Some("b")),
        ];
        let tree = build_tree(&flat, &ParentRef::Id("a".to_string()));
        assert_eq!(ids(&flatten(&tree)), vec!["b", "a", "c"]);
    }

    // =========================================================================
    // Properties over generated lists
    // =========================================================================

    /// Ids whose parent chain reaches `parent`, walked link by link.
    fn reachable_ids(flat: &[Category], parent: &ParentRef) -> HashSet<String> {
        let by_id: HashMap<&str, &Category> =
            flat.iter().map(|c| (c.id.as_str(), c)).collect();

        flat.iter()
            .filter(|category| {
                let mut current = &category.parent;
                for _ in 0..=flat.len() {
                    if current == parent {
                        return true;
                    }
                    let ParentRef::Id(id) = current else {
                        return false;
                    };
                    let Some(next) = by_id.get(id.as_str()) else {
                        return false;
                    };
                    current = &next.parent;
                }
                false
            })
            .map(|category| category.id.clone())
            .collect()
    }

    /// Whether every entry hangs off `parent` or off an open ancestor.
    fn is_pre_order(flat: &[Category], parent: &ParentRef) -> bool {
        let mut ancestors: Vec<&str> = Vec::new();
        for category in flat {
            if &category.parent == parent {
                ancestors.clear();
            } else {
                let ParentRef::Id(own_parent) = &category.parent else {
                    return false;
                };
                while ancestors.last().is_some_and(|id| *id != own_parent.as_str()) {
                    ancestors.pop();
                }
                if ancestors.is_empty() {
                    return false;
                }
            }
            ancestors.push(&category.id);
        }
        true
    }

    /// Unique ids `0..n`; parents are root, a sibling, the entry itself or a
    /// dangling id past the end.
    fn categories_strategy() -> impl Strategy<Value = Vec<Category>> {
        prop::collection::vec(prop::option::of(0usize..16), 0..12).prop_map(|parents| {
            parents
                .into_iter()
                .enumerate()
                .map(|(i, parent)| Category {
                    id: i.to_string(),
                    label: format!("Category {i}"),
                    parent: parent.map_or(ParentRef::Root, |p| ParentRef::Id(p.to_string())),
                })
                .collect()
        })
    }

    fn parent_strategy() -> impl Strategy<Value = ParentRef> {
        prop::option::of(0usize..16)
            .prop_map(|p| p.map_or(ParentRef::Root, |p| ParentRef::Id(p.to_string())))
    }

    proptest! {
        #[test]
        fn test_flatten_is_reachable_set_in_pre_order(
            flat in categories_strategy(),
            parent in parent_strategy(),
        ) {
            let flattened = flatten(&build_tree(&flat, &parent));

            let emitted: Vec<String> = flattened.iter().map(|c| c.id.clone()).collect();
            let unique: HashSet<String> = emitted.iter().cloned().collect();
            prop_assert_eq!(unique.len(), emitted.len(), "duplicate ids in {:?}", emitted);
            prop_assert_eq!(unique, reachable_ids(&flat, &parent));

            for category in &flattened {
                prop_assert!(flat.contains(category), "{:?} not in input", category);
            }
            prop_assert!(is_pre_order(&flattened, &parent), "not pre-order: {:?}", emitted);
        }

        #[test]
        fn test_count_bounded_by_input_from_root(flat in categories_strategy()) {
            let tree = build_tree(&flat, &ParentRef::Root);
            let counted = count_categories(&tree);

            prop_assert!(counted <= flat.len());
            let all_reach_root = reachable_ids(&flat, &ParentRef::Root).len() == flat.len();
            prop_assert_eq!(counted == flat.len(), all_reach_root);
            prop_assert_eq!(unreachable(&flat, &ParentRef::Root).is_empty(), all_reach_root);
        }
    }
}
