//! Searches over nested JSON mappings
//!
//! The rate-limit status response nests its `{limit, remaining, reset}`
//! records a few levels deep. These helpers pull those records out by
//! looking for a marker field such as `"remaining"`. A mapping holding the
//! marker is a leaf: the search never descends into it.

use serde_json::{Map, Value};
use std::collections::{BTreeMap, VecDeque};

/// Flat view of matched records, keyed by branch or record name
pub type Flattened = BTreeMap<String, Map<String, Value>>;

/// Map every top-level key to the shallowest mapping below it that holds `field`
///
/// The immediate child counts as a candidate. Ties at the same depth go to
/// the first mapping in document order. Branches without a match are left out,
/// and non-mapping values are neither returned nor searched.
pub fn flatten_branches(node: &Map<String, Value>, field: &str) -> Flattened {
    node.iter()
        .filter_map(|(key, child)| {
            let child = child.as_object()?;
            shallowest_match(child, field).map(|found| (key.clone(), found.clone()))
        })
        .collect()
}

/// Collect every mapping in the tree that holds `field`, keyed by its own key
///
/// This gives the per-endpoint picture (`"/statuses/home_timeline"` and so
/// on) instead of one record per top-level branch. If two records share a
/// key, the one visited last wins.
pub fn collect_leaves(node: &Map<String, Value>, field: &str) -> Flattened {
    let mut result = Flattened::new();
    collect_into(node, field, &mut result);
    result
}

fn shallowest_match<'a>(root: &'a Map<String, Value>, field: &str) -> Option<&'a Map<String, Value>> {
    let mut queue = VecDeque::from([root]);

    while let Some(current) = queue.pop_front() {
        if current.contains_key(field) {
            return Some(current);
        }
        queue.extend(current.values().filter_map(Value::as_object));
    }

    None
}

fn collect_into(node: &Map<String, Value>, field: &str, result: &mut Flattened) {
    for (key, child) in node {
        let Some(child) = child.as_object() else {
            continue;
        };

        if child.contains_key(field) {
            result.insert(key.clone(), child.clone());
        } else {
            collect_into(child, field, result);
        }
    }
}
