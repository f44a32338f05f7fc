//! Removal of composites left empty by filtering.

use serde_json::Value;

/// Removes empty objects and arrays below `value`, cascading upwards.
///
/// Returns the pruned value and the number of composites removed. Removing a
/// child can empty its parent, which is then removed too. The root itself is
/// never removed, only emptied. With `enabled == false` the value is returned
/// untouched.
///
/// # Examples
///
/// ```
/// use field_filter::prune;
/// use serde_json::json;
///
/// let (pruned, removed) = prune(json!({"a": {"b": {}}, "c": [{}], "d": 1}), true);
/// assert_eq!(pruned, json!({"d": 1}));
/// assert_eq!(removed, 4);
/// ```
#[must_use]
pub fn prune(value: Value, enabled: bool) -> (Value, usize) {
    if !enabled {
        return (value, 0);
    }
    let mut removed = 0;
    let pruned = prune_children(value, &mut removed);
    (pruned, removed)
}

fn prune_children(value: Value, removed: &mut usize) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter_map(|(k, v)| keep_non_empty(v, removed).map(|v| (k, v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .filter_map(|v| keep_non_empty(v, removed))
                .collect(),
        ),
        scalar => scalar,
    }
}

fn keep_non_empty(value: Value, removed: &mut usize) -> Option<Value> {
    let value = prune_children(value, removed);
    if is_empty_composite(&value) {
        *removed += 1;
        None
    } else {
        Some(value)
    }
}

fn is_empty_composite(value: &Value) -> bool {
    match value {
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_disabled_keeps_empty_composites() {
        let value = json!({"a": {}, "b": []});
        assert_eq!(prune(value.clone(), false), (value, 0));
    }

    #[test]
    fn test_cascading_removal() {
        let value = json!({"a": {"b": {"c": {}}}, "keep": true});
        let (pruned, removed) = prune(value, true);
        assert_eq!(pruned, json!({"keep": true}));
        assert_eq!(removed, 3);
    }

    #[test]
    fn test_root_is_emptied_not_removed() {
        let (pruned, removed) = prune(json!({"a": {}}), true);
        assert_eq!(pruned, json!({}));
        assert_eq!(removed, 1);
    }

    #[test]
    fn test_array_elements_pruned() {
        let value = json!({"items": [{}, {"id": 1}, []]});
        let (pruned, removed) = prune(value, true);
        assert_eq!(pruned, json!({"items": [{"id": 1}]}));
        assert_eq!(removed, 2);
    }

    #[test]
    fn test_nulls_and_empty_strings_are_not_composites() {
        let value = json!({"a": null, "b": "", "c": 0});
        let (pruned, removed) = prune(value.clone(), true);
        assert_eq!(pruned, value);
        assert_eq!(removed, 0);
    }

    #[test]
    fn test_prune_is_idempotent() {
        let (once, _) = prune(json!({"a": {"b": []}, "c": [1, {}]}), true);
        let (twice, removed) = prune(once.clone(), true);
        assert_eq!(once, twice);
        assert_eq!(removed, 0);
    }
}
