use serde_json::Value;

/// Look up a value by a `/` separated path such as `result/data/0/package`.
///
/// Path segments are object keys, or indexes when the current value is an array. Returns `None`
/// as soon as a segment cannot be followed.
pub fn get_value_using_path<'a>(data: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .try_fold(data, |current, segment| match current {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        })
}
