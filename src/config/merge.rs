//! Field-by-field merging of configuration layers.
//!
//! Layers are parsed into `serde_json::Value` first, then folded together so a
//! user file that only sets `server.port` keeps every other project setting.

use serde_json::Value;

/// Merge `layer` into `target` in place.
///
/// Objects merge key by key. Any other value replaces the target outright,
/// lists included. `null` means "not set" at any depth and never lands in the
/// result.
pub fn merge_layer(target: &mut Value, layer: Value) {
    match (target, layer) {
        (_, Value::Null) => {}
        (Value::Object(fields), Value::Object(layer)) => {
            for (key, value) in layer {
                match fields.get_mut(&key) {
                    Some(slot) => merge_layer(slot, value),
                    None if value.is_null() => {}
                    None => {
                        fields.insert(key, value);
                    }
                }
            }
        }
        (target, layer) => *target = layer,
    }
}

/// Merge layers in order; later layers win.
pub fn merge_layers(layers: impl IntoIterator<Item = Value>) -> Value {
    let mut merged = Value::Null;
    for layer in layers {
        merge_layer(&mut merged, layer);
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn merged(mut base: Value, layer: Value) -> Value {
        merge_layer(&mut base, layer);
        base
    }

    #[test]
    fn test_user_port_keeps_project_host() {
        let project = json!({"server": {"host": "0.0.0.0", "port": 8000}});
        let user = json!({"server": {"port": 9000}});
        assert_eq!(
            merged(project, user),
            json!({"server": {"host": "0.0.0.0", "port": 9000}})
        );
    }

    #[test]
    fn test_origin_lists_are_replaced() {
        let base = json!({"server": {"cors_origins": ["http://localhost:3000"]}});
        let overlay = json!({"server": {"cors_origins": ["https://todo.example"]}});
        assert_eq!(
            merged(base, overlay),
            json!({"server": {"cors_origins": ["https://todo.example"]}})
        );
    }

    #[test]
    fn test_null_means_unset() {
        let base = json!({"tasks": {"file": "tasks.json"}});
        let overlay = json!({"tasks": {"file": null}});
        assert_eq!(
            merged(base, overlay),
            json!({"tasks": {"file": "tasks.json"}})
        );
    }

    #[test]
    fn test_merge_all_later_layers_win() {
        let layers = vec![
            json!({"tasks": {"file": "a.json"}, "server": {"port": 1}}),
            json!({"tasks": {"file": "b.json"}}),
            json!({"server": {"port": 2}}),
        ];
        assert_eq!(
            merge_layers(layers),
            json!({"tasks": {"file": "b.json"}, "server": {"port": 2}})
        );
    }

    #[test]
    fn test_scalar_and_object_replace_each_other() {
        assert_eq!(
            merged(json!({"server": 1}), json!({"server": {"port": 2}})),
            json!({"server": {"port": 2}})
        );
        assert_eq!(
            merged(json!({"server": {"port": 2}}), json!({"server": 1})),
            json!({"server": 1})
        );
    }

    #[test]
    fn test_null_for_new_key_is_dropped() {
        assert_eq!(
            merged(json!({"server": {}}), json!({"server": {"port": null}})),
            json!({"server": {}})
        );
    }
}
