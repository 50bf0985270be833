use std::collections::HashSet;

use clap::ValueEnum;
use serde_json::{Map, Value};

use crate::data::field::Field;

/// Project a field sequence onto a plain JSON object.
///
/// Disabled fields are skipped together with their subtrees. When siblings
/// share a key the later one wins, keeping the position of the first.
pub fn build_output(fields: &[Field]) -> Value {
    let mut output = Map::new();
    for field in fields.iter().filter(|f| f.enabled()) {
        output.insert(field.key_name().to_string(), field.as_json());
    }
    Value::Object(output)
}

/// Dotted paths of enabled keys that are overwritten by a later sibling.
pub fn duplicate_keys(fields: &[Field]) -> Vec<String> {
    let mut found = Vec::new();
    collect_duplicates(fields, "", &mut found);
    found
}

fn collect_duplicates(fields: &[Field], prefix: &str, found: &mut Vec<String>) {
    let enabled: Vec<&Field> = fields.iter().filter(|f| f.enabled()).collect();
    let mut seen = HashSet::new();
    for (index, field) in enabled.iter().enumerate() {
        let path = if prefix.is_empty() {
            field.key_name().to_string()
        } else {
            format!("{prefix}.{}", field.key_name())
        };
        if !seen.insert(field.key_name()) && !found.contains(&path) {
            found.push(path.clone());
        }
        // Children of an overwritten sibling never reach the output.
        let overwritten = enabled[index + 1..]
            .iter()
            .any(|later| later.key_name() == field.key_name());
        if !overwritten && let Some(children) = field.children() {
            collect_duplicates(children, &path, found);
        }
    }
}

/// Text format for printing an output object.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Pretty-printed JSON.
    #[default]
    Json,
    /// JSON on a single line.
    CompactJson,
    /// TOML document.
    Toml,
}

/// Render an output object.
///
/// # Errors
///
/// TOML cannot hold `null`, so numbers that coerced to NaN fail to render
/// in that format.
pub fn render(value: &Value, format: OutputFormat) -> anyhow::Result<String> {
    let s = match format {
        OutputFormat::Json => serde_json::to_string_pretty(value)?,
        OutputFormat::CompactJson => serde_json::to_string(value)?,
        OutputFormat::Toml => toml::to_string_pretty(value)?,
    };
    Ok(s)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::data::{
        field::{FieldKind, FieldValue},
        id::SequentialIds,
        tree::FieldTree,
    };

    fn tree() -> FieldTree {
        FieldTree::new(Box::new(SequentialIds::new()), "field")
    }

    #[test]
    fn test_flat_enabled_fields() {
        let mut t = tree();
        let a = t.add_field(None).unwrap();
        let b = t.add_field(None).unwrap();
        t.set_input(a, "x", None).unwrap();
        t.set_kind(b, FieldKind::Boolean, None).unwrap();
        t.set_value(b, FieldValue::Bool(true), None).unwrap();

        assert_eq!(
            build_output(t.fields()),
            json!({"field1": "x", "field2": true})
        );
    }

    #[test]
    fn test_last_duplicate_wins_in_first_position() {
        let mut t = tree();
        let a = t.add_field(None).unwrap();
        let b = t.add_field(None).unwrap();
        let c = t.add_field(None).unwrap();
        t.set_key_name(c, "field1", None).unwrap();
        t.set_input(a, "first", None).unwrap();
        t.set_input(b, "middle", None).unwrap();
        t.set_input(c, "last", None).unwrap();

        let out = build_output(t.fields());
        assert_eq!(out, json!({"field1": "last", "field2": "middle"}));
        let keys: Vec<_> = out.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["field1", "field2"]);
        assert_eq!(duplicate_keys(t.fields()), vec!["field1".to_string()]);
    }

    #[test]
    fn test_disabled_duplicate_is_not_reported() {
        let mut t = tree();
        let a = t.add_field(None).unwrap();
        let b = t.add_field(None).unwrap();
        t.set_key_name(b, "field1", None).unwrap();
        t.set_enabled(b, false, None).unwrap();
        t.set_input(a, "kept", None).unwrap();

        assert_eq!(build_output(t.fields()), json!({"field1": "kept"}));
        assert!(duplicate_keys(t.fields()).is_empty());
    }

    #[test]
    fn test_nested_duplicates_use_dotted_path() {
        let mut t = tree();
        let outer = t.add_field(None).unwrap();
        t.set_key_name(outer, "outer", None).unwrap();
        t.set_kind(outer, FieldKind::Nested, None).unwrap();
        let x = t.add_field(Some(outer)).unwrap();
        let y = t.add_field(Some(outer)).unwrap();
        t.set_key_name(x, "k", None).unwrap();
        t.set_key_name(y, "k", None).unwrap();

        assert_eq!(duplicate_keys(t.fields()), vec!["outer.k".to_string()]);
    }

    #[test]
    fn test_overwritten_subtree_is_not_reported() {
        let mut t = tree();
        let lost = t.add_field(None).unwrap();
        t.set_key_name(lost, "cfg", None).unwrap();
        t.set_kind(lost, FieldKind::Nested, None).unwrap();
        let x = t.add_field(Some(lost)).unwrap();
        let y = t.add_field(Some(lost)).unwrap();
        t.set_key_name(x, "k", None).unwrap();
        t.set_key_name(y, "k", None).unwrap();
        let kept = t.add_field(None).unwrap();
        t.set_key_name(kept, "cfg", None).unwrap();
        t.set_kind(kept, FieldKind::Nested, None).unwrap();

        assert_eq!(build_output(t.fields()), json!({"cfg": {}}));
        assert_eq!(duplicate_keys(t.fields()), vec!["cfg".to_string()]);

        let z = t.add_field(Some(kept)).unwrap();
        let w = t.add_field(Some(kept)).unwrap();
        t.set_key_name(z, "dup", None).unwrap();
        t.set_key_name(w, "dup", None).unwrap();
        assert_eq!(
            duplicate_keys(t.fields()),
            vec!["cfg".to_string(), "cfg.dup".to_string()]
        );
    }

    #[test]
    fn test_render_formats() {
        let value = json!({"a": 1, "b": {"c": "d"}});
        assert_eq!(
            render(&value, OutputFormat::CompactJson).unwrap(),
            r#"{"a":1,"b":{"c":"d"}}"#
        );
        let toml = render(&value, OutputFormat::Toml).unwrap();
        assert!(toml.contains("a = 1"));
        assert!(toml.contains("[b]"));
        assert!(render(&json!({"n": null}), OutputFormat::Toml).is_err());
    }
}
