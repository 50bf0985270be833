use serde_json::Value;

use crate::data::{
    error::TreeError,
    field::{Field, FieldKind, FieldValue},
    id::{FieldId, IdSource},
    output::build_output,
};

/// A single attribute change applied by [`FieldTree::update_field`].
#[derive(Debug, Clone, PartialEq)]
pub enum FieldUpdate {
    KeyName(String),
    /// Switch kind; the value resets to the kind's zero value.
    Kind(FieldKind),
    /// Replace the value; it must match the current kind.
    Value(FieldValue),
    /// Raw text from an input box, coerced by the current kind.
    Input(String),
    Enabled(bool),
}

/// Ordered, recursively nested sequence of fields.
///
/// Fields are addressed by id, which resolves anywhere in the tree. The
/// optional `parent` argument taken by the mutating operations is a check:
/// when given, it must name the field's actual parent.
#[derive(Debug)]
pub struct FieldTree {
    fields: Vec<Field>,
    ids: Box<dyn IdSource>,
    key_prefix: String,
    created: u64,
}

impl FieldTree {
    /// Empty tree. New fields are named `{key_prefix}{n}`.
    pub fn new(ids: Box<dyn IdSource>, key_prefix: impl Into<String>) -> Self {
        Self {
            fields: Vec::new(),
            ids,
            key_prefix: key_prefix.into(),
            created: 0,
        }
    }

    /// Tree holding a single default root field.
    pub fn seeded(ids: Box<dyn IdSource>, key_prefix: impl Into<String>) -> Self {
        let mut tree = Self::new(ids, key_prefix);
        let field = tree.new_field();
        tree.fields.push(field);
        tree
    }

    /// Root sequence.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Total number of fields at every depth.
    pub fn len(&self) -> usize {
        fn count(fields: &[Field]) -> usize {
            fields
                .iter()
                .map(|f| 1 + f.children().map(count).unwrap_or(0))
                .sum()
        }
        count(&self.fields)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Look a field up anywhere in the tree.
    pub fn get(&self, id: FieldId) -> Option<&Field> {
        let path = find_path(&self.fields, id)?;
        field_at(&self.fields, &path)
    }

    /// Id of the nested field owning `id`, `None` for root fields.
    pub fn parent_of(&self, id: FieldId) -> Option<FieldId> {
        let path = find_path(&self.fields, id)?;
        let (_, parent_path) = path.split_last()?;
        field_at(&self.fields, parent_path).map(Field::id)
    }

    /// Output object for the current tree.
    pub fn output(&self) -> Value {
        build_output(&self.fields)
    }

    fn new_field(&mut self) -> Field {
        self.created += 1;
        let key_name = format!("{}{}", self.key_prefix, self.created);
        Field::new(self.ids.next_id(), key_name)
    }

    /// Append a default field to the root, or to the children of `parent`.
    pub fn add_field(&mut self, parent: Option<FieldId>) -> Result<FieldId, TreeError> {
        let path = match parent {
            Some(parent_id) => {
                let path = find_path(&self.fields, parent_id).ok_or(TreeError::NotFound(parent_id))?;
                let is_nested = field_at(&self.fields, &path).is_some_and(Field::is_nested);
                if !is_nested {
                    return Err(TreeError::NotNested(parent_id));
                }
                path
            }
            None => Vec::new(),
        };

        let field = self.new_field();
        let id = field.id();
        let siblings = sequence_mut(&mut self.fields, &path).ok_or(TreeError::NotFound(id))?;
        siblings.push(field);
        Ok(id)
    }

    /// Apply one attribute change to the field `id`.
    ///
    /// Returns `false` when the field already had that attribute value, for
    /// example when its current kind is picked again.
    pub fn update_field(
        &mut self,
        id: FieldId,
        update: FieldUpdate,
        parent: Option<FieldId>,
    ) -> Result<bool, TreeError> {
        let path = self.resolve(id, parent)?;
        let field = field_at_mut(&mut self.fields, &path).ok_or(TreeError::NotFound(id))?;
        let changed = match update {
            FieldUpdate::KeyName(key_name) => field.set_key_name(key_name),
            FieldUpdate::Kind(kind) => field.set_kind(kind),
            FieldUpdate::Value(value) => field.set_value(value)?,
            FieldUpdate::Input(input) => field.set_input(&input)?,
            FieldUpdate::Enabled(enabled) => field.set_enabled(enabled),
        };
        Ok(changed)
    }

    /// Remove the field `id` and everything below it.
    pub fn delete_field(
        &mut self,
        id: FieldId,
        parent: Option<FieldId>,
    ) -> Result<Field, TreeError> {
        let path = self.resolve(id, parent)?;
        let (index, owner) = path.split_last().ok_or(TreeError::NotFound(id))?;
        let siblings = sequence_mut(&mut self.fields, owner).ok_or(TreeError::NotFound(id))?;
        if *index >= siblings.len() {
            return Err(TreeError::NotFound(id));
        }
        Ok(siblings.remove(*index))
    }

    pub fn set_key_name(
        &mut self,
        id: FieldId,
        key_name: impl Into<String>,
        parent: Option<FieldId>,
    ) -> Result<bool, TreeError> {
        self.update_field(id, FieldUpdate::KeyName(key_name.into()), parent)
    }

    pub fn set_kind(
        &mut self,
        id: FieldId,
        kind: FieldKind,
        parent: Option<FieldId>,
    ) -> Result<bool, TreeError> {
        self.update_field(id, FieldUpdate::Kind(kind), parent)
    }

    pub fn set_value(
        &mut self,
        id: FieldId,
        value: FieldValue,
        parent: Option<FieldId>,
    ) -> Result<bool, TreeError> {
        self.update_field(id, FieldUpdate::Value(value), parent)
    }

    pub fn set_input(
        &mut self,
        id: FieldId,
        input: impl Into<String>,
        parent: Option<FieldId>,
    ) -> Result<bool, TreeError> {
        self.update_field(id, FieldUpdate::Input(input.into()), parent)
    }

    pub fn set_enabled(
        &mut self,
        id: FieldId,
        enabled: bool,
        parent: Option<FieldId>,
    ) -> Result<bool, TreeError> {
        self.update_field(id, FieldUpdate::Enabled(enabled), parent)
    }

    fn resolve(&self, id: FieldId, parent: Option<FieldId>) -> Result<Vec<usize>, TreeError> {
        let path = find_path(&self.fields, id).ok_or(TreeError::NotFound(id))?;
        if let Some(expected) = parent {
            let actual = path
                .split_last()
                .and_then(|(_, owner)| field_at(&self.fields, owner))
                .map(Field::id);
            if actual != Some(expected) {
                return Err(TreeError::ParentMismatch { id, expected });
            }
        }
        Ok(path)
    }
}

/// Index path from the root sequence down to `id`.
fn find_path(fields: &[Field], id: FieldId) -> Option<Vec<usize>> {
    fn descend(fields: &[Field], id: FieldId, path: &mut Vec<usize>) -> bool {
        for (index, field) in fields.iter().enumerate() {
            path.push(index);
            if field.id() == id {
                return true;
            }
            if let Some(children) = field.children()
                && descend(children, id, path)
            {
                return true;
            }
            path.pop();
        }
        false
    }

    let mut path = Vec::new();
    descend(fields, id, &mut path).then_some(path)
}

fn field_at<'a>(fields: &'a [Field], path: &[usize]) -> Option<&'a Field> {
    let (first, rest) = path.split_first()?;
    let field = fields.get(*first)?;
    if rest.is_empty() {
        return Some(field);
    }
    field_at(field.children()?, rest)
}

fn field_at_mut<'a>(fields: &'a mut [Field], path: &[usize]) -> Option<&'a mut Field> {
    let (first, rest) = path.split_first()?;
    let field = fields.get_mut(*first)?;
    if rest.is_empty() {
        return Some(field);
    }
    field_at_mut(field.children_mut()?, rest)
}

/// The sequence whose owner sits at `owner`; the root for an empty path.
fn sequence_mut<'a>(fields: &'a mut Vec<Field>, owner: &[usize]) -> Option<&'a mut Vec<Field>> {
    if owner.is_empty() {
        return Some(fields);
    }
    field_at_mut(fields, owner)?.children_mut()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::data::id::SequentialIds;

    fn tree() -> FieldTree {
        FieldTree::new(Box::new(SequentialIds::new()), "field")
    }

    fn nested(t: &mut FieldTree, parent: Option<FieldId>, key: &str) -> FieldId {
        let id = t.add_field(parent).unwrap();
        t.set_key_name(id, key, None).unwrap();
        t.set_kind(id, FieldKind::Nested, None).unwrap();
        id
    }

    #[test]
    fn test_seeded_tree() {
        let t = FieldTree::seeded(Box::new(SequentialIds::new()), "field");
        assert_eq!(t.len(), 1);
        let f = &t.fields()[0];
        assert_eq!(f.key_name(), "field1");
        assert_eq!(f.kind(), FieldKind::String);
        assert_eq!(f.value(), &FieldValue::Text(String::new()));
        assert!(f.enabled());
        assert_eq!(t.output(), json!({"field1": ""}));
    }

    #[test]
    fn test_add_into_nested_parent_at_depth() {
        let mut t = tree();
        let outer = nested(&mut t, None, "outer");
        let inner = nested(&mut t, Some(outer), "inner");
        let leaf = t.add_field(Some(inner)).unwrap();

        assert_eq!(t.parent_of(leaf), Some(inner));
        assert_eq!(t.parent_of(inner), Some(outer));
        assert_eq!(t.parent_of(outer), None);
        assert_eq!(t.len(), 3);
    }

    #[test]
    fn test_add_rejects_bad_parent() {
        let mut t = tree();
        let plain = t.add_field(None).unwrap();
        assert_eq!(t.add_field(Some(plain)), Err(TreeError::NotNested(plain)));

        let mut other = SequentialIds::new();
        for _ in 0..10 {
            other.next_id();
        }
        let unknown = other.next_id();
        assert_eq!(t.add_field(Some(unknown)), Err(TreeError::NotFound(unknown)));
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn test_nesting_depth_output() {
        let mut t = tree();
        let outer = nested(&mut t, None, "outer");
        let inner = nested(&mut t, Some(outer), "inner");
        let x = t.add_field(Some(inner)).unwrap();
        t.set_key_name(x, "x", None).unwrap();
        t.set_input(x, "y", None).unwrap();

        assert_eq!(t.output(), json!({"outer": {"inner": {"x": "y"}}}));
    }

    #[test]
    fn test_update_resolves_globally_and_checks_parent_hint() {
        let mut t = tree();
        let outer = nested(&mut t, None, "outer");
        let inner = nested(&mut t, Some(outer), "inner");
        let leaf = t.add_field(Some(inner)).unwrap();

        t.set_input(leaf, "deep", None).unwrap();
        t.set_input(leaf, "deeper", Some(inner)).unwrap();
        assert_eq!(
            t.set_input(leaf, "wrong", Some(outer)),
            Err(TreeError::ParentMismatch {
                id: leaf,
                expected: outer
            })
        );
        assert_eq!(
            t.get(leaf).unwrap().value(),
            &FieldValue::Text("deeper".to_string())
        );
    }

    #[test]
    fn test_type_switch_round_trip_defaults() {
        let mut t = tree();
        let f = t.add_field(None).unwrap();
        t.set_input(f, "stale", None).unwrap();
        t.set_kind(f, FieldKind::Nested, None).unwrap();
        t.add_field(Some(f)).unwrap();
        t.set_kind(f, FieldKind::String, None).unwrap();

        assert_eq!(t.get(f).unwrap().value(), &FieldValue::Text(String::new()));
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn test_repicking_nested_kind_keeps_children() {
        let mut t = tree();
        let outer = nested(&mut t, None, "field1");
        let keep = t.add_field(Some(outer)).unwrap();
        t.set_input(keep, "keep", None).unwrap();

        assert_eq!(t.set_kind(outer, FieldKind::Nested, None), Ok(false));
        assert_eq!(t.output(), json!({"field1": {"field2": "keep"}}));
        assert!(t.get(keep).is_some());
    }

    #[test]
    fn test_repicking_number_kind_keeps_value() {
        let mut t = tree();
        let f = t.add_field(None).unwrap();
        assert_eq!(t.set_kind(f, FieldKind::Number, None), Ok(true));
        t.set_input(f, "42", None).unwrap();

        assert_eq!(t.set_kind(f, FieldKind::Number, None), Ok(false));
        assert_eq!(t.output(), json!({"field1": 42}));
    }

    #[test]
    fn test_update_reports_unchanged_attributes() {
        let mut t = tree();
        let f = t.add_field(None).unwrap();
        assert_eq!(t.set_key_name(f, "field1", None), Ok(false));
        assert_eq!(t.set_enabled(f, true, None), Ok(false));
        assert_eq!(t.set_enabled(f, false, None), Ok(true));
        assert_eq!(t.set_input(f, "", None), Ok(false));
    }

    #[test]
    fn test_value_must_match_kind() {
        let mut t = tree();
        let f = t.add_field(None).unwrap();
        t.set_kind(f, FieldKind::Number, None).unwrap();
        assert!(matches!(
            t.set_value(f, FieldValue::Text("x".into()), None),
            Err(TreeError::TypeMismatch { .. })
        ));
        assert!(t.set_value(f, FieldValue::Children(Vec::new()), None).is_err());
        assert_eq!(t.get(f).unwrap().value(), &FieldValue::Number(0.0));
    }

    #[test]
    fn test_nested_rejects_text_input() {
        let mut t = tree();
        let n = nested(&mut t, None, "n");
        assert!(matches!(
            t.set_input(n, "text", None),
            Err(TreeError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_disabled_ancestor_hides_subtree() {
        let mut t = tree();
        let outer = nested(&mut t, None, "outer");
        let child = t.add_field(Some(outer)).unwrap();
        t.set_input(child, "v", None).unwrap();
        let sibling = t.add_field(None).unwrap();
        t.set_input(sibling, "s", None).unwrap();

        t.set_enabled(outer, false, None).unwrap();
        assert_eq!(t.output(), json!({"field3": "s"}));
        assert!(t.get(child).unwrap().enabled());
    }

    #[test]
    fn test_delete_cascades() {
        let mut t = tree();
        let outer = nested(&mut t, None, "outer");
        let inner = nested(&mut t, Some(outer), "inner");
        let leaf = t.add_field(Some(inner)).unwrap();
        t.set_enabled(leaf, false, None).unwrap();
        let keep = t.add_field(None).unwrap();

        let removed = t.delete_field(outer, None).unwrap();
        assert_eq!(removed.id(), outer);
        assert!(t.get(inner).is_none());
        assert!(t.get(leaf).is_none());
        assert_eq!(t.len(), 1);
        assert_eq!(t.fields()[0].id(), keep);
        assert_eq!(t.output(), json!({"field4": ""}));
    }

    #[test]
    fn test_delete_nested_child_with_hint() {
        let mut t = tree();
        let outer = nested(&mut t, None, "outer");
        let a = t.add_field(Some(outer)).unwrap();
        let b = t.add_field(Some(outer)).unwrap();

        assert_eq!(t.delete_field(a, None).unwrap().id(), a);
        assert!(t.delete_field(b, Some(b)).is_err());
        t.delete_field(b, Some(outer)).unwrap();
        assert_eq!(t.get(outer).unwrap().children().map(<[Field]>::len), Some(0));
        assert_eq!(t.delete_field(b, None), Err(TreeError::NotFound(b)));
    }

    #[test]
    fn test_ids_unique_across_tree() {
        let mut t = tree();
        let outer = nested(&mut t, None, "outer");
        let mut seen = vec![outer];
        for _ in 0..3 {
            seen.push(t.add_field(Some(outer)).unwrap());
            seen.push(t.add_field(None).unwrap());
        }
        let mut deduped = seen.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), seen.len());
    }
}
