use std::fmt;

use serde_json::{Number, Value};

use crate::data::{error::TreeError, id::FieldId, output::build_output};

/// 2^63; integral `f64` values below it convert to `i64` exactly.
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

/// Kind tag of a field; decides the shape of its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    String,
    Number,
    Float,
    Boolean,
    ObjectId,
    Nested,
}

impl FieldKind {
    /// All kinds, in the order the kind selector lists them.
    pub const ALL: [FieldKind; 6] = [
        FieldKind::String,
        FieldKind::Number,
        FieldKind::Float,
        FieldKind::Boolean,
        FieldKind::ObjectId,
        FieldKind::Nested,
    ];

    /// Wire name (`"string"`, `"objectId"`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Number => "number",
            FieldKind::Float => "float",
            FieldKind::Boolean => "boolean",
            FieldKind::ObjectId => "objectId",
            FieldKind::Nested => "nested",
        }
    }

    /// Human readable label for selectors.
    pub fn label(&self) -> &'static str {
        match self {
            FieldKind::String => "String",
            FieldKind::Number => "Number",
            FieldKind::Float => "Float",
            FieldKind::Boolean => "Boolean",
            FieldKind::ObjectId => "ObjectId",
            FieldKind::Nested => "Nested",
        }
    }

    /// Zero value for this kind.
    pub fn default_value(&self) -> FieldValue {
        match self {
            FieldKind::String | FieldKind::ObjectId => FieldValue::Text(String::new()),
            FieldKind::Number | FieldKind::Float => FieldValue::Number(0.0),
            FieldKind::Boolean => FieldValue::Bool(false),
            FieldKind::Nested => FieldValue::Children(Vec::new()),
        }
    }

    /// Whether `value` has the shape this kind requires.
    pub fn accepts(&self, value: &FieldValue) -> bool {
        matches!(
            (self, value),
            (FieldKind::String | FieldKind::ObjectId, FieldValue::Text(_))
                | (FieldKind::Number | FieldKind::Float, FieldValue::Number(_))
                | (FieldKind::Boolean, FieldValue::Bool(_))
                | (FieldKind::Nested, FieldValue::Children(_))
        )
    }

    /// Convert raw text typed by the user into a value of this kind.
    ///
    /// Numeric kinds never reject input: blank text is `0` and anything
    /// unparsable becomes NaN. Nested fields take no text at all.
    pub fn coerce_input(&self, input: &str) -> Option<FieldValue> {
        match self {
            FieldKind::String | FieldKind::ObjectId => Some(FieldValue::Text(input.to_string())),
            FieldKind::Number | FieldKind::Float => Some(FieldValue::Number(parse_number(input))),
            FieldKind::Boolean => match input.trim() {
                "true" => Some(FieldValue::Bool(true)),
                "false" => Some(FieldValue::Bool(false)),
                _ => None,
            },
            FieldKind::Nested => None,
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Number coercion with the same rules as JavaScript's `Number()`: blank is
/// `0`, `0x`/`0o`/`0b` prefixes are read in their radix, `Infinity` is
/// spelled out, and everything else unparsable (`inf` and `nan` included)
/// is NaN.
fn parse_number(input: &str) -> f64 {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    for (prefix, radix) in RADIX_PREFIXES {
        if let Some(digits) = trimmed.strip_prefix(prefix) {
            if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
                return f64::NAN;
            }
            return u128::from_str_radix(digits, radix)
                .map(|v| v as f64)
                .unwrap_or(f64::INFINITY);
        }
    }
    match trimmed {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    if trimmed
        .chars()
        .any(|c| c.is_ascii_alphabetic() && !matches!(c, 'e' | 'E'))
    {
        return f64::NAN;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

const RADIX_PREFIXES: [(&str, u32); 6] = [
    ("0x", 16),
    ("0X", 16),
    ("0o", 8),
    ("0O", 8),
    ("0b", 2),
    ("0B", 2),
];

/// Payload of a field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Bool(bool),
    Children(Vec<Field>),
}

impl FieldValue {
    /// Short name of the payload shape, used in error messages.
    pub fn shape(&self) -> &'static str {
        match self {
            FieldValue::Text(_) => "text",
            FieldValue::Number(_) => "number",
            FieldValue::Bool(_) => "boolean",
            FieldValue::Children(_) => "children",
        }
    }

    /// Text shown in a value editor. Children have no textual form.
    pub fn display_text(&self) -> Option<String> {
        match self {
            FieldValue::Text(s) => Some(s.clone()),
            FieldValue::Number(n) => Some(format_number(*n)),
            FieldValue::Bool(b) => Some(b.to_string()),
            FieldValue::Children(_) => None,
        }
    }
}

fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if let Some(i) = as_integer(n) {
        i.to_string()
    } else {
        n.to_string()
    }
}

/// Integral values inside the `i64` range; the cast is exact there.
fn as_integer(n: f64) -> Option<i64> {
    (n.fract() == 0.0 && n.abs() < I64_BOUND).then_some(n as i64)
}

/// JSON form of a number: integral values are written as integers, NaN and
/// the infinities have no JSON form and become `null`.
///
/// Integral values of magnitude 2^63 and above keep the float form
/// (`1e19`), where `JSON.stringify` would print digits up to 1e21.
pub fn number_to_json(n: f64) -> Value {
    match as_integer(n) {
        Some(i) => Value::Number(Number::from(i)),
        None => Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null),
    }
}

/// One node of the schema tree.
///
/// Fields are only mutated through [`FieldTree`](crate::data::tree::FieldTree),
/// which keeps `value` in step with `kind`.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    id: FieldId,
    key_name: String,
    kind: FieldKind,
    value: FieldValue,
    enabled: bool,
}

impl Field {
    /// A fresh enabled `string` field with an empty value.
    pub fn new(id: FieldId, key_name: impl Into<String>) -> Self {
        Self {
            id,
            key_name: key_name.into(),
            kind: FieldKind::String,
            value: FieldKind::String.default_value(),
            enabled: true,
        }
    }

    pub fn id(&self) -> FieldId {
        self.id
    }

    pub fn key_name(&self) -> &str {
        &self.key_name
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn value(&self) -> &FieldValue {
        &self.value
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_nested(&self) -> bool {
        self.kind == FieldKind::Nested
    }

    /// Child fields, if this is a nested field.
    pub fn children(&self) -> Option<&[Field]> {
        match &self.value {
            FieldValue::Children(children) => Some(children),
            _ => None,
        }
    }

    pub(crate) fn children_mut(&mut self) -> Option<&mut Vec<Field>> {
        match &mut self.value {
            FieldValue::Children(children) => Some(children),
            _ => None,
        }
    }

    // The setters below report whether the field actually changed.

    pub(crate) fn set_key_name(&mut self, key_name: String) -> bool {
        if self.key_name == key_name {
            return false;
        }
        self.key_name = key_name;
        true
    }

    /// Switch kind and reset the value in one step.
    ///
    /// Picking the current kind again keeps the value, children included.
    pub(crate) fn set_kind(&mut self, kind: FieldKind) -> bool {
        if self.kind == kind {
            return false;
        }
        self.kind = kind;
        self.value = kind.default_value();
        true
    }

    pub(crate) fn set_value(&mut self, value: FieldValue) -> Result<bool, TreeError> {
        if !self.kind.accepts(&value) {
            return Err(TreeError::TypeMismatch {
                id: self.id,
                expected: self.kind,
                actual: value.shape(),
            });
        }
        Ok(self.replace_value(value))
    }

    pub(crate) fn set_input(&mut self, input: &str) -> Result<bool, TreeError> {
        let value = self
            .kind
            .coerce_input(input)
            .ok_or_else(|| TreeError::InvalidInput {
                id: self.id,
                kind: self.kind,
                input: input.to_string(),
            })?;
        Ok(self.replace_value(value))
    }

    pub(crate) fn set_enabled(&mut self, enabled: bool) -> bool {
        if self.enabled == enabled {
            return false;
        }
        self.enabled = enabled;
        true
    }

    fn replace_value(&mut self, value: FieldValue) -> bool {
        if self.value == value {
            return false;
        }
        self.value = value;
        true
    }

    /// JSON form of this field's value, ignoring its own `enabled` flag.
    pub fn as_json(&self) -> Value {
        match &self.value {
            FieldValue::Text(s) => Value::String(s.clone()),
            FieldValue::Number(n) => number_to_json(*n),
            FieldValue::Bool(b) => Value::Bool(*b),
            FieldValue::Children(children) => build_output(children),
        }
    }
}
