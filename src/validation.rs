//! Declarative form validation.
//!
//! A [`Schema`] maps field names to an ordered list of rules. Each rule is a
//! predicate paired with the message shown when it does not hold. Fields are
//! evaluated independently and every violation is collected into a single
//! [`ValidationErrors`] value; validation never panics and never performs I/O.
//!
//! Numeric fields accept JSON numbers and numeric strings (form inputs arrive
//! as text) and are normalized to JSON numbers in the parsed output.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Shown when a required field is absent, `null` or blank.
pub const REQUIRED_MESSAGE: &str = "This field is required.";
/// Shown when an optional, non-nullable field is sent as `null`.
pub const NOT_NULL_MESSAGE: &str = "This field cannot be null.";
pub const NUMBER_MESSAGE: &str = "Must be a number.";
pub const INTEGER_MESSAGE: &str = "Must be a whole number.";
pub const TEXT_MESSAGE: &str = "Must be text.";

/// Key under which errors that do not belong to a single field are reported.
pub const FORM_FIELD: &str = "form";

/// Expected type of a field's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Integer,
    Number,
    Text,
}

impl FieldKind {
    /// Casts `value` to this kind or returns the type message.
    fn coerce(self, value: &Value) -> Result<Value, &'static str> {
        match self {
            FieldKind::Text => match value {
                Value::String(_) => Ok(value.clone()),
                Value::Number(n) => Ok(Value::String(n.to_string())),
                _ => Err(TEXT_MESSAGE),
            },
            FieldKind::Number => as_number(value).map(Value::Number).ok_or(NUMBER_MESSAGE),
            FieldKind::Integer => {
                let number = as_number(value).ok_or(NUMBER_MESSAGE)?;
                if number.is_i64() || number.is_u64() {
                    return Ok(Value::Number(number));
                }
                match number.as_f64() {
                    Some(f) if f.fract() == 0.0 && f.abs() < 9.0e15 => {
                        Ok(Value::Number(Number::from(f as i64)))
                    }
                    _ => Err(INTEGER_MESSAGE),
                }
            }
        }
    }
}

/// Reads a JSON number, or a string holding one.
fn as_number(value: &Value) -> Option<Number> {
    match value {
        Value::Number(n) => Some(n.clone()),
        Value::String(s) => {
            let s = s.trim();
            if let Ok(i) = s.parse::<i64>() {
                return Some(Number::from(i));
            }
            s.parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .and_then(Number::from_f64)
        }
        _ => None,
    }
}

/// How a field behaves when absent or `null`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// Must be present and not `null`.
    Required,
    /// May be absent; `null` is rejected.
    Optional,
    /// May be absent or `null`.
    Nullable,
}

type Predicate = Box<dyn Fn(&Value) -> bool + Send + Sync>;

/// A predicate and the message reported when it fails.
///
/// Predicates receive the value already cast to the field's kind.
pub struct Rule {
    message: String,
    check: Predicate,
}

impl Rule {
    pub fn new<F>(message: impl Into<String>, check: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self {
            message: message.into(),
            check: Box::new(check),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    fn holds(&self, value: &Value) -> bool {
        (self.check)(value)
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}

/// Declaration of a single form field.
#[derive(Debug)]
pub struct Field {
    name: String,
    kind: FieldKind,
    presence: Presence,
    default: Option<Value>,
    rules: Vec<Rule>,
}

impl Field {
    fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            presence: Presence::Required,
            default: None,
            rules: Vec::new(),
        }
    }

    /// A required integer field.
    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Integer)
    }

    /// A required numeric field.
    pub fn number(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Number)
    }

    /// A required text field.
    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Text)
    }

    pub fn optional(mut self) -> Self {
        self.presence = Presence::Optional;
        self
    }

    pub fn nullable(mut self) -> Self {
        self.presence = Presence::Nullable;
        self
    }

    /// Value used when the field is absent from the input.
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn rule<F>(mut self, message: impl Into<String>, check: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.rules.push(Rule::new(message, check));
        self
    }

    /// Numeric lower bound (inclusive).
    pub fn min(self, min: f64, message: impl Into<String>) -> Self {
        self.rule(message, move |v| v.as_f64().is_some_and(|n| n >= min))
    }

    /// Text must contain something other than whitespace.
    pub fn non_empty(self, message: impl Into<String>) -> Self {
        self.rule(message, |v| v.as_str().is_some_and(|s| !s.trim().is_empty()))
    }

    /// Text length in characters must lie in `[min, max]`.
    pub fn length_between(self, min: usize, max: usize, message: impl Into<String>) -> Self {
        self.rule(message, move |v| {
            v.as_str()
                .is_some_and(|s| (min..=max).contains(&s.chars().count()))
        })
    }

    /// Text must contain at least `words` whitespace-separated tokens.
    pub fn min_words(self, words: usize, message: impl Into<String>) -> Self {
        self.rule(message, move |v| {
            v.as_str()
                .is_some_and(|s| s.split_whitespace().count() >= words)
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn presence(&self) -> Presence {
        self.presence
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Evaluates the raw input value of this field.
    ///
    /// `Ok(None)` means the field stays absent from the output.
    fn evaluate(&self, raw: Option<&Value>) -> Result<Option<Value>, Vec<String>> {
        let value = match (raw, &self.default) {
            (Some(v), _) => v,
            (None, Some(default)) => default,
            (None, None) => {
                return match self.presence {
                    Presence::Required => Err(vec![REQUIRED_MESSAGE.to_string()]),
                    Presence::Optional | Presence::Nullable => Ok(None),
                };
            }
        };

        if value.is_null() {
            return match self.presence {
                Presence::Nullable => Ok(Some(Value::Null)),
                Presence::Required => Err(vec![REQUIRED_MESSAGE.to_string()]),
                Presence::Optional => Err(vec![NOT_NULL_MESSAGE.to_string()]),
            };
        }

        // A type mismatch makes the remaining rules meaningless
        let value = self
            .kind
            .coerce(value)
            .map_err(|message| vec![message.to_string()])?;

        let messages: Vec<String> = self
            .rules
            .iter()
            .filter(|rule| !rule.holds(&value))
            .map(|rule| rule.message.clone())
            .collect();

        if messages.is_empty() {
            Ok(Some(value))
        } else {
            Err(messages)
        }
    }
}

/// Field-scoped validation messages, in rule order per field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    fields: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// A single error that is not tied to one field.
    pub fn form(message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.push(FORM_FIELD, message);
        errors
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    fn extend_field(&mut self, field: &str, messages: Vec<String>) {
        self.fields
            .entry(field.to_string())
            .or_default()
            .extend(messages);
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of fields with at least one message.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Messages of `field`; empty when the field passed.
    pub fn messages(&self, field: &str) -> &[String] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn first(&self, field: &str) -> Option<&str> {
        self.messages(field).first().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.fields
            .iter()
            .map(|(field, messages)| (field.as_str(), messages.as_slice()))
    }

    pub fn into_map(self) -> BTreeMap<String, Vec<String>> {
        self.fields
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.fields {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", field, messages.join("; "))?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// An ordered set of field declarations for one form.
#[derive(Debug)]
pub struct Schema {
    name: &'static str,
    fields: Vec<Field>,
}

impl Schema {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Validates `input` and returns the cast object with defaults applied.
    ///
    /// Keys not declared by the schema are passed through unchanged.
    pub fn validate(&self, input: &Value) -> Result<Map<String, Value>, ValidationErrors> {
        let Some(object) = input.as_object() else {
            tracing::warn!("Form '{}' rejected: input is not an object", self.name);
            return Err(ValidationErrors::form("Expected an object."));
        };

        let mut output = object.clone();
        let mut errors = ValidationErrors::new();

        for field in &self.fields {
            match field.evaluate(object.get(&field.name)) {
                Ok(Some(value)) => {
                    output.insert(field.name.clone(), value);
                }
                Ok(None) => {}
                Err(messages) => errors.extend_field(&field.name, messages),
            }
        }

        if errors.is_empty() {
            tracing::debug!("✓ Form '{}' validated", self.name);
            Ok(output)
        } else {
            tracing::warn!(
                "Form '{}' rejected: {} invalid field(s)",
                self.name,
                errors.len()
            );
            tracing::debug!("Form '{}' errors: {}", self.name, errors);
            Err(errors)
        }
    }

    /// Validates `input` and deserializes the result into `T`.
    pub fn parse<T: DeserializeOwned>(&self, input: &Value) -> Result<T, ValidationErrors> {
        let output = self.validate(input)?;
        serde_json::from_value(Value::Object(output)).map_err(|e| {
            tracing::error!("Form '{}' passed validation but failed to parse: {}", self.name, e);
            ValidationErrors::form(format!("Unexpected form shape: {}", e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_schema() -> Schema {
        Schema::new("sample")
            .field(Field::integer("id"))
            .field(Field::number("valor").nullable())
            .field(Field::integer("forma").optional())
            .field(
                Field::text("nome")
                    .non_empty(REQUIRED_MESSAGE)
                    .min_words(2, "Two words."),
            )
            .field(Field::text("obs").with_default("None"))
    }

    #[test]
    fn test_valid_input_is_cast() {
        let out = sample_schema()
            .validate(&json!({"id": "42", "valor": "10.5", "nome": "Ana Lima"}))
            .unwrap();

        assert_eq!(out["id"], json!(42));
        assert_eq!(out["valor"], json!(10.5));
        assert_eq!(out["obs"], json!("None"));
        assert!(!out.contains_key("forma"));
    }

    #[test]
    fn test_missing_required_fields() {
        let errors = sample_schema().validate(&json!({})).unwrap_err();

        assert_eq!(errors.first("id"), Some(REQUIRED_MESSAGE));
        assert_eq!(errors.first("nome"), Some(REQUIRED_MESSAGE));
        assert!(!errors.contains("valor"));
        assert!(!errors.contains("forma"));
        assert!(!errors.contains("obs"));
    }

    #[test]
    fn test_null_handling_by_presence() {
        let errors = sample_schema()
            .validate(&json!({"id": null, "valor": null, "forma": null, "nome": "Ana Lima"}))
            .unwrap_err();

        assert_eq!(errors.messages("id"), [REQUIRED_MESSAGE]);
        assert_eq!(errors.messages("forma"), [NOT_NULL_MESSAGE]);
        assert!(!errors.contains("valor"));
    }

    #[test]
    fn test_type_mismatch_reports_only_type_message() {
        let errors = sample_schema()
            .validate(&json!({"id": "abc", "nome": true}))
            .unwrap_err();

        assert_eq!(errors.messages("id"), [NUMBER_MESSAGE]);
        assert_eq!(errors.messages("nome"), [TEXT_MESSAGE]);
    }

    #[test]
    fn test_fractional_integer_rejected() {
        let errors = sample_schema()
            .validate(&json!({"id": 1.5, "nome": "Ana Lima"}))
            .unwrap_err();
        assert_eq!(errors.messages("id"), [INTEGER_MESSAGE]);

        let out = sample_schema()
            .validate(&json!({"id": 2.0, "nome": "Ana Lima"}))
            .unwrap();
        assert_eq!(out["id"], json!(2));
    }

    #[test]
    fn test_every_violated_rule_reports_a_message() {
        let errors = sample_schema()
            .validate(&json!({"id": 1, "nome": "   "}))
            .unwrap_err();

        assert_eq!(errors.messages("nome"), [REQUIRED_MESSAGE, "Two words."]);
    }

    #[test]
    fn test_unknown_keys_pass_through() {
        let out = sample_schema()
            .validate(&json!({"id": 1, "nome": "Ana Lima", "extra": [1, 2]}))
            .unwrap();
        assert_eq!(out["extra"], json!([1, 2]));
    }

    #[test]
    fn test_non_object_input() {
        let errors = sample_schema().validate(&json!([1, 2, 3])).unwrap_err();
        assert_eq!(errors.first(FORM_FIELD), Some("Expected an object."));
    }

    #[test]
    fn test_validation_is_deterministic() {
        let input = json!({"id": "x", "forma": null});
        let schema = sample_schema();
        assert_eq!(schema.validate(&input), schema.validate(&input));
    }

    #[test]
    fn test_errors_display_and_serialize() {
        let mut errors = ValidationErrors::new();
        errors.push("b", "second");
        errors.push("a", "first");
        errors.push("a", "again");

        assert_eq!(errors.to_string(), "a: first; again, b: second");
        assert_eq!(
            serde_json::to_value(&errors).unwrap(),
            json!({"a": ["first", "again"], "b": ["second"]})
        );
    }
}
