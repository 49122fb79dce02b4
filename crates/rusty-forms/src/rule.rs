// File: src/rule.rs
// Purpose: Rule descriptors and their evaluation semantics

use std::collections::BTreeMap;

use regex::Regex;

use crate::catalog::RegistrationError;
use crate::context::{DisplayNames, ValidationContext};
use crate::message::format_message;
use crate::value::Value;

/// Delimiter between normalized whitelist entries.
///
/// The joined string is both the `{1}` argument of the whitelist message and
/// the allowed-list token handed to client evaluators.
pub const ALLOWED_DELIMITER: &str = ", ";

const DEFAULT_ADAPTER: &str = "whitelist";

/// Where a rule attaches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// One field's value
    Field,
    /// The record as a whole (cross-field rules)
    Record,
}

/// Result of evaluating a single rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Valid,
    Invalid(String),
}

impl Outcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, Outcome::Valid)
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Outcome::Valid => None,
            Outcome::Invalid(message) => Some(message),
        }
    }
}

/// An integer-backed enum whose declared values a rule can check against
pub trait DeclaredEnum {
    /// Name used in messages and rule parameters
    const NAME: &'static str;

    fn declared_values() -> Vec<i64>;
}

/// Name and declared values of an enum, detached from the Rust type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumType {
    name: String,
    values: Vec<i64>,
}

impl EnumType {
    pub fn new(name: impl Into<String>, values: impl IntoIterator<Item = i64>) -> Self {
        Self {
            name: name.into(),
            values: values.into_iter().collect(),
        }
    }

    pub fn of<E: DeclaredEnum>() -> Self {
        Self::new(E::NAME, E::declared_values())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &[i64] {
        &self.values
    }

    pub fn contains(&self, value: i64) -> bool {
        self.values.contains(&value)
    }
}

/// Normalized whitelist configuration.
///
/// Entries are trimmed and upper-cased once, at registration, and kept in
/// declaration order with duplicates dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowedValues {
    entries: Vec<String>,
    adapter: String,
}

impl AllowedValues {
    fn normalize(values: Vec<String>, adapter: String) -> Result<Self, RegistrationError> {
        if values.is_empty() {
            return Err(RegistrationError::EmptyWhitelist);
        }
        if adapter.is_empty()
            || !adapter
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        {
            return Err(RegistrationError::InvalidAdapter(adapter));
        }

        let mut entries: Vec<String> = Vec::with_capacity(values.len());
        for raw in values {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return Err(RegistrationError::BlankAllowedValue);
            }
            if trimmed.contains(',') {
                return Err(RegistrationError::DelimiterInAllowedValue(raw));
            }
            let normalized = trimmed.to_uppercase();
            if !entries.contains(&normalized) {
                entries.push(normalized);
            }
        }

        Ok(Self { entries, adapter })
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Client adapter name (`data-val-<adapter>`)
    pub fn adapter(&self) -> &str {
        &self.adapter
    }

    /// The normalized entries joined with [`ALLOWED_DELIMITER`]
    pub fn token(&self) -> String {
        self.entries.join(ALLOWED_DELIMITER)
    }

    /// Case-insensitive membership; an absent value is never admitted.
    pub fn admits(&self, value: &Value) -> bool {
        match value.as_text() {
            None => false,
            Some(text) => {
                let normalized = text.to_uppercase();
                self.entries.iter().any(|entry| *entry == normalized)
            }
        }
    }
}

#[derive(Debug, Clone)]
enum SpecKind {
    Required,
    Length { min: usize, max: usize },
    Range { min: i64, max: i64 },
    Pattern(String),
    Enum(EnumType),
    Whitelist { values: Vec<String>, adapter: String },
    RequiredIf { field: String, equals: String, dependent: String },
}

/// Declarative, not yet validated rule.
///
/// Specs are attached to a [`RuleCatalogBuilder`](crate::RuleCatalogBuilder);
/// their parameters are checked when the catalog is built.
///
/// ```
/// use rusty_forms::RuleSpec;
///
/// let code = RuleSpec::whitelist(["1A", "Z7", "42"])
///     .adapter("departmentcode")
///     .message("The {0} is invalid.  Valid codes are:  {1}.");
/// assert_eq!(code.name(), "whitelist");
/// ```
#[derive(Debug, Clone)]
pub struct RuleSpec {
    kind: SpecKind,
    message: Option<String>,
}

impl RuleSpec {
    fn new(kind: SpecKind) -> Self {
        Self { kind, message: None }
    }

    pub fn required() -> Self {
        Self::new(SpecKind::Required)
    }

    /// Text length (in characters) within `[min, max]`
    pub fn length(min: usize, max: usize) -> Self {
        Self::new(SpecKind::Length { min, max })
    }

    pub fn max_length(max: usize) -> Self {
        Self::length(0, max)
    }

    /// Integer value within `[min, max]`, inclusive
    pub fn range(min: i64, max: i64) -> Self {
        Self::new(SpecKind::Range { min, max })
    }

    /// The whole value must match `pattern`
    pub fn pattern(pattern: impl Into<String>) -> Self {
        Self::new(SpecKind::Pattern(pattern.into()))
    }

    pub fn enum_member<E: DeclaredEnum>() -> Self {
        Self::enum_values(EnumType::of::<E>())
    }

    pub fn enum_values(enum_type: EnumType) -> Self {
        Self::new(SpecKind::Enum(enum_type))
    }

    /// Case-insensitive membership in an ordered set of allowed values
    pub fn whitelist<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(SpecKind::Whitelist {
            values: values.into_iter().map(Into::into).collect(),
            adapter: DEFAULT_ADAPTER.to_string(),
        })
    }

    /// Whitelist from a comma-separated list such as `"1A,Z7,42"`
    pub fn whitelist_csv(values: &str) -> Self {
        Self::whitelist(values.split(','))
    }

    /// Record-scope rule: `dependent` must be non-empty whenever `field`
    /// equals `equals`.
    pub fn required_if(
        field: impl Into<String>,
        equals: impl Into<String>,
        dependent: impl Into<String>,
    ) -> Self {
        Self::new(SpecKind::RequiredIf {
            field: field.into(),
            equals: equals.into(),
            dependent: dependent.into(),
        })
    }

    /// Replace the rule-type default message template
    pub fn message(mut self, template: impl Into<String>) -> Self {
        self.message = Some(template.into());
        self
    }

    /// Client adapter name for a whitelist rule. No effect on other rules.
    pub fn adapter(mut self, name: impl Into<String>) -> Self {
        if let SpecKind::Whitelist { adapter, .. } = &mut self.kind {
            *adapter = name.into();
        }
        self
    }

    pub fn name(&self) -> &'static str {
        match &self.kind {
            SpecKind::Required => "required",
            SpecKind::Length { .. } => "length",
            SpecKind::Range { .. } => "range",
            SpecKind::Pattern(_) => "pattern",
            SpecKind::Enum(_) => "enum",
            SpecKind::Whitelist { .. } => "whitelist",
            SpecKind::RequiredIf { .. } => "required_if",
        }
    }

    pub fn scope(&self) -> Scope {
        match self.kind {
            SpecKind::RequiredIf { .. } => Scope::Record,
            _ => Scope::Field,
        }
    }

    /// Fields a record-scope spec reads
    pub(crate) fn referenced_fields(&self) -> Vec<&str> {
        match &self.kind {
            SpecKind::RequiredIf {
                field, dependent, ..
            } => vec![field.as_str(), dependent.as_str()],
            _ => Vec::new(),
        }
    }

    pub(crate) fn compile(self) -> Result<Rule, RegistrationError> {
        let check = match self.kind {
            SpecKind::Required => Check::Required,
            SpecKind::Length { min, max } => {
                if min > max {
                    return Err(RegistrationError::InvertedBounds {
                        rule: "length",
                        min: min.to_string(),
                        max: max.to_string(),
                    });
                }
                Check::Length { min, max }
            }
            SpecKind::Range { min, max } => {
                if min > max {
                    return Err(RegistrationError::InvertedBounds {
                        rule: "range",
                        min: min.to_string(),
                        max: max.to_string(),
                    });
                }
                Check::Range { min, max }
            }
            SpecKind::Pattern(source) => {
                let regex = Regex::new(&format!("^(?:{})$", source)).map_err(|error| {
                    RegistrationError::InvalidPattern {
                        pattern: source.clone(),
                        error,
                    }
                })?;
                Check::Pattern { source, regex }
            }
            SpecKind::Enum(enum_type) => {
                if enum_type.values.is_empty() {
                    return Err(RegistrationError::EmptyEnum(enum_type.name));
                }
                Check::Enum(enum_type)
            }
            SpecKind::Whitelist { values, adapter } => {
                Check::Whitelist(AllowedValues::normalize(values, adapter)?)
            }
            SpecKind::RequiredIf {
                field,
                equals,
                dependent,
            } => Check::RequiredIf {
                field,
                equals,
                dependent,
            },
        };

        Ok(Rule {
            check,
            template: self.message,
        })
    }
}

#[derive(Debug, Clone)]
enum Check {
    Required,
    Length { min: usize, max: usize },
    Range { min: i64, max: i64 },
    Pattern { source: String, regex: Regex },
    Enum(EnumType),
    Whitelist(AllowedValues),
    RequiredIf { field: String, equals: String, dependent: String },
}

/// A registered rule: validated parameters, message template and evaluator.
///
/// Evaluation is a pure function of the value and the context; nothing is
/// cached between calls.
#[derive(Debug, Clone)]
pub struct Rule {
    check: Check,
    template: Option<String>,
}

impl Rule {
    pub fn name(&self) -> &'static str {
        match &self.check {
            Check::Required => "required",
            Check::Length { .. } => "length",
            Check::Range { .. } => "range",
            Check::Pattern { .. } => "pattern",
            Check::Enum(_) => "enum",
            Check::Whitelist(_) => "whitelist",
            Check::RequiredIf { .. } => "required_if",
        }
    }

    pub fn scope(&self) -> Scope {
        match self.check {
            Check::RequiredIf { .. } => Scope::Record,
            _ => Scope::Field,
        }
    }

    pub fn is_required(&self) -> bool {
        matches!(self.check, Check::Required)
    }

    /// Rule parameters as strings, keyed by parameter name
    pub fn parameters(&self) -> BTreeMap<String, String> {
        let pairs: Vec<(&str, String)> = match &self.check {
            Check::Required => Vec::new(),
            Check::Length { min, max } => vec![("min", min.to_string()), ("max", max.to_string())],
            Check::Range { min, max } => vec![("min", min.to_string()), ("max", max.to_string())],
            Check::Pattern { source, .. } => vec![("pattern", source.clone())],
            Check::Enum(enum_type) => vec![
                ("enum", enum_type.name.clone()),
                (
                    "values",
                    enum_type
                        .values
                        .iter()
                        .map(|v| v.to_string())
                        .collect::<Vec<_>>()
                        .join(ALLOWED_DELIMITER),
                ),
            ],
            Check::Whitelist(allowed) => vec![
                ("allowed", allowed.token()),
                ("adapter", allowed.adapter.clone()),
            ],
            Check::RequiredIf {
                field,
                equals,
                dependent,
            } => vec![
                ("field", field.clone()),
                ("equals", equals.clone()),
                ("dependent", dependent.clone()),
            ],
        };

        pairs
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }

    /// The explicit template, or the rule-type default
    pub fn message_template(&self) -> &str {
        if let Some(template) = &self.template {
            return template;
        }
        match self.check {
            Check::Required => "The {0} field is required.",
            Check::Length { .. } => {
                "The field {0} must be a string with a minimum length of {2} and a maximum length of {1}."
            }
            Check::Range { .. } => "The field {0} must be between {1} and {2}.",
            Check::Pattern { .. } => "The field {0} must match the regular expression '{1}'.",
            Check::Enum(_) => "The field {0} is invalid.",
            Check::Whitelist(_) => "The {0} is invalid.  Allowed values are:  {1}.",
            Check::RequiredIf { .. } => "The field {0} is invalid.",
        }
    }

    /// Whitelist configuration, for rules that have one
    pub fn allowed_values(&self) -> Option<&AllowedValues> {
        match &self.check {
            Check::Whitelist(allowed) => Some(allowed),
            _ => None,
        }
    }

    /// Format this rule's message.
    ///
    /// `subject` is the display name of the field (or of the record, for
    /// record-scope rules); `names` resolves any other field a rule mentions.
    pub fn format_message(&self, subject: &str, names: &dyn DisplayNames) -> String {
        let args: Vec<String> = match &self.check {
            Check::Required => vec![subject.to_string()],
            Check::Length { min, max } => {
                vec![subject.to_string(), max.to_string(), min.to_string()]
            }
            Check::Range { min, max } => {
                vec![subject.to_string(), min.to_string(), max.to_string()]
            }
            Check::Pattern { source, .. } => vec![subject.to_string(), source.clone()],
            Check::Enum(enum_type) => vec![subject.to_string(), enum_type.name.clone()],
            Check::Whitelist(allowed) => vec![subject.to_string(), allowed.token()],
            Check::RequiredIf {
                equals, dependent, ..
            } => vec![
                subject.to_string(),
                names.display_name_of(dependent).to_string(),
                equals.clone(),
            ],
        };
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        format_message(self.message_template(), &args)
    }

    /// Evaluate against `value` (ignored by record-scope rules, which read
    /// the record through `ctx`).
    pub fn evaluate(&self, value: &Value, ctx: &ValidationContext<'_>) -> Outcome {
        if self.passes(value, ctx) {
            Outcome::Valid
        } else {
            let subject = match self.scope() {
                Scope::Field => ctx.display_name(),
                Scope::Record => ctx.record_display_name(),
            };
            Outcome::Invalid(self.format_message(subject, ctx))
        }
    }

    fn passes(&self, value: &Value, ctx: &ValidationContext<'_>) -> bool {
        match &self.check {
            Check::Required => match value {
                Value::Null => false,
                Value::Text(text) => !text.trim().is_empty(),
                Value::Integer(_) => true,
            },
            Check::Length { min, max } => match value.as_text() {
                None => true,
                Some(text) => {
                    let len = text.chars().count();
                    len >= *min && len <= *max
                }
            },
            Check::Range { min, max } => match value.as_integer() {
                None => true,
                Some(Ok(n)) => n >= *min && n <= *max,
                Some(Err(_)) => false,
            },
            Check::Pattern { regex, .. } => match value.as_text() {
                None => true,
                Some(text) if text.is_empty() => true,
                Some(text) => regex.is_match(&text),
            },
            Check::Enum(enum_type) => match value.as_integer() {
                None => true,
                Some(Ok(n)) => enum_type.contains(n),
                Some(Err(_)) => false,
            },
            Check::Whitelist(allowed) => allowed.admits(value),
            Check::RequiredIf {
                field,
                equals,
                dependent,
            } => {
                let record = ctx.record();
                let triggered = record
                    .value_of(field)
                    .as_text()
                    .is_some_and(|text| text == equals.as_str());
                !(triggered && record.value_of(dependent).is_null_or_empty())
            }
        }
    }
}
