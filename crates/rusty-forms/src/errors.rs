// File: src/errors.rs
// Purpose: Uniform error list returned by every validation strategy

use serde::Serialize;

use crate::rule::Outcome;

/// One failing rule, attributed to a field or to the record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// Field identifier, `None` for record-scope rules
    pub field: Option<String>,
    pub rule: &'static str,
    pub message: String,
}

/// Labelled, ordered list of violation messages.
///
/// An aggregator with no messages means there is nothing to report; it is
/// still present. Instances are immutable once built, either through one of
/// the `from_*` constructors or through [`ValidationErrorsBuilder::finish`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    label: String,
    messages: Vec<String>,
}

impl ValidationErrors {
    /// Label only, no messages
    pub fn empty(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            messages: Vec::new(),
        }
    }

    pub fn builder(label: impl Into<String>) -> ValidationErrorsBuilder {
        ValidationErrorsBuilder {
            inner: Self::empty(label),
        }
    }

    /// From a yes/no verdict. A failing verdict carries no detail, so the
    /// label itself becomes the only message.
    pub fn from_verdict(label: impl Into<String>, valid: bool) -> Self {
        let label = label.into();
        let messages = if valid { Vec::new() } else { vec![label.clone()] };
        Self { label, messages }
    }

    /// From raw rule outcomes; valid outcomes are dropped
    pub fn from_outcomes<I>(label: impl Into<String>, outcomes: I) -> Self
    where
        I: IntoIterator<Item = Outcome>,
    {
        let mut builder = Self::builder(label);
        for outcome in outcomes {
            if let Outcome::Invalid(message) = outcome {
                builder.push(message);
            }
        }
        builder.finish()
    }

    /// From per-property violations
    pub fn from_violations<I>(label: impl Into<String>, violations: I) -> Self
    where
        I: IntoIterator<Item = Violation>,
    {
        let mut builder = Self::builder(label);
        for violation in violations {
            builder.push(violation.message);
        }
        builder.finish()
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.messages.iter()
    }

    pub fn into_messages(self) -> Vec<String> {
        self.messages
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Incremental construction of a [`ValidationErrors`]
#[derive(Debug)]
pub struct ValidationErrorsBuilder {
    inner: ValidationErrors,
}

impl ValidationErrorsBuilder {
    pub fn push(&mut self, message: impl Into<String>) -> &mut Self {
        self.inner.messages.push(message.into());
        self
    }

    /// Append the messages of an already built aggregator, keeping this label
    pub fn absorb(&mut self, other: ValidationErrors) -> &mut Self {
        self.inner.messages.extend(other.messages);
        self
    }

    pub fn finish(self) -> ValidationErrors {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_is_present_but_clean() {
        let errors = ValidationErrors::from_verdict("Invalid Employee Model", true);
        assert_eq!(errors.label(), "Invalid Employee Model");
        assert!(errors.is_empty());
        assert_eq!(errors, ValidationErrors::empty("Invalid Employee Model"));
    }

    #[test]
    fn test_failed_verdict_reports_label() {
        let errors = ValidationErrors::from_verdict("Invalid Employee Model", false);
        assert_eq!(errors.messages(), &["Invalid Employee Model".to_string()]);
    }

    #[test]
    fn test_representations_normalize_to_same_shape() {
        let from_outcomes = ValidationErrors::from_outcomes(
            "Invalid Age Property",
            vec![
                Outcome::Valid,
                Outcome::Invalid("The user's Age must be between 16 and 110.".to_string()),
            ],
        );
        let from_violations = ValidationErrors::from_violations(
            "Invalid Age Property",
            vec![Violation {
                field: Some("Age".to_string()),
                rule: "range",
                message: "The user's Age must be between 16 and 110.".to_string(),
            }],
        );
        assert_eq!(from_outcomes, from_violations);
        assert_eq!(from_outcomes.len(), 1);
    }

    #[test]
    fn test_builder_absorbs_in_order() {
        let first = ValidationErrors::from_outcomes("a", vec![Outcome::Invalid("one".to_string())]);
        let mut builder = ValidationErrors::builder("Invalid Employee Model");
        builder
            .absorb(first)
            .push("Oh-Oh...  There was an error processing the model.");
        let errors = builder.finish();

        assert_eq!(errors.label(), "Invalid Employee Model");
        assert_eq!(
            errors.into_messages(),
            vec![
                "one".to_string(),
                "Oh-Oh...  There was an error processing the model.".to_string()
            ]
        );
    }

    #[test]
    fn test_serializes_label_and_messages() {
        let errors = ValidationErrors::from_verdict("Invalid Employee Model", false);
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "label": "Invalid Employee Model",
                "messages": ["Invalid Employee Model"]
            })
        );
    }
}
