// File: src/executor.rs
// Purpose: The three validation strategies over a rule catalog

use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use tracing::{debug, warn};

use crate::catalog::{FieldEntry, RuleCatalog};
use crate::context::{Record, ValidationContext};
use crate::errors::{ValidationErrors, Violation};
use crate::rule::Outcome;
use crate::value::Value;

/// Which strategy to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Strategy {
    /// Whole record, yes/no, stops at the first failing rule
    Model,
    /// Whole record, every violation, record-scope rules gated behind field-scope ones
    Object,
    /// One field's rules, every violation
    Property(String),
}

impl Strategy {
    pub fn kind(&self) -> StrategyKind {
        match self {
            Strategy::Model => StrategyKind::Model,
            Strategy::Object => StrategyKind::Object,
            Strategy::Property(_) => StrategyKind::Property,
        }
    }
}

/// Strategy selector without the field argument
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    Model,
    Object,
    Property,
}

#[derive(Debug, Error)]
#[error("unknown validation strategy '{0}'")]
pub struct UnknownStrategy(pub String);

impl FromStr for StrategyKind {
    type Err = UnknownStrategy;

    /// Accepts `model`/`object`/`property` as well as the
    /// `TryValidateModel`/`TryValidateObject`/`TryValidateProperty` button
    /// names, in any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "model" | "tryvalidatemodel" => Ok(StrategyKind::Model),
            "object" | "tryvalidateobject" => Ok(StrategyKind::Object),
            "property" | "tryvalidateproperty" => Ok(StrategyKind::Property),
            _ => Err(UnknownStrategy(s.to_string())),
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StrategyKind::Model => "model",
            StrategyKind::Object => "object",
            StrategyKind::Property => "property",
        })
    }
}

/// Runs catalog rules against records.
///
/// Holds nothing but a shared reference to the catalog; every call builds
/// its own context and aggregator, so the same validator may be used for
/// any number of records.
#[derive(Debug, Clone, Copy)]
pub struct Validator<'c> {
    catalog: &'c RuleCatalog,
}

impl<'c> Validator<'c> {
    pub fn new(catalog: &'c RuleCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &'c RuleCatalog {
        self.catalog
    }

    /// Dispatch on `strategy`. Always yields an aggregator; a Model verdict
    /// is wrapped with [`ValidationErrors::from_verdict`].
    pub fn run(&self, record: &dyn Record, strategy: &Strategy) -> ValidationErrors {
        match strategy {
            Strategy::Model => {
                ValidationErrors::from_verdict(self.model_label(), self.try_validate_model(record))
            }
            Strategy::Object => self.try_validate_object(record),
            Strategy::Property(field) => self.try_validate_property(record, field),
        }
    }

    /// Every field rule, then every record rule, in declaration order.
    /// Returns `false` at the first failure; which rule failed is not
    /// reported.
    pub fn try_validate_model(&self, record: &dyn Record) -> bool {
        let ctx = ValidationContext::new(record, self.catalog);
        let total = self.catalog.rule_count();
        let mut evaluated = 0usize;

        for entry in self.catalog.fields() {
            let field_ctx = ctx.for_field(entry.id());
            let value = field_ctx.value();
            for rule in entry.rules() {
                evaluated += 1;
                if !rule.evaluate(&value, &field_ctx).is_valid() {
                    debug!(
                        strategy = "model",
                        field = entry.id(),
                        rule = rule.name(),
                        evaluated,
                        total,
                        "short-circuited"
                    );
                    return false;
                }
            }
        }

        for rule in self.catalog.record_rules() {
            evaluated += 1;
            if !rule.evaluate(&Value::Null, &ctx).is_valid() {
                debug!(strategy = "model", rule = rule.name(), evaluated, total, "short-circuited");
                return false;
            }
        }

        debug!(strategy = "model", evaluated, total, "completed");
        true
    }

    /// Every violation on the record.
    ///
    /// Field rules are evaluated for every field. Record-scope rules run only
    /// when no field rule failed, so a cross-field violation is never
    /// reported alongside a field violation.
    pub fn try_validate_object(&self, record: &dyn Record) -> ValidationErrors {
        ValidationErrors::from_violations(self.model_label(), self.object_violations(record))
    }

    /// Violations of one field's rules, in declaration order.
    ///
    /// An undeclared field yields a single explanatory message.
    pub fn try_validate_property(&self, record: &dyn Record, field: &str) -> ValidationErrors {
        match self.catalog.field(field) {
            Some(entry) => ValidationErrors::from_violations(
                format!("Invalid {} Property", entry.display_name()),
                self.property_violations(record, entry),
            ),
            None => {
                warn!(field, "property validation requested for undeclared field");
                let mut builder = ValidationErrors::builder(format!("Invalid {} Property", field));
                builder.push(format!(
                    "The field '{}' is not declared on {}.",
                    field,
                    self.catalog.record_display_name()
                ));
                builder.finish()
            }
        }
    }

    /// Raw violations behind [`Validator::try_validate_object`]
    pub fn object_violations(&self, record: &dyn Record) -> Vec<Violation> {
        let mut violations = Vec::new();
        for entry in self.catalog.fields() {
            violations.extend(self.property_violations(record, entry));
        }

        if violations.is_empty() {
            let ctx = ValidationContext::new(record, self.catalog);
            for rule in self.catalog.record_rules() {
                if let Outcome::Invalid(message) = rule.evaluate(&Value::Null, &ctx) {
                    violations.push(Violation {
                        field: None,
                        rule: rule.name(),
                        message,
                    });
                }
            }
        } else if !self.catalog.record_rules().is_empty() {
            debug!(
                strategy = "object",
                field_violations = violations.len(),
                "record-scope rules skipped"
            );
        }

        debug!(strategy = "object", violations = violations.len(), "completed");
        violations
    }

    /// Raw violations of one declared field.
    ///
    /// A failing `required` rule ends the field: the remaining rules have
    /// nothing to check.
    pub fn property_violations(&self, record: &dyn Record, entry: &FieldEntry) -> Vec<Violation> {
        let ctx = ValidationContext::new(record, self.catalog).for_field(entry.id());
        let value = ctx.value();
        let mut violations = Vec::new();

        for rule in entry.rules() {
            if let Outcome::Invalid(message) = rule.evaluate(&value, &ctx) {
                violations.push(Violation {
                    field: Some(entry.id().to_string()),
                    rule: rule.name(),
                    message,
                });
                if rule.is_required() {
                    break;
                }
            }
        }
        violations
    }

    fn model_label(&self) -> String {
        format!("Invalid {} Model", self.catalog.record_display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::RuleSpec;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::collections::HashMap;

    struct MapRecord(HashMap<&'static str, Value>);

    impl Record for MapRecord {
        fn value_of(&self, field: &str) -> Value {
            self.0.get(field).cloned().unwrap_or(Value::Null)
        }
    }

    fn catalog() -> RuleCatalog {
        RuleCatalog::builder("Order")
            .field(
                "Code",
                None,
                vec![
                    RuleSpec::pattern("[A-Z]+").message("{0} must be upper case."),
                    RuleSpec::required().message("{0} is required."),
                    RuleSpec::length(2, 4).message("{0} must be {2} to {1} long."),
                ],
            )
            .field("Kind", None, vec![])
            .field("Note", None, vec![])
            .record_rule(
                RuleSpec::required_if("Kind", "gift", "Note").message("Gift orders need a note."),
            )
            .build()
            .unwrap()
    }

    fn record(pairs: &[(&'static str, &str)]) -> MapRecord {
        MapRecord(pairs.iter().map(|(k, v)| (*k, Value::from(*v))).collect())
    }

    #[rstest]
    #[case("model", StrategyKind::Model)]
    #[case("TryValidateModel", StrategyKind::Model)]
    #[case("TRYVALIDATEOBJECT", StrategyKind::Object)]
    #[case(" property ", StrategyKind::Property)]
    fn test_strategy_kind_parsing(#[case] input: &str, #[case] expected: StrategyKind) {
        assert_eq!(input.parse::<StrategyKind>().unwrap(), expected);
    }

    #[test]
    fn test_unknown_strategy() {
        let err = "validate-everything".parse::<StrategyKind>().unwrap_err();
        assert_eq!(err.to_string(), "unknown validation strategy 'validate-everything'");
    }

    #[test]
    fn test_object_collects_all_field_violations() {
        let catalog = catalog();
        let validator = Validator::new(&catalog);
        let errors = validator.try_validate_object(&record(&[("Code", "abcdef")]));

        assert_eq!(errors.label(), "Invalid Order Model");
        assert_eq!(
            errors.messages(),
            &["Code must be upper case.".to_string(), "Code must be 2 to 4 long.".to_string()]
        );
    }

    #[test]
    fn test_required_failure_ends_the_field() {
        let catalog = catalog();
        let validator = Validator::new(&catalog);
        let errors = validator.try_validate_object(&record(&[("Code", "")]));
        assert_eq!(errors.messages(), &["Code is required.".to_string()]);
    }

    #[test]
    fn test_record_rules_gated_behind_field_rules() {
        let catalog = catalog();
        let validator = Validator::new(&catalog);

        let gated = validator.try_validate_object(&record(&[("Code", "x"), ("Kind", "gift")]));
        assert_eq!(
            gated.messages(),
            &["Code must be upper case.".to_string(), "Code must be 2 to 4 long.".to_string()]
        );

        let reported = validator.try_validate_object(&record(&[("Code", "AB"), ("Kind", "gift")]));
        assert_eq!(reported.messages(), &["Gift orders need a note.".to_string()]);
    }

    #[test]
    fn test_model_short_circuits() {
        let catalog = catalog();
        let validator = Validator::new(&catalog);
        assert!(!validator.try_validate_model(&record(&[("Code", "AB"), ("Kind", "gift")])));
        assert!(validator.try_validate_model(&record(&[
            ("Code", "AB"),
            ("Kind", "gift"),
            ("Note", "wrap it")
        ])));
    }

    #[test]
    fn test_property_matches_object_subset() {
        let catalog = catalog();
        let validator = Validator::new(&catalog);
        let input = record(&[("Code", "abcdef")]);

        let object: Vec<String> = validator
            .object_violations(&input)
            .into_iter()
            .filter(|v| v.field.as_deref() == Some("Code"))
            .map(|v| v.message)
            .collect();
        let property = validator.try_validate_property(&input, "Code");

        assert_eq!(property.label(), "Invalid Code Property");
        assert_eq!(property.messages(), object.as_slice());
    }

    #[test]
    fn test_undeclared_property_is_a_message() {
        let catalog = catalog();
        let validator = Validator::new(&catalog);
        let errors = validator.try_validate_property(&record(&[]), "Nickname");
        assert_eq!(
            errors.messages(),
            &["The field 'Nickname' is not declared on Order.".to_string()]
        );
    }

    #[test]
    fn test_run_dispatch() {
        let catalog = catalog();
        let validator = Validator::new(&catalog);
        let input = record(&[("Code", "AB")]);

        assert!(validator.run(&input, &Strategy::Model).is_empty());
        assert!(validator.run(&input, &Strategy::Object).is_empty());
        assert!(validator.run(&input, &Strategy::Property("Code".to_string())).is_empty());
        assert_eq!(Strategy::Property("Code".to_string()).kind(), StrategyKind::Property);

        let bad = record(&[]);
        assert_eq!(
            validator.run(&bad, &Strategy::Model).messages(),
            &["Invalid Order Model".to_string()]
        );
    }
}
