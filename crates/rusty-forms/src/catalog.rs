// File: src/catalog.rs
// Purpose: Rule catalog registration and lookup

use thiserror::Error;

use crate::context::DisplayNames;
use crate::rule::{Rule, RuleSpec, Scope};

/// Key under which record-scope rules are filed
pub const RECORD_KEY: &str = "";

/// Malformed rule configuration, reported when a catalog is built
#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("whitelist rule has no allowed values")]
    EmptyWhitelist,

    #[error("whitelist rule has a blank allowed value")]
    BlankAllowedValue,

    #[error("allowed value '{0}' contains the ',' delimiter")]
    DelimiterInAllowedValue(String),

    #[error("invalid client adapter name '{0}': expected lowercase ASCII letters and digits")]
    InvalidAdapter(String),

    #[error("{rule} rule has min {min} greater than max {max}")]
    InvertedBounds {
        rule: &'static str,
        min: String,
        max: String,
    },

    #[error("invalid pattern '{pattern}': {error}")]
    InvalidPattern {
        pattern: String,
        #[source]
        error: regex::Error,
    },

    #[error("enum {0} declares no values")]
    EmptyEnum(String),

    #[error("field identifiers must not be empty")]
    BlankFieldId,

    #[error("field '{0}' is declared more than once")]
    DuplicateField(String),

    #[error("{rule} is a record-scope rule and cannot be attached to field '{field}'")]
    RecordRuleOnField { rule: &'static str, field: String },

    #[error("{rule} is a field-scope rule and cannot be attached to the record")]
    FieldRuleOnRecord { rule: &'static str },

    #[error("{rule} rule refers to undeclared field '{field}'")]
    UndeclaredField { rule: &'static str, field: String },

    #[error("field '{field}': {source}")]
    Field {
        field: String,
        source: Box<RegistrationError>,
    },
}

/// A declared field and its ordered rules
#[derive(Debug, Clone)]
pub struct FieldEntry {
    id: String,
    display_name: Option<String>,
    rules: Vec<Rule>,
}

impl FieldEntry {
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Declared display name, or the identifier
    pub fn display_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.id)
    }

    /// Rules in evaluation order (`required` first)
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }
}

/// Immutable set of rules for one record type.
///
/// Built once with [`RuleCatalog::builder`] and read-only afterwards, so a
/// catalog can be shared freely between threads and calls.
#[derive(Debug, Clone)]
pub struct RuleCatalog {
    record_name: String,
    fields: Vec<FieldEntry>,
    record_rules: Vec<Rule>,
}

impl RuleCatalog {
    pub fn builder(record_name: impl Into<String>) -> RuleCatalogBuilder {
        RuleCatalogBuilder {
            record_name: record_name.into(),
            fields: Vec::new(),
            record_rules: Vec::new(),
        }
    }

    pub fn record_display_name(&self) -> &str {
        &self.record_name
    }

    /// Fields in declaration order
    pub fn fields(&self) -> &[FieldEntry] {
        &self.fields
    }

    pub fn field(&self, id: &str) -> Option<&FieldEntry> {
        self.fields.iter().find(|entry| entry.id == id)
    }

    pub fn record_rules(&self) -> &[Rule] {
        &self.record_rules
    }

    /// Rules filed under `key`: a field identifier, or [`RECORD_KEY`]
    pub fn rules_for(&self, key: &str) -> &[Rule] {
        if key == RECORD_KEY {
            return &self.record_rules;
        }
        self.field(key).map(FieldEntry::rules).unwrap_or(&[])
    }

    /// Total number of registered rules
    pub fn rule_count(&self) -> usize {
        self.fields.iter().map(|f| f.rules.len()).sum::<usize>() + self.record_rules.len()
    }
}

impl DisplayNames for RuleCatalog {
    fn display_name_of<'a>(&'a self, field: &'a str) -> &'a str {
        self.field(field)
            .map(FieldEntry::display_name)
            .unwrap_or(field)
    }
}

/// Collects field and record declarations for a [`RuleCatalog`]
#[derive(Debug)]
pub struct RuleCatalogBuilder {
    record_name: String,
    fields: Vec<(String, Option<String>, Vec<RuleSpec>)>,
    record_rules: Vec<RuleSpec>,
}

impl RuleCatalogBuilder {
    /// Declare a field with an optional display name and its rules
    pub fn field(
        mut self,
        id: impl Into<String>,
        display_name: Option<&str>,
        rules: Vec<RuleSpec>,
    ) -> Self {
        self.fields
            .push((id.into(), display_name.map(str::to_string), rules));
        self
    }

    /// Attach a record-scope rule
    pub fn record_rule(mut self, rule: RuleSpec) -> Self {
        self.record_rules.push(rule);
        self
    }

    /// Validate every declaration and freeze the catalog.
    ///
    /// This is the only place a malformed rule is reported.
    pub fn build(self) -> Result<RuleCatalog, RegistrationError> {
        let mut fields: Vec<FieldEntry> = Vec::with_capacity(self.fields.len());

        for (id, display_name, specs) in self.fields {
            if id.is_empty() {
                return Err(RegistrationError::BlankFieldId);
            }
            if fields.iter().any(|entry| entry.id == id) {
                return Err(RegistrationError::DuplicateField(id));
            }

            let mut rules = Vec::with_capacity(specs.len());
            for spec in specs {
                if spec.scope() == Scope::Record {
                    return Err(RegistrationError::RecordRuleOnField {
                        rule: spec.name(),
                        field: id,
                    });
                }
                let rule = spec.compile().map_err(|source| RegistrationError::Field {
                    field: id.clone(),
                    source: Box::new(source),
                })?;
                rules.push(rule);
            }
            // Required rules run first; stable for the rest
            rules.sort_by_key(|rule| !rule.is_required());

            fields.push(FieldEntry {
                id,
                display_name,
                rules,
            });
        }

        let mut record_rules = Vec::with_capacity(self.record_rules.len());
        for spec in self.record_rules {
            if spec.scope() == Scope::Field {
                return Err(RegistrationError::FieldRuleOnRecord { rule: spec.name() });
            }
            if let Some(missing) = spec
                .referenced_fields()
                .into_iter()
                .find(|field| !fields.iter().any(|entry| entry.id == *field))
            {
                return Err(RegistrationError::UndeclaredField {
                    rule: spec.name(),
                    field: missing.to_string(),
                });
            }
            record_rules.push(spec.compile()?);
        }

        let catalog = RuleCatalog {
            record_name: self.record_name,
            fields,
            record_rules,
        };
        tracing::debug!(
            record = %catalog.record_name,
            fields = catalog.fields.len(),
            rules = catalog.rule_count(),
            "rule catalog registered"
        );
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_rules_move_first() {
        let catalog = RuleCatalog::builder("Employee")
            .field(
                "FirstName",
                None,
                vec![RuleSpec::length(1, 50), RuleSpec::pattern("[a-z]*"), RuleSpec::required()],
            )
            .build()
            .unwrap();

        let names: Vec<&str> = catalog.rules_for("FirstName").iter().map(Rule::name).collect();
        assert_eq!(names, vec!["required", "length", "pattern"]);
    }

    #[test]
    fn test_record_rules_under_reserved_key() {
        let catalog = RuleCatalog::builder("Employee")
            .field("DepartmentCode", None, vec![])
            .field("EmployeeNumber", None, vec![])
            .record_rule(RuleSpec::required_if("DepartmentCode", "42", "EmployeeNumber"))
            .build()
            .unwrap();

        assert_eq!(catalog.rules_for(RECORD_KEY).len(), 1);
        assert_eq!(catalog.record_rules()[0].name(), "required_if");
        assert!(catalog.rules_for("Unknown").is_empty());
        assert_eq!(catalog.rule_count(), 1);
    }

    #[test]
    fn test_duplicate_field_rejected() {
        let result = RuleCatalog::builder("Employee")
            .field("Age", None, vec![])
            .field("Age", None, vec![])
            .build();
        assert!(matches!(result, Err(RegistrationError::DuplicateField(f)) if f == "Age"));
    }

    #[test]
    fn test_blank_field_rejected() {
        let result = RuleCatalog::builder("Employee").field("", None, vec![]).build();
        assert!(matches!(result, Err(RegistrationError::BlankFieldId)));
    }

    #[test]
    fn test_scope_mismatch_rejected() {
        let result = RuleCatalog::builder("Employee")
            .field(
                "DepartmentCode",
                None,
                vec![RuleSpec::required_if("DepartmentCode", "42", "DepartmentCode")],
            )
            .build();
        assert!(matches!(result, Err(RegistrationError::RecordRuleOnField { .. })));

        let result = RuleCatalog::builder("Employee")
            .record_rule(RuleSpec::required())
            .build();
        assert!(matches!(result, Err(RegistrationError::FieldRuleOnRecord { rule: "required" })));
    }

    #[test]
    fn test_cross_field_rule_needs_declared_fields() {
        let result = RuleCatalog::builder("Employee")
            .field("DepartmentCode", None, vec![])
            .record_rule(RuleSpec::required_if("DepartmentCode", "42", "EmployeeNumber"))
            .build();
        assert!(matches!(
            result,
            Err(RegistrationError::UndeclaredField { field, .. }) if field == "EmployeeNumber"
        ));
    }

    #[test]
    fn test_rule_fault_names_the_field() {
        let result = RuleCatalog::builder("Employee")
            .field("DepartmentCode", None, vec![RuleSpec::whitelist(Vec::<String>::new())])
            .build();
        let err = result.unwrap_err();
        assert_eq!(
            err.to_string(),
            "field 'DepartmentCode': whitelist rule has no allowed values"
        );
    }

    #[test]
    fn test_display_names() {
        let catalog = RuleCatalog::builder("Employee")
            .field("FirstName", Some("First Name"), vec![])
            .field("Age", None, vec![])
            .build()
            .unwrap();
        assert_eq!(catalog.display_name_of("FirstName"), "First Name");
        assert_eq!(catalog.display_name_of("Age"), "Age");
        assert_eq!(catalog.display_name_of("Missing"), "Missing");
        assert_eq!(catalog.field("FirstName").map(FieldEntry::display_name), Some("First Name"));
    }
}
