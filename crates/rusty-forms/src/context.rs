// File: src/context.rs
// Purpose: Per-call validation context and the record abstraction

use crate::catalog::RuleCatalog;
use crate::value::Value;

/// A record whose fields can be read by identifier.
///
/// Unknown identifiers read as [`Value::Null`].
pub trait Record {
    fn value_of(&self, field: &str) -> Value;
}

/// Resolves a field identifier to its display name
pub trait DisplayNames {
    /// Falls back to `field` itself when no display name was declared.
    fn display_name_of<'a>(&'a self, field: &'a str) -> &'a str;
}

/// Everything a rule may look at while it is evaluated.
///
/// Created for one validation call and dropped with it. The record is only
/// ever borrowed immutably.
#[derive(Clone, Copy)]
pub struct ValidationContext<'a> {
    record: &'a dyn Record,
    catalog: &'a RuleCatalog,
    target: Option<&'a str>,
}

impl<'a> ValidationContext<'a> {
    /// Context for record-scope rules
    pub fn new(record: &'a dyn Record, catalog: &'a RuleCatalog) -> Self {
        Self {
            record,
            catalog,
            target: None,
        }
    }

    /// Same record and catalog, scoped to `field`
    pub fn for_field(&self, field: &'a str) -> Self {
        Self {
            target: Some(field),
            ..*self
        }
    }

    pub fn record(&self) -> &'a dyn Record {
        self.record
    }

    pub fn target_field(&self) -> Option<&'a str> {
        self.target
    }

    /// Current value of the target field, `Null` outside a field scope
    pub fn value(&self) -> Value {
        self.target
            .map(|field| self.record.value_of(field))
            .unwrap_or(Value::Null)
    }

    /// Display name of the target field, or of the record outside a field scope
    pub fn display_name(&self) -> &'a str {
        match self.target {
            Some(field) => self.catalog.display_name_of(field),
            None => self.catalog.record_display_name(),
        }
    }

    pub fn record_display_name(&self) -> &'a str {
        self.catalog.record_display_name()
    }
}

impl DisplayNames for ValidationContext<'_> {
    fn display_name_of<'b>(&'b self, field: &'b str) -> &'b str {
        self.catalog.display_name_of(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::RuleCatalog;
    use crate::rule::RuleSpec;
    use std::collections::HashMap;

    struct MapRecord(HashMap<&'static str, Value>);

    impl Record for MapRecord {
        fn value_of(&self, field: &str) -> Value {
            self.0.get(field).cloned().unwrap_or(Value::Null)
        }
    }

    fn catalog() -> RuleCatalog {
        RuleCatalog::builder("Employee")
            .field("FirstName", Some("First Name"), vec![RuleSpec::required()])
            .field("Age", None, vec![RuleSpec::range(16, 110)])
            .build()
            .unwrap()
    }

    #[test]
    fn test_display_name_resolution() {
        let catalog = catalog();
        let record = MapRecord(HashMap::new());
        let ctx = ValidationContext::new(&record, &catalog);

        assert_eq!(ctx.display_name(), "Employee");
        assert_eq!(ctx.for_field("FirstName").display_name(), "First Name");
        // No declared display name: raw identifier
        assert_eq!(ctx.for_field("Age").display_name(), "Age");
        assert_eq!(ctx.display_name_of("Nickname"), "Nickname");
    }

    #[test]
    fn test_field_scope_value() {
        let catalog = catalog();
        let record = MapRecord(HashMap::from([("FirstName", Value::from("Happy"))]));
        let ctx = ValidationContext::new(&record, &catalog);

        assert_eq!(ctx.target_field(), None);
        assert_eq!(ctx.value(), Value::Null);

        let field_ctx = ctx.for_field("FirstName");
        assert_eq!(field_ctx.target_field(), Some("FirstName"));
        assert_eq!(field_ctx.value(), Value::from("Happy"));
        assert_eq!(field_ctx.for_field("Age").value(), Value::Null);
    }
}
