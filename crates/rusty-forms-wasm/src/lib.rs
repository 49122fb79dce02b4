//! Rusty-Forms WASM
//!
//! Client-side evaluation of whitelist rules from the attribute tokens the
//! server emits (`data-val-<adapter>` and `data-val-<adapter>-allowed`).
//!
//! Does not depend on `rusty-forms`: the tokens are the whole contract, and
//! the verdict here must match the server's for every input.

use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

/// Set panic hook for better error messages in the browser
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Validation error returned to JavaScript
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

/// Tokens read from a field's `data-val-*` attributes
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AllowedRules {
    /// Comma-separated, upper-cased allowed values
    pub allowed: String,
    /// Pre-formatted error message
    #[serde(default)]
    pub message: Option<String>,
}

/// Membership check against an allowed-list token.
///
/// An absent value is rejected. Otherwise the value is upper-cased and
/// compared with each comma-separated entry of the token, trimmed.
pub fn is_allowed(value: Option<&str>, allowed: &str) -> bool {
    let Some(value) = value else {
        return false;
    };
    let value = value.to_uppercase();
    allowed.split(',').any(|entry| entry.trim() == value)
}

/// Errors for one field (empty if the value is allowed)
pub fn check_field(
    field_name: &str,
    value: Option<&str>,
    rules: &AllowedRules,
) -> Vec<ValidationError> {
    if is_allowed(value, &rules.allowed) {
        return Vec::new();
    }
    vec![ValidationError {
        field: field_name.to_string(),
        message: rules
            .message
            .clone()
            .unwrap_or_else(|| format!("{} is not an allowed value", field_name)),
    }]
}

/// Validate a single field value against whitelist tokens
///
/// # Example (JavaScript)
/// ```javascript
/// const input = document.getElementById('DepartmentCode');
/// const errors = validateAllowed('DepartmentCode', input.value, {
///     allowed: input.dataset.valDepartmentcodeAllowed,
///     message: input.dataset.valDepartmentcode,
/// });
/// ```
#[wasm_bindgen(js_name = validateAllowed)]
pub fn validate_allowed(
    field_name: &str,
    value: Option<String>,
    rules: JsValue,
) -> Result<JsValue, JsValue> {
    let rules: AllowedRules = serde_wasm_bindgen::from_value(rules)
        .map_err(|e| JsValue::from_str(&format!("Failed to parse rules: {}", e)))?;

    let errors = check_field(field_name, value.as_deref(), &rules);
    Ok(serde_wasm_bindgen::to_value(&errors)?)
}

/// Quick membership check
#[wasm_bindgen(js_name = isAllowed)]
pub fn is_allowed_js(value: Option<String>, allowed: &str) -> bool {
    is_allowed(value.as_deref(), allowed)
}
