// File: src/employee.rs
// Purpose: The employee record and its rule catalog

use serde::{Deserialize, Serialize};

use crate::catalog::{RegistrationError, RuleCatalog};
use crate::config::EmployeeRulesConfig;
use crate::context::Record;
use crate::rule::{DeclaredEnum, RuleSpec};
use crate::value::Value;

pub const FIRST_NAME: &str = "FirstName";
pub const LAST_NAME: &str = "LastName";
pub const ADDRESS: &str = "Address";
pub const DEPARTMENT_CODE: &str = "DepartmentCode";
pub const EMPLOYEE_NUMBER: &str = "EmployeeNumber";
pub const AGE: &str = "Age";
pub const STATUS: &str = "Status";
pub const DESCRIPTION: &str = "Description";

/// Alphanumerics, spaces and the symbols `-` `.` `'`
pub const NAME_PATTERN: &str = r"[a-zA-Z0-9 -.']*";

const INVALID_CHARACTERS: &str =
    "The {0} has invalid characters.  Allowable characters are alpha, numeric, spaces, and these symbols - . '.";

/// Employee record as submitted by a form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Employee {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub department_code: Option<String>,
    #[serde(default)]
    pub employee_number: Option<String>,
    #[serde(default)]
    pub age: Option<i64>,
    #[serde(default)]
    pub status: Option<i64>,
    #[serde(default)]
    pub description: Option<String>,
}

impl Employee {
    /// The record the model-test page starts from: valid names, but an
    /// underage employee in an unknown department.
    pub fn sample() -> Self {
        Self {
            first_name: Some("Happy".to_string()),
            last_name: Some("Gilmore".to_string()),
            address: Some("1 Putter Lane".to_string()),
            department_code: Some("7".to_string()),
            employee_number: Some(String::new()),
            age: Some(10),
            status: Some(1),
            description: Some(String::new()),
        }
    }
}

impl Record for Employee {
    fn value_of(&self, field: &str) -> Value {
        match field {
            FIRST_NAME => self.first_name.clone().into(),
            LAST_NAME => self.last_name.clone().into(),
            ADDRESS => self.address.clone().into(),
            DEPARTMENT_CODE => self.department_code.clone().into(),
            EMPLOYEE_NUMBER => self.employee_number.clone().into(),
            AGE => self.age.into(),
            STATUS => self.status.into(),
            DESCRIPTION => self.description.clone().into(),
            _ => Value::Null,
        }
    }
}

/// Employment status codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmployeeStatus {
    Active = 1,
    Inactive = 2,
    OnLeave = 3,
    Retired = 4,
}

impl DeclaredEnum for EmployeeStatus {
    const NAME: &'static str = "EmployeeStatus";

    fn declared_values() -> Vec<i64> {
        [
            EmployeeStatus::Active,
            EmployeeStatus::Inactive,
            EmployeeStatus::OnLeave,
            EmployeeStatus::Retired,
        ]
        .into_iter()
        .map(|status| status as i64)
        .collect()
    }
}

/// Rule catalog for [`Employee`]
pub fn catalog(config: &EmployeeRulesConfig) -> Result<RuleCatalog, RegistrationError> {
    RuleCatalog::builder("Employee")
        .field(
            FIRST_NAME,
            Some("First Name"),
            vec![
                RuleSpec::required().message("Employee's {0} is required."),
                RuleSpec::length(1, 50)
                    .message("The {0} length must be between {2} and {1} characters."),
                RuleSpec::pattern(NAME_PATTERN).message(INVALID_CHARACTERS),
            ],
        )
        .field(
            LAST_NAME,
            Some("Last Name"),
            vec![
                RuleSpec::required().message("Employee's {0} is required."),
                RuleSpec::length(1, 75).message("The {0} length must be between {2} and {1}"),
                RuleSpec::pattern(NAME_PATTERN).message(INVALID_CHARACTERS),
            ],
        )
        .field(
            ADDRESS,
            Some("Address"),
            vec![
                RuleSpec::required().message("Employee's {0} is required."),
                RuleSpec::length(1, 150).message("The {0} length must be between {2} and {1}"),
                RuleSpec::pattern(NAME_PATTERN).message(INVALID_CHARACTERS),
            ],
        )
        .field(
            DEPARTMENT_CODE,
            Some("Department Code"),
            vec![
                RuleSpec::required().message("Employee's {0} is required"),
                RuleSpec::whitelist(config.allowed_department_codes.iter().cloned())
                    .adapter("departmentcode")
                    .message("The {0} is invalid.  Valid codes are:  {1}."),
            ],
        )
        .field(
            EMPLOYEE_NUMBER,
            Some("Employee Number"),
            vec![RuleSpec::max_length(10)
                .message("The {0} length must be no more than 10 characters.")],
        )
        .field(
            AGE,
            Some("Age"),
            vec![
                RuleSpec::required().message("Employees's {0} is required."),
                RuleSpec::range(config.age_min, config.age_max)
                    .message("The user's {0} must be between {1} and {2}."),
            ],
        )
        .field(
            STATUS,
            Some("Status"),
            vec![
                RuleSpec::required().message("Employees's {0} is required."),
                RuleSpec::enum_member::<EmployeeStatus>().message("Invalid {0} selected."),
            ],
        )
        .field(
            DESCRIPTION,
            Some("Description of Employee"),
            vec![RuleSpec::max_length(250).message("The {0} length must be between {2} and {1}")],
        )
        .record_rule(
            RuleSpec::required_if(
                DEPARTMENT_CODE,
                config.employee_number_department.clone(),
                EMPLOYEE_NUMBER,
            )
            .message(format!(
                "Employee Number is required if the Department Code is {}",
                config.employee_number_department
            )),
        )
        .build()
}
