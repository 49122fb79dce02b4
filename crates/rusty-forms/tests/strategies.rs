use pretty_assertions::assert_eq;
use proptest::prelude::{prop_assert_eq, prop_oneof, proptest, Just};
use proptest::strategy::Strategy as _;
use rstest::rstest;
use rusty_forms::employee::{self, Employee, DEPARTMENT_CODE, FIRST_NAME};
use rusty_forms::{Config, RuleCatalog, Strategy, Validator};

const DEPARTMENT_MESSAGE: &str = "The Department Code is invalid.  Valid codes are:  1A, Z7, 42.";
const AGE_MESSAGE: &str = "The user's Age must be between 16 and 110.";
const EMPLOYEE_NUMBER_MESSAGE: &str = "Employee Number is required if the Department Code is 42";
const INVALID_CHARACTERS_MESSAGE: &str = "The First Name has invalid characters.  \
    Allowable characters are alpha, numeric, spaces, and these symbols - . '.";

fn catalog() -> RuleCatalog {
    employee::catalog(&Config::default().employee).unwrap()
}

fn valid_employee() -> Employee {
    Employee {
        department_code: Some("z7".to_string()),
        age: Some(30),
        ..Employee::sample()
    }
}

#[test]
fn sample_record_fails_every_strategy_but_first_name() {
    let catalog = catalog();
    let validator = Validator::new(&catalog);
    let record = Employee::sample();

    assert!(!validator.try_validate_model(&record));

    let object = validator.try_validate_object(&record);
    assert_eq!(object.label(), "Invalid Employee Model");
    assert_eq!(object.messages(), &[DEPARTMENT_MESSAGE.to_string(), AGE_MESSAGE.to_string()]);

    let property = validator.try_validate_property(&record, FIRST_NAME);
    assert_eq!(property.label(), "Invalid First Name Property");
    assert!(property.is_empty());
}

#[test]
fn valid_record_passes_every_strategy() {
    let catalog = catalog();
    let validator = Validator::new(&catalog);
    let record = valid_employee();

    assert!(validator.try_validate_model(&record));
    assert!(validator.run(&record, &Strategy::Model).is_empty());
    assert!(validator.run(&record, &Strategy::Object).is_empty());
    for field in catalog.fields() {
        assert!(validator
            .run(&record, &Strategy::Property(field.id().to_string()))
            .is_empty());
    }
}

#[test]
fn cross_field_rule_waits_for_field_rules() {
    let catalog = catalog();
    let validator = Validator::new(&catalog);
    let underage = Employee {
        department_code: Some("42".to_string()),
        employee_number: Some(String::new()),
        age: Some(10),
        ..Employee::sample()
    };

    let gated = validator.try_validate_object(&underage);
    assert_eq!(gated.messages(), &[AGE_MESSAGE.to_string()]);
    assert!(!validator.try_validate_model(&underage));

    let adult = Employee {
        age: Some(30),
        ..underage
    };
    let reported = validator.try_validate_object(&adult);
    assert_eq!(reported.messages(), &[EMPLOYEE_NUMBER_MESSAGE.to_string()]);
    assert!(!validator.try_validate_model(&adult));

    let numbered = Employee {
        employee_number: Some("E-1001".to_string()),
        ..adult
    };
    assert!(validator.try_validate_object(&numbered).is_empty());
    assert!(validator.try_validate_model(&numbered));
}

#[rstest]
#[case(Some(""), vec!["Employee's First Name is required."])]
#[case(None, vec!["Employee's First Name is required."])]
#[case(Some("   "), vec!["Employee's First Name is required."])]
#[case(Some("Happy@Gilmore"), vec![INVALID_CHARACTERS_MESSAGE])]
#[case(Some("O'Neil-Smith Jr."), vec![])]
fn first_name_property(
    #[case] first_name: Option<&str>,
    #[case] expected: Vec<&str>,
) {
    let catalog = catalog();
    let validator = Validator::new(&catalog);
    let record = Employee {
        first_name: first_name.map(str::to_string),
        ..valid_employee()
    };
    let errors = validator.try_validate_property(&record, FIRST_NAME);
    assert_eq!(errors.messages(), expected.as_slice());
}

#[test]
fn first_name_collects_length_and_pattern() {
    let catalog = catalog();
    let validator = Validator::new(&catalog);
    let record = Employee {
        first_name: Some("@".repeat(51)),
        ..valid_employee()
    };
    let errors = validator.try_validate_property(&record, FIRST_NAME);
    assert_eq!(
        errors.messages(),
        &[
            "The First Name length must be between 1 and 50 characters.".to_string(),
            INVALID_CHARACTERS_MESSAGE.to_string(),
        ]
    );
}

#[test]
fn property_ignores_cross_field_rule() {
    let catalog = catalog();
    let validator = Validator::new(&catalog);
    let record = Employee {
        department_code: Some("42".to_string()),
        employee_number: None,
        ..valid_employee()
    };
    assert!(validator
        .try_validate_property(&record, DEPARTMENT_CODE)
        .is_empty());
    assert!(validator
        .try_validate_property(&record, employee::EMPLOYEE_NUMBER)
        .is_empty());
}

#[test]
fn undeclared_property() {
    let catalog = catalog();
    let validator = Validator::new(&catalog);
    let errors = validator.try_validate_property(&Employee::sample(), "Salary");
    assert_eq!(
        errors.messages(),
        &["The field 'Salary' is not declared on Employee.".to_string()]
    );
}

fn employee_strategy() -> impl proptest::strategy::Strategy<Value = Employee> {
    let text = |pattern: &'static str| proptest::option::of(pattern);
    (
        text("[a-zA-Z @']{0,12}"),
        text("[a-zA-Z ]{0,8}"),
        text("[a-zA-Z0-9 ]{0,8}"),
        proptest::option::of(prop_oneof![
            Just("42".to_string()),
            Just("1a".to_string()),
            Just("Z7".to_string()),
            "[a-z0-9]{0,3}",
        ]),
        text("[A-Z0-9]{0,12}"),
        proptest::option::of(0i64..130),
        proptest::option::of(0i64..6),
        text("[a-z ]{0,8}"),
    )
        .prop_map(
            |(
                first_name,
                last_name,
                address,
                department_code,
                employee_number,
                age,
                status,
                description,
            )| Employee {
                first_name,
                last_name,
                address,
                department_code,
                employee_number,
                age,
                status,
                description,
            },
        )
}

proptest! {
    #[test]
    fn model_verdict_matches_object_emptiness(record in employee_strategy()) {
        let catalog = catalog();
        let validator = Validator::new(&catalog);
        prop_assert_eq!(
            validator.try_validate_model(&record),
            validator.try_validate_object(&record).is_empty()
        );
    }

    #[test]
    fn property_messages_are_the_objects_field_messages(record in employee_strategy()) {
        let catalog = catalog();
        let validator = Validator::new(&catalog);
        let object = validator.object_violations(&record);

        for entry in catalog.fields() {
            let expected: Vec<String> = object
                .iter()
                .filter(|v| v.field.as_deref() == Some(entry.id()))
                .map(|v| v.message.clone())
                .collect();
            let property = validator.try_validate_property(&record, entry.id());
            prop_assert_eq!(property.messages(), expected.as_slice());
        }
    }

    #[test]
    fn strategies_are_idempotent(record in employee_strategy()) {
        let catalog = catalog();
        let validator = Validator::new(&catalog);
        let strategies = [
            Strategy::Model,
            Strategy::Object,
            Strategy::Property(FIRST_NAME.to_string()),
        ];
        for strategy in strategies {
            prop_assert_eq!(validator.run(&record, &strategy), validator.run(&record, &strategy));
        }
    }
}
