use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use log::debug;

use super::controller::{FieldKey, FormController, FormState};

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FieldIssue {
    Required,
    InvalidEmail,
    TooLong { max: usize },
    Mismatch { other: FieldKey },
    Custom(String),
}

impl FieldIssue {
    pub fn custom(message: impl Into<String>) -> Self {
        Self::Custom(message.into())
    }

    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl Display for FieldIssue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldIssue::Required => f.write_str("this field is required"),
            FieldIssue::InvalidEmail => f.write_str("enter an email address like name@host"),
            FieldIssue::TooLong { max } => write!(f, "must be at most {max} characters"),
            FieldIssue::Mismatch { other } => write!(f, "must match `{other}`"),
            FieldIssue::Custom(message) => f.write_str(message),
        }
    }
}

pub trait FieldValidator {
    fn validate(&self, state: &FormState, value: &str) -> Result<(), FieldIssue>;
}

impl<F> FieldValidator for F
where
    F: Fn(&FormState, &str) -> Result<(), FieldIssue>,
{
    fn validate(&self, state: &FormState, value: &str) -> Result<(), FieldIssue> {
        (self)(state, value)
    }
}

pub trait FormValidator {
    fn validate(&self, state: &FormState) -> Vec<(FieldKey, FieldIssue)>;
}

impl<F> FormValidator for F
where
    F: Fn(&FormState) -> Vec<(FieldKey, FieldIssue)>,
{
    fn validate(&self, state: &FormState) -> Vec<(FieldKey, FieldIssue)> {
        (self)(state)
    }
}

/// Built-in field rules.
pub mod rules {
    use super::FieldIssue;
    use crate::form::controller::{FieldKey, FormState};

    pub fn non_empty(_state: &FormState, value: &str) -> Result<(), FieldIssue> {
        if value.is_empty() {
            Err(FieldIssue::Required)
        } else {
            Ok(())
        }
    }

    pub fn email(_state: &FormState, value: &str) -> Result<(), FieldIssue> {
        if is_plausible_email(value) {
            Ok(())
        } else {
            Err(FieldIssue::InvalidEmail)
        }
    }

    /// Loose syntactic check: somewhere in `value` a non-whitespace character
    /// sits directly before an `@` and another directly after it.
    pub fn is_plausible_email(value: &str) -> bool {
        let chars = value.chars().collect::<Vec<_>>();
        chars.windows(3).any(|window| {
            window[1] == '@' && !window[0].is_whitespace() && !window[2].is_whitespace()
        })
    }

    pub fn max_chars(max: usize) -> impl Fn(&FormState, &str) -> Result<(), FieldIssue> {
        move |_state: &FormState, value: &str| {
            if value.chars().count() > max {
                Err(FieldIssue::TooLong { max })
            } else {
                Ok(())
            }
        }
    }

    pub fn matches_field(other: FieldKey) -> impl Fn(&FormState, &str) -> Result<(), FieldIssue> {
        move |state: &FormState, value: &str| {
            if state.value(other.as_str()) == value {
                Ok(())
            } else {
                Err(FieldIssue::Mismatch {
                    other: other.clone(),
                })
            }
        }
    }
}

/// Issues found per field for one reading of the form state.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ValidationResult {
    issues: BTreeMap<FieldKey, Vec<FieldIssue>>,
}

impl ValidationResult {
    pub fn is_valid(&self, field: &str) -> bool {
        self.issues.get(field).is_none_or(Vec::is_empty)
    }

    pub fn issues(&self, field: &str) -> &[FieldIssue] {
        self.issues.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn is_all_valid(&self) -> bool {
        self.issues.values().all(Vec::is_empty)
    }

    pub fn invalid_fields(&self) -> impl Iterator<Item = &FieldKey> {
        self.issues
            .iter()
            .filter_map(|(key, issues)| (!issues.is_empty()).then_some(key))
    }
}

impl FormController {
    /// Runs every rule against the current values. Nothing is cached, so the
    /// result always reflects the latest change.
    pub fn validate(&self) -> ValidationResult {
        let mut issues = self
            .state
            .keys()
            .map(|key| (key.clone(), self.field_rule_issues(key.as_str())))
            .collect::<BTreeMap<_, _>>();

        for validator in self.schema.form_validators() {
            for (key, issue) in validator.validate(&self.state) {
                match issues.get_mut(&key) {
                    Some(field_issues) => field_issues.push(issue),
                    None => debug!("ignoring form rule issue for undeclared field `{key}`"),
                }
            }
        }

        ValidationResult { issues }
    }

    pub fn field_issues(&self, field: impl AsRef<str>) -> Vec<FieldIssue> {
        let field = field.as_ref();
        if !self.state.contains(field) {
            return Vec::new();
        }
        let mut issues = self.field_rule_issues(field);
        for validator in self.schema.form_validators() {
            issues.extend(
                validator
                    .validate(&self.state)
                    .into_iter()
                    .filter_map(|(key, issue)| (key.as_str() == field).then_some(issue)),
            );
        }
        issues
    }

    pub fn is_field_valid(&self, field: impl AsRef<str>) -> bool {
        self.field_issues(field).is_empty()
    }

    pub fn is_form_valid(&self) -> bool {
        self.validate().is_all_valid()
    }

    /// Whether a submit would go through. Only required fields gate submission.
    pub fn can_submit(&self) -> bool {
        self.invalid_required_fields().is_empty()
    }

    pub fn invalid_required_fields(&self) -> Vec<FieldKey> {
        let validation = self.validate();
        self.schema
            .fields()
            .filter(|spec| spec.is_required() && !validation.is_valid(spec.key().as_str()))
            .map(|spec| spec.key().clone())
            .collect()
    }

    fn field_rule_issues(&self, field: &str) -> Vec<FieldIssue> {
        let Some(spec) = self.schema.spec(field) else {
            return Vec::new();
        };
        let value = self.state.value(field);

        let mut issues = Vec::new();
        if spec.is_required() {
            if let Err(issue) = rules::non_empty(&self.state, value) {
                issues.push(issue);
            }
        }
        for validator in spec.validators() {
            if self.options.validate_first_error_only && !issues.is_empty() {
                break;
            }
            if let Err(issue) = validator.validate(&self.state, value) {
                issues.push(issue);
            }
        }
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::rules::is_plausible_email;

    #[test]
    fn email_check_needs_text_on_both_sides_of_at() {
        assert!(is_plausible_email("a@b"));
        assert!(is_plausible_email("ada@example.com"));
        assert!(is_plausible_email("  ada@example.com  "));
        assert!(!is_plausible_email("ab"));
        assert!(!is_plausible_email(""));
        assert!(!is_plausible_email("a@"));
        assert!(!is_plausible_email("a@ "));
        assert!(!is_plausible_email(" @b"));
        assert!(!is_plausible_email("@b"));
    }

    #[test]
    fn email_check_is_permissive_beyond_the_at_sign() {
        assert!(is_plausible_email("a@@b"));
        assert!(is_plausible_email("not an email x@y really"));
        assert!(is_plausible_email("ü@ß"));
    }
}
