use super::controller::{
    FieldKey, FormController, FormError, FormResult, SubmitOutcome, ValidationMode,
};
use super::validation::FieldIssue;

/// Everything a view needs to render one controlled input.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FieldProps {
    pub key: FieldKey,
    pub value: String,
    pub required: bool,
    pub description: Option<String>,
    pub valid: bool,
    /// First issue message, present only once the validation mode allows it
    /// to be shown.
    pub error: Option<String>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FormEvent {
    Changed { field: FieldKey, value: String },
    Blurred { field: FieldKey },
    SubmitRequested,
    Reset,
}

impl FormEvent {
    pub fn changed(field: impl Into<FieldKey>, value: impl Into<String>) -> Self {
        Self::Changed {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn blurred(field: impl Into<FieldKey>) -> Self {
        Self::Blurred {
            field: field.into(),
        }
    }
}

impl FormController {
    pub fn handle(&mut self, event: FormEvent) -> FormResult<Option<SubmitOutcome>> {
        match event {
            FormEvent::Changed { field, value } => {
                self.on_field_change(field, value)?;
                Ok(None)
            }
            FormEvent::Blurred { field } => {
                self.touch(field)?;
                Ok(None)
            }
            FormEvent::SubmitRequested => Ok(Some(self.on_submit())),
            FormEvent::Reset => {
                self.reset();
                Ok(None)
            }
        }
    }

    pub fn field_props(&self, field: impl AsRef<str>) -> FormResult<FieldProps> {
        let field = field.as_ref();
        let Some((key, value)) = self.state.entry(field) else {
            return Err(FormError::UnknownField(FieldKey::owned(field)));
        };
        let spec = self.schema.spec(field);
        let issues = self.field_issues(field);
        let error = if self.should_display_errors(field) {
            issues.first().map(FieldIssue::message)
        } else {
            None
        };

        Ok(FieldProps {
            key: key.clone(),
            value: value.to_owned(),
            required: spec.is_some_and(|spec| spec.is_required()),
            description: spec
                .and_then(|spec| spec.description_text())
                .map(str::to_owned),
            valid: issues.is_empty(),
            error,
        })
    }

    /// Props for every field in declaration order.
    pub fn all_field_props(&self) -> FormResult<Vec<FieldProps>> {
        self.schema
            .keys()
            .map(|key| self.field_props(key))
            .collect()
    }

    pub fn field_error_for_display(&self, field: impl AsRef<str>) -> FormResult<Option<String>> {
        Ok(self.field_props(field)?.error)
    }

    fn should_display_errors(&self, field: &str) -> bool {
        if self.show_all_errors {
            return true;
        }
        let meta = self.field_meta.get(field).copied().unwrap_or_default();
        match self.options.validate_mode {
            ValidationMode::OnChange => meta.dirty || meta.touched,
            ValidationMode::OnBlur => meta.touched,
            ValidationMode::OnSubmit => false,
        }
    }
}
