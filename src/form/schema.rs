use std::fmt::{Debug, Formatter};

use super::controller::{FieldKey, SubmittedRecord};
use super::validation::{FieldValidator, FormValidator};

pub struct FieldSpec {
    key: FieldKey,
    required: bool,
    description: Option<String>,
    validators: Vec<Box<dyn FieldValidator>>,
}

impl FieldSpec {
    pub fn new(key: impl Into<FieldKey>) -> Self {
        Self {
            key: key.into(),
            required: false,
            description: None,
            validators: Vec::new(),
        }
    }

    /// Marks the field as gating submission. Required fields must be non-empty.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn rule<V>(mut self, validator: V) -> Self
    where
        V: FieldValidator + 'static,
    {
        self.validators.push(Box::new(validator));
        self
    }

    pub fn key(&self) -> &FieldKey {
        &self.key
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn description_text(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub(super) fn validators(&self) -> impl Iterator<Item = &dyn FieldValidator> {
        self.validators.iter().map(|validator| validator.as_ref())
    }
}

impl Debug for FieldSpec {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldSpec")
            .field("key", &self.key)
            .field("required", &self.required)
            .field("description", &self.description)
            .field("validators", &self.validators.len())
            .finish()
    }
}

/// Ordered field declarations plus cross-field rules.
#[derive(Default)]
pub struct FormSchema {
    fields: Vec<FieldSpec>,
    form_validators: Vec<Box<dyn FormValidator>>,
}

impl FormSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field. A spec with an already declared key replaces the earlier
    /// one in place.
    pub fn field(mut self, spec: FieldSpec) -> Self {
        self.admit(spec);
        self
    }

    pub fn form_rule<V>(mut self, validator: V) -> Self
    where
        V: FormValidator + 'static,
    {
        self.form_validators.push(Box::new(validator));
        self
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &FieldKey> {
        self.fields.iter().map(FieldSpec::key)
    }

    pub fn spec(&self, field: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|spec| spec.key.as_str() == field)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub(super) fn admit(&mut self, spec: FieldSpec) {
        match self.fields.iter_mut().find(|existing| existing.key == spec.key) {
            Some(existing) => *existing = spec,
            None => self.fields.push(spec),
        }
    }

    pub(super) fn form_validators(&self) -> impl Iterator<Item = &dyn FormValidator> {
        self.form_validators
            .iter()
            .map(|validator| validator.as_ref())
    }
}

impl Debug for FormSchema {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormSchema")
            .field("fields", &self.fields)
            .field("form_validators", &self.form_validators.len())
            .finish()
    }
}

/// A struct of string fields that a form can be declared from and whose
/// submitted records convert back into it. Usually derived.
pub trait FormModel: Sized {
    type Fields;

    fn fields() -> Self::Fields;
    fn schema() -> FormSchema;
    fn from_record(record: &SubmittedRecord) -> Self;
}
