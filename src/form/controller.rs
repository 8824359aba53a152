use std::borrow::{Borrow, Cow};
use std::collections::BTreeMap;
use std::fmt::{Debug, Display, Formatter};

use log::{debug, trace};

use super::schema::{FieldSpec, FormModel, FormSchema};
use super::sink::SubmissionSink;

#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct FieldKey(Cow<'static, str>);

impl FieldKey {
    pub const fn new(value: &'static str) -> Self {
        Self(Cow::Borrowed(value))
    }

    pub fn owned(value: impl Into<String>) -> Self {
        Self(Cow::Owned(value.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for FieldKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for FieldKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for FieldKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for FieldKey {
    fn from(value: &'static str) -> Self {
        Self::new(value)
    }
}

impl From<String> for FieldKey {
    fn from(value: String) -> Self {
        Self::owned(value)
    }
}

/// Current value of every known field. Values are plain strings and a field,
/// once known, is never removed.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FormState {
    values: BTreeMap<FieldKey, String>,
}

impl FormState {
    pub fn with_fields(fields: impl IntoIterator<Item = FieldKey>) -> Self {
        Self {
            values: fields.into_iter().map(|key| (key, String::new())).collect(),
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.values.get(field).map(String::as_str)
    }

    /// Value of `field`, or the empty string when the field is unknown.
    pub fn value(&self, field: &str) -> &str {
        self.get(field).unwrap_or_default()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.values.contains_key(field)
    }

    pub fn keys(&self) -> impl Iterator<Item = &FieldKey> {
        self.values.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FieldKey, &str)> {
        self.values.iter().map(|(key, value)| (key, value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// True when every field holds the empty string.
    pub fn is_blank(&self) -> bool {
        self.values.values().all(String::is_empty)
    }

    pub(super) fn entry(&self, field: &str) -> Option<(&FieldKey, &str)> {
        self.values
            .get_key_value(field)
            .map(|(key, value)| (key, value.as_str()))
    }

    pub(super) fn set(&mut self, key: FieldKey, value: String) {
        self.values.insert(key, value);
    }

    pub(super) fn clear_field(&mut self, field: &str) {
        if let Some(value) = self.values.get_mut(field) {
            value.clear();
        }
    }

    pub(super) fn clear_values(&mut self) {
        for value in self.values.values_mut() {
            value.clear();
        }
    }
}

impl<K, V> FromIterator<(K, V)> for FormState
where
    K: Into<FieldKey>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

/// Frozen copy of the form values taken at submission time.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SubmittedRecord {
    state: FormState,
}

impl SubmittedRecord {
    pub(super) fn new(state: FormState) -> Self {
        Self { state }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.state.get(field)
    }

    pub fn value(&self, field: &str) -> &str {
        self.state.value(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FieldKey, &str)> {
        self.state.iter()
    }

    pub fn as_state(&self) -> &FormState {
        &self.state
    }

    pub fn into_state(self) -> FormState {
        self.state
    }
}

impl PartialEq<FormState> for SubmittedRecord {
    fn eq(&self, other: &FormState) -> bool {
        &self.state == other
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ValidationMode {
    #[default]
    OnChange,
    OnBlur,
    OnSubmit,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum UnknownFieldPolicy {
    #[default]
    Accept,
    Reject,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct FormOptions {
    pub validate_mode: ValidationMode,
    pub unknown_fields: UnknownFieldPolicy,
    pub validate_first_error_only: bool,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct FieldMeta {
    /// The value differs from the initial empty value.
    pub dirty: bool,
    pub touched: bool,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SubmitOutcome {
    Submitted,
    Suppressed,
}

#[derive(Clone, Debug)]
pub struct FormSnapshot {
    pub state: FormState,
    pub field_meta: BTreeMap<FieldKey, FieldMeta>,
    pub submit_count: u32,
    pub is_dirty: bool,
    pub is_valid: bool,
    pub can_submit: bool,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum FormError {
    UnknownField(FieldKey),
}

impl Display for FormError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FormError::UnknownField(key) => write!(f, "form has no field named `{key}`"),
        }
    }
}

impl std::error::Error for FormError {}

pub type FormResult<T> = Result<T, FormError>;

pub struct FormController {
    pub(super) options: FormOptions,
    pub(super) schema: FormSchema,
    pub(super) state: FormState,
    pub(super) field_meta: BTreeMap<FieldKey, FieldMeta>,
    pub(super) submit_count: u32,
    pub(super) show_all_errors: bool,
    sink: Box<dyn SubmissionSink>,
}

impl FormController {
    pub fn new(
        schema: FormSchema,
        options: FormOptions,
        sink: impl SubmissionSink + 'static,
    ) -> Self {
        let state = FormState::with_fields(schema.keys().cloned());
        debug!("form controller created with {} field(s)", state.len());
        Self {
            options,
            schema,
            state,
            field_meta: BTreeMap::new(),
            submit_count: 0,
            show_all_errors: false,
            sink: Box::new(sink),
        }
    }

    /// Builds a controller from a [`FormModel`] whose records reach `on_submit`
    /// already converted to the model type.
    pub fn for_model<M>(options: FormOptions, on_submit: impl Fn(M) + 'static) -> Self
    where
        M: FormModel + 'static,
    {
        Self::new(M::schema(), options, move |record: SubmittedRecord| {
            on_submit(M::from_record(&record))
        })
    }

    pub fn options(&self) -> FormOptions {
        self.options
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn value(&self, field: impl AsRef<str>) -> Option<&str> {
        self.state.get(field.as_ref())
    }

    pub fn submit_count(&self) -> u32 {
        self.submit_count
    }

    pub fn on_field_change(
        &mut self,
        field: impl AsRef<str>,
        value: impl Into<String>,
    ) -> FormResult<()> {
        let field = field.as_ref();
        let key = match self.state.entry(field) {
            Some((key, _)) => key.clone(),
            None => self.admit_unknown_field(field)?,
        };
        let value = value.into();
        let dirty = !value.is_empty();
        self.state.set(key.clone(), value);

        self.field_meta.entry(key).or_default().dirty = dirty;
        trace!("field `{field}` changed");
        Ok(())
    }

    pub fn touch(&mut self, field: impl AsRef<str>) -> FormResult<()> {
        let key = self.known_key(field.as_ref())?;
        self.field_meta.entry(key).or_default().touched = true;
        Ok(())
    }

    pub fn on_submit(&mut self) -> SubmitOutcome {
        self.submit_count = self.submit_count.saturating_add(1);

        let invalid = self.invalid_required_fields();
        if !invalid.is_empty() {
            self.show_all_errors = true;
            debug!(
                "submission suppressed, invalid required field(s): {}",
                invalid
                    .iter()
                    .map(FieldKey::as_str)
                    .collect::<Vec<_>>()
                    .join(", ")
            );
            return SubmitOutcome::Suppressed;
        }

        let record = SubmittedRecord::new(self.state.clone());
        self.sink.deliver(record);
        self.reset();
        debug!("form submitted (attempt {})", self.submit_count);
        SubmitOutcome::Submitted
    }

    pub fn reset(&mut self) {
        self.state.clear_values();
        self.field_meta.clear();
        self.show_all_errors = false;
        debug!("form reset");
    }

    pub fn reset_field(&mut self, field: impl AsRef<str>) -> FormResult<()> {
        let key = self.known_key(field.as_ref())?;
        self.state.clear_field(key.as_str());
        self.field_meta.remove(&key);
        Ok(())
    }

    pub fn field_meta(&self, field: impl AsRef<str>) -> FormResult<FieldMeta> {
        let key = self.known_key(field.as_ref())?;
        Ok(self.field_meta.get(&key).copied().unwrap_or_default())
    }

    pub fn snapshot(&self) -> FormSnapshot {
        let validation = self.validate();
        FormSnapshot {
            state: self.state.clone(),
            field_meta: self.field_meta.clone(),
            submit_count: self.submit_count,
            is_dirty: self.field_meta.values().any(|meta| meta.dirty),
            is_valid: validation.is_all_valid(),
            can_submit: self.invalid_required_fields().is_empty(),
        }
    }

    pub(super) fn known_key(&self, field: &str) -> FormResult<FieldKey> {
        self.state
            .entry(field)
            .map(|(key, _)| key.clone())
            .ok_or_else(|| FormError::UnknownField(FieldKey::owned(field)))
    }

    fn admit_unknown_field(&mut self, field: &str) -> FormResult<FieldKey> {
        let key = FieldKey::owned(field);
        match self.options.unknown_fields {
            UnknownFieldPolicy::Reject => {
                debug!("rejected change to unknown field `{field}`");
                Err(FormError::UnknownField(key))
            }
            UnknownFieldPolicy::Accept => {
                debug!("admitting unknown field `{field}`");
                self.schema.admit(FieldSpec::new(key.clone()));
                Ok(key)
            }
        }
    }
}

impl Debug for FormController {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormController")
            .field("options", &self.options)
            .field("schema", &self.schema)
            .field("state", &self.state)
            .field("field_meta", &self.field_meta)
            .field("submit_count", &self.submit_count)
            .finish_non_exhaustive()
    }
}
