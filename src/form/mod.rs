mod binding;
mod controller;
mod schema;
mod sink;
mod validation;


pub use boundform_derive::FormModel;
pub use binding::{FieldProps, FormEvent};
pub use controller::{
    FieldKey, FieldMeta, FormController, FormError, FormOptions, FormResult, FormSnapshot,
    FormState, SubmitOutcome, SubmittedRecord, UnknownFieldPolicy, ValidationMode,
};
pub use schema::{FieldSpec, FormModel, FormSchema};
pub use sink::{ChannelSink, RecordCollector, SubmissionSink};
pub use validation::{FieldIssue, FieldValidator, FormValidator, ValidationResult, rules};
