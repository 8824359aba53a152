pub use crate::form::{
    FieldIssue, FieldKey, FieldProps, FieldSpec, FormController, FormEvent, FormModel,
    FormOptions, FormResult, FormSchema, FormState, RecordCollector, SubmitOutcome,
    SubmittedRecord, UnknownFieldPolicy, ValidationMode, rules,
};
