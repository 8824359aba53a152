//! Headless controlled forms: string field state, live validation and a
//! submission guard that hands finished records to a caller-supplied sink.

pub mod form;
pub mod prelude;

// Lets derived code name `::boundform` from inside this crate as well.
extern crate self as boundform;
