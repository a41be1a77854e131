//! Match recording
//!
//! This module validates match submissions and applies them to storage together
//! with the resulting rating changes.

pub mod match_recorder;
pub mod validation;

pub use match_recorder::MatchRecorder;
pub use validation::{validate_submission, ValidatedSubmission};
