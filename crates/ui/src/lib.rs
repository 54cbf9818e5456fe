#![forbid(unsafe_code)]

//! View models for the quiz screens.
//!
//! Everything here is plain data derived from `quiz_core` snapshots, so any
//! front end (the terminal binary included) can render it.

pub mod vm;

pub use vm::{IntroVm, QuestionScreenVm, ResultsVm};
