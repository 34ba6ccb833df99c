//! Use cases (application services)
//!
//! - [`run_answer`] - route, prompt, call, validate, correct once

pub mod run_answer;
