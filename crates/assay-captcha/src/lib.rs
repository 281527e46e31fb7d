//! Arithmetic CAPTCHA solver.
//!
//! Feedback and registration forms in the shop under test ask questions like
//! `What is 3+4-10 ?`. [`solve_question`] pulls the expression out of such a
//! question and [`evaluate`] computes it.
//!
//! Expressions use `+`, `-` and `*` over non-negative integers, with an
//! optional leading minus, and are evaluated strictly left to right: there
//! is no operator precedence, so `1+2*3` is `9`.

pub mod error;
pub mod expr;

pub use error::{CaptchaError, Result};
pub use expr::{evaluate, find_expression, solve_question};
