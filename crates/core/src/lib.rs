#![forbid(unsafe_code)]

//! Domain model and filtering logic for the quiz application.
//!
//! Everything here is pure and synchronous: the filter engine derives the
//! eligible question set from a [`model::Dataset`] and a [`model::Selection`],
//! and [`model::History`] bounds how soon a question may repeat. IO, random
//! selection, and persistence live in the outer crates.

pub mod filter;
pub mod model;
pub mod time;

pub use time::Clock;
