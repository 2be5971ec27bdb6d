#![forbid(unsafe_code)]

//! Persistence for the quiz settings blob: a repository trait with an
//! in-memory implementation for tests and a `SQLite` backend for the app.

pub mod repository;
pub mod sqlite;
