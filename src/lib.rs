//! Signup - lead-capture wizard for the terminal and its survey API
//!
//! The wizard walks a prospective customer through address, service
//! interest and contact details, then posts the survey to the API, which
//! stores it in PostgreSQL or SQLite.

pub mod app;
pub mod config;
pub mod logging;
pub mod maps;
pub mod rest;
pub mod store;
pub mod submit;
pub mod ui;
pub mod wizard;
