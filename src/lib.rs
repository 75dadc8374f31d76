//! Todo list manager library.
//!
//! Two independent stores share this crate: [`store::TaskStore`], a JSON-file
//! task list driven by the `todo` CLI, and [`db::Database`], a SQLite todo
//! table served over HTTP by [`api`].

pub mod api;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod format;
pub mod logging;
pub mod store;
pub mod types;
pub mod validation;
