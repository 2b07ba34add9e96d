// src/lib.rs
//! Employee directory client for the AGN recruitment backend: paginated
//! search over candidates, optimistic row actions, CSV export and a
//! persisted record of which CVs have been opened.

pub mod auth;
pub mod cli;
pub mod core;
pub mod directory;
pub mod error;
pub mod export;
pub mod share;
pub mod types;

pub use crate::core::{DirectoryConfig, EmployeeGateway, HttpGateway, KeyValueStore};
pub use directory::EmployeeDirectoryView;
pub use error::{DirectoryError, DirectoryResult};
