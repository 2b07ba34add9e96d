// src/core/mod.rs
//! Collaborators the directory view is wired to: config, backend, storage

pub mod config_manager;
pub mod fs_ops;
pub mod gateway;
pub mod store;

pub use config_manager::DirectoryConfig;
pub use fs_ops::FsOps;
pub use gateway::{CvUpload, EmployeeGateway, HttpGateway, PageQuery};
pub use store::{JsonFileStore, KeyValueStore, MemoryStore};
