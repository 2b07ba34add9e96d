// src/types/mod.rs
pub mod employee;
pub mod response;

pub use employee::{Column, CvKind, EmployeeId, EmployeeRecord, EmployeeStatus, PLACEHOLDER};
pub use response::{CvUrls, EmployeePage};
