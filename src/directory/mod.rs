// src/directory/mod.rs
//! The employee directory view and the pieces it is built from

pub mod cache;
pub mod filter;
pub mod mutation;
pub mod notification;
pub mod state;
pub mod view;
pub mod viewed;

#[cfg(test)]
pub(crate) mod testing;

pub use cache::RowCache;
pub use filter::filter_rows;
pub use mutation::{Mutation, MutationResult, RowPatch};
pub use notification::{Level, Notification, Notifications};
pub use state::{FetchKind, FetchOutcome, FetchRequest, PaginationState, Phase, ScrollPosition};
pub use view::EmployeeDirectoryView;
pub use viewed::{CvBadge, ViewedCvRegistry};
