// src/directory/mutation.rs
//! Row mutations: commands sent to the backend and the patches they yield
//!
//! Local rows change only after the backend confirms. Every command resolves to
//! a [`MutationResult`] and [`reduce`] is the single place a result touches the
//! cache and the notification queue.

use tracing::{info, warn};

use crate::core::gateway::{CvUpload, EmployeeGateway};
use crate::directory::cache::RowCache;
use crate::directory::notification::Notifications;
use crate::error::{DirectoryError, DirectoryResult};
use crate::types::employee::{EmployeeId, EmployeeStatus};
use crate::types::response::CvUrls;

/// Change to apply to one cached row.
#[derive(Debug, Clone, PartialEq)]
pub enum RowPatch {
    Remove { id: EmployeeId },
    SetCv { id: EmployeeId, urls: CvUrls },
    SetStatus { id: EmployeeId, status: EmployeeStatus },
}

pub type MutationResult = DirectoryResult<RowPatch>;

#[derive(Debug, Clone)]
pub enum Mutation {
    Delete { id: EmployeeId },
    UpdateCv { id: EmployeeId, upload: CvUpload },
    MarkAppointed { id: EmployeeId },
}

impl Mutation {
    pub fn id(&self) -> EmployeeId {
        match self {
            Mutation::Delete { id }
            | Mutation::UpdateCv { id, .. }
            | Mutation::MarkAppointed { id } => *id,
        }
    }

    /// Send the command. `token` is only consulted by `MarkAppointed`, which
    /// fails locally without one.
    pub async fn dispatch(
        &self,
        gateway: &dyn EmployeeGateway,
        token: Option<&str>,
    ) -> MutationResult {
        match self {
            Mutation::Delete { id } => {
                gateway.delete_employee(*id).await?;
                Ok(RowPatch::Remove { id: *id })
            }
            Mutation::UpdateCv { id, upload } => {
                let urls = gateway.update_cv(*id, upload).await?;
                Ok(RowPatch::SetCv { id: *id, urls })
            }
            Mutation::MarkAppointed { id } => {
                let token = token.filter(|t| !t.trim().is_empty()).ok_or_else(|| {
                    DirectoryError::Validation("Admin login required to appoint employees".into())
                })?;
                gateway.appoint_employee(*id, token).await?;
                Ok(RowPatch::SetStatus {
                    id: *id,
                    status: EmployeeStatus::Appointed,
                })
            }
        }
    }
}

/// Fold a mutation result into the cache and report it. Returns true when the
/// cache changed.
pub fn reduce(
    cache: &mut RowCache,
    notices: &mut Notifications,
    mutation: &Mutation,
    result: MutationResult,
) -> bool {
    let id = mutation.id();
    let label = cache
        .get(id)
        .and_then(|row| row.name.clone())
        .unwrap_or_else(|| id.to_string());

    let patch = match result {
        Ok(patch) => patch,
        Err(e) if e.is_silent() => {
            warn!("Mutation on employee {} aborted", id);
            return false;
        }
        Err(e) => {
            warn!("Mutation on employee {} failed: {}", id, e);
            notices.error(failure_text(mutation, &label, &e));
            return false;
        }
    };

    let applied = cache.apply(&patch);
    info!("Applied {:?} (row cached: {})", patch, applied);

    match mutation {
        Mutation::Delete { .. } => {
            notices.success(format!("Employee {} deleted successfully", label))
        }
        Mutation::UpdateCv { .. } => notices.success(format!("Updated CV for {}", label)),
        Mutation::MarkAppointed { .. } => {
            notices.success(format!("Employee {} marked as appointed", label))
        }
    };
    applied
}

fn failure_text(mutation: &Mutation, label: &str, err: &DirectoryError) -> String {
    match (mutation, err) {
        (_, DirectoryError::Unauthorized) => "Session expired. Please log in again.".to_string(),
        (Mutation::Delete { .. }, e) => format!("Failed to delete {}: {}", label, e),
        (Mutation::UpdateCv { .. }, e) => format!("Failed to update CV for {}: {}", label, e),
        (Mutation::MarkAppointed { .. }, e) => {
            format!("Failed to mark {} as appointed: {}", label, e)
        }
    }
}
