use serde::{Deserialize, Serialize};

use crate::types::employee::EmployeeRecord;

// ===== Backend Response Types =====

/// `GET /api/employees`
#[derive(Debug, Serialize, Deserialize)]
pub struct EmployeeListResponse {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub rows: Vec<EmployeeRecord>,
    pub total: Option<u64>,
    pub error: Option<String>,
}

/// Bare acknowledgement used by delete and appoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct AckResponse {
    #[serde(default)]
    pub ok: bool,
    pub error: Option<String>,
}

/// `POST /api/employee/{id}/update_cv`
#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateCvResponse {
    #[serde(default)]
    pub ok: bool,
    pub cv_url: Option<String>,
    pub masked_cv_url: Option<String>,
    pub error: Option<String>,
}

/// `POST /api/admin/login`
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub ok: bool,
    pub token: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

// ===== Domain Results =====

/// One page of the directory as returned by the gateway.
#[derive(Debug, Clone, Default)]
pub struct EmployeePage {
    pub rows: Vec<EmployeeRecord>,
    pub total: Option<u64>,
}

/// New document locations after a CV replacement.
#[derive(Debug, Clone, PartialEq)]
pub struct CvUrls {
    pub cv: Option<String>,
    pub masked_cv: Option<String>,
}
