// src/core/gateway.rs
//! Fetch gateway: every call the directory makes to the recruitment backend

use anyhow::Context;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, error, info};

use crate::core::config_manager::DirectoryConfig;
use crate::error::{DirectoryError, DirectoryResult};
use crate::types::employee::EmployeeId;
use crate::types::response::{
    AckResponse, CvUrls, EmployeeListResponse, EmployeePage, LoginRequest, LoginResponse,
    UpdateCvResponse,
};

const EMPLOYEES_ENDPOINT: &str = "/api/employees";
const EMPLOYEE_ENDPOINT: &str = "/api/employee";
const ADMIN_LOGIN_ENDPOINT: &str = "/api/admin/login";

/// Extensions accepted for CV replacement.
pub const CV_EXTENSIONS: [&str; 3] = ["pdf", "doc", "docx"];

// ===== Requests =====

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageQuery {
    pub offset: usize,
    pub limit: usize,
    pub search: String,
}

impl PageQuery {
    fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("limit", self.limit.to_string()),
            ("offset", self.offset.to_string()),
        ];
        let search = self.search.trim();
        if !search.is_empty() {
            params.push(("search", search.to_string()));
        }
        params
    }
}

/// A CV file ready to be sent as the `cv` multipart field.
#[derive(Debug, Clone)]
pub struct CvUpload {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

impl CvUpload {
    /// Read a CV from disk, rejecting anything but pdf/doc/docx before any IO.
    pub async fn from_path(path: &Path) -> DirectoryResult<Self> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| DirectoryError::Validation(format!("Invalid file: {}", path.display())))?
            .to_string();
        let content_type = cv_content_type(&file_name)?;

        let bytes = tokio::fs::read(path).await.map_err(|e| {
            DirectoryError::Validation(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        Ok(Self {
            file_name,
            content_type,
            bytes,
        })
    }
}

pub fn cv_content_type(file_name: &str) -> DirectoryResult<&'static str> {
    let ext = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
        .ok_or_else(|| DirectoryError::Validation(format!("File has no extension: {}", file_name)))?;

    match ext.as_str() {
        "pdf" => Ok("application/pdf"),
        "doc" => Ok("application/msword"),
        "docx" => Ok("application/vnd.openxmlformats-officedocument.wordprocessingml.document"),
        _ => Err(DirectoryError::Validation(format!(
            "Unsupported file extension: {}. Allowed: {:?}",
            ext, CV_EXTENSIONS
        ))),
    }
}

// ===== Gateway trait =====

#[async_trait]
pub trait EmployeeGateway: Send + Sync {
    async fn list_employees(&self, query: &PageQuery) -> DirectoryResult<EmployeePage>;

    async fn delete_employee(&self, id: EmployeeId) -> DirectoryResult<()>;

    async fn update_cv(&self, id: EmployeeId, upload: &CvUpload) -> DirectoryResult<CvUrls>;

    async fn appoint_employee(&self, id: EmployeeId, token: &str) -> DirectoryResult<()>;

    /// Raw bytes of a stored document (CV download).
    async fn fetch_document(&self, url: &str) -> DirectoryResult<Vec<u8>>;

    /// Returns the bearer token on success.
    async fn admin_login(&self, username: &str, password: &str) -> DirectoryResult<String>;
}

// ===== HTTP implementation =====

pub struct HttpGateway {
    client: reqwest::Client,
    base_url: String,
}

impl HttpGateway {
    pub fn new(config: &DirectoryConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Decode a JSON body. 401 is reported on its own; other failures with an
    /// unreadable body fall back to the status line.
    async fn read_json<R>(response: reqwest::Response) -> DirectoryResult<R>
    where
        R: DeserializeOwned,
    {
        let status = response.status();
        debug!("Response status: {}", status);

        if status == StatusCode::UNAUTHORIZED {
            return Err(DirectoryError::Unauthorized);
        }

        let text = response.text().await?;
        match serde_json::from_str::<R>(&text) {
            Ok(body) => Ok(body),
            Err(e) if status.is_success() => {
                error!("Malformed response body: {}", text);
                Err(DirectoryError::Decode(e.to_string()))
            }
            Err(_) => Err(DirectoryError::Server(format!("Request failed: {}", status))),
        }
    }
}

#[async_trait]
impl EmployeeGateway for HttpGateway {
    async fn list_employees(&self, query: &PageQuery) -> DirectoryResult<EmployeePage> {
        let url = self.url(EMPLOYEES_ENDPOINT);
        info!(
            "Fetching employees offset={} limit={} search={:?}",
            query.offset, query.limit, query.search
        );

        let response = self.client.get(&url).query(&query.params()).send().await?;
        let body: EmployeeListResponse = Self::read_json(response).await?;

        if !body.ok {
            return Err(DirectoryError::server(body.error));
        }
        Ok(EmployeePage {
            rows: body.rows,
            total: body.total,
        })
    }

    async fn delete_employee(&self, id: EmployeeId) -> DirectoryResult<()> {
        let url = self.url(&format!("{}/{}", EMPLOYEE_ENDPOINT, id));
        info!("Deleting employee {}", id);

        let response = self.client.delete(&url).send().await?;
        let body: AckResponse = Self::read_json(response).await?;

        if !body.ok {
            return Err(DirectoryError::server(body.error));
        }
        Ok(())
    }

    async fn update_cv(&self, id: EmployeeId, upload: &CvUpload) -> DirectoryResult<CvUrls> {
        let url = self.url(&format!("{}/{}/update_cv", EMPLOYEE_ENDPOINT, id));
        info!("Uploading CV {} for employee {}", upload.file_name, id);

        let part = Part::bytes(upload.bytes.clone())
            .file_name(upload.file_name.clone())
            .mime_str(upload.content_type)
            .map_err(|e| DirectoryError::Validation(format!("Failed to create multipart: {}", e)))?;
        let form = Form::new().part("cv", part);

        let response = self.client.post(&url).multipart(form).send().await?;
        let body: UpdateCvResponse = Self::read_json(response).await?;

        if !body.ok {
            return Err(DirectoryError::server(body.error));
        }
        Ok(CvUrls {
            cv: body.cv_url,
            masked_cv: body.masked_cv_url,
        })
    }

    async fn appoint_employee(&self, id: EmployeeId, token: &str) -> DirectoryResult<()> {
        let url = self.url(&format!("{}/{}/appoint", EMPLOYEES_ENDPOINT, id));
        info!("Marking employee {} as appointed", id);

        let response = self.client.patch(&url).bearer_auth(token).send().await?;
        let body: AckResponse = Self::read_json(response).await?;

        if !body.ok {
            return Err(DirectoryError::server(body.error));
        }
        Ok(())
    }

    async fn fetch_document(&self, url: &str) -> DirectoryResult<Vec<u8>> {
        debug!("Downloading document {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DirectoryError::Server(format!("Download failed: {}", status)));
        }
        Ok(response.bytes().await?.to_vec())
    }

    async fn admin_login(&self, username: &str, password: &str) -> DirectoryResult<String> {
        let url = self.url(ADMIN_LOGIN_ENDPOINT);
        info!("Admin login for {}", username);

        let response = self
            .client
            .post(&url)
            .json(&LoginRequest { username, password })
            .send()
            .await?;
        let body: LoginResponse = Self::read_json(response).await?;

        match (body.ok, body.token) {
            (true, Some(token)) => Ok(token),
            (true, None) => Err(DirectoryError::Decode("login response carried no token".into())),
            (false, _) => Err(DirectoryError::server(body.error)),
        }
    }
}
