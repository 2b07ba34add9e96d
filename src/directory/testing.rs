// src/directory/testing.rs
//! In-memory backend used by the directory tests

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::core::gateway::{CvUpload, EmployeeGateway, PageQuery};
use crate::error::{DirectoryError, DirectoryResult};
use crate::types::employee::{EmployeeId, EmployeeRecord};
use crate::types::response::{CvUrls, EmployeePage};

#[derive(Default)]
pub struct FakeGateway {
    employees: Mutex<Vec<EmployeeRecord>>,
    failures: Mutex<VecDeque<DirectoryError>>,
    calls: Mutex<Vec<String>>,
    limit_cap: Option<usize>,
    hide_total: bool,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend holding ids `1..=count`; every third one is an accountant.
    pub fn with_employees(count: i64) -> Self {
        let gateway = Self::new();
        {
            let mut employees = gateway.employees.lock().unwrap();
            for id in 1..=count {
                let mut record = EmployeeRecord::new(id).with_name(&format!("Employee {}", id));
                record.field = Some(if id % 3 == 0 { "Accountant" } else { "Driver" }.into());
                record.cv = Some(format!("https://cdn.test/{}/cv.pdf", id));
                employees.push(record);
            }
        }
        gateway
    }

    /// Serve at most `cap` rows per page whatever the caller asks for.
    pub fn with_limit_cap(mut self, cap: usize) -> Self {
        self.limit_cap = Some(cap);
        self
    }

    /// Leave `total` out of list responses.
    pub fn without_total(mut self) -> Self {
        self.hide_total = true;
        self
    }

    /// The next call fails with `err` instead of doing its work.
    pub fn fail_next(&self, err: DirectoryError) {
        self.failures.lock().unwrap().push_back(err);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn stored_ids(&self) -> Vec<EmployeeId> {
        self.employees
            .lock()
            .unwrap()
            .iter()
            .map(|e| e.employee_id)
            .collect()
    }

    fn record(&self, call: String) -> DirectoryResult<()> {
        self.calls.lock().unwrap().push(call);
        match self.failures.lock().unwrap().pop_front() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl EmployeeGateway for FakeGateway {
    async fn list_employees(&self, query: &PageQuery) -> DirectoryResult<EmployeePage> {
        self.record(format!("list {} {} {}", query.offset, query.limit, query.search))?;

        let needle = query.search.trim().to_lowercase();
        let matching: Vec<EmployeeRecord> = self
            .employees
            .lock()
            .unwrap()
            .iter()
            .filter(|e| {
                needle.is_empty()
                    || e.name.as_deref().unwrap_or("").to_lowercase().contains(&needle)
                    || e.field.as_deref().unwrap_or("").to_lowercase().contains(&needle)
            })
            .cloned()
            .collect();

        let limit = self.limit_cap.map_or(query.limit, |cap| cap.min(query.limit));
        Ok(EmployeePage {
            total: (!self.hide_total).then_some(matching.len() as u64),
            rows: matching
                .into_iter()
                .skip(query.offset)
                .take(limit)
                .collect(),
        })
    }

    async fn delete_employee(&self, id: EmployeeId) -> DirectoryResult<()> {
        self.record(format!("delete {}", id))?;
        self.employees.lock().unwrap().retain(|e| e.employee_id != id);
        Ok(())
    }

    async fn update_cv(&self, id: EmployeeId, upload: &CvUpload) -> DirectoryResult<CvUrls> {
        self.record(format!("update_cv {} {}", id, upload.file_name))?;
        Ok(CvUrls {
            cv: Some(format!("https://cdn.test/{}/{}", id, upload.file_name)),
            masked_cv: Some(format!("https://cdn.test/{}/masked_{}", id, upload.file_name)),
        })
    }

    async fn appoint_employee(&self, id: EmployeeId, token: &str) -> DirectoryResult<()> {
        self.record(format!("appoint {} {}", id, token))?;
        if token == "expired" {
            return Err(DirectoryError::Unauthorized);
        }
        Ok(())
    }

    async fn fetch_document(&self, url: &str) -> DirectoryResult<Vec<u8>> {
        self.record(format!("fetch {}", url))?;
        Ok(format!("document at {}", url).into_bytes())
    }

    async fn admin_login(&self, username: &str, password: &str) -> DirectoryResult<String> {
        self.record(format!("login {}", username))?;
        if password == "secret" {
            Ok(format!("token-{}", username))
        } else {
            Err(DirectoryError::Server("Invalid credentials".into()))
        }
    }
}
