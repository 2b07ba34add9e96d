// src/directory/view.rs
//! Employee directory view: paginated listing, search, row actions

use chrono::Utc;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::TokenStore;
use crate::core::config_manager::DirectoryConfig;
use crate::core::fs_ops::FsOps;
use crate::core::gateway::{CvUpload, EmployeeGateway};
use crate::core::store::KeyValueStore;
use crate::directory::cache::RowCache;
use crate::directory::filter::filter_rows;
use crate::directory::mutation::{reduce, Mutation};
use crate::directory::notification::{Notification, Notifications};
use crate::directory::state::{FetchKind, FetchOutcome, FetchRequest, PaginationState, ScrollPosition};
use crate::directory::viewed::{CvBadge, ViewedCvRegistry};
use crate::export::{collect_all, export_file_name, render_csv};
use crate::share::{cv_download_name, share_link};
use crate::types::employee::{CvKind, EmployeeId, EmployeeRecord};

pub struct EmployeeDirectoryView {
    gateway: Arc<dyn EmployeeGateway>,
    tokens: TokenStore,
    viewed: ViewedCvRegistry,
    state: PaginationState,
    cache: RowCache,
    notices: Notifications,
    scroll_threshold_px: u32,
    export_page_size: usize,
}

impl EmployeeDirectoryView {
    pub fn new(
        gateway: Arc<dyn EmployeeGateway>,
        store: Arc<dyn KeyValueStore>,
        config: &DirectoryConfig,
    ) -> Self {
        Self {
            gateway,
            tokens: TokenStore::new(store.clone()),
            viewed: ViewedCvRegistry::load(store),
            state: PaginationState::new(config.page_size),
            cache: RowCache::new(),
            notices: Notifications::default(),
            scroll_threshold_px: config.scroll_threshold_px,
            export_page_size: config.export_page_size,
        }
    }

    // ===== Read side =====

    pub fn rows(&self) -> &[EmployeeRecord] {
        self.cache.rows()
    }

    pub fn row(&self, id: EmployeeId) -> Option<&EmployeeRecord> {
        self.cache.get(id)
    }

    pub fn state(&self) -> &PaginationState {
        &self.state
    }

    /// Loaded rows narrowed by a local multi-term filter.
    pub fn filtered(&self, query: &str) -> Vec<&EmployeeRecord> {
        filter_rows(self.cache.rows(), query)
    }

    pub fn cv_badge(&self, id: EmployeeId, kind: CvKind) -> CvBadge {
        self.viewed.badge(id, kind)
    }

    pub fn notifications(&self) -> &[Notification] {
        self.notices.pending()
    }

    pub fn dismiss(&mut self, id: Uuid) -> bool {
        self.notices.dismiss(id)
    }

    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        self.notices.drain()
    }

    // ===== Listing =====

    /// Initial load: first page, empty search.
    pub async fn mount(&mut self) {
        if let Some(request) = self.state.submit_search("") {
            self.run_fetch(request).await;
        }
    }

    /// Start over with `text`: offset back to zero, cache replaced on success.
    pub async fn search(&mut self, text: &str) {
        match self.state.submit_search(text.trim()) {
            Some(request) => self.run_fetch(request).await,
            None => info!("Search {:?} waiting for open fetch", text),
        }
    }

    /// Append the next page. False when nothing was fetched.
    pub async fn load_more(&mut self) -> bool {
        match self.state.request_more() {
            Some(request) => {
                self.run_fetch(request).await;
                true
            }
            None => false,
        }
    }

    pub async fn on_scroll(&mut self, position: ScrollPosition) -> bool {
        match self.state.on_scroll(position, self.scroll_threshold_px) {
            Some(request) => {
                self.run_fetch(request).await;
                true
            }
            None => false,
        }
    }

    async fn run_fetch(&mut self, mut request: FetchRequest) {
        loop {
            let result = self.gateway.list_employees(&request.query).await;
            let outcome = self.state.complete(&request, result, &mut self.cache);
            self.report_fetch(&request, outcome);

            match self
                .state
                .take_deferred_search()
                .and_then(|text| self.state.submit_search(&text))
            {
                Some(next) => request = next,
                None => break,
            }
        }
    }

    fn report_fetch(&mut self, request: &FetchRequest, outcome: FetchOutcome) {
        match outcome {
            FetchOutcome::Loaded { fetched, .. } => {
                let search = request.query.search.as_str();
                if request.kind == FetchKind::FirstPage && !search.is_empty() {
                    if fetched == 0 {
                        self.notices
                            .info(format!("No employees found matching \"{}\"", search));
                    } else {
                        self.notices.success(format!(
                            "Found {} employee(s)",
                            self.state.total_count()
                        ));
                    }
                }
            }
            FetchOutcome::Failed(e) => {
                warn!("Employee fetch failed: {}", e);
                self.notices.error(format!("Failed to load employees: {}", e));
            }
            FetchOutcome::Aborted | FetchOutcome::Stale => {}
        }
    }

    // ===== Mutations =====

    /// Delete after `confirm` approves the row. Declining sends nothing.
    pub async fn delete<F>(&mut self, id: EmployeeId, confirm: F) -> bool
    where
        F: FnOnce(&EmployeeRecord) -> bool,
    {
        let Some(row) = self.require_row(id) else {
            return false;
        };
        if !confirm(row) {
            info!("Delete of employee {} cancelled", id);
            return false;
        }
        let label = row.name.clone().unwrap_or_else(|| id.to_string());
        self.notices.info(format!("Deleting employee {}...", label));

        self.execute(Mutation::Delete { id }).await
    }

    /// Replace the CV of a row with a pdf/doc/docx file.
    pub async fn update_cv(&mut self, id: EmployeeId, file: &Path) -> bool {
        if self.require_row(id).is_none() {
            return false;
        }
        let upload = match CvUpload::from_path(file).await {
            Ok(upload) => upload,
            Err(e) => {
                self.notices.error(e.to_string());
                return false;
            }
        };
        self.notices.info(format!("Uploading CV for {}...", id));

        self.execute(Mutation::UpdateCv { id, upload }).await
    }

    pub async fn mark_appointed(&mut self, id: EmployeeId) -> bool {
        if self.require_row(id).is_none() {
            return false;
        }
        self.execute(Mutation::MarkAppointed { id }).await
    }

    async fn execute(&mut self, mutation: Mutation) -> bool {
        let token = self.tokens.token();
        let result = mutation
            .dispatch(self.gateway.as_ref(), token.as_deref())
            .await;
        reduce(&mut self.cache, &mut self.notices, &mutation, result)
    }

    fn require_row(&mut self, id: EmployeeId) -> Option<&EmployeeRecord> {
        if !self.cache.contains(id) {
            self.notices
                .error(format!("Employee {} is not loaded in the directory", id));
            return None;
        }
        self.cache.get(id)
    }

    // ===== Export, share, documents =====

    /// Write every row matching the current search to `out_dir`.
    pub async fn export_csv(&mut self, out_dir: &Path) -> Option<PathBuf> {
        let search = self.state.search_text().to_string();
        let rows = match collect_all(self.gateway.as_ref(), &search, self.export_page_size).await {
            Ok(rows) => rows,
            Err(e) if e.is_silent() => return None,
            Err(e) => {
                self.notices.error(format!("Export error: {}", e));
                return None;
            }
        };
        if rows.is_empty() {
            self.notices.error("No data to export");
            return None;
        }

        let file_name = export_file_name(&search, Utc::now());
        let written = match render_csv(&rows) {
            Ok(content) => FsOps::write_into(out_dir, &file_name, &content).await,
            Err(e) => Err(e),
        };
        match written {
            Ok(path) => {
                self.notices.success(format!(
                    "Exported {} employee(s) to {}",
                    rows.len(),
                    file_name
                ));
                Some(path)
            }
            Err(e) => {
                self.notices.error(format!("Export error: {:#}", e));
                None
            }
        }
    }

    pub fn share(&mut self, id: EmployeeId) -> Option<String> {
        let row = self.require_row(id)?;
        match share_link(row) {
            Ok(link) => {
                self.notices.success("Opening WhatsApp with CV details...");
                Some(link)
            }
            Err(e) => {
                self.notices.error(e.to_string());
                None
            }
        }
    }

    /// URL to open for a CV, recording the view. Absent documents mark nothing.
    pub fn view_cv(&mut self, id: EmployeeId, kind: CvKind) -> Option<String> {
        let url = self.cache.get(id)?.cv_url(kind)?.to_string();
        self.viewed.mark_viewed(id, kind);
        Some(url)
    }

    /// Save the shareable CV of a row into `out_dir`.
    pub async fn download_cv(&mut self, id: EmployeeId, out_dir: &Path) -> Option<PathBuf> {
        let row = self.require_row(id)?;
        let Some(url) = row.shareable_cv().map(str::to_string) else {
            self.notices.error("No CV available to download");
            return None;
        };
        let file_name = cv_download_name(row, &url);
        self.notices.info("Downloading CV...");

        let bytes = match self.gateway.fetch_document(&url).await {
            Ok(bytes) => bytes,
            Err(e) if e.is_silent() => return None,
            Err(e) => {
                warn!("CV download failed: {}", e);
                self.notices.error("Download failed. Please try again.");
                return None;
            }
        };
        match FsOps::write_into(out_dir, &file_name, &bytes).await {
            Ok(path) => {
                self.notices.success(format!("Downloaded: {}", file_name));
                Some(path)
            }
            Err(e) => {
                self.notices.error(format!("Download failed: {:#}", e));
                None
            }
        }
    }
}
