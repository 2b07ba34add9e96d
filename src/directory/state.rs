// src/directory/state.rs
//! Pagination and search state machine
//!
//! At most one listing fetch is outstanding. A fetch is opened with
//! [`PaginationState::submit_search`] or [`PaginationState::request_more`],
//! which hand back a [`FetchRequest`], and closed with
//! [`PaginationState::complete`]. Scroll fetches asked for while another fetch
//! is open are dropped; searches are parked and started once it closes.

use tracing::{debug, info};

use crate::core::gateway::PageQuery;
use crate::directory::cache::RowCache;
use crate::error::{DirectoryError, DirectoryResult};
use crate::types::response::EmployeePage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    LoadingFirstPage,
    LoadingMore,
    Loaded,
    ExhaustedNoMore,
}

impl Phase {
    pub fn in_flight(&self) -> bool {
        matches!(self, Phase::LoadingFirstPage | Phase::LoadingMore)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    /// Replaces the cache.
    FirstPage,
    /// Appends to the cache.
    More,
}

/// Ticket for the single outstanding fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub kind: FetchKind,
    pub query: PageQuery,
    resume: Phase,
}

#[derive(Debug)]
pub enum FetchOutcome {
    Loaded { fetched: usize, appended: usize },
    Failed(DirectoryError),
    /// Timed out; nothing to report.
    Aborted,
    /// Completion did not match the open fetch.
    Stale,
}

/// Scroll geometry of the table container, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollPosition {
    pub scroll_top: u32,
    pub client_height: u32,
    pub scroll_height: u32,
}

impl ScrollPosition {
    pub fn is_near_bottom(&self, threshold: u32) -> bool {
        let seen = self.scroll_top.saturating_add(self.client_height);
        self.scroll_height.saturating_sub(seen) <= threshold
    }
}

#[derive(Debug)]
pub struct PaginationState {
    phase: Phase,
    page_size: usize,
    search_text: String,
    offset: usize,
    total_count: u64,
    has_more: bool,
    in_flight: Option<FetchRequest>,
    deferred_search: Option<String>,
}

impl PaginationState {
    pub fn new(page_size: usize) -> Self {
        Self {
            phase: Phase::Idle,
            page_size,
            search_text: String::new(),
            offset: 0,
            total_count: 0,
            has_more: false,
            in_flight: None,
            deferred_search: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Search text the cached rows belong to.
    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }


    /// Open a first-page fetch for `text`. Parked if a fetch is already open.
    pub fn submit_search(&mut self, text: &str) -> Option<FetchRequest> {
        if self.phase.in_flight() {
            debug!("Search {:?} parked behind open fetch", text);
            self.deferred_search = Some(text.to_string());
            return None;
        }

        let request = FetchRequest {
            kind: FetchKind::FirstPage,
            query: PageQuery {
                offset: 0,
                limit: self.page_size,
                search: text.to_string(),
            },
            resume: self.phase,
        };
        self.phase = Phase::LoadingFirstPage;
        self.in_flight = Some(request.clone());
        Some(request)
    }

    /// Open an append fetch. Dropped when busy, exhausted, or nothing is loaded yet.
    pub fn request_more(&mut self) -> Option<FetchRequest> {
        if self.phase != Phase::Loaded || !self.has_more {
            debug!("Load more ignored in phase {:?}", self.phase);
            return None;
        }

        let request = FetchRequest {
            kind: FetchKind::More,
            query: PageQuery {
                offset: self.offset,
                limit: self.page_size,
                search: self.search_text.clone(),
            },
            resume: self.phase,
        };
        self.phase = Phase::LoadingMore;
        self.in_flight = Some(request.clone());
        Some(request)
    }

    /// Scroll event: opens an append fetch only near the bottom.
    pub fn on_scroll(&mut self, position: ScrollPosition, threshold: u32) -> Option<FetchRequest> {
        if !position.is_near_bottom(threshold) {
            return None;
        }
        self.request_more()
    }

    /// Close the open fetch and fold its result into `cache`.
    pub fn complete(
        &mut self,
        request: &FetchRequest,
        result: DirectoryResult<EmployeePage>,
        cache: &mut RowCache,
    ) -> FetchOutcome {
        if self.in_flight.as_ref() != Some(request) {
            return FetchOutcome::Stale;
        }
        self.in_flight = None;

        let page = match result {
            Ok(page) => page,
            Err(e) => {
                self.phase = request.resume;
                return if e.is_silent() {
                    debug!("Fetch at offset {} aborted", request.query.offset);
                    FetchOutcome::Aborted
                } else {
                    FetchOutcome::Failed(e)
                };
            }
        };

        let fetched = page.rows.len();
        let appended = match request.kind {
            FetchKind::FirstPage => {
                cache.replace(page.rows);
                self.search_text = request.query.search.clone();
                self.offset = fetched;
                cache.len()
            }
            FetchKind::More => {
                let appended = cache.append(page.rows);
                self.offset += fetched;
                appended
            }
        };

        self.has_more = fetched >= self.page_size;
        self.total_count = page.total.unwrap_or(self.offset as u64);
        self.phase = if self.has_more {
            Phase::Loaded
        } else {
            Phase::ExhaustedNoMore
        };

        info!(
            "Loaded {} rows ({} new), offset={} total={} has_more={}",
            fetched, appended, self.offset, self.total_count, self.has_more
        );
        FetchOutcome::Loaded { fetched, appended }
    }

    /// Search parked while a fetch was open, if any.
    pub fn take_deferred_search(&mut self) -> Option<String> {
        if self.phase.in_flight() {
            return None;
        }
        self.deferred_search.take()
    }
}
