// src/directory/cache.rs
//! Ordered row cache keyed by employee id

use std::collections::HashSet;

use crate::directory::mutation::RowPatch;
use crate::types::employee::{EmployeeId, EmployeeRecord};

#[derive(Debug, Default, Clone)]
pub struct RowCache {
    rows: Vec<EmployeeRecord>,
    ids: HashSet<EmployeeId>,
}

impl RowCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[EmployeeRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn contains(&self, id: EmployeeId) -> bool {
        self.ids.contains(&id)
    }

    pub fn get(&self, id: EmployeeId) -> Option<&EmployeeRecord> {
        if !self.contains(id) {
            return None;
        }
        self.rows.iter().find(|row| row.employee_id == id)
    }

    fn get_mut(&mut self, id: EmployeeId) -> Option<&mut EmployeeRecord> {
        self.rows.iter_mut().find(|row| row.employee_id == id)
    }

    /// Drop everything and take `rows` as the new contents (first page of a search).
    pub fn replace(&mut self, rows: Vec<EmployeeRecord>) {
        self.rows.clear();
        self.ids.clear();
        self.append(rows);
    }

    /// Append rows not seen yet. Known ids keep their local copy so an
    /// optimistic edit is never overwritten by a stale page. Returns how many
    /// rows were actually added.
    pub fn append(&mut self, rows: Vec<EmployeeRecord>) -> usize {
        let before = self.rows.len();
        for row in rows {
            if self.ids.insert(row.employee_id) {
                self.rows.push(row);
            }
        }
        self.rows.len() - before
    }

    /// Apply a confirmed mutation. Returns false when the row is no longer cached.
    pub fn apply(&mut self, patch: &RowPatch) -> bool {
        match patch {
            RowPatch::Remove { id } => {
                if !self.ids.remove(id) {
                    return false;
                }
                self.rows.retain(|row| row.employee_id != *id);
                true
            }
            RowPatch::SetCv { id, urls } => match self.get_mut(*id) {
                Some(row) => {
                    row.cv = urls.cv.clone();
                    row.masked_cv = urls.masked_cv.clone();
                    true
                }
                None => false,
            },
            RowPatch::SetStatus { id, status } => match self.get_mut(*id) {
                Some(row) => {
                    row.status = *status;
                    true
                }
                None => false,
            },
        }
    }
}
