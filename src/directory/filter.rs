// src/directory/filter.rs
use crate::types::employee::{Column, EmployeeRecord};

const SEARCHABLE: [Column; 5] = [
    Column::Name,
    Column::MobileNo,
    Column::NearestRoute,
    Column::Field,
    Column::Location,
];

/// Rows where every whitespace-separated term of `query` appears, case
/// insensitively, in name, mobile number, route, field or location.
pub fn filter_rows<'a>(rows: &'a [EmployeeRecord], query: &str) -> Vec<&'a EmployeeRecord> {
    let terms: Vec<String> = query
        .split_whitespace()
        .map(|t| t.to_lowercase())
        .collect();

    rows.iter()
        .filter(|row| {
            if terms.is_empty() {
                return true;
            }
            let haystack = SEARCHABLE
                .iter()
                .filter_map(|c| row.value(*c))
                .collect::<Vec<_>>()
                .join(" ")
                .to_lowercase();
            terms.iter().all(|term| haystack.contains(term.as_str()))
        })
        .collect()
}
