// src/types/employee.rs
//! Employee row as served by the listing endpoint

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Rendered in place of any absent attribute.
pub const PLACEHOLDER: &str = "N/A";

pub type EmployeeId = i64;

// ===== Employee Record =====

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeRecord {
    pub employee_id: EmployeeId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub age: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub mobile_no: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub nearest_route: Option<String>,
    #[serde(default)]
    pub educational_profile: Option<String>,
    #[serde(default)]
    pub recent_completed_education: Option<String>,
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub experience: Option<String>,
    #[serde(default)]
    pub cv: Option<String>,
    #[serde(default)]
    pub masked_cv: Option<String>,
    #[serde(default)]
    pub agreement_pdf_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub agreement_accepted: bool,
    #[serde(default)]
    pub status: EmployeeStatus,
}

impl EmployeeRecord {
    pub fn new(employee_id: EmployeeId) -> Self {
        Self {
            employee_id,
            name: None,
            age: None,
            mobile_no: None,
            location: None,
            nearest_route: None,
            educational_profile: None,
            recent_completed_education: None,
            field: None,
            experience: None,
            cv: None,
            masked_cv: None,
            agreement_pdf_url: None,
            agreement_accepted: false,
            status: EmployeeStatus::Pending,
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    /// Raw value of a column, `None` when absent or blank.
    pub fn value(&self, column: Column) -> Option<&str> {
        let value = match column {
            Column::Name => self.name.as_deref(),
            Column::Age => self.age.as_deref(),
            Column::MobileNo => self.mobile_no.as_deref(),
            Column::Location => self.location.as_deref(),
            Column::NearestRoute => self.nearest_route.as_deref(),
            Column::EducationalProfile => self.educational_profile.as_deref(),
            Column::RecentEducation => self.recent_completed_education.as_deref(),
            Column::Field => self.field.as_deref(),
            Column::Experience => self.experience.as_deref(),
            Column::Cv => self.cv.as_deref(),
            Column::MaskedCv => self.masked_cv.as_deref(),
            Column::AgreementPdf => self.agreement_pdf_url.as_deref(),
        };
        value.filter(|v| !v.trim().is_empty())
    }

    /// Display text for a column; absent values become the placeholder.
    pub fn display(&self, column: Column) -> &str {
        self.value(column).unwrap_or(PLACEHOLDER)
    }

    pub fn cv_url(&self, kind: CvKind) -> Option<&str> {
        match kind {
            CvKind::Original => self.value(Column::Cv),
            CvKind::Masked => self.value(Column::MaskedCv),
        }
    }

    /// Link handed to third parties: the masked CV wins over the original.
    pub fn shareable_cv(&self) -> Option<&str> {
        self.cv_url(CvKind::Masked)
            .or_else(|| self.cv_url(CvKind::Original))
    }
}

// ===== Status =====

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "Option<String>")]
pub enum EmployeeStatus {
    #[default]
    Pending,
    Appointed,
}

impl From<Option<String>> for EmployeeStatus {
    fn from(raw: Option<String>) -> Self {
        match raw.as_deref().map(str::trim) {
            Some(s) if s.eq_ignore_ascii_case("appointed") => EmployeeStatus::Appointed,
            _ => EmployeeStatus::Pending,
        }
    }
}

impl EmployeeStatus {
    pub fn badge(&self) -> &'static str {
        match self {
            EmployeeStatus::Pending => "Pending",
            EmployeeStatus::Appointed => "Appointed",
        }
    }
}

// ===== CV Kind =====

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CvKind {
    Original,
    Masked,
}

impl CvKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CvKind::Original => "original",
            CvKind::Masked => "masked",
        }
    }
}

impl fmt::Display for CvKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ===== Columns =====

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Name,
    Age,
    MobileNo,
    Location,
    NearestRoute,
    EducationalProfile,
    RecentEducation,
    Field,
    Experience,
    Cv,
    MaskedCv,
    AgreementPdf,
}

impl Column {
    /// Table and export column order.
    pub const ALL: [Column; 12] = [
        Column::Name,
        Column::Age,
        Column::MobileNo,
        Column::Location,
        Column::NearestRoute,
        Column::EducationalProfile,
        Column::RecentEducation,
        Column::Field,
        Column::Experience,
        Column::Cv,
        Column::MaskedCv,
        Column::AgreementPdf,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Column::Name => "Employee Name",
            Column::Age => "Age",
            Column::MobileNo => "Mobile Number",
            Column::Location => "Location",
            Column::NearestRoute => "Nearest Route",
            Column::EducationalProfile => "Education Profile",
            Column::RecentEducation => "Recent Education",
            Column::Field => "Field of Expertise",
            Column::Experience => "Experience",
            Column::Cv => "CV Link",
            Column::MaskedCv => "Masked CV Link",
            Column::AgreementPdf => "Agreement PDF",
        }
    }
}

// ===== Lenient field decoding =====

/// Accepts strings and numbers alike; the backend is not consistent about
/// which one it sends for ages, phone numbers and experience.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        Some(serde_json::Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

/// MySQL tinyint flags arrive as 0/1.
fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Bool(b)) => b,
        Some(serde_json::Value::Number(n)) => n.as_i64().is_some_and(|n| n != 0),
        Some(serde_json::Value::String(s)) => {
            matches!(s.trim().to_lowercase().as_str(), "1" | "true" | "yes")
        }
        _ => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_sparse_row() {
        let record: EmployeeRecord = serde_json::from_value(json!({
            "employee_id": 7,
            "name": "Amina",
            "age": 29,
            "mobile_no": "01700000000",
            "agreement_accepted": 1,
            "status": null
        }))
        .unwrap();

        assert_eq!(record.employee_id, 7);
        assert_eq!(record.age.as_deref(), Some("29"));
        assert!(record.agreement_accepted);
        assert_eq!(record.status, EmployeeStatus::Pending);
        assert_eq!(record.display(Column::Location), PLACEHOLDER);
    }

    #[test]
    fn test_status_decoding() {
        let appointed: EmployeeRecord =
            serde_json::from_value(json!({"employee_id": 1, "status": "Appointed"})).unwrap();
        let unknown: EmployeeRecord =
            serde_json::from_value(json!({"employee_id": 2, "status": "archived"})).unwrap();

        assert_eq!(appointed.status, EmployeeStatus::Appointed);
        assert_eq!(unknown.status, EmployeeStatus::Pending);
        assert_eq!(appointed.status.badge(), "Appointed");
    }

    #[test]
    fn test_blank_values_use_placeholder() {
        let mut record = EmployeeRecord::new(3);
        record.field = Some("   ".to_string());
        assert_eq!(record.display(Column::Field), PLACEHOLDER);
        assert_eq!(record.value(Column::Field), None);
    }

    #[test]
    fn test_shareable_cv_prefers_masked() {
        let mut record = EmployeeRecord::new(4);
        record.cv = Some("https://cdn/cv.pdf".to_string());
        assert_eq!(record.shareable_cv(), Some("https://cdn/cv.pdf"));

        record.masked_cv = Some("https://cdn/masked.pdf".to_string());
        assert_eq!(record.shareable_cv(), Some("https://cdn/masked.pdf"));
        assert_eq!(record.cv_url(CvKind::Original), Some("https://cdn/cv.pdf"));
    }
}
