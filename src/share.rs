// src/share.rs
//! Candidate profile message for messaging apps, and CV download naming

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::error::{DirectoryError, DirectoryResult};
use crate::types::employee::{Column, EmployeeRecord, PLACEHOLDER};

const SHARE_BASE: &str = "https://wa.me/";

/// Everything but `A-Z a-z 0-9 - _ . ! ~ * ' ( )` is escaped, spaces as `%20`.
const MESSAGE_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Message body sent with a shared profile. Fails when the row has no CV.
pub fn share_message(employee: &EmployeeRecord) -> DirectoryResult<String> {
    let cv_link = employee.shareable_cv().ok_or_else(|| no_cv(employee))?;

    let mut lines = vec![
        "CANDIDATE PROFILE".to_string(),
        "━━━━━━━━━━━━━━━━".to_string(),
        String::new(),
        format!("Name: {}", employee.display(Column::Name)),
    ];
    if let Some(field) = employee.value(Column::Field) {
        lines.push(format!("Field: {}", field));
    }
    if let Some(experience) = employee.value(Column::Experience) {
        lines.push(format!("Experience: {}", experience));
    }
    lines.push(String::new());
    lines.push("CV Link:".to_string());
    lines.push(cv_link.to_string());

    Ok(lines.join("\n"))
}

/// Link opening the messaging app with the profile pre-filled.
pub fn share_link(employee: &EmployeeRecord) -> DirectoryResult<String> {
    let message = share_message(employee)?;
    Ok(format!(
        "{}?text={}",
        SHARE_BASE,
        utf8_percent_encode(&message, MESSAGE_ENCODE_SET)
    ))
}

/// `<Name>_CV.<pdf|docx>` with anything but ASCII letters and digits replaced.
pub fn cv_download_name(employee: &EmployeeRecord, url: &str) -> String {
    let clean: String = employee
        .value(Column::Name)
        .unwrap_or("Employee")
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    let extension = if url.to_lowercase().contains(".docx") {
        "docx"
    } else {
        "pdf"
    };
    format!("{}_CV.{}", clean, extension)
}

fn no_cv(employee: &EmployeeRecord) -> DirectoryError {
    let who = employee
        .value(Column::Name)
        .unwrap_or("this employee");
    DirectoryError::Validation(format!("No CV available for {}", who))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate() -> EmployeeRecord {
        let mut e = EmployeeRecord::new(12).with_name("Nusrat Jahan");
        e.field = Some("Nursing".into());
        e.cv = Some("https://cdn/cv.pdf".into());
        e.masked_cv = Some("https://cdn/masked.pdf".into());
        e
    }

    #[test]
    fn test_message_skips_absent_lines() {
        let message = share_message(&candidate()).unwrap();
        assert_eq!(
            message,
            "CANDIDATE PROFILE\n━━━━━━━━━━━━━━━━\n\nName: Nusrat Jahan\nField: Nursing\n\nCV Link:\nhttps://cdn/masked.pdf"
        );
    }

    #[test]
    fn test_link_encodes_message() {
        let link = share_link(&candidate()).unwrap();
        assert!(link.starts_with("https://wa.me/?text=CANDIDATE%20PROFILE%0A%E2%94%81"));
        assert!(link.ends_with("%0A%0ACV%20Link%3A%0Ahttps%3A%2F%2Fcdn%2Fmasked.pdf"));
        assert!(!link.contains('+'));
    }

    #[test]
    fn test_link_keeps_unreserved_marks() {
        let mut e = candidate().with_name("D'Souza (Jr.)");
        e.field = Some("Q&A*".into());
        let link = share_link(&e).unwrap();
        assert!(link.contains("Name%3A%20D'Souza%20(Jr.)%0A"));
        assert!(link.contains("Field%3A%20Q%26A*%0A"));
    }

    #[test]
    fn test_no_cv_is_error() {
        let e = EmployeeRecord::new(1);
        let err = share_link(&e).unwrap_err();
        assert_eq!(err.to_string(), "No CV available for this employee");
        assert!(share_message(&e.with_name("Karim")).unwrap_err().to_string().contains("Karim"));
    }

    #[test]
    fn test_download_name() {
        let e = candidate();
        assert_eq!(cv_download_name(&e, "https://cdn/x.PDF"), "Nusrat_Jahan_CV.pdf");
        assert_eq!(cv_download_name(&e, "https://cdn/x.DOCX"), "Nusrat_Jahan_CV.docx");
        assert_eq!(
            cv_download_name(&EmployeeRecord::new(2), "https://cdn/x"),
            "Employee_CV.pdf"
        );
    }
}
