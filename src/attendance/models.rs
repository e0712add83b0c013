use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::normalize::{normalize_date, sort_names};

/// Date printed on the attendance list when the form sends none.
pub const DEFAULT_ATTENDANCE_DATE: &str = "03/08/2025 ÁS 17:00H";

/// Date used for the comparecimento when the form sends none.
pub const DEFAULT_COMPARECIMENTO_DATE: &str = "07/09/2025";

/// Body of `POST /save`. Missing or `null` fields fall back to defaults.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct AttendanceRequest {
    #[schema(example = json!(["bob", "Alice"]))]
    pub musicians: Option<Vec<String>>,
    #[schema(example = json!(["Carla"]))]
    pub organists: Option<Vec<String>>,
    #[serde(rename = "dateText")]
    #[schema(example = "03/08/2025 ÁS 17:00H")]
    pub date_text: Option<String>,
}

/// Body of `POST /save_comparecimento`.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct ComparecimentoRequest {
    #[serde(rename = "dateText")]
    #[schema(example = "2025-09-07")]
    pub date_text: Option<String>,
}

/// Attendance input after defaults and sorting have been applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceSheet {
    pub musicians: Vec<String>,
    pub organists: Vec<String>,
    pub date_text: String,
}

impl AttendanceRequest {
    /// Apply defaults and sort both name lists. The date is kept as typed.
    pub fn normalize(self) -> AttendanceSheet {
        AttendanceSheet {
            musicians: sort_names(self.musicians.unwrap_or_default()),
            organists: sort_names(self.organists.unwrap_or_default()),
            date_text: self
                .date_text
                .unwrap_or_else(|| DEFAULT_ATTENDANCE_DATE.to_string()),
        }
    }
}

impl ComparecimentoRequest {
    /// Requested date in `DD/MM/YYYY` form, or as typed when it is not `Y-M-D`.
    pub fn normalized_date(&self) -> String {
        normalize_date(
            self.date_text
                .as_deref()
                .unwrap_or(DEFAULT_COMPARECIMENTO_DATE),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_deserialization() {
        let json = r#"{
            "musicians": ["bob", "Alice"],
            "organists": ["Carla"],
            "dateText": "10/08/2025 ÁS 17:00H"
        }"#;

        let request: AttendanceRequest = serde_json::from_str(json).unwrap();
        let sheet = request.normalize();
        assert_eq!(sheet.musicians, vec!["Alice", "bob"]);
        assert_eq!(sheet.organists, vec!["Carla"]);
        assert_eq!(sheet.date_text, "10/08/2025 ÁS 17:00H");
    }

    #[test]
    fn test_missing_and_null_fields_default() {
        let request: AttendanceRequest =
            serde_json::from_str(r#"{"musicians": null}"#).unwrap();
        let sheet = request.normalize();
        assert!(sheet.musicians.is_empty());
        assert!(sheet.organists.is_empty());
        assert_eq!(sheet.date_text, DEFAULT_ATTENDANCE_DATE);
    }

    #[test]
    fn test_attendance_date_is_not_reformatted() {
        let request: AttendanceRequest =
            serde_json::from_str(r#"{"dateText": "2025-09-07"}"#).unwrap();
        assert_eq!(request.normalize().date_text, "2025-09-07");
    }

    #[test]
    fn test_comparecimento_date() {
        let iso: ComparecimentoRequest =
            serde_json::from_str(r#"{"dateText": "2025-09-07"}"#).unwrap();
        assert_eq!(iso.normalized_date(), "07/09/2025");

        let missing: ComparecimentoRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(missing.normalized_date(), DEFAULT_COMPARECIMENTO_DATE);
    }
}
