#[cfg(test)]
mod error_handling_tests {
    use ensaio_local_server::attendance::GenerationError;
    use ensaio_local_server::config::{AppConfig, ConfigError};
    use ensaio_local_server::docx::DocxError;
    use ensaio_local_server::ErrorResponse;

    #[test]
    fn test_error_response_structure() {
        let bad_request = ErrorResponse::bad_request("Invalid JSON");
        assert_eq!(bad_request.error, "BadRequest");
        assert!(bad_request.message.contains("Invalid JSON"));

        let internal = ErrorResponse::internal_error("Server error");
        assert_eq!(internal.error, "InternalServerError");
        assert!(chrono::DateTime::parse_from_rfc3339(&internal.timestamp).is_ok());
    }

    #[test]
    fn test_error_response_serialization() {
        let error = ErrorResponse::internal_error("Template missing");
        let json = serde_json::to_string(&error).unwrap();
        let deserialized: ErrorResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.message, "Template missing");
    }

    #[test]
    fn test_generation_error_messages() {
        let missing = GenerationError::TemplateIo {
            path: "static/Comparecimento ensaio local.docx".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert!(missing.to_string().contains("Comparecimento ensaio local.docx"));

        let docx: GenerationError = DocxError::MissingPart("word/document.xml".into()).into();
        assert!(docx.to_string().contains("word/document.xml"));
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let result = AppConfig::from_lookup(|key: &str| {
            (key == "PORT").then(|| "not-a-port".to_string())
        });
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { key: "PORT", .. })
        ));
    }

    #[test]
    fn test_invalid_patch_strategy_is_rejected() {
        let result = AppConfig::from_lookup(|key: &str| {
            (key == "COMPARECIMENTO_PATCH_STRATEGY").then(|| "sideways".to_string())
        });
        assert!(result.is_err());
    }
}
