//! Server configuration and document formatting settings.
//!
//! Runtime values come from the environment (optionally a `.env` file). The
//! formatting settings are plain immutable values with defaults matching the
//! printed forms used by the congregation.

use std::env;
use std::path::PathBuf;

use thiserror::Error;

use crate::docx::{cm_to_twips, pt_to_half_points, PageSetup};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

/// Formatting of the musicians/organists attendance list.
#[derive(Debug, Clone, PartialEq)]
pub struct AttendanceLayout {
    pub institution: String,
    /// Subtitle prefix, the date text is appended after it.
    pub subtitle_prefix: String,
    pub font_name: String,
    pub title_size_pt: f64,
    pub subtitle_size_pt: f64,
    pub table_header_size_pt: f64,
    pub row_size_pt: f64,
    /// Space before and after each table row paragraph.
    pub row_spacing_pt: f64,
    pub margin_cm: f64,
    pub usable_width_cm: f64,
    pub name_column_cm: f64,
    pub signature_column_cm: f64,
    pub table_style: String,
    pub signature_title: String,
    /// Blank signature rows appended after the names of every section.
    pub padding_rows: usize,
}

impl Default for AttendanceLayout {
    fn default() -> Self {
        Self {
            institution: "CONGREGAÇÃO CRISTÃ NO BRASIL – BASTOS – SP".to_string(),
            subtitle_prefix: "LISTA DE PRESENÇA – ENSAIO LOCAL – ".to_string(),
            font_name: "Cambria".to_string(),
            title_size_pt: 14.0,
            subtitle_size_pt: 12.0,
            table_header_size_pt: 12.0,
            row_size_pt: 14.0,
            row_spacing_pt: 0.0,
            margin_cm: 1.5,
            usable_width_cm: 18.0,
            name_column_cm: 11.0,
            signature_column_cm: 7.0,
            table_style: "TableGrid".to_string(),
            signature_title: "ASSINATURA".to_string(),
            padding_rows: 15,
        }
    }
}

impl AttendanceLayout {
    /// A4 portrait with the configured margin on every side.
    pub fn page_setup(&self) -> PageSetup {
        PageSetup::a4(cm_to_twips(self.margin_cm))
    }

    pub fn table_width(&self) -> u32 {
        cm_to_twips(self.usable_width_cm)
    }

    pub fn column_widths(&self) -> [u32; 2] {
        [
            cm_to_twips(self.name_column_cm),
            cm_to_twips(self.signature_column_cm),
        ]
    }
}

/// How the comparecimento date substitution treats paragraph runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PatchStrategy {
    /// Split runs at the match boundaries and style only the replacement.
    #[default]
    RunAware,
    /// Replace the whole paragraph with one styled run holding the new text.
    CollapseParagraph,
}

impl PatchStrategy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "run-aware" | "run_aware" | "runaware" => Some(Self::RunAware),
            "collapse" | "collapse-paragraph" | "collapse_paragraph" => {
                Some(Self::CollapseParagraph)
            }
            _ => None,
        }
    }
}

/// Style and target of the comparecimento template patch.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparecimentoStyle {
    /// Literal date printed in the template that gets replaced.
    pub template_date: String,
    pub font_name: String,
    pub size_pt: f64,
    pub bold: bool,
    pub strategy: PatchStrategy,
}

impl Default for ComparecimentoStyle {
    fn default() -> Self {
        Self {
            template_date: "07/09/2025".to_string(),
            font_name: "Times New Roman".to_string(),
            size_pt: 18.0,
            bold: true,
            strategy: PatchStrategy::RunAware,
        }
    }
}

impl ComparecimentoStyle {
    pub fn size_half_points(&self) -> u32 {
        pt_to_half_points(self.size_pt)
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub static_dir: PathBuf,
    /// The congregation's comparecimento `.docx`, printed with the literal
    /// `ComparecimentoStyle::template_date`. It is deployment data and is not
    /// part of the repository: copy it to `static/Comparecimento ensaio local.docx`
    /// or point `COMPARECIMENTO_TEMPLATE` at it. Until then
    /// `POST /save_comparecimento` answers 500.
    pub comparecimento_template: PathBuf,
    pub allowed_origins: Vec<String>,
    pub layout: AttendanceLayout,
    pub comparecimento: ComparecimentoStyle,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            static_dir: PathBuf::from("static"),
            comparecimento_template: PathBuf::from("static/Comparecimento ensaio local.docx"),
            allowed_origins: vec![
                "http://localhost:5000".to_string(),
                "http://127.0.0.1:5000".to_string(),
            ],
            layout: AttendanceLayout::default(),
            comparecimento: ComparecimentoStyle::default(),
        }
    }
}

impl AppConfig {
    /// Build the configuration from environment variables, loading `.env` first.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(host) = lookup("HOST") {
            config.host = host;
        }
        if let Some(port) = lookup("PORT") {
            config.port = port.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: "PORT",
                value: port.clone(),
            })?;
        }
        if let Some(dir) = lookup("STATIC_DIR") {
            config.static_dir = PathBuf::from(dir);
        }
        if let Some(path) = lookup("COMPARECIMENTO_TEMPLATE") {
            config.comparecimento_template = PathBuf::from(path);
        }
        if let Some(origins) = lookup("ALLOWED_ORIGINS") {
            config.allowed_origins = origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
        if let Some(strategy) = lookup("COMPARECIMENTO_PATCH_STRATEGY") {
            config.comparecimento.strategy =
                PatchStrategy::parse(&strategy).ok_or(ConfigError::InvalidValue {
                    key: "COMPARECIMENTO_PATCH_STRATEGY",
                    value: strategy.clone(),
                })?;
        }

        Ok(config)
    }

    pub fn index_page(&self) -> PathBuf {
        self.static_dir.join("index.html")
    }

    /// Whether the comparecimento template exists as a regular file.
    pub fn template_available(&self) -> bool {
        self.comparecimento_template.is_file()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_environment() {
        let config = AppConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.port, 5000);
        assert_eq!(
            config.comparecimento_template,
            PathBuf::from("static/Comparecimento ensaio local.docx")
        );
        assert_eq!(config.layout.padding_rows, 15);
        assert_eq!(config.comparecimento.strategy, PatchStrategy::RunAware);
    }

    #[test]
    fn test_environment_overrides() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("PORT", "8080"),
            ("ALLOWED_ORIGINS", "https://a.example, ,https://b.example"),
            ("COMPARECIMENTO_PATCH_STRATEGY", "collapse"),
        ]))
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(
            config.allowed_origins,
            vec!["https://a.example", "https://b.example"]
        );
        assert_eq!(
            config.comparecimento.strategy,
            PatchStrategy::CollapseParagraph
        );
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let err = AppConfig::from_lookup(lookup_from(&[("PORT", "http")])).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn test_layout_geometry_in_twips() {
        let layout = AttendanceLayout::default();
        let page = layout.page_setup();
        assert_eq!(page.margin_left, 850);
        assert_eq!(page.margin_top, 850);
        assert_eq!(layout.table_width(), 10204);
        assert_eq!(layout.column_widths(), [6236, 3968]);
        assert!(layout.table_width() <= page.usable_width());
    }

    #[test]
    fn test_template_availability_follows_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Comparecimento ensaio local.docx");
        let config = AppConfig::from_lookup(lookup_from(&[(
            "COMPARECIMENTO_TEMPLATE",
            path.to_str().unwrap(),
        )]))
        .unwrap();
        assert!(!config.template_available());

        std::fs::write(&path, b"PK").unwrap();
        assert!(config.template_available());
    }
}
