use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::Result;
use crate::types::ElementKind;

/// Top-level configuration for the dicta application.
///
/// Loaded from a TOML file. Each section corresponds to a cross-cutting
/// concern; unknown or missing fields fall back to defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DictaConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub dictation: DictationConfig,
}

impl DictaConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: DictaConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Dictation settings.
///
/// A session reads this as an immutable snapshot when it starts; changes
/// apply to the next session, never to one in flight.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DictationConfig {
    /// BCP-47 language tag passed to the recognizer ("fa-IR", "en-US", ...).
    /// Also selects the voice command table by language family.
    pub language: String,
    /// Master switch for dictation controls.
    pub enabled: bool,
    /// Whether text areas are eligible for a dictation control.
    pub enable_textarea: bool,
    /// Input type attributes eligible for a control ("text", "search", ...).
    pub enabled_input_types: Vec<String>,
    /// Extra selectors the discovery collaborator scans for. Rich-text
    /// regions are only eligible when at least one is configured.
    pub custom_selectors: Vec<String>,
    /// Site allow-list. Empty means every site is allowed.
    pub allowed_sites: Vec<String>,
}

impl Default for DictationConfig {
    fn default() -> Self {
        Self {
            language: "fa-IR".to_string(),
            enabled: true,
            enable_textarea: true,
            enabled_input_types: Vec::new(),
            custom_selectors: Vec::new(),
            allowed_sites: Vec::new(),
        }
    }
}

impl DictationConfig {
    /// Returns whether dictation may run on the given hostname.
    ///
    /// An empty allow-list permits every site. Patterns match exactly,
    /// `*.domain` matches the domain and its subdomains, and a leading `*`
    /// makes the rest a suffix match. All comparisons are case-insensitive.
    pub fn site_allowed(&self, hostname: &str) -> bool {
        if self.allowed_sites.is_empty() {
            return true;
        }
        if hostname.is_empty() {
            return false;
        }

        let hostname = hostname.to_lowercase();
        self.allowed_sites
            .iter()
            .any(|pattern| Self::matches_site(&hostname, pattern))
    }

    fn matches_site(hostname: &str, pattern: &str) -> bool {
        let pattern = pattern.to_lowercase();
        if pattern == hostname {
            return true;
        }
        if let Some(domain) = pattern.strip_prefix("*.") {
            return hostname == domain || hostname.ends_with(&format!(".{}", domain));
        }
        if let Some(suffix) = pattern.strip_prefix('*') {
            return hostname.ends_with(suffix);
        }
        false
    }

    /// Returns whether an element of the given kind may carry a control.
    pub fn kind_eligible(&self, kind: &ElementKind) -> bool {
        match kind {
            ElementKind::Textarea => self.enable_textarea,
            ElementKind::Input(input_type) => self.enabled_input_types.contains(input_type),
            // Rich-text descriptors can only come from a custom selector.
            ElementKind::RichText => !self.custom_selectors.is_empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = DictaConfig::default();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.dictation.language, "fa-IR");
        assert!(config.dictation.enabled);
        assert!(config.dictation.enable_textarea);
        assert!(config.dictation.enabled_input_types.is_empty());
        assert!(config.dictation.allowed_sites.is_empty());
    }

    #[test]
    fn test_load_valid_config() {
        let content = r#"
[general]
log_level = "debug"

[dictation]
language = "en-US"
enabled = true
enable_textarea = false
enabled_input_types = ["text", "search"]
allowed_sites = ["example.com", "*.wiki.org"]
"#;
        let file = create_temp_config(content);
        let config = DictaConfig::load(file.path()).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.dictation.language, "en-US");
        assert!(!config.dictation.enable_textarea);
        assert_eq!(
            config.dictation.enabled_input_types,
            vec!["text".to_string(), "search".to_string()]
        );
        assert_eq!(config.dictation.allowed_sites.len(), 2);
    }

    #[test]
    fn test_load_partial_config_uses_defaults() {
        let content = r#"
[dictation]
language = "en-GB"
"#;
        let file = create_temp_config(content);
        let config = DictaConfig::load(file.path()).unwrap();
        assert_eq!(config.dictation.language, "en-GB");
        // Remaining fields use defaults
        assert_eq!(config.general.log_level, "info");
        assert!(config.dictation.enable_textarea);
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = DictaConfig::load_or_default(Path::new("/nonexistent/dicta.toml"));
        assert_eq!(config.dictation.language, "fa-IR");
    }

    #[test]
    fn test_load_invalid_toml() {
        let content = "this is {{ not valid TOML";
        let file = create_temp_config(content);
        assert!(DictaConfig::load(file.path()).is_err());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub").join("dicta.toml");

        let mut config = DictaConfig::default();
        config.dictation.language = "en-US".to_string();
        config.save(&path).unwrap();

        let reloaded = DictaConfig::load(&path).unwrap();
        assert_eq!(reloaded.dictation.language, "en-US");
        assert_eq!(reloaded.general.log_level, config.general.log_level);
    }

    #[test]
    fn test_site_allowed_empty_list_allows_all() {
        let config = DictationConfig::default();
        assert!(config.site_allowed("anything.example"));
        assert!(config.site_allowed(""));
    }

    #[test]
    fn test_site_allowed_exact_match() {
        let config = DictationConfig {
            allowed_sites: vec!["example.com".to_string()],
            ..Default::default()
        };
        assert!(config.site_allowed("example.com"));
        assert!(config.site_allowed("EXAMPLE.com"));
        assert!(!config.site_allowed("sub.example.com"));
        assert!(!config.site_allowed("example.org"));
        assert!(!config.site_allowed(""));
    }

    #[test]
    fn test_site_allowed_wildcard_subdomain() {
        let config = DictationConfig {
            allowed_sites: vec!["*.example.com".to_string()],
            ..Default::default()
        };
        assert!(config.site_allowed("example.com"));
        assert!(config.site_allowed("mail.example.com"));
        assert!(config.site_allowed("a.b.example.com"));
        assert!(!config.site_allowed("notexample.com"));
    }

    #[test]
    fn test_site_allowed_suffix_pattern() {
        let config = DictationConfig {
            allowed_sites: vec!["*wiki.org".to_string()],
            ..Default::default()
        };
        assert!(config.site_allowed("wiki.org"));
        assert!(config.site_allowed("mywiki.org"));
        assert!(!config.site_allowed("wiki.org.evil.com"));
    }

    #[test]
    fn test_kind_eligible_textarea() {
        let mut config = DictationConfig::default();
        assert!(config.kind_eligible(&ElementKind::Textarea));
        config.enable_textarea = false;
        assert!(!config.kind_eligible(&ElementKind::Textarea));
    }

    #[test]
    fn test_kind_eligible_input_types() {
        let config = DictationConfig {
            enabled_input_types: vec!["text".to_string(), "search".to_string()],
            ..Default::default()
        };
        assert!(config.kind_eligible(&ElementKind::Input("text".to_string())));
        assert!(config.kind_eligible(&ElementKind::Input("search".to_string())));
        assert!(!config.kind_eligible(&ElementKind::Input("password".to_string())));
    }

    #[test]
    fn test_kind_eligible_rich_text_requires_custom_selector() {
        let mut config = DictationConfig::default();
        assert!(!config.kind_eligible(&ElementKind::RichText));
        config.custom_selectors = vec!["div.editor".to_string()];
        assert!(config.kind_eligible(&ElementKind::RichText));
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let config = DictaConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let deserialized: DictaConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(deserialized.dictation.language, config.dictation.language);
        assert_eq!(deserialized.general.log_level, config.general.log_level);
    }
}
