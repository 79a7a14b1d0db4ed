use crate::core::ConfigProvider;
use crate::utils::error::{GateError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_one_of, validate_path, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const AUDIT_FORMATS: [&str; 2] = ["text", "json"];
pub const LOG_FORMATS: [&str; 3] = ["compact", "text", "json"];
pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    pub gate: GateSection,
    pub audit: AuditConfig,
    pub auth: AuthConfig,
    pub roster: RosterConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GateSection {
    pub name: String,
}

impl Default for GateSection {
    fn default() -> Self {
        Self {
            name: "Airline Boarding System".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    pub enabled: bool,
    pub directory: String,
    pub file_prefix: String,
    pub format: String,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            directory: ".".to_string(),
            file_prefix: "boarding".to_string(),
            format: "text".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub credentials_file: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            credentials_file: "staff.txt".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterConfig {
    pub flights_csv: Option<String>,
    pub passengers_csv: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub format: Option<String>,
}

impl GateConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(GateError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 檔案不存在時使用預設值
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            tracing::info!(
                "No configuration file at {}, using defaults",
                path.as_ref().display()
            );
            Ok(Self::default())
        }
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| GateError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${AUDIT_DIR})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        use std::sync::OnceLock;

        static PATTERN: OnceLock<Regex> = OnceLock::new();
        let re = PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid"));

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .to_string()
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_non_empty_string("gate.name", &self.gate.name).map_err(|_| {
            GateError::ConfigValidationError {
                field: "gate.name".to_string(),
                message: "Gate name cannot be empty".to_string(),
            }
        })?;

        if self.audit.enabled {
            validate_path("audit.directory", &self.audit.directory)?;
            validate_path("audit.file_prefix", &self.audit.file_prefix)?;
            if self.audit.file_prefix.contains(['/', '\\']) {
                return Err(GateError::ConfigValidationError {
                    field: "audit.file_prefix".to_string(),
                    message: "File prefix cannot contain path separators".to_string(),
                });
            }
        }
        validate_one_of("audit.format", &self.audit.format, &AUDIT_FORMATS)?;

        validate_path("auth.credentials_file", &self.auth.credentials_file)?;

        if let Some(path) = &self.roster.flights_csv {
            validate_path("roster.flights_csv", path)?;
        }
        if let Some(path) = &self.roster.passengers_csv {
            validate_path("roster.passengers_csv", path)?;
        }

        if let Some(level) = &self.logging.level {
            validate_one_of("logging.level", level, &LOG_LEVELS)?;
        }
        if let Some(format) = &self.logging.format {
            validate_one_of("logging.format", format, &LOG_FORMATS)?;
        }

        Ok(())
    }
}

impl ConfigProvider for GateConfig {
    fn audit_enabled(&self) -> bool {
        self.audit.enabled
    }

    fn audit_directory(&self) -> &str {
        &self.audit.directory
    }

    fn audit_file_prefix(&self) -> &str {
        &self.audit.file_prefix
    }

    fn audit_format(&self) -> &str {
        &self.audit.format
    }

    fn credentials_file(&self) -> &str {
        &self.auth.credentials_file
    }
}

impl Validate for GateConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[gate]
name = "Terminal 3"

[audit]
enabled = true
directory = "./logs"
file_prefix = "gate"
format = "json"

[auth]
credentials_file = "users.txt"

[roster]
flights_csv = "flights.csv"
passengers_csv = "passengers.csv"

[logging]
level = "debug"
"#;

        let config = GateConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.gate.name, "Terminal 3");
        assert_eq!(config.audit_directory(), "./logs");
        assert_eq!(config.audit_format(), "json");
        assert_eq!(config.credentials_file(), "users.txt");
        assert_eq!(config.roster.passengers_csv.as_deref(), Some("passengers.csv"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config = GateConfig::from_toml_str("[gate]\nname = \"Gate 7\"\n").unwrap();
        assert!(config.audit_enabled());
        assert_eq!(config.audit_file_prefix(), "boarding");
        assert_eq!(config.audit_format(), "text");
        assert_eq!(config.credentials_file(), "staff.txt");
        assert!(config.roster.flights_csv.is_none());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("GATE_TEST_AUDIT_DIR", "/var/log/gate");

        let toml_content = r#"
[audit]
directory = "${GATE_TEST_AUDIT_DIR}"
"#;

        let config = GateConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.audit.directory, "/var/log/gate");

        std::env::remove_var("GATE_TEST_AUDIT_DIR");
    }

    #[test]
    fn test_config_validation() {
        let config = GateConfig::from_toml_str("[audit]\nformat = \"xml\"\n").unwrap();
        assert!(config.validate().is_err());

        let config = GateConfig::from_toml_str("[audit]\nfile_prefix = \"a/b\"\n").unwrap();
        assert!(config.validate().is_err());

        let config = GateConfig::from_toml_str("[logging]\nlevel = \"loud\"\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = GateConfig::from_toml_str("[audit\nenabled = ").unwrap_err();
        assert!(matches!(err, GateError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[gate]\nname = \"file-test\"\n")
            .unwrap();

        let config = GateConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.gate.name, "file-test");
    }

    #[test]
    fn test_load_or_default_without_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = GateConfig::load_or_default(dir.path().join("missing.toml")).unwrap();
        assert_eq!(config.gate.name, "Airline Boarding System");
    }
}
