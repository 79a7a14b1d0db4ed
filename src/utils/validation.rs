use crate::utils::error::{GateError, Result};
use chrono::NaiveTime;
use regex::Regex;
use std::sync::OnceLock;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn departure_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^([01]\d|2[0-3]):([0-5]\d)$").expect("departure time pattern is valid")
    })
}

/// 解析 HH:MM 格式的起飛時間
pub fn parse_departure_time(field_name: &str, value: &str) -> Result<NaiveTime> {
    let trimmed = value.trim();
    if !departure_pattern().is_match(trimmed) {
        return Err(GateError::InvalidInput {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Expected a 24-hour time in HH:MM format".to_string(),
        });
    }

    NaiveTime::parse_from_str(trimmed, "%H:%M").map_err(|e| GateError::InvalidInput {
        field: field_name.to_string(),
        value: value.to_string(),
        reason: format!("Invalid time: {}", e),
    })
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(GateError::ConfigValidationError {
            field: field_name.to_string(),
            message: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(GateError::ConfigValidationError {
            field: field_name.to_string(),
            message: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(GateError::InvalidInput {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

/// 單一 token 欄位 (票號、座位、航班號) 不可包含空白
pub fn validate_token(field_name: &str, value: &str) -> Result<()> {
    validate_non_empty_string(field_name, value)?;
    if value.chars().any(char::is_whitespace) {
        return Err(GateError::InvalidInput {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot contain whitespace".to_string(),
        });
    }
    Ok(())
}

/// 會出現在檔名中的識別碼 (航班號)，不可含路徑分隔或 `..`
pub fn validate_file_safe_token(field_name: &str, value: &str) -> Result<()> {
    validate_token(field_name, value)?;
    if value.contains(['/', '\\']) || value.contains("..") {
        return Err(GateError::InvalidInput {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot contain path separators or '..'".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(GateError::InvalidInput {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

pub fn validate_one_of(field_name: &str, value: &str, allowed: &[&str]) -> Result<()> {
    if !allowed.contains(&value) {
        return Err(GateError::ConfigValidationError {
            field: field_name.to_string(),
            message: format!(
                "Unsupported value '{}'. Valid values: {}",
                value,
                allowed.join(", ")
            ),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_departure_time() {
        let time = parse_departure_time("departure", "09:45").unwrap();
        assert_eq!(time.format("%H:%M").to_string(), "09:45");
        assert!(parse_departure_time("departure", " 23:59 ").is_ok());
        assert!(parse_departure_time("departure", "24:00").is_err());
        assert!(parse_departure_time("departure", "9:45").is_err());
        assert!(parse_departure_time("departure", "noon").is_err());
    }

    #[test]
    fn test_validate_token() {
        assert!(validate_token("ticket", "T100").is_ok());
        assert!(validate_token("ticket", "").is_err());
        assert!(validate_token("ticket", "T 100").is_err());
    }

    #[test]
    fn test_validate_file_safe_token() {
        assert!(validate_file_safe_token("flight_id", "AI-101").is_ok());
        assert!(validate_file_safe_token("flight_id", "../AI101").is_err());
        assert!(validate_file_safe_token("flight_id", "AI/101").is_err());
        assert!(validate_file_safe_token("flight_id", "AI\\101").is_err());
        assert!(validate_file_safe_token("flight_id", "AI 101").is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("age", 30u32, 0, 130).is_ok());
        assert!(validate_range("age", 131u32, 0, 130).is_err());
    }

    #[test]
    fn test_validate_one_of() {
        assert!(validate_one_of("audit.format", "text", &["text", "json"]).is_ok());
        assert!(validate_one_of("audit.format", "xml", &["text", "json"]).is_err());
    }
}
