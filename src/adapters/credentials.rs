use crate::domain::model::Role;
use crate::utils::error::{GateError, Result};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Credential {
    username: String,
    password: String,
    role: Role,
}

/// 靜態帳號清單，每行 `username password ROLE`
#[derive(Debug, Clone, Default)]
pub struct CredentialStore {
    entries: Vec<Credential>,
}

impl CredentialStore {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Ok(Self::parse(&content))
    }

    /// 檔案讀不到時回傳空清單，之後每次登入都會失敗
    pub fn load_or_empty<P: AsRef<Path>>(path: P) -> Self {
        match Self::from_file(&path) {
            Ok(store) => store,
            Err(e) => {
                tracing::warn!(
                    "⚠️ Cannot read credentials file {}: {}",
                    path.as_ref().display(),
                    e
                );
                tracing::warn!("💡 Create it with `username password ROLE` lines (e.g. staff staff123 STAFF)");
                Self::default()
            }
        }
    }

    /// 格式不正確的行會被略過並記錄警告
    pub fn parse(content: &str) -> Self {
        let mut entries = Vec::new();

        for (line_no, line) in content.lines().enumerate() {
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.is_empty() || fields[0].starts_with('#') {
                continue;
            }

            let parsed = match fields.as_slice() {
                [username, password, role] => role.parse::<Role>().map(|role| Credential {
                    username: username.to_string(),
                    password: password.to_string(),
                    role,
                }),
                _ => Err(GateError::InvalidInput {
                    field: "credentials".to_string(),
                    value: line.to_string(),
                    reason: "Expected `username password ROLE`".to_string(),
                }),
            };

            match parsed {
                Ok(credential) => entries.push(credential),
                Err(e) => tracing::warn!("⚠️ Skipping credentials line {}: {}", line_no + 1, e),
            }
        }

        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 第一筆帳密相符的紀錄決定角色
    pub fn authenticate(&self, username: &str, password: &str) -> Result<Role> {
        self.entries
            .iter()
            .find(|c| c.username == username && c.password == password)
            .map(|c| c.role)
            .ok_or(GateError::AuthenticationFailed)
    }

    pub fn login(&self, username: &str, password: &str, expected: Role) -> Result<Role> {
        let role = self.authenticate(username, password)?;
        if role != expected {
            return Err(GateError::RoleMismatch {
                expected: expected.to_string(),
                actual: role.to_string(),
            });
        }
        tracing::info!("🔐 {} logged in as {}", username, role);
        Ok(role)
    }
}
