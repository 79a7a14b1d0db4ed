use crate::core::{AuditSink, BoardingRecord, ConfigProvider};
use crate::utils::error::{GateError, Result};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditFormat {
    Text,
    Json,
}

impl AuditFormat {
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "text" => Ok(AuditFormat::Text),
            "json" => Ok(AuditFormat::Json),
            other => Err(GateError::ConfigValidationError {
                field: "audit.format".to_string(),
                message: format!("Unsupported audit format '{}'", other),
            }),
        }
    }

    fn render(self, record: &BoardingRecord) -> Result<String> {
        match self {
            AuditFormat::Text => Ok(record.audit_line()),
            AuditFormat::Json => Ok(serde_json::to_string(record)?),
        }
    }
}

/// 每日一個稽核檔 (`<prefix>_DD-MM-YYYY.txt`)，每筆事件開檔附加一行後關閉
#[derive(Debug, Clone)]
pub struct FileAuditSink {
    directory: PathBuf,
    prefix: String,
    format: AuditFormat,
}

impl FileAuditSink {
    pub fn new<P: AsRef<Path>>(directory: P, prefix: &str, format: AuditFormat) -> Self {
        Self {
            directory: directory.as_ref().to_path_buf(),
            prefix: prefix.to_string(),
            format,
        }
    }

    pub fn file_path_for(&self, record: &BoardingRecord) -> PathBuf {
        self.directory.join(format!(
            "{}_{}.txt",
            self.prefix,
            record.boarded_at.format("%d-%m-%Y")
        ))
    }
}

impl AuditSink for FileAuditSink {
    fn append(&self, record: &BoardingRecord) -> Result<()> {
        let path = self.file_path_for(record);
        let line = self.format.render(record)?;

        let unavailable = |e: std::io::Error| GateError::SinkUnavailable {
            reason: format!("{}: {}", path.display(), e),
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(unavailable)?;
        writeln!(file, "{}", line).map_err(unavailable)?;
        file.flush().map_err(unavailable)?;
        Ok(())
    }
}

/// 保存在記憶體中的稽核行，供測試與診斷使用
#[derive(Debug, Default)]
pub struct MemoryAuditSink {
    lines: Mutex<Vec<String>>,
}

impl MemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .map(|lines| lines.clone())
            .unwrap_or_default()
    }
}

impl AuditSink for MemoryAuditSink {
    fn append(&self, record: &BoardingRecord) -> Result<()> {
        let mut lines = self.lines.lock().map_err(|_| GateError::SinkUnavailable {
            reason: "memory sink lock poisoned".to_string(),
        })?;
        lines.push(record.audit_line());
        Ok(())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NullAuditSink;

impl AuditSink for NullAuditSink {
    fn append(&self, _record: &BoardingRecord) -> Result<()> {
        Ok(())
    }
}

/// 依設定建立稽核輸出；目錄無法建立時只記錄警告，稽核會在寫入時降級
pub fn build_audit_sink(config: &impl ConfigProvider) -> Result<Box<dyn AuditSink>> {
    if !config.audit_enabled() {
        tracing::info!("📝 Boarding audit file disabled");
        return Ok(Box::new(NullAuditSink));
    }

    let format = AuditFormat::from_name(config.audit_format())?;
    let directory = Path::new(config.audit_directory());
    if let Err(e) = fs::create_dir_all(directory) {
        tracing::warn!(
            "⚠️ Audit directory {} unavailable: {}",
            directory.display(),
            e
        );
    }

    tracing::info!("📝 Boarding audit written to {}", directory.display());
    Ok(Box::new(FileAuditSink::new(
        directory,
        config.audit_file_prefix(),
        format,
    )))
}
