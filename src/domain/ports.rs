use crate::domain::model::BoardingRecord;
use crate::utils::error::Result;

/// 登機事件的稽核輸出，只附加不回讀
pub trait AuditSink: Send + Sync {
    fn append(&self, record: &BoardingRecord) -> Result<()>;
}

impl<T: AuditSink + ?Sized> AuditSink for Box<T> {
    fn append(&self, record: &BoardingRecord) -> Result<()> {
        (**self).append(record)
    }
}

pub trait ConfigProvider: Send + Sync {
    fn audit_enabled(&self) -> bool;
    fn audit_directory(&self) -> &str;
    fn audit_file_prefix(&self) -> &str;
    fn audit_format(&self) -> &str;
    fn credentials_file(&self) -> &str;
}
