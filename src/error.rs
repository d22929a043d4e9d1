use thiserror::Error;

/// 报表计算与数据读取错误
#[derive(Debug, Error)]
pub enum ReportError {
    /// 单据编号不是 `YYYY-MM-DD-<序号>` 格式
    #[error("invalid document id format: {0}")]
    InvalidIdFormat(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("export failed: {0}")]
    Export(String),
}

impl From<csv::Error> for ReportError {
    fn from(err: csv::Error) -> Self {
        ReportError::Export(err.to_string())
    }
}

pub type ReportResult<T> = Result<T, ReportError>;
