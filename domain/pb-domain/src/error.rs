//! ドメインエラー型
//!
//! 重複・未検出は戻り値で表し、ここには入れない。

use thiserror::Error;

/// 永続ストレージへのアクセス失敗
///
/// 権限不足・破損・I/O障害のいずれも呼び出し元へそのまま伝播する（内部で再試行しない）。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageAccessError {
    /// アクセス拒否（管理者権限不足など）
    #[error("storage access denied: {0}")]
    AccessDenied(String),

    /// 格納データが解釈できない
    #[error("storage data corrupt: {0}")]
    Corrupt(String),

    /// ストレージに到達できない（I/O障害、未対応プラットフォーム）
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// アプリケーション層に渡すエラー型
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// ストレージアクセス失敗
    #[error(transparent)]
    Storage(#[from] StorageAccessError),

    /// 入力値が許容範囲外
    #[error("validation error: {0}")]
    Validation(String),
}

impl DomainError {
    /// ストレージ由来のエラーか
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Storage(_))
    }
}
