//! ブロックリスト管理ユースケースポート

use crate::error::DomainError;

/// 起動時ゲートの判定結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateStatus {
    Unlocked,
    /// `until`（エポック秒）まで編集不可
    Locked { until: u64 },
}

/// 追加操作の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    /// 大文字小文字を無視して同じ値が既に存在
    Duplicate,
    /// 空白のみの入力
    Empty,
    Locked { until: u64 },
}

/// 削除操作の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed,
    NotFound,
    Empty,
    Locked { until: u64 },
}

/// ロック有効化の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockOutcome {
    Activated { until: u64 },
    AlreadyLocked { until: u64 },
}

/// 現在のロック状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockStatus {
    pub now: u64,
    pub lock_until: u64,
    pub locked: bool,
}

/// ブロックリスト管理ユースケース
pub trait BlocklistUseCase {
    /// 起動時のロック判定
    fn check_gate(&self) -> Result<GateStatus, DomainError>;

    /// 値の昇順に並べたブロックリスト
    fn sorted_sites(&self) -> Result<Vec<String>, DomainError>;

    /// サイトを追加
    fn add_site(&self, input: &str) -> Result<AddOutcome, DomainError>;

    /// サイトを削除（大文字小文字を無視して一致する全件）
    fn remove_site(&self, input: &str) -> Result<RemoveOutcome, DomainError>;

    /// 指定時間だけロックを有効化
    fn activate_lock(&self, hours: u32) -> Result<LockOutcome, DomainError>;

    /// ロック状態を取得
    fn lock_status(&self) -> Result<LockStatus, DomainError>;
}
