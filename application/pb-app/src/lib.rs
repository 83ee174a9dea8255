//! pb-app: アプリケーション層のファサード。
//! ドメインサービス（EntryStore / LockGate）とポートを組み合わせて、
//! 表示層が呼ぶユースケースを実装する。

pub mod blocklist;

pub use blocklist::{BlocklistDeps, BlocklistService};
pub use pb_domain::port::driving::{
    AddOutcome, BlocklistUseCase, GateStatus, LockOutcome, LockStatus, RemoveOutcome,
};
