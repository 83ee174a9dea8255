//! plzblock ドメイン層
//!
//! ブロックリストの格納規則（序数キー採番・大文字小文字を無視した重複判定）と
//! 時間ロックの判定を持つ。ヘキサゴナルアーキテクチャの最内層で、
//! 永続化はポート越しにのみ行う。

pub mod error;   // ドメインエラー定義
pub mod model;   // 値オブジェクト
pub mod port;    // ポート（driving/driven）
pub mod service; // ドメインサービス

pub use error::{DomainError, StorageAccessError}; // エラー型を再エクスポート
