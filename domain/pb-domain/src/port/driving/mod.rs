//! 駆動ポート（外部から呼び出されるユースケースの入口）
//!
//! 表示層（CLI）が呼び出すユースケースを定義する。
//! アプリケーション層のサービスが実装する。

mod blocklist_use_case;

pub use blocklist_use_case::*;
