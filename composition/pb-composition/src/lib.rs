//! pb-composition: CLI 向けのランタイムを組み立てるコンポジションルート。
//! ドメイン／アプリケーション／各種アダプタをここで配線し、apps/* はこのクレートだけに依存する。

pub mod config;
pub mod error;
pub mod paths;
pub mod runtime;

// apps/* が内側レイヤーの型に触れる必要がある場合は、ここから辿れるようにする。
pub use pb_app as app;
pub use pb_domain as domain;

pub use config::{Backend, RuntimeConfig};
pub use runtime::CliRuntime;

/// 管理者権限で実行中か
pub use pb_adapter_privilege::is_elevated;

/// 時刻表示（UTC）
pub use pb_log_utils::format_utc_secs;
