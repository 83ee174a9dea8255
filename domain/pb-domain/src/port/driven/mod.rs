//! 駆動ポート（出力インターフェース）。
//!
//! ドメインが外部に求める機能を定義する。
//! インフラ層のアダプタが実装する。

mod clock;
mod key_value_store;

pub use clock::*;
pub use key_value_store::*;
