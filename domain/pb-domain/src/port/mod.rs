//! ポート（driving/driven）

pub mod driven;
pub mod driving;
