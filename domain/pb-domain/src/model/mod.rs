//! ドメインモデル

mod lock;
mod namespace;
mod ordinal_key;
mod stored_value;

pub use lock::*;
pub use namespace::*;
pub use ordinal_key::*;
pub use stored_value::*;
