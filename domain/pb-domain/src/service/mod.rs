//! ドメインサービス

pub mod entry_store;
pub mod lock_gate;

#[cfg(test)]
pub(crate) mod memory;

pub use entry_store::EntryStore;
pub use lock_gate::LockGate;

pub type Result<T> = std::result::Result<T, crate::StorageAccessError>;
