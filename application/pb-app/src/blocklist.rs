//! ブロックリスト管理ユースケース。
//!
//! 編集系の操作は毎回ロック状態を読み直してから実行する（状態はキャッシュしない）。

use pb_domain::DomainError;
use pb_domain::model::LockDuration;
use pb_domain::port::driven::{Clock, KeyValueStore};
use pb_domain::port::driving::{
    AddOutcome, BlocklistUseCase, GateStatus, LockOutcome, LockStatus, RemoveOutcome,
};
use pb_domain::service::{EntryStore, LockGate};
use tracing::info;

pub struct BlocklistDeps<'a> {
    pub store: &'a dyn KeyValueStore,
    pub clock: &'a dyn Clock,
}

pub struct BlocklistService<'a> {
    entries: EntryStore<'a>,
    gate: LockGate<'a>,
    clock: &'a dyn Clock,
}

impl<'a> BlocklistService<'a> {
    pub fn new(deps: BlocklistDeps<'a>) -> Self {
        Self {
            entries: EntryStore::new(deps.store),
            gate: LockGate::new(deps.store),
            clock: deps.clock,
        }
    }

    fn current_gate(&self) -> Result<GateStatus, DomainError> {
        let now = self.clock.now_secs();
        let until = self.gate.get_lock_until()?;
        if now < until {
            Ok(GateStatus::Locked { until })
        } else {
            Ok(GateStatus::Unlocked)
        }
    }
}

impl BlocklistUseCase for BlocklistService<'_> {
    fn check_gate(&self) -> Result<GateStatus, DomainError> {
        self.current_gate()
    }

    fn sorted_sites(&self) -> Result<Vec<String>, DomainError> {
        let mut sites = self.entries.list()?;
        sites.sort();
        Ok(sites)
    }

    fn add_site(&self, input: &str) -> Result<AddOutcome, DomainError> {
        let site = input.trim();
        if site.is_empty() {
            return Ok(AddOutcome::Empty);
        }
        if let GateStatus::Locked { until } = self.current_gate()? {
            return Ok(AddOutcome::Locked { until });
        }
        if self.entries.add(site)? {
            info!(site, "site added to blocklist");
            Ok(AddOutcome::Added)
        } else {
            Ok(AddOutcome::Duplicate)
        }
    }

    fn remove_site(&self, input: &str) -> Result<RemoveOutcome, DomainError> {
        let site = input.trim();
        if site.is_empty() {
            return Ok(RemoveOutcome::Empty);
        }
        if let GateStatus::Locked { until } = self.current_gate()? {
            return Ok(RemoveOutcome::Locked { until });
        }
        if self.entries.remove(site)? {
            info!(site, "site removed from blocklist");
            Ok(RemoveOutcome::Removed)
        } else {
            Ok(RemoveOutcome::NotFound)
        }
    }

    fn activate_lock(&self, hours: u32) -> Result<LockOutcome, DomainError> {
        let duration = LockDuration::from_hours(hours)?;
        if let GateStatus::Locked { until } = self.current_gate()? {
            return Ok(LockOutcome::AlreadyLocked { until });
        }
        let until = self.gate.activate(self.clock.now_secs(), duration)?;
        info!(%duration, lock_until = until, "lock activated");
        Ok(LockOutcome::Activated { until })
    }

    fn lock_status(&self) -> Result<LockStatus, DomainError> {
        let now = self.clock.now_secs();
        let lock_until = self.gate.get_lock_until()?;
        Ok(LockStatus {
            now,
            lock_until,
            locked: now < lock_until,
        })
    }
}
