//! 時間ロックゲート
//!
//! アプリ状態の名前空間に「この時刻まで編集不可」のエポック秒を10進文字列で1つだけ持つ。
//! 値が無い、または現在時刻以下ならロック解除状態。解除は時間経過のみで起こり、
//! 呼び出し側は編集の前に毎回 `is_locked` を確認する。
//!
//! `set_lock_until` はロック中でも無条件に上書きする（過去の時刻を書けば即時解除）。
//! 同じ権限で読み書きできるため、これは自己規律のための仕組みでありセキュリティ境界ではない。

use super::Result;
use crate::error::StorageAccessError;
use crate::model::{LOCK_UNTIL_VALUE, LockDuration, Namespace, ValueData};
use crate::port::driven::KeyValueStore;
use tracing::debug;

pub struct LockGate<'a> {
    store: &'a dyn KeyValueStore,
    namespace: Namespace,
}

impl<'a> LockGate<'a> {
    pub fn new(store: &'a dyn KeyValueStore) -> Self {
        Self::with_namespace(store, Namespace::app_state())
    }

    pub fn with_namespace(store: &'a dyn KeyValueStore, namespace: Namespace) -> Self {
        Self { store, namespace }
    }

    /// 保存されたロック期限（未設定なら 0）
    pub fn get_lock_until(&self) -> Result<u64> {
        let Some(handle) = self.store.open(&self.namespace, false)? else {
            return Ok(0);
        };
        match handle.get(LOCK_UNTIL_VALUE)? {
            None => Ok(0),
            Some(ValueData::Text(text)) => parse_lock_until(&text).ok_or_else(|| {
                StorageAccessError::Corrupt(format!("{LOCK_UNTIL_VALUE} is not a timestamp: {text:?}"))
            }),
            Some(ValueData::Other { kind }) => Err(StorageAccessError::Corrupt(format!(
                "{LOCK_UNTIL_VALUE} has unexpected type {kind}"
            ))),
        }
    }

    /// ロック期限を無条件に上書きする
    pub fn set_lock_until(&self, timestamp: u64) -> Result<()> {
        let Some(mut handle) = self.store.open(&self.namespace, true)? else {
            return Err(StorageAccessError::Unavailable(format!(
                "failed to create {}",
                self.namespace.path()
            )));
        };
        handle.set_text(LOCK_UNTIL_VALUE, &timestamp.to_string())?;
        debug!(lock_until = timestamp, "lock timestamp written");
        Ok(())
    }

    /// `now < get_lock_until()`
    pub fn is_locked(&self, now: u64) -> Result<bool> {
        Ok(now < self.get_lock_until()?)
    }

    /// `now + duration` までロックし、その期限を返す
    pub fn activate(&self, now: u64, duration: LockDuration) -> Result<u64> {
        let until = now.saturating_add(duration.as_secs());
        self.set_lock_until(until)?;
        Ok(until)
    }
}

/// 10進文字列の期限を解釈する
///
/// 小数部付き（例: `1760000000.25`）は切り捨て、負値は 0 とみなす。
fn parse_lock_until(text: &str) -> Option<u64> {
    let text = text.trim();
    if let Ok(secs) = text.parse::<u64>() {
        return Some(secs);
    }
    let secs = text.parse::<f64>().ok().filter(|v| v.is_finite())?;
    if secs <= 0.0 {
        return Some(0);
    }
    // `as` は u64::MAX で飽和する
    Some(secs.trunc() as u64)
}
