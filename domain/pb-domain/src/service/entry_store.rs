//! ブロックリスト格納サービス
//!
//! 値は序数キー（10進整数の値名）で格納する。既存の数値キーの最大値 + 1 を採番し、
//! 同一インスタンスの間に観測したキーの最大値も下限として使うので、
//! 削除済みのキーは再利用しない。非数値キー（他ツールが書いたもの）は
//! 採番時に読み飛ばす。
//!
//! 値の一覧はメモリ上に持たず、各操作が open → 走査 → 変更 → close を完結させる。
//! 重複確認と書き込みの間に他プロセスが書き込む競合は防がない。

use super::Result;
use crate::error::StorageAccessError;
use crate::model::{Namespace, OrdinalKey, fold_case};
use crate::port::driven::KeyValueStore;
use std::cell::Cell;
use tracing::debug;

pub struct EntryStore<'a> {
    store: &'a dyn KeyValueStore,
    namespace: Namespace,
    // このインスタンスで観測した序数キーの最大値
    high_water: Cell<Option<OrdinalKey>>,
}

impl<'a> EntryStore<'a> {
    /// ブラウザポリシーのブロックリストを対象にする
    pub fn new(store: &'a dyn KeyValueStore) -> Self {
        Self::with_namespace(store, Namespace::blocklist())
    }

    pub fn with_namespace(store: &'a dyn KeyValueStore, namespace: Namespace) -> Self {
        Self {
            store,
            namespace,
            high_water: Cell::new(None),
        }
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// 格納済みの全値（キー順は不定）。名前空間が無ければ空
    pub fn list(&self) -> Result<Vec<String>> {
        let Some(handle) = self.store.open(&self.namespace, false)? else {
            return Ok(Vec::new());
        };
        let values = handle.enumerate()?;
        self.observe(values.iter().map(|v| v.name.as_str()));
        Ok(values
            .into_iter()
            .filter_map(|v| v.data.as_text().map(str::to_string))
            .collect())
    }

    /// 値を追加する
    ///
    /// 大文字小文字を無視して同じ値があれば何もせず `false`。
    /// それ以外は新しい序数キーで値をそのまま（大文字小文字を保って）書き込み `true`。
    pub fn add(&self, value: &str) -> Result<bool> {
        self.add_with_key(value).map(|key| key.is_some())
    }

    /// `add` と同じだが、採番したキーを返す（重複時は `None`）
    pub fn add_with_key(&self, value: &str) -> Result<Option<OrdinalKey>> {
        let Some(mut handle) = self.store.open(&self.namespace, true)? else {
            return Err(StorageAccessError::Unavailable(format!(
                "failed to create {}",
                self.namespace.path()
            )));
        };
        let existing = handle.enumerate()?;
        self.observe(existing.iter().map(|v| v.name.as_str()));

        let folded = fold_case(value);
        if existing.iter().any(|v| v.matches(&folded)) {
            debug!(value, "duplicate entry, not added");
            return Ok(None);
        }

        let key = self
            .high_water
            .get()
            .map_or(Some(OrdinalKey::new(1)), |max| max.next())
            .ok_or_else(|| {
                StorageAccessError::Corrupt(format!(
                    "ordinal key space exhausted in {}",
                    self.namespace.path()
                ))
            })?;
        handle.set_text(&key.to_string(), value)?;
        self.high_water.set(Some(key));
        debug!(value, key = key.value(), "entry added");
        Ok(Some(key))
    }

    /// 大文字小文字を無視して一致する値を全て削除する
    ///
    /// 1件以上削除したら `true`。残りのキーは振り直さない。
    pub fn remove(&self, value: &str) -> Result<bool> {
        let Some(mut handle) = self.store.open(&self.namespace, false)? else {
            return Ok(false);
        };
        let folded = fold_case(value);
        let existing = handle.enumerate()?;
        self.observe(existing.iter().map(|v| v.name.as_str()));
        let names: Vec<String> = existing
            .into_iter()
            .filter(|v| v.matches(&folded))
            .map(|v| v.name)
            .collect();

        let mut removed = false;
        for name in &names {
            removed |= handle.delete(name)?;
        }
        debug!(value, count = names.len(), "entries removed");
        Ok(removed)
    }

    fn observe<'n>(&self, names: impl Iterator<Item = &'n str>) {
        let max = names.filter_map(OrdinalKey::parse).max();
        if max > self.high_water.get() {
            self.high_water.set(max);
        }
    }
}
