//! テスト用のメモリ上キー値ストア

use crate::error::StorageAccessError;
use crate::model::{Namespace, StoredValue, ValueData};
use crate::port::driven::{KeyValueStore, NamespaceHandle};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

#[derive(Default)]
pub(crate) struct MemoryStore {
    spaces: RefCell<BTreeMap<String, BTreeMap<String, ValueData>>>,
    pub open_handles: Cell<usize>,
    pub opens: Cell<usize>,
    pub fail_with: RefCell<Option<StorageAccessError>>,
}

impl MemoryStore {
    pub fn seed(&self, namespace: &Namespace, name: &str, data: ValueData) {
        self.spaces
            .borrow_mut()
            .entry(namespace.path().to_string())
            .or_default()
            .insert(name.to_string(), data);
    }

    pub fn exists(&self, namespace: &Namespace) -> bool {
        self.spaces.borrow().contains_key(namespace.path())
    }

    pub fn names(&self, namespace: &Namespace) -> Vec<String> {
        self.spaces
            .borrow()
            .get(namespace.path())
            .map(|m| m.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn get_raw(&self, namespace: &Namespace, name: &str) -> Option<ValueData> {
        self.spaces
            .borrow()
            .get(namespace.path())
            .and_then(|m| m.get(name).cloned())
    }
}

impl KeyValueStore for MemoryStore {
    fn open(
        &self,
        namespace: &Namespace,
        create: bool,
    ) -> Result<Option<Box<dyn NamespaceHandle + '_>>, StorageAccessError> {
        if let Some(err) = self.fail_with.borrow().clone() {
            return Err(err);
        }
        let path = namespace.path().to_string();
        {
            let mut spaces = self.spaces.borrow_mut();
            if !spaces.contains_key(&path) {
                if !create {
                    return Ok(None);
                }
                spaces.insert(path.clone(), BTreeMap::new());
            }
        }
        self.opens.set(self.opens.get() + 1);
        self.open_handles.set(self.open_handles.get() + 1);
        Ok(Some(Box::new(MemoryHandle { store: self, path })))
    }
}

struct MemoryHandle<'a> {
    store: &'a MemoryStore,
    path: String,
}

impl Drop for MemoryHandle<'_> {
    fn drop(&mut self) {
        self.store
            .open_handles
            .set(self.store.open_handles.get() - 1);
    }
}

impl NamespaceHandle for MemoryHandle<'_> {
    fn enumerate(&self) -> Result<Vec<StoredValue>, StorageAccessError> {
        let spaces = self.store.spaces.borrow();
        Ok(spaces
            .get(&self.path)
            .map(|m| {
                m.iter()
                    .map(|(name, data)| StoredValue {
                        name: name.clone(),
                        data: data.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    fn get(&self, name: &str) -> Result<Option<ValueData>, StorageAccessError> {
        Ok(self.store.get_raw(&Namespace::new(self.path.clone()), name))
    }

    fn set_text(&mut self, name: &str, value: &str) -> Result<(), StorageAccessError> {
        self.store
            .spaces
            .borrow_mut()
            .entry(self.path.clone())
            .or_default()
            .insert(name.to_string(), ValueData::Text(value.to_string()));
        Ok(())
    }

    fn delete(&mut self, name: &str) -> Result<bool, StorageAccessError> {
        Ok(self
            .store
            .spaces
            .borrow_mut()
            .get_mut(&self.path)
            .is_some_and(|m| m.remove(name).is_some()))
    }
}
