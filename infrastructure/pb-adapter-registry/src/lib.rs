//! Windows レジストリアダプター
//!
//! HKLM 配下のキーを名前空間として、値の列挙・取得・書き込み・削除を行う。
//! 64bit ビュー（KEY_WOW64_64KEY）固定。ブラウザのポリシーは64bitビューから読まれる。
//! キーハンドルは `RegistryHandle` の Drop で必ず閉じる。

use pb_domain::StorageAccessError;
use pb_domain::model::Namespace;
use pb_domain::port::driven::{KeyValueStore, NamespaceHandle};

/// プラットフォーム中立のハンドル
#[cfg(windows)]
pub type RegistryAdapter = WindowsRegistryAdapter;
#[cfg(not(windows))]
pub type RegistryAdapter = NonWindowsRegistryAdapter;

#[cfg(windows)]
#[derive(Debug, Default)]
pub struct WindowsRegistryAdapter;

#[cfg(windows)]
impl WindowsRegistryAdapter {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(windows)]
impl KeyValueStore for WindowsRegistryAdapter {
    fn open(
        &self,
        namespace: &Namespace,
        create: bool,
    ) -> Result<Option<Box<dyn NamespaceHandle + '_>>, StorageAccessError> {
        let handle = windows_impl::open_key(namespace.path(), create)?;
        Ok(handle.map(|h| Box::new(h) as Box<dyn NamespaceHandle>))
    }
}

#[cfg(not(windows))]
#[derive(Debug, Default)]
pub struct NonWindowsRegistryAdapter;

#[cfg(not(windows))]
impl NonWindowsRegistryAdapter {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(not(windows))]
impl KeyValueStore for NonWindowsRegistryAdapter {
    fn open(
        &self,
        namespace: &Namespace,
        _create: bool,
    ) -> Result<Option<Box<dyn NamespaceHandle + '_>>, StorageAccessError> {
        Err(StorageAccessError::Unavailable(format!(
            "registry is not supported on this platform: HKLM\\{}",
            namespace.path()
        )))
    }
}

#[cfg(windows)]
mod windows_impl {
    use pb_domain::StorageAccessError;
    use pb_domain::model::{StoredValue, ValueData};
    use pb_domain::port::driven::NamespaceHandle;
    use tracing::debug;
    use windows::Win32::Foundation::{
        ERROR_ACCESS_DENIED, ERROR_FILE_NOT_FOUND, ERROR_INVALID_DATA, ERROR_MORE_DATA,
        ERROR_NO_MORE_ITEMS, ERROR_PATH_NOT_FOUND, ERROR_SUCCESS, WIN32_ERROR,
    };
    use windows::Win32::System::Registry::{
        HKEY, HKEY_LOCAL_MACHINE, KEY_QUERY_VALUE, KEY_SET_VALUE, KEY_WOW64_64KEY,
        REG_EXPAND_SZ, REG_OPTION_NON_VOLATILE, REG_SZ, REG_VALUE_TYPE, RRF_RT_ANY, RegCloseKey,
        RegCreateKeyExW, RegDeleteValueW, RegEnumValueW, RegGetValueW, RegOpenKeyExW,
        RegSetValueExW,
    };
    use windows::core::{PCWSTR, PWSTR};

    // 値名の最大長（文字数、終端NUL込み）
    const MAX_VALUE_NAME: usize = 16_384;

    pub(super) struct RegistryHandle {
        key: HKEY,
        path: String,
    }

    impl Drop for RegistryHandle {
        fn drop(&mut self) {
            unsafe {
                let _ = RegCloseKey(self.key);
            }
        }
    }

    pub(super) fn open_key(
        path: &str,
        create: bool,
    ) -> Result<Option<RegistryHandle>, StorageAccessError> {
        let wide_path = to_wide(path); // API呼び出し中にVecを生存させる
        let sam = KEY_QUERY_VALUE | KEY_SET_VALUE | KEY_WOW64_64KEY;
        let mut key: HKEY = HKEY::default();
        let status = unsafe {
            RegOpenKeyExW(
                HKEY_LOCAL_MACHINE,
                PCWSTR(wide_path.as_ptr()),
                Some(0),
                sam,
                &mut key,
            )
        };
        if status == ERROR_SUCCESS {
            return Ok(Some(RegistryHandle {
                key,
                path: path.to_string(),
            }));
        }
        if status != ERROR_FILE_NOT_FOUND && status != ERROR_PATH_NOT_FOUND {
            return Err(map_win32_error(status, "open", path));
        }
        if !create {
            return Ok(None);
        }

        let status = unsafe {
            RegCreateKeyExW(
                HKEY_LOCAL_MACHINE,
                PCWSTR(wide_path.as_ptr()),
                Some(0),
                None,
                REG_OPTION_NON_VOLATILE,
                sam,
                None,
                &mut key,
                None,
            )
        };
        if status != ERROR_SUCCESS {
            return Err(map_win32_error(status, "create", path));
        }
        debug!(path, "registry key created");
        Ok(Some(RegistryHandle {
            key,
            path: path.to_string(),
        }))
    }

    impl NamespaceHandle for RegistryHandle {
        fn enumerate(&self) -> Result<Vec<StoredValue>, StorageAccessError> {
            let mut results = Vec::new();
            let mut index: u32 = 0;
            let mut name_buf: Vec<u16> = vec![0; MAX_VALUE_NAME];
            let mut data: Vec<u8> = vec![0; 1024];

            loop {
                let mut name_len = name_buf.len() as u32;
                let mut data_len = data.len() as u32;
                let mut value_type: u32 = 0;
                let status = unsafe {
                    RegEnumValueW(
                        self.key,
                        index,
                        Some(PWSTR(name_buf.as_mut_ptr())),
                        &mut name_len,
                        None, // 予約
                        Some(&mut value_type),
                        Some(data.as_mut_ptr()),
                        Some(&mut data_len),
                    )
                };
                if status == ERROR_NO_MORE_ITEMS {
                    break;
                }
                if status == ERROR_MORE_DATA {
                    // データ領域を広げて同じインデックスを再取得
                    let wanted = (data_len as usize).max(data.len() * 2);
                    data.resize(wanted, 0);
                    continue;
                }
                if status != ERROR_SUCCESS {
                    return Err(map_win32_error(status, "enumerate", &self.path));
                }

                let name = String::from_utf16_lossy(&name_buf[..name_len as usize]);
                let bytes = &data[..data_len as usize];
                results.push(StoredValue {
                    name,
                    data: decode_value(REG_VALUE_TYPE(value_type), bytes),
                });
                index += 1;
            }
            Ok(results)
        }

        fn get(&self, name: &str) -> Result<Option<ValueData>, StorageAccessError> {
            let value_name = to_wide(name);
            let mut value_type = REG_VALUE_TYPE(0);
            let mut size_bytes: u32 = 0;
            let status = unsafe {
                RegGetValueW(
                    self.key,
                    PCWSTR::null(),
                    PCWSTR(value_name.as_ptr()),
                    RRF_RT_ANY,
                    Some(&mut value_type),
                    None,
                    Some(&mut size_bytes),
                )
            };
            if status == ERROR_FILE_NOT_FOUND {
                return Ok(None);
            }
            if status != ERROR_SUCCESS {
                return Err(map_win32_error(status, "read", &self.path));
            }

            let mut data: Vec<u8> = vec![0u8; size_bytes as usize];
            if size_bytes > 0 {
                let status = unsafe {
                    RegGetValueW(
                        self.key,
                        PCWSTR::null(),
                        PCWSTR(value_name.as_ptr()),
                        RRF_RT_ANY,
                        Some(&mut value_type),
                        Some(data.as_mut_ptr() as *mut _),
                        Some(&mut size_bytes),
                    )
                };
                if status == ERROR_FILE_NOT_FOUND {
                    return Ok(None);
                }
                if status != ERROR_SUCCESS {
                    return Err(map_win32_error(status, "read", &self.path));
                }
                data.truncate(size_bytes as usize);
            }
            Ok(Some(decode_value(value_type, &data)))
        }

        fn set_text(&mut self, name: &str, value: &str) -> Result<(), StorageAccessError> {
            let value_name = to_wide(name);
            let data = to_wide(value);
            let status = unsafe {
                RegSetValueExW(
                    self.key,
                    PCWSTR(value_name.as_ptr()),
                    Some(0),
                    REG_SZ,
                    Some(std::slice::from_raw_parts(
                        data.as_ptr() as *const u8,
                        data.len() * 2,
                    )),
                )
            };
            if status != ERROR_SUCCESS {
                return Err(map_win32_error(status, "write", &self.path));
            }
            Ok(())
        }

        fn delete(&mut self, name: &str) -> Result<bool, StorageAccessError> {
            let value_name = to_wide(name);
            let status = unsafe { RegDeleteValueW(self.key, PCWSTR(value_name.as_ptr())) };
            if status == ERROR_FILE_NOT_FOUND {
                return Ok(false); // 値が見つからない
            }
            if status != ERROR_SUCCESS {
                return Err(map_win32_error(status, "delete", &self.path));
            }
            Ok(true)
        }
    }

    fn decode_value(value_type: REG_VALUE_TYPE, bytes: &[u8]) -> ValueData {
        match value_type {
            REG_SZ | REG_EXPAND_SZ => ValueData::Text(decode_utf16(bytes)),
            other => ValueData::Other {
                kind: format!("type {}", other.0),
            },
        }
    }

    fn decode_utf16(bytes: &[u8]) -> String {
        let mut wide: Vec<u16> = bytes
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect();
        while matches!(wide.last(), Some(0)) {
            wide.pop();
        }
        String::from_utf16_lossy(&wide)
    }

    fn to_wide(s: &str) -> Vec<u16> {
        let mut wide: Vec<u16> = s.encode_utf16().collect();
        wide.push(0);
        wide
    }

    fn map_win32_error(status: WIN32_ERROR, op: &str, path: &str) -> StorageAccessError {
        if status == ERROR_ACCESS_DENIED {
            return StorageAccessError::AccessDenied(format!(
                "{op} HKLM\\{path}: access denied"
            ));
        }
        if status == ERROR_INVALID_DATA {
            return StorageAccessError::Corrupt(format!(
                "{op} HKLM\\{path}: invalid data"
            ));
        }
        StorageAccessError::Unavailable(format!(
            "{op} HKLM\\{path}: status={}",
            status.0
        ))
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn decode_strips_trailing_nuls() {
            let bytes: Vec<u8> = "ex.com\0\0"
                .encode_utf16()
                .flat_map(|u| u.to_le_bytes())
                .collect();
            assert_eq!(decode_utf16(&bytes), "ex.com");
        }

        #[test]
        fn decode_value_classifies_types() {
            let bytes: Vec<u8> = "a\0".encode_utf16().flat_map(|u| u.to_le_bytes()).collect();
            assert_eq!(
                decode_value(REG_SZ, &bytes),
                ValueData::Text("a".into())
            );
            assert!(matches!(
                decode_value(REG_VALUE_TYPE(4), &[1, 0, 0, 0]),
                ValueData::Other { .. }
            ));
        }

        #[test]
        fn access_denied_maps_to_storage_error() {
            assert!(matches!(
                map_win32_error(ERROR_ACCESS_DENIED, "open", "SOFTWARE\\X"),
                StorageAccessError::AccessDenied(_)
            ));
            assert!(matches!(
                map_win32_error(WIN32_ERROR(1234), "open", "SOFTWARE\\X"),
                StorageAccessError::Unavailable(_)
            ));
        }
    }
}
