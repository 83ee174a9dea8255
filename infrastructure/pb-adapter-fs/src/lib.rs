//! ファイルシステムアダプター（キー値ストアのJSONファイル実装）
//!
//! レジストリの無い環境向け。名前空間のパス要素をディレクトリ階層に対応させ、
//! `<root>\SOFTWARE\...\URLBlocklist` を `<root>/SOFTWARE/.../URLBlocklist.json` に格納する。
//! ファイルは値名 → 値のJSONオブジェクトで、文字列以外の値も保持する。
use pb_domain::StorageAccessError;
use pb_domain::model::{Namespace, StoredValue, ValueData};
use pb_domain::port::driven::{KeyValueStore, NamespaceHandle};
use serde_json::{Map, Value};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// 指定ルートディレクトリでアダプターを作成。ファイルは遅延作成。
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// 名前空間に対応するファイルパス
    pub fn file_path(&self, namespace: &Namespace) -> Result<PathBuf, StorageAccessError> {
        let segments: Vec<&str> = namespace.segments().collect();
        let Some((last, parents)) = segments.split_last() else {
            return Err(StorageAccessError::Unavailable(
                "empty namespace path".into(),
            ));
        };
        if let Some(bad) = segments
            .iter()
            .find(|s| **s == "." || **s == ".." || s.contains(['/', ':', '\0']))
        {
            return Err(StorageAccessError::Unavailable(format!(
                "invalid namespace segment {bad:?} in {}",
                namespace.path()
            )));
        }
        let mut path = self.root.clone();
        path.extend(parents);
        // 要素にドットを含んでも拡張子として扱われないよう連結する
        path.push(format!("{last}.json"));
        Ok(path)
    }
}

impl KeyValueStore for FileStore {
    fn open(
        &self,
        namespace: &Namespace,
        create: bool,
    ) -> Result<Option<Box<dyn NamespaceHandle + '_>>, StorageAccessError> {
        let path = self.file_path(namespace)?;
        let values = match fs::read_to_string(&path) {
            Ok(text) => parse_values(&text, &path)?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                if !create {
                    return Ok(None);
                }
                let values = Map::new();
                write_atomic(&path, &values)?;
                debug!(path = %path.display(), "namespace file created");
                values
            }
            Err(e) => return Err(map_io_error(e, "read", &path)),
        };
        debug!(path = %path.display(), count = values.len(), "namespace file opened");
        Ok(Some(Box::new(FileHandle { path, values })))
    }
}

/// 開いた名前空間ファイル。変更の都度ファイル全体を書き戻す
struct FileHandle {
    path: PathBuf,
    values: Map<String, Value>,
}

impl NamespaceHandle for FileHandle {
    fn enumerate(&self) -> Result<Vec<StoredValue>, StorageAccessError> {
        Ok(self
            .values
            .iter()
            .map(|(name, value)| StoredValue {
                name: name.clone(),
                data: to_value_data(value),
            })
            .collect())
    }

    fn get(&self, name: &str) -> Result<Option<ValueData>, StorageAccessError> {
        Ok(self.values.get(name).map(to_value_data))
    }

    fn set_text(&mut self, name: &str, value: &str) -> Result<(), StorageAccessError> {
        let previous = self
            .values
            .insert(name.to_string(), Value::String(value.to_string()));
        if let Err(e) = write_atomic(&self.path, &self.values) {
            // 書き込み失敗時はハンドル上の状態も戻す
            match previous {
                Some(old) => self.values.insert(name.to_string(), old),
                None => self.values.remove(name),
            };
            return Err(e);
        }
        Ok(())
    }

    fn delete(&mut self, name: &str) -> Result<bool, StorageAccessError> {
        let Some(previous) = self.values.remove(name) else {
            return Ok(false);
        };
        if let Err(e) = write_atomic(&self.path, &self.values) {
            self.values.insert(name.to_string(), previous);
            return Err(e);
        }
        Ok(true)
    }
}

fn to_value_data(value: &Value) -> ValueData {
    match value {
        Value::String(text) => ValueData::Text(text.clone()),
        Value::Null => ValueData::Other { kind: "null".into() },
        Value::Bool(_) => ValueData::Other { kind: "bool".into() },
        Value::Number(_) => ValueData::Other {
            kind: "number".into(),
        },
        Value::Array(_) => ValueData::Other {
            kind: "array".into(),
        },
        Value::Object(_) => ValueData::Other {
            kind: "object".into(),
        },
    }
}

fn parse_values(text: &str, path: &Path) -> Result<Map<String, Value>, StorageAccessError> {
    if text.trim().is_empty() {
        return Ok(Map::new());
    }
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(StorageAccessError::Corrupt(format!(
            "{} is not a JSON object",
            path.display()
        ))),
        Err(e) => Err(StorageAccessError::Corrupt(format!(
            "{}: {e}",
            path.display()
        ))),
    }
}

fn map_io_error(err: io::Error, op: &str, path: &Path) -> StorageAccessError {
    let msg = format!("{op} {}: {err}", path.display());
    match err.kind() {
        io::ErrorKind::PermissionDenied => StorageAccessError::AccessDenied(msg),
        io::ErrorKind::InvalidData => StorageAccessError::Corrupt(msg),
        _ => StorageAccessError::Unavailable(msg),
    }
}

fn write_atomic(path: &Path, values: &Map<String, Value>) -> Result<(), StorageAccessError> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(|e| map_io_error(e, "create_dir_all", dir))?;
    }
    let data = serde_json::to_vec_pretty(values)
        .map_err(|e| StorageAccessError::Corrupt(format!("serialize {}: {e}", path.display())))?;

    let tmp_path = path.with_extension(format!("json.tmp.{}", unique_suffix()));
    let written = (|| -> io::Result<()> {
        let mut f = fs::File::create(&tmp_path)?;
        f.write_all(&data)?;
        let _ = f.sync_all();
        Ok(())
    })();
    if let Err(e) = written {
        let _ = fs::remove_file(&tmp_path);
        return Err(map_io_error(e, "write temp file", &tmp_path));
    }
    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(map_io_error(e, "rename temp file", path));
    }
    Ok(())
}

fn unique_suffix() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    format!("{}.{}", std::process::id(), nanos)
}
