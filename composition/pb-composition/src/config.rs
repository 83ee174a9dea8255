//! 実行時設定の解決
//!
//! 優先順位: CLIフラグ > 環境変数（`PB_BACKEND` / `PB_DATA_DIR`）> 既定値

use crate::error::{Result, err};
use crate::paths;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

pub const ENV_BACKEND: &str = "PB_BACKEND";
pub const ENV_DATA_DIR: &str = "PB_DATA_DIR";

/// ブロックリストとロック状態の格納先
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// HKLM レジストリ（ブラウザが実際に読むポリシー）
    Registry,
    /// データディレクトリ配下のJSONファイル
    File,
}

impl Backend {
    pub fn platform_default() -> Self {
        if cfg!(windows) {
            Backend::Registry
        } else {
            Backend::File
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Registry => "registry",
            Backend::File => "file",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "registry" | "reg" => Ok(Backend::Registry),
            "file" | "fs" => Ok(Backend::File),
            other => Err(format!("unknown backend: {other} (expected registry or file)")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub backend: Backend,
    pub data_dir: PathBuf,
}

impl RuntimeConfig {
    /// プロセス環境変数を使って解決
    pub fn resolve(backend: Option<Backend>, data_dir: Option<PathBuf>) -> Result<Self> {
        Self::resolve_with(backend, data_dir, |key| std::env::var(key).ok())
    }

    pub fn resolve_with(
        backend: Option<Backend>,
        data_dir: Option<PathBuf>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let backend = match backend {
            Some(b) => b,
            None => match env(ENV_BACKEND).filter(|v| !v.trim().is_empty()) {
                Some(raw) => raw
                    .parse::<Backend>()
                    .map_err(|e| err(format!("{ENV_BACKEND}: {e}")))?,
                None => Backend::platform_default(),
            },
        };
        let data_dir = data_dir
            .or_else(|| {
                env(ENV_DATA_DIR)
                    .filter(|v| !v.trim().is_empty())
                    .map(PathBuf::from)
            })
            .unwrap_or_else(paths::default_data_dir);
        Ok(Self { backend, data_dir })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_without_flags_or_env() {
        let config = RuntimeConfig::resolve_with(None, None, env_of(&[])).unwrap();
        assert_eq!(config.backend, Backend::platform_default());
        assert_eq!(config.data_dir, paths::default_data_dir());
    }

    #[test]
    fn env_overrides_defaults() {
        let config = RuntimeConfig::resolve_with(
            None,
            None,
            env_of(&[(ENV_BACKEND, "File"), (ENV_DATA_DIR, "/tmp/pb")]),
        )
        .unwrap();
        assert_eq!(config.backend, Backend::File);
        assert_eq!(config.data_dir, PathBuf::from("/tmp/pb"));
    }

    #[test]
    fn flags_override_env() {
        let config = RuntimeConfig::resolve_with(
            Some(Backend::Registry),
            Some(PathBuf::from("flag-dir")),
            env_of(&[(ENV_BACKEND, "file"), (ENV_DATA_DIR, "env-dir")]),
        )
        .unwrap();
        assert_eq!(config.backend, Backend::Registry);
        assert_eq!(config.data_dir, PathBuf::from("flag-dir"));
    }

    #[test]
    fn blank_env_values_are_ignored() {
        let config = RuntimeConfig::resolve_with(
            None,
            None,
            env_of(&[(ENV_BACKEND, "  "), (ENV_DATA_DIR, "")]),
        )
        .unwrap();
        assert_eq!(config.backend, Backend::platform_default());
        assert_eq!(config.data_dir, paths::default_data_dir());
    }

    #[test]
    fn unknown_backend_in_env_is_error() {
        let result = RuntimeConfig::resolve_with(None, None, env_of(&[(ENV_BACKEND, "sqlite")]));
        let message = result.unwrap_err().to_string();
        assert!(message.contains(ENV_BACKEND));
        assert!(message.contains("sqlite"));
    }

    #[test]
    fn backend_parses_aliases() {
        assert_eq!("REG".parse::<Backend>().unwrap(), Backend::Registry);
        assert_eq!("fs".parse::<Backend>().unwrap(), Backend::File);
        assert_eq!(Backend::File.to_string(), "file");
    }
}
