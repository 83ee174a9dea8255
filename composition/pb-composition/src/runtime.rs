//! CLI 用ランタイム配線。

use crate::config::{Backend, RuntimeConfig};
use crate::error::{Result, err};
use crate::paths;
use pb_adapter_clock::ClockAdapter;
use pb_adapter_fs::FileStore;
use pb_adapter_registry::RegistryAdapter;
use pb_app::{BlocklistDeps, BlocklistService};
use pb_domain::port::driven::{Clock, KeyValueStore};
use tracing::debug;

const LIFECYCLE_COMPONENT: &str = "pb-cli";

/// CLI実行ファイル用の依存関係
pub struct CliRuntime {
    config: RuntimeConfig,
    store: Box<dyn KeyValueStore>,
    clock: ClockAdapter,
}

impl CliRuntime {
    pub fn new(config: RuntimeConfig) -> Self {
        let store: Box<dyn KeyValueStore> = match config.backend {
            Backend::Registry => Box::new(RegistryAdapter::new()),
            Backend::File => Box::new(FileStore::new(paths::store_root(&config.data_dir))),
        };
        debug!(backend = %config.backend, data_dir = %config.data_dir.display(), "runtime wired");
        Self {
            config,
            store,
            clock: ClockAdapter::new(),
        }
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// 格納先ポート取得
    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    pub fn clock(&self) -> &dyn Clock {
        &self.clock
    }

    /// ブロックリストのユースケースを組み立てる
    pub fn service(&self) -> BlocklistService<'_> {
        BlocklistService::new(BlocklistDeps {
            store: self.store.as_ref(),
            clock: &self.clock,
        })
    }

    /// レジストリ（HKLM）への書き込みには管理者権限が必要
    pub fn requires_elevation(&self) -> bool {
        self.config.backend == Backend::Registry
    }

    /// 権限の前提条件を確認する
    pub fn ensure_privileges(&self) -> Result<()> {
        self.check_privileges(crate::is_elevated())
    }

    fn check_privileges(&self, elevated: bool) -> Result<()> {
        if self.requires_elevation() && !elevated {
            return Err(err(
                "administrator privileges are required for the registry backend \
                 (run as administrator, or use --backend file)",
            ));
        }
        Ok(())
    }

    /// ライフサイクルログに1行追記する（失敗は無視）
    pub fn log_lifecycle(&self, message: &str) {
        if pb_log_utils::write_lifecycle_line(&self.config.data_dir, LIFECYCLE_COMPONENT, message)
            .is_none()
        {
            debug!(message, "lifecycle log not written");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pb_domain::port::driving::{AddOutcome, BlocklistUseCase, GateStatus};

    fn file_runtime(dir: &std::path::Path) -> CliRuntime {
        CliRuntime::new(RuntimeConfig {
            backend: Backend::File,
            data_dir: dir.to_path_buf(),
        })
    }

    #[test]
    fn file_backend_persists_under_store_root() {
        let dir = tempfile::tempdir().unwrap();
        let runtime = file_runtime(dir.path());
        let service = runtime.service();

        assert_eq!(service.check_gate().unwrap(), GateStatus::Unlocked);
        assert_eq!(service.add_site("example.com").unwrap(), AddOutcome::Added);

        let policy = paths::store_root(dir.path())
            .join("SOFTWARE")
            .join("Policies")
            .join("Google")
            .join("Chrome")
            .join("URLBlocklist.json");
        assert!(policy.is_file());

        // 別ランタイムからも見える
        let again = file_runtime(dir.path());
        assert_eq!(again.service().sorted_sites().unwrap(), vec!["example.com"]);
    }

    #[test]
    fn file_backend_needs_no_elevation() {
        let dir = tempfile::tempdir().unwrap();
        let runtime = file_runtime(dir.path());
        assert!(!runtime.requires_elevation());
        assert!(runtime.check_privileges(false).is_ok());
    }

    #[test]
    fn registry_backend_refuses_without_elevation() {
        let runtime = CliRuntime::new(RuntimeConfig {
            backend: Backend::Registry,
            data_dir: "unused".into(),
        });
        assert!(runtime.requires_elevation());
        let message = runtime.check_privileges(false).unwrap_err().to_string();
        assert!(message.contains("administrator"));
        assert!(runtime.check_privileges(true).is_ok());
    }

    #[test]
    fn lifecycle_lines_go_to_data_dir_logs() {
        let dir = tempfile::tempdir().unwrap();
        let runtime = file_runtime(dir.path());
        runtime.log_lifecycle("add example.com");

        let content = std::fs::read_to_string(paths::lifecycle_log_path(dir.path())).unwrap();
        assert!(content.contains("[pb-cli] add example.com"));
    }
}
