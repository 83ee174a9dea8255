//! plzblock の既定パス解決

use std::path::{Path, PathBuf};

/// 既定のデータディレクトリ
///
/// - Windows: `%ProgramData%\plzblock`（未設定なら `C:\ProgramData\plzblock`）
/// - その他: `./var`（開発/テスト用）
pub fn default_data_dir() -> PathBuf {
    #[cfg(windows)]
    {
        let base =
            std::env::var("ProgramData").unwrap_or_else(|_| r"C:\ProgramData".to_string());
        PathBuf::from(base).join("plzblock")
    }
    #[cfg(not(windows))]
    {
        PathBuf::from("./var")
    }
}

/// ファイルバックエンドの格納ルート
pub fn store_root(data_dir: &Path) -> PathBuf {
    data_dir.join("store")
}

/// ライフサイクルログのパス
pub fn lifecycle_log_path(data_dir: &Path) -> PathBuf {
    data_dir.join("logs").join(pb_log_utils::LIFECYCLE_LOG_FILE)
}
