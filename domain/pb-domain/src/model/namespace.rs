//! 格納先の名前空間

/// HKLM 配下のキーパス（ファイル実装ではディレクトリ階層に対応）
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Namespace {
    path: String,
}

/// ブラウザのポリシーが読むブロックリスト
pub const BLOCKLIST_PATH: &str = r"SOFTWARE\Policies\Google\Chrome\URLBlocklist";
/// アプリ自身の状態（ロック期限）
pub const APP_STATE_PATH: &str = r"SOFTWARE\MyTools\ChromeBlocker";
/// ロック期限の値名
pub const LOCK_UNTIL_VALUE: &str = "LockUntil";

impl Namespace {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    pub fn blocklist() -> Self {
        Self::new(BLOCKLIST_PATH)
    }

    pub fn app_state() -> Self {
        Self::new(APP_STATE_PATH)
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// `\` 区切りのパス要素（空要素は除く）
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.path.split('\\').filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segments_split_on_backslash() {
        let ns = Namespace::blocklist();
        let segs: Vec<&str> = ns.segments().collect();
        assert_eq!(
            segs,
            vec!["SOFTWARE", "Policies", "Google", "Chrome", "URLBlocklist"]
        );
    }

    #[test]
    fn segments_skip_empty_parts() {
        let ns = Namespace::new(r"\A\\B\");
        assert_eq!(ns.segments().collect::<Vec<_>>(), vec!["A", "B"]);
    }
}
