//! 名前空間に格納された値

/// 値データ
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueData {
    /// 文字列型（REG_SZ、REG_EXPAND_SZ、JSON文字列）
    Text(String),
    /// その他の型（REG_DWORD など）。読み飛ばすが保持はする
    Other { kind: String },
}

impl ValueData {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ValueData::Text(text) => Some(text.as_str()),
            ValueData::Other { .. } => None,
        }
    }
}

/// 列挙で得られる1件分の値
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredValue {
    pub name: String,
    pub data: ValueData,
}

impl StoredValue {
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: ValueData::Text(value.into()),
        }
    }

    /// 大文字小文字を無視して文字列値が一致するか
    pub fn matches(&self, folded: &str) -> bool {
        self.data
            .as_text()
            .is_some_and(|text| fold_case(text) == folded)
    }
}

/// 比較用の正規化（Unicode小文字化）
pub fn fold_case(value: &str) -> String {
    value.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_ignores_case() {
        let value = StoredValue::text("1", "Example.COM");
        assert!(value.matches(&fold_case("example.com")));
        assert!(value.matches(&fold_case("EXAMPLE.com")));
        assert!(!value.matches(&fold_case("example.org")));
    }

    #[test]
    fn other_values_never_match() {
        let value = StoredValue {
            name: "1".into(),
            data: ValueData::Other {
                kind: "REG_DWORD".into(),
            },
        };
        assert!(!value.matches("1"));
        assert_eq!(value.data.as_text(), None);
    }
}
