//! 序数キー
//!
//! ブロックリストの各値は10進整数の値名で格納される。
//! キー名は格納先の識別にのみ使われ、表示順とは無関係。

use std::fmt;

/// 10進整数として解釈できる値名
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OrdinalKey(u64);

impl OrdinalKey {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }

    /// 値名を序数キーとして解釈する
    ///
    /// ASCII数字のみで構成され、u64に収まるものだけを受け付ける。
    /// 他ツールが書いた非数値キーは `None`（呼び出し側で読み飛ばす）。
    pub fn parse(name: &str) -> Option<Self> {
        if name.is_empty() || !name.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        name.parse::<u64>().ok().map(Self)
    }

    /// 次の序数キー（u64::MAX の次は存在しない）
    pub fn next(&self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

impl fmt::Display for OrdinalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
