//! 時刻ポート

pub trait Clock {
    /// エポックからの秒
    fn now_secs(&self) -> u64;
}
