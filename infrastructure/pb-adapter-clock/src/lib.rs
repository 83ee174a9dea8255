//! 時刻アダプター
use pb_domain::port::driven::Clock;
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Debug, Default)]
pub struct ClockAdapter;

impl ClockAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Clock for ClockAdapter {
    fn now_secs(&self) -> u64 {
        // エポック以前に巻き戻った時計は 0 とみなす（ロックは解除側に倒れる）
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_clock_is_after_2020() {
        assert!(ClockAdapter::new().now_secs() > 1_577_836_800);
    }
}
