//! ログユーティリティ（stdのみ）
//!
//! ライフサイクルログ（1操作1行の追記ログ）と、UTC時刻の整形を提供する。

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

pub const LIFECYCLE_LOG_FILE: &str = "pb-lifecycle.log";

/// UTCのRFC3339（ミリ秒付き）。例: 2025-01-15T10:30:00.123Z
pub fn utc_rfc3339_millis() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    let (year, month, day, hour, minute, second) = unix_seconds_to_utc_components(now.as_secs());
    format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}.{:03}Z",
        year,
        month,
        day,
        hour,
        minute,
        second,
        now.subsec_millis()
    )
}

/// エポック秒を人間向けのUTC表記にする。例: 2025-10-09 08:53:20 UTC
pub fn format_utc_secs(secs: u64) -> String {
    let (year, month, day, hour, minute, second) = unix_seconds_to_utc_components(secs);
    format!(
        "{:04}-{:02}-{:02} {:02}:{:02}:{:02} UTC",
        year, month, day, hour, minute, second
    )
}

/// UTCタイムスタンプ付きのライフサイクル行を作成する。
pub fn lifecycle_line(component: &str, message: &str) -> String {
    format!("[{}] [{}] {}\n", utc_rfc3339_millis(), component, message)
}

/// ライフサイクルログの出力先候補（優先順）
pub fn lifecycle_log_paths(data_dir: &Path) -> Vec<PathBuf> {
    vec![
        data_dir.join("logs").join(LIFECYCLE_LOG_FILE),
        std::env::temp_dir().join(LIFECYCLE_LOG_FILE),
    ]
}

/// 指定された出力先のうち、書き込み可能な最初の場所にログを書き込む
///
/// 書き込めた場所を返す。ログの失敗で本処理を止めないため、エラーは返さない。
pub fn write_line_to_paths(line: &str, paths: &[PathBuf]) -> Option<PathBuf> {
    for path in paths {
        if let Some(dir) = path.parent() {
            let _ = std::fs::create_dir_all(dir);
        }
        let Ok(mut file) = OpenOptions::new().create(true).append(true).open(path) else {
            continue;
        };
        if file.write_all(line.as_bytes()).is_ok() {
            let _ = file.flush();
            return Some(path.clone());
        }
    }
    None
}

/// データディレクトリ配下のライフサイクルログに1行書き込む
pub fn write_lifecycle_line(data_dir: &Path, component: &str, message: &str) -> Option<PathBuf> {
    let line = lifecycle_line(component, message);
    write_line_to_paths(&line, &lifecycle_log_paths(data_dir))
}

fn unix_seconds_to_utc_components(secs: u64) -> (i64, u32, u32, u32, u32, u32) {
    let days = (secs / 86_400) as i64;
    let rem = secs % 86_400;
    let hour = (rem / 3_600) as u32;
    let minute = ((rem % 3_600) / 60) as u32;
    let second = (rem % 60) as u32;
    let (year, month, day) = civil_from_days(days);
    (year, month, day, hour, minute, second)
}

fn civil_from_days(days: i64) -> (i64, u32, u32) {
    // Howard Hinnant のアルゴリズム
    let z = days + 719_468;
    let era = if z >= 0 { z } else { z - 146_096 } / 146_097;
    let doe = z - era * 146_097; // [0, 146096]
    let yoe = (doe - doe / 1_460 + doe / 36_524 - doe / 146_096) / 365; // [0, 399]
    let y = yoe + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100); // [0, 365]
    let mp = (5 * doy + 2) / 153; // [0, 11]
    let d = doy - (153 * mp + 2) / 5 + 1; // [1, 31]
    let m = mp + if mp < 10 { 3 } else { -9 }; // [1, 12]
    let year = y + if m <= 2 { 1 } else { 0 };
    (year, m as u32, d as u32)
}
