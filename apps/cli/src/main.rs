//! pb-cli: ブラウザのURLブロックリスト（ポリシー）を編集し、
//! 指定時間だけ編集を禁止する「集中ロック」を掛けるCLI。

use clap::{Parser, Subcommand};
use pb_composition::app::{
    AddOutcome, BlocklistUseCase, GateStatus, LockOutcome, LockStatus, RemoveOutcome,
};
use pb_composition::error::Result;
use pb_composition::{Backend, CliRuntime, RuntimeConfig, format_utc_secs};
use serde::Serialize;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

const EXIT_OK: i32 = 0;
const EXIT_FAILURE: i32 = 1;

const LOG_ENV: &str = "PB_LOG";

#[derive(Parser, Debug)]
#[command(name = "pb-cli", about = "Browser URL blocklist manager with a focus lock")]
struct Cli {
    /// 格納先（registry / file）。未指定なら PB_BACKEND、既定はOS依存
    #[arg(long, global = true)]
    backend: Option<Backend>,
    /// データディレクトリ（ファイルバックエンドとログ）。未指定なら PB_DATA_DIR
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// ブロック中のサイトを昇順に表示
    List {
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// サイトを追加
    Add { domain: String },
    /// サイトを削除（大文字小文字を無視して一致する全件）
    Remove { domain: String },
    /// 集中ロックを有効化（1〜168時間）
    Lock {
        #[arg(long)]
        hours: u32,
    },
    /// ロック状態を表示（ロック中でも実行可）
    Status {
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

impl Command {
    fn is_gated(&self) -> bool {
        !matches!(self, Command::Status { .. })
    }
}

#[derive(Serialize)]
struct JsonSiteList {
    sites: Vec<String>,
}

#[derive(Serialize)]
struct JsonLockStatus {
    backend: String,
    locked: bool,
    now: u64,
    lock_until: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    lock_until_utc: Option<String>,
}

fn main() {
    init_tracing();
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("pb-cli failed: {err}");
            std::process::exit(EXIT_FAILURE);
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    let config = RuntimeConfig::resolve(cli.backend, cli.data_dir)?;
    debug!(?config, "configuration resolved");

    // 全依存関係はComposition Rootで組み立て
    let runtime = CliRuntime::new(config);
    runtime.ensure_privileges()?;
    let service = runtime.service();

    if cli.command.is_gated() {
        if let GateStatus::Locked { until } = service.check_gate()? {
            println!("{}", focus_message(until));
            return Ok(EXIT_OK);
        }
    }

    match cli.command {
        Command::List { json } => {
            let sites = service.sorted_sites()?;
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&JsonSiteList { sites })?
                );
            } else if sites.is_empty() {
                println!("No sites are blocked.");
            } else {
                for site in sites {
                    println!("{site}");
                }
            }
            Ok(EXIT_OK)
        }
        Command::Add { domain } => {
            let outcome = service.add_site(&domain)?;
            if outcome == AddOutcome::Added {
                runtime.log_lifecycle(&format!("add {}", domain.trim()));
            }
            Ok(report(add_report(outcome, domain.trim())))
        }
        Command::Remove { domain } => {
            let outcome = service.remove_site(&domain)?;
            if outcome == RemoveOutcome::Removed {
                runtime.log_lifecycle(&format!("remove {}", domain.trim()));
            }
            Ok(report(remove_report(outcome, domain.trim())))
        }
        Command::Lock { hours } => {
            let outcome = service.activate_lock(hours)?;
            if let LockOutcome::Activated { until } = outcome {
                runtime.log_lifecycle(&format!("lock {hours}h until {until}"));
            }
            Ok(report(lock_report(outcome, hours)))
        }
        Command::Status { json } => {
            let status = service.lock_status()?;
            if json {
                let payload = json_status(runtime.config().backend, status);
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else {
                println!("{}", status_text(status));
            }
            Ok(EXIT_OK)
        }
    }
}

struct Report {
    code: i32,
    text: String,
}

fn report(r: Report) -> i32 {
    if r.code == EXIT_OK {
        println!("{}", r.text);
    } else {
        eprintln!("{}", r.text);
    }
    r.code
}

fn ok(text: String) -> Report {
    Report {
        code: EXIT_OK,
        text,
    }
}

fn fail(text: String) -> Report {
    Report {
        code: EXIT_FAILURE,
        text,
    }
}

fn focus_message(until: u64) -> String {
    format!(
        "Focus on your work! The settings are locked until {}.",
        format_utc_secs(until)
    )
}

fn add_report(outcome: AddOutcome, site: &str) -> Report {
    match outcome {
        AddOutcome::Added => ok(format!("'{site}' has been added to the blocklist.")),
        AddOutcome::Duplicate => fail(format!("'{site}' already exists.")),
        AddOutcome::Empty => fail("Please enter a domain.".to_string()),
        AddOutcome::Locked { until } => fail(focus_message(until)),
    }
}

fn remove_report(outcome: RemoveOutcome, site: &str) -> Report {
    match outcome {
        RemoveOutcome::Removed => ok(format!("'{site}' has been removed from the blocklist.")),
        RemoveOutcome::NotFound => fail(format!("'{site}' is not in the blocklist.")),
        RemoveOutcome::Empty => fail("Please enter a domain.".to_string()),
        RemoveOutcome::Locked { until } => fail(focus_message(until)),
    }
}

fn lock_report(outcome: LockOutcome, hours: u32) -> Report {
    match outcome {
        LockOutcome::Activated { until } => ok(format!(
            "Locked for {hours} hour(s), until {}.",
            format_utc_secs(until)
        )),
        LockOutcome::AlreadyLocked { until } => fail(focus_message(until)),
    }
}

fn status_text(status: LockStatus) -> String {
    if status.locked {
        format!("Locked until {}", format_utc_secs(status.lock_until))
    } else {
        "Unlocked".to_string()
    }
}

fn json_status(backend: Backend, status: LockStatus) -> JsonLockStatus {
    JsonLockStatus {
        backend: backend.to_string(),
        locked: status.locked,
        now: status.now,
        lock_until: status.lock_until,
        lock_until_utc: (status.lock_until > 0).then(|| format_utc_secs(status.lock_until)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    const T0: u64 = 1_760_000_000;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "pb-cli", "add", "example.com", "--backend", "file", "--data-dir", "d",
        ])
        .unwrap();
        assert_eq!(cli.backend, Some(Backend::File));
        assert_eq!(cli.data_dir, Some(PathBuf::from("d")));
        assert!(matches!(cli.command, Command::Add { ref domain } if domain == "example.com"));
    }

    #[test]
    fn lock_hours_range_is_left_to_validation() {
        // 範囲外は実行時の検証エラー（終了コード1）、非数値は使用法エラー（2）
        assert!(Cli::try_parse_from(["pb-cli", "lock", "--hours", "169"]).is_ok());
        let err = Cli::try_parse_from(["pb-cli", "lock", "--hours", "two"]).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn unknown_backend_is_usage_error() {
        let err = Cli::try_parse_from(["pb-cli", "--backend", "sqlite", "list"]).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn status_is_not_gated() {
        assert!(!Command::Status { json: false }.is_gated());
        assert!(Command::List { json: false }.is_gated());
        assert!(Command::Lock { hours: 1 }.is_gated());
    }

    #[test]
    fn logical_failures_exit_with_one() {
        assert_eq!(add_report(AddOutcome::Added, "a").code, EXIT_OK);
        assert_eq!(add_report(AddOutcome::Duplicate, "a").code, EXIT_FAILURE);
        assert_eq!(add_report(AddOutcome::Empty, "").code, EXIT_FAILURE);
        assert_eq!(remove_report(RemoveOutcome::NotFound, "a").code, EXIT_FAILURE);
        assert_eq!(
            lock_report(LockOutcome::AlreadyLocked { until: T0 }, 1).code,
            EXIT_FAILURE
        );
    }

    #[test]
    fn messages_name_the_site_and_time() {
        assert_eq!(
            add_report(AddOutcome::Duplicate, "example.com").text,
            "'example.com' already exists."
        );
        assert!(focus_message(T0).contains("2025-10-09 08:53:20 UTC"));
        assert_eq!(
            status_text(LockStatus {
                now: T0,
                lock_until: T0 + 7_200,
                locked: true
            }),
            "Locked until 2025-10-09 10:53:20 UTC"
        );
    }

    #[test]
    fn json_status_omits_time_when_never_locked() {
        let value = serde_json::to_value(json_status(
            Backend::File,
            LockStatus {
                now: T0,
                lock_until: 0,
                locked: false,
            },
        ))
        .unwrap();
        assert_eq!(value["backend"], "file");
        assert_eq!(value["locked"], false);
        assert!(value.get("lock_until_utc").is_none());
    }
}
