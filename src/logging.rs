//! 文件日志
//!
//! 终端被 TUI 占用，日志写入数据目录下的 chouqian.log。

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;

pub const LOG_FILE: &str = "chouqian.log";

/// 打开日志文件，无法创建时返回 None
fn file_appender(dir: &Path) -> Option<RollingFileAppender> {
    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(LOG_FILE)
        .build(dir)
        .ok()
}

/// 初始化日志。`RUST_LOG` 优先于配置文件中的级别。
///
/// 日志文件无法创建时不记录日志，返回 None。
/// 返回的 guard 必须存活到程序结束，否则缓冲中的日志会丢失。
pub fn init(dir: &Path, level: &str) -> Option<WorkerGuard> {
    let appender = file_appender(dir)?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init();

    Some(guard)
}
