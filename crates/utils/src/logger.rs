use std::fs;
use std::path::Path;
use tracing_subscriber::filter::{EnvFilter, FilterFn, LevelFilter};
use tracing_subscriber::fmt::time::OffsetTime;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, Layer};
use tracing_appender::{non_blocking, rolling};
use time::macros::offset;

use lending::SELECTOR_TARGET;

/// 日志管理器 - 基于target分类的日志系统
pub struct LoggerManager {
    _guards: Vec<non_blocking::WorkerGuard>,
}

impl LoggerManager {
    /// 初始化日志系统
    ///
    /// 日志分类：
    /// - app.log: 通用应用日志
    /// - flashloan.log: 闪电贷来源选择日志
    ///
    /// `level` 为控制台过滤规则，格式与 RUST_LOG 相同
    pub fn init(log_dir: &str, level: &str) -> Self {
        let mut guards = Vec::new();

        // 创建日志目录
        fs::create_dir_all(Path::new(log_dir)).ok();

        // 配置时区为东八区 (UTC+8 上海时间)
        let timer = OffsetTime::new(
            offset!(+8),
            time::format_description::well_known::Rfc3339,
        );

        // 1. 控制台输出
        let console_filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));
        let console_layer = fmt::layer()
            .compact()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_timer(timer.clone())
            .with_filter(console_filter);

        // 2. 通用应用日志 (app.log)
        let (app_writer, app_guard) = non_blocking(rolling::daily(log_dir, "app.log"));
        guards.push(app_guard);

        let app_layer = fmt::layer()
            .compact()
            .with_writer(app_writer)
            .with_ansi(false)
            .with_target(true)
            .with_timer(timer.clone())
            .with_filter(LevelFilter::INFO)
            .with_filter(FilterFn::new(|metadata| metadata.target() != SELECTOR_TARGET));

        // 3. 选择器日志 (flashloan.log)，包含 debug 级别的规则命中记录
        let (selector_writer, selector_guard) =
            non_blocking(rolling::daily(log_dir, "flashloan.log"));
        guards.push(selector_guard);

        let selector_layer = fmt::layer()
            .compact()
            .with_writer(selector_writer)
            .with_ansi(false)
            .with_target(true)
            .with_timer(timer)
            .with_filter(LevelFilter::DEBUG)
            .with_filter(FilterFn::new(|metadata| metadata.target() == SELECTOR_TARGET));

        // 初始化tracing订阅器
        tracing_subscriber::registry()
            .with(console_layer)
            .with(app_layer)
            .with(selector_layer)
            .init();

        Self { _guards: guards }
    }
}
