//! 日志初始化
//!
//! 基于 tracing；库 crate 通过 `log` 输出的记录也会被桥接进来。

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// 噪声较大的依赖统一降到 warn
const QUIET_TARGETS: [&str; 3] = ["hyper", "reqwest", "h2"];

/// 构建过滤器：`RUST_LOG` 优先，否则使用给定级别
pub fn build_filter(level: &str) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }

    QUIET_TARGETS.iter().fold(EnvFilter::new(level), |filter, target| {
        match format!("{}=warn", target).parse() {
            Ok(directive) => filter.add_directive(directive),
            Err(_) => filter,
        }
    })
}

/// 初始化全局日志；重复调用时静默忽略
pub fn init_logging(level: &str) {
    let _ = tracing_subscriber::registry()
        .with(build_filter(level))
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .try_init();
}
