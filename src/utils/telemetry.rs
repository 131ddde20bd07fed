// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::LogSettings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// 默认日志过滤规则，`RUST_LOG` 优先
pub fn default_filter(log: &LogSettings) -> String {
    if log.is_debug() {
        "debug,sqlx=info".to_string()
    } else {
        format!("{},loadgate=info", log.level)
    }
}

pub fn init_telemetry(log: &LogSettings) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(log).into()))
        .with(tracing_subscriber::fmt::layer().with_ansi(log.is_debug()))
        .init();
}
