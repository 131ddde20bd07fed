// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// 应用程序配置设置
///
/// 包含数据库和日志配置项
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 数据库配置
    #[serde(default)]
    pub database: DatabaseSettings,
    /// 日志配置
    #[serde(default)]
    pub log: LogSettings,
}

/// 数据库配置设置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatabaseSettings {
    /// 数据库连接字符串 (postgres URL, MySQL DSN 或 SQLite 文件路径)
    #[serde(default)]
    pub dsn: String,
    /// 可写数据目录，相对的 SQLite 路径会被放到该目录下
    #[serde(default)]
    pub data_path: Option<PathBuf>,
}

/// 日志配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct LogSettings {
    /// 日志级别，"debug" 表示开启 SQL 日志
    pub level: String,
}

impl DatabaseSettings {
    /// 返回非空的数据目录
    pub fn data_path(&self) -> Option<&Path> {
        self.data_path
            .as_deref()
            .filter(|p| !p.as_os_str().is_empty())
    }
}

impl LogSettings {
    pub fn is_debug(&self) -> bool {
        self.level == "debug"
    }
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Plain environment names honoured on top of the `LOADGATE__` prefix.
const ENV_OVERRIDES: [(&str, &str); 3] = [
    ("DATABASE_DSN", "database.dsn"),
    ("DATA_PATH", "database.data_path"),
    ("LOG_LEVEL", "log.level"),
];

impl Settings {
    /// 创建新的配置实例
    ///
    /// 从配置文件和进程环境变量加载配置，支持默认值
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        Self::from_vars(std::env::vars().collect())
    }

    /// 从给定的环境变量表加载配置
    ///
    /// 进程环境只在 [`Settings::new`] 中读取一次，测试可以直接注入变量表
    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self, ConfigError> {
        let env = vars
            .get("APP_ENVIRONMENT")
            .cloned()
            .unwrap_or_else(|| "default".to_string());

        let mut builder = Config::builder()
            .set_default("log.level", "info")?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                Environment::with_prefix("LOADGATE")
                    .separator("__")
                    .source(Some(vars.clone())),
            );

        for (name, key) in ENV_OVERRIDES {
            // Empty values count as unset
            let value = vars.get(name).filter(|v| !v.is_empty()).cloned();
            builder = builder.set_override_option(key, value)?;
        }

        builder.build()?.try_deserialize()
    }
}
