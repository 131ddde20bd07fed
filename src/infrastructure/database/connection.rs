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

use super::dialect::DialectKind;
use super::dsn::{redact, NormalizedDsn, SqliteTarget, SQLITE_BUSY_TIMEOUT};
use super::pool::{self, PoolLimits, PoolStatus};
use crate::config::settings::{DatabaseSettings, LogSettings};
use crate::utils::errors::DatabaseError;
use log::LevelFilter;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::ops::Deref;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// 慢查询阈值
pub const SLOW_STATEMENT_THRESHOLD: Duration = Duration::from_secs(1);

/// 每个连接缓存的预编译语句数量
pub const STATEMENT_CACHE_CAPACITY: usize = 100;

/// 各方言的驱动参数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverTuning {
    /// 每个连接缓存的预编译语句数量，0 表示不缓存
    pub statement_cache_capacity: usize,
    /// SQLite 写锁等待时间
    pub busy_timeout: Option<Duration>,
}

impl DriverTuning {
    pub fn for_dialect(dialect: DialectKind) -> Self {
        match dialect {
            // Poolers in front of postgres cannot share named statements
            DialectKind::Postgres => Self {
                statement_cache_capacity: 0,
                busy_timeout: None,
            },
            DialectKind::MySql => Self {
                statement_cache_capacity: STATEMENT_CACHE_CAPACITY,
                busy_timeout: None,
            },
            DialectKind::Sqlite => Self {
                statement_cache_capacity: STATEMENT_CACHE_CAPACITY,
                busy_timeout: Some(SQLITE_BUSY_TIMEOUT),
            },
        }
    }
}

/// 已建立的数据库连接
///
/// 由启动流程持有，通过引用或 `Arc` 传给使用方
#[derive(Debug)]
pub struct DatabaseHandle {
    connection: DatabaseConnection,
    dialect: DialectKind,
    limits: PoolLimits,
}

impl DatabaseHandle {
    pub fn connection(&self) -> &DatabaseConnection {
        &self.connection
    }

    pub fn dialect(&self) -> DialectKind {
        self.dialect
    }

    pub fn limits(&self) -> PoolLimits {
        self.limits
    }

    /// 当前连接池状态
    pub fn status(&self) -> Result<PoolStatus, DatabaseError> {
        pool::inspect(&self.connection)
    }

    pub fn into_connection(self) -> DatabaseConnection {
        self.connection
    }

    /// 关闭连接池，在进程退出前调用
    pub async fn close(self) -> Result<(), DatabaseError> {
        self.connection.close().await?;
        Ok(())
    }
}

impl Deref for DatabaseHandle {
    type Target = DatabaseConnection;

    fn deref(&self) -> &Self::Target {
        &self.connection
    }
}

/// 建立数据库连接池
///
/// 根据连接字符串推断方言，规范化连接字符串，打开连接并统一设置连接池参数
///
/// # 参数
///
/// * `settings` - 数据库配置
/// * `log` - 日志配置，级别为 `debug` 时开启 SQL 日志
///
/// 只有空白字符的连接字符串视为未配置；非空的连接字符串原样使用，不做裁剪
///
/// # 返回值
///
/// * `Ok(DatabaseHandle)` - 数据库连接
/// * `Err(DatabaseError)` - 连接过程中出现的错误
pub async fn establish(
    settings: &DatabaseSettings,
    log: &LogSettings,
) -> Result<DatabaseHandle, DatabaseError> {
    if settings.dsn.trim().is_empty() {
        return Err(DatabaseError::NotConfigured);
    }

    let normalized = NormalizedDsn::new(&settings.dsn, settings.data_path())?;
    debug!(
        dialect = %normalized.dialect,
        dsn = %redact(&normalized.dsn),
        "Normalized database DSN"
    );

    if let Some(dir) = normalized.sqlite.as_ref().and_then(SqliteTarget::parent_dir) {
        create_database_dir(dir)?;
    }

    let limits = PoolLimits::default();
    let opt = connect_options(&normalized, log, limits);
    let connection = Database::connect(opt).await?;

    let status = pool::inspect(&connection)?;
    limits.verify(&status)?;

    info!(
        dialect = %normalized.dialect,
        max_idle = limits.max_idle,
        max_open = limits.max_open,
        max_lifetime_secs = limits.max_lifetime.as_secs(),
        "Database connection established"
    );

    Ok(DatabaseHandle {
        connection,
        dialect: normalized.dialect,
        limits,
    })
}

/// 构建连接选项
pub fn connect_options(
    normalized: &NormalizedDsn,
    log: &LogSettings,
    limits: PoolLimits,
) -> ConnectOptions {
    let mut opt = ConnectOptions::new(normalized.url.clone());
    limits.apply(&mut opt);

    if log.is_debug() {
        opt.sqlx_logging(true)
            .sqlx_logging_level(LevelFilter::Info)
            .sqlx_slow_statements_logging_settings(LevelFilter::Warn, SLOW_STATEMENT_THRESHOLD);
    } else {
        opt.sqlx_logging(false);
    }

    let tuning = DriverTuning::for_dialect(normalized.dialect);
    match normalized.dialect {
        DialectKind::Postgres => {
            opt.map_sqlx_postgres_opts(move |o| {
                o.statement_cache_capacity(tuning.statement_cache_capacity)
            });
        }
        DialectKind::MySql => {
            opt.map_sqlx_mysql_opts(move |o| {
                o.statement_cache_capacity(tuning.statement_cache_capacity)
            });
        }
        DialectKind::Sqlite => {
            let filename = match &normalized.sqlite {
                Some(SqliteTarget::File(path)) => Some(path.clone()),
                _ => None,
            };
            opt.map_sqlx_sqlite_opts(move |o| {
                let o = o.statement_cache_capacity(tuning.statement_cache_capacity);
                let o = match tuning.busy_timeout {
                    Some(timeout) => o.busy_timeout(timeout),
                    None => o,
                };
                match &filename {
                    Some(path) => o.filename(path).create_if_missing(true),
                    None => o,
                }
            });
        }
    }

    opt
}

/// 创建 SQLite 数据库所在目录
fn create_database_dir(dir: &Path) -> Result<(), DatabaseError> {
    let mut builder = std::fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o755);
    }

    builder
        .create(dir)
        .map_err(|source| DatabaseError::CreateDirectory {
            path: dir.to_path_buf(),
            source,
        })?;
    debug!(path = %dir.display(), "Database directory ready");
    Ok(())
}
