// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::utils::errors::DatabaseError;
use sea_orm::{ConnectOptions, DatabaseConnection};
use std::time::Duration;

/// 连接池限制，所有方言统一使用
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolLimits {
    /// 最大空闲连接数
    pub max_idle: u32,
    /// 最大连接数
    pub max_open: u32,
    /// 单个连接的最长存活时间
    pub max_lifetime: Duration,
}

impl Default for PoolLimits {
    fn default() -> Self {
        Self {
            max_idle: 50,
            max_open: 500,
            max_lifetime: Duration::from_secs(3600),
        }
    }
}

/// sqlx has no idle-count cap, so surplus idle connections are reaped after this long.
const IDLE_TIMEOUT: Duration = Duration::from_secs(600);

impl PoolLimits {
    /// 将连接池限制写入连接选项
    pub fn apply(&self, opt: &mut ConnectOptions) {
        opt.max_connections(self.max_open)
            .min_connections(0)
            .idle_timeout(IDLE_TIMEOUT)
            .max_lifetime(self.max_lifetime);
    }

    /// 校验已打开连接池的实际配置
    pub fn verify(&self, status: &PoolStatus) -> Result<(), DatabaseError> {
        if status.max_connections != self.max_open {
            return Err(DatabaseError::PoolIntrospection(format!(
                "连接池最大连接数为 {}，期望 {}",
                status.max_connections, self.max_open
            )));
        }
        if status.max_lifetime != Some(self.max_lifetime) {
            return Err(DatabaseError::PoolIntrospection(format!(
                "连接最长存活时间为 {:?}，期望 {:?}",
                status.max_lifetime, self.max_lifetime
            )));
        }
        Ok(())
    }
}

/// 连接池状态快照
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStatus {
    /// 当前连接数 (含空闲)
    pub size: u32,
    /// 当前空闲连接数
    pub idle: usize,
    /// 配置的最大连接数
    pub max_connections: u32,
    /// 配置的最长存活时间
    pub max_lifetime: Option<Duration>,
}

impl PoolStatus {
    fn from_pool<DB: sqlx::Database>(pool: &sqlx::Pool<DB>) -> Self {
        let options = pool.options();
        Self {
            size: pool.size(),
            idle: pool.num_idle(),
            max_connections: options.get_max_connections(),
            max_lifetime: options.get_max_lifetime(),
        }
    }
}

/// 读取底层 sqlx 连接池的状态
///
/// 连接已断开或不是 sqlx 连接池时返回 [`DatabaseError::PoolIntrospection`]
pub fn inspect(conn: &DatabaseConnection) -> Result<PoolStatus, DatabaseError> {
    match conn {
        DatabaseConnection::SqlxPostgresPoolConnection(_) => {
            Ok(PoolStatus::from_pool(conn.get_postgres_connection_pool()))
        }
        DatabaseConnection::SqlxMySqlPoolConnection(_) => {
            Ok(PoolStatus::from_pool(conn.get_mysql_connection_pool()))
        }
        DatabaseConnection::SqlxSqlitePoolConnection(_) => {
            Ok(PoolStatus::from_pool(conn.get_sqlite_connection_pool()))
        }
        _ => Err(DatabaseError::PoolIntrospection(
            "连接未绑定 sqlx 连接池".to_string(),
        )),
    }
}
