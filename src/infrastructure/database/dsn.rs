// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 连接字符串规范化
//!
//! 根据方言改写连接字符串，使底层 sqlx 驱动得到格式正确的输入。
//! 这里的函数都是纯函数，不访问文件系统或网络。

use super::dialect::{classify, DialectKind};
use crate::utils::errors::DsnError;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// SQLite 写锁等待时间
pub const SQLITE_BUSY_TIMEOUT: Duration = Duration::from_millis(5000);

const PARSE_TIME: &str = "parseTime";
const MYSQL_NETWORK: &str = "@tcp";
const MYSQL_DEFAULT_HOST: &str = "127.0.0.1";
const MYSQL_DEFAULT_PORT: u16 = 3306;
const SQLITE_MEMORY: &str = ":memory:";
const MASK: &str = "****";

/// SQLite 目标位置
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqliteTarget {
    Memory,
    File(PathBuf),
}

impl SqliteTarget {
    /// 需要预先创建的父目录
    ///
    /// 内存数据库或纯文件名没有需要创建的目录
    pub fn parent_dir(&self) -> Option<&Path> {
        match self {
            SqliteTarget::Memory => None,
            SqliteTarget::File(path) => path.parent().filter(|p| !p.as_os_str().is_empty()),
        }
    }

    /// sqlx 连接 URL
    ///
    /// 路径会被编码，避免 `?`、`#` 等字符被当作 URL 分隔符；实际文件名由连接选项单独设置
    fn url(&self) -> String {
        match self {
            SqliteTarget::Memory => "sqlite::memory:".to_string(),
            SqliteTarget::File(path) => {
                let encoded: String =
                    url::form_urlencoded::byte_serialize(path.to_string_lossy().as_bytes())
                        .collect();
                format!("sqlite://{encoded}?mode=rwc")
            }
        }
    }
}

/// 规范化后的连接字符串
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedDsn {
    /// 推断出的方言
    pub dialect: DialectKind,
    /// 调用方格式的规范化字符串 (MySQL 补齐 parseTime, SQLite 为实际路径)
    pub dsn: String,
    /// 交给 sqlx 的连接 URL
    pub url: String,
    /// SQLite 目标，其他方言为 `None`
    pub sqlite: Option<SqliteTarget>,
}

impl NormalizedDsn {
    /// 对连接字符串做方言推断和规范化
    ///
    /// # 参数
    ///
    /// * `dsn` - 原始连接字符串
    /// * `data_path` - 可写数据目录，仅对 SQLite 生效
    pub fn new(dsn: &str, data_path: Option<&Path>) -> Result<Self, DsnError> {
        let dialect = classify(dsn);
        match dialect {
            DialectKind::Postgres => Ok(Self {
                dialect,
                dsn: dsn.to_string(),
                url: dsn.to_string(),
                sqlite: None,
            }),
            DialectKind::MySql => {
                let dsn = ensure_parse_time(dsn);
                let url = mysql_url(&dsn)?;
                Ok(Self {
                    dialect,
                    dsn,
                    url,
                    sqlite: None,
                })
            }
            DialectKind::Sqlite => {
                let target = resolve_sqlite_path(dsn, data_path);
                let dsn = match &target {
                    SqliteTarget::Memory => SQLITE_MEMORY.to_string(),
                    SqliteTarget::File(path) => path.display().to_string(),
                };
                Ok(Self {
                    dialect,
                    dsn,
                    url: target.url(),
                    sqlite: Some(target),
                })
            }
        }
    }
}

/// 确保 MySQL DSN 带有 `parseTime` 参数
///
/// 已有查询参数时用 `&` 追加，否则用 `?`；已包含 `parseTime` 时原样返回
pub fn ensure_parse_time(dsn: &str) -> String {
    if dsn.contains(PARSE_TIME) {
        return dsn.to_string();
    }
    let separator = if dsn.contains('?') { '&' } else { '?' };
    format!("{dsn}{separator}{PARSE_TIME}=true")
}

/// 将 `user:pass@tcp(host:port)/db?k=v` 形式的 DSN 转换为 sqlx 可用的 `mysql://` URL
pub fn mysql_url(dsn: &str) -> Result<String, DsnError> {
    let at = dsn.rfind(MYSQL_NETWORK).ok_or(DsnError::MissingNetwork)?;
    let credentials = &dsn[..at];
    let rest = &dsn[at + 1..];

    // rest looks like "tcp(addr)/db?params" or "tcp/db"
    let (addr, rest) = match rest.find(['(', '/']) {
        Some(open) if rest.as_bytes()[open] == b'(' => {
            let close = rest[open..]
                .find(')')
                .map(|i| open + i)
                .ok_or_else(|| DsnError::UnterminatedAddress(rest.to_string()))?;
            (&rest[open + 1..close], &rest[close + 1..])
        }
        Some(slash) => ("", &rest[slash..]),
        None => return Err(DsnError::MissingDatabase),
    };

    let rest = rest.strip_prefix('/').ok_or(DsnError::MissingDatabase)?;
    let (database, query) = match rest.split_once('?') {
        Some((database, query)) => (database, Some(query)),
        None => (rest, None),
    };
    let (host, port) = split_host_port(addr)?;

    let mut url = Url::parse(&format!("mysql://{host}")).map_err(|e| DsnError::Url(e.to_string()))?;
    url.set_port(Some(port))
        .map_err(|_| DsnError::Url("cannot set port".to_string()))?;

    let (user, password) = match credentials.split_once(':') {
        Some((user, password)) => (user, Some(password)),
        None => (credentials, None),
    };
    if !user.is_empty() {
        url.set_username(user)
            .map_err(|_| DsnError::Url("cannot set username".to_string()))?;
        url.set_password(password)
            .map_err(|_| DsnError::Url("cannot set password".to_string()))?;
    }
    url.set_path(&format!("/{database}"));

    let params = query.map(translate_mysql_params).unwrap_or_default();
    if !params.is_empty() {
        url.query_pairs_mut().extend_pairs(params);
    }

    Ok(url.to_string())
}

fn split_host_port(addr: &str) -> Result<(&str, u16), DsnError> {
    if addr.is_empty() {
        return Ok((MYSQL_DEFAULT_HOST, MYSQL_DEFAULT_PORT));
    }

    // "[::1]:3306" keeps its brackets so it can be fed to Url as a host
    let (host, port) = if addr.starts_with('[') {
        match addr.find(']') {
            Some(end) => (&addr[..=end], addr[end + 1..].strip_prefix(':')),
            None => return Err(DsnError::UnterminatedAddress(addr.to_string())),
        }
    } else {
        match addr.rsplit_once(':') {
            Some((host, port)) => (host, Some(port)),
            None => (addr, None),
        }
    };

    let host = if host.is_empty() { MYSQL_DEFAULT_HOST } else { host };
    let port = match port {
        Some(port) => port
            .parse::<u16>()
            .map_err(|_| DsnError::InvalidPort(port.to_string()))?,
        None => MYSQL_DEFAULT_PORT,
    };
    Ok((host, port))
}

/// 保留 sqlx 理解的参数，其余丢弃
fn translate_mysql_params(query: &str) -> Vec<(String, String)> {
    let mut params = Vec::new();
    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        match key.as_ref() {
            "charset" => {
                let charset = value.split(',').next().unwrap_or_default();
                params.push(("charset".to_string(), charset.to_string()));
            }
            "collation" => params.push(("collation".to_string(), value.into_owned())),
            "tls" => match value.as_ref() {
                "true" | "skip-verify" => {
                    params.push(("ssl-mode".to_string(), "REQUIRED".to_string()))
                }
                "false" => params.push(("ssl-mode".to_string(), "DISABLED".to_string())),
                "preferred" => params.push(("ssl-mode".to_string(), "PREFERRED".to_string())),
                other => tracing::debug!(tls = other, "Ignoring custom MySQL TLS profile"),
            },
            // sqlx always decodes DATETIME/TIMESTAMP columns
            PARSE_TIME => {}
            other => tracing::debug!(param = other, "Dropping MySQL DSN parameter"),
        }
    }
    params
}

/// 解析 SQLite 目标位置
///
/// 去掉可选的 `sqlite://` / `sqlite:` 前缀；设置了数据目录时，相对路径放到该目录下，
/// 绝对路径保持不变
pub fn resolve_sqlite_path(dsn: &str, data_path: Option<&Path>) -> SqliteTarget {
    let raw = dsn
        .strip_prefix("sqlite://")
        .or_else(|| dsn.strip_prefix("sqlite:"))
        .unwrap_or(dsn);

    if raw == SQLITE_MEMORY {
        return SqliteTarget::Memory;
    }

    match data_path.filter(|p| !p.as_os_str().is_empty()) {
        Some(base) => SqliteTarget::File(base.join(raw)),
        None => SqliteTarget::File(PathBuf::from(raw)),
    }
}

/// 隐藏连接字符串中的密码，用于日志输出
pub fn redact(dsn: &str) -> String {
    match classify(dsn) {
        DialectKind::Postgres => match Url::parse(dsn) {
            Ok(mut url) => {
                if url.password().is_some() {
                    let _ = url.set_password(Some(MASK));
                }
                url.to_string()
            }
            Err(_) => format!("{}{MASK}", &dsn[..dsn.find("://").map_or(0, |i| i + 3)]),
        },
        DialectKind::MySql => {
            let at = dsn.rfind(MYSQL_NETWORK).unwrap_or(0);
            match dsn[..at].split_once(':') {
                Some((user, _)) => format!("{user}:{MASK}{}", &dsn[at..]),
                None => dsn.to_string(),
            }
        }
        DialectKind::Sqlite => dsn.to_string(),
    }
}
