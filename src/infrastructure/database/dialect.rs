// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::fmt;

/// 数据库方言
///
/// 仅根据连接字符串的形状推断，不做任何 I/O
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DialectKind {
    /// `postgres://` 或 `postgresql://` URL
    Postgres,
    /// `user:pass@tcp(host:port)/db` 形式的 DSN
    MySql,
    /// 其他任何字符串都当作 SQLite 文件路径
    Sqlite,
}

const POSTGRES_PREFIXES: [&str; 2] = ["postgres://", "postgresql://"];
const MYSQL_MARKER: &str = "@tcp";

/// 推断连接字符串对应的数据库方言
///
/// 按顺序匹配，首个命中的规则生效：
///
/// 1. 以 `postgres://` 或 `postgresql://` 开头 → [`DialectKind::Postgres`]
/// 2. 包含 `@tcp` → [`DialectKind::MySql`]
/// 3. 其他 → [`DialectKind::Sqlite`]
pub fn classify(dsn: &str) -> DialectKind {
    if POSTGRES_PREFIXES.iter().any(|p| dsn.starts_with(p)) {
        DialectKind::Postgres
    } else if dsn.contains(MYSQL_MARKER) {
        DialectKind::MySql
    } else {
        DialectKind::Sqlite
    }
}

impl DialectKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DialectKind::Postgres => "postgres",
            DialectKind::MySql => "mysql",
            DialectKind::Sqlite => "sqlite",
        }
    }
}

impl fmt::Display for DialectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
