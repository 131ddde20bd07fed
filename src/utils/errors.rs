// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm::DbErr;
use std::path::PathBuf;
use thiserror::Error;

/// 数据库连接建立错误类型
///
/// 所有错误都会立即返回给调用方，不做重试
#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("DATABASE_DSN 未配置")]
    NotConfigured,

    #[error("无法创建数据库目录 '{}': {source}", path.display())]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("数据库连接失败: {0}")]
    Connection(#[from] DbErr),

    #[error("数据库连接失败: {0}")]
    InvalidDsn(#[from] DsnError),

    #[error("无法获取连接池: {0}")]
    PoolIntrospection(String),
}

/// DSN 解析错误类型
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DsnError {
    #[error("MySQL DSN 缺少 '@tcp' 网络段")]
    MissingNetwork,

    #[error("MySQL DSN 地址未闭合: {0}")]
    UnterminatedAddress(String),

    #[error("MySQL DSN 缺少数据库名分隔符 '/'")]
    MissingDatabase,

    #[error("无效端口: {0}")]
    InvalidPort(String),

    #[error("无法构建连接URL: {0}")]
    Url(String),
}
