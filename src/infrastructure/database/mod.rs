// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 数据库模块
///
/// 提供方言推断、连接字符串规范化和连接池建立功能
pub mod connection;
pub mod dialect;
pub mod dsn;
pub mod pool;

pub use connection::{establish, DatabaseHandle};
pub use dialect::{classify, DialectKind};
pub use dsn::NormalizedDsn;
pub use pool::{PoolLimits, PoolStatus};
