// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施层模块
///
/// 负责与外部系统的交互。
///
/// 包含的子模块：
/// - 数据库（database）：根据连接字符串选择 PostgreSQL、MySQL 或 SQLite，
///   并建立统一配置的连接池
pub mod database;
