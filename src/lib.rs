// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 配置模块
///
/// 处理应用程序的配置设置和环境变量
pub mod config;

/// 基础设施模块
///
/// 提供数据库连接建立功能
pub mod infrastructure;

/// 工具模块
///
/// 提供错误类型和遥测初始化
pub mod utils;
