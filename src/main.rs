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

use loadgate::config::settings::Settings;
use loadgate::infrastructure::database::connection;
use loadgate::utils::telemetry;
use tracing::info;

/// 主函数
///
/// 应用程序入口点，负责加载配置、建立数据库连接并等待退出信号
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load configuration
    let settings = Settings::new()?;

    // 2. Initialize logging
    telemetry::init_telemetry(&settings.log);
    info!("Starting loadgate...");

    // 3. Connect to database
    let db = connection::establish(&settings.database, &settings.log).await?;
    info!(dialect = %db.dialect(), "Database ready");

    tokio::signal::ctrl_c().await?;
    info!("Shutting down");

    db.close().await?;
    Ok(())
}
