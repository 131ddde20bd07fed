// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 配置设置测试模块
///
/// 测试配置加载，确保环境变量覆盖和默认值正确

#[cfg(test)]
mod tests {
    use loadgate::config::settings::Settings;
    use std::collections::HashMap;
    use std::path::Path;

    #[test]
    fn test_config_loading_from_injected_env() {
        let vars: HashMap<String, String> = [
            ("DATABASE_DSN", "./data/loadgate.db"),
            ("DATA_PATH", "/data/writable"),
            ("LOG_LEVEL", "debug"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        match Settings::from_vars(vars) {
            Ok(settings) => {
                assert_eq!(settings.database.dsn, "./data/loadgate.db");
                assert_eq!(
                    settings.database.data_path(),
                    Some(Path::new("/data/writable"))
                );
                assert_eq!(settings.log.level, "debug");
                assert!(settings.log.is_debug());
            }
            Err(e) => {
                panic!("✗ Failed to load configuration: {}", e);
            }
        }
    }

    #[test]
    fn test_plain_name_overrides_prefixed_name() {
        let vars: HashMap<String, String> = [
            ("LOADGATE__DATABASE__DSN", "prefixed.db"),
            ("DATABASE_DSN", "plain.db"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let settings = Settings::from_vars(vars).unwrap();
        assert_eq!(settings.database.dsn, "plain.db");
    }

    #[test]
    fn test_log_level_is_case_sensitive() {
        let vars: HashMap<String, String> = [("LOG_LEVEL", "DEBUG")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        let settings = Settings::from_vars(vars).unwrap();
        assert!(!settings.log.is_debug());
    }
}
