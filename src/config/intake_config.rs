// ==========================================
// 燃油价格导入系统 - 导入配置
// ==========================================
// 来源优先级: 默认值 < JSON 配置文件 < 环境变量
// 加载后统一校验，非法配置视为致命错误
// ==========================================

use crate::domain::{EntityKind, DEFAULT_COORD_KEY_DECIMALS};
use crate::importer::error::{IntakeError, IntakeResult};
use crate::importer::file_parser::DEFAULT_DELIMITER;
use crate::importer::upsert_reconciler::DEFAULT_BATCH_SIZE;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// 数据库路径覆写环境变量
pub const ENV_DATABASE_PATH: &str = "FUEL_INTAKE_DB";

/// 默认数据库文件
pub const DEFAULT_DATABASE_PATH: &str = "fuel_prices.db";

/// 坐标规范键允许的最大小数位
pub const MAX_COORD_KEY_DECIMALS: usize = 12;

// ==========================================
// 配置键（用于错误定位）
// ==========================================
pub mod config_keys {
    pub const DATABASE_PATH: &str = "database_path";
    pub const BATCH_SIZE: &str = "batch_size";
    pub const DELIMITER: &str = "delimiter";
    pub const COORD_KEY_DECIMALS: &str = "coord_key_decimals";
}

// ==========================================
// SourceFiles - 各实体种类的默认输入文件
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceFiles {
    pub localities: PathBuf,
    pub companies: PathBuf,
    pub land_stations: PathBuf,
    pub water_stations: PathBuf,
}

impl Default for SourceFiles {
    fn default() -> Self {
        Self {
            localities: PathBuf::from("Localidades.csv"),
            companies: PathBuf::from("empresas.csv"),
            land_stations: PathBuf::from("preciosEESS_es.csv"),
            water_stations: PathBuf::from("embarcacionesPrecios_es.csv"),
        }
    }
}

impl SourceFiles {
    pub fn path_for(&self, kind: EntityKind) -> &Path {
        match kind {
            EntityKind::Locality => &self.localities,
            EntityKind::Company => &self.companies,
            EntityKind::LandStation => &self.land_stations,
            EntityKind::WaterStation => &self.water_stations,
        }
    }
}

// ==========================================
// IntakeConfig
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntakeConfig {
    pub database_path: String,
    pub batch_size: usize,
    pub delimiter: char,
    pub coord_key_decimals: usize,
    pub files: SourceFiles,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            database_path: DEFAULT_DATABASE_PATH.to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
            delimiter: DEFAULT_DELIMITER as char,
            coord_key_decimals: DEFAULT_COORD_KEY_DECIMALS,
            files: SourceFiles::default(),
        }
    }
}

impl IntakeConfig {
    /// 加载配置
    ///
    /// # 参数
    /// - path: JSON 配置文件（None 时使用默认值）
    ///
    /// # 返回
    /// - Ok(IntakeConfig): 已应用环境变量覆写并通过校验
    /// - Err: 文件读取失败、JSON 格式错误、配置值非法
    pub fn load(path: Option<&Path>) -> IntakeResult<Self> {
        let mut config = match path {
            Some(p) => Self::from_json_file(p)?,
            None => Self::default(),
        };

        config.apply_env_override(std::env::var(ENV_DATABASE_PATH).ok());
        config.validate()?;

        info!(
            database_path = %config.database_path,
            batch_size = config.batch_size,
            coord_key_decimals = config.coord_key_decimals,
            "导入配置已加载"
        );
        Ok(config)
    }

    /// 从 JSON 文件读取（缺失键使用默认值）
    pub fn from_json_file(path: &Path) -> IntakeResult<Self> {
        let raw = fs::read_to_string(path).map_err(|e| IntakeError::ConfigReadError {
            key: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> IntakeResult<Self> {
        serde_json::from_str(raw).map_err(|e| IntakeError::ConfigValueError {
            key: "<json>".to_string(),
            value: raw.chars().take(80).collect(),
            message: e.to_string(),
        })
    }

    /// 环境变量覆写数据库路径（空值忽略）
    pub fn apply_env_override(&mut self, database_path: Option<String>) {
        if let Some(db) = database_path.filter(|v| !v.trim().is_empty()) {
            debug!(env = ENV_DATABASE_PATH, database_path = %db, "数据库路径已被环境变量覆写");
            self.database_path = db;
        }
    }

    /// 校验配置值
    pub fn validate(&self) -> IntakeResult<()> {
        if self.database_path.trim().is_empty() {
            return Err(IntakeError::ConfigValueError {
                key: config_keys::DATABASE_PATH.to_string(),
                value: self.database_path.clone(),
                message: "数据库路径不能为空".to_string(),
            });
        }

        if self.batch_size == 0 {
            return Err(IntakeError::ConfigValueError {
                key: config_keys::BATCH_SIZE.to_string(),
                value: self.batch_size.to_string(),
                message: "批大小必须 >= 1".to_string(),
            });
        }

        if !self.delimiter.is_ascii() || self.delimiter == '"' || self.delimiter == '\n' {
            return Err(IntakeError::ConfigValueError {
                key: config_keys::DELIMITER.to_string(),
                value: self.delimiter.to_string(),
                message: "分隔符必须是单个 ASCII 字符（不能是引号或换行）".to_string(),
            });
        }

        if self.coord_key_decimals > MAX_COORD_KEY_DECIMALS {
            return Err(IntakeError::ConfigValueError {
                key: config_keys::COORD_KEY_DECIMALS.to_string(),
                value: self.coord_key_decimals.to_string(),
                message: format!("小数位不能超过 {}", MAX_COORD_KEY_DECIMALS),
            });
        }

        Ok(())
    }

    /// 分隔符字节（校验后必为 ASCII）
    pub fn delimiter_byte(&self) -> u8 {
        if self.delimiter.is_ascii() {
            self.delimiter as u8
        } else {
            DEFAULT_DELIMITER
        }
    }

    pub fn source_file(&self, kind: EntityKind) -> &Path {
        self.files.path_for(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = IntakeConfig::default();
        assert_eq!(config.batch_size, 5);
        assert_eq!(config.delimiter_byte(), b';');
        assert_eq!(config.coord_key_decimals, 6);
        assert_eq!(
            config.source_file(EntityKind::LandStation),
            Path::new("preciosEESS_es.csv")
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"batch_size": 50, "files": {{"companies": "data/empresas.csv"}}}}"#
        )
        .unwrap();

        let config = IntakeConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.batch_size, 50);
        assert_eq!(config.delimiter, ';');
        assert_eq!(
            config.source_file(EntityKind::Company),
            Path::new("data/empresas.csv")
        );
        assert_eq!(
            config.source_file(EntityKind::Locality),
            Path::new("Localidades.csv")
        );
    }

    #[test]
    fn test_env_override_ignores_blank() {
        let mut config = IntakeConfig::default();
        config.apply_env_override(Some("   ".to_string()));
        assert_eq!(config.database_path, DEFAULT_DATABASE_PATH);

        config.apply_env_override(Some("/tmp/otro.db".to_string()));
        assert_eq!(config.database_path, "/tmp/otro.db");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = IntakeConfig {
            batch_size: 0,
            ..IntakeConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(IntakeError::ConfigValueError { ref key, .. }) if key == "batch_size"
        ));

        let config = IntakeConfig {
            delimiter: 'ñ',
            ..IntakeConfig::default()
        };
        assert!(config.validate().is_err());

        let config = IntakeConfig {
            coord_key_decimals: 13,
            ..IntakeConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_json_is_value_error() {
        assert!(matches!(
            IntakeConfig::from_json_str("{ batch_size: }"),
            Err(IntakeError::ConfigValueError { .. })
        ));
    }
}
