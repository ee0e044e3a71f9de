// ==========================================
// 燃油价格导入系统 - 配置层
// ==========================================
// 职责: 导入配置加载、环境变量覆写、校验
// 存储: JSON 文件（可选）
// ==========================================

pub mod intake_config;

pub use intake_config::{
    config_keys, IntakeConfig, SourceFiles, DEFAULT_DATABASE_PATH, ENV_DATABASE_PATH,
};
