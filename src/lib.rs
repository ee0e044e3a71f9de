// ==========================================
// 燃油价格导入系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite + CSV
// 系统定位: 加油站/码头燃油价格批量导入（自然键 upsert）
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 导入层 - CSV 导入与对账
pub mod importer;

// 配置层
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建库）
pub mod db;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域实体与类型
pub use domain::{
    Company, CoordKey, EntityKind, Fuel, LandStation, Locality, PriceSheet, StationTable,
    WaterStation, NO_COMPANY_ID, PRICE_ABSENT,
};

// 导入
pub use importer::{
    EntityIntake, IntakeError, IntakePipeline, IntakeResult, IntakeSummary, UpsertReport,
};

// 配置
pub use config::IntakeConfig;

// 报表
pub use repository::{ReportRepository, StationPrice};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "燃油价格导入系统";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
