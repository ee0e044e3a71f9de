// ==========================================
// 燃油价格导入系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// 职责: 点查、upsert 语句绑定、读侧报表查询
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod entity_sql;
pub mod error;
pub mod lookup_repo;
pub mod report_repo;

// 重导出核心仓储
pub use error::{RepositoryError, RepositoryResult};
pub use lookup_repo::LookupRepository;
pub use report_repo::{CompanyStationCount, ReportRepository, StationPrice};
