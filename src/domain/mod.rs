// ==========================================
// 燃油价格导入系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体与类型
// 红线: 不含数据访问逻辑
// ==========================================

pub mod company;
pub mod locality;
pub mod price;
pub mod station;
pub mod types;

// 重导出核心类型
pub use company::Company;
pub use locality::Locality;
pub use price::{Fuel, PriceSheet, FUEL_COUNT};
pub use station::{LandStation, StationIds, WaterStation};
pub use types::{
    CoordKey, EntityKind, StationTable, DEFAULT_COORD_KEY_DECIMALS, NO_COMPANY_ID, PRICE_ABSENT,
};
