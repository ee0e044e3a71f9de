// ==========================================
// 燃油价格导入系统 - 领域类型定义
// ==========================================
// 职责: 实体种类、哨兵值、坐标规范键
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

/// 价格缺失哨兵值（永不为 NULL/NaN）
pub const PRICE_ABSENT: f64 = -1.0;

/// 无所属公司哨兵 ID
pub const NO_COMPANY_ID: i64 = 0;

/// 坐标规范键默认保留小数位
pub const DEFAULT_COORD_KEY_DECIMALS: usize = 6;

// ==========================================
// 实体种类 (Entity Kind)
// ==========================================
// 每种实体对应一个 CSV 文件与一个导入器
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityKind {
    Locality,
    Company,
    LandStation,
    WaterStation,
}

impl EntityKind {
    /// 目标表名
    pub fn table(&self) -> &'static str {
        match self {
            EntityKind::Locality => "localidad",
            EntityKind::Company => "empresa",
            EntityKind::LandStation => StationTable::Land.table(),
            EntityKind::WaterStation => StationTable::Water.table(),
        }
    }

    /// 是否携带价格表
    pub fn has_price_sheet(&self) -> bool {
        matches!(self, EntityKind::LandStation | EntityKind::WaterStation)
    }

    /// 依赖顺序：地点、公司先于站点
    pub fn all_in_dependency_order() -> [EntityKind; 4] {
        [
            EntityKind::Locality,
            EntityKind::Company,
            EntityKind::LandStation,
            EntityKind::WaterStation,
        ]
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Locality => write!(f, "LOCALITY"),
            EntityKind::Company => write!(f, "COMPANY"),
            EntityKind::LandStation => write!(f, "LAND_STATION"),
            EntityKind::WaterStation => write!(f, "WATER_STATION"),
        }
    }
}

// ==========================================
// 站点表 (Station Table)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StationTable {
    Land,  // gasolinera
    Water, // embarcadero
}

impl StationTable {
    pub fn table(&self) -> &'static str {
        match self {
            StationTable::Land => "gasolinera",
            StationTable::Water => "embarcadero",
        }
    }
}

// ==========================================
// 坐标规范键 (Coordinate Key)
// ==========================================
// 经纬度按固定小数位取整后格式化为 "lon:lat"
// 用作站点的物理键，替代浮点数精确比较
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CoordKey(String);

impl CoordKey {
    pub fn new(longitude: f64, latitude: f64, decimals: usize) -> Self {
        Self(format!(
            "{}:{}",
            Self::canonical(longitude, decimals),
            Self::canonical(latitude, decimals)
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn canonical(value: f64, decimals: usize) -> String {
        let rendered = format!("{:.*}", decimals, value);
        // -0.000000 与 0.000000 视为同一点
        if rendered.starts_with('-') && rendered[1..].chars().all(|c| c == '0' || c == '.') {
            rendered[1..].to_string()
        } else {
            rendered
        }
    }
}

impl fmt::Display for CoordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl rusqlite::ToSql for CoordKey {
    fn to_sql(&self) -> rusqlite::Result<rusqlite::types::ToSqlOutput<'_>> {
        self.0.to_sql()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coord_key_rounds_to_fixed_precision() {
        let a = CoordKey::new(-3.703790, 40.416775, 6);
        let b = CoordKey::new(-3.7037900000001, 40.4167749999999, 6);
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "-3.703790:40.416775");
    }

    #[test]
    fn test_coord_key_negative_zero() {
        let a = CoordKey::new(-0.0000001, 0.0, 6);
        assert_eq!(a.as_str(), "0.000000:0.000000");
    }

    #[test]
    fn test_entity_kind_tables() {
        assert_eq!(EntityKind::Locality.table(), "localidad");
        assert_eq!(EntityKind::WaterStation.table(), "embarcadero");
        assert!(EntityKind::LandStation.has_price_sheet());
        assert!(!EntityKind::Company.has_price_sheet());
    }
}
