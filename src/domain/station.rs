// ==========================================
// 燃油价格导入系统 - 站点领域模型
// ==========================================
// 对齐: gasolinera（陆地加油站）/ embarcadero（水上加油码头）
// 物理键: 坐标规范键 coord_key
// 红线: 每个站点拥有且仅拥有一个价格表
// ==========================================

use crate::domain::types::CoordKey;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ==========================================
// LandStation - 陆地加油站
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandStation {
    pub id: i64,
    pub locality_id: i64,
    pub postal_code: i32,
    pub address: String,
    pub margin: String, // 道路侧 (D/I/N)
    pub longitude: f64,
    pub latitude: f64,
    pub coord_key: CoordKey,
    pub sampled_at: NaiveDateTime, // 数据采集时间
    pub price_sheet_id: i64,
    pub bioalcohol_pct: f64,
    pub methyl_ester_pct: f64,
    pub company_id: i64, // 0 = 无公司
    pub sale_type: String,
    pub remark: String,
    pub schedule: String,
    pub service_type: String,
}

// ==========================================
// WaterStation - 水上加油码头
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterStation {
    pub id: i64,
    pub locality_id: i64,
    pub postal_code: i32,
    pub address: String,
    pub longitude: f64,
    pub latitude: f64,
    pub coord_key: CoordKey,
    pub price_sheet_id: i64,
    pub maritime_diesel_pct: f64,
    pub company_id: i64, // 0 = 无公司
    pub sale_type: String,
    pub remark: String,
    pub schedule: String,
}

/// 站点 ID 与其价格表 ID（两者同步分配）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationIds {
    pub station_id: i64,
    pub price_sheet_id: i64,
}
