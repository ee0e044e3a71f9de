// ==========================================
// 燃油价格导入系统 - 地点领域模型
// ==========================================
// 对齐: localidad 表
// 自然键: nombre（源数据中全局唯一）
// ==========================================

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Locality {
    pub id: i64,              // 代理键（顺序分配）
    pub province: String,     // provincia
    pub municipality: String, // municipio
    pub name: String,         // nombre（自然键）
}
