// ==========================================
// 燃油价格导入系统 - 公司领域模型
// ==========================================
// 对齐: empresa 表
// 自然键: nombre
// ==========================================

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub id: i64,
    pub name: String,    // nombre（自然键）
    pub address: String, // direccion
    pub phone: i64,      // telefono
}
