// ==========================================
// 燃油价格导入系统 - 点查仓储
// ==========================================
// 职责: 自然键点查、最大 ID 查询、站点物理键查询
// 红线: Repository 不含业务逻辑，只负责数据访问
// 约束: 所有查询使用参数化 + 缓存预编译语句
// ==========================================

use crate::domain::{Company, CoordKey, Locality, StationIds, StationTable};
use crate::repository::error::RepositoryResult;
use rusqlite::{params, Connection, OptionalExtension};

// ==========================================
// LookupRepository - 借用已加锁的连接
// ==========================================
#[derive(Clone, Copy)]
pub struct LookupRepository<'c> {
    conn: &'c Connection,
}

impl<'c> LookupRepository<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    /// 查询表中当前最大 ID（空表返回 0）
    ///
    /// # 参数
    /// - table: 表名（仅限内部常量，不接受外部输入）
    pub fn max_id(&self, table: &'static str) -> RepositoryResult<i64> {
        let sql = format!("SELECT COALESCE(MAX(id), 0) FROM {}", table);
        let max: i64 = self
            .conn
            .prepare_cached(&sql)?
            .query_row([], |row| row.get(0))?;
        Ok(max)
    }

    /// 按名称查询地点
    pub fn find_locality_by_name(&self, name: &str) -> RepositoryResult<Option<Locality>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT id, provincia, municipio, nombre FROM localidad WHERE nombre = ?1",
        )?;

        let locality = stmt
            .query_row(params![name], |row| {
                Ok(Locality {
                    id: row.get(0)?,
                    province: row.get(1)?,
                    municipality: row.get(2)?,
                    name: row.get(3)?,
                })
            })
            .optional()?;
        Ok(locality)
    }

    /// 按名称查询公司
    pub fn find_company_by_name(&self, name: &str) -> RepositoryResult<Option<Company>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT id, nombre, direccion, telefono FROM empresa WHERE nombre = ?1",
        )?;

        let company = stmt
            .query_row(params![name], |row| {
                Ok(Company {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    address: row.get(2)?,
                    phone: row.get(3)?,
                })
            })
            .optional()?;
        Ok(company)
    }

    /// 按坐标规范键查询已持久化站点的 ID 与价格表 ID
    pub fn find_station_ids(
        &self,
        table: StationTable,
        coord_key: &CoordKey,
    ) -> RepositoryResult<Option<StationIds>> {
        let sql = format!(
            "SELECT id, preciosId FROM {} WHERE coordKey = ?1",
            table.table()
        );
        let mut stmt = self.conn.prepare_cached(&sql)?;

        let ids = stmt
            .query_row(params![coord_key], |row| {
                Ok(StationIds {
                    station_id: row.get(0)?,
                    price_sheet_id: row.get(1)?,
                })
            })
            .optional()?;
        Ok(ids)
    }
}
