// ==========================================
// 燃油价格导入系统 - 报表查询仓储
// ==========================================
// 职责: 读侧固定查询（公司站点数、最低/最高价、半径内最低价）
// 规则: 价格查询只考虑正价格（-1 哨兵与 0 被排除）
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::db::{configure_sqlite_connection, open_sqlite_connection};
use crate::domain::{Fuel, StationTable};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};

/// 公司及其站点数
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyStationCount {
    pub table: StationTable,
    pub company_id: i64,
    pub company_name: String,
    pub stations: i64,
}

/// 站点某燃油价格
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationPrice {
    pub table: StationTable,
    pub station_id: i64,
    pub address: String,
    pub locality: String,
    pub province: String,
    pub longitude: f64,
    pub latitude: f64,
    pub fuel: Fuel,
    pub price: f64,
    /// 哨兵 0 或未知公司时为 None
    pub company_name: Option<String>,
    /// 道路侧，仅陆地加油站
    pub margin: Option<String>,
    /// 仅半径查询携带（米）
    pub distance_m: Option<f64>,
}

// ==========================================
// ReportRepository
// ==========================================
pub struct ReportRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ReportRepository {
    /// 创建新的 ReportRepository 实例
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例（确保 distance_sphere 已注册）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            configure_sqlite_connection(&guard)?;
        }
        Ok(Self { conn })
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 站点最多的公司（仅统计能关联到 empresa 的站点，哨兵 0 不参与）
    pub fn company_with_most_stations(
        &self,
        table: StationTable,
    ) -> RepositoryResult<Option<CompanyStationCount>> {
        let conn = self.get_conn()?;
        let sql = format!(
            r#"
            SELECT e.id, e.nombre, COUNT(*) AS total
            FROM {} s
            INNER JOIN empresa e ON e.id = s.empresaId
            GROUP BY e.id, e.nombre
            ORDER BY total DESC, e.nombre ASC
            LIMIT 1
            "#,
            table.table()
        );

        let result = conn
            .prepare_cached(&sql)?
            .query_row([], |row| {
                Ok(CompanyStationCount {
                    table,
                    company_id: row.get(0)?,
                    company_name: row.get(1)?,
                    stations: row.get(2)?,
                })
            })
            .optional()?;
        Ok(result)
    }

    /// 某省份 95E5 最便宜的陆地加油站
    pub fn cheapest_land_95e5_in_province(
        &self,
        province: &str,
    ) -> RepositoryResult<Option<StationPrice>> {
        let conn = self.get_conn()?;
        let result = conn
            .prepare_cached(
                r#"
                SELECT g.id, g.direccion, l.nombre, l.provincia, g.longitud, g.latitud,
                       p.gasolina95E5, e.nombre, g.margen
                FROM gasolinera g
                INNER JOIN localidad l ON l.id = g.localidadId
                INNER JOIN precios p ON p.id = g.preciosId
                LEFT JOIN empresa e ON e.id = g.empresaId
                WHERE l.provincia = ?1 AND p.gasolina95E5 > 0
                ORDER BY p.gasolina95E5 ASC, g.id ASC
                LIMIT 1
                "#,
            )?
            .query_row(params![province], |row| {
                map_station_price(row, StationTable::Land, Fuel::Gasolina95E5, None)
            })
            .optional()?;
        Ok(result)
    }

    /// 以 (longitude, latitude) 为中心、半径 radius_m 米内 gasoleoA 最便宜的陆地加油站
    pub fn cheapest_land_diesel_within(
        &self,
        longitude: f64,
        latitude: f64,
        radius_m: f64,
    ) -> RepositoryResult<Option<StationPrice>> {
        let conn = self.get_conn()?;
        let result = conn
            .prepare_cached(
                r#"
                SELECT g.id, g.direccion, l.nombre, l.provincia, g.longitud, g.latitud,
                       p.gasoleoA, e.nombre, g.margen,
                       distance_sphere(g.longitud, g.latitud, ?1, ?2) AS distancia
                FROM gasolinera g
                INNER JOIN localidad l ON l.id = g.localidadId
                INNER JOIN precios p ON p.id = g.preciosId
                LEFT JOIN empresa e ON e.id = g.empresaId
                WHERE p.gasoleoA > 0
                  AND distance_sphere(g.longitud, g.latitud, ?1, ?2) <= ?3
                ORDER BY p.gasoleoA ASC, distancia ASC
                LIMIT 1
                "#,
            )?
            .query_row(params![longitude, latitude, radius_m], |row| {
                let distance: f64 = row.get(9)?;
                map_station_price(row, StationTable::Land, Fuel::GasoleoA, Some(distance))
            })
            .optional()?;
        Ok(result)
    }

    /// 95E5 最贵的水上加油码头
    pub fn most_expensive_water_95e5(&self) -> RepositoryResult<Option<StationPrice>> {
        let conn = self.get_conn()?;
        let result = conn
            .prepare_cached(
                r#"
                SELECT b.id, b.direccion, l.nombre, l.provincia, b.longitud, b.latitud,
                       p.gasolina95E5, e.nombre, NULL
                FROM embarcadero b
                INNER JOIN localidad l ON l.id = b.localidadId
                INNER JOIN precios p ON p.id = b.preciosId
                LEFT JOIN empresa e ON e.id = b.empresaId
                WHERE p.gasolina95E5 > 0
                ORDER BY p.gasolina95E5 DESC, b.id ASC
                LIMIT 1
                "#,
            )?
            .query_row([], |row| {
                map_station_price(row, StationTable::Water, Fuel::Gasolina95E5, None)
            })
            .optional()?;
        Ok(result)
    }
}

fn map_station_price(
    row: &Row<'_>,
    table: StationTable,
    fuel: Fuel,
    distance_m: Option<f64>,
) -> rusqlite::Result<StationPrice> {
    Ok(StationPrice {
        table,
        station_id: row.get(0)?,
        address: row.get(1)?,
        locality: row.get(2)?,
        province: row.get(3)?,
        longitude: row.get(4)?,
        latitude: row.get(5)?,
        fuel,
        price: row.get(6)?,
        company_name: row.get(7)?,
        margin: row.get(8)?,
        distance_m,
    })
}
