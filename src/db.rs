// ==========================================
// 燃油价格导入系统 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为（外键/busy_timeout）
// - 提供建库脚本（仅初始化，不做迁移）
// - 注册读侧报表所需的 SQL 函数
// ==========================================

use rusqlite::functions::FunctionFlags;
use rusqlite::Connection;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 球面距离计算所用地球半径（米）
pub const EARTH_RADIUS_M: f64 = 6_370_986.0;

/// 建库脚本
///
/// 说明：
/// - empresaId 使用 0 作为“无公司”哨兵，因此不声明外键
/// - coordKey 为站点物理键（坐标按固定精度取整），唯一索引
const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS localidad (
    id INTEGER PRIMARY KEY,
    provincia TEXT NOT NULL,
    municipio TEXT NOT NULL,
    nombre TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS empresa (
    id INTEGER PRIMARY KEY,
    nombre TEXT NOT NULL UNIQUE,
    direccion TEXT NOT NULL DEFAULT '',
    telefono INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS precios (
    id INTEGER PRIMARY KEY,
    gasolina95E5 REAL NOT NULL DEFAULT -1,
    gasolina95E10 REAL NOT NULL DEFAULT -1,
    gasolina95E5Premium REAL NOT NULL DEFAULT -1,
    gasolina98E5 REAL NOT NULL DEFAULT -1,
    gasolina98E10 REAL NOT NULL DEFAULT -1,
    gasoleoA REAL NOT NULL DEFAULT -1,
    gasoleoPremium REAL NOT NULL DEFAULT -1,
    gasoleoB REAL NOT NULL DEFAULT -1,
    gasoleoC REAL NOT NULL DEFAULT -1,
    bioetanol REAL NOT NULL DEFAULT -1,
    biodiesel REAL NOT NULL DEFAULT -1,
    gasesLicuadosDelPetroleo REAL NOT NULL DEFAULT -1,
    gasNaturalComprimido REAL NOT NULL DEFAULT -1,
    gasNaturalLicuado REAL NOT NULL DEFAULT -1,
    hidrogeno REAL NOT NULL DEFAULT -1
);

CREATE TABLE IF NOT EXISTS gasolinera (
    id INTEGER PRIMARY KEY,
    localidadId INTEGER NOT NULL REFERENCES localidad(id),
    codigoPostal INTEGER NOT NULL,
    direccion TEXT NOT NULL,
    margen TEXT NOT NULL,
    longitud REAL NOT NULL,
    latitud REAL NOT NULL,
    coordKey TEXT NOT NULL UNIQUE,
    tomaDeDatos TEXT NOT NULL,
    preciosId INTEGER NOT NULL UNIQUE REFERENCES precios(id),
    porcBioalcohol REAL NOT NULL DEFAULT -1,
    porcEsterMetilico REAL NOT NULL DEFAULT -1,
    empresaId INTEGER NOT NULL DEFAULT 0,
    tipoVenta TEXT NOT NULL,
    rem TEXT NOT NULL,
    horario TEXT NOT NULL,
    tipoServicio TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS embarcadero (
    id INTEGER PRIMARY KEY,
    localidadId INTEGER NOT NULL REFERENCES localidad(id),
    codigoPostal INTEGER NOT NULL,
    direccion TEXT NOT NULL,
    longitud REAL NOT NULL,
    latitud REAL NOT NULL,
    coordKey TEXT NOT NULL UNIQUE,
    preciosId INTEGER NOT NULL UNIQUE REFERENCES precios(id),
    gasoleoUsoMaritimo REAL NOT NULL DEFAULT -1,
    empresaId INTEGER NOT NULL DEFAULT 0,
    tipoVenta TEXT NOT NULL,
    rem TEXT NOT NULL,
    horario TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_gasolinera_empresa ON gasolinera(empresaId);
CREATE INDEX IF NOT EXISTS idx_embarcadero_empresa ON embarcadero(empresaId);
"#;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要“每个连接”单独开启
/// - busy_timeout 需要“每个连接”单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    register_sql_functions(conn)?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 打开内存数据库（测试/演练用），并初始化 schema
pub fn open_in_memory() -> rusqlite::Result<Connection> {
    let conn = Connection::open_in_memory()?;
    configure_sqlite_connection(&conn)?;
    init_schema(&conn)?;
    Ok(conn)
}

/// 初始化 schema（幂等，仅建表）
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)
}

/// 注册 distance_sphere(lon1, lat1, lon2, lat2) -> 米
pub fn register_sql_functions(conn: &Connection) -> rusqlite::Result<()> {
    conn.create_scalar_function(
        "distance_sphere",
        4,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let lon1: f64 = ctx.get(0)?;
            let lat1: f64 = ctx.get(1)?;
            let lon2: f64 = ctx.get(2)?;
            let lat2: f64 = ctx.get(3)?;
            Ok(distance_sphere(lon1, lat1, lon2, lat2))
        },
    )
}

/// 球面距离（haversine，单位: 米）
pub fn distance_sphere(lon1: f64, lat1: f64, lon2: f64, lat2: f64) -> f64 {
    let (phi1, phi2) = (lat1.to_radians(), lat2.to_radians());
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lon2 - lon1).to_radians();

    let a = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * a.sqrt().asin()
}
