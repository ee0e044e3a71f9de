// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 临时数据库、临时 CSV 文件、测试配置、行构造
// ==========================================

#![allow(dead_code)]

use fuel_price_intake::config::{IntakeConfig, SourceFiles};
use fuel_price_intake::db::{init_schema, open_sqlite_connection};
use fuel_price_intake::importer::IntakePipeline;
use rusqlite::Connection;
use std::error::Error;
use std::fs;
use std::path::PathBuf;
use tempfile::{NamedTempFile, TempDir};

/// 陆地加油站文件表头（29 列）
pub const LAND_HEADER: &str = "Localidad;Código postal;Dirección;Margen;Longitud;Latitud;Toma de datos;\
Precio gasolina 95 E5;Precio gasolina 95 E10;Precio gasolina 95 E5 Premium;Precio gasolina 98 E5;\
Precio gasolina 98 E10;Precio gasóleo A;Precio gasóleo Premium;Precio gasóleo B;Precio gasóleo C;\
Precio bioetanol;Precio biodiésel;Precio gases licuados del petróleo;Precio gas natural comprimido;\
Precio gas natural licuado;Precio hidrógeno;% bioalcohol;% éster metílico;Rótulo;Tipo venta;Rem.;\
Horario;Tipo servicio";

/// 水上加油码头文件表头（14 列）
pub const WATER_HEADER: &str = "Localidad;Código postal;Dirección;Longitud;Latitud;\
Precio gasolina 95 E5;Precio gasolina 95 E10;Precio gasóleo A;Precio gasóleo B;\
% gasóleo uso marítimo;Rótulo;Tipo venta;Rem.;Horario";

pub const LOCALITY_HEADER: &str = "Provincia;Municipio;Localidad";
pub const COMPANY_HEADER: &str = "Nombre;Dirección;Teléfono";

/// 测试环境：临时数据库 + 临时 CSV 目录
pub struct TestEnv {
    pub db_file: NamedTempFile,
    pub db_path: String,
    pub csv_dir: TempDir,
}

impl TestEnv {
    pub fn new() -> Result<Self, Box<dyn Error>> {
        let (db_file, db_path) = create_test_db()?;
        Ok(Self {
            db_file,
            db_path,
            csv_dir: tempfile::tempdir()?,
        })
    }

    /// 写入 CSV（表头 + 数据行）
    pub fn write_csv(&self, name: &str, header: &str, rows: &[String]) -> PathBuf {
        let path = self.csv_dir.path().join(name);
        let mut content = String::from(header);
        content.push('\n');
        for row in rows {
            content.push_str(row);
            content.push('\n');
        }
        fs::write(&path, content).unwrap();
        path
    }

    /// 指向本测试目录中默认文件名的配置
    pub fn config(&self) -> IntakeConfig {
        let dir = self.csv_dir.path();
        IntakeConfig {
            database_path: self.db_path.clone(),
            files: SourceFiles {
                localities: dir.join("Localidades.csv"),
                companies: dir.join("empresas.csv"),
                land_stations: dir.join("preciosEESS_es.csv"),
                water_stations: dir.join("embarcacionesPrecios_es.csv"),
            },
            ..IntakeConfig::default()
        }
    }

    pub fn pipeline(&self) -> IntakePipeline {
        IntakePipeline::open(self.config()).unwrap()
    }

    pub fn conn(&self) -> Connection {
        open_sqlite_connection(&self.db_path).unwrap()
    }
}

/// 创建临时测试数据库并初始化 schema
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file.path().to_str().unwrap().to_string();

    let conn = open_sqlite_connection(&db_path)?;
    init_schema(&conn)?;

    Ok((temp_file, db_path))
}

pub fn count(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
        row.get(0)
    })
    .unwrap()
}

// ==========================================
// 行构造
// ==========================================

pub fn locality_row(province: &str, municipality: &str, name: &str) -> String {
    format!("{};{};{}", province, municipality, name)
}

pub fn company_row(name: &str, address: &str, phone: &str) -> String {
    format!("{};{};{}", name, address, phone)
}

/// 陆地加油站行（仅 95E5 与 gasoleoA 有价，其余留空）
pub fn land_row(
    locality: &str,
    longitude: &str,
    latitude: &str,
    company: &str,
    gasolina_95e5: &str,
    gasoleo_a: &str,
) -> String {
    let mut prices = vec![""; 15];
    prices[0] = gasolina_95e5;
    prices[5] = gasoleo_a;

    let mut fields = vec![
        locality,
        "28001",
        "Calle de Alcalá 1",
        "D",
        longitude,
        latitude,
        "14/10/2023 08:30",
    ];
    fields.extend(prices);
    fields.extend(["", "", company, "P", "OM", "L-D: 24H", "(A)"]);
    fields.join(";")
}

/// 水上加油码头行
pub fn water_row(
    locality: &str,
    longitude: &str,
    latitude: &str,
    company: &str,
    gasolina_95e5: &str,
    gasoleo_a: &str,
) -> String {
    [
        locality,
        "11006",
        "Puerto deportivo",
        longitude,
        latitude,
        gasolina_95e5,
        "",
        gasoleo_a,
        "",
        "2,5",
        company,
        "P",
        "OM",
        "L-S: 08:00-20:00",
    ]
    .join(";")
}

/// 写入基础引用数据文件（地点 + 公司）
pub fn write_reference_files(env: &TestEnv) {
    env.write_csv(
        "Localidades.csv",
        LOCALITY_HEADER,
        &[
            locality_row("Madrid", "Madrid", "Madrid"),
            locality_row("Madrid", "Getafe", "Getafe"),
            locality_row("Cádiz", "Cádiz", "Cádiz"),
        ],
    );
    env.write_csv(
        "empresas.csv",
        COMPANY_HEADER,
        &[
            company_row("REPSOL", "Calle Méndez Álvaro 44", "901100100"),
            company_row("CEPSA", "Paseo de la Castellana 259", "913376000"),
        ],
    );
}
