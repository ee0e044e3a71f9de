// ==========================================
// 燃油价格导入系统 - 实体 upsert 语句绑定
// ==========================================
// 职责: 为每种实体提供 探测/插入/更新 三条语句模板及参数绑定
// 红线: UPDATE 的 SET 列表不含 id 与键字段，并以键定位行
// 规则: 站点原始坐标随 UPDATE 刷新（键按舍入后的坐标匹配）
// ==========================================

use crate::domain::{Company, CoordKey, LandStation, Locality, PriceSheet, WaterStation};
use crate::importer::upsert_reconciler::UpsertEntity;
use rusqlite::ToSql;

// ==========================================
// Locality - 键: nombre
// ==========================================
impl UpsertEntity for Locality {
    type Key = String;

    const TABLE: &'static str = "localidad";
    const EXISTS_SQL: &'static str = "SELECT COUNT(*) FROM localidad WHERE nombre = ?1";
    const INSERT_SQL: &'static str =
        "INSERT INTO localidad (id, provincia, municipio, nombre) VALUES (?1, ?2, ?3, ?4)";
    const UPDATE_SQL: &'static str =
        "UPDATE localidad SET provincia = ?1, municipio = ?2 WHERE nombre = ?3";

    fn upsert_key(&self) -> String {
        self.name.clone()
    }

    fn exists_params(&self) -> Vec<&dyn ToSql> {
        vec![&self.name]
    }

    fn insert_params(&self) -> Vec<&dyn ToSql> {
        vec![&self.id, &self.province, &self.municipality, &self.name]
    }

    fn update_params(&self) -> Vec<&dyn ToSql> {
        vec![&self.province, &self.municipality, &self.name]
    }
}

// ==========================================
// Company - 键: nombre
// ==========================================
impl UpsertEntity for Company {
    type Key = String;

    const TABLE: &'static str = "empresa";
    const EXISTS_SQL: &'static str = "SELECT COUNT(*) FROM empresa WHERE nombre = ?1";
    const INSERT_SQL: &'static str =
        "INSERT INTO empresa (id, nombre, direccion, telefono) VALUES (?1, ?2, ?3, ?4)";
    const UPDATE_SQL: &'static str =
        "UPDATE empresa SET direccion = ?1, telefono = ?2 WHERE nombre = ?3";

    fn upsert_key(&self) -> String {
        self.name.clone()
    }

    fn exists_params(&self) -> Vec<&dyn ToSql> {
        vec![&self.name]
    }

    fn insert_params(&self) -> Vec<&dyn ToSql> {
        vec![&self.id, &self.name, &self.address, &self.phone]
    }

    fn update_params(&self) -> Vec<&dyn ToSql> {
        vec![&self.address, &self.phone, &self.name]
    }
}

// ==========================================
// PriceSheet - 键: id
// ==========================================
impl UpsertEntity for PriceSheet {
    type Key = i64;

    const TABLE: &'static str = "precios";
    const EXISTS_SQL: &'static str = "SELECT COUNT(*) FROM precios WHERE id = ?1";
    const INSERT_SQL: &'static str = r#"
        INSERT INTO precios (
            id, gasolina95E5, gasolina95E10, gasolina95E5Premium, gasolina98E5,
            gasolina98E10, gasoleoA, gasoleoPremium, gasoleoB, gasoleoC, bioetanol,
            biodiesel, gasesLicuadosDelPetroleo, gasNaturalComprimido,
            gasNaturalLicuado, hidrogeno
        ) VALUES (
            ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16
        )
    "#;
    const UPDATE_SQL: &'static str = r#"
        UPDATE precios SET
            gasolina95E5 = ?1, gasolina95E10 = ?2, gasolina95E5Premium = ?3,
            gasolina98E5 = ?4, gasolina98E10 = ?5, gasoleoA = ?6, gasoleoPremium = ?7,
            gasoleoB = ?8, gasoleoC = ?9, bioetanol = ?10, biodiesel = ?11,
            gasesLicuadosDelPetroleo = ?12, gasNaturalComprimido = ?13,
            gasNaturalLicuado = ?14, hidrogeno = ?15
        WHERE id = ?16
    "#;

    fn upsert_key(&self) -> i64 {
        self.id
    }

    fn exists_params(&self) -> Vec<&dyn ToSql> {
        vec![&self.id]
    }

    fn insert_params(&self) -> Vec<&dyn ToSql> {
        let mut params: Vec<&dyn ToSql> = vec![&self.id];
        params.extend(self.prices().iter().map(|p| p as &dyn ToSql));
        params
    }

    fn update_params(&self) -> Vec<&dyn ToSql> {
        let mut params: Vec<&dyn ToSql> =
            self.prices().iter().map(|p| p as &dyn ToSql).collect();
        params.push(&self.id);
        params
    }
}

// ==========================================
// LandStation - 键: coordKey
// ==========================================
impl UpsertEntity for LandStation {
    type Key = CoordKey;

    const TABLE: &'static str = "gasolinera";
    const EXISTS_SQL: &'static str = "SELECT COUNT(*) FROM gasolinera WHERE coordKey = ?1";
    const INSERT_SQL: &'static str = r#"
        INSERT INTO gasolinera (
            id, localidadId, codigoPostal, direccion, margen, longitud, latitud,
            coordKey, tomaDeDatos, preciosId, porcBioalcohol, porcEsterMetilico,
            empresaId, tipoVenta, rem, horario, tipoServicio
        ) VALUES (
            ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17
        )
    "#;
    const UPDATE_SQL: &'static str = r#"
        UPDATE gasolinera SET
            localidadId = ?1, codigoPostal = ?2, direccion = ?3, margen = ?4,
            longitud = ?5, latitud = ?6, tomaDeDatos = ?7, preciosId = ?8,
            porcBioalcohol = ?9, porcEsterMetilico = ?10, empresaId = ?11,
            tipoVenta = ?12, rem = ?13, horario = ?14, tipoServicio = ?15
        WHERE coordKey = ?16
    "#;

    fn upsert_key(&self) -> CoordKey {
        self.coord_key.clone()
    }

    fn exists_params(&self) -> Vec<&dyn ToSql> {
        vec![&self.coord_key]
    }

    fn insert_params(&self) -> Vec<&dyn ToSql> {
        vec![
            &self.id,
            &self.locality_id,
            &self.postal_code,
            &self.address,
            &self.margin,
            &self.longitude,
            &self.latitude,
            &self.coord_key,
            &self.sampled_at,
            &self.price_sheet_id,
            &self.bioalcohol_pct,
            &self.methyl_ester_pct,
            &self.company_id,
            &self.sale_type,
            &self.remark,
            &self.schedule,
            &self.service_type,
        ]
    }

    fn update_params(&self) -> Vec<&dyn ToSql> {
        vec![
            &self.locality_id,
            &self.postal_code,
            &self.address,
            &self.margin,
            &self.longitude,
            &self.latitude,
            &self.sampled_at,
            &self.price_sheet_id,
            &self.bioalcohol_pct,
            &self.methyl_ester_pct,
            &self.company_id,
            &self.sale_type,
            &self.remark,
            &self.schedule,
            &self.service_type,
            &self.coord_key,
        ]
    }
}

// ==========================================
// WaterStation - 键: coordKey
// ==========================================
impl UpsertEntity for WaterStation {
    type Key = CoordKey;

    const TABLE: &'static str = "embarcadero";
    const EXISTS_SQL: &'static str = "SELECT COUNT(*) FROM embarcadero WHERE coordKey = ?1";
    const INSERT_SQL: &'static str = r#"
        INSERT INTO embarcadero (
            id, localidadId, codigoPostal, direccion, longitud, latitud, coordKey,
            preciosId, gasoleoUsoMaritimo, empresaId, tipoVenta, rem, horario
        ) VALUES (
            ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13
        )
    "#;
    const UPDATE_SQL: &'static str = r#"
        UPDATE embarcadero SET
            localidadId = ?1, codigoPostal = ?2, direccion = ?3, longitud = ?4,
            latitud = ?5, preciosId = ?6, gasoleoUsoMaritimo = ?7, empresaId = ?8,
            tipoVenta = ?9, rem = ?10, horario = ?11
        WHERE coordKey = ?12
    "#;

    fn upsert_key(&self) -> CoordKey {
        self.coord_key.clone()
    }

    fn exists_params(&self) -> Vec<&dyn ToSql> {
        vec![&self.coord_key]
    }

    fn insert_params(&self) -> Vec<&dyn ToSql> {
        vec![
            &self.id,
            &self.locality_id,
            &self.postal_code,
            &self.address,
            &self.longitude,
            &self.latitude,
            &self.coord_key,
            &self.price_sheet_id,
            &self.maritime_diesel_pct,
            &self.company_id,
            &self.sale_type,
            &self.remark,
            &self.schedule,
        ]
    }

    fn update_params(&self) -> Vec<&dyn ToSql> {
        vec![
            &self.locality_id,
            &self.postal_code,
            &self.address,
            &self.longitude,
            &self.latitude,
            &self.price_sheet_id,
            &self.maritime_diesel_pct,
            &self.company_id,
            &self.sale_type,
            &self.remark,
            &self.schedule,
            &self.coord_key,
        ]
    }
}
