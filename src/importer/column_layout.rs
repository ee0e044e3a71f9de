// ==========================================
// 燃油价格导入系统 - CSV 列布局表
// ==========================================
// 职责: 每种文件的列序号表（按名称访问列，加载时校验宽度）
// 序号: 0 起始，表头行不计入数据
// ==========================================

use crate::domain::{Fuel, FUEL_COUNT};

/// 具名列
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub index: usize,
}

impl Column {
    pub const fn new(name: &'static str, index: usize) -> Self {
        Self { name, index }
    }
}

/// 一种文件的列布局
#[derive(Debug, Clone, Copy)]
pub struct ColumnLayout {
    pub file: &'static str,
    pub columns: &'static [Column],
}

impl ColumnLayout {
    /// 布局要求的最小列数
    pub fn width(&self) -> usize {
        self.columns
            .iter()
            .map(|c| c.index + 1)
            .max()
            .unwrap_or(0)
    }
}

// ==========================================
// 地点文件: provincia;municipio;nombre
// ==========================================
pub mod locality {
    use super::{Column, ColumnLayout};

    pub const PROVINCE: Column = Column::new("provincia", 0);
    pub const MUNICIPALITY: Column = Column::new("municipio", 1);
    pub const NAME: Column = Column::new("nombre", 2);

    pub const LAYOUT: ColumnLayout = ColumnLayout {
        file: "localidades",
        columns: &[PROVINCE, MUNICIPALITY, NAME],
    };
}

// ==========================================
// 公司文件: nombre;direccion;telefono
// ==========================================
pub mod company {
    use super::{Column, ColumnLayout};

    pub const NAME: Column = Column::new("nombre", 0);
    pub const ADDRESS: Column = Column::new("direccion", 1);
    pub const PHONE: Column = Column::new("telefono", 2);

    pub const LAYOUT: ColumnLayout = ColumnLayout {
        file: "empresas",
        columns: &[NAME, ADDRESS, PHONE],
    };
}

// ==========================================
// 陆地加油站文件（29 列）
// ==========================================
pub mod land_station {
    use super::{Column, ColumnLayout, Fuel, FUEL_COUNT};

    pub const LOCALITY: Column = Column::new("localidad", 0);
    pub const POSTAL_CODE: Column = Column::new("codigoPostal", 1);
    pub const ADDRESS: Column = Column::new("direccion", 2);
    pub const MARGIN: Column = Column::new("margen", 3);
    pub const LONGITUDE: Column = Column::new("longitud", 4);
    pub const LATITUDE: Column = Column::new("latitud", 5);
    pub const SAMPLED_AT: Column = Column::new("tomaDeDatos", 6);
    pub const BIOALCOHOL_PCT: Column = Column::new("porcBioalcohol", 22);
    pub const METHYL_ESTER_PCT: Column = Column::new("porcEsterMetilico", 23);
    pub const COMPANY: Column = Column::new("empresa", 24);
    pub const SALE_TYPE: Column = Column::new("tipoVenta", 25);
    pub const REMARK: Column = Column::new("rem", 26);
    pub const SCHEDULE: Column = Column::new("horario", 27);
    pub const SERVICE_TYPE: Column = Column::new("tipoServicio", 28);

    /// 第 7..=21 列依次为 Fuel::ALL 的 15 个价格
    pub const PRICE_START: usize = 7;

    /// 价格列（与 Fuel::ALL 同序）
    pub const PRICES: [(Fuel, Column); FUEL_COUNT] = [
        (Fuel::Gasolina95E5, Column::new("gasolina95E5", PRICE_START)),
        (Fuel::Gasolina95E10, Column::new("gasolina95E10", PRICE_START + 1)),
        (Fuel::Gasolina95E5Premium, Column::new("gasolina95E5Premium", PRICE_START + 2)),
        (Fuel::Gasolina98E5, Column::new("gasolina98E5", PRICE_START + 3)),
        (Fuel::Gasolina98E10, Column::new("gasolina98E10", PRICE_START + 4)),
        (Fuel::GasoleoA, Column::new("gasoleoA", PRICE_START + 5)),
        (Fuel::GasoleoPremium, Column::new("gasoleoPremium", PRICE_START + 6)),
        (Fuel::GasoleoB, Column::new("gasoleoB", PRICE_START + 7)),
        (Fuel::GasoleoC, Column::new("gasoleoC", PRICE_START + 8)),
        (Fuel::Bioetanol, Column::new("bioetanol", PRICE_START + 9)),
        (Fuel::Biodiesel, Column::new("biodiesel", PRICE_START + 10)),
        (Fuel::GasesLicuadosDelPetroleo, Column::new("gasesLicuadosDelPetroleo", PRICE_START + 11)),
        (Fuel::GasNaturalComprimido, Column::new("gasNaturalComprimido", PRICE_START + 12)),
        (Fuel::GasNaturalLicuado, Column::new("gasNaturalLicuado", PRICE_START + 13)),
        (Fuel::Hidrogeno, Column::new("hidrogeno", PRICE_START + 14)),
    ];

    pub const LAYOUT: ColumnLayout = ColumnLayout {
        file: "gasolineras",
        columns: &[
            LOCALITY,
            POSTAL_CODE,
            ADDRESS,
            MARGIN,
            LONGITUDE,
            LATITUDE,
            SAMPLED_AT,
            BIOALCOHOL_PCT,
            METHYL_ESTER_PCT,
            COMPANY,
            SALE_TYPE,
            REMARK,
            SCHEDULE,
            SERVICE_TYPE,
        ],
    };
}

// ==========================================
// 水上加油码头文件（14 列）
// ==========================================
// 价格列仅 4 个，其余燃油为缺失哨兵
pub mod water_station {
    use super::{Column, ColumnLayout, Fuel};

    pub const LOCALITY: Column = Column::new("localidad", 0);
    pub const POSTAL_CODE: Column = Column::new("codigoPostal", 1);
    pub const ADDRESS: Column = Column::new("direccion", 2);
    pub const LONGITUDE: Column = Column::new("longitud", 3);
    pub const LATITUDE: Column = Column::new("latitud", 4);
    pub const MARITIME_DIESEL_PCT: Column = Column::new("gasoleoUsoMaritimo", 9);
    pub const COMPANY: Column = Column::new("empresa", 10);
    pub const SALE_TYPE: Column = Column::new("tipoVenta", 11);
    pub const REMARK: Column = Column::new("rem", 12);
    pub const SCHEDULE: Column = Column::new("horario", 13);

    pub const PRICES: [(Fuel, Column); 4] = [
        (Fuel::Gasolina95E5, Column::new("gasolina95E5", 5)),
        (Fuel::Gasolina95E10, Column::new("gasolina95E10", 6)),
        (Fuel::GasoleoA, Column::new("gasoleoA", 7)),
        (Fuel::GasoleoB, Column::new("gasoleoB", 8)),
    ];

    pub const LAYOUT: ColumnLayout = ColumnLayout {
        file: "embarcaderos",
        columns: &[
            LOCALITY,
            POSTAL_CODE,
            ADDRESS,
            LONGITUDE,
            LATITUDE,
            MARITIME_DIESEL_PCT,
            COMPANY,
            SALE_TYPE,
            REMARK,
            SCHEDULE,
        ],
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_widths() {
        assert_eq!(locality::LAYOUT.width(), 3);
        assert_eq!(company::LAYOUT.width(), 3);
        assert_eq!(land_station::LAYOUT.width(), 29);
        assert_eq!(water_station::LAYOUT.width(), 14);
    }

    #[test]
    fn test_land_price_columns_follow_fuel_order() {
        for (i, (fuel, column)) in land_station::PRICES.iter().enumerate() {
            assert_eq!(*fuel, Fuel::ALL[i]);
            assert_eq!(column.index, land_station::PRICE_START + i);
        }
    }
}
