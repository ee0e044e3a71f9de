// ==========================================
// 燃油价格导入系统 - 价格表领域模型
// ==========================================
// 对齐: precios 表（15 个燃油价格列）
// 红线: 缺失价格一律为 -1，永不为 NULL/NaN
// ==========================================

use crate::domain::types::PRICE_ABSENT;
use serde::{Deserialize, Serialize};

/// 价格表中燃油列数
pub const FUEL_COUNT: usize = 15;

// ==========================================
// Fuel - 燃油种类（顺序与 CSV 列、precios 表列一致）
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Fuel {
    Gasolina95E5,
    Gasolina95E10,
    Gasolina95E5Premium,
    Gasolina98E5,
    Gasolina98E10,
    GasoleoA,
    GasoleoPremium,
    GasoleoB,
    GasoleoC,
    Bioetanol,
    Biodiesel,
    GasesLicuadosDelPetroleo,
    GasNaturalComprimido,
    GasNaturalLicuado,
    Hidrogeno,
}

impl Fuel {
    pub const ALL: [Fuel; FUEL_COUNT] = [
        Fuel::Gasolina95E5,
        Fuel::Gasolina95E10,
        Fuel::Gasolina95E5Premium,
        Fuel::Gasolina98E5,
        Fuel::Gasolina98E10,
        Fuel::GasoleoA,
        Fuel::GasoleoPremium,
        Fuel::GasoleoB,
        Fuel::GasoleoC,
        Fuel::Bioetanol,
        Fuel::Biodiesel,
        Fuel::GasesLicuadosDelPetroleo,
        Fuel::GasNaturalComprimido,
        Fuel::GasNaturalLicuado,
        Fuel::Hidrogeno,
    ];

    /// precios 表列名
    pub fn column(&self) -> &'static str {
        match self {
            Fuel::Gasolina95E5 => "gasolina95E5",
            Fuel::Gasolina95E10 => "gasolina95E10",
            Fuel::Gasolina95E5Premium => "gasolina95E5Premium",
            Fuel::Gasolina98E5 => "gasolina98E5",
            Fuel::Gasolina98E10 => "gasolina98E10",
            Fuel::GasoleoA => "gasoleoA",
            Fuel::GasoleoPremium => "gasoleoPremium",
            Fuel::GasoleoB => "gasoleoB",
            Fuel::GasoleoC => "gasoleoC",
            Fuel::Bioetanol => "bioetanol",
            Fuel::Biodiesel => "biodiesel",
            Fuel::GasesLicuadosDelPetroleo => "gasesLicuadosDelPetroleo",
            Fuel::GasNaturalComprimido => "gasNaturalComprimido",
            Fuel::GasNaturalLicuado => "gasNaturalLicuado",
            Fuel::Hidrogeno => "hidrogeno",
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

// ==========================================
// PriceSheet - 价格表（与站点一对一）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSheet {
    pub id: i64,
    prices: [f64; FUEL_COUNT],
}

impl PriceSheet {
    /// 全部价格缺失的价格表
    pub fn absent(id: i64) -> Self {
        Self {
            id,
            prices: [PRICE_ABSENT; FUEL_COUNT],
        }
    }

    /// 按 Fuel::ALL 顺序构造
    pub fn from_prices(id: i64, prices: [f64; FUEL_COUNT]) -> Self {
        Self { id, prices }
    }

    pub fn price(&self, fuel: Fuel) -> f64 {
        self.prices[fuel.index()]
    }

    pub fn set_price(&mut self, fuel: Fuel, value: f64) {
        self.prices[fuel.index()] = value;
    }

    pub fn with_price(mut self, fuel: Fuel, value: f64) -> Self {
        self.set_price(fuel, value);
        self
    }

    /// 按列顺序的全部价格
    pub fn prices(&self) -> &[f64; FUEL_COUNT] {
        &self.prices
    }

    pub fn is_available(&self, fuel: Fuel) -> bool {
        self.price(fuel) > 0.0
    }
}
