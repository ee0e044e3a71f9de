// ==========================================
// 燃油价格导入系统 - 字段解码器 (FieldCodec)
// ==========================================
// 职责: 原始字符串字段 → 类型化值
// 规则:
// - 价格/百分比: 空 → -1；逗号小数；非法即致命
// - 坐标: 逗号小数；不允许缺失
// - 日期: dd/mm/yyyy HH:MM；缺失或非法即致命
// - 整数: 直接解析；非法即致命
// ==========================================

use crate::domain::PRICE_ABSENT;
use crate::importer::column_layout::Column;
use crate::importer::error::{IntakeError, IntakeResult};
use crate::importer::file_parser::CsvRow;
use chrono::NaiveDateTime;

/// 采集时间格式
pub const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M";

pub struct FieldCodec;

impl FieldCodec {
    /// 解析价格/百分比（空值 → -1）
    pub fn parse_price(value: Option<&str>, row: usize, field: &str) -> IntakeResult<f64> {
        match value.map(str::trim) {
            None | Some("") => Ok(PRICE_ABSENT),
            Some(raw) => Self::parse_decimal(raw, row, field),
        }
    }

    /// 解析坐标（不允许缺失）
    pub fn parse_coordinate(value: &str, row: usize, field: &str) -> IntakeResult<f64> {
        let raw = value.trim();
        if raw.is_empty() {
            return Err(IntakeError::TypeConversionError {
                row,
                field: field.to_string(),
                message: "坐标缺失".to_string(),
            });
        }
        Self::parse_decimal(raw, row, field)
    }

    /// 解析采集时间（dd/mm/yyyy HH:MM）
    pub fn parse_timestamp(value: &str, row: usize, field: &str) -> IntakeResult<NaiveDateTime> {
        NaiveDateTime::parse_from_str(value.trim(), TIMESTAMP_FORMAT).map_err(|_| {
            IntakeError::DateFormatError {
                row,
                field: field.to_string(),
                value: value.to_string(),
            }
        })
    }

    /// 解析整数（邮编、电话、ID）
    pub fn parse_int<T: std::str::FromStr>(value: &str, row: usize, field: &str) -> IntakeResult<T> {
        value
            .trim()
            .parse::<T>()
            .map_err(|_| IntakeError::TypeConversionError {
                row,
                field: field.to_string(),
                message: format!("无法解析为整数: '{}'", value),
            })
    }

    /// 逗号小数 → 点小数后解析
    fn parse_decimal(raw: &str, row: usize, field: &str) -> IntakeResult<f64> {
        let normalized = raw.replace(',', ".");
        match normalized.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(v),
            _ => Err(IntakeError::TypeConversionError {
                row,
                field: field.to_string(),
                message: format!("无法解析为浮点数: '{}'", raw),
            }),
        }
    }

    // ===== 按具名列解码（携带行号与列名） =====

    pub fn text(row: &CsvRow, column: Column) -> IntakeResult<String> {
        Ok(row.get(column)?.to_string())
    }

    pub fn price(row: &CsvRow, column: Column) -> IntakeResult<f64> {
        Self::parse_price(Some(row.get(column)?), row.line, column.name)
    }

    pub fn coordinate(row: &CsvRow, column: Column) -> IntakeResult<f64> {
        Self::parse_coordinate(row.get(column)?, row.line, column.name)
    }

    pub fn timestamp(row: &CsvRow, column: Column) -> IntakeResult<NaiveDateTime> {
        Self::parse_timestamp(row.get(column)?, row.line, column.name)
    }

    pub fn int<T: std::str::FromStr>(row: &CsvRow, column: Column) -> IntakeResult<T> {
        Self::parse_int(row.get(column)?, row.line, column.name)
    }
}
