// ==========================================
// 燃油价格导入系统 - CSV 文件读取
// ==========================================
// 分隔符: 默认 ';'，支持引号
// 表头: 跳过，但用于加载时校验列宽
// 编码: UTF-8（可带 BOM），否则按 windows-1252 解码
// ==========================================

use crate::importer::column_layout::{Column, ColumnLayout};
use crate::importer::error::{IntakeError, IntakeResult};
use csv::{ReaderBuilder, StringRecord, Trim};
use encoding_rs::{UTF_8, WINDOWS_1252};
use std::borrow::Cow;
use std::fs;
use std::path::Path;
use tracing::debug;

/// 默认分隔符
pub const DEFAULT_DELIMITER: u8 = b';';

// ==========================================
// CsvRow - 一行数据（携带文件行号）
// ==========================================
#[derive(Debug, Clone)]
pub struct CsvRow {
    /// 文件中的行号（1 起始，表头为第 1 行）
    pub line: usize,
    fields: StringRecord,
}

impl CsvRow {
    pub fn new(line: usize, fields: StringRecord) -> Self {
        Self { line, fields }
    }

    /// 按具名列取值（已去除首尾空白）
    pub fn get(&self, column: Column) -> IntakeResult<&str> {
        self.fields
            .get(column.index)
            .ok_or_else(|| IntakeError::MissingColumn {
                row: self.line,
                column: column.name.to_string(),
            })
    }

    /// 实际列数
    pub fn width(&self) -> usize {
        self.fields.len()
    }

    /// 所有字段均为空
    pub fn is_blank(&self) -> bool {
        self.fields.iter().all(|f| f.is_empty())
    }
}

// ==========================================
// CsvRowReader
// ==========================================
#[derive(Debug, Clone, Copy)]
pub struct CsvRowReader {
    delimiter: u8,
}

impl Default for CsvRowReader {
    fn default() -> Self {
        Self::new(DEFAULT_DELIMITER)
    }
}

impl CsvRowReader {
    pub fn new(delimiter: u8) -> Self {
        Self { delimiter }
    }

    /// 读取全部数据行
    ///
    /// # 返回
    /// - Ok(Vec<CsvRow>): 数据行（跳过表头与完全空白行）
    /// - Err: 文件不存在、CSV 格式错误、列宽不足
    pub fn read_rows(&self, path: &Path, layout: &ColumnLayout) -> IntakeResult<Vec<CsvRow>> {
        if !path.exists() {
            return Err(IntakeError::FileNotFound(path.display().to_string()));
        }

        let bytes = fs::read(path)?;
        let text = decode_source(&bytes, layout.file);
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .flexible(true) // 宽度由布局表校验
            .trim(Trim::All)
            .from_reader(text.as_bytes());

        // 表头宽度校验（加载时一次）
        let expected = layout.width();
        let header_width = reader.headers()?.len();
        if header_width < expected {
            return Err(IntakeError::ColumnLayoutMismatch {
                file: layout.file.to_string(),
                row: 1,
                expected,
                actual: header_width,
            });
        }

        let mut rows = Vec::new();
        for (idx, result) in reader.records().enumerate() {
            let record = result?;
            let line = record
                .position()
                .map(|p| p.line() as usize)
                .unwrap_or(idx + 2);
            let row = CsvRow::new(line, record);

            // 跳过完全空白的行
            if row.is_blank() {
                continue;
            }

            if row.width() < expected {
                return Err(IntakeError::ColumnLayoutMismatch {
                    file: layout.file.to_string(),
                    row: line,
                    expected,
                    actual: row.width(),
                });
            }

            rows.push(row);
        }

        debug!(file = layout.file, rows = rows.len(), "CSV 读取完成");
        Ok(rows)
    }
}

/// 源文件解码：合法 UTF-8 原样使用，否则视为 windows-1252（Latin-1 超集）
fn decode_source<'b>(bytes: &'b [u8], file: &str) -> Cow<'b, str> {
    let (text, _, had_errors) = UTF_8.decode(bytes);
    if !had_errors {
        return text;
    }
    debug!(file, "非 UTF-8 输入，按 windows-1252 解码");
    let (text, _) = WINDOWS_1252.decode_without_bom_handling(bytes);
    text
}
