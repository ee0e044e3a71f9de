// ==========================================
// 燃油价格导入系统 - 外键引用解析
// ==========================================
// 职责: 自然键字符串 → 已持久化实体
// 规则:
// - 公司未找到 → 调用方映射为哨兵 ID 0 并计数
// - 地点未找到 → 致命错误（读阶段即中止，尚未写入）
// ==========================================

use crate::domain::{Company, Locality};
use crate::importer::error::{IntakeError, IntakeResult};
use crate::repository::LookupRepository;

// ==========================================
// ReferenceResolver Trait
// ==========================================
// 实现者: SqliteReferenceResolver
pub trait ReferenceResolver {
    /// 按名称精确解析地点
    fn resolve_locality(&self, name: &str) -> IntakeResult<Option<Locality>>;

    /// 按名称精确解析公司
    fn resolve_company(&self, name: &str) -> IntakeResult<Option<Company>>;

    /// 解析地点，未找到即报错（携带行号）
    fn require_locality(&self, name: &str, row: usize) -> IntakeResult<Locality> {
        self.resolve_locality(name)?
            .ok_or_else(|| IntakeError::LocalityNotFound {
                row,
                name: name.to_string(),
            })
    }
}

/// 基于点查仓储的解析器
pub struct SqliteReferenceResolver<'c> {
    repo: LookupRepository<'c>,
}

impl<'c> SqliteReferenceResolver<'c> {
    pub fn new(repo: LookupRepository<'c>) -> Self {
        Self { repo }
    }
}

impl ReferenceResolver for SqliteReferenceResolver<'_> {
    fn resolve_locality(&self, name: &str) -> IntakeResult<Option<Locality>> {
        Ok(self.repo.find_locality_by_name(name)?)
    }

    fn resolve_company(&self, name: &str) -> IntakeResult<Option<Company>> {
        if name.is_empty() {
            return Ok(None);
        }
        Ok(self.repo.find_company_by_name(name)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_in_memory;

    #[test]
    fn test_resolve_company_and_missing() {
        let conn = open_in_memory().unwrap();
        conn.execute(
            "INSERT INTO empresa (id, nombre, direccion, telefono) VALUES (2, 'REPSOL', 'Madrid', 901100100)",
            [],
        )
        .unwrap();

        let resolver = SqliteReferenceResolver::new(LookupRepository::new(&conn));
        assert_eq!(resolver.resolve_company("REPSOL").unwrap().unwrap().id, 2);
        assert!(resolver.resolve_company("PLENOIL").unwrap().is_none());
        assert!(resolver.resolve_company("").unwrap().is_none());
    }

    #[test]
    fn test_require_locality_reports_row() {
        let conn = open_in_memory().unwrap();
        let resolver = SqliteReferenceResolver::new(LookupRepository::new(&conn));

        match resolver.require_locality("Atlantis", 12) {
            Err(IntakeError::LocalityNotFound { row, name }) => {
                assert_eq!(row, 12);
                assert_eq!(name, "Atlantis");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }
}
