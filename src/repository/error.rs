// ==========================================
// 燃油价格导入系统 - 仓储层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 仓储层错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    // ===== 数据库错误 =====
    #[error("数据库锁获取失败: {0}")]
    LockError(String),

    #[error("数据库查询失败: {0}")]
    DatabaseQueryError(String),

    #[error("唯一约束违反: {0}")]
    UniqueConstraintViolation(String),

    #[error("外键约束违反: {0}")]
    ForeignKeyViolation(String),

    // ===== 通用错误 =====
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// 实现 From<rusqlite::Error>
impl From<rusqlite::Error> for RepositoryError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(_, Some(msg)) => {
                if msg.contains("UNIQUE") {
                    RepositoryError::UniqueConstraintViolation(msg)
                } else if msg.contains("FOREIGN KEY") {
                    RepositoryError::ForeignKeyViolation(msg)
                } else {
                    RepositoryError::DatabaseQueryError(msg)
                }
            }
            _ => RepositoryError::DatabaseQueryError(err.to_string()),
        }
    }
}

/// Result 类型别名
pub type RepositoryResult<T> = Result<T, RepositoryError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_in_memory;

    #[test]
    fn test_rusqlite_error_classification() {
        let conn = open_in_memory().unwrap();
        conn.execute(
            "INSERT INTO localidad (id, provincia, municipio, nombre) VALUES (1, 'Madrid', 'Madrid', 'Madrid')",
            [],
        )
        .unwrap();

        let duplicate = conn
            .execute(
                "INSERT INTO localidad (id, provincia, municipio, nombre) VALUES (1, 'Madrid', 'Madrid', 'Getafe')",
                [],
            )
            .unwrap_err();
        assert!(matches!(
            RepositoryError::from(duplicate),
            RepositoryError::UniqueConstraintViolation(_)
        ));

        // 单行查询落空由调用方以 optional() 处理，漏网时按查询失败归类
        let no_rows = conn
            .query_row("SELECT id FROM localidad WHERE id = 99", [], |row| {
                row.get::<_, i64>(0)
            })
            .unwrap_err();
        assert!(matches!(
            RepositoryError::from(no_rows),
            RepositoryError::DatabaseQueryError(_)
        ));
    }
}
