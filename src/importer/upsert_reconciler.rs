// ==========================================
// 燃油价格导入系统 - Upsert 对账器
// ==========================================
// 流程（每条记录）: 探测 → 分支(插入/更新) → 累积 → 按批刷新
// 事务: 整个对账过程一个事务，最终刷新后提交一次
// 失败: 任一语句失败即中止，事务随 Drop 回滚
// ==========================================

use crate::importer::error::IntakeResult;
use rusqlite::{Connection, ToSql, Transaction};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt::Debug;
use std::hash::Hash;
use tracing::{debug, info};

/// 默认批大小
pub const DEFAULT_BATCH_SIZE: usize = 5;

// ==========================================
// UpsertEntity Trait
// ==========================================
// 用途: 描述一种实体如何被探测/插入/更新
// 实现者: repository::entity_sql
pub trait UpsertEntity {
    /// 自然键/物理键
    type Key: Eq + Hash + Clone + Debug;

    const TABLE: &'static str;

    /// 返回单列 COUNT(*) 的存在性探测语句
    const EXISTS_SQL: &'static str;

    /// 含 id 的全字段插入
    const INSERT_SQL: &'static str;

    /// 不含 id/键字段的更新，WHERE 定位到键
    const UPDATE_SQL: &'static str;

    fn upsert_key(&self) -> Self::Key;

    fn exists_params(&self) -> Vec<&dyn ToSql>;

    fn insert_params(&self) -> Vec<&dyn ToSql>;

    fn update_params(&self) -> Vec<&dyn ToSql>;
}

// ==========================================
// UpsertReport - 对账结果
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpsertReport {
    pub table: String,
    pub inserted: usize,
    pub updated: usize,
    /// 每次刷新时已处理的记录数（最后一项为收尾刷新）
    pub flushes: Vec<usize>,
}

impl UpsertReport {
    pub fn processed(&self) -> usize {
        self.inserted + self.updated
    }
}

// 待执行的两个批次
struct PendingBatches<'r, E> {
    inserts: Vec<&'r E>,
    updates: Vec<&'r E>,
}

impl<'r, E> PendingBatches<'r, E> {
    fn new(capacity: usize) -> Self {
        Self {
            inserts: Vec::with_capacity(capacity),
            updates: Vec::with_capacity(capacity),
        }
    }
}

// ==========================================
// UpsertReconciler
// ==========================================
#[derive(Debug, Clone, Copy)]
pub struct UpsertReconciler {
    batch_size: usize,
}

impl Default for UpsertReconciler {
    fn default() -> Self {
        Self::new(DEFAULT_BATCH_SIZE)
    }
}

impl UpsertReconciler {
    /// 创建对账器（batch_size 最小为 1）
    pub fn new(batch_size: usize) -> Self {
        Self {
            batch_size: batch_size.max(1),
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// 在独立事务中对账并提交
    ///
    /// # 返回
    /// - Ok(UpsertReport): 已提交
    /// - Err: 任一语句失败，事务已回滚
    pub fn run<E: UpsertEntity>(
        &self,
        conn: &mut Connection,
        records: &[E],
    ) -> IntakeResult<UpsertReport> {
        let tx = conn.transaction()?;
        let report = self.run_in(&tx, records)?;
        tx.commit()?;

        info!(
            table = E::TABLE,
            inserted = report.inserted,
            updated = report.updated,
            "对账事务已提交"
        );
        Ok(report)
    }

    /// 在调用方事务中对账（不提交）
    ///
    /// 同一次运行中已插入的键视为已存在，重复键只更新不重复插入。
    pub fn run_in<E: UpsertEntity>(
        &self,
        tx: &Transaction<'_>,
        records: &[E],
    ) -> IntakeResult<UpsertReport> {
        // 三条语句每次运行只预编译一次
        let mut exists_stmt = tx.prepare_cached(E::EXISTS_SQL)?;
        let mut insert = tx.prepare_cached(E::INSERT_SQL)?;
        let mut update = tx.prepare_cached(E::UPDATE_SQL)?;

        let mut report = UpsertReport {
            table: E::TABLE.to_string(),
            ..UpsertReport::default()
        };
        let mut pending = PendingBatches::new(self.batch_size);
        let mut inserted_keys: HashSet<E::Key> = HashSet::with_capacity(records.len());

        for (idx, record) in records.iter().enumerate() {
            let key = record.upsert_key();

            let exists = inserted_keys.contains(&key) || {
                let count: i64 =
                    exists_stmt.query_row(record.exists_params().as_slice(), |row| row.get(0))?;
                count > 0
            };

            if exists {
                pending.updates.push(record);
            } else {
                inserted_keys.insert(key);
                pending.inserts.push(record);
            }

            let processed = idx + 1;
            if processed % self.batch_size == 0 {
                self.flush(&mut insert, &mut update, &mut pending, &mut report)?;
                report.flushes.push(processed);
                debug!(table = E::TABLE, processed, "批次已刷新");
            }
        }

        // 收尾刷新（无论余数多少）
        self.flush(&mut insert, &mut update, &mut pending, &mut report)?;
        report.flushes.push(records.len());
        debug!(table = E::TABLE, processed = records.len(), "收尾批次已刷新");

        Ok(report)
    }

    /// 执行两个批次：先插入后更新，使同批插入的行可被后续更新命中
    fn flush<E: UpsertEntity>(
        &self,
        insert: &mut rusqlite::CachedStatement<'_>,
        update: &mut rusqlite::CachedStatement<'_>,
        pending: &mut PendingBatches<'_, E>,
        report: &mut UpsertReport,
    ) -> IntakeResult<()> {
        for record in pending.inserts.drain(..) {
            insert.execute(record.insert_params().as_slice())?;
            report.inserted += 1;
        }
        for record in pending.updates.drain(..) {
            update.execute(record.update_params().as_slice())?;
            report.updated += 1;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_in_memory;
    use crate::domain::Locality;

    fn locality(id: i64, name: &str, province: &str) -> Locality {
        Locality {
            id,
            province: province.to_string(),
            municipality: name.to_string(),
            name: name.to_string(),
        }
    }

    fn count(conn: &Connection, table: &str) -> i64 {
        conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
            row.get(0)
        })
        .unwrap()
    }

    #[test]
    fn test_flush_points_twelve_records() {
        let mut conn = open_in_memory().unwrap();
        let records: Vec<Locality> = (1..=12)
            .map(|i| locality(i, &format!("L{:02}", i), "P"))
            .collect();

        let report = UpsertReconciler::new(5).run(&mut conn, &records).unwrap();

        assert_eq!(report.flushes, vec![5, 10, 12]);
        assert_eq!(report.inserted, 12);
        assert_eq!(report.updated, 0);
        assert_eq!(count(&conn, "localidad"), 12);
    }

    #[test]
    fn test_flush_points_exact_multiple_still_final_flush() {
        let mut conn = open_in_memory().unwrap();
        let records: Vec<Locality> = (1..=10)
            .map(|i| locality(i, &format!("L{:02}", i), "P"))
            .collect();

        let report = UpsertReconciler::new(5).run(&mut conn, &records).unwrap();
        assert_eq!(report.flushes, vec![5, 10, 10]);
    }

    #[test]
    fn test_empty_input_single_final_flush() {
        let mut conn = open_in_memory().unwrap();
        let records: Vec<Locality> = Vec::new();

        let report = UpsertReconciler::default().run(&mut conn, &records).unwrap();
        assert_eq!(report.flushes, vec![0]);
        assert_eq!(report.processed(), 0);
    }

    #[test]
    fn test_existing_key_updates_without_touching_id() {
        let mut conn = open_in_memory().unwrap();
        let reconciler = UpsertReconciler::default();

        reconciler
            .run(&mut conn, &[locality(1, "Albacete", "Albacete")])
            .unwrap();

        // 同名不同 id：应更新非键字段，id 保持不变
        let report = reconciler
            .run(&mut conn, &[locality(99, "Albacete", "Castilla-La Mancha")])
            .unwrap();
        assert_eq!(report.updated, 1);
        assert_eq!(report.inserted, 0);

        let (id, province): (i64, String) = conn
            .query_row(
                "SELECT id, provincia FROM localidad WHERE nombre = 'Albacete'",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();
        assert_eq!(id, 1);
        assert_eq!(province, "Castilla-La Mancha");
    }

    #[test]
    fn test_duplicate_key_within_one_batch_updates() {
        let mut conn = open_in_memory().unwrap();
        let records = vec![
            locality(1, "Hellin", "Albacete"),
            locality(2, "Hellin", "Murcia"),
        ];

        let report = UpsertReconciler::default().run(&mut conn, &records).unwrap();
        assert_eq!(report.inserted, 1);
        assert_eq!(report.updated, 1);
        assert_eq!(count(&conn, "localidad"), 1);

        let province: String = conn
            .query_row("SELECT provincia FROM localidad", [], |row| row.get(0))
            .unwrap();
        assert_eq!(province, "Murcia");
    }

    #[test]
    fn test_failure_rolls_back_whole_run() {
        let mut conn = open_in_memory().unwrap();
        // 第 7 条与第 1 条 id 冲突（主键），插入在第二次刷新时失败
        let mut records: Vec<Locality> = (1..=6)
            .map(|i| locality(i, &format!("L{:02}", i), "P"))
            .collect();
        records.push(locality(1, "Duplicado", "P"));

        let result = UpsertReconciler::new(5).run(&mut conn, &records);
        assert!(result.is_err());

        // 第一批虽已刷新，但未提交，整体回滚
        assert_eq!(count(&conn, "localidad"), 0);
    }
}
