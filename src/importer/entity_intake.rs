// ==========================================
// 燃油价格导入系统 - 导入编排公共部分
// ==========================================
// 职责: 导入 Trait、运行摘要、连接会话
// 流程: 读阶段（解码 → 解析引用 → 分配 ID）→ 写阶段（对账 → 提交）
// 并发: 连接在整个运行期间持锁，同进程内的运行串行执行
// ==========================================

use crate::config::IntakeConfig;
use crate::db::{configure_sqlite_connection, open_sqlite_connection};
use crate::domain::EntityKind;
use crate::importer::error::{IntakeError, IntakeResult};
use crate::importer::file_parser::CsvRowReader;
use crate::importer::upsert_reconciler::{UpsertReconciler, UpsertReport};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;
use tracing::info;
use uuid::Uuid;

// ==========================================
// EntityIntake Trait
// ==========================================
// 实现者: LocalityIntake / CompanyIntake / LandStationIntake / WaterStationIntake
pub trait EntityIntake {
    fn kind(&self) -> EntityKind;

    fn config(&self) -> &IntakeConfig;

    /// 从 CSV 文件导入（整次运行要么完全提交，要么不留痕迹）
    fn import_from_csv(&self, path: &Path) -> IntakeResult<IntakeSummary>;

    /// 导入配置中该种类的默认文件
    fn import_configured_file(&self) -> IntakeResult<IntakeSummary> {
        let path = self.config().source_file(self.kind()).to_path_buf();
        self.import_from_csv(&path)
    }
}

// ==========================================
// IntakeSummary - 单次运行摘要
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntakeSummary {
    pub run_id: String,
    pub kind: EntityKind,
    pub file: String,
    pub total_rows: usize,
    /// 仅站点种类
    pub price_sheets: Option<UpsertReport>,
    pub entities: UpsertReport,
    /// 按名称未找到、映射为哨兵 0 的公司引用数
    pub unresolved_companies: usize,
    pub elapsed_ms: u64,
}

impl IntakeSummary {
    pub fn log(&self) {
        info!(
            run_id = %self.run_id,
            kind = %self.kind,
            file = %self.file,
            total_rows = self.total_rows,
            inserted = self.entities.inserted,
            updated = self.entities.updated,
            price_sheets_inserted = self.price_sheets.as_ref().map(|r| r.inserted),
            price_sheets_updated = self.price_sheets.as_ref().map(|r| r.updated),
            unresolved_companies = self.unresolved_companies,
            elapsed_ms = self.elapsed_ms,
            "导入运行完成"
        );
    }
}

// ==========================================
// RunClock - 运行标识与计时
// ==========================================
pub(crate) struct RunClock {
    pub run_id: String,
    started: Instant,
}

impl RunClock {
    pub fn start() -> Self {
        Self {
            run_id: Uuid::new_v4().to_string(),
            started: Instant::now(),
        }
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }
}

// ==========================================
// IntakeSession - 连接 + 配置
// ==========================================
pub struct IntakeSession {
    conn: Arc<Mutex<Connection>>,
    config: IntakeConfig,
}

impl IntakeSession {
    /// 按配置中的数据库路径打开连接
    pub fn open(config: IntakeConfig) -> IntakeResult<Self> {
        let conn = open_sqlite_connection(&config.database_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            config,
        })
    }

    /// 从已有连接创建（再次应用统一 PRAGMA，幂等）
    pub fn from_connection(conn: Arc<Mutex<Connection>>, config: IntakeConfig) -> IntakeResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| IntakeError::LockError(e.to_string()))?;
            configure_sqlite_connection(&guard)?;
        }
        Ok(Self { conn, config })
    }

    pub fn config(&self) -> &IntakeConfig {
        &self.config
    }

    pub fn connection(&self) -> Arc<Mutex<Connection>> {
        Arc::clone(&self.conn)
    }

    /// 获取连接锁（运行期间持有）
    pub fn lock(&self) -> IntakeResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| IntakeError::LockError(e.to_string()))
    }

    pub fn reader(&self) -> CsvRowReader {
        CsvRowReader::new(self.config.delimiter_byte())
    }

    pub fn reconciler(&self) -> UpsertReconciler {
        UpsertReconciler::new(self.config.batch_size)
    }
}
