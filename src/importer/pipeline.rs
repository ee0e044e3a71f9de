// ==========================================
// 燃油价格导入系统 - 导入管道
// ==========================================
// 职责: 按实体种类构建导入器，按依赖顺序执行全部导入
// 顺序: 地点 → 公司 → 陆地加油站 → 水上加油码头
// ==========================================

use crate::config::IntakeConfig;
use crate::db::{init_schema, open_sqlite_connection};
use crate::domain::EntityKind;
use crate::importer::company_intake::CompanyIntake;
use crate::importer::entity_intake::{EntityIntake, IntakeSummary};
use crate::importer::error::{IntakeError, IntakeResult};
use crate::importer::locality_intake::LocalityIntake;
use crate::importer::station_intake::{LandStationIntake, WaterStationIntake};
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{error, info};

pub struct IntakePipeline {
    conn: Arc<Mutex<Connection>>,
    config: IntakeConfig,
}

impl IntakePipeline {
    /// 打开配置中的数据库并确保 schema 存在
    pub fn open(config: IntakeConfig) -> IntakeResult<Self> {
        let conn = open_sqlite_connection(&config.database_path)?;
        init_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            config,
        })
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>, config: IntakeConfig) -> Self {
        Self { conn, config }
    }

    pub fn connection(&self) -> Arc<Mutex<Connection>> {
        Arc::clone(&self.conn)
    }

    pub fn config(&self) -> &IntakeConfig {
        &self.config
    }

    /// 构建指定种类的导入器（共享同一连接）
    pub fn intake_for(&self, kind: EntityKind) -> IntakeResult<Box<dyn EntityIntake>> {
        let conn = self.connection();
        let config = self.config.clone();
        let intake: Box<dyn EntityIntake> = match kind {
            EntityKind::Locality => Box::new(LocalityIntake::from_connection(conn, config)?),
            EntityKind::Company => Box::new(CompanyIntake::from_connection(conn, config)?),
            EntityKind::LandStation => Box::new(LandStationIntake::from_connection(conn, config)?),
            EntityKind::WaterStation => {
                Box::new(WaterStationIntake::from_connection(conn, config)?)
            }
        };
        Ok(intake)
    }

    /// 导入单个种类（file 为空时使用配置中的默认文件）
    pub fn run(&self, kind: EntityKind, file: Option<&Path>) -> IntakeResult<IntakeSummary> {
        let intake = self.intake_for(kind)?;
        match file {
            Some(path) => intake.import_from_csv(path),
            None => intake.import_configured_file(),
        }
    }

    /// 按依赖顺序导入全部种类，遇到第一个失败即停止
    ///
    /// 已提交的种类保持提交状态，失败种类的事务已回滚。
    pub fn run_all(&self) -> IntakeResult<Vec<IntakeSummary>> {
        let mut summaries = Vec::with_capacity(4);
        for kind in EntityKind::all_in_dependency_order() {
            match self.run(kind, None) {
                Ok(summary) => summaries.push(summary),
                Err(e) => {
                    error!(kind = %kind, error = %e, "导入失败，后续种类不再执行");
                    return Err(e);
                }
            }
        }
        info!(kinds = summaries.len(), "全部导入完成");
        Ok(summaries)
    }
}

impl TryFrom<IntakeConfig> for IntakePipeline {
    type Error = IntakeError;

    fn try_from(config: IntakeConfig) -> IntakeResult<Self> {
        Self::open(config)
    }
}
