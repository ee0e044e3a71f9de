// ==========================================
// 燃油价格导入系统 - 地点导入
// ==========================================
// 键: nombre（全局唯一）
// 已存在的地点沿用持久化 ID，新地点从 MAX(id)+1 起分配
// ==========================================

use crate::config::IntakeConfig;
use crate::domain::{EntityKind, Locality};
use crate::importer::column_layout::locality;
use crate::importer::entity_intake::{EntityIntake, IntakeSession, IntakeSummary, RunClock};
use crate::importer::error::IntakeResult;
use crate::importer::field_mapper::FieldCodec;
use crate::importer::id_allocator::IdAllocator;
use crate::importer::reference_resolver::{ReferenceResolver, SqliteReferenceResolver};
use crate::repository::LookupRepository;
use rusqlite::Connection;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, instrument};

pub struct LocalityIntake {
    session: IntakeSession,
}

impl LocalityIntake {
    pub fn new(config: IntakeConfig) -> IntakeResult<Self> {
        Ok(Self {
            session: IntakeSession::open(config)?,
        })
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>, config: IntakeConfig) -> IntakeResult<Self> {
        Ok(Self {
            session: IntakeSession::from_connection(conn, config)?,
        })
    }
}

impl EntityIntake for LocalityIntake {
    fn kind(&self) -> EntityKind {
        EntityKind::Locality
    }

    fn config(&self) -> &IntakeConfig {
        self.session.config()
    }

    #[instrument(skip(self, path), fields(file = %path.display()))]
    fn import_from_csv(&self, path: &Path) -> IntakeResult<IntakeSummary> {
        let clock = RunClock::start();
        info!(run_id = %clock.run_id, "开始导入地点");

        let rows = self.session.reader().read_rows(path, &locality::LAYOUT)?;
        let mut conn = self.session.lock()?;

        // === 读阶段 ===
        let repo = LookupRepository::new(&conn);
        let resolver = SqliteReferenceResolver::new(repo);
        let mut ids = IdAllocator::allocate(&repo, EntityKind::Locality)?;
        let mut known: HashMap<String, i64> = HashMap::new();
        let mut records = Vec::with_capacity(rows.len());

        for row in &rows {
            let name = FieldCodec::text(row, locality::NAME)?;
            let id = match known.get(&name) {
                Some(id) => *id,
                None => {
                    let id = match resolver.resolve_locality(&name)? {
                        Some(existing) => existing.id,
                        None => ids.next_id(),
                    };
                    known.insert(name.clone(), id);
                    id
                }
            };

            records.push(Locality {
                id,
                province: FieldCodec::text(row, locality::PROVINCE)?,
                municipality: FieldCodec::text(row, locality::MUNICIPALITY)?,
                name,
            });
        }
        debug!(records = records.len(), distinct = known.len(), "地点记录已构建");

        // === 写阶段 ===
        let entities = self.session.reconciler().run(&mut conn, &records)?;

        let summary = IntakeSummary {
            run_id: clock.run_id.clone(),
            kind: EntityKind::Locality,
            file: path.display().to_string(),
            total_rows: rows.len(),
            price_sheets: None,
            entities,
            unresolved_companies: 0,
            elapsed_ms: clock.elapsed_ms(),
        };
        summary.log();
        Ok(summary)
    }
}
