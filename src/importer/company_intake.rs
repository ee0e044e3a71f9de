// ==========================================
// 燃油价格导入系统 - 公司导入
// ==========================================
// 键: nombre
// ==========================================

use crate::config::IntakeConfig;
use crate::domain::{Company, EntityKind};
use crate::importer::column_layout::company;
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

pub struct CompanyIntake {
    session: IntakeSession,
}

impl CompanyIntake {
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

impl EntityIntake for CompanyIntake {
    fn kind(&self) -> EntityKind {
        EntityKind::Company
    }

    fn config(&self) -> &IntakeConfig {
        self.session.config()
    }

    #[instrument(skip(self, path), fields(file = %path.display()))]
    fn import_from_csv(&self, path: &Path) -> IntakeResult<IntakeSummary> {
        let clock = RunClock::start();
        info!(run_id = %clock.run_id, "开始导入公司");

        let rows = self.session.reader().read_rows(path, &company::LAYOUT)?;
        let mut conn = self.session.lock()?;

        let repo = LookupRepository::new(&conn);
        let resolver = SqliteReferenceResolver::new(repo);
        let mut ids = IdAllocator::allocate(&repo, EntityKind::Company)?;
        let mut known: HashMap<String, i64> = HashMap::new();
        let mut records = Vec::with_capacity(rows.len());

        for row in &rows {
            let name = FieldCodec::text(row, company::NAME)?;
            let address = FieldCodec::text(row, company::ADDRESS)?;
            let phone: i64 = FieldCodec::int(row, company::PHONE)?;

            let id = match known.get(&name) {
                Some(id) => *id,
                None => {
                    let id = match resolver.resolve_company(&name)? {
                        Some(existing) => existing.id,
                        None => ids.next_id(),
                    };
                    known.insert(name.clone(), id);
                    id
                }
            };

            records.push(Company {
                id,
                name,
                address,
                phone,
            });
        }
        debug!(records = records.len(), distinct = known.len(), "公司记录已构建");

        let entities = self.session.reconciler().run(&mut conn, &records)?;

        let summary = IntakeSummary {
            run_id: clock.run_id.clone(),
            kind: EntityKind::Company,
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
