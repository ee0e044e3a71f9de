// ==========================================
// 燃油价格导入系统 - 站点导入（陆地 / 水上）
// ==========================================
// 物理键: coordKey（坐标按固定精度取整）
// 每个站点行同时产出一个价格表记录，ID 同步分配
// 写阶段: 价格表对账 → 站点对账，同一事务，最后提交一次
// ==========================================

use crate::config::IntakeConfig;
use crate::domain::{
    CoordKey, EntityKind, Fuel, LandStation, PriceSheet, StationIds, StationTable, WaterStation,
    NO_COMPANY_ID,
};
use crate::importer::column_layout::{land_station, water_station, Column};
use crate::importer::entity_intake::{EntityIntake, IntakeSession, IntakeSummary, RunClock};
use crate::importer::error::IntakeResult;
use crate::importer::field_mapper::FieldCodec;
use crate::importer::file_parser::CsvRow;
use crate::importer::id_allocator::IdAllocator;
use crate::importer::reference_resolver::{ReferenceResolver, SqliteReferenceResolver};
use crate::importer::upsert_reconciler::{UpsertEntity, UpsertReconciler, UpsertReport};
use crate::repository::LookupRepository;
use rusqlite::Connection;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, instrument};

// ==========================================
// StationReadPhase - 站点读阶段公共状态
// ==========================================
struct StationReadPhase<'c> {
    table: StationTable,
    repo: LookupRepository<'c>,
    resolver: SqliteReferenceResolver<'c>,
    ids: IdAllocator,
    // 本次运行已出现的坐标键 → 已分配/已持久化的 ID
    known: HashMap<CoordKey, StationIds>,
    coord_key_decimals: usize,
    unresolved_companies: usize,
}

impl<'c> StationReadPhase<'c> {
    fn begin(
        conn: &'c Connection,
        kind: EntityKind,
        table: StationTable,
        coord_key_decimals: usize,
    ) -> IntakeResult<Self> {
        let repo = LookupRepository::new(conn);
        Ok(Self {
            table,
            repo,
            resolver: SqliteReferenceResolver::new(repo),
            ids: IdAllocator::allocate(&repo, kind)?,
            known: HashMap::new(),
            coord_key_decimals,
            unresolved_companies: 0,
        })
    }

    /// 地点必须存在
    fn locality_id(&self, row: &CsvRow, column: Column) -> IntakeResult<i64> {
        let name = row.get(column)?;
        Ok(self.resolver.require_locality(name, row.line)?.id)
    }

    /// 公司未找到 → 哨兵 0（非空名称计入未解析数）
    fn company_id(&mut self, row: &CsvRow, column: Column) -> IntakeResult<i64> {
        let name = row.get(column)?;
        match self.resolver.resolve_company(name)? {
            Some(company) => Ok(company.id),
            None => {
                if !name.is_empty() {
                    self.unresolved_companies += 1;
                    debug!(row = row.line, company = name, "公司未找到，使用哨兵 ID 0");
                }
                Ok(NO_COMPANY_ID)
            }
        }
    }

    fn coord_key(&self, longitude: f64, latitude: f64) -> CoordKey {
        CoordKey::new(longitude, latitude, self.coord_key_decimals)
    }

    /// 已知坐标沿用原 ID（含价格表 ID），否则同步分配新 ID
    fn station_ids(&mut self, key: &CoordKey) -> IntakeResult<StationIds> {
        if let Some(ids) = self.known.get(key) {
            return Ok(*ids);
        }
        let ids = match self.repo.find_station_ids(self.table, key)? {
            Some(persisted) => persisted,
            None => self.ids.next_station_ids()?,
        };
        self.known.insert(key.clone(), ids);
        Ok(ids)
    }
}

/// 价格表与站点在同一事务中对账
fn reconcile_station_batch<S: UpsertEntity>(
    conn: &mut Connection,
    reconciler: UpsertReconciler,
    sheets: &[PriceSheet],
    stations: &[S],
) -> IntakeResult<(UpsertReport, UpsertReport)> {
    let tx = conn.transaction()?;
    let sheet_report = reconciler.run_in(&tx, sheets)?;
    let station_report = reconciler.run_in(&tx, stations)?;
    tx.commit()?;

    info!(
        table = S::TABLE,
        price_sheets = sheet_report.processed(),
        stations = station_report.processed(),
        "站点事务已提交"
    );
    Ok((sheet_report, station_report))
}

/// 按列表解码价格，未列出的燃油保持缺失哨兵
fn decode_price_sheet(row: &CsvRow, id: i64, columns: &[(Fuel, Column)]) -> IntakeResult<PriceSheet> {
    let mut sheet = PriceSheet::absent(id);
    for (fuel, column) in columns {
        sheet.set_price(*fuel, FieldCodec::price(row, *column)?);
    }
    Ok(sheet)
}

// ==========================================
// LandStationIntake - 陆地加油站
// ==========================================
pub struct LandStationIntake {
    session: IntakeSession,
}

impl LandStationIntake {
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

impl EntityIntake for LandStationIntake {
    fn kind(&self) -> EntityKind {
        EntityKind::LandStation
    }

    fn config(&self) -> &IntakeConfig {
        self.session.config()
    }

    #[instrument(skip(self, path), fields(file = %path.display()))]
    fn import_from_csv(&self, path: &Path) -> IntakeResult<IntakeSummary> {
        use land_station as col;

        let clock = RunClock::start();
        info!(run_id = %clock.run_id, "开始导入陆地加油站");

        let rows = self.session.reader().read_rows(path, &col::LAYOUT)?;
        let mut conn = self.session.lock()?;

        // === 读阶段 ===
        let mut phase = StationReadPhase::begin(
            &conn,
            EntityKind::LandStation,
            StationTable::Land,
            self.config().coord_key_decimals,
        )?;
        let mut sheets = Vec::with_capacity(rows.len());
        let mut stations = Vec::with_capacity(rows.len());

        for row in &rows {
            let longitude = FieldCodec::coordinate(row, col::LONGITUDE)?;
            let latitude = FieldCodec::coordinate(row, col::LATITUDE)?;
            let coord_key = phase.coord_key(longitude, latitude);

            let locality_id = phase.locality_id(row, col::LOCALITY)?;
            let company_id = phase.company_id(row, col::COMPANY)?;
            let ids = phase.station_ids(&coord_key)?;

            sheets.push(decode_price_sheet(row, ids.price_sheet_id, &col::PRICES)?);
            stations.push(LandStation {
                id: ids.station_id,
                locality_id,
                postal_code: FieldCodec::int(row, col::POSTAL_CODE)?,
                address: FieldCodec::text(row, col::ADDRESS)?,
                margin: FieldCodec::text(row, col::MARGIN)?,
                longitude,
                latitude,
                coord_key,
                sampled_at: FieldCodec::timestamp(row, col::SAMPLED_AT)?,
                price_sheet_id: ids.price_sheet_id,
                bioalcohol_pct: FieldCodec::price(row, col::BIOALCOHOL_PCT)?,
                methyl_ester_pct: FieldCodec::price(row, col::METHYL_ESTER_PCT)?,
                company_id,
                sale_type: FieldCodec::text(row, col::SALE_TYPE)?,
                remark: FieldCodec::text(row, col::REMARK)?,
                schedule: FieldCodec::text(row, col::SCHEDULE)?,
                service_type: FieldCodec::text(row, col::SERVICE_TYPE)?,
            });
        }
        let unresolved_companies = phase.unresolved_companies;
        debug!(
            stations = stations.len(),
            distinct = phase.known.len(),
            unresolved_companies,
            "陆地加油站记录已构建"
        );

        // === 写阶段 ===
        let (sheet_report, station_report) =
            reconcile_station_batch(&mut conn, self.session.reconciler(), &sheets, &stations)?;

        let summary = IntakeSummary {
            run_id: clock.run_id.clone(),
            kind: EntityKind::LandStation,
            file: path.display().to_string(),
            total_rows: rows.len(),
            price_sheets: Some(sheet_report),
            entities: station_report,
            unresolved_companies,
            elapsed_ms: clock.elapsed_ms(),
        };
        summary.log();
        Ok(summary)
    }
}

// ==========================================
// WaterStationIntake - 水上加油码头
// ==========================================
pub struct WaterStationIntake {
    session: IntakeSession,
}

impl WaterStationIntake {
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

impl EntityIntake for WaterStationIntake {
    fn kind(&self) -> EntityKind {
        EntityKind::WaterStation
    }

    fn config(&self) -> &IntakeConfig {
        self.session.config()
    }

    #[instrument(skip(self, path), fields(file = %path.display()))]
    fn import_from_csv(&self, path: &Path) -> IntakeResult<IntakeSummary> {
        use water_station as col;

        let clock = RunClock::start();
        info!(run_id = %clock.run_id, "开始导入水上加油码头");

        let rows = self.session.reader().read_rows(path, &col::LAYOUT)?;
        let mut conn = self.session.lock()?;

        let mut phase = StationReadPhase::begin(
            &conn,
            EntityKind::WaterStation,
            StationTable::Water,
            self.config().coord_key_decimals,
        )?;
        let mut sheets = Vec::with_capacity(rows.len());
        let mut stations = Vec::with_capacity(rows.len());

        for row in &rows {
            let longitude = FieldCodec::coordinate(row, col::LONGITUDE)?;
            let latitude = FieldCodec::coordinate(row, col::LATITUDE)?;
            let coord_key = phase.coord_key(longitude, latitude);

            let locality_id = phase.locality_id(row, col::LOCALITY)?;
            let company_id = phase.company_id(row, col::COMPANY)?;
            let ids = phase.station_ids(&coord_key)?;

            sheets.push(decode_price_sheet(row, ids.price_sheet_id, &col::PRICES)?);
            stations.push(WaterStation {
                id: ids.station_id,
                locality_id,
                postal_code: FieldCodec::int(row, col::POSTAL_CODE)?,
                address: FieldCodec::text(row, col::ADDRESS)?,
                longitude,
                latitude,
                coord_key,
                price_sheet_id: ids.price_sheet_id,
                maritime_diesel_pct: FieldCodec::price(row, col::MARITIME_DIESEL_PCT)?,
                company_id,
                sale_type: FieldCodec::text(row, col::SALE_TYPE)?,
                remark: FieldCodec::text(row, col::REMARK)?,
                schedule: FieldCodec::text(row, col::SCHEDULE)?,
            });
        }
        let unresolved_companies = phase.unresolved_companies;
        debug!(
            stations = stations.len(),
            distinct = phase.known.len(),
            unresolved_companies,
            "水上加油码头记录已构建"
        );

        let (sheet_report, station_report) =
            reconcile_station_batch(&mut conn, self.session.reconciler(), &sheets, &stations)?;

        let summary = IntakeSummary {
            run_id: clock.run_id.clone(),
            kind: EntityKind::WaterStation,
            file: path.display().to_string(),
            total_rows: rows.len(),
            price_sheets: Some(sheet_report),
            entities: station_report,
            unresolved_companies,
            elapsed_ms: clock.elapsed_ms(),
        };
        summary.log();
        Ok(summary)
    }
}
