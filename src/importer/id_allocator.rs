// ==========================================
// 燃油价格导入系统 - ID 分配器
// ==========================================
// 职责: 每次运行读取一次 MAX(id)，在内存中递增发放新 ID
// 作用域: 单次运行，不跨运行共享
// 说明: 未提交行占用的 ID 随事务回滚一并作废
// ==========================================

use crate::domain::{EntityKind, StationIds};
use crate::importer::error::{IntakeError, IntakeResult};
use crate::repository::LookupRepository;
use tracing::debug;

/// 价格表所在表
pub const PRICE_SHEET_TABLE: &str = "precios";

// ==========================================
// IdSequence - 单表递增序列
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdSequence {
    current: i64,
}

impl IdSequence {
    /// 以已持久化的最大 ID 为种子（空表为 0）
    pub fn seeded(current: i64) -> Self {
        Self { current }
    }

    pub fn next_id(&mut self) -> i64 {
        self.current += 1;
        self.current
    }

    /// 最近一次发放的 ID（未发放时为种子）
    pub fn current(&self) -> i64 {
        self.current
    }
}

// ==========================================
// IdAllocator - 按实体种类分配
// ==========================================
#[derive(Debug, Clone)]
pub struct IdAllocator {
    kind: EntityKind,
    entities: IdSequence,
    // 仅站点种类携带
    price_sheets: Option<IdSequence>,
}

impl IdAllocator {
    /// 从数据库读取种子
    pub fn allocate(repo: &LookupRepository<'_>, kind: EntityKind) -> IntakeResult<Self> {
        let entities = IdSequence::seeded(repo.max_id(kind.table())?);
        let price_sheets = if kind.has_price_sheet() {
            Some(IdSequence::seeded(repo.max_id(PRICE_SHEET_TABLE)?))
        } else {
            None
        };

        debug!(
            kind = %kind,
            entity_seed = entities.current(),
            price_sheet_seed = price_sheets.map(|s| s.current()),
            "ID 序列已初始化"
        );

        Ok(Self {
            kind,
            entities,
            price_sheets,
        })
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// 下一个实体 ID
    pub fn next_id(&mut self) -> i64 {
        self.entities.next_id()
    }

    /// 站点 ID 与价格表 ID 同步发放
    ///
    /// 非站点种类没有价格表序列，返回错误且不消耗实体 ID。
    pub fn next_station_ids(&mut self) -> IntakeResult<StationIds> {
        let kind = self.kind;
        let price_sheet_id = self
            .price_sheets
            .as_mut()
            .ok_or_else(|| IntakeError::PriceSheetSequenceMissing {
                kind: kind.to_string(),
            })?
            .next_id();
        let station_id = self.entities.next_id();
        Ok(StationIds {
            station_id,
            price_sheet_id,
        })
    }
}
