// ==========================================
// 燃油价格导入系统 - 导入层
// ==========================================
// 职责: CSV → 类型化记录 → 批量 upsert 对账 → 提交
// 支持: 地点、公司、陆地加油站、水上加油码头
// ==========================================

// 模块声明
pub mod column_layout;
pub mod company_intake;
pub mod entity_intake;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod id_allocator;
pub mod locality_intake;
pub mod pipeline;
pub mod reference_resolver;
pub mod station_intake;
pub mod upsert_reconciler;

// 重导出核心类型
pub use company_intake::CompanyIntake;
pub use entity_intake::{EntityIntake, IntakeSession, IntakeSummary};
pub use error::{IntakeError, IntakeResult};
pub use field_mapper::FieldCodec;
pub use file_parser::{CsvRow, CsvRowReader};
pub use id_allocator::{IdAllocator, IdSequence};
pub use locality_intake::LocalityIntake;
pub use pipeline::IntakePipeline;
pub use reference_resolver::{ReferenceResolver, SqliteReferenceResolver};
pub use station_intake::{LandStationIntake, WaterStationIntake};
pub use upsert_reconciler::{UpsertEntity, UpsertReconciler, UpsertReport, DEFAULT_BATCH_SIZE};
