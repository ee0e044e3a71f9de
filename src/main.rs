// ==========================================
// 燃油价格导入系统 - 命令行入口
// ==========================================
// 命令: init-db / intake / intake-all / report
// ==========================================

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use fuel_price_intake::config::IntakeConfig;
use fuel_price_intake::db::{init_schema, open_sqlite_connection};
use fuel_price_intake::domain::{EntityKind, StationTable};
use fuel_price_intake::importer::{IntakePipeline, IntakeSummary};
use fuel_price_intake::logging;
use fuel_price_intake::repository::ReportRepository;
use serde_json::json;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "fuel-price-intake")]
#[command(about = "Fuel station price CSV intake into SQLite", version)]
struct Cli {
    /// JSON 配置文件
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// 数据库路径（覆盖配置与 FUEL_INTAKE_DB）
    #[arg(long, global = true)]
    db: Option<String>,

    /// 以 JSON 输出结果与日志
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 初始化数据库 schema
    InitDb,

    /// 导入单个实体种类
    Intake {
        kind: KindArg,

        /// CSV 文件（默认取配置中的文件名）
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// 按依赖顺序导入全部种类
    IntakeAll,

    /// 执行读侧报表查询
    Report {
        #[arg(long, default_value = "Madrid")]
        province: String,

        #[arg(long, default_value_t = -3.703790, allow_hyphen_values = true)]
        lon: f64,

        #[arg(long, default_value_t = 40.416775, allow_hyphen_values = true)]
        lat: f64,

        #[arg(long, default_value_t = 10_000.0)]
        radius_m: f64,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum KindArg {
    Localities,
    Companies,
    LandStations,
    WaterStations,
}

impl From<KindArg> for EntityKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Localities => EntityKind::Locality,
            KindArg::Companies => EntityKind::Company,
            KindArg::LandStations => EntityKind::LandStation,
            KindArg::WaterStations => EntityKind::WaterStation,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.json);

    let mut config = IntakeConfig::load(cli.config.as_deref()).context("加载配置失败")?;
    if let Some(db) = cli.db {
        config.database_path = db;
        config.validate()?;
    }

    info!("燃油价格导入系统 v{}", fuel_price_intake::VERSION);
    info!("使用数据库: {}", config.database_path);

    match cli.command {
        Command::InitDb => {
            let conn = open_sqlite_connection(&config.database_path)
                .with_context(|| format!("无法打开数据库: {}", config.database_path))?;
            init_schema(&conn)?;
            info!("数据库 schema 已初始化");
        }
        Command::Intake { kind, file } => {
            let pipeline = IntakePipeline::open(config)?;
            let summary = pipeline.run(kind.into(), file.as_deref())?;
            print_summaries(&[summary], cli.json)?;
        }
        Command::IntakeAll => {
            let pipeline = IntakePipeline::open(config)?;
            let summaries = pipeline.run_all()?;
            print_summaries(&summaries, cli.json)?;
        }
        Command::Report {
            province,
            lon,
            lat,
            radius_m,
        } => {
            let repo = ReportRepository::new(&config.database_path)?;
            let report = json!({
                "top_company_land": repo.company_with_most_stations(StationTable::Land)?,
                "top_company_water": repo.company_with_most_stations(StationTable::Water)?,
                "cheapest_95e5_in_province": repo.cheapest_land_95e5_in_province(&province)?,
                "cheapest_diesel_within_radius": repo.cheapest_land_diesel_within(lon, lat, radius_m)?,
                "most_expensive_water_95e5": repo.most_expensive_water_95e5()?,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}

fn print_summaries(summaries: &[IntakeSummary], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(summaries)?);
        return Ok(());
    }

    for s in summaries {
        println!(
            "{:<14} rows={:<6} inserted={:<6} updated={:<6} unresolved_companies={} ({} ms)",
            s.kind.to_string(),
            s.total_rows,
            s.entities.inserted,
            s.entities.updated,
            s.unresolved_companies,
            s.elapsed_ms
        );
    }
    Ok(())
}
