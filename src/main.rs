// ==========================================
// 八字排盘引擎 - 命令行入口
// ==========================================
// 子命令:
//   calc              排盘，JSON 输出到 stdout
//   history list      历史摘要
//   history show <id> 历史详情
//   history delete <id>
// 日志输出到 stderr
// ==========================================

use anyhow::{Context, Result};
use bazi_engine::api::{BaziApi, CalculateOptions};
use bazi_engine::domain::{BirthLocation, Gender, UserInput};
use bazi_engine::{export, logging};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;

/// 数据库路径环境变量
const DB_PATH_ENV: &str = "BAZI_ENGINE_DB_PATH";

#[derive(Parser, Debug)]
#[command(name = "bazi-engine", version)]
#[command(about = "四柱八字排盘与运势评分")]
struct Cli {
    /// 数据库文件路径（默认: $BAZI_ENGINE_DB_PATH 或用户数据目录）
    #[arg(long, global = true)]
    db: Option<String>,

    /// 以 JSON 行格式输出日志
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 排盘
    Calc(CalcArgs),

    /// 历史记录
    #[command(subcommand)]
    History(HistoryCommand),
}

#[derive(Args, Debug)]
struct CalcArgs {
    /// 姓名
    #[arg(long)]
    name: String,

    /// 性别: male / female（或 男 / 女）
    #[arg(long)]
    gender: Gender,

    /// 出生日期 YYYY-MM-DD
    #[arg(long)]
    date: String,

    /// 出生时间 HH:mm
    #[arg(long)]
    time: String,

    /// 日期为农历
    #[arg(long)]
    lunar: bool,

    /// 按出生地经度做真太阳时校正（需同时给出 --longitude）
    #[arg(long)]
    solar_time: bool,

    /// 出生地经度（东经为正）
    #[arg(long, allow_hyphen_values = true)]
    longitude: Option<f64>,

    /// 出生地纬度
    #[arg(long, allow_hyphen_values = true, default_value_t = 0.0)]
    latitude: f64,

    #[arg(long, default_value = "")]
    province: String,

    #[arg(long, default_value = "")]
    city: String,

    /// 固定随机种子（结果可复现）
    #[arg(long)]
    seed: Option<u64>,

    /// 保存到历史记录
    #[arg(long)]
    save: bool,

    /// 将大运与流年导出为 CSV 到该目录
    #[arg(long)]
    csv: Option<PathBuf>,

    /// 格式化 JSON 输出
    #[arg(long)]
    pretty: bool,
}

#[derive(Subcommand, Debug)]
enum HistoryCommand {
    /// 列出最近记录
    List {
        #[arg(long)]
        limit: Option<usize>,
    },
    /// 查看一条记录
    Show {
        id: String,
        #[arg(long)]
        pretty: bool,
    },
    /// 删除一条记录
    Delete { id: String },
}

impl CalcArgs {
    fn to_input(&self) -> UserInput {
        UserInput {
            name: self.name.clone(),
            gender: self.gender,
            birth_date: self.date.clone(),
            birth_time: self.time.clone(),
            is_lunar: self.lunar,
            use_solar_time: self.solar_time,
            birth_location: self.longitude.map(|longitude| BirthLocation {
                longitude,
                latitude: self.latitude,
                province: self.province.clone(),
                city: self.city.clone(),
                area: None,
            }),
        }
    }
}

/// 默认数据库路径: 环境变量 > 用户数据目录 > 当前目录
fn get_default_db_path() -> String {
    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./bazi_engine.db");
    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("bazi-engine");
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("bazi_engine.db");
        }
    }
    path.to_string_lossy().to_string()
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", text);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    if cli.log_json {
        logging::init_json();
    } else {
        logging::init();
    }

    let db_path = cli.db.clone().unwrap_or_else(get_default_db_path);
    tracing::debug!(db_path = %db_path, version = bazi_engine::VERSION, "启动");
    let api = BaziApi::from_db_path(&db_path)
        .with_context(|| format!("无法打开数据库 {}", db_path))?;

    match cli.command {
        Command::Calc(args) => {
            let input = args.to_input();
            let response = api.calculate(
                &input,
                CalculateOptions {
                    seed: args.seed,
                    save: args.save,
                },
            )?;
            if let Some(dir) = &args.csv {
                let (luck, yearly) = export::export_report_csv(&response.report, dir)
                    .with_context(|| format!("导出 CSV 失败: {}", dir.display()))?;
                tracing::info!(luck = %luck.display(), yearly = %yearly.display(), "CSV 已导出");
            }
            print_json(&response, args.pretty)?;
        }
        Command::History(HistoryCommand::List { limit }) => {
            print_json(&api.list_history(limit)?, false)?;
        }
        Command::History(HistoryCommand::Show { id, pretty }) => {
            print_json(&api.get_history(&id)?, pretty)?;
        }
        Command::History(HistoryCommand::Delete { id }) => {
            api.delete_history(&id)?;
            print_json(&serde_json::json!({ "deleted": id }), false)?;
        }
    }
    Ok(())
}
