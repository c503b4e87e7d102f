use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "indexlens")]
#[command(about = "股票指数行情查询与绘图", long_about = None)]
pub struct Cli {
    /// 配置文件路径（TOML），缺省读取当前目录下的 indexlens.toml
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 列出某个国家可查询的指数
    Indices {
        /// 国家：china / usa
        #[arg(long, default_value = "china")]
        country: String,
    },
    /// 查询指定日期的日线数据
    Query {
        /// 国家：china / usa
        #[arg(long, default_value = "china")]
        country: String,
        /// 指数代码，缺省为该国家的第一个指数
        #[arg(long)]
        index: Option<String>,
        /// 日期 (YYYY-MM-DD)
        #[arg(long)]
        date: String,
    },
    /// 抓取整年周线并绘制图表
    Plot {
        /// 国家：china / usa
        #[arg(long, default_value = "china")]
        country: String,
        /// 指数代码，缺省为该国家的第一个指数
        #[arg(long)]
        index: Option<String>,
        /// 年份 (YYYY)
        #[arg(long)]
        year: String,
        /// 图表类型：weekly / monthly / area
        #[arg(long, default_value = "weekly")]
        chart: String,
    },
}
