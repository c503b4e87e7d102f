//! # indexlens-feed
//!
//! 东方财富历史 K 线接口的数据源实现。

pub mod eastmoney;
