//! # indexlens-core
//!
//! 指数行情领域核心：实体、日历换算、错误枚举、数据源端口与全局配置。
//! 本 crate 不发起任何网络请求，具体实现由 `indexlens-feed` 提供。

pub mod common;
pub mod config;
pub mod market;
