//! # indexlens-market
//!
//! 年度周线聚合、有序 K 线序列与月线重采样。

pub mod annual;
pub mod resample;
pub mod series;
