//! # indexlens-chart
//!
//! 基于 plotters 的 K 线图与面积图渲染。

pub mod error;
pub mod kind;
pub mod render;
