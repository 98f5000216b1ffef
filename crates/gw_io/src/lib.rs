// crates/gw_io/src/lib.rs

//! GwLink IO 模块
//!
//! 读取构建器需要的表格输入，并导出构建结果。
//!
//! # 模块
//!
//! - [`array_text`]: 空白分隔的二维数组文本（湖泊归属网格、活动域）
//! - [`reach_csv`]: 河段表 CSV
//! - [`export`]: JSON 记录导出

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod array_text;
pub mod export;
pub mod reach_csv;

pub use array_text::{load_idomain, load_int_array_2d, parse_array_2d};
pub use export::write_json;
pub use reach_csv::{load_reach_table, parse_reach_csv};
