// crates/gw_io/src/export.rs

//! 记录导出
//!
//! 构建结果以 JSON 写出，供外部的模拟器配置层读取。

use std::io::{BufWriter, Write};
use std::path::Path;

use gw_foundation::error::{GwError, GwResult};
use serde::Serialize;

/// 将可序列化的值写为 JSON 文件，必要时创建父目录
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T, pretty: bool) -> GwResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| {
                GwError::io_with_source(format!("创建目录 {} 失败", parent.display()), e)
            })?;
        }
    }

    let file = std::fs::File::create(path)
        .map_err(|e| GwError::io_with_source(format!("创建 {} 失败", path.display()), e))?;
    let mut writer = BufWriter::new(file);

    let result = if pretty {
        serde_json::to_writer_pretty(&mut writer, value)
    } else {
        serde_json::to_writer(&mut writer, value)
    };
    result.map_err(|e| GwError::serialization(format!("{}: {}", path.display(), e)))?;

    writer
        .flush()
        .map_err(|e| GwError::io_with_source(format!("写入 {} 失败", path.display()), e))?;

    log::debug!("已写出 {}", path.display());
    Ok(())
}
