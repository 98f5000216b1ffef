// crates/gw_io/src/array_text.rs

//! 文本二维数组读取
//!
//! 每行一个网格行，数值以空白分隔；`#` 之后的内容视为注释，空行跳过。
//! 所有行的数值个数必须相同。

use std::path::Path;
use std::str::FromStr;

use gw_foundation::{ensure, require};
use gw_foundation::error::{GwError, GwResult};
use gw_topology::grid::{Grid2, IDomain};

/// 读取整数二维数组（湖泊归属网格、活动域）
pub fn load_int_array_2d(path: &Path) -> GwResult<Grid2<i32>> {
    let content = read_file(path)?;
    parse_array_2d(&content, Some(path))
}

/// 读取单层活动域并复制到 `nlay` 层，形状必须为 (nrow, ncol)
pub fn load_idomain(path: &Path, shape: (usize, usize, usize)) -> GwResult<IDomain> {
    let (nlay, nrow, ncol) = shape;
    let layer = load_int_array_2d(path)?;
    ensure!(
        layer.shape() == (nrow, ncol),
        GwError::invalid_input(format!(
            "{}: 活动域形状 {:?} 与网格 {:?} 不一致",
            path.display(),
            layer.shape(),
            (nrow, ncol)
        ))
    );
    Ok(IDomain::repeat_layer(nlay, &layer))
}

/// 从字符串解析二维数组
pub fn parse_array_2d<T: FromStr + Copy>(content: &str, path: Option<&Path>) -> GwResult<Grid2<T>> {
    let file = path.map(|p| p.to_path_buf()).unwrap_or_default();
    let mut data = Vec::new();
    let mut ncol: Option<usize> = None;
    let mut nrow = 0;

    for (line_num, line) in content.lines().enumerate() {
        let body = line.split('#').next().unwrap_or("").trim();
        if body.is_empty() {
            continue;
        }

        let mut n = 0;
        for token in body.split_whitespace() {
            let value = token.parse::<T>().map_err(|_| {
                GwError::parse(&file, line_num + 1, format!("无法解析数值 '{}'", token))
            })?;
            data.push(value);
            n += 1;
        }

        match ncol {
            None => ncol = Some(n),
            Some(expected) if expected != n => {
                return Err(GwError::parse(
                    &file,
                    line_num + 1,
                    format!("列数不一致: 期望 {}, 实际 {}", expected, n),
                ));
            }
            Some(_) => {}
        }
        nrow += 1;
    }

    let ncol = require!(
        ncol,
        GwError::invalid_input(format!("{}: 没有任何数据行", file.display()))
    );

    log::debug!("{}: 读取 {}x{} 数组", file.display(), nrow, ncol);
    Grid2::from_vec(nrow, ncol, data)
}

pub(crate) fn read_file(path: &Path) -> GwResult<String> {
    if !path.exists() {
        return Err(GwError::file_not_found(path));
    }
    std::fs::read_to_string(path).map_err(|e| {
        GwError::io_with_source(format!("读取 {} 失败", path.display()), e)
    })
}
