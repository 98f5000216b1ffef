// crates/gw_io/src/reach_csv.rs

//! 河段表 CSV 导入
//!
//! 首行为表头，按列名定位 `layer,row,col,seg,reach,length`，列顺序任意，
//! 多余的列忽略。层、行、列为一基编号，读入后转换为零基 [`CellId`]。
//!
//! ```text
//! layer,row,col,seg,reach,length
//! 1,1,4,1,1,405.0
//! 1,2,4,1,2,403.0
//! ```

use std::path::Path;

use gw_foundation::error::{GwError, GwResult};
use gw_foundation::CellId;
use gw_topology::stream::{Reach, ReachTable};

use crate::array_text::read_file;

const REQUIRED_COLUMNS: [&str; 5] = ["layer", "row", "col", "seg", "length"];

/// 列位置
#[derive(Debug, Clone, Copy)]
struct Columns {
    layer: usize,
    row: usize,
    col: usize,
    seg: usize,
    reach: Option<usize>,
    length: usize,
}

impl Columns {
    fn from_header(header: &str, file: &Path) -> GwResult<Self> {
        let names: Vec<String> = header
            .split(',')
            .map(|s| s.trim().trim_matches('"').to_ascii_lowercase())
            .collect();
        let find = |name: &str| names.iter().position(|n| n == name);

        for name in REQUIRED_COLUMNS {
            if find(name).is_none() {
                return Err(GwError::parse(file, 1, format!("表头缺少列 '{}'", name)));
            }
        }
        let lookup = |name: &str| find(name).unwrap_or_default();
        Ok(Self {
            layer: lookup("layer"),
            row: lookup("row"),
            col: lookup("col"),
            seg: lookup("seg"),
            reach: find("reach"),
            length: lookup("length"),
        })
    }

    fn max_index(&self) -> usize {
        [self.layer, self.row, self.col, self.seg, self.length]
            .into_iter()
            .chain(self.reach)
            .max()
            .unwrap_or_default()
    }
}

/// 从 CSV 文件加载河段表
pub fn load_reach_table(path: &Path) -> GwResult<ReachTable> {
    let content = read_file(path)?;
    parse_reach_csv(&content, Some(path))
}

/// 从字符串解析河段表
///
/// 空行和以 `#` 开头的行跳过。`reach` 列存在时应在每个 segment 内从 1 连续编号，
/// 不连续时只记录警告，河段顺序仍以行序为准。
pub fn parse_reach_csv(content: &str, path: Option<&Path>) -> GwResult<ReachTable> {
    let file = path.map(|p| p.to_path_buf()).unwrap_or_default();
    let mut lines = content
        .lines()
        .enumerate()
        .filter(|(_, l)| !l.trim().is_empty() && !l.trim_start().starts_with('#'));

    let Some((_, header)) = lines.next() else {
        return Err(GwError::invalid_input(format!("{}: 河段表为空", file.display())));
    };
    let columns = Columns::from_header(header, &file)?;

    let mut reaches = Vec::new();
    let mut previous: Option<(u32, usize)> = None;

    for (line_num, line) in lines {
        let line_no = line_num + 1;
        let parts: Vec<&str> = line.split(',').map(str::trim).collect();
        if parts.len() <= columns.max_index() {
            return Err(GwError::parse(
                &file,
                line_no,
                format!("列数不足: 期望至少 {}, 实际 {}", columns.max_index() + 1, parts.len()),
            ));
        }

        let int = |idx: usize, name: &str| -> GwResult<usize> {
            parts[idx].parse::<usize>().map_err(|_| {
                GwError::parse(&file, line_no, format!("{} 不是非负整数: '{}'", name, parts[idx]))
            })
        };

        let (layer, row, col) = (int(columns.layer, "layer")?, int(columns.row, "row")?, int(columns.col, "col")?);
        let cell = CellId::from_one_based(layer, row, col).ok_or_else(|| {
            GwError::parse(&file, line_no, format!("一基单元编号不能为 0: ({}, {}, {})", layer, row, col))
        })?;

        let segment = u32::try_from(int(columns.seg, "seg")?)
            .map_err(|_| GwError::parse(&file, line_no, "seg 超出范围"))?;

        let length = parts[columns.length].parse::<f64>().map_err(|_| {
            GwError::parse(&file, line_no, format!("length 不是数值: '{}'", parts[columns.length]))
        })?;

        if let Some(idx) = columns.reach {
            let reach = int(idx, "reach")?;
            let expected = match previous {
                Some((seg, n)) if seg == segment => n + 1,
                _ => 1,
            };
            if reach != expected {
                log::warn!(
                    "{}:{}: segment {} 的 reach 编号为 {}，期望 {}",
                    file.display(),
                    line_no,
                    segment,
                    reach,
                    expected
                );
            }
            previous = Some((segment, expected));
        }

        reaches.push(Reach::new(segment, cell, length));
    }

    if reaches.is_empty() {
        return Err(GwError::invalid_input(format!("{}: 河段表没有数据行", file.display())));
    }

    log::debug!("{}: 读取 {} 个河段", file.display(), reaches.len());
    Ok(ReachTable::new(reaches))
}
