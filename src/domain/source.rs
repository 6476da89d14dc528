// ==========================================
// 成员导入 - 源数据行模型
// ==========================================
// 用途: 文件解析产物（表头 → 单元格值），导入流程内只读
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// CellValue - 单元格值
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Bool(bool),
    Empty,
}

impl CellValue {
    /// 空白判定（Empty 或 仅含空白字符的文本）
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// 转为去除首尾空白的文本表示
    ///
    /// 整数值的数字不带小数点（如电话号码 1012345678）
    pub fn as_text(&self) -> String {
        match self {
            CellValue::Text(s) => s.trim().to_string(),
            CellValue::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    n.to_string()
                }
            }
            CellValue::Bool(b) => b.to_string(),
            CellValue::Empty => String::new(),
        }
    }
}

// ==========================================
// SourceRow - 源数据行
// ==========================================
// 保留表头顺序；row_number 为工作表中的行号（表头为第 1 行）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRow {
    pub row_number: usize,
    pub cells: Vec<(String, CellValue)>,
}

impl SourceRow {
    pub fn new(row_number: usize) -> Self {
        Self {
            row_number,
            cells: Vec::new(),
        }
    }

    pub fn push(&mut self, label: impl Into<String>, value: CellValue) {
        self.cells.push((label.into(), value));
    }

    /// 按表头查找单元格（重复表头取第一个）
    pub fn get(&self, label: &str) -> Option<&CellValue> {
        self.cells
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, v)| v)
    }

    /// 按表头查找非空白单元格
    pub fn get_non_blank(&self, label: &str) -> Option<&CellValue> {
        self.get(label).filter(|v| !v.is_blank())
    }

    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|(_, v)| v.is_blank())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_as_text() {
        assert_eq!(CellValue::Text("  홍길동 ".to_string()).as_text(), "홍길동");
        assert_eq!(CellValue::Number(1012345678.0).as_text(), "1012345678");
        assert_eq!(CellValue::Number(2.5).as_text(), "2.5");
        assert_eq!(CellValue::Empty.as_text(), "");
    }

    #[test]
    fn test_row_lookup_skips_blank() {
        let mut row = SourceRow::new(2);
        row.push("이름", CellValue::Text("홍길동".to_string()));
        row.push("비고", CellValue::Text("   ".to_string()));

        assert!(row.get_non_blank("이름").is_some());
        assert!(row.get("비고").is_some());
        assert!(row.get_non_blank("비고").is_none());
        assert!(row.get("주소").is_none());
        assert!(!row.is_blank());
    }
}
