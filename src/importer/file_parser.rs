// ==========================================
// 成员导入 - 文件解析器实现
// ==========================================
// 支持: Excel (.xlsx/.xls) / CSV (.csv)
// 约定: 读取首个工作表，首行为表头；完全空白的数据行跳过
// ==========================================

use crate::domain::{CellValue, SourceRow};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::member_importer_trait::FileParser;
use calamine::{open_workbook_auto, Data, Reader};
use csv::ReaderBuilder;
use std::fs::File;
use std::path::Path;

/// 源文件必须存在且为普通文件
fn ensure_source_file(path: &Path) -> ImportResult<()> {
    if !path.is_file() {
        return Err(ImportError::SourceNotFound(path.display().to_string()));
    }
    Ok(())
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse_to_source_rows(&self, file_path: &Path) -> ImportResult<Vec<SourceRow>> {
        ensure_source_file(file_path)?;

        let ext = extension_of(file_path);
        if ext != "csv" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let file = File::open(file_path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(file);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().trim_start_matches('\u{feff}').to_string())
            .collect();

        let mut rows = Vec::new();
        for (idx, result) in reader.records().enumerate() {
            let record = result?;
            // 表头为第 1 行
            let mut row = SourceRow::new(idx + 2);

            for (col_idx, value) in record.iter().enumerate() {
                if let Some(header) = headers.get(col_idx) {
                    let value = value.trim();
                    let cell = if value.is_empty() {
                        CellValue::Empty
                    } else {
                        CellValue::Text(value.to_string())
                    };
                    row.push(header.clone(), cell);
                }
            }

            if row.is_blank() {
                continue;
            }
            rows.push(row);
        }

        Ok(rows)
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

/// calamine 单元格 → CellValue（日期单元格保留序列值）
fn to_cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        // ISO 日期时间仅保留日期部分
        Data::DateTimeIso(s) => CellValue::Text(s.split('T').next().unwrap_or("").to_string()),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(_) => CellValue::Empty,
    }
}

impl FileParser for ExcelParser {
    fn parse_to_source_rows(&self, file_path: &Path) -> ImportResult<Vec<SourceRow>> {
        ensure_source_file(file_path)?;

        let ext = extension_of(file_path);
        if ext != "xlsx" && ext != "xls" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let mut workbook = open_workbook_auto(file_path)?;

        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无工作表".to_string()))?;

        let range = workbook.worksheet_range(&sheet_name)?;
        let first_row = range.start().map(|(r, _)| r as usize).unwrap_or(0);

        let mut sheet_rows = range.rows();
        let Some(header_row) = sheet_rows.next() else {
            // 空工作表: 无数据行
            return Ok(Vec::new());
        };

        let headers: Vec<String> = header_row
            .iter()
            .map(|cell| cell.to_string().trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for (offset, data_row) in sheet_rows.enumerate() {
            // 工作表行号从 1 开始，表头占 first_row + 1
            let mut row = SourceRow::new(first_row + offset + 2);

            for (col_idx, cell) in data_row.iter().enumerate() {
                if let Some(header) = headers.get(col_idx) {
                    if header.is_empty() {
                        continue;
                    }
                    row.push(header.clone(), to_cell_value(cell));
                }
            }

            if row.is_blank() {
                continue;
            }
            rows.push(row);
        }

        Ok(rows)
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser;

impl FileParser for UniversalFileParser {
    fn parse_to_source_rows(&self, file_path: &Path) -> ImportResult<Vec<SourceRow>> {
        ensure_source_file(file_path)?;

        match extension_of(file_path).as_str() {
            "csv" => CsvParser.parse_to_source_rows(file_path),
            "xlsx" | "xls" => ExcelParser.parse_to_source_rows(file_path),
            other => Err(ImportError::UnsupportedFormat(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    fn csv_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
        write!(file, "{}", content).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_csv_parser_valid_file() {
        let file = csv_file("이름,휴대폰,주소\n홍길동,010-1234-5678,서울\n김영희,,부산\n");

        let rows = CsvParser.parse_to_source_rows(file.path()).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].row_number, 2);
        assert_eq!(
            rows[0].get("이름"),
            Some(&CellValue::Text("홍길동".to_string()))
        );
        assert_eq!(rows[1].get("휴대폰"), Some(&CellValue::Empty));
    }

    #[test]
    fn test_csv_parser_skip_blank_rows() {
        let file = csv_file("이름,휴대폰\n홍길동,010\n,\n김영희,011\n");

        let rows = CsvParser.parse_to_source_rows(file.path()).unwrap();

        assert_eq!(rows.len(), 2);
        // 行号保留原始位置
        assert_eq!(rows[1].row_number, 4);
    }

    #[test]
    fn test_csv_parser_strips_bom() {
        let file = csv_file("\u{feff}이름,휴대폰\n홍길동,010\n");
        let rows = CsvParser.parse_to_source_rows(file.path()).unwrap();
        assert!(rows[0].get("이름").is_some());
    }

    #[test]
    fn test_missing_file_is_source_not_found() {
        let result = UniversalFileParser.parse_to_source_rows(Path::new("no_such_members.xlsx"));
        assert!(matches!(result, Err(ImportError::SourceNotFound(_))));
    }

    #[test]
    fn test_unsupported_extension() {
        let file = Builder::new().suffix(".txt").tempfile().unwrap();
        let result = UniversalFileParser.parse_to_source_rows(file.path());
        assert!(matches!(result, Err(ImportError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_to_cell_value() {
        assert_eq!(to_cell_value(&Data::Int(3)), CellValue::Number(3.0));
        assert_eq!(
            to_cell_value(&Data::DateTimeIso("2020-01-02T00:00:00".to_string())),
            CellValue::Text("2020-01-02".to_string())
        );
        assert_eq!(to_cell_value(&Data::Empty), CellValue::Empty);
    }
}
