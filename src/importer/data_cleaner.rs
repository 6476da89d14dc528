// ==========================================
// 成员导入 - 数据清洗器实现
// ==========================================
// 职责: 单元格值 → 规范化字段值
// 覆盖: 日期 / 布尔 / 性别 / 심방일 列表 / 文本
// ==========================================

use crate::domain::{CellValue, DateRule, Gender};
use crate::importer::member_importer_trait::DataCleaner as DataCleanerTrait;
use chrono::{Datelike, Days, Local, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

// Excel 序列日期基准（1900 闰年缺陷已计入）
const EXCEL_EPOCH: (i32, u32, u32) = (1899, 12, 30);

/// 真值词表（比较前统一 TRIM + 大写）
const TRUTHY_VALUES: [&str; 6] = ["TRUE", "1", "Y", "예", "활성", "O"];

// "1945. 4. 29" / "1945.4.29."
static DOTTED_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})\.\s*(\d{1,2})\.\s*(\d{1,2})\.?$").unwrap());
// "1945-4-29" / "1945/04/29"
static DASHED_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})[-/](\d{1,2})[-/](\d{1,2})$").unwrap());
static BARE_YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{4})$").unwrap());
// "4.29"
static MONTH_DAY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2})\.\s*(\d{1,2})\.?$").unwrap());

pub struct DataCleaner {
    /// 裸月日（M.D）按此日期所在年份解释
    today: NaiveDate,
}

impl DataCleaner {
    pub fn new(today: NaiveDate) -> Self {
        Self { today }
    }
}

impl Default for DataCleaner {
    fn default() -> Self {
        Self::new(Local::now().date_naive())
    }
}

/// Excel 序列日期 → 日期（小数部分为时间，舍去）
pub fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    let (y, m, d) = EXCEL_EPOCH;
    NaiveDate::from_ymd_opt(y, m, d)?.checked_add_days(Days::new(serial.floor() as u64))
}

fn ymd_from_captures(caps: &regex::Captures<'_>) -> Option<NaiveDate> {
    let year: i32 = caps.get(1)?.as_str().parse().ok()?;
    let month: u32 = caps.get(2)?.as_str().parse().ok()?;
    let day: u32 = caps.get(3)?.as_str().parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// 解析 YYYY-M-D / YYYY/M/D
fn parse_dashed(text: &str) -> Option<NaiveDate> {
    DASHED_DATE
        .captures(text)
        .and_then(|caps| ymd_from_captures(&caps))
}

impl DataCleanerTrait for DataCleaner {
    fn clean_text(&self, value: &CellValue) -> Option<String> {
        let text = value.as_text();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }

    fn normalize_date(&self, value: &CellValue, rule: DateRule) -> Option<NaiveDate> {
        let text = match value {
            CellValue::Number(serial) => return excel_serial_to_date(*serial),
            CellValue::Text(s) => s.trim(),
            _ => return None,
        };

        if let Some(caps) = DOTTED_DATE.captures(text) {
            return ymd_from_captures(&caps);
        }
        if let Some(date) = parse_dashed(text) {
            return Some(date);
        }
        if let Some(caps) = BARE_YEAR.captures(text) {
            // 裸年份对生日等字段精度不足，仅登记类字段接受
            if rule != DateRule::AllowBareYear {
                return None;
            }
            let year: i32 = caps.get(1)?.as_str().parse().ok()?;
            return NaiveDate::from_ymd_opt(year, 1, 1);
        }
        if let Some(caps) = MONTH_DAY.captures(text) {
            if rule != DateRule::AllowMonthDay {
                return None;
            }
            let month: u32 = caps.get(1)?.as_str().parse().ok()?;
            let day: u32 = caps.get(2)?.as_str().parse().ok()?;
            return NaiveDate::from_ymd_opt(self.today.year(), month, day);
        }

        None
    }

    fn normalize_bool(&self, value: &CellValue) -> bool {
        match value {
            CellValue::Bool(b) => *b,
            CellValue::Empty => false,
            other => {
                let upper = other.as_text().to_uppercase();
                TRUTHY_VALUES.contains(&upper.as_str())
            }
        }
    }

    fn normalize_gender(&self, value: &CellValue) -> Option<Gender> {
        let upper = value.as_text().to_uppercase();
        match upper.as_str() {
            "남" | "남성" | "M" | "MALE" => Some(Gender::Male),
            "여" | "여성" | "F" | "FEMALE" => Some(Gender::Female),
            _ => None,
        }
    }

    fn normalize_visit_dates(&self, value: &CellValue) -> Option<String> {
        let raw = value.as_text();
        let dates: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(|entry| {
                let parsed = match entry.parse::<f64>() {
                    Ok(serial) => excel_serial_to_date(serial),
                    Err(_) => parse_dashed(entry),
                };
                // 无法识别的条目原样保留
                parsed
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_else(|| entry.to_string())
            })
            .collect();

        if dates.is_empty() {
            return None;
        }
        serde_json::to_string(&dates).ok()
    }
}
