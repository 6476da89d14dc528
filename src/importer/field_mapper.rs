// ==========================================
// 成员导入 - 字段映射器实现
// ==========================================
// 职责: 源表头 → members 字段映射 + 规范化
// 别名: 每个目标字段对应有序别名列表，靠前的别名优先
// ==========================================

use crate::domain::{MemberField, MemberRecord, SourceRow};
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::member_importer_trait::{
    DataCleaner as DataCleanerTrait, FieldMapper as FieldMapperTrait,
};
use tracing::debug;

/// 列映射: 目标字段 + 有序别名
#[derive(Debug, Clone, Copy)]
pub struct ColumnMapping {
    pub field: MemberField,
    pub labels: &'static [&'static str],
}

/// 교인 명부 표头映射表（别名按优先级排列）
pub const COLUMN_MAPPINGS: &[ColumnMapping] = &[
    ColumnMapping { field: MemberField::Name, labels: &["이름", "성명"] },
    ColumnMapping { field: MemberField::Phone, labels: &["휴대폰", "전화번호", "연락처"] },
    ColumnMapping { field: MemberField::Address, labels: &["주소", "현주소"] },
    ColumnMapping { field: MemberField::Gender, labels: &["성별"] },
    ColumnMapping { field: MemberField::BirthDate, labels: &["생년월일", "생일"] },
    ColumnMapping { field: MemberField::Baptized, labels: &["세례여부"] },
    ColumnMapping { field: MemberField::BaptizedType, labels: &["세례구분", "세례종류"] },
    ColumnMapping { field: MemberField::BaptismDate, labels: &["세례일"] },
    ColumnMapping { field: MemberField::RegistrationDate, labels: &["등록일", "등록일자"] },
    ColumnMapping { field: MemberField::DismissalDate, labels: &["제적일", "제적일자"] },
    ColumnMapping { field: MemberField::Deceased, labels: &["별세", "소천여부"] },
    ColumnMapping { field: MemberField::FaithHead, labels: &["신앙의 가장", "가장"] },
    ColumnMapping { field: MemberField::EnglishName, labels: &["영문이름", "영문명"] },
    ColumnMapping { field: MemberField::InfantBaptism, labels: &["유아세례"] },
    ColumnMapping { field: MemberField::Email, labels: &["이메일", "E-mail"] },
    ColumnMapping { field: MemberField::Occupation, labels: &["직업"] },
    ColumnMapping { field: MemberField::WorkPhone, labels: &["직장전화", "직장연락처"] },
    ColumnMapping { field: MemberField::ResidenceStartDate, labels: &["거주시작일", "입주일"] },
    ColumnMapping { field: MemberField::PreviousAddress, labels: &["이전주소", "전주소"] },
    ColumnMapping { field: MemberField::PreviousChurch, labels: &["이전교회", "전출석교회"] },
    ColumnMapping { field: MemberField::PreviousOffice, labels: &["이전직분", "전교회직분"] },
    ColumnMapping { field: MemberField::BaptismChurch, labels: &["세례교회"] },
    ColumnMapping { field: MemberField::BaptismYear, labels: &["세례년도", "세례연도"] },
    ColumnMapping { field: MemberField::BaptismPastor, labels: &["세례목사", "집례목사"] },
    ColumnMapping { field: MemberField::Education, labels: &["학력"] },
    ColumnMapping { field: MemberField::Career, labels: &["경력"] },
    ColumnMapping { field: MemberField::FaithLife, labels: &["신앙생활"] },
    ColumnMapping { field: MemberField::MarriageAnniversary, labels: &["결혼기념일"] },
    ColumnMapping { field: MemberField::StayPeriod, labels: &["체류기간"] },
    ColumnMapping { field: MemberField::Specialty, labels: &["특기", "전공"] },
    ColumnMapping { field: MemberField::ServiceHistory, labels: &["봉사내역", "봉사경력"] },
    ColumnMapping { field: MemberField::Active, labels: &["활동여부", "상태"] },
    ColumnMapping { field: MemberField::VisitDates, labels: &["심방일", "심방일자"] },
    ColumnMapping { field: MemberField::Notes, labels: &["비고", "메모"] },
];

/// 行的识别名（取 name 字段第一个非空白别名），用于失败明细
pub fn identifying_name(row: &SourceRow) -> Option<String> {
    COLUMN_MAPPINGS
        .iter()
        .find(|m| m.field == MemberField::Name)?
        .labels
        .iter()
        .find_map(|label| row.get_non_blank(label))
        .map(|value| value.as_text())
}

pub struct FieldMapper {
    cleaner: Box<dyn DataCleanerTrait>,
}

impl FieldMapper {
    pub fn new(cleaner: Box<dyn DataCleanerTrait>) -> Self {
        Self { cleaner }
    }
}

impl Default for FieldMapper {
    fn default() -> Self {
        Self::new(Box::new(DataCleaner::default()))
    }
}

impl FieldMapperTrait for FieldMapper {
    fn map_to_member(&self, row: &SourceRow) -> MemberRecord {
        let mut record = MemberRecord::new(row.row_number);

        for mapping in COLUMN_MAPPINGS {
            let mut present = mapping
                .labels
                .iter()
                .filter_map(|label| row.get_non_blank(label).map(|v| (*label, v)));

            let Some((label, value)) = present.next() else {
                continue;
            };
            for (shadowed, _) in present {
                debug!(
                    row_number = row.row_number,
                    field = %mapping.field,
                    used = label,
                    shadowed = shadowed,
                    "同一字段存在多个别名列，取优先别名"
                );
            }

            record.set(mapping.field, self.cleaner.normalize(mapping.field, value));
        }

        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CellValue, FieldValue};
    use chrono::NaiveDate;
    use std::collections::HashSet;

    fn mapper() -> FieldMapper {
        FieldMapper::new(Box::new(DataCleaner::new(
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        )))
    }

    fn row(cells: &[(&str, CellValue)]) -> SourceRow {
        let mut row = SourceRow::new(2);
        for (label, value) in cells {
            row.push(*label, value.clone());
        }
        row
    }

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    #[test]
    fn test_every_field_is_mapped_once() {
        let fields: HashSet<_> = COLUMN_MAPPINGS.iter().map(|m| m.field).collect();
        assert_eq!(fields.len(), COLUMN_MAPPINGS.len());
        assert_eq!(fields.len(), MemberField::ALL.len());

        let mut labels = HashSet::new();
        for m in COLUMN_MAPPINGS {
            for label in m.labels {
                assert!(labels.insert(*label), "表头重复: {}", label);
            }
        }
    }

    #[test]
    fn test_identifying_name() {
        let named = row(&[("이름", text("")), ("성명", text(" 김영희 "))]);
        assert_eq!(identifying_name(&named), Some("김영희".to_string()));
        assert_eq!(identifying_name(&row(&[("주소", text("서울"))])), None);
    }

    #[test]
    fn test_map_basic_row() {
        let record = mapper().map_to_member(&row(&[
            ("이름", text(" 홍길동 ")),
            ("휴대폰", text("010-1234-5678")),
            ("성별", text("여")),
            ("생년월일", text("1945. 4. 29")),
            ("별세", text("Y")),
        ]));

        assert_eq!(record.name(), Some("홍길동"));
        assert_eq!(record.phone(), Some("010-1234-5678"));
        assert_eq!(
            record.get(MemberField::Gender),
            Some(&FieldValue::Text("F".to_string()))
        );
        assert_eq!(
            record.get(MemberField::BirthDate),
            Some(&FieldValue::Date(NaiveDate::from_ymd_opt(1945, 4, 29).unwrap()))
        );
        assert_eq!(record.get(MemberField::Deceased), Some(&FieldValue::Bool(true)));
    }

    #[test]
    fn test_blank_and_missing_columns_are_untouched() {
        let record = mapper().map_to_member(&row(&[
            ("이름", text("홍길동")),
            ("주소", text("   ")),
            ("알수없는열", text("무시")),
        ]));

        assert!(record.contains(MemberField::Name));
        assert!(!record.contains(MemberField::Address));
        assert_eq!(record.fields.len(), 1);
    }

    #[test]
    fn test_unparseable_date_is_touched_as_null() {
        let record = mapper().map_to_member(&row(&[
            ("이름", text("홍길동")),
            ("생년월일", text("1950")),
        ]));
        assert_eq!(record.get(MemberField::BirthDate), Some(&FieldValue::Null));
    }

    #[test]
    fn test_first_alias_wins() {
        let record = mapper().map_to_member(&row(&[
            ("연락처", text("010-3333-3333")),
            ("휴대폰", text("010-1111-1111")),
            ("이름", text("홍길동")),
        ]));
        assert_eq!(record.phone(), Some("010-1111-1111"));
    }

    #[test]
    fn test_blank_primary_alias_falls_back() {
        let record = mapper().map_to_member(&row(&[
            ("이름", text("")),
            ("성명", text("김영희")),
        ]));
        assert_eq!(record.name(), Some("김영희"));
    }
}
