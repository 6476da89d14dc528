// ==========================================
// 成员导入 - 字段派生服务实现
// ==========================================
// 职责: 映射后的派生与必填处理
// 规则:
// - name 缺失 → 跳过该行
// - dismissal_date 有值 → active = false；否则未设置时 active = true
// - phone 缺失 → 占位电话
// - work_phone 超长 → 截断
// - baptized_type 有值且 baptized 未映射 → baptized = true
// ==========================================

use crate::config::ImportConfig;
use crate::domain::{FieldValue, MemberField, MemberRecord};
use crate::importer::error::RowError;
use crate::importer::member_importer_trait::DerivationService as DerivationServiceTrait;
use tracing::{debug, info};

pub struct DerivationService {
    default_phone: String,
    work_phone_max_len: usize,
}

impl DerivationService {
    pub fn new(default_phone: impl Into<String>, work_phone_max_len: usize) -> Self {
        Self {
            default_phone: default_phone.into(),
            work_phone_max_len,
        }
    }

    pub fn from_config(config: &ImportConfig) -> Self {
        Self::new(config.default_phone.clone(), config.work_phone_max_len)
    }

    fn derive_active(&self, record: &mut MemberRecord) {
        let dismissed = record
            .get(MemberField::DismissalDate)
            .and_then(FieldValue::as_date);

        if let Some(date) = dismissed {
            info!(
                row_number = record.row_number,
                name = record.name().unwrap_or("-"),
                dismissal_date = %date,
                "存在제적일，active 置为 false"
            );
            record.set(MemberField::Active, FieldValue::Bool(false));
        } else if !record.contains(MemberField::Active) {
            record.set(MemberField::Active, FieldValue::Bool(true));
        }
    }

    fn default_phone(&self, record: &mut MemberRecord) {
        if record.phone().is_none() {
            debug!(row_number = record.row_number, "电话缺失，使用占位电话");
            record.set(
                MemberField::Phone,
                FieldValue::Text(self.default_phone.clone()),
            );
        }
    }

    fn truncate_work_phone(&self, record: &mut MemberRecord) {
        let Some(work_phone) = record.text(MemberField::WorkPhone) else {
            return;
        };
        if work_phone.chars().count() <= self.work_phone_max_len {
            return;
        }

        let truncated: String = work_phone.chars().take(self.work_phone_max_len).collect();
        debug!(
            row_number = record.row_number,
            original = work_phone,
            truncated = %truncated,
            "work_phone 超长，已截断"
        );
        record.set(MemberField::WorkPhone, FieldValue::Text(truncated));
    }

    fn derive_baptized(&self, record: &mut MemberRecord) {
        if record.text(MemberField::BaptizedType).is_some() && !record.contains(MemberField::Baptized)
        {
            record.set(MemberField::Baptized, FieldValue::Bool(true));
        }
    }
}

impl DerivationServiceTrait for DerivationService {
    fn derive(&self, record: &mut MemberRecord) -> Result<(), RowError> {
        if record.name().is_none() {
            return Err(RowError::MissingName);
        }

        self.derive_active(record);
        self.default_phone(record);
        self.truncate_work_phone(record);
        self.derive_baptized(record);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn service() -> DerivationService {
        DerivationService::new("010-0000-0000", 5)
    }

    fn named(name: &str) -> MemberRecord {
        let mut record = MemberRecord::new(2);
        record.set(MemberField::Name, FieldValue::Text(name.to_string()));
        record
    }

    #[test]
    fn test_missing_name_is_rejected() {
        let mut record = MemberRecord::new(3);
        record.set(MemberField::Phone, FieldValue::Text("010-1".to_string()));
        assert!(matches!(
            service().derive(&mut record),
            Err(RowError::MissingName)
        ));
    }

    #[test]
    fn test_defaults() {
        let mut record = named("홍길동");
        service().derive(&mut record).unwrap();

        assert_eq!(record.phone(), Some("010-0000-0000"));
        assert_eq!(record.get(MemberField::Active), Some(&FieldValue::Bool(true)));
        assert!(!record.contains(MemberField::Baptized));
    }

    #[test]
    fn test_dismissal_forces_inactive() {
        let mut record = named("홍길동");
        record.set(MemberField::Active, FieldValue::Bool(true));
        record.set(
            MemberField::DismissalDate,
            FieldValue::Date(NaiveDate::from_ymd_opt(2010, 3, 1).unwrap()),
        );
        service().derive(&mut record).unwrap();

        assert_eq!(record.get(MemberField::Active), Some(&FieldValue::Bool(false)));
    }

    #[test]
    fn test_null_dismissal_keeps_mapped_active() {
        let mut record = named("홍길동");
        record.set(MemberField::DismissalDate, FieldValue::Null);
        record.set(MemberField::Active, FieldValue::Bool(false));
        service().derive(&mut record).unwrap();

        assert_eq!(record.get(MemberField::Active), Some(&FieldValue::Bool(false)));
    }

    #[test]
    fn test_work_phone_truncated_by_chars() {
        let mut record = named("홍길동");
        record.set(MemberField::WorkPhone, FieldValue::Text("02-123-4567".to_string()));
        service().derive(&mut record).unwrap();
        assert_eq!(record.text(MemberField::WorkPhone), Some("02-12"));

        let mut short = named("김철수");
        short.set(MemberField::WorkPhone, FieldValue::Text("1234".to_string()));
        service().derive(&mut short).unwrap();
        assert_eq!(short.text(MemberField::WorkPhone), Some("1234"));
    }

    #[test]
    fn test_baptized_derived_from_type() {
        let mut record = named("홍길동");
        record.set(MemberField::BaptizedType, FieldValue::Text("입교".to_string()));
        service().derive(&mut record).unwrap();
        assert_eq!(record.get(MemberField::Baptized), Some(&FieldValue::Bool(true)));

        let mut mapped = named("김철수");
        mapped.set(MemberField::BaptizedType, FieldValue::Text("입교".to_string()));
        mapped.set(MemberField::Baptized, FieldValue::Bool(false));
        service().derive(&mut mapped).unwrap();
        assert_eq!(mapped.get(MemberField::Baptized), Some(&FieldValue::Bool(false)));
    }
}
