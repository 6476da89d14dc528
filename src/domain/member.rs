// ==========================================
// 成员导入 - 成员领域模型
// ==========================================
// 用途: 导入层写入 members 表的规范化记录
// 对齐: db.rs members 表结构
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ==========================================
// MemberField - members 表目标字段
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MemberField {
    Name,
    Phone,
    Address,
    Gender,
    BirthDate,
    Baptized,
    BaptizedType,
    BaptismDate,
    RegistrationDate,
    DismissalDate,
    Deceased,
    FaithHead,
    EnglishName,
    InfantBaptism,
    Email,
    Occupation,
    WorkPhone,
    ResidenceStartDate,
    PreviousAddress,
    PreviousChurch,
    PreviousOffice,
    BaptismChurch,
    BaptismYear,
    BaptismPastor,
    Education,
    Career,
    FaithLife,
    MarriageAnniversary,
    StayPeriod,
    Specialty,
    ServiceHistory,
    Active,
    VisitDates,
    Notes,
}

// ==========================================
// FieldKind - 字段规范化类别
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Date(DateRule),
    Bool,
    Gender,
    VisitDates,
    Text,
}

/// 日期字段对不完整日期的容忍规则
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateRule {
    /// 仅接受完整日期
    Strict,
    /// 接受裸年份 YYYY（解释为 1 月 1 日）
    AllowBareYear,
    /// 接受裸月日 M.D（解释为当年）
    AllowMonthDay,
}

impl MemberField {
    pub const ALL: [MemberField; 34] = [
        MemberField::Name,
        MemberField::Phone,
        MemberField::Address,
        MemberField::Gender,
        MemberField::BirthDate,
        MemberField::Baptized,
        MemberField::BaptizedType,
        MemberField::BaptismDate,
        MemberField::RegistrationDate,
        MemberField::DismissalDate,
        MemberField::Deceased,
        MemberField::FaithHead,
        MemberField::EnglishName,
        MemberField::InfantBaptism,
        MemberField::Email,
        MemberField::Occupation,
        MemberField::WorkPhone,
        MemberField::ResidenceStartDate,
        MemberField::PreviousAddress,
        MemberField::PreviousChurch,
        MemberField::PreviousOffice,
        MemberField::BaptismChurch,
        MemberField::BaptismYear,
        MemberField::BaptismPastor,
        MemberField::Education,
        MemberField::Career,
        MemberField::FaithLife,
        MemberField::MarriageAnniversary,
        MemberField::StayPeriod,
        MemberField::Specialty,
        MemberField::ServiceHistory,
        MemberField::Active,
        MemberField::VisitDates,
        MemberField::Notes,
    ];

    /// members 表列名
    pub fn column_name(self) -> &'static str {
        match self {
            MemberField::Name => "name",
            MemberField::Phone => "phone",
            MemberField::Address => "address",
            MemberField::Gender => "gender",
            MemberField::BirthDate => "birth_date",
            MemberField::Baptized => "baptized",
            MemberField::BaptizedType => "baptized_type",
            MemberField::BaptismDate => "baptism_date",
            MemberField::RegistrationDate => "registration_date",
            MemberField::DismissalDate => "dismissal_date",
            MemberField::Deceased => "deceased",
            MemberField::FaithHead => "faith_head",
            MemberField::EnglishName => "english_name",
            MemberField::InfantBaptism => "infant_baptism",
            MemberField::Email => "email",
            MemberField::Occupation => "occupation",
            MemberField::WorkPhone => "work_phone",
            MemberField::ResidenceStartDate => "residence_start_date",
            MemberField::PreviousAddress => "previous_address",
            MemberField::PreviousChurch => "previous_church",
            MemberField::PreviousOffice => "previous_office",
            MemberField::BaptismChurch => "baptism_church",
            MemberField::BaptismYear => "baptism_year",
            MemberField::BaptismPastor => "baptism_pastor",
            MemberField::Education => "education",
            MemberField::Career => "career",
            MemberField::FaithLife => "faith_life",
            MemberField::MarriageAnniversary => "marriage_anniversary",
            MemberField::StayPeriod => "stay_period",
            MemberField::Specialty => "specialty",
            MemberField::ServiceHistory => "service_history",
            MemberField::Active => "active",
            MemberField::VisitDates => "visit_dates",
            MemberField::Notes => "notes",
        }
    }

    pub fn kind(self) -> FieldKind {
        match self {
            MemberField::RegistrationDate | MemberField::BaptismYear => {
                FieldKind::Date(DateRule::AllowBareYear)
            }
            MemberField::MarriageAnniversary => FieldKind::Date(DateRule::AllowMonthDay),
            MemberField::DismissalDate
            | MemberField::BirthDate
            | MemberField::ResidenceStartDate => FieldKind::Date(DateRule::Strict),
            MemberField::Active
            | MemberField::Deceased
            | MemberField::InfantBaptism
            | MemberField::Baptized => FieldKind::Bool,
            MemberField::Gender => FieldKind::Gender,
            MemberField::VisitDates => FieldKind::VisitDates,
            _ => FieldKind::Text,
        }
    }
}

impl fmt::Display for MemberField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

// ==========================================
// Gender - 性别
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn code(self) -> &'static str {
        match self {
            Gender::Male => "M",
            Gender::Female => "F",
        }
    }
}

// ==========================================
// FieldValue - 规范化后的字段值
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    Null,
    Text(String),
    Date(NaiveDate),
    Bool(bool),
}

impl FieldValue {
    /// 非空文本内容
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) if !s.trim().is_empty() => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            FieldValue::Date(d) => Some(*d),
            _ => None,
        }
    }
}

// ==========================================
// MemberRecord - 待落库的成员记录
// ==========================================
// 稀疏结构: 只包含映射实际触及的字段，落库时不写入未触及字段
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberRecord {
    pub row_number: usize,
    pub fields: BTreeMap<MemberField, FieldValue>,
}

impl MemberRecord {
    pub fn new(row_number: usize) -> Self {
        Self {
            row_number,
            fields: BTreeMap::new(),
        }
    }

    pub fn get(&self, field: MemberField) -> Option<&FieldValue> {
        self.fields.get(&field)
    }

    pub fn set(&mut self, field: MemberField, value: FieldValue) {
        self.fields.insert(field, value);
    }

    pub fn contains(&self, field: MemberField) -> bool {
        self.fields.contains_key(&field)
    }

    pub fn text(&self, field: MemberField) -> Option<&str> {
        self.get(field).and_then(FieldValue::as_text)
    }

    pub fn name(&self) -> Option<&str> {
        self.text(MemberField::Name)
    }

    pub fn phone(&self) -> Option<&str> {
        self.text(MemberField::Phone)
    }

    /// 已填充的字段（按列顺序）
    pub fn populated(&self) -> impl Iterator<Item = (&MemberField, &FieldValue)> {
        self.fields.iter()
    }
}
