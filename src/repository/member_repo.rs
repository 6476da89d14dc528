// ==========================================
// 成员导入 - 成员 Repository Trait
// ==========================================
// 职责: 定义成员落库相关数据访问接口（不包含业务逻辑）
// 红线: 只做插入与查询，不更新/删除已有成员
// ==========================================

use crate::domain::{ImportBatch, MemberRecord};
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;

// ==========================================
// MemberRepository Trait
// ==========================================
// 实现者: MemberRepositoryImpl（使用 rusqlite）
#[async_trait]
pub trait MemberRepository: Send + Sync {
    /// 查询是否已存在相同 (name, phone) 的成员
    async fn exists_by_name_and_phone(&self, name: &str, phone: &str) -> RepositoryResult<bool>;

    /// 稀疏插入成员记录（只写入记录中已填充的字段）
    ///
    /// # 返回
    /// - Ok(i64): 新行 id
    async fn insert_member(&self, record: &MemberRecord) -> RepositoryResult<i64>;

    /// 写入导入批次审计记录
    async fn insert_batch(&self, batch: &ImportBatch) -> RepositoryResult<()>;

    /// 成员总数
    async fn count_members(&self) -> RepositoryResult<i64>;
}
