// ==========================================
// 成员导入 - 数据仓储层
// ==========================================
// 职责: members / import_batch 表读写
// 红线: 不含业务规则
// ==========================================

pub mod error;
pub mod member_repo;
pub mod member_repo_impl;

pub use error::{RepositoryError, RepositoryResult};
pub use member_repo::MemberRepository;
pub use member_repo_impl::MemberRepositoryImpl;
