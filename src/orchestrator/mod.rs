//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `app` - 应用入口
//! - 校验配置、加载查询列表
//! - 组装客户端、就绪检查和执行器
//! - 输出健康报告和原始数据
//!
//! ### `batch_executor` - 批量查询执行器
//! - 查询前确认仓库已完成索引
//! - 顺序提交每条查询，单条失败不影响整批
//!
//! ## 层次关系
//!
//! ```text
//! app
//!     ↓
//! batch_executor (处理 Vec<AnalysisQuerySpec>)
//!     ↓
//! services (能力层：readiness / decoder / health)
//!     ↓
//! clients (远程接口：CodeIndexApi)
//! ```

pub mod app;
pub mod batch_executor;

pub use app::App;
pub use batch_executor::QueryBatchExecutor;
