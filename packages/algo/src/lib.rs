//! # tutor-algo - 幼儿学习辅导核心算法库
//!
//! 本 crate 提供纯 Rust 实现的两个核心算法:
//!
//! - **Pronunciation Matcher** - 针对幼儿发音特点的分级模糊匹配
//! - **Adaptive Topic Selector** - "基础优先" 的加权随机出题
//!
//! ## 设计理念
//!
//! - **纯函数** - 无 I/O，无共享可变状态，可在任意请求中并行调用
//! - **可注入随机源** - 采样接受任意 `rand::Rng`，测试可固定种子
//! - **充分测试** - 所有规则都有单元测试与性质测试
//!
//! ## 模块结构
//!
//! - [`pronunciation`] - 发音匹配级联规则与幼儿发音词典
//! - [`similarity`] - 最长匹配块相似度 (Ratcliff/Obershelp)
//! - [`topics`] - 自适应主题选择与仪表盘前置推荐
//! - [`sanitize`] - 文本规范化与数值校验
//! - [`types`] - 公共类型和常量
//!
//! ## 使用示例
//!
//! ```rust
//! use tutor_algo::{match_pronunciation, MatchCategory, RewardTier, TopicSelector};
//!
//! let result = match_pronunciation("Red", "wed");
//! assert_eq!(result.category, MatchCategory::ToddlerMatch);
//! assert_eq!(RewardTier::from_score(result.score).stars(), 3);
//!
//! let selector = TopicSelector::default();
//! let topics = selector.recommend(&[], &mut rand::rng());
//! assert_eq!(topics.len(), 10);
//! ```

// ============================================================================
// 模块声明
// ============================================================================

pub mod pronunciation;
pub mod sanitize;
pub mod similarity;
pub mod topics;
pub mod types;

// ============================================================================
// 重新导出
// ============================================================================

/// 重新导出所有公共类型
pub use types::*;

/// 重新导出发音匹配
pub use pronunciation::{match_pronunciation, reward_for, toddler_substitution, toddler_variants};

/// 重新导出文本规范化
pub use sanitize::normalize_text;

/// 重新导出主题选择
pub use topics::{
    dashboard_recommendation, CompletedItems, CurriculumConfig, SelectionError, TopicSelector,
};
