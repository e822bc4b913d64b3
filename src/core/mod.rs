//! 核心模块
//!
//! 提供错误类型等跨模块的基础设施。

pub mod error;

pub use error::{EffectError, EffectResult};
