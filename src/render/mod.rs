//! 渲染侧数据结构
//!
//! 只包含 CPU 侧的批次收集；GPU 管线由宿主引擎提供。

pub mod sprite_batch;

pub use sprite_batch::{SpriteBatch, SpriteInstance};
