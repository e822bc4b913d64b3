//! 粒子特效模块
//!
//! ## 架构设计
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                    Particle Effect                       │
//! ├─────────────────────────────────────────────────────────┤
//! │  ParticleEffect（聚合控制器）                              │
//! │     - 按插入顺序广播 start/draw/completion                │
//! │     - 文本资产格式的保存与加载                             │
//! │     - 目录 / 图集两种精灵绑定方式                          │
//! │                                                          │
//! │  ParticleEmitter（单个发射器）                             │
//! │     - 延迟、时长、发射速率的生命周期管理                    │
//! │     - 自定界数据块的保存与解析                             │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 使用示例
//!
//! ```ignore
//! let mut effect = ParticleEffect::new();
//! effect.load("assets/explosion.p", "assets/particles")?;
//! effect.start();
//!
//! // 每帧
//! effect.draw(&mut batch, delta_time);
//! if effect.is_complete() {
//!     // 回收特效
//! }
//! ```

pub mod effect;
pub mod emitter;
pub mod values;

pub use effect::ParticleEffect;
pub use emitter::ParticleEmitter;
pub use values::{RangedValue, ScaledValue};
