//! # Particle Effect
//!
//! A 2D particle effect system with a text-based asset format, built with Rust.
//!
//! ## Features
//!
//! - **Emitter Aggregation**: A `ParticleEffect` owns an ordered set of emitters
//!   and broadcasts start/draw/positioning to all of them
//! - **Text Asset Format**: Line-based effect descriptors that round-trip
//!   byte-identically through save and load
//! - **Image Binding**: Sprites resolved either from a directory of loose
//!   images or from a TexturePacker-style texture atlas
//! - **Injectable Texture Loading**: Swap the texture backend (or a test stub)
//!   without touching load logic
//!
//! ## Modules
//!
//! - [`core`]: Error types shared across the crate
//! - [`particles`]: Effect aggregate, emitters and their property values
//! - [`render`]: CPU-side sprite batch consumed by effect drawing
//! - [`resources`]: Texture decoding, sprites and atlas lookup

/// Core functionality: unified error handling
pub mod core;
/// Particle effect aggregate and emitters
pub mod particles;
/// CPU-side render data structures
pub mod render;
/// Texture, sprite and atlas resources
pub mod resources;

pub use crate::core::{EffectError, EffectResult};
pub use particles::{ParticleEffect, ParticleEmitter};
pub use render::{SpriteBatch, SpriteInstance};
pub use resources::{FileTextureLoader, Sprite, Texture, TextureAtlas, TextureLoader};
