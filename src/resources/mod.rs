//! 资源管理
//!
//! 纹理解码、精灵包装和纹理图集查找。

pub mod atlas;
pub mod texture;

pub use atlas::TextureAtlas;
pub use texture::{FileTextureLoader, Sprite, Texture, TextureLoader};
