//! 纹理与精灵
//!
//! 纹理是解码后的 RGBA8 像素数据（GPU 上传由宿主引擎负责）。
//! 纹理加载通过 [`TextureLoader`] 注入，测试可以替换为桩实现，
//! 而不需要改动加载逻辑。

use std::path::Path;
use std::sync::Arc;

use glam::Vec2;

use crate::core::error::{EffectError, EffectResult};

/// 解码后的纹理
#[derive(Clone, Debug)]
pub struct Texture {
    pub width: u32,
    pub height: u32,
    /// RGBA8 像素，按行排列
    pub data: Vec<u8>,
}

impl Texture {
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            data,
        }
    }
}

/// 可绘制的精灵：一块纹理（或图集区域）加上纹理坐标
#[derive(Clone, Debug)]
pub struct Sprite {
    pub texture: Option<Arc<Texture>>,
    pub uv_offset: [f32; 2],
    pub uv_scale: [f32; 2],
    /// 像素尺寸
    pub size: Vec2,
}

impl Sprite {
    /// 把整张纹理包装为精灵
    pub fn from_texture(texture: Texture) -> Self {
        let size = Vec2::new(texture.width as f32, texture.height as f32);
        Self {
            texture: Some(Arc::new(texture)),
            uv_offset: [0.0, 0.0],
            uv_scale: [1.0, 1.0],
            size,
        }
    }

    /// 应用翻转后的纹理坐标
    pub fn uv_flipped(&self, flip_x: bool, flip_y: bool) -> ([f32; 2], [f32; 2]) {
        let mut offset = self.uv_offset;
        let mut scale = self.uv_scale;
        if flip_x {
            offset[0] += scale[0];
            scale[0] = -scale[0];
        }
        if flip_y {
            offset[1] += scale[1];
            scale[1] = -scale[1];
        }
        (offset, scale)
    }
}

/// 纹理加载钩子
///
/// 目录式图片绑定通过该 trait 读取纹理，替换实现即可接入
/// 其他后端（嵌入资源、网络、测试桩）。
pub trait TextureLoader {
    fn load_texture(&self, path: &Path) -> EffectResult<Texture>;
}

/// 默认实现：从文件系统读取并用 `image` 解码
#[derive(Debug, Default)]
pub struct FileTextureLoader;

impl TextureLoader for FileTextureLoader {
    fn load_texture(&self, path: &Path) -> EffectResult<Texture> {
        let bytes = std::fs::read(path).map_err(|e| EffectError::TextureFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let img = image::load_from_memory(&bytes)
            .map_err(|e| EffectError::TextureFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?
            .to_rgba8();
        let (width, height) = img.dimensions();
        Ok(Texture::new(width, height, img.into_raw()))
    }
}
