//! 纹理图集
//!
//! 解析 TexturePacker 风格的 JSON 描述（frames 可以是对象或数组），
//! 按名字创建预打包的精灵。

use std::collections::HashMap;
use std::sync::Arc;

use glam::Vec2;
use serde::Deserialize;

use crate::core::error::{EffectError, EffectResult};
use crate::resources::texture::{Sprite, Texture};

#[derive(Debug, Deserialize)]
struct AtlasMetaSize {
    w: u32,
    h: u32,
}

#[derive(Debug, Deserialize)]
struct AtlasMeta {
    size: AtlasMetaSize,
}

#[derive(Debug, Deserialize)]
struct FrameRect {
    x: u32,
    y: u32,
    w: u32,
    h: u32,
}

#[derive(Debug, Deserialize)]
struct FrameEntry {
    frame: FrameRect,
}

#[derive(Debug, Deserialize)]
struct ArrayFrameEntry {
    filename: String,
    frame: FrameRect,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Frames {
    Map(HashMap<String, FrameEntry>),
    Array(Vec<ArrayFrameEntry>),
}

#[derive(Debug, Deserialize)]
struct AtlasFile {
    frames: Frames,
    meta: AtlasMeta,
}

/// 图集中的一个区域
#[derive(Clone, Debug)]
struct AtlasRegion {
    uv_offset: [f32; 2],
    uv_scale: [f32; 2],
    size: Vec2,
}

/// 纹理图集
#[derive(Clone, Debug, Default)]
pub struct TextureAtlas {
    /// 图集页面尺寸（像素）
    pub size: [u32; 2],
    regions: HashMap<String, AtlasRegion>,
    texture: Option<Arc<Texture>>,
}

impl TextureAtlas {
    /// 从 TexturePacker 风格的 JSON 解析图集
    pub fn from_json(data: &str) -> EffectResult<Self> {
        let file: AtlasFile = serde_json::from_str(data)
            .map_err(|e| EffectError::Parse(format!("invalid atlas json: {}", e)))?;

        let mut atlas = Self {
            size: [file.meta.size.w, file.meta.size.h],
            regions: HashMap::new(),
            texture: None,
        };
        match file.frames {
            Frames::Map(map) => {
                for (name, entry) in map {
                    atlas.insert_region(&name, entry.frame.x, entry.frame.y, entry.frame.w, entry.frame.h);
                }
            }
            Frames::Array(entries) => {
                for entry in entries {
                    atlas.insert_region(
                        &entry.filename,
                        entry.frame.x,
                        entry.frame.y,
                        entry.frame.w,
                        entry.frame.h,
                    );
                }
            }
        }
        Ok(atlas)
    }

    /// 以程序方式构建图集（主要用于测试和工具）
    pub fn with_size(width: u32, height: u32) -> Self {
        Self {
            size: [width, height],
            regions: HashMap::new(),
            texture: None,
        }
    }

    /// 绑定图集页面纹理
    pub fn set_texture(&mut self, texture: Texture) {
        self.texture = Some(Arc::new(texture));
    }

    /// 注册一个区域（像素矩形）
    pub fn insert_region(&mut self, name: &str, x: u32, y: u32, w: u32, h: u32) {
        let page_w = if self.size[0] == 0 { 1.0 } else { self.size[0] as f32 };
        let page_h = if self.size[1] == 0 { 1.0 } else { self.size[1] as f32 };
        self.regions.insert(
            name.to_string(),
            AtlasRegion {
                uv_offset: [x as f32 / page_w, y as f32 / page_h],
                uv_scale: [w as f32 / page_w, h as f32 / page_h],
                size: Vec2::new(w as f32, h as f32),
            },
        );
    }

    /// 按名字创建精灵；图集中不存在时返回 `None`
    pub fn create_sprite(&self, name: &str) -> Option<Sprite> {
        self.regions.get(name).map(|region| Sprite {
            texture: self.texture.clone(),
            uv_offset: region.uv_offset,
            uv_scale: region.uv_scale,
            size: region.size,
        })
    }

    /// 区域数量
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}
