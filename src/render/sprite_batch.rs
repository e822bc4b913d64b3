//! 精灵批次
//!
//! CPU 侧的实例收集器：特效绘制把每个存活粒子追加为一个精灵实例，
//! 渲染后端（外部）在帧末把实例数据整体上传。

use glam::Vec2;

/// 精灵实例数据
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SpriteInstance {
    /// 位置 (x, y)
    pub position: [f32; 2],
    /// 大小 (width, height)
    pub size: [f32; 2],
    /// 纹理坐标偏移
    pub uv_offset: [f32; 2],
    /// 纹理坐标缩放
    pub uv_scale: [f32; 2],
    /// 颜色 (RGBA)
    pub color: [f32; 4],
}

impl SpriteInstance {
    /// 创建新的精灵实例
    pub fn new(
        position: Vec2,
        size: Vec2,
        uv_offset: [f32; 2],
        uv_scale: [f32; 2],
        color: [f32; 4],
    ) -> Self {
        Self {
            position: position.to_array(),
            size: size.to_array(),
            uv_offset,
            uv_scale,
            color,
        }
    }
}

/// 精灵批次
#[derive(Debug, Default)]
pub struct SpriteBatch {
    instances: Vec<SpriteInstance>,
}

impl SpriteBatch {
    /// 创建新的精灵批次
    pub fn new() -> Self {
        Self {
            instances: Vec::new(),
        }
    }

    /// 添加精灵实例
    pub fn add(&mut self, instance: SpriteInstance) {
        self.instances.push(instance);
    }

    /// 清空批次
    pub fn clear(&mut self) {
        self.instances.clear();
    }

    /// 获取实例数量
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// 检查批次是否为空
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// 获取全部实例（按添加顺序）
    pub fn instances(&self) -> &[SpriteInstance] {
        &self.instances
    }
}
