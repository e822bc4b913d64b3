//! 粒子特效
//!
//! 把一组发射器聚合为一个可复用的视觉特效：按插入顺序广播
//! 启动/绘制/定位等操作，并负责文本资产格式的保存与加载。
//!
//! ## 文件格式
//!
//! 每条记录 = 发射器数据块 + `- Image Path -` 标记行 + 图片路径行，
//! 记录之间以空行分隔，末条记录之后不需要分隔符。加载循环以
//! 记录之间读到流结束作为唯一的正常终止信号；块内遇到流结束
//! 视为数据损坏并报错。

use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use crate::core::error::{EffectError, EffectResult};
use crate::particles::emitter::ParticleEmitter;
use crate::particles::values::{read_line, require_line};
use crate::render::sprite_batch::SpriteBatch;
use crate::resources::atlas::TextureAtlas;
use crate::resources::texture::{FileTextureLoader, Sprite, TextureLoader};

/// 粒子特效：按插入顺序持有的发射器集合
///
/// `Clone` 对每个发射器做深拷贝，两个特效之间不共享发射器状态。
#[derive(Clone, Debug, Default)]
pub struct ParticleEffect {
    emitters: Vec<ParticleEmitter>,
}

impl ParticleEffect {
    pub fn new() -> Self {
        Self {
            emitters: Vec::new(),
        }
    }

    // ------------------------------------------------------------------
    // 广播操作
    // ------------------------------------------------------------------

    /// 按顺序启动每个发射器
    pub fn start(&mut self) {
        for emitter in &mut self.emitters {
            emitter.start();
        }
    }

    /// 按顺序推进并绘制每个发射器
    pub fn draw(&mut self, batch: &mut SpriteBatch, delta: f32) {
        for emitter in &mut self.emitters {
            emitter.update_and_draw(batch, delta);
        }
    }

    /// 通知所有发射器停止生成新粒子，让现有粒子完结
    pub fn allow_completion(&mut self) {
        for emitter in &mut self.emitters {
            emitter.allow_completion();
        }
    }

    /// 所有发射器均为非循环且已完结时为真（空集合为真）
    pub fn is_complete(&self) -> bool {
        for emitter in &self.emitters {
            if emitter.is_continuous() {
                return false;
            }
            if !emitter.is_complete() {
                return false;
            }
        }
        true
    }

    /// 把特效强制转为固定时长的单次播放
    pub fn set_duration(&mut self, duration: f32) {
        for emitter in &mut self.emitters {
            emitter.force_fixed_duration(duration);
        }
    }

    pub fn set_position(&mut self, x: f32, y: f32) {
        for emitter in &mut self.emitters {
            emitter.set_position(x, y);
        }
    }

    pub fn set_flip(&mut self, flip_x: bool, flip_y: bool) {
        for emitter in &mut self.emitters {
            emitter.set_flip(flip_x, flip_y);
        }
    }

    // ------------------------------------------------------------------
    // 查找与集合访问
    // ------------------------------------------------------------------

    /// 按名字查找发射器，返回第一个精确匹配
    pub fn find_emitter(&self, name: &str) -> Option<&ParticleEmitter> {
        self.emitters.iter().find(|e| e.name() == name)
    }

    /// `find_emitter` 的可变版本
    pub fn find_emitter_mut(&mut self, name: &str) -> Option<&mut ParticleEmitter> {
        self.emitters.iter_mut().find(|e| e.name() == name)
    }

    /// 有序的发射器集合
    pub fn emitters(&self) -> &[ParticleEmitter] {
        &self.emitters
    }

    /// 发射器集合的可变视图
    ///
    /// 特效保留所有权；这是刻意保留的后门，直接增删会改变
    /// 绘制和序列化顺序。
    pub fn emitters_mut(&mut self) -> &mut Vec<ParticleEmitter> {
        &mut self.emitters
    }

    // ------------------------------------------------------------------
    // 保存
    // ------------------------------------------------------------------

    /// 保存到文件；失败时错误携带目标路径
    ///
    /// 文件句柄在所有退出路径上随作用域关闭。
    pub fn save(&self, path: impl AsRef<Path>) -> EffectResult<()> {
        let path = path.as_ref();
        let result = File::create(path)
            .map_err(EffectError::from)
            .and_then(|mut file| self.save_to(&mut file));
        match result {
            Ok(()) => {
                log::debug!(
                    "Saved {} emitters to {}",
                    self.emitters.len(),
                    path.display()
                );
                Ok(())
            }
            Err(e) => Err(EffectError::SaveFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            }),
        }
    }

    /// 把全部记录写入任意输出流
    pub fn save_to(&self, output: &mut dyn Write) -> EffectResult<()> {
        for (index, emitter) in self.emitters.iter().enumerate() {
            if index > 0 {
                output.write_all(b"\n\n")?;
            }
            emitter.save(output)?;
            output.write_all(b"- Image Path -\n")?;
            writeln!(output, "{}", emitter.image_path().unwrap_or(""))?;
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // 加载
    // ------------------------------------------------------------------

    /// 从文件加载发射器（替换现有内容）；失败时错误携带来源路径
    pub fn load_emitters(&mut self, path: impl AsRef<Path>) -> EffectResult<()> {
        let path = path.as_ref();
        let result = File::open(path)
            .map_err(EffectError::from)
            .and_then(|file| self.load_emitters_from(&mut BufReader::new(file)));
        match result {
            Ok(()) => {
                log::debug!(
                    "Loaded {} emitters from {}",
                    self.emitters.len(),
                    path.display()
                );
                Ok(())
            }
            Err(e) => Err(EffectError::LoadFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            }),
        }
    }

    /// 从任意输入流加载发射器（替换现有内容）
    ///
    /// 循环终止条件：记录边界处读到流结束。空流是合法的零记录特效；
    /// 块内或图片路径行之前的流结束按数据损坏报错。
    pub fn load_emitters_from(&mut self, reader: &mut dyn BufRead) -> EffectResult<()> {
        self.emitters.clear();
        loop {
            if reader.fill_buf()?.is_empty() {
                break;
            }
            let mut emitter = ParticleEmitter::load(reader)?;
            // 标记行（- Image Path -），读取后丢弃
            require_line(reader)?;
            let image_path = require_line(reader)?;
            if !image_path.is_empty() {
                emitter.set_image_path(Some(image_path));
            }
            self.emitters.push(emitter);
            if read_line(reader)?.is_none() {
                break;
            }
            if read_line(reader)?.is_none() {
                break;
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // 图片绑定
    // ------------------------------------------------------------------

    /// 目录式图片绑定：按文件名在 `images_dir` 下通过注入的
    /// 加载器读取纹理并包装为精灵
    pub fn load_emitter_images_dir(
        &mut self,
        images_dir: &Path,
        loader: &dyn TextureLoader,
    ) -> EffectResult<()> {
        let mut bound = 0usize;
        for emitter in &mut self.emitters {
            let image_name = match emitter.image_path() {
                Some(path) => file_name_component(path),
                None => continue,
            };
            let texture = loader.load_texture(&images_dir.join(&image_name))?;
            emitter.set_sprite(Sprite::from_texture(texture));
            bound += 1;
        }
        log::debug!(
            "Bound {} emitter images from {}",
            bound,
            images_dir.display()
        );
        Ok(())
    }

    /// 图集式图片绑定：去掉扩展名后按裸名字查找预打包精灵
    ///
    /// 图集缺少条目属于资源配置错误，立即报错并指出缺失的名字。
    pub fn load_emitter_images_atlas(&mut self, atlas: &TextureAtlas) -> EffectResult<()> {
        let mut bound = 0usize;
        for emitter in &mut self.emitters {
            let image_name = match emitter.image_path() {
                Some(path) => strip_extension(&file_name_component(path)).to_string(),
                None => continue,
            };
            let sprite = atlas
                .create_sprite(&image_name)
                .ok_or(EffectError::MissingImage(image_name))?;
            emitter.set_sprite(sprite);
            bound += 1;
        }
        log::debug!("Bound {} emitter images from atlas", bound);
        Ok(())
    }

    /// 加载特效文件并从图片目录绑定精灵
    pub fn load(
        &mut self,
        effect_file: impl AsRef<Path>,
        images_dir: impl AsRef<Path>,
    ) -> EffectResult<()> {
        self.load_emitters(effect_file)?;
        self.load_emitter_images_dir(images_dir.as_ref(), &FileTextureLoader)
    }

    /// 加载特效文件并从图集绑定精灵
    pub fn load_with_atlas(
        &mut self,
        effect_file: impl AsRef<Path>,
        atlas: &TextureAtlas,
    ) -> EffectResult<()> {
        self.load_emitters(effect_file)?;
        self.load_emitter_images_atlas(atlas)
    }
}

/// 归一化路径分隔符并取最后一个文件名组件
fn file_name_component(path: &str) -> String {
    let normalized = path.replace('\\', "/");
    normalized
        .rsplit('/')
        .next()
        .unwrap_or(&normalized)
        .to_string()
}

/// 去掉最后一个 `.` 之后的扩展名
fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(index) => &name[..index],
        None => name,
    }
}
