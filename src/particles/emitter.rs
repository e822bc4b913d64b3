//! 粒子发射器
//!
//! 管理单个发射器的生命周期（延迟、持续时间、发射速率）和存活粒子，
//! 并负责自身数据块的行式保存/加载。发射器数据块是自定界的：
//! 固定的段序列让解析器无需长度或终止符即可知道块在哪里结束。

use std::io::{BufRead, Write};

use glam::Vec2;

use crate::core::error::EffectResult;
use crate::particles::values::{
    read_bool, read_section, read_u32, require_line, RangedValue, ScaledValue,
};
use crate::render::sprite_batch::{SpriteBatch, SpriteInstance};
use crate::resources::texture::Sprite;

/// 单个存活粒子
#[derive(Clone, Debug)]
struct Particle {
    position: Vec2,
    life: f32,
    life_remaining: f32,
}

/// 粒子发射器
///
/// 时间单位统一为秒。`Clone` 是深拷贝：运行时粒子状态不共享。
#[derive(Clone, Debug)]
pub struct ParticleEmitter {
    name: String,
    /// 启动延迟（秒）
    delay_value: RangedValue,
    /// 单次运行时长（秒）
    duration_value: RangedValue,
    /// 启动时立即生成的粒子数
    count_min: u32,
    /// 存活粒子数上限
    count_max: u32,
    /// 每秒发射数量
    emission: ScaledValue,
    /// 粒子生命周期（秒）
    life: ScaledValue,
    continuous: bool,
    additive: bool,

    image_path: Option<String>,
    sprite: Option<Sprite>,
    position: Vec2,
    flip_x: bool,
    flip_y: bool,

    // 运行时状态
    delay: f32,
    delay_timer: f32,
    duration: f32,
    duration_timer: f32,
    emission_rate: f32,
    emission_accumulator: f32,
    stop_requested: bool,
    particles: Vec<Particle>,
}

impl Default for ParticleEmitter {
    fn default() -> Self {
        Self {
            name: "Untitled".to_string(),
            delay_value: RangedValue::default(),
            duration_value: RangedValue::new(1.0, 1.0),
            count_min: 0,
            count_max: 100,
            emission: ScaledValue::new(10.0, 10.0),
            life: ScaledValue::new(0.5, 0.5),
            continuous: false,
            additive: false,
            image_path: None,
            sprite: None,
            position: Vec2::ZERO,
            flip_x: false,
            flip_y: false,
            delay: 0.0,
            delay_timer: 0.0,
            duration: 0.0,
            duration_timer: 0.0,
            emission_rate: 0.0,
            emission_accumulator: 0.0,
            stop_requested: false,
            particles: Vec::new(),
        }
    }
}

impl ParticleEmitter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// 设置是否循环发射
    pub fn with_continuous(mut self, continuous: bool) -> Self {
        self.continuous = continuous;
        self
    }

    /// 设置单次运行时长（秒）
    pub fn with_duration(mut self, min: f32, max: f32) -> Self {
        self.duration_value = RangedValue::new(min, max);
        self
    }

    /// 设置发射速率（每秒）
    pub fn with_emission(mut self, min: f32, max: f32) -> Self {
        self.emission = ScaledValue::new(min, max);
        self
    }

    /// 设置粒子生命周期（秒）
    pub fn with_life(mut self, min: f32, max: f32) -> Self {
        self.life = ScaledValue::new(min, max);
        self
    }

    /// 设置粒子数量范围
    pub fn with_count(mut self, min: u32, max: u32) -> Self {
        self.count_min = min;
        self.count_max = max;
        self
    }

    /// 设置图片路径
    pub fn with_image_path(mut self, path: impl Into<String>) -> Self {
        self.image_path = Some(path.into());
        self
    }

    // ------------------------------------------------------------------
    // 生命周期
    // ------------------------------------------------------------------

    /// 开始一次新的运行：重置计时器、采样时长并预生成初始粒子
    pub fn start(&mut self) {
        self.delay = self.delay_value.new_value();
        self.delay_timer = 0.0;
        self.duration = self.duration_value.new_value();
        self.duration_timer = 0.0;
        self.emission_rate = self.emission.new_value();
        self.emission_accumulator = 0.0;
        self.stop_requested = false;
        self.particles.clear();
        for _ in 0..self.count_min.min(self.count_max) {
            self.spawn_particle();
        }
    }

    /// 推进计时器、生成/老化粒子，并把存活粒子写入批次
    ///
    /// 完整引擎里的逐粒子插值（缩放、旋转、色带）在别处；这里只维护
    /// 生命周期契约所需的最小模拟。
    pub fn update_and_draw(&mut self, batch: &mut SpriteBatch, delta: f32) {
        if self.delay_timer < self.delay {
            self.delay_timer += delta;
        } else if !self.stop_requested {
            let active = self.continuous || self.duration_timer < self.duration;
            self.duration_timer += delta;
            if active {
                self.emission_accumulator += self.emission_rate * delta;
                let mut count = self.emission_accumulator.floor() as u32;
                self.emission_accumulator -= count as f32;
                let capacity = self.count_max.saturating_sub(self.particles.len() as u32);
                count = count.min(capacity);
                for _ in 0..count {
                    self.spawn_particle();
                }
            }
        }

        for particle in &mut self.particles {
            particle.life_remaining -= delta;
        }
        self.particles.retain(|p| p.life_remaining > 0.0);

        if let Some(sprite) = &self.sprite {
            let (uv_offset, uv_scale) = sprite.uv_flipped(self.flip_x, self.flip_y);
            for particle in &self.particles {
                let alpha = (particle.life_remaining / particle.life).clamp(0.0, 1.0);
                batch.add(SpriteInstance::new(
                    particle.position,
                    sprite.size,
                    uv_offset,
                    uv_scale,
                    [1.0, 1.0, 1.0, alpha],
                ));
            }
        }
    }

    /// 停止生成新粒子，让已有粒子自然消亡
    pub fn allow_completion(&mut self) {
        self.stop_requested = true;
    }

    /// 本次运行是否结束
    pub fn is_complete(&self) -> bool {
        if self.stop_requested {
            return self.particles.is_empty();
        }
        if self.continuous {
            return false;
        }
        self.delay_timer >= self.delay
            && self.duration_timer >= self.duration
            && self.particles.is_empty()
    }

    pub fn is_continuous(&self) -> bool {
        self.continuous
    }

    /// 强制转为固定时长的单次运行：取消循环，设定时长并清零计时器
    pub fn force_fixed_duration(&mut self, duration: f32) {
        self.continuous = false;
        self.duration = duration;
        self.duration_timer = 0.0;
    }

    pub fn set_position(&mut self, x: f32, y: f32) {
        self.position = Vec2::new(x, y);
    }

    pub fn set_flip(&mut self, flip_x: bool, flip_y: bool) {
        self.flip_x = flip_x;
        self.flip_y = flip_y;
    }

    fn spawn_particle(&mut self) {
        let life = self.life.new_value().max(0.0);
        self.particles.push(Particle {
            position: self.position,
            life,
            life_remaining: life,
        });
    }

    // ------------------------------------------------------------------
    // 访问器
    // ------------------------------------------------------------------

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn image_path(&self) -> Option<&str> {
        self.image_path.as_deref()
    }

    pub fn set_image_path(&mut self, path: Option<String>) {
        self.image_path = path;
    }

    pub fn sprite(&self) -> Option<&Sprite> {
        self.sprite.as_ref()
    }

    pub fn set_sprite(&mut self, sprite: Sprite) {
        self.sprite = Some(sprite);
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn duration_timer(&self) -> f32 {
        self.duration_timer
    }

    pub fn live_particle_count(&self) -> usize {
        self.particles.len()
    }

    // ------------------------------------------------------------------
    // 序列化
    // ------------------------------------------------------------------

    /// 写出发射器数据块（不含图片路径，路径由特效层负责）
    pub fn save(&self, output: &mut dyn Write) -> std::io::Result<()> {
        writeln!(output, "{}", self.name)?;
        writeln!(output, "- Delay -")?;
        self.delay_value.save(output)?;
        writeln!(output, "- Duration -")?;
        self.duration_value.save(output)?;
        writeln!(output, "- Count -")?;
        writeln!(output, "min: {}", self.count_min)?;
        writeln!(output, "max: {}", self.count_max)?;
        writeln!(output, "- Emission -")?;
        self.emission.save(output)?;
        writeln!(output, "- Life -")?;
        self.life.save(output)?;
        writeln!(output, "- Options -")?;
        writeln!(output, "continuous: {}", self.continuous)?;
        writeln!(output, "additive: {}", self.additive)
    }

    /// 从流的当前位置解析一个发射器数据块
    ///
    /// 恰好消费属于本块的行，返回后流停在块末尾之后。
    pub fn load(reader: &mut dyn BufRead) -> EffectResult<Self> {
        let name = require_line(reader)?;
        read_section(reader, "- Delay -")?;
        let delay_value = RangedValue::load(reader)?;
        read_section(reader, "- Duration -")?;
        let duration_value = RangedValue::load(reader)?;
        read_section(reader, "- Count -")?;
        let count_min = read_u32(reader, "min")?;
        let count_max = read_u32(reader, "max")?;
        read_section(reader, "- Emission -")?;
        let emission = ScaledValue::load(reader)?;
        read_section(reader, "- Life -")?;
        let life = ScaledValue::load(reader)?;
        read_section(reader, "- Options -")?;
        let continuous = read_bool(reader, "continuous")?;
        let additive = read_bool(reader, "additive")?;

        Ok(Self {
            name,
            delay_value,
            duration_value,
            count_min,
            count_max,
            emission,
            life,
            continuous,
            additive,
            ..Default::default()
        })
    }
}
