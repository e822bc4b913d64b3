//! 发射器属性值类型
//!
//! 提供区间随机值（RangedValue/ScaledValue）以及行式 `key: value`
//! 读写辅助函数，供发射器的保存/加载使用。

use std::io::{BufRead, Write};

use crate::core::error::{EffectError, EffectResult};

// ============================================================================
// 行式读写辅助
// ============================================================================

/// 读取一行（去掉行尾换行符）；流结束时返回 `None`
pub(crate) fn read_line(reader: &mut dyn BufRead) -> EffectResult<Option<String>> {
    let mut line = String::new();
    let n = reader.read_line(&mut line)?;
    if n == 0 {
        return Ok(None);
    }
    while line.ends_with('\n') || line.ends_with('\r') {
        line.pop();
    }
    Ok(Some(line))
}

/// 读取一行，流提前结束视为格式错误
pub(crate) fn require_line(reader: &mut dyn BufRead) -> EffectResult<String> {
    read_line(reader)?.ok_or_else(|| EffectError::Parse("unexpected end of stream".to_string()))
}

/// 从 `key: value` 行中取出 value 部分，校验 key
fn value_of(line: &str, key: &str) -> EffectResult<String> {
    match line.split_once(": ") {
        Some((k, v)) if k == key => Ok(v.to_string()),
        _ => Err(EffectError::Parse(format!(
            "expected \"{}: ...\", found \"{}\"",
            key, line
        ))),
    }
}

/// 读取 `key: <f32>` 行
pub(crate) fn read_f32(reader: &mut dyn BufRead, key: &str) -> EffectResult<f32> {
    let line = require_line(reader)?;
    value_of(&line, key)?
        .parse::<f32>()
        .map_err(|e| EffectError::Parse(format!("invalid float for \"{}\": {}", key, e)))
}

/// 读取 `key: <u32>` 行
pub(crate) fn read_u32(reader: &mut dyn BufRead, key: &str) -> EffectResult<u32> {
    let line = require_line(reader)?;
    value_of(&line, key)?
        .parse::<u32>()
        .map_err(|e| EffectError::Parse(format!("invalid integer for \"{}\": {}", key, e)))
}

/// 读取 `key: <bool>` 行
pub(crate) fn read_bool(reader: &mut dyn BufRead, key: &str) -> EffectResult<bool> {
    let line = require_line(reader)?;
    value_of(&line, key)?
        .parse::<bool>()
        .map_err(|e| EffectError::Parse(format!("invalid bool for \"{}\": {}", key, e)))
}

/// 读取段标记行（如 `- Duration -`），内容不符视为格式错误
pub(crate) fn read_section(reader: &mut dyn BufRead, marker: &str) -> EffectResult<()> {
    let line = require_line(reader)?;
    if line == marker {
        Ok(())
    } else {
        Err(EffectError::Parse(format!(
            "expected section \"{}\", found \"{}\"",
            marker, line
        )))
    }
}

// ============================================================================
// 区间值
// ============================================================================

/// 区间随机值：启动时在 `[low_min, low_max]` 内均匀采样
#[derive(Clone, Debug, PartialEq)]
pub struct RangedValue {
    pub low_min: f32,
    pub low_max: f32,
}

impl RangedValue {
    pub fn new(low_min: f32, low_max: f32) -> Self {
        Self { low_min, low_max }
    }

    /// 采样一个新值
    pub fn new_value(&self) -> f32 {
        self.low_min + (self.low_max - self.low_min) * rand::random::<f32>()
    }

    pub(crate) fn save(&self, output: &mut dyn Write) -> std::io::Result<()> {
        writeln!(output, "lowMin: {}", self.low_min)?;
        writeln!(output, "lowMax: {}", self.low_max)
    }

    pub(crate) fn load(reader: &mut dyn BufRead) -> EffectResult<Self> {
        Ok(Self {
            low_min: read_f32(reader, "lowMin")?,
            low_max: read_f32(reader, "lowMax")?,
        })
    }
}

impl Default for RangedValue {
    fn default() -> Self {
        Self {
            low_min: 0.0,
            low_max: 0.0,
        }
    }
}

/// 上界区间值：每个粒子在 `[high_min, high_max]` 内采样峰值
#[derive(Clone, Debug, PartialEq)]
pub struct ScaledValue {
    pub high_min: f32,
    pub high_max: f32,
}

impl ScaledValue {
    pub fn new(high_min: f32, high_max: f32) -> Self {
        Self { high_min, high_max }
    }

    /// 采样一个新值
    pub fn new_value(&self) -> f32 {
        self.high_min + (self.high_max - self.high_min) * rand::random::<f32>()
    }

    pub(crate) fn save(&self, output: &mut dyn Write) -> std::io::Result<()> {
        writeln!(output, "highMin: {}", self.high_min)?;
        writeln!(output, "highMax: {}", self.high_max)
    }

    pub(crate) fn load(reader: &mut dyn BufRead) -> EffectResult<Self> {
        Ok(Self {
            high_min: read_f32(reader, "highMin")?,
            high_max: read_f32(reader, "highMax")?,
        })
    }
}

impl Default for ScaledValue {
    fn default() -> Self {
        Self {
            high_min: 0.0,
            high_max: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::BufReader;

    #[test]
    fn test_ranged_value_sample_within_bounds() {
        let value = RangedValue::new(2.0, 5.0);
        for _ in 0..100 {
            let v = value.new_value();
            assert!((2.0..=5.0).contains(&v));
        }
    }

    #[test]
    fn test_ranged_value_fixed_sample() {
        let value = RangedValue::new(3.0, 3.0);
        assert!((value.new_value() - 3.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_ranged_value_roundtrip() {
        let value = RangedValue::new(10.0, 250.5);
        let mut buf = Vec::new();
        value.save(&mut buf).unwrap();

        let mut reader = BufReader::new(buf.as_slice());
        let loaded = RangedValue::load(&mut reader).unwrap();
        assert_eq!(loaded, value);
    }

    #[test]
    fn test_scaled_value_roundtrip() {
        let value = ScaledValue::new(0.5, 1.5);
        let mut buf = Vec::new();
        value.save(&mut buf).unwrap();

        let mut reader = BufReader::new(buf.as_slice());
        let loaded = ScaledValue::load(&mut reader).unwrap();
        assert_eq!(loaded, value);
    }

    #[test]
    fn test_read_f32_rejects_wrong_key() {
        let mut reader = BufReader::new("lowMax: 1.0\n".as_bytes());
        let result = read_f32(&mut reader, "lowMin");
        assert!(matches!(result, Err(EffectError::Parse(_))));
    }

    #[test]
    fn test_require_line_fails_at_eof() {
        let mut reader = BufReader::new("".as_bytes());
        assert!(matches!(
            require_line(&mut reader),
            Err(EffectError::Parse(_))
        ));
    }
}
