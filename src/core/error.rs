//! 统一错误处理模块
//!
//! 提供粒子特效范围内的统一错误类型定义
//!
//! ## 错误类型分层
//!
//! - **I/O 层错误**: 保存/加载特效文件时的流错误（携带文件路径）
//! - **格式层错误**: 发射器数据块解析错误
//! - **用法错误**: 图集缺少图片等资源配置不匹配

use thiserror::Error;

/// 粒子特效错误类型
#[derive(Error, Debug)]
pub enum EffectError {
    #[error("Error saving effect: {path}, reason: {reason}")]
    SaveFailed { path: String, reason: String },

    #[error("Error loading effect: {path}, reason: {reason}")]
    LoadFailed { path: String, reason: String },

    #[error("Malformed emitter data: {0}")]
    Parse(String),

    #[error("SpriteSheet missing image: {0}")]
    MissingImage(String),

    #[error("Failed to load texture: {path}, reason: {reason}")]
    TextureFailed { path: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// 粒子特效结果类型别名
pub type EffectResult<T> = Result<T, EffectError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let effect_err: EffectError = io_err.into();
        assert!(matches!(effect_err, EffectError::Io(_)));
    }

    #[test]
    fn test_error_display() {
        let err = EffectError::MissingImage("missing_tex".to_string());
        assert_eq!(err.to_string(), "SpriteSheet missing image: missing_tex");
    }
}
