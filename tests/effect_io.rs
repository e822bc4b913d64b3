use std::cell::RefCell;
use std::path::{Path, PathBuf};

use particle_effect::{
    EffectError, EffectResult, ParticleEffect, ParticleEmitter, SpriteBatch, Texture,
    TextureAtlas, TextureLoader,
};

fn build_effect() -> ParticleEffect {
    let mut effect = ParticleEffect::new();
    effect.emitters_mut().push(
        ParticleEmitter::new("flame")
            .with_continuous(true)
            .with_duration(2.0, 2.0)
            .with_emission(60.0, 60.0)
            .with_life(0.5, 1.0)
            .with_count(8, 256)
            .with_image_path("art\\particles\\flame.png"),
    );
    effect.emitters_mut().push(
        ParticleEmitter::new("smoke")
            .with_duration(1.0, 1.5)
            .with_emission(20.0, 20.0)
            .with_life(1.0, 2.0)
            .with_count(0, 128)
            .with_image_path("art/particles/smoke.png"),
    );
    effect
}

#[test]
fn test_file_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("explosion.p");

    let effect = build_effect();
    effect.save(&path).unwrap();
    let first = std::fs::read(&path).unwrap();

    let mut loaded = ParticleEffect::new();
    loaded.load_emitters(&path).unwrap();
    assert_eq!(loaded.emitters().len(), 2);

    let resaved_path = dir.path().join("explosion_resaved.p");
    loaded.save(&resaved_path).unwrap();
    let second = std::fs::read(&resaved_path).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_load_missing_file_names_source() {
    let mut effect = ParticleEffect::new();
    let result = effect.load_emitters("/nonexistent/effect.p");
    match result {
        Err(EffectError::LoadFailed { path, .. }) => {
            assert_eq!(path, "/nonexistent/effect.p")
        }
        other => panic!("expected LoadFailed, got {:?}", other),
    }
}

#[test]
fn test_save_to_bad_path_names_target() {
    let effect = build_effect();
    let result = effect.save("/nonexistent/dir/effect.p");
    assert!(matches!(result, Err(EffectError::SaveFailed { .. })));
}

/// 记录请求路径的桩加载器
struct StubLoader {
    requested: RefCell<Vec<PathBuf>>,
}

impl StubLoader {
    fn new() -> Self {
        Self {
            requested: RefCell::new(Vec::new()),
        }
    }
}

impl TextureLoader for StubLoader {
    fn load_texture(&self, path: &Path) -> EffectResult<Texture> {
        self.requested.borrow_mut().push(path.to_path_buf());
        Ok(Texture::new(4, 4, vec![255; 4 * 4 * 4]))
    }
}

#[test]
fn test_dir_binding_through_stub_loader() {
    let mut effect = build_effect();
    let loader = StubLoader::new();
    effect
        .load_emitter_images_dir(Path::new("images"), &loader)
        .unwrap();

    // 反斜杠路径被归一化，目录前缀被丢弃，扩展名保留
    let requested = loader.requested.borrow();
    assert_eq!(
        *requested,
        vec![
            PathBuf::from("images/flame.png"),
            PathBuf::from("images/smoke.png"),
        ]
    );
    for emitter in effect.emitters() {
        let sprite = emitter.sprite().expect("sprite bound");
        assert_eq!(sprite.size, glam::Vec2::new(4.0, 4.0));
    }
}

#[test]
fn test_dir_binding_with_real_files() {
    let dir = tempfile::tempdir().unwrap();
    for name in ["flame.png", "smoke.png"] {
        image::RgbaImage::from_pixel(2, 3, image::Rgba([255, 0, 0, 255]))
            .save(dir.path().join(name))
            .unwrap();
    }

    let effect_path = dir.path().join("fx.p");
    build_effect().save(&effect_path).unwrap();

    let mut effect = ParticleEffect::new();
    effect.load(&effect_path, dir.path()).unwrap();

    let sprite = effect.find_emitter("flame").unwrap().sprite().unwrap();
    assert_eq!(sprite.size, glam::Vec2::new(2.0, 3.0));
}

#[test]
fn test_atlas_binding_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let effect_path = dir.path().join("fx.p");
    build_effect().save(&effect_path).unwrap();

    let atlas = TextureAtlas::from_json(
        r#"{
            "frames": {
                "flame": { "frame": { "x": 0, "y": 0, "w": 32, "h": 32 } },
                "smoke": { "frame": { "x": 32, "y": 0, "w": 32, "h": 32 } }
            },
            "meta": { "size": { "w": 64, "h": 64 } }
        }"#,
    )
    .unwrap();

    let mut effect = ParticleEffect::new();
    effect.load_with_atlas(&effect_path, &atlas).unwrap();
    assert!(effect.emitters().iter().all(|e| e.sprite().is_some()));
}

#[test]
fn test_atlas_binding_missing_entry_fails_loudly() {
    let dir = tempfile::tempdir().unwrap();
    let effect_path = dir.path().join("fx.p");
    build_effect().save(&effect_path).unwrap();

    let atlas = TextureAtlas::with_size(64, 64);
    let mut effect = ParticleEffect::new();
    let result = effect.load_with_atlas(&effect_path, &atlas);
    match result {
        Err(EffectError::MissingImage(name)) => assert_eq!(name, "flame"),
        other => panic!("expected MissingImage, got {:?}", other),
    }
}

#[test]
fn test_loaded_effect_plays_and_completes() {
    let dir = tempfile::tempdir().unwrap();
    let effect_path = dir.path().join("fx.p");
    build_effect().save(&effect_path).unwrap();

    let mut atlas = TextureAtlas::with_size(64, 64);
    atlas.insert_region("flame", 0, 0, 16, 16);
    atlas.insert_region("smoke", 16, 0, 16, 16);

    let mut effect = ParticleEffect::new();
    effect.load_with_atlas(&effect_path, &atlas).unwrap();

    // flame 是循环发射器：特效在允许完结之前永不完结
    effect.start();
    let mut batch = SpriteBatch::new();
    effect.draw(&mut batch, 0.1);
    assert!(!batch.is_empty());
    assert!(!effect.is_complete());

    // 限定时长后跑完整个生命周期
    effect.set_duration(0.2);
    for _ in 0..100 {
        batch.clear();
        effect.draw(&mut batch, 0.05);
    }
    assert!(effect.is_complete());
}
