//! Image decoding for scene textures

use std::path::Path;

use liftoff_core::assets::{AssetSlot, Texture};
use liftoff_core::config::GalaxyConfig;
use liftoff_core::drivers::procedural_galaxy;
use liftoff_core::Error;

/// Textures are sampled into terminal cells, so anything larger is wasted
pub const MAX_TEXTURE_SIDE: u32 = 256;

const PROCEDURAL_SIDE: u32 = 192;

/// Decode an image file into an RGBA texture, downscaled to fit `MAX_TEXTURE_SIDE`
pub fn load_texture(path: &Path) -> liftoff_core::Result<Texture> {
    let asset_error = |message: String| Error::Asset {
        name: path.display().to_string(),
        message,
    };

    let image = image::open(path).map_err(|e| asset_error(e.to_string()))?;
    let image = if image.width() > MAX_TEXTURE_SIDE || image.height() > MAX_TEXTURE_SIDE {
        image.thumbnail(MAX_TEXTURE_SIDE, MAX_TEXTURE_SIDE)
    } else {
        image
    };

    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    let pixels = rgba.pixels().map(|p| p.0).collect();
    Texture::from_pixels(width, height, pixels)
}

/// Start loading the galaxy texture in the background.
///
/// Uses the configured image when there is one, the procedural spiral otherwise.
pub fn galaxy_texture(config: &GalaxyConfig, seed: u64) -> AssetSlot<Texture> {
    match config.texture_path() {
        Some(path) => AssetSlot::spawn_blocking("galaxy", move || load_texture(&path)),
        None => AssetSlot::spawn_blocking("galaxy", move || procedural_galaxy(PROCEDURAL_SIDE, seed)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use std::path::PathBuf;

    fn temp_png(name: &str, width: u32, height: u32) -> PathBuf {
        let path = std::env::temp_dir().join(format!("liftoff-{}-{}.png", name, std::process::id()));
        let image = RgbaImage::from_fn(width, height, |x, _| Rgba([x as u8, 0, 255, 255]));
        image.save(&path).unwrap();
        path
    }

    #[test]
    fn test_load_small_texture() {
        let path = temp_png("small", 4, 2);
        let texture = load_texture(&path).unwrap();
        assert_eq!((texture.width(), texture.height()), (4, 2));
        assert_eq!(texture.sample(1.0, 0.0), [3, 0, 255, 255]);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_large_texture_is_downscaled() {
        let path = temp_png("large", 600, 300);
        let texture = load_texture(&path).unwrap();
        assert_eq!((texture.width(), texture.height()), (256, 128));
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_missing_file_is_asset_error() {
        let err = load_texture(Path::new("/nonexistent/galaxy.png")).unwrap_err();
        assert!(matches!(err, Error::Asset { .. }));
    }

    #[test]
    fn test_galaxy_slot_without_runtime_loads_inline() {
        let mut slot = galaxy_texture(&GalaxyConfig::default(), 7);
        let texture = slot.poll().unwrap();
        assert_eq!(texture.width(), PROCEDURAL_SIDE);

        let config = GalaxyConfig {
            texture_path: Some(PathBuf::from("/nonexistent/galaxy.png")),
            ..Default::default()
        };
        let mut slot = galaxy_texture(&config, 7);
        assert!(slot.poll().is_none());
        assert!(format!("{slot:?}").contains("failed"));
    }

    #[tokio::test]
    async fn test_galaxy_loads_on_blocking_pool() {
        let mut slot = galaxy_texture(&GalaxyConfig::default(), 11);
        let mut texture = None;
        for _ in 0..200 {
            texture = slot.poll();
            if texture.is_some() {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        assert_eq!(texture.unwrap().height(), PROCEDURAL_SIDE);
    }
}
