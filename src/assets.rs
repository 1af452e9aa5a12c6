//! Image shape loading.
//!
//! Images are decoded on a background thread and handed back through a
//! channel that the frame loop polls. Until a sprite arrives (or when it
//! never does), image particles are drawn as circles.

use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crate::config::{ASSET_LOAD_ATTEMPTS, ASSET_RETRY_DELAY_MS};
use crate::error::AssetLoadError;

/// Decoded RGBA image used for `image` particles
#[derive(Clone, Debug, PartialEq)]
pub struct Sprite {
    width: u32,
    height: u32,
    pixels: Vec<[u8; 4]>,
}

impl Sprite {
    /// Build from row-major pixels; a size mismatch yields a 1x1 transparent sprite
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<[u8; 4]>) -> Self {
        if width == 0 || height == 0 || pixels.len() != width as usize * height as usize {
            return Self {
                width: 1,
                height: 1,
                pixels: vec![[0, 0, 0, 0]],
            };
        }
        Self { width, height, pixels }
    }

    pub fn from_image(image: image::RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        let pixels = image.pixels().map(|p| p.0).collect();
        Self::from_rgba(width, height, pixels)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Tightly packed RGBA8 rows, ready for a texture upload
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }
}

/// Resolve an image `src` against the directory of the configuration file
pub fn resolve_source(src: &str, base_dir: Option<&Path>) -> PathBuf {
    let path = Path::new(src);
    match base_dir {
        Some(dir) if path.is_relative() => dir.join(path),
        _ => path.to_path_buf(),
    }
}

fn is_unsupported(src: &str) -> bool {
    let lower = src.to_ascii_lowercase();
    lower.starts_with("http://")
        || lower.starts_with("https://")
        || lower.starts_with("data:")
        || lower.ends_with(".svg")
}

/// Read and decode a single image
pub fn load_sprite(src: &str, path: &Path) -> Result<Sprite, AssetLoadError> {
    if is_unsupported(src) {
        return Err(AssetLoadError::Unsupported { src: src.to_string() });
    }
    let bytes = std::fs::read(path)?;
    let image = image::load_from_memory(&bytes)?.into_rgba8();
    Ok(Sprite::from_image(image))
}

/// [`load_sprite`] with up to `attempts` tries; only I/O failures are retried
pub fn load_with_retry(
    src: &str,
    path: &Path,
    attempts: u32,
    delay: Duration,
) -> Result<Sprite, AssetLoadError> {
    let attempts = attempts.max(1);
    let mut attempt = 1;
    loop {
        match load_sprite(src, path) {
            Err(AssetLoadError::Io(e)) if attempt < attempts => {
                log::debug!("Loading {} failed (attempt {}/{}): {}", src, attempt, attempts, e);
                attempt += 1;
                thread::sleep(delay);
            }
            result => return result,
        }
    }
}

/// Background load of one image
pub struct AssetLoader {
    src: String,
    receiver: Option<mpsc::Receiver<Result<Sprite, AssetLoadError>>>,
}

impl AssetLoader {
    pub fn spawn(src: &str, base_dir: Option<&Path>) -> Self {
        let (tx, rx) = mpsc::channel();
        let path = resolve_source(src, base_dir);
        let owned = src.to_string();
        log::info!("Loading image shape from {}", path.display());

        thread::spawn(move || {
            let result = load_with_retry(
                &owned,
                &path,
                ASSET_LOAD_ATTEMPTS,
                Duration::from_millis(ASSET_RETRY_DELAY_MS),
            );
            let _ = tx.send(result);
        });

        Self {
            src: src.to_string(),
            receiver: Some(rx),
        }
    }

    pub fn src(&self) -> &str {
        &self.src
    }

    /// True until a result has been taken
    #[cfg(test)]
    pub fn is_pending(&self) -> bool {
        self.receiver.is_some()
    }

    /// Non-blocking check for the result; yields it at most once
    pub fn poll(&mut self) -> Option<Result<Sprite, AssetLoadError>> {
        let receiver = self.receiver.as_ref()?;
        match receiver.try_recv() {
            Ok(result) => {
                self.receiver = None;
                Some(result)
            }
            Err(mpsc::TryRecvError::Empty) => None,
            Err(mpsc::TryRecvError::Disconnected) => {
                self.receiver = None;
                Some(Err(AssetLoadError::Io(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    "asset loader thread exited",
                ))))
            }
        }
    }
}
