//! Toon sprites and screenshots.
//!
//! Toon art is an ordered, contiguous, zero-based file sequence: `toon0.png`,
//! `toon1.png`, ... probed until the first open failure, which is the normal
//! end-of-sequence signal, not an error. With no files at all the game still
//! runs on a procedurally drawn fallback set.

use std::io;
use std::path::{Path, PathBuf};

use engine::Sprite;

const FALLBACK_TOON_COUNT: usize = 6;
const FALLBACK_TOON_SIZE: u32 = 64;

pub fn default_assets_dir() -> PathBuf {
    std::env::var_os("KEYTOON_ASSETS_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("assets"))
}

/// Loads the toon sequence from `dir`. Falls back to built-in sprites when
/// the sequence is empty.
pub fn load_toon_sprites(dir: &Path) -> Vec<Sprite> {
    let mut sprites = Vec::new();
    loop {
        let path = dir.join(format!("toon{}.png", sprites.len()));
        let Ok(img) = image::open(&path) else {
            break;
        };
        let rgba = img.to_rgba8();
        let (w, h) = rgba.dimensions();
        sprites.push(Sprite::from_rgba(w, h, rgba.into_raw()));
    }

    if sprites.is_empty() {
        log::warn!(
            "no toon sprites under {}; using built-in art",
            dir.display()
        );
        return fallback_sprites();
    }
    log::debug!("loaded {} toon sprites from {}", sprites.len(), dir.display());
    sprites
}

/// Simple round critters in distinct colors, one per pool slot.
pub fn fallback_sprites() -> Vec<Sprite> {
    const BODIES: [[u8; 3]; FALLBACK_TOON_COUNT] = [
        [238, 82, 76],
        [249, 166, 28],
        [112, 194, 122],
        [42, 164, 226],
        [156, 114, 213],
        [245, 130, 180],
    ];
    BODIES.iter().map(|&body| draw_critter(body)).collect()
}

fn draw_critter(body: [u8; 3]) -> Sprite {
    let size = FALLBACK_TOON_SIZE;
    let mut rgba = vec![0u8; (size * size * 4) as usize];
    let center = size as f64 / 2.0;
    let radius = center - 4.0;

    for y in 0..size {
        for x in 0..size {
            let dx = x as f64 + 0.5 - center;
            let dy = y as f64 + 0.5 - center;
            let dist = (dx * dx + dy * dy).sqrt();
            if dist > radius {
                continue;
            }
            // Darken toward the rim for a little depth.
            let shade = 1.0 - 0.3 * (dist / radius);
            let idx = ((y * size + x) * 4) as usize;
            rgba[idx] = (body[0] as f64 * shade) as u8;
            rgba[idx + 1] = (body[1] as f64 * shade) as u8;
            rgba[idx + 2] = (body[2] as f64 * shade) as u8;
            rgba[idx + 3] = 255;
        }
    }

    for (ex, ey) in [(center - 10.0, center - 8.0), (center + 10.0, center - 8.0)] {
        fill_disc(&mut rgba, size, ex, ey, 6.0, [255, 255, 255]);
        fill_disc(&mut rgba, size, ex, ey + 1.5, 2.5, [20, 20, 20]);
    }

    Sprite::from_rgba(size, size, rgba)
}

fn fill_disc(rgba: &mut [u8], size: u32, cx: f64, cy: f64, r: f64, color: [u8; 3]) {
    for y in 0..size {
        for x in 0..size {
            let dx = x as f64 + 0.5 - cx;
            let dy = y as f64 + 0.5 - cy;
            if dx * dx + dy * dy > r * r {
                continue;
            }
            let idx = ((y * size + x) * 4) as usize;
            rgba[idx] = color[0];
            rgba[idx + 1] = color[1];
            rgba[idx + 2] = color[2];
            rgba[idx + 3] = 255;
        }
    }
}

/// Writes the frame to `screens/ttN.png`, probing N upward for the first
/// unused name, and returns the path written.
pub fn save_screenshot(rgba: &[u8], width: u32, height: u32) -> io::Result<PathBuf> {
    let dir = PathBuf::from("screens");
    std::fs::create_dir_all(&dir)?;

    let mut n = 0usize;
    let path = loop {
        let candidate = dir.join(format!("tt{n}.png"));
        if !candidate.exists() {
            break candidate;
        }
        n += 1;
    };

    image::save_buffer(&path, rgba, width, height, image::ColorType::Rgba8)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    Ok(path)
}
