//! Flower color palettes and per-spawn color jitter

use petal_core::Color;
use rand::Rng;

pub const BLOSSOM_PALETTE: [u32; 18] = [
    0xFF1493, 0xFF69B4, 0xFF6347, 0xFF4500, 0xFFD700, 0xFFA500, 0xFF0000, 0xDC143C, 0xB22222,
    0xFF20FF, 0x9370DB, 0x8A2BE2, 0x00FFFF, 0x00CED1, 0x20B2AA, 0x87CEEB, 0x4169E1, 0x0000FF,
];

pub const STEM_PALETTE: [u32; 15] = [
    0x228B22, 0x32CD32, 0x006400, 0x9ACD32, 0x8FBC8F, 0x90EE90, 0x7CFC00, 0x00FF00, 0x7FFF00,
    0x98FB98, 0x3CB371, 0x2E8B57, 0x66CDAA, 0x20B2AA, 0x008B8B,
];

/// Pick a palette entry and jitter it in HSL space by up to `variation`
pub fn jittered_pick<R: Rng + ?Sized>(palette: &[u32], variation: f32, rng: &mut R) -> Color {
    let base = Color::from_hex(palette[rng.gen_range(0..palette.len())]);
    base.offset_hsl(
        (rng.gen::<f32>() - 0.5) * variation,
        (rng.gen::<f32>() - 0.5) * variation * 0.7,
        (rng.gen::<f32>() - 0.5) * variation * 0.4,
    )
}

/// Random (stem, blossom) color pair
pub fn random_pair<R: Rng + ?Sized>(variation: f32, rng: &mut R) -> (Color, Color) {
    let stem = jittered_pick(&STEM_PALETTE, variation, rng);
    let blossom = jittered_pick(&BLOSSOM_PALETTE, variation, rng);
    (stem, blossom)
}
