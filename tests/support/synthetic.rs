#![allow(dead_code)]

//! Deterministic frame generators shared by the integration tests.

use rand::{rngs::StdRng, Rng, SeedableRng};

use snapjpeg::PixelFormat;

/// Dimensions that exercise partial-tile replication on each edge.
pub const EDGE_CASE_DIMENSIONS: &[(u32, u32, &str)] = &[
    (1, 1, "single_pixel"),
    (7, 7, "sub_tile"),
    (8, 8, "exact_tile"),
    (9, 9, "one_past_tile"),
    (16, 8, "wide_exact"),
    (8, 16, "tall_exact"),
    (17, 3, "wide_partial"),
    (3, 17, "tall_partial"),
];

/// Packs one RGB565 word from 5/6/5-bit channel values.
pub fn pack_rgb565(r5: u16, g6: u16, b5: u16) -> u16 {
    (b5 << 11) | (g6 << 5) | r5
}

/// Widened 8-bit channels for a packed RGB565 word, matching the encoder's
/// shift-left expansion.
pub fn rgb565_components(word: u16) -> (u8, u8, u8) {
    let r = ((word & 0x001F) << 3) as u8;
    let g = ((word & 0x07E0) >> 3) as u8;
    let b = ((word & 0xF800) >> 8) as u8;
    (r, g, b)
}

/// Solid-color frame in the given pixel layout.
pub fn solid(width: u32, height: u32, format: PixelFormat, r: u8, g: u8, b: u8) -> Vec<u8> {
    let count = (width * height) as usize;
    match format {
        PixelFormat::Rgb565 => {
            let word = pack_rgb565((r >> 3) as u16, (g >> 2) as u16, (b >> 3) as u16);
            word.to_le_bytes().repeat(count)
        }
        PixelFormat::Rgb888 => [r, g, b].repeat(count),
        PixelFormat::Rgba8888 => [r, g, b, 0xFF].repeat(count),
    }
}

/// The RGB value the encoder actually sees for a frame built by [`solid`]:
/// RGB565 drops the low channel bits and widens what is left by shifting.
pub fn solid_expected_rgb(format: PixelFormat, r: u8, g: u8, b: u8) -> (u8, u8, u8) {
    match format {
        PixelFormat::Rgb565 => {
            let word = pack_rgb565((r >> 3) as u16, (g >> 2) as u16, (b >> 3) as u16);
            rgb565_components(word)
        }
        PixelFormat::Rgb888 | PixelFormat::Rgba8888 => (r, g, b),
    }
}

/// Smooth two-axis ramp, low-frequency by construction.
pub fn gradient_rgb888(width: u32, height: u32) -> Vec<u8> {
    let mut pixels = Vec::with_capacity((width * height * 3) as usize);
    for y in 0..height {
        for x in 0..width {
            let r = ((x * 255) / width) as u8;
            let g = ((y * 255) / height) as u8;
            let b = (((x + y) * 127) / (width + height)) as u8;
            pixels.extend_from_slice(&[r, g, b]);
        }
    }
    pixels
}

/// Uniform random bytes, seeded for reproducibility.
pub fn noise(len: usize, seed: u64) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut data = vec![0u8; len];
    rng.fill(data.as_mut_slice());
    data
}

/// Small set of named RGB888 frames covering flat, smooth, and busy content.
pub fn pattern_suite() -> Vec<(&'static str, u32, u32, Vec<u8>)> {
    let mut checker = Vec::with_capacity(16 * 16 * 3);
    for y in 0..16u32 {
        for x in 0..16u32 {
            let v = if (x + y) % 2 == 0 { 255 } else { 0 };
            checker.extend_from_slice(&[v, v, v]);
        }
    }

    vec![
        (
            "solid_gray",
            16,
            16,
            solid(16, 16, PixelFormat::Rgb888, 128, 128, 128),
        ),
        ("gradient", 24, 24, gradient_rgb888(24, 24)),
        ("checkerboard", 16, 16, checker),
        ("noise", 16, 16, noise(16 * 16 * 3, 7)),
    ]
}
