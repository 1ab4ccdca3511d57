//! Unit conversion utilities.
//!
//! Presentation packages measure every offset and extent in English Metric
//! Units. 914,400 EMU make one inch, which divides evenly into points,
//! centimeters, and common pixel densities. Font sizes travel separately as
//! centipoints (`sz="4400"` is 44 pt).

pub const EMUS_PER_INCH: i64 = 914_400;
pub const EMUS_PER_CM: i64 = 360_000;
pub const EMUS_PER_MM: i64 = 36_000;
pub const EMUS_PER_PT: i64 = 12_700;

/// The pixel density geometry is normalized to during extraction.
pub const BASE_DPI: u32 = 96;

#[inline]
pub fn emu_to_px(emu: i64, dpi: u32) -> f32 {
    (emu as f64 * dpi as f64 / EMUS_PER_INCH as f64) as f32
}

/// Convert EMU to pixels at the base 96 DPI used by the slide model.
#[inline]
pub fn emu_to_px_96(emu: i64) -> f32 {
    emu_to_px(emu, BASE_DPI)
}

#[inline]
pub fn px_to_emu(px: f32, dpi: u32) -> i64 {
    (px as f64 * EMUS_PER_INCH as f64 / dpi as f64) as i64
}

#[inline]
pub fn emu_to_pt(emu: i64) -> f32 {
    (emu as f64 / EMUS_PER_PT as f64) as f32
}

#[inline]
pub fn pt_to_emu(pt: f32) -> i64 {
    (pt as f64 * EMUS_PER_PT as f64) as i64
}

/// Convert a centipoint font size attribute to points.
#[inline]
pub fn centipt_to_pt(centipt: i64) -> f32 {
    centipt as f32 / 100.0
}

/// Convert points to pixels at the given density.
#[inline]
pub fn pt_to_px(pt: f32, dpi: u32) -> f32 {
    pt * dpi as f32 / 72.0
}
