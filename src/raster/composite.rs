use crate::foundation::core::Rgba8;
use crate::foundation::error::{InpaintError, InpaintResult};
use crate::foundation::math::{mul_div255_u16, mul_div255_u8};

pub type StraightRgba8 = [u8; 4];

/// How rasterized coverage is applied to a straight-alpha surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Compose {
    /// Source-over with the given color, alpha scaled by coverage.
    Paint(Rgba8),
    /// Destination-out: existing alpha is removed in proportion to coverage.
    Erase,
}

pub fn paint(dst: StraightRgba8, color: Rgba8, coverage: u8) -> StraightRgba8 {
    let sa = mul_div255_u16(u16::from(color.a), u16::from(coverage));
    if sa == 0 {
        return dst;
    }
    let da = mul_div255_u16(u16::from(dst[3]), 255 - sa);
    let out_a = sa + da;
    if out_a == 0 {
        return [0, 0, 0, 0];
    }

    let src = color.to_array();
    let mut out = [0u8; 4];
    for i in 0..3 {
        let num = u32::from(src[i]) * u32::from(sa)
            + u32::from(dst[i]) * u32::from(da)
            + u32::from(out_a) / 2;
        out[i] = (num / u32::from(out_a)).min(255) as u8;
    }
    out[3] = out_a.min(255) as u8;
    out
}

pub fn erase(dst: StraightRgba8, coverage: u8) -> StraightRgba8 {
    if coverage == 0 {
        return dst;
    }
    let out_a = mul_div255_u8(u16::from(dst[3]), 255 - u16::from(coverage));
    if out_a == 0 {
        return [0, 0, 0, 0];
    }
    [dst[0], dst[1], dst[2], out_a]
}

/// Apply an alpha coverage buffer onto a straight RGBA8 buffer of the same pixel count.
pub fn apply_coverage_in_place(dst: &mut [u8], coverage: &[u8], op: Compose) -> InpaintResult<()> {
    if dst.len() != coverage.len().saturating_mul(4) {
        return Err(InpaintError::validation(
            "apply_coverage_in_place expects one coverage byte per rgba8 pixel",
        ));
    }
    for (d, &c) in dst.chunks_exact_mut(4).zip(coverage) {
        apply_px(d, c, op);
    }
    Ok(())
}

/// Same as [`apply_coverage_in_place`], taking coverage from the alpha channel of an RGBA8 buffer.
pub fn apply_rgba_coverage_in_place(dst: &mut [u8], src: &[u8], op: Compose) -> InpaintResult<()> {
    if dst.len() != src.len() {
        return Err(InpaintError::validation(
            "apply_rgba_coverage_in_place expects equally sized rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        apply_px(d, s[3], op);
    }
    Ok(())
}

fn apply_px(d: &mut [u8], coverage: u8, op: Compose) {
    if coverage == 0 {
        return;
    }
    let px = [d[0], d[1], d[2], d[3]];
    let out = match op {
        Compose::Paint(color) => paint(px, color, coverage),
        Compose::Erase => erase(px, coverage),
    };
    d.copy_from_slice(&out);
}

#[cfg(test)]
#[path = "../../tests/unit/raster/composite.rs"]
mod tests;
