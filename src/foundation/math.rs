pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    mul_div255_u16(x, y) as u8
}

/// Rec.601 luma of a straight RGB triple, in `[0, 255]`.
pub(crate) fn luma(r: u8, g: u8, b: u8) -> f32 {
    0.299 * f32::from(r) + 0.587 * f32::from(g) + 0.114 * f32::from(b)
}

pub(crate) fn unit_to_u8(x: f32) -> u8 {
    (x.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Euclidean distance between two points.
pub(crate) fn dist(a: kurbo::Point, b: kurbo::Point) -> f64 {
    (b - a).hypot()
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
