use crate::foundation::math::mul_div255_u8;

pub type PremulRgba8 = [u8; 4];

/// Porter-Duff source-over on premultiplied pixels.
pub fn over(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    let sa = src[3];
    if sa == 0 {
        return dst;
    }
    if sa == 255 {
        return src;
    }

    let inv = 255u16 - u16::from(sa);
    let mut out = [0u8; 4];
    for i in 0..4 {
        out[i] = src[i].saturating_add(mul_div255(u16::from(dst[i]), inv));
    }
    out
}

/// Blend a premultiplied source pixel onto a straight-alpha destination pixel in place.
///
/// An opaque destination stays opaque and only needs `src + dst * (1 - a)`.
pub fn over_straight_in_place(dst: &mut [u8], src: PremulRgba8) {
    let sa = src[3];
    if sa == 0 {
        return;
    }
    if dst[3] == 255 {
        let inv = 255u16 - u16::from(sa);
        for i in 0..3 {
            dst[i] = src[i].saturating_add(mul_div255(u16::from(dst[i]), inv));
        }
        return;
    }

    let out = unpremultiply(over(premultiply([dst[0], dst[1], dst[2], dst[3]]), src));
    dst[..4].copy_from_slice(&out);
}

pub fn premultiply(px: [u8; 4]) -> PremulRgba8 {
    let a = u16::from(px[3]);
    [
        mul_div255(u16::from(px[0]), a),
        mul_div255(u16::from(px[1]), a),
        mul_div255(u16::from(px[2]), a),
        px[3],
    ]
}

pub fn unpremultiply(px: PremulRgba8) -> [u8; 4] {
    let a = u32::from(px[3]);
    if a == 0 {
        return [0, 0, 0, 0];
    }
    let un = |c: u8| ((u32::from(c) * 255 + a / 2) / a).min(255) as u8;
    [un(px[0]), un(px[1]), un(px[2]), px[3]]
}

/// Scale the colour of a premultiplied pixel, keeping it a valid premultiplied value.
pub fn scale_color(px: PremulRgba8, gain: f32) -> PremulRgba8 {
    if gain == 1.0 {
        return px;
    }
    let a = f32::from(px[3]);
    let s = |c: u8| (f32::from(c) * gain).round().clamp(0.0, a) as u8;
    [s(px[0]), s(px[1]), s(px[2]), px[3]]
}

fn mul_div255(x: u16, y: u16) -> u8 {
    mul_div255_u8(x, y)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/composite.rs"]
mod tests;
