//! Integer range mapping

/// Linearly remap `v` from `[in_lo, in_hi]` to `[out_lo, out_hi]`.
///
/// Integer division truncates toward zero; callers tolerate the
/// resulting quantization. Inputs outside the source interval
/// extrapolate, so clamp wherever the output range is a hard bound.
/// Requires `in_lo != in_hi`.
pub fn remap(v: i32, in_lo: i32, in_hi: i32, out_lo: i32, out_hi: i32) -> i32 {
    out_lo + (v - in_lo) * (out_hi - out_lo) / (in_hi - in_lo)
}
