/*!
alignment arithmetic.
*/

/// Rounds `value` up to the next multiple of `align`.  An `align` of 0 leaves `value` unchanged.
pub const fn round_up(value: u32, align: u32) -> u32 {
    if align == 0 {
        return value;
    }
    value.div_ceil(align) * align
}

/// Like [round_up], but `None` when the result doesn't fit in a `u32`.
pub const fn checked_round_up(value: u32, align: u32) -> Option<u32> {
    if align == 0 {
        return Some(value);
    }
    value.div_ceil(align).checked_mul(align)
}

/// `bytes` as a count of 4-byte words, or `None` if it isn't a whole number of them.
pub const fn whole_words(bytes: u32) -> Option<u32> {
    if bytes % 4 == 0 { Some(bytes / 4) } else { None }
}
