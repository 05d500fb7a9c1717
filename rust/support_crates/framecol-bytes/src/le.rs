//! Bounds-checked little-endian reads at absolute offsets.
//!
//! All functions return `None` when the requested bytes are not fully contained
//! in the source slice.

#[inline]
fn array_at<const N: usize>(src: &[u8], offset: usize) -> Option<[u8; N]> {
    let end = offset.checked_add(N)?;
    src.get(offset..end)?.try_into().ok()
}

#[inline]
pub fn read_u8(src: &[u8], offset: usize) -> Option<u8> {
    src.get(offset).copied()
}

#[inline]
pub fn read_u32(src: &[u8], offset: usize) -> Option<u32> {
    array_at(src, offset).map(u32::from_le_bytes)
}

#[inline]
pub fn read_i32(src: &[u8], offset: usize) -> Option<i32> {
    array_at(src, offset).map(i32::from_le_bytes)
}

#[inline]
pub fn read_u64(src: &[u8], offset: usize) -> Option<u64> {
    array_at(src, offset).map(u64::from_le_bytes)
}

/// Returns the `index`-th `u32` of a packed little-endian `u32` table starting at `base`.
#[inline]
pub fn read_u32_at_index(src: &[u8], base: usize, index: usize) -> Option<u32> {
    read_u32(src, base.checked_add(index.checked_mul(4)?)?)
}

/// Returns the `index`-th `i32` of a packed little-endian `i32` table starting at `base`.
#[inline]
pub fn read_i32_at_index(src: &[u8], base: usize, index: usize) -> Option<i32> {
    read_i32(src, base.checked_add(index.checked_mul(4)?)?)
}

/// Reinterprets `src` as a slice of `T` without copying.
///
/// Returns `None` if the slice is misaligned for `T` or its length is not a
/// multiple of `size_of::<T>()`. Frame data is little-endian, so the cast is only
/// meaningful on little-endian targets; callers fall back to per-value decoding
/// elsewhere.
#[inline]
pub fn try_cast_values<T: bytemuck::Pod>(src: &[u8]) -> Option<&[T]> {
    if cfg!(target_endian = "little") {
        bytemuck::try_cast_slice(src).ok()
    } else {
        None
    }
}
