//! Zero-padding for sortable file and directory names.

/// Render `number` in decimal, left-padded with `'0'` to `width` characters.
///
/// Numbers whose decimal form is already `width` characters or longer are
/// returned unchanged, never truncated.
pub fn lpad(number: u64, width: usize) -> String {
    format!("{number:0>width$}")
}

#[cfg(test)]
#[path = "pad_test.rs"]
mod tests;
