//! Deterministic per-username colors
//!
//! Rolling hash over the username (`hash = code + hash * 31`, 32-bit
//! wrapping), with the low three bytes taken as RGB channels. Stable for a
//! given string, cosmetic only -- no collision or distribution guarantee.

use ratatui::style::Color;

/// Rolling hash over UTF-16 code units.
pub fn username_hash(name: &str) -> i32 {
    let mut hash: i32 = 0;
    for code in name.encode_utf16() {
        hash = (code as i32).wrapping_add((hash << 5).wrapping_sub(hash));
    }
    hash
}

/// Header / avatar-badge color for a username.
pub fn username_color(name: &str) -> Color {
    let hash = username_hash(name);
    let r = (hash & 0xFF) as u8;
    let g = ((hash >> 8) & 0xFF) as u8;
    let b = ((hash >> 16) & 0xFF) as u8;
    Color::Rgb(r, g, b)
}
