// src/core/fonts.rs
//
// System font lookup shared by the viewer and the PNG renderer. Area names
// and chart labels are Japanese, so CJK faces come first; Latin faces are a
// last resort that still covers the English labels.

use std::path::PathBuf;

/// Overrides the search with an explicit `.ttf`/`.otf`/`.ttc` path.
pub const FONT_ENV: &str = "HOUSE_TREND_FONT";

pub const CJK_CANDIDATES: &[&str] = &[
    "C:\\Windows\\Fonts\\meiryo.ttc",
    "C:\\Windows\\Fonts\\msgothic.ttc",
    "/System/Library/Fonts/ヒラギノ角ゴシック W3.ttc",
    "/System/Library/Fonts/Hiragino Sans GB.ttc",
    "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/noto-cjk/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/google-noto-cjk/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/truetype/fonts-japanese-gothic.ttf",
];

pub const LATIN_CANDIDATES: &[&str] = &[
    "C:\\Windows\\Fonts\\arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
];

/// Raw bytes of a font file and where they came from.
pub struct FontFile {
    pub path: PathBuf,
    pub bytes: Vec<u8>,
    pub cjk: bool,
}

fn read(path: &str, cjk: bool) -> Option<FontFile> {
    std::fs::read(path).ok().map(|bytes| FontFile { path: PathBuf::from(path), bytes, cjk })
}

/// The env override, else the first CJK face on this machine.
pub fn find_cjk() -> Option<FontFile> {
    if let Ok(path) = std::env::var(FONT_ENV) {
        match read(&path, true) {
            Some(f) => return Some(f),
            None => logw!("Fonts: {FONT_ENV}={path} is not readable, searching system fonts"),
        }
    }
    CJK_CANDIDATES.iter().find_map(|p| read(p, true))
}

/// A CJK face if there is one, else a Latin one.
pub fn find_any() -> Option<FontFile> {
    find_cjk().or_else(|| LATIN_CANDIDATES.iter().find_map(|p| read(p, false)))
}
