// src/gui/fonts.rs
//
// egui's bundled fonts have no CJK glyphs. Area names and labels are
// Japanese, so pick up the first system CJK font found and append it as a
// fallback to both families.

use std::sync::Arc;

use eframe::egui::{self, FontData, FontDefinitions, FontFamily};

use crate::core::fonts;

pub fn install(ctx: &egui::Context) {
    let Some(font) = fonts::find_cjk() else {
        logw!("Fonts: no CJK font found, Japanese text will not render");
        return;
    };

    let mut defs = FontDefinitions::default();
    defs.font_data.insert(s!("cjk"), Arc::new(FontData::from_owned(font.bytes)));
    for family in [FontFamily::Proportional, FontFamily::Monospace] {
        defs.families.entry(family).or_default().push(s!("cjk"));
    }
    ctx.set_fonts(defs);
    logf!("Fonts: CJK fallback from {}", font.path.display());
}
