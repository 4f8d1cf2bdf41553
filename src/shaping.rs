//! Arabic text preparation for a renderer that only draws glyph runs
//! left-to-right.
//!
//! Logical-order Arabic has to be reshaped into joined presentation forms and
//! reordered into visual order before it can be handed to the PDF text
//! primitive. Both transforms come from external collaborators; nothing here
//! implements the shaping algorithm itself.

use arabic_reshaper::arabic_reshape;
use unicode_bidi::BidiInfo;

/// Prepare `text` for left-to-right rendering.
///
/// Text without any Arabic script is returned unchanged. The output is a
/// presentation transform of the input: feeding it back in is not guaranteed
/// to be a no-op.
pub fn shape(text: &str) -> String {
    if !contains_arabic(text) {
        return text.to_string();
    }

    let reshaped = arabic_reshape(text);
    let bidi = BidiInfo::new(&reshaped, None);
    let mut visual = String::with_capacity(reshaped.len());
    for paragraph in &bidi.paragraphs {
        visual.push_str(&bidi.reorder_line(paragraph, paragraph.range.clone()));
    }
    visual
}

/// True if any character falls in an Arabic script block, including the
/// presentation-form blocks produced by reshaping.
fn contains_arabic(text: &str) -> bool {
    text.chars().any(|c| {
        matches!(c,
            '\u{0600}'..='\u{06FF}'
                | '\u{0750}'..='\u{077F}'
                | '\u{08A0}'..='\u{08FF}'
                | '\u{FB50}'..='\u{FDFF}'
                | '\u{FE70}'..='\u{FEFF}')
    })
}
