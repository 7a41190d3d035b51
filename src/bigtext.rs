//! Scaled bitmap text for the headline figures.
//!
//! The small panel font tops out at 20 px; the net worth figure needs to be
//! readable across a room. Each string is rendered once into a monochrome
//! cell buffer with the 5x8 base font, then every set bit is exploded into a
//! scale x scale filled block. One primitive, reused by every page that
//! draws large text.

use embedded_graphics::{
    mono_font::{ascii::FONT_5X8, MonoTextStyle},
    pixelcolor::{BinaryColor, Rgb565},
    prelude::*,
    primitives::{PrimitiveStyle, Rectangle},
    text::{Baseline, Text},
};

use crate::constants::{NET_WORTH_SCALE, NET_WORTH_SCALE_BREAK, NET_WORTH_SCALE_COMPACT};
use crate::vframebuf::VarFrameBuf;

/// Width of one glyph cell in the base font, spacing included.
fn cell_width() -> u32 {
    FONT_5X8.character_size.width + FONT_5X8.character_spacing
}

/// Pixel width `text` will occupy at `scale`.
pub fn measure(text: &str, scale: u32) -> u32 {
    text.chars().count() as u32 * cell_width() * scale
}

/// Two-tier auto scale: drop to the compact tier once the string is long
/// enough to overflow the fixed-width panel at full scale.
pub fn scale_for(text: &str) -> u32 {
    if text.chars().count() > NET_WORTH_SCALE_BREAK {
        NET_WORTH_SCALE_COMPACT
    } else {
        NET_WORTH_SCALE
    }
}

/// Draw `text` at `top_left`, each font bit as a scale x scale block.
pub fn draw_big_text<D>(
    target: &mut D,
    text: &str,
    top_left: Point,
    scale: u32,
    color: Rgb565,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let cols = text.chars().count() as u32 * cell_width();
    let rows = FONT_5X8.character_size.height;
    if cols == 0 {
        return Ok(());
    }

    // Glyph pass: the string at 1:1 into a throwaway monochrome cell buffer.
    let mut cells = VarFrameBuf::new(cols, rows, BinaryColor::Off);
    let style = MonoTextStyle::new(&FONT_5X8, BinaryColor::On);
    // The cell buffer cannot fail to draw.
    let _ = Text::with_baseline(text, Point::zero(), style, Baseline::Top).draw(&mut cells);

    // Block pass: one filled square per set bit.
    let block = PrimitiveStyle::with_fill(color);
    for y in 0..rows as i32 {
        for x in 0..cols as i32 {
            if cells.get(Point::new(x, y)) == Some(BinaryColor::On) {
                Rectangle::new(
                    Point::new(
                        top_left.x + x * scale as i32,
                        top_left.y + y * scale as i32,
                    ),
                    Size::new(scale, scale),
                )
                .into_styled(block)
                .draw(target)?;
            }
        }
    }
    Ok(())
}
