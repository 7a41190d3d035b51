use embedded_graphics::{
    mono_font::{MonoFont, MonoTextStyle, MonoTextStyleBuilder},
    pixelcolor::Rgb565,
    prelude::*,
    primitives::{Line, PrimitiveStyleBuilder, Rectangle},
    text::{Baseline, Text},
};

use embedded_text::{
    alignment::{HorizontalAlignment, VerticalAlignment},
    style::TextBoxStyleBuilder,
    TextBox,
};

use crate::color;

pub fn draw_line<D>(
    target: &mut D,
    start: Point,
    end: Point,
    color: Rgb565,
    width: u32,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    Line::new(start, end)
        .into_styled(
            PrimitiveStyleBuilder::new()
                .stroke_width(width)
                .stroke_color(color)
                .build(),
        )
        .draw(target)?;
    Ok(())
}

/// Clears a rectangular region of the target buffer to the given color.
pub fn clear_region<D>(target: &mut D, region: Rectangle, color: Rgb565) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    region
        .into_styled(PrimitiveStyleBuilder::new().fill_color(color).build())
        .draw(target)?;
    Ok(())
}

pub fn draw_text<D>(
    target: &mut D,
    text: &str,
    x: i32,
    y: i32,
    font: &MonoFont,
    color: Rgb565,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    Text::with_baseline(
        text,
        Point::new(x, y),
        MonoTextStyleBuilder::new()
            .font(font)
            .text_color(color)
            .build(),
        Baseline::Top,
    )
    .draw(target)?;
    Ok(())
}

/// Text constrained to a box, horizontally aligned within `length`.
pub fn draw_text_align<D>(
    target: &mut D,
    text: &str,
    top_left: Point,
    length: u32,
    align: HorizontalAlignment,
    font: &MonoFont,
    color: Rgb565,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let h = font.character_size.height;
    let character_style = MonoTextStyle::new(font, color);
    let textbox_style = TextBoxStyleBuilder::new()
        .alignment(align)
        .vertical_alignment(VerticalAlignment::Middle)
        .build();
    let label_rect = Rectangle::new(top_left, Size::new(length, h));
    TextBox::with_textbox_style(text, label_rect, character_style, textbox_style).draw(target)?;
    Ok(())
}

pub fn draw_rectangle<D>(
    target: &mut D,
    top_left: Point,
    w: u32,
    h: u32,
    fill: Option<Rgb565>,
    border_width: u32,
    border_color: Rgb565,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let mut style = PrimitiveStyleBuilder::new()
        .stroke_color(border_color)
        .stroke_width(border_width);
    if let Some(fill) = fill {
        style = style.fill_color(fill);
    }
    Rectangle::new(top_left, Size::new(w, h))
        .into_styled(style.build())
        .draw(target)?;
    Ok(())
}

/// Fixed vertical gradient across `region`, `from` on the top row to `to` on
/// the bottom row. Recomputed every frame; decoration only.
pub fn fill_vertical_gradient<D>(
    target: &mut D,
    region: Rectangle,
    from: Rgb565,
    to: Rgb565,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let rows = region.size.height;
    if rows == 0 {
        return Ok(());
    }
    let span = (rows - 1).max(1) as f32;
    for row in 0..rows {
        let shade = color::lerp565(from, to, row as f32 / span);
        Rectangle::new(
            Point::new(region.top_left.x, region.top_left.y + row as i32),
            Size::new(region.size.width, 1),
        )
        .into_styled(PrimitiveStyleBuilder::new().fill_color(shade).build())
        .draw(target)?;
    }
    Ok(())
}
