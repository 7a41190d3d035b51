/*
 *  pages.rs
 *
 *  NetWorS - worth watching
 *	(c) 2020-26 Stuart Hunter
 *
 *	TODO:
 *
 *	This program is free software: you can redistribute it and/or modify
 *	it under the terms of the GNU General Public License as published by
 *	the Free Software Foundation, either version 3 of the License, or
 *	(at your option) any later version.
 *
 *	This program is distributed in the hope that it will be useful,
 *	but WITHOUT ANY WARRANTY; without even the implied warranty of
 *	MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *	GNU General Public License for more details.
 *
 *	See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *	Public License.
 *
 */
use embedded_graphics::{
    mono_font::{
        ascii::{FONT_10X20, FONT_5X8, FONT_6X10},
        MonoFont,
    },
    pixelcolor::Rgb565,
    prelude::*,
    primitives::Rectangle,
};
use embedded_text::alignment::HorizontalAlignment;
use std::time::{Duration, Instant};

use crate::bigtext;
use crate::color;
use crate::constants::*;
use crate::draw;
use crate::snapshot::Snapshot;

/// One of the fixed rotation of layout templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Summary,
    Trend,
    Allocation,
    Gauge,
    Holding,
}

impl Page {
    pub fn from_index(index: usize) -> Self {
        match index % PAGE_COUNT {
            0 => Page::Summary,
            1 => Page::Trend,
            2 => Page::Allocation,
            3 => Page::Gauge,
            _ => Page::Holding,
        }
    }
}

/// Scheduler-owned rotation state: which page, how long it has been up, and
/// how many full laps the rotation has completed. Reset only at start.
#[derive(Debug)]
pub struct PageCursor {
    index: usize,
    laps: u32,
    switched_at: Instant,
}

impl PageCursor {
    pub fn new() -> Self {
        Self {
            index: 0,
            laps: 0,
            switched_at: Instant::now(),
        }
    }

    pub fn page(&self) -> Page {
        Page::from_index(self.index)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn laps(&self) -> u32 {
        self.laps
    }

    /// Advance to the next page, wrapping, and restart the page timer.
    pub fn advance(&mut self) {
        self.index += 1;
        if self.index == PAGE_COUNT {
            self.index = 0;
            self.laps += 1;
        }
        self.switched_at = Instant::now();
    }

    /// True once the current page has been up for a full cycle.
    pub fn due(&self, cycle: Duration) -> bool {
        self.switched_at.elapsed() >= cycle
    }

    /// Elapsed fraction of the current cycle, clamped to 0..=1.
    pub fn progress(&self, cycle: Duration) -> f32 {
        if cycle.is_zero() {
            return 1.0;
        }
        (self.switched_at.elapsed().as_secs_f32() / cycle.as_secs_f32()).clamp(0.0, 1.0)
    }
}

impl Default for PageCursor {
    fn default() -> Self {
        Self::new()
    }
}

fn text_width(font: &MonoFont, text: &str) -> u32 {
    text.chars().count() as u32 * (font.character_size.width + font.character_spacing)
}

/// Gradient, header line, market-status chip, updated stamp, and the rule
/// closing off the reserved band. Drawn before any page content.
pub fn draw_backdrop<D>(target: &mut D, snap: &Snapshot) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let band = Rectangle::new(Point::zero(), Size::new(PANEL_WIDTH, SAFE_HEIGHT));
    draw::fill_vertical_gradient(target, band, color::BACKDROP_TOP, color::BACKDROP_BOTTOM)?;

    draw::draw_text(target, "NET WORTH", CONTENT_MARGIN, 8, &FONT_6X10, color::TEXT_DIM)?;

    let chip_x = PANEL_WIDTH as i32 - CONTENT_MARGIN - STATUS_CHIP_WIDTH as i32;
    draw::draw_rectangle(
        target,
        Point::new(chip_x, 6),
        STATUS_CHIP_WIDTH,
        STATUS_CHIP_HEIGHT,
        Some(color::status_color(snap.market_status)),
        0,
        color::FRAME,
    )?;

    let stamp = format!("upd {}", snap.last_updated.format("%H:%M:%S"));
    draw::draw_text(
        target,
        &stamp,
        CONTENT_MARGIN,
        PROGRESS_BAR_Y - 12,
        &FONT_5X8,
        color::TEXT_DIM,
    )?;

    // The rule survives every clear; it is the visible edge of the band.
    draw::draw_line(
        target,
        Point::new(0, RULE_Y),
        Point::new(PANEL_WIDTH as i32 - 1, RULE_Y),
        color::RULE,
        1,
    )?;
    Ok(())
}

/// Render one page of the rotation from a snapshot copy.
pub fn render_page<D>(target: &mut D, snap: &Snapshot, page: Page, laps: u32) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    match page {
        Page::Summary => page_summary(target, snap),
        Page::Trend => page_trend(target, snap),
        Page::Allocation => page_allocation(target, snap),
        Page::Gauge => page_gauge(target, snap),
        Page::Holding => page_holding(target, snap, laps),
    }
}

fn page_summary<D>(target: &mut D, snap: &Snapshot) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let scale = bigtext::scale_for(&snap.net_worth);
    let w = bigtext::measure(&snap.net_worth, scale);
    let x = ((PANEL_WIDTH.saturating_sub(w)) / 2) as i32;
    let y = CONTENT_TOP + 20;
    bigtext::draw_big_text(target, &snap.net_worth, Point::new(x, y), scale, color::TEXT)?;

    let change_y = y + (8 * scale) as i32 + 18;
    let change_x = ((PANEL_WIDTH.saturating_sub(text_width(&FONT_10X20, &snap.change))) / 2) as i32;
    draw::draw_text(
        target,
        &snap.change,
        change_x,
        change_y,
        &FONT_10X20,
        color::polarity_color(&snap.change),
    )
}

fn page_trend<D>(target: &mut D, snap: &Snapshot) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    const CHART_HEIGHT: u32 = 160;
    let frame = Rectangle::new(
        Point::new(CONTENT_MARGIN, CONTENT_TOP),
        Size::new(CONTENT_WIDTH, CHART_HEIGHT),
    );
    draw::draw_rectangle(
        target,
        frame.top_left,
        frame.size.width,
        frame.size.height,
        None,
        1,
        color::FRAME,
    )?;

    let n = snap.history.len();
    if n < 2 {
        // Nothing to connect; the empty bordered chart is the "no data" face.
        return Ok(());
    }

    let left = frame.top_left.x + 2;
    let top = frame.top_left.y + 2;
    let iw = frame.size.width - 4;
    let ih = frame.size.height - 4;
    let bottom = top + ih as i32 - 1;

    let min = snap.history.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = snap.history.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    // A flat series still needs a span to divide by.
    let range = if max > min { max - min } else { 1.0 };

    let sample_y = |v: f64| -> i32 { bottom - (((v - min) / range) * (ih - 1) as f64).round() as i32 };
    let sample_x = |i: usize| -> i32 { left + ((i as u32 * (iw - 1)) / (n as u32 - 1)) as i32 };

    // Flood under the curve column by column, then lay the line on top.
    for col in 0..iw {
        let t = col as f64 * (n - 1) as f64 / (iw - 1) as f64;
        let i = (t.floor() as usize).min(n - 2);
        let frac = t - i as f64;
        let v = snap.history[i] + (snap.history[i + 1] - snap.history[i]) * frac;
        draw::draw_line(
            target,
            Point::new(left + col as i32, sample_y(v)),
            Point::new(left + col as i32, bottom),
            color::CHART_FILL,
            1,
        )?;
    }
    for i in 0..n - 1 {
        draw::draw_line(
            target,
            Point::new(sample_x(i), sample_y(snap.history[i])),
            Point::new(sample_x(i + 1), sample_y(snap.history[i + 1])),
            color::CHART_LINE,
            1,
        )?;
    }
    Ok(())
}

/// Integer widths for the stacked allocation bar; the drawn sum never
/// exceeds `bar_width`.
pub fn segment_widths(weights: &[f64], bar_width: u32) -> Vec<u32> {
    let total: f64 = weights.iter().filter(|w| w.is_finite() && **w > 0.0).sum();
    if total <= 0.0 {
        return Vec::new();
    }
    weights
        .iter()
        .map(|w| {
            if w.is_finite() && *w > 0.0 {
                ((w / total) * bar_width as f64).floor() as u32
            } else {
                0
            }
        })
        .collect()
}

fn page_allocation<D>(target: &mut D, snap: &Snapshot) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    draw::draw_text(target, "ALLOCATION", CONTENT_MARGIN, CONTENT_TOP, &FONT_6X10, color::TEXT)?;

    let bar_y = CONTENT_TOP + 20;
    draw::draw_rectangle(
        target,
        Point::new(CONTENT_MARGIN, bar_y),
        CONTENT_WIDTH,
        ALLOC_BAR_HEIGHT,
        None,
        1,
        color::FRAME,
    )?;

    let visible = &snap.assets[..snap.assets.len().min(ALLOC_MAX_SEGMENTS)];
    let weights: Vec<f64> = visible.iter().map(|a| a.weight).collect();
    let widths = segment_widths(&weights, CONTENT_WIDTH - 2);

    let mut x = CONTENT_MARGIN + 1;
    for (i, (asset, w)) in visible.iter().zip(widths.iter()).enumerate() {
        // Slivers keep their slot but are not drawn.
        if *w >= ALLOC_MIN_SEGMENT_WIDTH {
            draw::draw_rectangle(
                target,
                Point::new(x, bar_y + 1),
                *w,
                ALLOC_BAR_HEIGHT - 2,
                Some(color::ALLOC_SEGMENTS[i % color::ALLOC_SEGMENTS.len()]),
                0,
                color::FRAME,
            )?;
            if *w >= ALLOC_LABEL_MIN_WIDTH {
                draw::draw_text_align(
                    target,
                    &asset.symbol,
                    Point::new(x, bar_y + (ALLOC_BAR_HEIGHT as i32 - 10) / 2),
                    *w,
                    HorizontalAlignment::Center,
                    &FONT_6X10,
                    color::BACKDROP_TOP,
                )?;
            }
        }
        x += *w as i32;
    }

    // Legend rows under the bar, same order as the segments.
    let mut row_y = bar_y + ALLOC_BAR_HEIGHT as i32 + 12;
    for asset in visible {
        let line = format!("{:<6} {:>5.1}%", asset.symbol, asset.weight * 100.0);
        draw::draw_text(target, &line, CONTENT_MARGIN, row_y, &FONT_6X10, color::TEXT_DIM)?;
        row_y += 14;
    }
    Ok(())
}

fn page_gauge<D>(target: &mut D, snap: &Snapshot) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    draw::draw_text(target, "MOMENTUM", CONTENT_MARGIN, CONTENT_TOP, &FONT_6X10, color::TEXT)?;

    let value = snap.momentum.min(100);
    let value_text = format!("{}", value);
    let value_x = PANEL_WIDTH as i32 - CONTENT_MARGIN - text_width(&FONT_10X20, &value_text) as i32;
    draw::draw_text(target, &value_text, value_x, CONTENT_TOP - 4, &FONT_10X20, color::TEXT)?;

    let track_y = CONTENT_TOP + 44;
    draw::draw_rectangle(
        target,
        Point::new(CONTENT_MARGIN, track_y),
        CONTENT_WIDTH,
        GAUGE_HEIGHT,
        None,
        1,
        color::FRAME,
    )?;

    let inner_w = CONTENT_WIDTH - 2;
    let fill_w = (value as u32 * inner_w) / 100;
    let fill_color = if value > GAUGE_HIGH_THRESHOLD {
        color::GAIN
    } else if value < GAUGE_LOW_THRESHOLD {
        color::LOSS
    } else {
        color::NEUTRAL
    };
    if fill_w > 0 {
        draw::draw_rectangle(
            target,
            Point::new(CONTENT_MARGIN + 1, track_y + 1),
            fill_w,
            GAUGE_HEIGHT - 2,
            Some(fill_color),
            0,
            color::FRAME,
        )?;
    }

    // Fixed threshold markers over whatever the fill reached.
    for threshold in [GAUGE_LOW_THRESHOLD, GAUGE_HIGH_THRESHOLD] {
        let tick_x = CONTENT_MARGIN + 1 + ((threshold as u32 * inner_w) / 100) as i32;
        draw::draw_line(
            target,
            Point::new(tick_x, track_y + 1),
            Point::new(tick_x, track_y + GAUGE_HEIGHT as i32 - 2),
            color::TEXT_DIM,
            1,
        )?;
    }
    Ok(())
}

fn page_holding<D>(target: &mut D, snap: &Snapshot, laps: u32) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let card = Rectangle::new(
        Point::new((PANEL_WIDTH as i32 - 300) / 2, CONTENT_TOP + 16),
        Size::new(300, 130),
    );
    draw::draw_rectangle(
        target,
        card.top_left,
        card.size.width,
        card.size.height,
        None,
        1,
        color::FRAME,
    )?;

    if snap.assets.is_empty() {
        return draw::draw_text_align(
            target,
            "NO HOLDINGS",
            Point::new(card.top_left.x, card.top_left.y + 58),
            card.size.width,
            HorizontalAlignment::Center,
            &FONT_6X10,
            color::TEXT_DIM,
        );
    }

    // Rotate through the list one asset per completed lap of the rotation.
    let asset = &snap.assets[laps as usize % snap.assets.len()];
    let inner_x = card.top_left.x + 16;
    bigtext::draw_big_text(
        target,
        &asset.symbol,
        Point::new(inner_x, card.top_left.y + 14),
        4,
        color::TEXT,
    )?;
    draw::draw_text(
        target,
        &asset.price,
        inner_x,
        card.top_left.y + 60,
        &FONT_10X20,
        color::TEXT,
    )?;
    let weight_line = format!("{:.1}% of portfolio", asset.weight * 100.0);
    draw::draw_text(
        target,
        &weight_line,
        inner_x,
        card.top_left.y + 92,
        &FONT_6X10,
        color::TEXT_DIM,
    )
}

/// Linear indicator of how far through the page cycle we are.
pub fn draw_cycle_progress<D>(target: &mut D, fraction: f32) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let fraction = fraction.clamp(0.0, 1.0);
    draw::draw_rectangle(
        target,
        Point::new(CONTENT_MARGIN, PROGRESS_BAR_Y),
        CONTENT_WIDTH,
        PROGRESS_BAR_HEIGHT,
        None,
        1,
        color::FRAME,
    )?;
    let fill = ((CONTENT_WIDTH - 2) as f32 * fraction) as u32;
    if fill > 0 {
        draw::draw_rectangle(
            target,
            Point::new(CONTENT_MARGIN + 1, PROGRESS_BAR_Y + 1),
            fill,
            PROGRESS_BAR_HEIGHT - 2,
            Some(color::TEXT_DIM),
            0,
            color::FRAME,
        )?;
    }
    Ok(())
}
