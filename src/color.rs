//! RGB565 palette and packed-channel blend math.
//!
//! Everything the panel shows is 16-bit 5-6-5; the gradient lerp works on
//! the native channel ranges (r,b 0..=31, g 0..=63) so no precision is
//! invented that the panel cannot show.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;

use crate::snapshot::MarketStatus;

// Backdrop gradient endpoints, dark navy up top to a slightly lighter tone.
pub const BACKDROP_TOP: Rgb565 = Rgb565::new(1, 3, 6);
pub const BACKDROP_BOTTOM: Rgb565 = Rgb565::new(4, 10, 12);

pub const RULE: Rgb565 = Rgb565::new(12, 25, 14);
pub const TEXT: Rgb565 = Rgb565::new(28, 58, 29);
pub const TEXT_DIM: Rgb565 = Rgb565::new(14, 30, 16);
pub const FRAME: Rgb565 = Rgb565::new(10, 22, 13);

pub const GAIN: Rgb565 = Rgb565::new(4, 50, 10);
pub const LOSS: Rgb565 = Rgb565::new(28, 12, 7);
pub const NEUTRAL: Rgb565 = Rgb565::new(18, 38, 22);

pub const CHART_LINE: Rgb565 = Rgb565::new(6, 55, 20);
pub const CHART_FILL: Rgb565 = Rgb565::new(2, 14, 7);

/// Segment colors for the allocation bar, reused round-robin.
pub const ALLOC_SEGMENTS: [Rgb565; 4] = [
    Rgb565::new(5, 40, 24),
    Rgb565::new(24, 44, 6),
    Rgb565::new(10, 26, 28),
    Rgb565::new(26, 28, 10),
];

const STATUS_OPEN: Rgb565 = Rgb565::new(3, 52, 8);
const STATUS_AFTER: Rgb565 = Rgb565::new(30, 40, 4);
const STATUS_CLOSED: Rgb565 = Rgb565::new(16, 18, 10);

/// Fixed 3-way map for the market status chip.
pub fn status_color(status: MarketStatus) -> Rgb565 {
    match status {
        MarketStatus::Open => STATUS_OPEN,
        MarketStatus::AfterMarket => STATUS_AFTER,
        MarketStatus::Closed => STATUS_CLOSED,
    }
}

/// Color for the change string.
///
/// Polarity rides on a substring check for the negative marker. If the feed
/// ever drops or relocates the '-' the string silently renders as a gain;
/// known limitation of the feed format, not corrected here.
pub fn polarity_color(change: &str) -> Rgb565 {
    if change.contains('-') {
        LOSS
    } else {
        GAIN
    }
}

/// Linear blend between two packed colors, per channel, t clamped to 0..=1.
pub fn lerp565(from: Rgb565, to: Rgb565, t: f32) -> Rgb565 {
    let t = t.clamp(0.0, 1.0);
    let mix = |a: u8, b: u8| -> u8 { (a as f32 + (b as f32 - a as f32) * t).round() as u8 };
    Rgb565::new(
        mix(from.r(), to.r()),
        mix(from.g(), to.g()),
        mix(from.b(), to.b()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lerp_endpoints_are_exact() {
        assert_eq!(lerp565(BACKDROP_TOP, BACKDROP_BOTTOM, 0.0), BACKDROP_TOP);
        assert_eq!(lerp565(BACKDROP_TOP, BACKDROP_BOTTOM, 1.0), BACKDROP_BOTTOM);
        // Out-of-range t clamps instead of overshooting a channel.
        assert_eq!(lerp565(BACKDROP_TOP, BACKDROP_BOTTOM, 7.5), BACKDROP_BOTTOM);
    }

    #[test]
    fn lerp_stays_within_channel_ranges() {
        let a = Rgb565::new(0, 0, 0);
        let b = Rgb565::new(31, 63, 31);
        for i in 0..=10 {
            let c = lerp565(a, b, i as f32 / 10.0);
            assert!(c.r() <= 31 && c.g() <= 63 && c.b() <= 31);
        }
    }

    #[test]
    fn polarity_follows_the_negative_marker() {
        assert_eq!(polarity_color("-$1,200"), LOSS);
        assert_eq!(polarity_color("+$6,200"), GAIN);
        // The documented gap: no marker at all reads as a gain.
        assert_eq!(polarity_color("$6,200"), GAIN);
    }
}
