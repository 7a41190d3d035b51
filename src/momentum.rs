//! Momentum score over the portfolio history series.
//!
//! A 14-period simple-average RSI: bounded to 0..=100, neutral 50 while the
//! series is too short to say anything.

/// Number of deltas averaged on each side.
pub const PERIOD: usize = 14;

/// Score returned while fewer than `PERIOD + 1` samples exist.
pub const NEUTRAL: u8 = 50;

/// Compute the momentum score for a history series, oldest sample first.
///
/// Total over its input domain: degenerate and empty input yield `NEUTRAL`.
pub fn momentum(history: &[f64]) -> u8 {
    if history.len() < PERIOD + 1 {
        return NEUTRAL;
    }

    // Deltas over the most recent PERIOD steps, each split into a gain or a
    // loss bucket with the other side recording zero.
    let recent = &history[history.len() - (PERIOD + 1)..];
    let mut gain_sum = 0.0f64;
    let mut loss_sum = 0.0f64;
    for pair in recent.windows(2) {
        let delta = pair[1] - pair[0];
        if delta >= 0.0 {
            gain_sum += delta;
        } else {
            loss_sum += -delta;
        }
    }

    let avg_gain = gain_sum / PERIOD as f64;
    let avg_loss = loss_sum / PERIOD as f64;

    if avg_loss == 0.0 {
        return 100;
    }

    let rs = avg_gain / avg_loss;
    (100.0 - 100.0 / (1.0 + rs)).round() as u8
}
