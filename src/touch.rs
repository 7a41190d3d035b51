//! Resistive touch overlay, reduced to the one thing the loop asks of it:
//! "was the panel touched since last poll".

use embedded_graphics::prelude::Point;

pub trait TouchPort: Send {
    /// One non-blocking poll; `Some` carries the raw panel coordinate.
    fn poll(&mut self) -> Option<Point>;
}

/// Stand-in for builds without the overlay wired up.
#[derive(Debug, Default)]
pub struct NoTouch;

impl TouchPort for NoTouch {
    fn poll(&mut self) -> Option<Point> {
        None
    }
}
