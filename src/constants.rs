//! This module contains global constants used across the render and page modules.

/// The total width of the LCD panel in pixels.
pub const PANEL_WIDTH: u32 = 480;
/// The total height of the LCD panel in pixels.
pub const PANEL_HEIGHT: u32 = 320;

/// Height of the reserved band actually used for dynamic content.
/// Rows below it stay blank; driving them aggravates a panel tearing artifact.
pub const SAFE_HEIGHT: u32 = 240;
/// Y-position of the 1-px rule closing off the reserved band.
/// Redrawn after every clear.
pub const RULE_Y: i32 = SAFE_HEIGHT as i32 - 1;

/// Horizontal padding applied to page content inside the reserved band.
pub const CONTENT_MARGIN: i32 = 10;
/// Usable content width between the margins.
pub const CONTENT_WIDTH: u32 = PANEL_WIDTH - 2 * CONTENT_MARGIN as u32;

/// Number of page layouts in the rotation.
pub const PAGE_COUNT: usize = 5;

/// Y-position where page content starts (below the header line).
pub const CONTENT_TOP: i32 = 28;

// Market status chip (top-right of the header line)
pub const STATUS_CHIP_WIDTH: u32 = 14;
pub const STATUS_CHIP_HEIGHT: u32 = 14;

/// Big-text scale for the net worth figure while it still fits.
pub const NET_WORTH_SCALE: u32 = 10;
/// Reduced scale once the figure exceeds `NET_WORTH_SCALE_BREAK` characters.
pub const NET_WORTH_SCALE_COMPACT: u32 = 7;
pub const NET_WORTH_SCALE_BREAK: usize = 7;

// Allocation bar (page 3)
/// Segments narrower than this are not drawn.
pub const ALLOC_MIN_SEGMENT_WIDTH: u32 = 12;
/// Segments at least this wide get their symbol drawn inside.
pub const ALLOC_LABEL_MIN_WIDTH: u32 = 48;
/// Visible segment cap regardless of asset list length.
pub const ALLOC_MAX_SEGMENTS: usize = 4;
pub const ALLOC_BAR_HEIGHT: u32 = 56;

// Momentum gauge (page 4)
pub const GAUGE_HEIGHT: u32 = 40;
/// Band boundaries for the gauge fill color.
pub const GAUGE_LOW_THRESHOLD: u8 = 30;
pub const GAUGE_HIGH_THRESHOLD: u8 = 70;

// Page-cycle progress bar along the bottom of the reserved band
pub const PROGRESS_BAR_HEIGHT: u32 = 4;
pub const PROGRESS_BAR_Y: i32 = RULE_Y - 10;
