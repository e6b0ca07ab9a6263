//! Shared numeric constants for the canvas crate.

// ── Hit-testing ─────────────────────────────────────────────────

/// Distance below which the pointer is considered to be grabbing the resize handle.
pub const HANDLE_PICK_RADIUS: f64 = 18.0;

/// Padding around the approximate text box, on every side.
pub const TEXT_BOX_PAD: f64 = 8.0;

/// Approximate glyph advance as a fraction of the font size.
pub const TEXT_WIDTH_FACTOR: f64 = 0.5;

/// Approximate line box height as a multiple of the font size.
pub const TEXT_HEIGHT_FACTOR: f64 = 1.3;

// ── Resize floors ───────────────────────────────────────────────

/// Smallest width/height a box-shaped shape can be resized to.
pub const MIN_BOX_EXTENT: f64 = 20.0;

/// Smallest radius a circle or star can be resized to.
pub const MIN_RADIUS: f64 = 6.0;

/// Smallest font size a text shape can be resized to.
pub const MIN_FONT_SIZE: f64 = 8.0;

// ── Rendering ───────────────────────────────────────────────────

/// Distance between consecutive text baselines as a multiple of the font size.
pub const TEXT_LINE_HEIGHT: f64 = 1.15;

/// Star inner radius is the outer radius divided by this.
pub const STAR_INNER_DIVISOR: f64 = 2.5;

/// Gap between a circle/star outline and its dashed selection ring.
pub const SELECTION_RING_GAP: f64 = 6.0;

/// Selection outline dash and gap length.
pub const SELECTION_DASH: f64 = 6.0;

/// Selection outline and handle border width.
pub const SELECTION_LINE_WIDTH: f64 = 2.0;

/// Half the side length of the square resize handle.
pub const HANDLE_HALF_SIZE: f64 = 8.0;

// ── Images ──────────────────────────────────────────────────────

/// Width cap applied when an imported image finishes decoding.
pub const IMAGE_MAX_WIDTH: f64 = 240.0;

/// Placeholder box shown while an imported image is still decoding.
pub const IMAGE_PLACEHOLDER_WIDTH: f64 = 240.0;
pub const IMAGE_PLACEHOLDER_HEIGHT: f64 = 160.0;

// ── Overlay ─────────────────────────────────────────────────────

/// Client-space offset of the floating delete control from the handle anchor.
pub const DELETE_BUTTON_OFFSET_X: f64 = 8.0;
pub const DELETE_BUTTON_OFFSET_Y: f64 = -18.0;
