//! Colour picker session: a saturation/lightness gradient plus a hue bar.
//!
//! Pointer coordinates are normalised to `0.0..=1.0` on both axes and
//! clamped. The picked colour stays pending until [`ColorPicker::confirm`]
//! commits it into a [`FilterState`].

use serde::{Deserialize, Serialize};

use crate::color::{Hsl, Lab, Rgb};
use crate::filter::FilterState;

/// Lightness at the vertical midpoint of the gradient.
const MID_LIGHTNESS: f32 = 50.0;

/// A colour produced by the picker, not yet committed to a filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct ColorSample {
    pub rgb: Rgb,
}

impl ColorSample {
    /// Wraps a picked colour.
    pub fn new(rgb: Rgb) -> Self {
        Self { rgb }
    }

    /// Formats as `#RRGGBB`.
    pub fn hex(&self) -> String {
        self.rgb.to_hex()
    }

    /// The sample in HSL.
    pub fn hsl(&self) -> Hsl {
        self.rgb.to_hsl()
    }

    /// The sample in L*a*b*.
    pub fn lab(&self) -> Lab {
        self.rgb.to_lab()
    }
}

/// Normalised position on the gradient.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct Cursor {
    pub x: f32,
    pub y: f32,
}

impl Cursor {
    pub const CENTER: Cursor = Cursor { x: 0.5, y: 0.5 };

    fn clamped(x: f32, y: f32) -> Self {
        Self {
            x: x.clamp(0.0, 1.0),
            y: y.clamp(0.0, 1.0),
        }
    }
}

/// The control currently being dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub enum DragTarget {
    Gradient,
    Hue,
}

/// Colour of the gradient for `hue` at normalised `(x, y)`.
///
/// Saturation grows with `x`. Each column fades from white at the top
/// through `hsl(hue, x * 100%, 50%)` at the middle to black at the bottom.
///
/// ```
/// use glyph_gallery::{Rgb, gradient_color};
///
/// assert_eq!(gradient_color(0.0, 1.0, 0.5), Rgb::new(255, 0, 0));
/// assert_eq!(gradient_color(120.0, 0.3, 0.0), Rgb::WHITE);
/// assert_eq!(gradient_color(240.0, 0.8, 1.0), Rgb::BLACK);
/// ```
pub fn gradient_color(hue: f32, x: f32, y: f32) -> Rgb {
    let Cursor { x, y } = Cursor::clamped(x, y);
    let mid = Hsl::new(hue, x * 100.0, MID_LIGHTNESS).to_rgb();
    if y <= 0.5 {
        Rgb::WHITE.mix(mid, y * 2.0)
    } else {
        mid.mix(Rgb::BLACK, (y - 0.5) * 2.0)
    }
}

/// Interactive state of the colour picker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorPicker {
    hue: f32,
    cursor: Cursor,
    pending: ColorSample,
    drag: Option<DragTarget>,
}

impl Default for ColorPicker {
    fn default() -> Self {
        Self {
            hue: 0.0,
            cursor: Cursor::CENTER,
            pending: ColorSample::new(gradient_color(0.0, Cursor::CENTER.x, Cursor::CENTER.y)),
            drag: None,
        }
    }
}

impl ColorPicker {
    /// Creates a picker at hue 0 with the cursor centred.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current hue in degrees.
    pub fn hue(&self) -> f32 {
        self.hue
    }

    /// Current gradient cursor position.
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// The colour that [`confirm`](Self::confirm) would commit.
    pub fn pending(&self) -> ColorSample {
        self.pending
    }

    /// The control being dragged, if any.
    pub fn dragging(&self) -> Option<DragTarget> {
        self.drag
    }

    /// Starts a gradient drag and samples at `(x, y)`.
    pub fn press_gradient(&mut self, x: f32, y: f32) {
        self.drag = Some(DragTarget::Gradient);
        self.move_cursor(x, y);
    }

    /// Starts a hue drag at horizontal position `x`.
    pub fn press_hue(&mut self, x: f32) {
        self.drag = Some(DragTarget::Hue);
        self.move_hue(x);
    }

    /// Follows the pointer for the active drag. Ignored when not dragging.
    pub fn move_pointer(&mut self, x: f32, y: f32) {
        match self.drag {
            Some(DragTarget::Gradient) => self.move_cursor(x, y),
            Some(DragTarget::Hue) => self.move_hue(x),
            None => {}
        }
    }

    /// Ends any drag.
    pub fn release(&mut self) {
        self.drag = None;
    }

    /// Applies typed hex input, with or without `#`.
    ///
    /// Valid input replaces the pending colour and moves the hue to match.
    /// Anything else is ignored and false is returned.
    pub fn input_hex(&mut self, text: &str) -> bool {
        let text = text.trim();
        let Some(rgb) = Rgb::from_hex(text) else {
            log::trace!("ignoring hex input {text:?}");
            return false;
        };
        self.hue = rgb.to_hsl().h;
        self.pending = ColorSample::new(rgb);
        true
    }

    /// Commits the pending colour as the colour filter.
    pub fn confirm(&self, state: FilterState) -> FilterState {
        state.with_picked_color(Some(self.pending.rgb))
    }

    /// Restores the initial hue and cursor and clears the colour filter.
    pub fn reset(&mut self, state: FilterState) -> FilterState {
        *self = Self::new();
        state.with_picked_color(None)
    }

    fn move_cursor(&mut self, x: f32, y: f32) {
        self.cursor = Cursor::clamped(x, y);
        self.resample();
    }

    fn move_hue(&mut self, x: f32) {
        self.hue = x.clamp(0.0, 1.0) * 360.0;
        self.resample();
    }

    fn resample(&mut self) {
        self.pending = ColorSample::new(gradient_color(self.hue, self.cursor.x, self.cursor.y));
    }
}
