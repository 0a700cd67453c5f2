//! Millimetre geometry helpers for the card designer.
//!
//! All card geometry is expressed in millimetres as `f64` and persisted
//! rounded to two decimals so stored payloads diff and compare stably.
//! Legacy draft payloads may carry partially invalid numbers, so every
//! externally supplied value is coerced through [`to_finite_number`]
//! before use.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Minimum width/height of a design element in millimetres.
pub const MIN_ELEMENT_SIZE_MM: f64 = 0.5;

/// Default width for an element whose payload carries no usable width.
pub const DEFAULT_ELEMENT_WIDTH_MM: f64 = 20.0;

/// Default height for an element whose payload carries no usable height.
pub const DEFAULT_ELEMENT_HEIGHT_MM: f64 = 8.0;

// ---------------------------------------------------------------------------
// Rect
// ---------------------------------------------------------------------------

/// An axis-aligned rectangle in millimetres (origin top-left).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RectMm {
    pub x_mm: f64,
    pub y_mm: f64,
    pub width_mm: f64,
    pub height_mm: f64,
}

// ---------------------------------------------------------------------------
// Rounding and coercion
// ---------------------------------------------------------------------------

/// Round a millimetre value to two decimal places.
///
/// All geometry must pass through this before storage.
pub fn round_mm(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Coerce a JSON value to a finite `f64`, falling back on `fallback` for
/// missing, non-numeric, NaN, or infinite input.
pub fn to_finite_number(v: Option<&serde_json::Value>, fallback: f64) -> f64 {
    match v.and_then(serde_json::Value::as_f64) {
        Some(n) if n.is_finite() => n,
        _ => fallback,
    }
}

// ---------------------------------------------------------------------------
// Clamping
// ---------------------------------------------------------------------------

/// Clamp a rectangle so it lies fully inside a `canvas_w` x `canvas_h`
/// canvas.
///
/// Order matters: size is clamped to `[MIN_ELEMENT_SIZE_MM, canvas]`
/// first, then position to `[0, canvas - size]`, then size once more
/// against the now-fixed position so neither dimension can push the
/// element outside the bounds. Idempotent: a second application is a
/// no-op.
pub fn clamp_rect_to_canvas(rect: RectMm, canvas_w: f64, canvas_h: f64) -> RectMm {
    let width = rect.width_mm.clamp(MIN_ELEMENT_SIZE_MM, canvas_w.max(MIN_ELEMENT_SIZE_MM));
    let height = rect.height_mm.clamp(MIN_ELEMENT_SIZE_MM, canvas_h.max(MIN_ELEMENT_SIZE_MM));

    let x = rect.x_mm.clamp(0.0, (canvas_w - width).max(0.0));
    let y = rect.y_mm.clamp(0.0, (canvas_h - height).max(0.0));

    // Re-clamp size against the fixed position.
    let width = width.min((canvas_w - x).max(MIN_ELEMENT_SIZE_MM));
    let height = height.min((canvas_h - y).max(MIN_ELEMENT_SIZE_MM));

    RectMm {
        x_mm: x,
        y_mm: y,
        width_mm: width,
        height_mm: height,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // -- round_mm --

    #[test]
    fn rounds_to_two_decimals() {
        assert_eq!(round_mm(10.005), 10.01);
        assert_eq!(round_mm(85.6), 85.6);
        assert_eq!(round_mm(53.984), 53.98);
    }

    #[test]
    fn rounding_is_idempotent() {
        let v = round_mm(12.3456);
        assert_eq!(round_mm(v), v);
    }

    // -- to_finite_number --

    #[test]
    fn numeric_value_passes_through() {
        assert_eq!(to_finite_number(Some(&json!(12.5)), 0.0), 12.5);
        assert_eq!(to_finite_number(Some(&json!(7)), 0.0), 7.0);
    }

    #[test]
    fn missing_value_falls_back() {
        assert_eq!(to_finite_number(None, 20.0), 20.0);
    }

    #[test]
    fn non_numeric_value_falls_back() {
        assert_eq!(to_finite_number(Some(&json!("abc")), 8.0), 8.0);
        assert_eq!(to_finite_number(Some(&json!(null)), 8.0), 8.0);
        assert_eq!(to_finite_number(Some(&json!([1, 2])), 8.0), 8.0);
    }

    // -- clamp_rect_to_canvas --

    #[test]
    fn rect_inside_canvas_is_unchanged() {
        let rect = RectMm {
            x_mm: 2.0,
            y_mm: 2.0,
            width_mm: 30.0,
            height_mm: 8.0,
        };
        assert_eq!(clamp_rect_to_canvas(rect, 85.6, 53.98), rect);
    }

    #[test]
    fn oversized_rect_is_shrunk_to_canvas() {
        let rect = RectMm {
            x_mm: 0.0,
            y_mm: 0.0,
            width_mm: 200.0,
            height_mm: 100.0,
        };
        let clamped = clamp_rect_to_canvas(rect, 85.6, 53.98);
        assert_eq!(clamped.width_mm, 85.6);
        assert_eq!(clamped.height_mm, 53.98);
    }

    #[test]
    fn rect_past_right_edge_is_pulled_back() {
        let rect = RectMm {
            x_mm: 80.0,
            y_mm: 0.0,
            width_mm: 20.0,
            height_mm: 8.0,
        };
        let clamped = clamp_rect_to_canvas(rect, 85.6, 53.98);
        assert_eq!(clamped.x_mm, 65.6);
        assert_eq!(clamped.width_mm, 20.0);
    }

    #[test]
    fn negative_position_is_clamped_to_origin() {
        let rect = RectMm {
            x_mm: -5.0,
            y_mm: -3.0,
            width_mm: 10.0,
            height_mm: 10.0,
        };
        let clamped = clamp_rect_to_canvas(rect, 85.6, 53.98);
        assert_eq!(clamped.x_mm, 0.0);
        assert_eq!(clamped.y_mm, 0.0);
    }

    #[test]
    fn tiny_size_is_floored_at_minimum() {
        let rect = RectMm {
            x_mm: 1.0,
            y_mm: 1.0,
            width_mm: 0.0,
            height_mm: 0.1,
        };
        let clamped = clamp_rect_to_canvas(rect, 85.6, 53.98);
        assert_eq!(clamped.width_mm, MIN_ELEMENT_SIZE_MM);
        assert_eq!(clamped.height_mm, MIN_ELEMENT_SIZE_MM);
    }

    #[test]
    fn clamping_is_idempotent() {
        let cases = [
            RectMm { x_mm: -10.0, y_mm: 999.0, width_mm: 0.0, height_mm: 500.0 },
            RectMm { x_mm: 84.0, y_mm: 53.0, width_mm: 40.0, height_mm: 40.0 },
            RectMm { x_mm: 2.0, y_mm: 2.0, width_mm: 30.0, height_mm: 8.0 },
            RectMm { x_mm: 0.0, y_mm: 0.0, width_mm: 0.5, height_mm: 0.5 },
        ];
        for rect in cases {
            let once = clamp_rect_to_canvas(rect, 85.6, 53.98);
            let twice = clamp_rect_to_canvas(once, 85.6, 53.98);
            assert_eq!(once, twice, "clamp not idempotent for {rect:?}");
        }
    }
}
