//! Coordinate projection (component C3): bijections between sequence
//! coordinate, pixmap index, and on-screen pixel.

use crate::error::{DotterError, Result};
use crate::sequence::Range;

/// The display/window context needed to project between coordinate spaces.
#[derive(Debug, Clone, Copy)]
pub struct Projection {
    pub ref_range: Range,
    pub match_range: Range,
    pub zoom: f64,
    pub resfac: i64,
    pub rev_h: bool,
    pub rev_v: bool,
    pub left_border: i64,
    pub top_border: i64,
}

impl Projection {
    pub fn sf_h(&self) -> f64 {
        self.zoom * self.resfac as f64
    }

    pub fn sf_v(&self) -> f64 {
        self.zoom
    }

    /// Reference-sequence coordinate -> pixel column.
    pub fn q_to_px(&self, q: i64) -> i64 {
        let rel = if self.rev_h {
            (self.ref_range.max - q) as f64
        } else {
            (q - self.ref_range.min) as f64
        };
        (rel / self.sf_h()).floor() as i64 + self.left_border
    }

    /// Match-sequence coordinate -> pixel row.
    pub fn s_to_py(&self, s: i64) -> i64 {
        let rel = if self.rev_v {
            (self.match_range.max - s) as f64
        } else {
            (s - self.match_range.min) as f64
        };
        (rel / self.sf_v()).floor() as i64 + self.top_border
    }

    /// Pixel column -> reference-sequence coordinate, rounded to the
    /// nearest `resfac` and clamped into `ref_range`.
    pub fn px_to_q(&self, x: i64) -> i64 {
        let px = x - self.left_border;
        let rel = px as f64 * self.sf_h();
        let q = if self.rev_h {
            self.ref_range.max - rel.round() as i64
        } else {
            self.ref_range.min + rel.round() as i64
        };
        let snapped = (q / self.resfac) * self.resfac;
        self.ref_range.clamp(snapped)
    }

    /// Pixel row -> match-sequence coordinate, rounded to the nearest
    /// integer and clamped into `match_range`.
    pub fn py_to_s(&self, y: i64) -> i64 {
        let py = y - self.top_border;
        let rel = py as f64 * self.sf_v();
        let s = if self.rev_v {
            self.match_range.max - rel.round() as i64
        } else {
            self.match_range.min + rel.round() as i64
        };
        self.match_range.clamp(s)
    }

    pub fn map_screen_to_seq(&self, x: i64, y: i64) -> (i64, i64) {
        (self.px_to_q(x), self.py_to_s(y))
    }

    pub fn map_seq_to_screen(&self, q: i64, s: i64) -> (i64, i64) {
        (self.q_to_px(q), self.s_to_py(s))
    }

    pub fn image_width(&self) -> i64 {
        round_up_to_multiple_of_4(
            (self.ref_range.len() as f64 / self.resfac as f64 / self.zoom).ceil() as i64,
        )
    }

    pub fn image_height(&self) -> i64 {
        round_up_to_multiple_of_4((self.match_range.len() as f64 / self.zoom).ceil() as i64)
    }
}

fn round_up_to_multiple_of_4(n: i64) -> i64 {
    (n + 3) & !3
}

/// `pixmap_index(pixmap_q, pixmap_s) = pixmap_s * image_width + pixmap_q`.
/// Out-of-bounds indexing is a programmer error and is reported, not
/// silently clamped.
pub fn pixmap_index(image_width: i64, pixmap_q: i64, pixmap_s: i64) -> Result<usize> {
    if pixmap_q < 0 || pixmap_q >= image_width {
        return Err(DotterError::PixelOutOfBounds {
            index: pixmap_q.max(0) as usize,
            len: image_width as usize,
        });
    }
    Ok((pixmap_s * image_width + pixmap_q) as usize)
}
