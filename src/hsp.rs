//! HSP rasteriser (component C7): renders pre-computed high-scoring pairs
//! either into the HSP greyscale pixmap or as a vector overlay.

use crate::coords::Projection;
use crate::engine::Pixmap;
use crate::sequence::{Range, Strand};

/// A previously computed local alignment between the two sequences.
#[derive(Debug, Clone)]
pub struct Hsp {
    pub match_name: String,
    pub q_range: Range,
    pub s_range: Range,
    pub score: i32,
    pub strand: Strand,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HspMode {
    Off,
    Greyscale,
    RedLine,
    ScoreColour,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineColour {
    DarkRed,
    Magenta,
    Red,
}

impl LineColour {
    /// The three-bucket colour policy for SCORE_COLOUR mode.
    pub fn for_score(score: i32) -> Self {
        if score < 75 {
            LineColour::DarkRed
        } else if score < 100 {
            LineColour::Magenta
        } else {
            LineColour::Red
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct VectorLine {
    pub x0: i64,
    pub y0: i64,
    pub x1: i64,
    pub y1: i64,
    pub colour: LineColour,
}

/// Rasterise `hsps` belonging to `active_match_name` according to `mode`.
/// GREYSCALE writes into `hsp_pixmap` (max-retaining) and returns no lines;
/// RED_LINE/SCORE_COLOUR return vector lines and leave `hsp_pixmap`
/// untouched; OFF does nothing.
pub fn rasterize(
    hsps: &[Hsp],
    mode: HspMode,
    active_match_name: &str,
    proj: &Projection,
    hsp_pixmap: &mut Pixmap,
) -> Vec<VectorLine> {
    if mode == HspMode::Off {
        return Vec::new();
    }

    let mut lines = Vec::new();
    for hsp in hsps.iter().filter(|h| h.match_name == active_match_name) {
        if !proj.ref_range.contains(hsp.q_range.min)
            && !proj.ref_range.contains(hsp.q_range.max)
        {
            tracing::warn!(
                "HSP ({}..{}, {}..{}) falls outside the reference range; skipped",
                hsp.q_range.min,
                hsp.q_range.max,
                hsp.s_range.min,
                hsp.s_range.max
            );
            continue;
        }

        let (x0, y0) = snap_endpoint(proj, hsp.q_range.min, hsp.s_range.min, hsp.strand);
        let (x1, y1) = snap_endpoint(proj, hsp.q_range.max, hsp.s_range.max, hsp.strand);

        match mode {
            HspMode::Off => unreachable!(),
            HspMode::Greyscale => {
                let value = hsp.score.clamp(0, 255) as u8;
                draw_line(hsp_pixmap, x0, y0, x1, y1, value);
            }
            HspMode::RedLine => lines.push(VectorLine {
                x0,
                y0,
                x1,
                y1,
                colour: LineColour::Red,
            }),
            HspMode::ScoreColour => lines.push(VectorLine {
                x0,
                y0,
                x1,
                y1,
                colour: LineColour::for_score(hsp.score),
            }),
        }
    }
    lines
}

/// Project a sequence endpoint to screen, applying the same "legal
/// sub-cell" rule used by the score-matrix engine (§4.5): on the reverse
/// strand the chosen sub-row within a zoom cell is the far edge rather than
/// the near one, so rendered lines line up with the dots the engine wrote.
fn snap_endpoint(proj: &Projection, q: i64, s: i64, strand: Strand) -> (i64, i64) {
    let x = proj.q_to_px(q);
    let zoom_cells = proj.zoom.floor().max(1.0) as i64;
    let y = match strand {
        Strand::Forward => proj.s_to_py(s),
        Strand::Reverse => proj.s_to_py(s + zoom_cells - 1),
    };
    (x, y)
}

/// Bresenham's line algorithm, max-retaining each pixel written.
fn draw_line(pixmap: &mut Pixmap, x0: i64, y0: i64, x1: i64, y1: i64, value: u8) {
    let (mut x, mut y) = (x0, y0);
    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        pixmap.write_max(x, y, value);
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}
