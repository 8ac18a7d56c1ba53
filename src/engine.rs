//! Score-matrix engine (component C5): the performance-critical core that
//! produces the greyscale pixmap from two sequences, a substitution
//! matrix, the sliding-window length, zoom, and comparison configuration.

use crate::alphabet::{self, ResidueKind};
use crate::coords::{pixmap_index, Projection};
use crate::error::{DotterError, Result};
use crate::matrix::SubstitutionMatrix;
use crate::sequence::Sequence;
use rayon::prelude::*;

/// The three comparison modes (spec §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    ProteinProtein,
    DnaDna,
    DnaProtein,
}

impl Mode {
    pub fn resfac(self) -> i64 {
        match self {
            Mode::DnaProtein => 3,
            _ => 1,
        }
    }
}

/// The comparison configuration tuple (spec §3).
#[derive(Debug, Clone, Copy)]
pub struct ComparisonConfig {
    pub mode: Mode,
    pub self_compare: bool,
    pub display_mirror: bool,
    pub watson_only: bool,
    pub crick_only: bool,
}

/// A contiguous, row-major greyscale pixmap.
#[derive(Debug, Clone)]
pub struct Pixmap {
    pub width: i64,
    pub height: i64,
    pub data: Vec<u8>,
}

impl Pixmap {
    pub fn new(width: i64, height: i64) -> Self {
        Self {
            width,
            height,
            data: vec![0u8; (width * height).max(0) as usize],
        }
    }

    pub fn get(&self, q: i64, s: i64) -> Option<u8> {
        pixmap_index(self.width, q, s)
            .ok()
            .and_then(|idx| self.data.get(idx).copied())
    }

    /// Max-retaining write: keeps the brighter of the existing value and
    /// `value` at the given pixmap index. Out-of-bounds indices are
    /// reported (never written), per spec §4.5/§7 kind 2.
    pub(crate) fn write_max(&mut self, q: i64, s: i64, value: u8) {
        match pixmap_index(self.width, q, s) {
            Ok(idx) if s >= 0 && s < self.height => {
                if value > self.data[idx] {
                    self.data[idx] = value;
                }
            }
            _ => {
                tracing::error!(
                    "pixel ({q},{s}) out of bounds for pixmap {}x{}",
                    self.width,
                    self.height
                );
            }
        }
    }

    /// Combine another pixmap of identical dimensions into this one by
    /// taking the per-index maximum.
    fn merge_max(&mut self, other: &Pixmap) {
        debug_assert_eq!(self.width, other.width);
        debug_assert_eq!(self.height, other.height);
        for (a, &b) in self.data.iter_mut().zip(other.data.iter()) {
            if b > *a {
                *a = b;
            }
        }
    }
}

struct PassSpec<'a> {
    ref_codes: Vec<u8>,
    match_codes: &'a [u8],
    reverse: bool,
}

/// Parameters that vary per run, as opposed to the session-lifetime
/// sequences and matrix.
pub struct EngineParams {
    pub window: i32,
    pub pixel_fac: i32,
}

/// Run the score-matrix engine, producing a pixmap sized from `proj`.
pub fn run(
    ref_seq: &Sequence,
    match_seq: &Sequence,
    matrix: &SubstitutionMatrix,
    params: &EngineParams,
    config: ComparisonConfig,
    proj: &Projection,
) -> Result<Pixmap> {
    if params.window <= 0 {
        return Err(DotterError::AllocationFailed {
            what: "sliding window must be positive",
            size: 0,
        });
    }

    let image_width = proj.image_width();
    let image_height = proj.image_height();
    let mut pixmap = Pixmap::new(image_width, image_height);

    let match_kind = match config.mode {
        Mode::DnaProtein => ResidueKind::Peptide,
        Mode::DnaDna => ResidueKind::Dna,
        Mode::ProteinProtein => ResidueKind::Peptide,
    };
    let match_codes_fwd = encode(match_seq.forward(), match_kind);

    let passes: Vec<PassSpec> = match config.mode {
        Mode::ProteinProtein => {
            let ref_codes = encode(ref_seq.forward(), ResidueKind::Peptide);
            vec![PassSpec {
                ref_codes,
                match_codes: &match_codes_fwd,
                reverse: false,
            }]
        }
        Mode::DnaDna => {
            let ref_codes = encode(ref_seq.forward(), ResidueKind::Dna);
            let mut specs = Vec::new();
            if !config.crick_only {
                specs.push(PassSpec {
                    ref_codes: ref_codes.clone(),
                    match_codes: &match_codes_fwd,
                    reverse: false,
                });
            }
            specs
        }
        Mode::DnaProtein => {
            let translations = ref_seq
                .translations
                .as_ref()
                .expect("dna x protein mode requires ref translations");
            translations
                .frames
                .iter()
                .map(|frame| PassSpec {
                    ref_codes: encode(frame, ResidueKind::Peptide),
                    match_codes: &match_codes_fwd,
                    reverse: false,
                })
                .collect()
        }
    };

    // The Crick (reverse-strand match) pass needs its own owned codes
    // buffer, built once here so `passes` above can keep simple lifetimes.
    let match_codes_rev;
    let mut rev_pass = None;
    if config.mode == Mode::DnaDna && !config.watson_only {
        let ref_codes = encode(ref_seq.forward(), ResidueKind::Dna);
        match_codes_rev = reverse_complement_codes(match_seq);
        rev_pass = Some(PassSpec {
            ref_codes,
            match_codes: &match_codes_rev,
            reverse: true,
        });
    }

    let self_clip = config.self_compare && matches!(config.mode, Mode::ProteinProtein | Mode::DnaDna);

    // Each pass owns disjoint scratch output (its own Pixmap); results are
    // max-combined below, matching the single-writer-per-buffer contract of
    // spec §5 while letting independent passes (N x N forward/reverse, the
    // three N x P reading frames) run concurrently.
    let pass_refs: Vec<&PassSpec> = passes.iter().chain(rev_pass.iter()).collect();
    let mut results: Vec<Pixmap> = pass_refs
        .par_iter()
        .map(|pass| {
            run_pass(
                &pass.ref_codes,
                pass.match_codes,
                matrix,
                params.window,
                params.pixel_fac,
                proj.zoom,
                proj.resfac,
                self_clip,
                pass.reverse,
                match_seq.len() as i64,
                image_width,
                image_height,
            )
        })
        .collect();

    for scratch in results.drain(..) {
        pixmap.merge_max(&scratch);
    }

    if config.self_compare && config.display_mirror {
        mirror_lower_to_upper(&mut pixmap);
    }

    Ok(pixmap)
}

/// Derive a zoom factor from a memory budget `budget_mb` (spec §4.5
/// "Image-size and zoom derivation"), used when the caller supplies
/// `zoom <= 0`.
pub fn derive_zoom(ref_len: i64, match_len: i64, resfac: i64, budget_mb: f64) -> f64 {
    let peplen = ref_len as f64 / resfac as f64;
    let mb = (peplen * match_len as f64 / 1e6) - 1e-6;
    (mb / budget_mb).max(0.0).sqrt().floor() + 1.0
}

fn encode(residues: &[u8], kind: ResidueKind) -> Vec<u8> {
    residues
        .iter()
        .map(|&b| alphabet::code_of_residue(b, kind).unwrap_or(crate::alphabet::PROTEIN_UNKNOWN))
        .collect()
}

fn reverse_complement_codes(seq: &Sequence) -> Vec<u8> {
    seq.forward()
        .iter()
        .rev()
        .map(|&b| match alphabet::complement(b) {
            Ok(c) => alphabet::code_of_residue(c, ResidueKind::Dna)
                .unwrap_or(crate::alphabet::DNA_N),
            Err(()) => crate::alphabet::DNA_N,
        })
        .collect()
}

/// Run one sliding-diagonal-sum pass (spec §4.5). `ref_codes` is the
/// (already resfac-collapsed, e.g. translated) horizontal sequence's codes;
/// `match_codes` is the vertical sequence's codes in the order this pass
/// wants to stream them (already reverse-complemented for a Crick pass).
#[allow(clippy::too_many_arguments)]
fn run_pass(
    ref_codes: &[u8],
    match_codes: &[u8],
    matrix: &SubstitutionMatrix,
    window: i32,
    pixel_fac: i32,
    zoom: f64,
    _resfac: i64,
    self_clip: bool,
    reverse: bool,
    match_len: i64,
    image_width: i64,
    image_height: i64,
) -> Pixmap {
    let peplen = ref_codes.len();
    let slen = match_codes.len();
    let win2 = (window / 2) as f64;
    let mut pixmap = Pixmap::new(image_width, image_height);

    if peplen == 0 || slen == 0 {
        return pixmap;
    }

    // score_vec[r][q] = matrix[r][ref_codes[q]], precomputed once per pass.
    let mut score_vec = vec![vec![0i32; peplen]; crate::matrix::ALPHABET_SIZE];
    for (r, row) in score_vec.iter_mut().enumerate() {
        for (q, &rc) in ref_codes.iter().enumerate() {
            row[q] = matrix.score(r as u8, rc);
        }
    }

    let zero_row = vec![0i32; peplen];
    let mut sum_a = vec![0i32; peplen];
    let mut sum_b = vec![0i32; peplen];

    for s in 0..slen {
        let add_code = match_codes[s] as usize;
        let addrow = &score_vec[add_code];
        let delrow: &[i32] = if s >= window as usize {
            let del_code = match_codes[s - window as usize] as usize;
            &score_vec[del_code]
        } else {
            &zero_row
        };

        let (old, new): (&[i32], &mut [i32]) = if s == 0 {
            (&zero_row, &mut sum_a)
        } else if s % 2 == 1 {
            (&sum_a, &mut sum_b)
        } else {
            (&sum_b, &mut sum_a)
        };

        let qmax = if self_clip {
            (s + 1).min(peplen)
        } else {
            peplen
        };

        for q in 0..qmax {
            let prev = if q == 0 { 0 } else { old[q - 1] };
            // The diagonal tail being subtracted is `score(match[s-W], ref[q-W])`,
            // i.e. `delrow[q-W]`, not `delrow[q]`; columns `q < W` have no tail
            // yet and only accumulate (ramp-up), matching the row ramp-up above.
            let del = if q >= window as usize {
                delrow[q - window as usize]
            } else {
                0
            };
            let val = prev + addrow[q] - del;
            new[q] = val;

            if val > 0 && s as i32 >= window && q as i32 >= window {
                emit_pixel(
                    &mut pixmap,
                    q as f64,
                    s as f64,
                    win2,
                    zoom,
                    reverse,
                    match_len,
                    val,
                    pixel_fac,
                    window,
                );
            }
        }
    }

    pixmap
}

#[allow(clippy::too_many_arguments)]
fn emit_pixel(
    pixmap: &mut Pixmap,
    q: f64,
    s: f64,
    win2: f64,
    zoom: f64,
    reverse: bool,
    match_len: i64,
    window_sum: i32,
    pixel_fac: i32,
    window: i32,
) {
    let raw_q = q - win2;
    let dotposq = (raw_q / zoom).floor();
    let sub_q = raw_q - dotposq * zoom;

    let raw_s = if reverse {
        (match_len as f64 - 1.0) - (s - win2)
    } else {
        s - win2
    };
    let dotposs = (raw_s / zoom).floor();
    let sub_s = raw_s - dotposs * zoom;

    // Only the lower triangle of each zoom x zoom sub-cell contributes, so
    // a single diagonal writes to exactly one pixel.
    if sub_s < sub_q {
        return;
    }

    let value = (window_sum as i64 * pixel_fac as i64) / window as i64;
    let value = value.clamp(0, 255) as u8;

    pixmap.write_max(dotposq as i64, dotposs as i64, value);
}

fn mirror_lower_to_upper(pixmap: &mut Pixmap) {
    let w = pixmap.width;
    let h = pixmap.height;
    for s in 0..h {
        for q in 0..w.min(s) {
            if let Some(v) = pixmap.get(q, s) {
                pixmap.write_max(s, q, v);
            }
        }
    }
}
