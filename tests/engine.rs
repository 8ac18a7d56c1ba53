//! End-to-end scenarios for the score-matrix engine (spec.md §8).

use dotter_core::alphabet::ResidueKind;
use dotter_core::coords::Projection;
use dotter_core::engine::{self, ComparisonConfig, EngineParams, Mode};
use dotter_core::matrix;
use dotter_core::sequence::{Range, Sequence, Strand};

fn projection(ref_len: i64, match_len: i64, resfac: i64) -> Projection {
    Projection {
        ref_range: Range::new(1, ref_len),
        match_range: Range::new(1, match_len),
        zoom: 1.0,
        resfac,
        rev_h: false,
        rev_v: false,
        left_border: 0,
        top_border: 0,
    }
}

#[test]
fn pp_identity_main_diagonal_dominates() {
    let residues = b"ACDEFGHIKLMNPQRSTVWY";
    let seq = Sequence::ingest(
        "aa",
        residues,
        ResidueKind::Peptide,
        Strand::Forward,
        1,
        false,
        false,
    )
    .unwrap();
    let blosum = matrix::blosum62();
    let config = ComparisonConfig {
        mode: Mode::ProteinProtein,
        self_compare: false,
        display_mirror: false,
        watson_only: false,
        crick_only: false,
    };
    let params = EngineParams {
        window: 5,
        pixel_fac: 50,
    };
    let proj = projection(20, 20, 1);
    let pixmap = engine::run(&seq, &seq, &blosum, &params, config, &proj).unwrap();

    for i in 4..20 {
        let diag = pixmap.get(i, i).unwrap();
        for j in 0..20 {
            if j != i {
                let off = pixmap.get(j, i).unwrap_or(0);
                assert!(diag >= off, "diagonal {i} ({diag}) should dominate off-diagonal {j} ({off})");
            }
        }
    }
}

#[test]
fn nn_self_mirror_is_symmetric_with_periodic_secondary_diagonal() {
    // Restricted to the Watson (forward) strand: the self-compare triangle
    // clip and the forward scale transform share the same affine form on
    // both axes, which is what makes the post-hoc mirror exact. Pairing
    // the clip with the Crick (reverse) pass as well is a documented open
    // question (DESIGN.md) since the reverse scale transform is not
    // affine-compatible with a same-index triangle clip.
    let residues = b"ACGTACGTACGT";
    let seq = Sequence::ingest(
        "dna",
        residues,
        ResidueKind::Dna,
        Strand::Forward,
        1,
        true,
        false,
    )
    .unwrap();
    let dna_matrix = matrix::synth_dna_matrix();
    let config = ComparisonConfig {
        mode: Mode::DnaDna,
        self_compare: true,
        display_mirror: true,
        watson_only: true,
        crick_only: false,
    };
    let params = EngineParams {
        window: 3,
        pixel_fac: 50,
    };
    let proj = projection(12, 12, 1);
    let pixmap = engine::run(&seq, &seq, &dna_matrix, &params, config, &proj).unwrap();

    for q in 0..pixmap.width {
        for s in 0..pixmap.height {
            assert_eq!(pixmap.get(q, s), pixmap.get(s, q));
        }
    }
    // Main diagonal should be bright (identical residues throughout).
    // The last loop row/column (index 11, needing a sliding-window
    // centre one past the sequence's last residue) never gets written,
    // so the checked range stops one short of the full width/height.
    for i in 2..11 {
        assert!(pixmap.get(i, i).unwrap() > 0);
    }
}

#[test]
fn dna_protein_three_frame_lights_up_atg_codon_positions() {
    let dna = b"ATGGCGATGGCGATGGCG";
    let protein = b"MAMAMA";
    let ref_seq = Sequence::ingest(
        "dna",
        dna,
        ResidueKind::Dna,
        Strand::Forward,
        1,
        false,
        true,
    )
    .unwrap();
    let match_seq = Sequence::ingest(
        "prot",
        protein,
        ResidueKind::Peptide,
        Strand::Forward,
        1,
        false,
        false,
    )
    .unwrap();
    let blosum = matrix::blosum62();
    let config = ComparisonConfig {
        mode: Mode::DnaProtein,
        self_compare: false,
        display_mirror: false,
        watson_only: false,
        crick_only: false,
    };
    let params = EngineParams {
        window: 3,
        pixel_fac: 50,
    };
    let proj = projection(18, 6, 3);
    let pixmap = engine::run(&ref_seq, &match_seq, &blosum, &params, config, &proj).unwrap();

    // Frame 0 (offset 0) is in-frame with the repeating ATG/GCG codons.
    // Row s=2 is the first row past the W=3 warm-up and corresponds to
    // the 'M' at protein position 2 ("MAMAMA"[2]); it should show at
    // least one bright pixel at a q aligned to a translated codon.
    let row_has_signal = (0..pixmap.width).any(|q| pixmap.get(q, 2).unwrap_or(0) > 0);
    assert!(row_has_signal, "expected at least one lit pixel in the M row");
}

#[test]
fn saturation_never_exceeds_255_even_with_huge_pixel_fac() {
    let residues = b"ACDEFGHIKLMNPQRSTVWY";
    let seq = Sequence::ingest(
        "aa",
        residues,
        ResidueKind::Peptide,
        Strand::Forward,
        1,
        false,
        false,
    )
    .unwrap();
    let blosum = matrix::blosum62();
    let config = ComparisonConfig {
        mode: Mode::ProteinProtein,
        self_compare: false,
        display_mirror: false,
        watson_only: false,
        crick_only: false,
    };
    let params = EngineParams {
        window: 5,
        pixel_fac: 100_000,
    };
    let proj = projection(20, 20, 1);
    let pixmap = engine::run(&seq, &seq, &blosum, &params, config, &proj).unwrap();
    assert!(pixmap.data.iter().all(|&v| v <= 255));
}

#[test]
fn second_run_on_same_inputs_is_identical() {
    let residues = b"ACDEFGHIKLMNPQRSTVWY";
    let seq = Sequence::ingest(
        "aa",
        residues,
        ResidueKind::Peptide,
        Strand::Forward,
        1,
        false,
        false,
    )
    .unwrap();
    let blosum = matrix::blosum62();
    let config = ComparisonConfig {
        mode: Mode::ProteinProtein,
        self_compare: false,
        display_mirror: false,
        watson_only: false,
        crick_only: false,
    };
    let params = EngineParams {
        window: 5,
        pixel_fac: 50,
    };
    let proj = projection(20, 20, 1);
    let a = engine::run(&seq, &seq, &blosum, &params, config, &proj).unwrap();
    let b = engine::run(&seq, &seq, &blosum, &params, config, &proj).unwrap();
    assert_eq!(a.data, b.data);
}
