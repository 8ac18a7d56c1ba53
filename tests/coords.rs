//! Reverse-scale symmetry scenario (spec.md §8 scenario 4) and coordinate
//! round-trip property.

use dotter_core::alphabet::ResidueKind;
use dotter_core::coords::Projection;
use dotter_core::engine::{self, ComparisonConfig, EngineParams, Mode};
use dotter_core::matrix;
use dotter_core::sequence::{Range, Sequence, Strand};

fn make_projection(rev_h: bool) -> Projection {
    Projection {
        ref_range: Range::new(1, 20),
        match_range: Range::new(1, 20),
        zoom: 1.0,
        resfac: 1,
        rev_h,
        rev_v: false,
        left_border: 0,
        top_border: 0,
    }
}

#[test]
fn reversed_h_projection_leaves_pixmap_data_untouched() {
    let residues = b"ACDEFGHIKLMNPQRSTVWY";
    let seq = Sequence::ingest(
        "s",
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

    let forward_proj = make_projection(false);
    let reversed_proj = make_projection(true);

    let a = engine::run(&seq, &seq, &blosum, &params, config, &forward_proj).unwrap();
    let b = engine::run(&seq, &seq, &blosum, &params, config, &reversed_proj).unwrap();
    assert_eq!(a.data, b.data, "pixmap contents must not depend on rev_h");
}

#[test]
fn reversed_h_mirrors_the_pixel_mapping() {
    let proj = make_projection(true);
    assert_eq!(proj.q_to_px(1), 19);
    assert_eq!(proj.q_to_px(20), 0);
}

#[test]
fn coordinate_round_trip_modulo_resfac_snap() {
    let proj = Projection {
        ref_range: Range::new(1, 300),
        match_range: Range::new(1, 300),
        zoom: 1.0,
        resfac: 3,
        rev_h: false,
        rev_v: false,
        left_border: 0,
        top_border: 0,
    };
    for q in [1, 3, 150, 300] {
        let (x, y) = proj.map_seq_to_screen(q, q);
        let (q2, _s2) = proj.map_screen_to_seq(x, y);
        assert_eq!(q2, (q / 3) * 3, "q snaps to the nearest resfac multiple");
    }
}
