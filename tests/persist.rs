//! Save/load round-trip scenario (spec.md §8 scenario 5).

use dotter_core::alphabet::ResidueKind;
use dotter_core::coords::Projection;
use dotter_core::engine::{self, ComparisonConfig, EngineParams, Mode};
use dotter_core::matrix;
use dotter_core::persist;
use dotter_core::sequence::{Range, Sequence, Strand};

#[test]
fn forty_by_forty_pixmap_round_trips_through_format_three() {
    let residues: Vec<u8> = (0..40)
        .map(|i| b"ACDEFGHIKLMNPQRSTVWY"[i % 20])
        .collect();
    let seq = Sequence::ingest(
        "s",
        &residues,
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
    let proj = Projection {
        ref_range: Range::new(1, 40),
        match_range: Range::new(1, 40),
        zoom: 1.0,
        resfac: 1,
        rev_h: false,
        rev_v: false,
        left_border: 0,
        top_border: 0,
    };
    let pixmap = engine::run(&seq, &seq, &blosum, &params, config, &proj).unwrap();
    assert_eq!(pixmap.width, 40);
    assert_eq!(pixmap.height, 40);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("roundtrip.dotter");
    persist::save(
        &path,
        proj.zoom,
        pixmap.width as i32,
        pixmap.height as i32,
        params.pixel_fac,
        params.window,
        &blosum.name,
        &blosum.values,
        &pixmap.data,
    )
    .unwrap();

    let loaded = persist::load(&path).unwrap();
    assert_eq!(loaded.format, 3);
    assert_eq!(loaded.width, 40);
    assert_eq!(loaded.height, 40);
    assert_eq!(loaded.window, 5);
    assert_eq!(loaded.matrix_name, blosum.name);
    assert_eq!(loaded.matrix, blosum.values);
    assert_eq!(loaded.pixels, pixmap.data);
}
