mod cli;

use clap::Parser;
use cli::{Cli, HspModeArg, ModeArg, StrandArg, WindowArg};
use colored::Colorize;
use dotter_core::alphabet::ResidueKind;
use dotter_core::engine::{self, ComparisonConfig, EngineParams, Mode};
use dotter_core::hsp::{Hsp, HspMode};
use dotter_core::karlin::{self, PROTEIN_FREQUENCIES};
use dotter_core::matrix::{self, ALPHABET_SIZE};
use dotter_core::persist;
use dotter_core::sequence::{Range, Sequence, Strand};
use dotter_core::view::ViewState;
use std::path::Path;
use std::process::ExitCode;

fn main() -> ExitCode {
    dotter_core::logging::init();
    let cli = Cli::parse();
    if let Err(reason) = cli.verify() {
        eprintln!("{} {reason}", "error:".red().bold());
        return ExitCode::FAILURE;
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {err}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> dotter_core::Result<()> {
    if let Some(path) = &cli.load {
        return load_and_report(path);
    }

    let mode = resolve_mode(cli.mode);
    let ref_kind = if cli.mode == ModeArg::Protein {
        ResidueKind::Peptide
    } else {
        ResidueKind::Dna
    };
    let match_kind = if cli.mode == ModeArg::Dna {
        ResidueKind::Dna
    } else {
        ResidueKind::Peptide
    };

    let ref_text = read_seq_arg(&cli.ref_seq, &cli.ref_file)?;
    let match_text = read_seq_arg(&cli.match_seq, &cli.match_file)?;

    let needs_translation = mode == Mode::DnaProtein;
    let ref_seq = Sequence::ingest(
        cli.ref_name.clone(),
        ref_text.as_bytes(),
        ref_kind,
        resolve_strand(cli.ref_strand),
        cli.ref_offset,
        false,
        needs_translation,
    )?;
    let match_seq = Sequence::ingest(
        cli.match_name.clone(),
        match_text.as_bytes(),
        match_kind,
        resolve_strand(cli.match_strand),
        cli.match_offset,
        mode == Mode::DnaDna,
        false,
    )?;

    let substitution_matrix = match &cli.matrix {
        Some(path) => matrix::load_matrix(path)?,
        None => match mode {
            Mode::DnaDna => matrix::synth_dna_matrix(),
            _ => matrix::blosum62(),
        },
    };

    let freq = composition_vector(mode, &ref_seq, &match_seq);
    let user_window = match cli.window {
        WindowArg::Karlin => None,
        WindowArg::Fixed(w) => Some(w),
    };
    let estimate = karlin::estimate_window(&substitution_matrix, &freq, user_window);
    let window = estimate.window;
    let pixel_fac = cli
        .pixel_fac
        .unwrap_or_else(|| karlin::default_pixel_fac(estimate.expected_score));

    let resfac = mode.resfac();
    let zoom = match cli.zoom {
        Some(z) if z > 0.0 => z,
        _ => engine::derive_zoom(
            ref_seq.len() as i64,
            match_seq.len() as i64,
            resfac,
            cli.memory_limit,
        ),
    };

    let projection = dotter_core::coords::Projection {
        ref_range: ref_seq.full_range,
        match_range: match_seq.full_range,
        zoom,
        resfac,
        rev_h: cli.reversed_h,
        rev_v: cli.reversed_v,
        left_border: 0,
        top_border: 0,
    };

    let total_dots = (projection.image_width() as i64) * (projection.image_height() as i64);
    tracing::info!(
        "computing {}x{} pixmap ({} dots) at zoom {:.2}, window {window}",
        projection.image_width(),
        projection.image_height(),
        total_dots,
        zoom
    );

    let config = ComparisonConfig {
        mode,
        self_compare: cli.selfcomp,
        display_mirror: cli.mirror,
        watson_only: cli.watson_only,
        crick_only: cli.crick_only,
    };
    let params = EngineParams { window, pixel_fac };

    let started = std::time::Instant::now();
    let pixmap = engine::run(&ref_seq, &match_seq, &substitution_matrix, &params, config, &projection)?;
    let elapsed = started.elapsed();

    let mut view = ViewState::new(ref_seq.full_range, match_seq.full_range, zoom);
    if let Some((q, s)) = cli.select {
        view.set_selection(q, s);
    }

    let mut active_pixmap = pixmap.clone();
    if cli.hsp_mode != HspModeArg::Off {
        if let Some(hsp_path) = &cli.hsp_file {
            let hsps = read_hsp_file(hsp_path, &cli.match_name)?;
            let hsp_mode = resolve_hsp_mode(cli.hsp_mode);
            let mut hsp_pixmap = engine::Pixmap::new(pixmap.width, pixmap.height);
            let lines = dotter_core::hsp::rasterize(
                &hsps,
                hsp_mode,
                &cli.match_name,
                &projection,
                &mut hsp_pixmap,
            );
            if hsp_mode == HspMode::Greyscale {
                active_pixmap = hsp_pixmap;
            }
            tracing::info!("rasterised {} HSP(s), {} vector line(s)", hsps.len(), lines.len());
        }
    }

    let table = dotter_core::greyramp::build_table(cli.greyramp_lo, cli.greyramp_hi);
    let _display_image = dotter_core::greyramp::apply(&table, &active_pixmap.data);

    print_summary(&projection, window, estimate.expected_score, pixel_fac, elapsed, view.selection());

    if let Some(save_path) = &cli.save {
        persist::save(
            save_path,
            zoom,
            projection.image_width() as i32,
            projection.image_height() as i32,
            pixel_fac,
            window,
            &substitution_matrix.name,
            &substitution_matrix.values,
            &pixmap.data,
        )?;
        println!("{} {}", "saved:".green().bold(), save_path.display());
    }

    Ok(())
}

fn resolve_mode(mode: ModeArg) -> Mode {
    match mode {
        ModeArg::Protein => Mode::ProteinProtein,
        ModeArg::Dna => Mode::DnaDna,
        ModeArg::DnaProtein => Mode::DnaProtein,
    }
}

fn resolve_strand(strand: StrandArg) -> Strand {
    match strand {
        StrandArg::Forward => Strand::Forward,
        StrandArg::Reverse => Strand::Reverse,
    }
}

fn resolve_hsp_mode(mode: HspModeArg) -> HspMode {
    match mode {
        HspModeArg::Off => HspMode::Off,
        HspModeArg::Greyscale => HspMode::Greyscale,
        HspModeArg::RedLine => HspMode::RedLine,
        HspModeArg::ScoreColour => HspMode::ScoreColour,
    }
}

fn read_seq_arg(literal: &Option<String>, file: &Option<std::path::PathBuf>) -> dotter_core::Result<String> {
    if let Some(text) = literal {
        return Ok(text.clone());
    }
    let path = file.as_ref().expect("cli.verify() guarantees one of the two is set");
    std::fs::read_to_string(path)
        .map(|s| s.split_whitespace().collect::<String>())
        .map_err(|source| dotter_core::DotterError::Io {
            path: path.clone(),
            source,
        })
}

fn composition_vector(
    mode: Mode,
    ref_seq: &Sequence,
    match_seq: &Sequence,
) -> [f64; ALPHABET_SIZE] {
    if mode == Mode::DnaDna {
        let mut counts = [0u64; ALPHABET_SIZE];
        let mut total = 0u64;
        for seq in [ref_seq, match_seq] {
            for &b in seq.forward() {
                if let Some(code) = dotter_core::alphabet::code_of_residue(b, ResidueKind::Dna) {
                    counts[code as usize] += 1;
                    total += 1;
                }
            }
        }
        let mut freq = [0.0; ALPHABET_SIZE];
        if total > 0 {
            for (i, &c) in counts.iter().enumerate() {
                freq[i] = c as f64 / total as f64;
            }
        }
        freq
    } else {
        let entries: Vec<(u8, f64)> = PROTEIN_FREQUENCIES
            .iter()
            .enumerate()
            .map(|(i, &f)| (i as u8, f))
            .collect();
        karlin::expand_frequencies(&entries)
    }
}

fn read_hsp_file(path: &Path, match_name: &str) -> dotter_core::Result<Vec<Hsp>> {
    let text = std::fs::read_to_string(path).map_err(|source| dotter_core::DotterError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut hsps = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let fields: Vec<&str> = line.split(|c: char| c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .collect();
        if fields.len() < 6 {
            tracing::warn!("skipping malformed HSP line: '{line}'");
            continue;
        }
        let (Ok(qs), Ok(qe), Ok(ss), Ok(se), Ok(score)) = (
            fields[0].parse::<i64>(),
            fields[1].parse::<i64>(),
            fields[2].parse::<i64>(),
            fields[3].parse::<i64>(),
            fields[4].parse::<i32>(),
        ) else {
            tracing::warn!("skipping malformed HSP line: '{line}'");
            continue;
        };
        let strand = if fields[5].eq_ignore_ascii_case("reverse") {
            Strand::Reverse
        } else {
            Strand::Forward
        };
        hsps.push(Hsp {
            match_name: match_name.to_string(),
            q_range: Range::new(qs, qe),
            s_range: Range::new(ss, se),
            score,
            strand,
        });
    }
    Ok(hsps)
}

fn load_and_report(path: &Path) -> dotter_core::Result<()> {
    let plot = persist::load(path)?;
    println!("{}", "loaded plot".cyan().bold());
    println!("  format       : {}", plot.format);
    println!("  dimensions   : {} x {}", plot.width, plot.height);
    println!("  zoom         : {:.3}", plot.zoom);
    println!("  window (W)   : {}", plot.window);
    println!("  pixel_fac    : {}", plot.pixel_fac);
    if !plot.matrix_name.is_empty() {
        println!("  matrix       : {}", plot.matrix_name);
    }
    println!("  pixel count  : {}", plot.pixels.len());
    Ok(())
}

fn print_summary(
    projection: &dotter_core::coords::Projection,
    window: i32,
    expected_score: f64,
    pixel_fac: i32,
    elapsed: std::time::Duration,
    selection: (i64, i64),
) {
    println!("{}", "dot-matrix plot".cyan().bold());
    println!(
        "  image        : {} x {}",
        projection.image_width(),
        projection.image_height()
    );
    println!("  zoom         : {:.3}", projection.zoom);
    println!("  window (W)   : {window}");
    println!("  expected (E) : {expected_score:.3}");
    println!("  pixel_fac    : {pixel_fac}");
    println!("  elapsed      : {:.3}s", elapsed.as_secs_f64());
    println!("  selection    : ({}, {})", selection.0, selection.1);
}
