//! Command-line surface (SPEC_FULL.md §4): a `clap::Parser` realising the
//! "command-line surface the core consumes" paragraph of spec.md §6.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrandArg {
    Forward,
    Reverse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Protein,
    Dna,
    DnaProtein,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum HspModeArg {
    Off,
    Greyscale,
    RedLine,
    ScoreColour,
}

/// Either a user-fixed window length, or the default "let Karlin-Altschul
/// choose" token (`K`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowArg {
    Karlin,
    Fixed(i32),
}

fn parse_window(raw: &str) -> Result<WindowArg, String> {
    if raw.eq_ignore_ascii_case("k") {
        Ok(WindowArg::Karlin)
    } else {
        raw.parse::<i32>()
            .map(WindowArg::Fixed)
            .map_err(|_| format!("'{raw}' is neither 'K' nor an integer window length"))
    }
}

/// Parse a "Q,S" starting-coordinate pair.
fn parse_coord(raw: &str) -> Result<(i64, i64), String> {
    let (q, s) = raw
        .split_once(',')
        .ok_or_else(|| format!("'{raw}' is not a Q,S pair"))?;
    let q = q
        .trim()
        .parse::<i64>()
        .map_err(|_| format!("'{q}' is not a valid coordinate"))?;
    let s = s
        .trim()
        .parse::<i64>()
        .map_err(|_| format!("'{s}' is not a valid coordinate"))?;
    Ok((q, s))
}

/// Dot-matrix sequence comparison engine and plot persistence tool.
#[derive(Parser, Debug)]
#[command(name = "dotter", author, version, about, long_about = None)]
pub struct Cli {
    /// Reference (horizontal) sequence, given literally on the command line.
    #[arg(long = "ref-seq", conflicts_with = "ref_file")]
    pub ref_seq: Option<String>,

    /// Reference sequence, read from a plain-text file instead.
    #[arg(long = "ref-file", conflicts_with = "ref_seq")]
    pub ref_file: Option<PathBuf>,

    /// Match (vertical) sequence, given literally on the command line.
    #[arg(long = "match-seq", conflicts_with = "match_file")]
    pub match_seq: Option<String>,

    /// Match sequence, read from a plain-text file instead.
    #[arg(long = "match-file", conflicts_with = "match_seq")]
    pub match_file: Option<PathBuf>,

    #[arg(long = "ref-name", default_value = "ref")]
    pub ref_name: String,

    #[arg(long = "match-name", default_value = "match")]
    pub match_name: String,

    #[arg(long = "ref-offset", default_value_t = 1)]
    pub ref_offset: i64,

    #[arg(long = "match-offset", default_value_t = 1)]
    pub match_offset: i64,

    #[arg(long = "ref-strand", value_enum, default_value_t = StrandArg::Forward)]
    pub ref_strand: StrandArg,

    #[arg(long = "match-strand", value_enum, default_value_t = StrandArg::Forward)]
    pub match_strand: StrandArg,

    /// Comparison mode: protein x protein, dna x dna, or dna x protein.
    #[arg(long, value_enum)]
    pub mode: ModeArg,

    /// Path to a BLAST-style substitution matrix file; defaults to BLOSUM62
    /// (protein modes) or the synthesised +5/-4 matrix (dna mode).
    #[arg(long)]
    pub matrix: Option<PathBuf>,

    /// Memory budget in megabytes, used to derive zoom when `--zoom` is
    /// not given or is non-positive.
    #[arg(long = "memory-limit", default_value_t = 0.5)]
    pub memory_limit: f64,

    #[arg(long)]
    pub zoom: Option<f64>,

    /// Sliding window length, or `K` to let the Karlin-Altschul estimator
    /// choose one.
    #[arg(long, value_parser = parse_window, default_value = "K")]
    pub window: WindowArg,

    #[arg(long = "pixel-fac")]
    pub pixel_fac: Option<i32>,

    /// Save the resulting plot to this path (format 3) after computing it.
    #[arg(long)]
    pub save: Option<PathBuf>,

    /// Load a previously saved plot instead of running the engine.
    #[arg(long)]
    pub load: Option<PathBuf>,

    /// Starting selected coordinate, "Q,S".
    #[arg(long, value_parser = parse_coord)]
    pub select: Option<(i64, i64)>,

    #[arg(long)]
    pub selfcomp: bool,

    #[arg(long)]
    pub mirror: bool,

    #[arg(long = "watson-only")]
    pub watson_only: bool,

    #[arg(long = "crick-only")]
    pub crick_only: bool,

    #[arg(long = "reversed-h")]
    pub reversed_h: bool,

    #[arg(long = "reversed-v")]
    pub reversed_v: bool,

    #[arg(long = "hsp-mode", value_enum, default_value_t = HspModeArg::Off)]
    pub hsp_mode: HspModeArg,

    /// Whitespace/CSV file of HSPs: qstart qend sstart send score strand.
    #[arg(long = "hsp-file")]
    pub hsp_file: Option<PathBuf>,

    #[arg(long = "greyramp-lo", default_value_t = 0)]
    pub greyramp_lo: u8,

    #[arg(long = "greyramp-hi", default_value_t = 255)]
    pub greyramp_hi: u8,
}

impl Cli {
    /// Cross-field checks clap's declarative attributes cannot express.
    /// Mirrors the teacher's `verify_cli` convention: one place collecting
    /// the checks that depend on more than one field at once.
    pub fn verify(&self) -> Result<(), String> {
        if self.ref_seq.is_none() && self.ref_file.is_none() && self.load.is_none() {
            return Err("one of --ref-seq, --ref-file, or --load is required".to_string());
        }
        if self.match_seq.is_none() && self.match_file.is_none() && self.load.is_none() {
            return Err("one of --match-seq, --match-file, or --load is required".to_string());
        }
        if self.watson_only && self.crick_only {
            return Err("--watson-only and --crick-only are mutually exclusive".to_string());
        }
        if self.mode != ModeArg::Dna && (self.watson_only || self.crick_only) {
            return Err("--watson-only/--crick-only only apply to dna mode".to_string());
        }
        if self.memory_limit <= 0.0 && self.zoom.is_none() {
            return Err("--memory-limit must be positive unless --zoom is given".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_protein_invocation() {
        let cli = Cli::parse_from([
            "dotter",
            "--ref-seq",
            "ACDEFG",
            "--match-seq",
            "ACDEFG",
            "--mode",
            "protein",
        ]);
        assert_eq!(cli.ref_seq.as_deref(), Some("ACDEFG"));
        assert_eq!(cli.mode, ModeArg::Protein);
        assert_eq!(cli.window, WindowArg::Karlin);
        cli.verify().unwrap();
    }

    #[test]
    fn rejects_missing_sequences() {
        let cli = Cli::parse_from(["dotter", "--mode", "protein"]);
        assert!(cli.verify().is_err());
    }

    #[test]
    fn window_token_parses_k_case_insensitively() {
        assert_eq!(parse_window("k"), Ok(WindowArg::Karlin));
        assert_eq!(parse_window("K"), Ok(WindowArg::Karlin));
        assert_eq!(parse_window("15"), Ok(WindowArg::Fixed(15)));
        assert!(parse_window("nope").is_err());
    }

    #[test]
    fn coord_parses_pair() {
        assert_eq!(parse_coord("10,20"), Ok((10, 20)));
        assert!(parse_coord("10").is_err());
    }

    #[test]
    fn watson_crick_are_mutually_exclusive() {
        let cli = Cli::parse_from([
            "dotter",
            "--ref-seq",
            "ACGT",
            "--match-seq",
            "ACGT",
            "--mode",
            "dna",
            "--watson-only",
            "--crick-only",
        ]);
        assert!(cli.verify().is_err());
    }
}
