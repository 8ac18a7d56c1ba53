//! Sequence model (component C2).

use crate::alphabet::{self, ResidueKind};
use crate::error::{DotterError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strand {
    Forward,
    Reverse,
}

/// 1-based inclusive coordinate range `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range {
    pub min: i64,
    pub max: i64,
}

impl Range {
    pub fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    pub fn len(&self) -> i64 {
        self.max - self.min + 1
    }

    pub fn is_empty(&self) -> bool {
        self.max < self.min
    }

    pub fn contains(&self, pos: i64) -> bool {
        pos >= self.min && pos <= self.max
    }

    pub fn clamp(&self, pos: i64) -> i64 {
        pos.clamp(self.min, self.max)
    }
}

/// The three reading-frame peptide translations of a DNA strand, produced
/// only when the comparison mode needs them (dna x protein).
#[derive(Debug, Clone)]
pub struct FrameTranslations {
    pub frames: [Vec<u8>; 3],
}

/// An immutable (after ingest) biological sequence plus its derived caches.
#[derive(Debug, Clone)]
pub struct Sequence {
    pub name: String,
    pub residues: Vec<u8>,
    pub kind: ResidueKind,
    pub strand: Strand,
    pub full_range: Range,
    reverse_buffer: Option<Vec<u8>>,
    pub translations: Option<FrameTranslations>,
}

impl Sequence {
    /// Ingest raw text into a `Sequence`. Uppercases the text; an empty
    /// sequence is a fatal (kind-1) error. `needs_reverse` requests eager
    /// allocation of the reverse-complement (DNA) or reversed (peptide)
    /// buffer; `needs_translations` requests the three-frame peptide
    /// translation cache used by dna x protein mode.
    pub fn ingest(
        name: impl Into<String>,
        text: &[u8],
        kind: ResidueKind,
        strand: Strand,
        offset: i64,
        needs_reverse: bool,
        needs_translations: bool,
    ) -> Result<Self> {
        let name = name.into();
        if text.is_empty() {
            return Err(DotterError::EmptySequence { name });
        }
        let residues: Vec<u8> = text.iter().map(u8::to_ascii_uppercase).collect();
        let full_range = Range::new(offset, offset + residues.len() as i64 - 1);

        let reverse_buffer = if needs_reverse || strand == Strand::Reverse {
            Some(Self::build_reverse_buffer(&residues, kind))
        } else {
            None
        };

        let translations = if needs_translations && kind == ResidueKind::Dna {
            let table = alphabet::standard_genetic_code();
            let strand_bytes: &[u8] = match strand {
                Strand::Forward => &residues,
                Strand::Reverse => reverse_buffer.as_deref().unwrap_or(&residues),
            };
            let frames = [
                alphabet::translate(&strand_bytes[0.min(strand_bytes.len())..], &table),
                alphabet::translate(offset_slice(strand_bytes, 1), &table),
                alphabet::translate(offset_slice(strand_bytes, 2), &table),
            ];
            Some(FrameTranslations { frames })
        } else {
            None
        };

        Ok(Self {
            name,
            residues,
            kind,
            strand,
            full_range,
            reverse_buffer,
            translations,
        })
    }

    fn build_reverse_buffer(residues: &[u8], kind: ResidueKind) -> Vec<u8> {
        match kind {
            ResidueKind::Peptide => residues.iter().rev().copied().collect(),
            ResidueKind::Dna => residues
                .iter()
                .rev()
                .map(|&b| match alphabet::complement(b) {
                    Ok(c) => c,
                    Err(()) => {
                        tracing::warn!("invalid nucleotide '{}' has no complement", b as char);
                        b
                    }
                })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.residues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }

    /// The forward-strand residues.
    pub fn forward(&self) -> &[u8] {
        &self.residues
    }

    /// The residues on the sequence's chosen display strand.
    pub fn strand_residues(&self) -> &[u8] {
        match self.strand {
            Strand::Forward => &self.residues,
            Strand::Reverse => self.reverse_buffer.as_deref().unwrap_or(&self.residues),
        }
    }

    /// Return the residue at a 1-based display coordinate within
    /// `full_range`. `complement_it` requests the complement of the stored
    /// base rather than the base itself (used to show the opposite strand
    /// at the same coordinate without re-indexing).
    pub fn base_at(&self, display_coord: i64, complement_it: bool) -> Option<u8> {
        if !self.full_range.contains(display_coord) {
            return None;
        }
        let index = (display_coord - self.full_range.min) as usize;
        let base = self.residues.get(index).copied()?;
        if complement_it {
            alphabet::complement(base).ok()
        } else {
            Some(base)
        }
    }
}

fn offset_slice(bytes: &[u8], offset: usize) -> &[u8] {
    if offset >= bytes.len() {
        &[]
    } else {
        &bytes[offset..]
    }
}
