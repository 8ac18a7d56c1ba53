//! Persistence (component C8): the binary save file, three format versions.
//!
//! Formats 1 and 2 were historically written in the host's native byte
//! order; this implementation commits formats 3 (and the writer) to
//! little-endian on the wire per spec §9, always byte-swapping on
//! big-endian hosts regardless of who wrote the file.

use crate::error::{DotterError, Result};
use crate::matrix::ALPHABET_SIZE;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Cursor, Read, Write};
use std::path::Path;

const MAX_MATRIX_NAME_LEN: usize = 80;
const FORMAT1_DEFAULT_PIXEL_FAC: i32 = 50;
const FORMAT1_DEFAULT_WINDOW: i32 = 25;

/// Everything the loader recovers from a save file, authoritative over
/// anything the caller might otherwise re-derive from live sequences.
#[derive(Debug, Clone, PartialEq)]
pub struct SavedPlot {
    pub format: u8,
    pub zoom: f64,
    pub width: i32,
    pub height: i32,
    pub pixel_fac: i32,
    pub window: i32,
    pub matrix_name: String,
    pub matrix: [[i32; ALPHABET_SIZE]; ALPHABET_SIZE],
    pub pixels: Vec<u8>,
}

/// Write a plot to `path` in the current writer format (3): `f64` zoom,
/// width-precise 32-bit ints, and the full substitution matrix.
pub fn save(
    path: &Path,
    zoom: f64,
    width: i32,
    height: i32,
    pixel_fac: i32,
    window: i32,
    matrix_name: &str,
    matrix: &[[i32; ALPHABET_SIZE]; ALPHABET_SIZE],
    pixels: &[u8],
) -> Result<()> {
    if matrix_name.len() > MAX_MATRIX_NAME_LEN {
        return Err(DotterError::MatrixNameTooLong(matrix_name.len()));
    }
    let expected = (width as i64 * height as i64) as usize;
    if pixels.len() != expected {
        return Err(DotterError::WrongPixelCount {
            path: path.to_path_buf(),
            found: pixels.len(),
            expected,
        });
    }

    let mut buf = Vec::new();
    buf.write_u8(3).unwrap();
    buf.write_f64::<LittleEndian>(zoom).unwrap();
    buf.write_i32::<LittleEndian>(width).unwrap();
    buf.write_i32::<LittleEndian>(height).unwrap();
    buf.write_i32::<LittleEndian>(pixel_fac).unwrap();
    buf.write_i32::<LittleEndian>(window).unwrap();
    buf.write_i32::<LittleEndian>(matrix_name.len() as i32)
        .unwrap();
    buf.write_all(matrix_name.as_bytes()).unwrap();
    for row in matrix.iter() {
        for &cell in row.iter() {
            buf.write_i32::<LittleEndian>(cell).unwrap();
        }
    }
    buf.write_all(pixels).unwrap();

    std::fs::write(path, buf).map_err(|source| DotterError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a plot, inferring its format from the first byte.
pub fn load(path: &Path) -> Result<SavedPlot> {
    let bytes = std::fs::read(path).map_err(|source| DotterError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&bytes, path)
}

fn parse(bytes: &[u8], path: &Path) -> Result<SavedPlot> {
    let mut cursor = Cursor::new(bytes);
    let format = read_u8(&mut cursor, path)?;

    match format {
        1 => parse_format1(&mut cursor, path),
        2 => parse_format2(&mut cursor, path),
        3 => parse_format3(&mut cursor, path),
        other => Err(DotterError::UnknownFormat(other)),
    }
}

fn parse_format1(cursor: &mut Cursor<&[u8]>, path: &Path) -> Result<SavedPlot> {
    let zoom = read_i32(cursor, path)? as f64;
    let width = read_i32(cursor, path)?;
    let height = read_i32(cursor, path)?;
    let pixels = read_remaining(cursor, path)?;

    let expected = (width as i64 * height as i64) as usize;
    if pixels.len() != expected {
        return Err(DotterError::WrongPixelCount {
            path: path.to_path_buf(),
            found: pixels.len(),
            expected,
        });
    }

    tracing::warn!(
        "save file '{}' is format 1; defaulting W={FORMAT1_DEFAULT_WINDOW}, pixel_fac={FORMAT1_DEFAULT_PIXEL_FAC}",
        path.display()
    );

    Ok(SavedPlot {
        format: 1,
        zoom,
        width,
        height,
        pixel_fac: FORMAT1_DEFAULT_PIXEL_FAC,
        window: FORMAT1_DEFAULT_WINDOW,
        matrix_name: String::new(),
        matrix: [[0; ALPHABET_SIZE]; ALPHABET_SIZE],
        pixels,
    })
}

fn parse_format2(cursor: &mut Cursor<&[u8]>, path: &Path) -> Result<SavedPlot> {
    let zoom = read_i32(cursor, path)? as f64;
    let width = read_i32(cursor, path)?;
    let height = read_i32(cursor, path)?;
    let pixel_fac = read_i32(cursor, path)?;
    let window = read_i32(cursor, path)?;
    let (matrix_name, matrix) = read_matrix_block(cursor, path)?;
    let pixels = read_remaining(cursor, path)?;

    let expected = (width as i64 * height as i64) as usize;
    if pixels.len() != expected {
        return Err(DotterError::WrongPixelCount {
            path: path.to_path_buf(),
            found: pixels.len(),
            expected,
        });
    }

    Ok(SavedPlot {
        format: 2,
        zoom,
        width,
        height,
        pixel_fac,
        window,
        matrix_name,
        matrix,
        pixels,
    })
}

fn parse_format3(cursor: &mut Cursor<&[u8]>, path: &Path) -> Result<SavedPlot> {
    let zoom = read_f64(cursor, path)?;
    let width = read_i32(cursor, path)?;
    let height = read_i32(cursor, path)?;
    let pixel_fac = read_i32(cursor, path)?;
    let window = read_i32(cursor, path)?;
    let (matrix_name, matrix) = read_matrix_block(cursor, path)?;
    let pixels = read_remaining(cursor, path)?;

    let expected = (width as i64 * height as i64) as usize;
    if pixels.len() != expected {
        return Err(DotterError::WrongPixelCount {
            path: path.to_path_buf(),
            found: pixels.len(),
            expected,
        });
    }

    Ok(SavedPlot {
        format: 3,
        zoom,
        width,
        height,
        pixel_fac,
        window,
        matrix_name,
        matrix,
        pixels,
    })
}

fn read_matrix_block(
    cursor: &mut Cursor<&[u8]>,
    path: &Path,
) -> Result<(String, [[i32; ALPHABET_SIZE]; ALPHABET_SIZE])> {
    let name_len = read_i32(cursor, path)? as usize;
    if name_len > MAX_MATRIX_NAME_LEN {
        return Err(DotterError::MatrixNameTooLong(name_len));
    }
    let mut name_bytes = vec![0u8; name_len];
    cursor
        .read_exact(&mut name_bytes)
        .map_err(|source| DotterError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    let matrix_name = String::from_utf8_lossy(&name_bytes).into_owned();

    let mut matrix = [[0i32; ALPHABET_SIZE]; ALPHABET_SIZE];
    for row in matrix.iter_mut() {
        for cell in row.iter_mut() {
            *cell = read_i32(cursor, path)?;
        }
    }
    Ok((matrix_name, matrix))
}

fn read_remaining(cursor: &mut Cursor<&[u8]>, path: &Path) -> Result<Vec<u8>> {
    let mut pixels = Vec::new();
    cursor
        .read_to_end(&mut pixels)
        .map_err(|source| DotterError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(pixels)
}

fn read_u8(cursor: &mut Cursor<&[u8]>, path: &Path) -> Result<u8> {
    cursor.read_u8().map_err(|source| DotterError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn read_i32(cursor: &mut Cursor<&[u8]>, path: &Path) -> Result<i32> {
    cursor
        .read_i32::<LittleEndian>()
        .map_err(|source| DotterError::Io {
            path: path.to_path_buf(),
            source,
        })
}

fn read_f64(cursor: &mut Cursor<&[u8]>, path: &Path) -> Result<f64> {
    cursor
        .read_f64::<LittleEndian>()
        .map_err(|source| DotterError::Io {
            path: path.to_path_buf(),
            source,
        })
}
