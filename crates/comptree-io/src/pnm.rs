//! Binary PNM subset
//!
//! Readers and writers for the two raster formats the workspace consumes:
//! binary PGM (`P5`, 8- and 16-bit grayscale) and binary PPM (`P6`, RGB).
//!
//! Header fields are ASCII whitespace-delimited tokens; `#` starts a
//! comment line that runs to the newline. A single whitespace byte
//! separates the maxval field from the raster. 16-bit rasters are
//! big-endian. Readers never scale sample values.

use std::io::{BufRead, BufReader, Read, Write};

use comptree_core::{Image, Rgb};
use log::warn;

use crate::error::{IoError, IoResult};

fn bad_header(what: &str) -> IoError {
    warn!("PNM header error: {what}");
    IoError::BadHeader(what.to_string())
}

/// Skip whitespace and `#` comment lines, then read one token.
fn next_token<R: BufRead>(reader: &mut R) -> IoResult<String> {
    loop {
        let buf = reader.fill_buf()?;
        if buf.is_empty() {
            return Err(bad_header("unexpected end of header"));
        }
        match buf[0] {
            b'#' => {
                let mut line = String::new();
                reader.read_line(&mut line)?;
            }
            b if b.is_ascii_whitespace() => reader.consume(1),
            _ => break,
        }
    }

    let mut token = Vec::new();
    loop {
        let buf = reader.fill_buf()?;
        if buf.is_empty() {
            break;
        }
        let b = buf[0];
        if b.is_ascii_whitespace() {
            break;
        }
        token.push(b);
        reader.consume(1);
    }
    String::from_utf8(token).map_err(|_| bad_header("non-ASCII header token"))
}

fn next_number<R: BufRead>(reader: &mut R) -> IoResult<u32> {
    let token = next_token(reader)?;
    token
        .parse()
        .map_err(|_| bad_header(&format!("expected number, got {token:?}")))
}

struct PnmHeader {
    width: u32,
    height: u32,
    maxval: u32,
}

/// Parse `magic width height maxval` and consume the single separator
/// byte before the raster.
fn read_header<R: BufRead>(reader: &mut R, expect_magic: &str) -> IoResult<PnmHeader> {
    let magic = next_token(reader)?;
    if magic != expect_magic {
        warn!("PNM magic mismatch: expected {expect_magic}, got {magic}");
        return Err(IoError::UnsupportedFormat(format!(
            "expected {expect_magic}, got {magic}"
        )));
    }
    let width = next_number(reader)?;
    let height = next_number(reader)?;
    let maxval = next_number(reader)?;
    if width == 0 || height == 0 {
        return Err(bad_header("zero image dimension"));
    }

    // exactly one whitespace byte separates the header from the raster
    let mut sep = [0u8; 1];
    reader.read_exact(&mut sep)?;
    if !sep[0].is_ascii_whitespace() {
        return Err(bad_header("missing raster separator"));
    }

    Ok(PnmHeader {
        width,
        height,
        maxval,
    })
}

/// Read a binary 8-bit PGM (`P5`) image.
///
/// # Errors
///
/// [`IoError::UnsupportedFormat`] for a non-`P5` magic or `maxval >= 256`,
/// [`IoError::BadHeader`] for malformed headers, [`IoError::Io`] for a
/// truncated raster.
pub fn read_pgm<R: Read>(reader: R) -> IoResult<Image<u8>> {
    let mut reader = BufReader::new(reader);
    let header = read_header(&mut reader, "P5")?;
    if header.maxval >= 256 {
        warn!("PGM maxval {} out of 8-bit range", header.maxval);
        return Err(IoError::UnsupportedFormat(format!(
            "8-bit PGM requires maxval < 256, got {}",
            header.maxval
        )));
    }

    let len = header.width as usize * header.height as usize;
    let mut data = vec![0u8; len];
    reader.read_exact(&mut data)?;
    Ok(Image::from_vec_2d(header.width, header.height, data)?)
}

/// Read a binary PGM (`P5`) image as 16-bit samples.
///
/// Any `maxval` is accepted: files with `maxval < 256` carry one byte per
/// sample and are widened, larger ones carry big-endian 16-bit samples.
pub fn read_pgm16<R: Read>(reader: R) -> IoResult<Image<u16>> {
    let mut reader = BufReader::new(reader);
    let header = read_header(&mut reader, "P5")?;

    let len = header.width as usize * header.height as usize;
    let data = if header.maxval < 256 {
        let mut raw = vec![0u8; len];
        reader.read_exact(&mut raw)?;
        raw.into_iter().map(u16::from).collect()
    } else {
        let mut raw = vec![0u8; len * 2];
        reader.read_exact(&mut raw)?;
        raw.chunks_exact(2)
            .map(|b| u16::from_be_bytes([b[0], b[1]]))
            .collect()
    };
    Ok(Image::from_vec_2d(header.width, header.height, data)?)
}

/// Read a binary PPM (`P6`) RGB image.
pub fn read_ppm<R: Read>(reader: R) -> IoResult<Image<Rgb>> {
    let mut reader = BufReader::new(reader);
    let header = read_header(&mut reader, "P6")?;
    if header.maxval >= 256 {
        warn!("PPM maxval {} out of 8-bit range", header.maxval);
        return Err(IoError::UnsupportedFormat(format!(
            "8-bit PPM requires maxval < 256, got {}",
            header.maxval
        )));
    }

    let len = header.width as usize * header.height as usize;
    let mut raw = vec![0u8; len * 3];
    reader.read_exact(&mut raw)?;
    let data = raw
        .chunks_exact(3)
        .map(|c| Rgb::new(c[0], c[1], c[2]))
        .collect();
    Ok(Image::from_vec_2d(header.width, header.height, data)?)
}

const CREATOR_LINE: &str = "#CREATOR: comptree";

/// Write a binary 8-bit PGM (`P5`) image.
pub fn write_pgm<W: Write>(im: &Image<u8>, mut writer: W) -> IoResult<()> {
    writeln!(writer, "P5")?;
    writeln!(writer, "{CREATOR_LINE}")?;
    writeln!(writer, "{} {}", im.width(), im.height())?;
    writeln!(writer, "255")?;
    writer.write_all(im.data())?;
    writeln!(writer)?;
    Ok(())
}

/// Write a binary 16-bit PGM (`P5`) image with a big-endian raster.
///
/// The maxval field carries the image maximum (floored at 256 so readers
/// treat the raster as two bytes per sample).
pub fn write_pgm16<W: Write>(im: &Image<u16>, mut writer: W) -> IoResult<()> {
    let maxval = im.max_value().max(256);
    writeln!(writer, "P5")?;
    writeln!(writer, "{CREATOR_LINE}")?;
    writeln!(writer, "{} {}", im.width(), im.height())?;
    writeln!(writer, "{maxval}")?;
    let mut raster = Vec::with_capacity(im.len() * 2);
    for &v in im.data() {
        raster.extend_from_slice(&v.to_be_bytes());
    }
    writer.write_all(&raster)?;
    writeln!(writer)?;
    Ok(())
}

/// Write a binary PPM (`P6`) RGB image.
pub fn write_ppm<W: Write>(im: &Image<Rgb>, mut writer: W) -> IoResult<()> {
    writeln!(writer, "P6")?;
    writeln!(writer, "{CREATOR_LINE}")?;
    writeln!(writer, "{} {}", im.width(), im.height())?;
    writeln!(writer, "255")?;
    let mut raster = Vec::with_capacity(im.len() * 3);
    for &v in im.data() {
        raster.extend_from_slice(&v.0);
    }
    writer.write_all(&raster)?;
    writeln!(writer)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pgm_roundtrip() {
        let im = Image::from_vec_2d(4, 3, (0u8..12).collect()).unwrap();
        let mut buf = Vec::new();
        write_pgm(&im, &mut buf).unwrap();

        let back = read_pgm(std::io::Cursor::new(buf)).unwrap();
        assert_eq!(back, im);
    }

    #[test]
    fn test_pgm16_roundtrip() {
        let im = Image::from_vec_2d(3, 2, vec![0u16, 300, 65535, 7, 256, 1]).unwrap();
        let mut buf = Vec::new();
        write_pgm16(&im, &mut buf).unwrap();

        let back = read_pgm16(std::io::Cursor::new(buf)).unwrap();
        assert_eq!(back, im);
    }

    #[test]
    fn test_ppm_roundtrip() {
        let im = Image::from_vec_2d(
            2,
            2,
            vec![
                Rgb::new(1, 2, 3),
                Rgb::new(4, 5, 6),
                Rgb::new(7, 8, 9),
                Rgb::new(250, 251, 252),
            ],
        )
        .unwrap();
        let mut buf = Vec::new();
        write_ppm(&im, &mut buf).unwrap();

        let back = read_ppm(std::io::Cursor::new(buf)).unwrap();
        assert_eq!(back, im);
    }

    #[test]
    fn test_comments_skipped() {
        let file = b"P5\n# a comment\n2 1\n# another\n255\n\x07\x09";
        let im = read_pgm(std::io::Cursor::new(file.to_vec())).unwrap();
        assert_eq!(im.data(), &[7, 9]);
    }

    #[test]
    fn test_wrong_magic() {
        let file = b"P2\n2 1\n255\n..";
        assert!(matches!(
            read_pgm(std::io::Cursor::new(file.to_vec())),
            Err(IoError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_maxval_out_of_range() {
        let file = b"P5\n2 1\n500\n\x00\x00\x00\x00";
        assert!(read_pgm(std::io::Cursor::new(file.to_vec())).is_err());
        // the 16-bit reader accepts the same file
        let im = read_pgm16(std::io::Cursor::new(file.to_vec())).unwrap();
        assert_eq!(im.data(), &[0, 0]);
    }

    #[test]
    fn test_truncated_raster() {
        let file = b"P5\n4 4\n255\n\x00\x01";
        assert!(matches!(
            read_pgm(std::io::Cursor::new(file.to_vec())),
            Err(IoError::Io(_))
        ));
    }
}
