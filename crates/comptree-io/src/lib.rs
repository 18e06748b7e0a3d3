//! comptree-io - PGM/PPM image I/O
//!
//! Binary readers and writers for the raster formats the workspace speaks:
//! `P5` grayscale (8- and 16-bit) and `P6` RGB. Failures surface as
//! [`IoError`] values and a `log::warn!` on the diagnostic stream; readers
//! return a fresh image and never mutate caller state.

pub mod error;
pub mod pnm;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use comptree_core::{Image, Rgb};

pub use error::{IoError, IoResult};
pub use pnm::{read_pgm, read_pgm16, read_ppm, write_pgm, write_pgm16, write_ppm};

/// Load an 8-bit PGM from a file.
pub fn load_pgm<P: AsRef<Path>>(path: P) -> IoResult<Image<u8>> {
    read_pgm(File::open(path)?)
}

/// Load a PGM from a file as 16-bit samples.
pub fn load_pgm16<P: AsRef<Path>>(path: P) -> IoResult<Image<u16>> {
    read_pgm16(File::open(path)?)
}

/// Load an RGB PPM from a file.
pub fn load_ppm<P: AsRef<Path>>(path: P) -> IoResult<Image<Rgb>> {
    read_ppm(File::open(path)?)
}

/// Save an 8-bit PGM to a file.
pub fn save_pgm<P: AsRef<Path>>(im: &Image<u8>, path: P) -> IoResult<()> {
    let mut out = BufWriter::new(File::create(path)?);
    write_pgm(im, &mut out)?;
    out.flush()?;
    Ok(())
}

/// Save a 16-bit PGM to a file.
pub fn save_pgm16<P: AsRef<Path>>(im: &Image<u16>, path: P) -> IoResult<()> {
    let mut out = BufWriter::new(File::create(path)?);
    write_pgm16(im, &mut out)?;
    out.flush()?;
    Ok(())
}

/// Save an RGB PPM to a file.
pub fn save_ppm<P: AsRef<Path>>(im: &Image<Rgb>, path: P) -> IoResult<()> {
    let mut out = BufWriter::new(File::create(path)?);
    write_ppm(im, &mut out)?;
    out.flush()?;
    Ok(())
}
