//! Flat grayscale morphology
//!
//! Erosion and dilation over an arbitrary [`Neighborhood`], plus the usual
//! compositions. Each operator scans a sentinel-padded copy of the input so
//! every probe is in range: erosion pads with `T::MAX`, dilation with
//! `T::MIN`, which makes the image frame neutral for the min/max
//! reductions.
//!
//! Dilation reflects the neighborhood through the origin (Heijmans'
//! adjunction convention); erosion uses it as given. A connectivity preset
//! excludes the center voxel, so these operators reduce over the neighbors
//! only; the border-gradient attribute is defined over that convention.

use comptree_core::{Image, Neighborhood, Pixel};

use crate::error::{MorphError, MorphResult};

fn reduce<T: Pixel>(
    im: &Image<T>,
    nb: &Neighborhood,
    pad: T,
    init: T,
    pick: fn(T, T) -> T,
) -> MorphResult<Image<T>> {
    if nb.is_empty() {
        return Err(MorphError::EmptyNeighborhood);
    }
    let neg = nb.negative_extents();
    let pos = nb.positive_extents();
    let padded = im.add_borders(neg, pos, pad)?;

    let mut bound = nb.clone();
    bound.bind_to(&padded);

    let mut out = im.clone();
    for (x, y, z) in im.positions() {
        let center = padded.offset_of(x + neg[0], y + neg[1], z + neg[2]) as isize;
        let mut acc = init;
        for &d in bound.offsets() {
            acc = pick(acc, padded.at((center + d) as usize));
        }
        out.set_at(im.offset_of(x, y, z), acc);
    }
    Ok(out)
}

/// Morphological erosion: per-voxel minimum over the neighborhood.
pub fn erode<T: Pixel>(im: &Image<T>, nb: &Neighborhood) -> MorphResult<Image<T>> {
    reduce(im, nb, T::MAX, T::MAX, std::cmp::min)
}

/// Morphological dilation: per-voxel maximum over the reflected
/// neighborhood.
pub fn dilate<T: Pixel>(im: &Image<T>, nb: &Neighborhood) -> MorphResult<Image<T>> {
    reduce(im, &nb.reflected(), T::MIN, T::MIN, std::cmp::max)
}

/// Opening: erosion followed by dilation.
pub fn open<T: Pixel>(im: &Image<T>, nb: &Neighborhood) -> MorphResult<Image<T>> {
    dilate(&erode(im, nb)?, nb)
}

/// Closing: dilation followed by erosion.
pub fn close<T: Pixel>(im: &Image<T>, nb: &Neighborhood) -> MorphResult<Image<T>> {
    erode(&dilate(im, nb)?, nb)
}

/// Morphological gradient: `dilate - erode`, saturating.
pub fn gradient<T: Pixel>(im: &Image<T>, nb: &Neighborhood) -> MorphResult<Image<T>> {
    let mut hi = dilate(im, nb)?;
    let lo = erode(im, nb)?;
    hi.saturating_sub_assign(&lo)?;
    Ok(hi)
}

/// Internal gradient: `im - erode`.
pub fn internal_gradient<T: Pixel>(im: &Image<T>, nb: &Neighborhood) -> MorphResult<Image<T>> {
    let mut out = im.clone();
    out.saturating_sub_assign(&erode(im, nb)?)?;
    Ok(out)
}

/// External gradient: `dilate - im`.
pub fn external_gradient<T: Pixel>(im: &Image<T>, nb: &Neighborhood) -> MorphResult<Image<T>> {
    let mut out = dilate(im, nb)?;
    out.saturating_sub_assign(im)?;
    Ok(out)
}
