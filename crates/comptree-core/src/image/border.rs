//! Border padding
//!
//! The flooding builder and the flat morphology both work on a padded copy
//! of the input so every neighborhood probe stays in range. The pad widths
//! come from the neighborhood extents, the pad value is an algorithm
//! sentinel (`BORDER` level for flooding, `T::MIN`/`T::MAX` for
//! morphology).

use super::Image;
use crate::error::Result;

impl<T: Copy + Default> Image<T> {
    /// Pad by `neg[axis]` voxels on the low side and `pos[axis]` voxels on
    /// the high side of each axis, filling the pad with `value`.
    ///
    /// # Errors
    ///
    /// Propagates allocation errors for degenerate resulting shapes (cannot
    /// happen for a valid source image).
    ///
    /// # Examples
    ///
    /// ```
    /// use comptree_core::Image;
    ///
    /// let img = Image::<u8>::new_2d(4, 3).unwrap();
    /// let padded = img.add_borders([1, 1, 0], [1, 1, 0], 255).unwrap();
    /// assert_eq!(padded.size(), [6, 5, 1]);
    /// assert_eq!(padded.get(0, 0, 0), Some(255));
    /// assert_eq!(padded.get(1, 1, 0), Some(0));
    /// ```
    pub fn add_borders(&self, neg: [u32; 3], pos: [u32; 3], value: T) -> Result<Image<T>> {
        let mut out = Image::new(
            self.width() + neg[0] + pos[0],
            self.height() + neg[1] + pos[1],
            self.depth() + neg[2] + pos[2],
        )?;
        out.fill(value);
        out.paste(self, neg[0], neg[1], neg[2])?;
        Ok(out)
    }

    /// Inverse of [`Image::add_borders`] with the same pad widths.
    pub fn remove_borders(&self, neg: [u32; 3], pos: [u32; 3]) -> Result<Image<T>> {
        self.crop(
            neg[0]..self.width() - pos[0],
            neg[1]..self.height() - pos[1],
            neg[2]..self.depth() - pos[2],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_border_roundtrip() {
        let img = Image::from_vec_2d(2, 2, vec![1u8, 2, 3, 4]).unwrap();
        let padded = img.add_borders([1, 2, 0], [3, 1, 0], 9).unwrap();
        assert_eq!(padded.size(), [6, 5, 1]);
        assert_eq!(padded.get(1, 2, 0), Some(1));
        assert_eq!(padded.get(2, 3, 0), Some(4));
        assert_eq!(padded.get(0, 0, 0), Some(9));
        assert_eq!(padded.get(5, 4, 0), Some(9));

        let back = padded.remove_borders([1, 2, 0], [3, 1, 0]).unwrap();
        assert_eq!(back, img);
    }
}
