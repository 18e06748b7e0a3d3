//! Pixel neighborhoods
//!
//! A [`Neighborhood`] is an ordered set of integer displacements defining
//! which voxels are adjacent. Algorithms consume it in two forms: as raw
//! displacement points (coordinate-space probes) and as flat offsets bound
//! to a concrete image shape (offset-space scans over padded workspaces).
//!
//! Connectivity presets exclude the origin; algorithms that need the
//! center voxel handle it separately.

use crate::image::Image;

/// Ordered displacement set with cached flat offsets.
///
/// # Examples
///
/// ```
/// use comptree_core::Neighborhood;
///
/// let mut nb = Neighborhood::n8_2d();
/// assert_eq!(nb.len(), 8);
/// nb.bind([10, 10, 1]);
/// assert!(nb.offsets().contains(&-11)); // (-1, -1) against width 10
/// ```
#[derive(Debug, Clone, Default)]
pub struct Neighborhood {
    points: Vec<[i32; 3]>,
    offsets: Vec<isize>,
}

impl Neighborhood {
    /// Empty neighborhood.
    pub fn new() -> Self {
        Neighborhood::default()
    }

    /// Append a displacement. Insertion order is preserved; it only
    /// influences FIFO tie-breaking downstream, never correctness.
    pub fn add(&mut self, dx: i32, dy: i32, dz: i32) {
        self.points.push([dx, dy, dz]);
    }

    /// Number of displacements.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the neighborhood has no displacements.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Displacement points.
    pub fn points(&self) -> &[[i32; 3]] {
        &self.points
    }

    /// Flat offsets computed by the last [`Neighborhood::bind`] call.
    ///
    /// Empty until bound. Offsets are only valid against the shape they
    /// were bound to.
    pub fn offsets(&self) -> &[isize] {
        &self.offsets
    }

    /// Recompute flat offsets against an image shape.
    pub fn bind(&mut self, size: [u32; 3]) {
        let w = size[0] as isize;
        let h = size[1] as isize;
        self.offsets = self
            .points
            .iter()
            .map(|p| p[0] as isize + p[1] as isize * w + p[2] as isize * w * h)
            .collect();
    }

    /// Convenience form of [`Neighborhood::bind`] taking the target image.
    pub fn bind_to<T>(&mut self, image: &Image<T>) {
        self.bind(image.size());
    }

    /// Magnitude of the most negative displacement per axis; the low-side
    /// border pad width.
    pub fn negative_extents(&self) -> [u32; 3] {
        let mut ext = [0i32; 3];
        for p in &self.points {
            for axis in 0..3 {
                ext[axis] = ext[axis].min(p[axis]);
            }
        }
        [
            ext[0].unsigned_abs(),
            ext[1].unsigned_abs(),
            ext[2].unsigned_abs(),
        ]
    }

    /// Largest positive displacement per axis; the high-side border pad
    /// width.
    pub fn positive_extents(&self) -> [u32; 3] {
        let mut ext = [0i32; 3];
        for p in &self.points {
            for axis in 0..3 {
                ext[axis] = ext[axis].max(p[axis]);
            }
        }
        [ext[0] as u32, ext[1] as u32, ext[2] as u32]
    }

    /// Point reflection through the origin (used by dilation).
    pub fn reflected(&self) -> Neighborhood {
        let points = self.points.iter().map(|p| [-p[0], -p[1], -p[2]]).collect();
        Neighborhood {
            points,
            offsets: Vec::new(),
        }
    }

    /// 4-connected 2D neighborhood.
    pub fn n4_2d() -> Self {
        let mut nb = Neighborhood::new();
        nb.add(0, -1, 0);
        nb.add(-1, 0, 0);
        nb.add(1, 0, 0);
        nb.add(0, 1, 0);
        nb
    }

    /// 8-connected 2D neighborhood, the builder default. The origin is
    /// excluded.
    pub fn n8_2d() -> Self {
        let mut nb = Neighborhood::new();
        for dy in -1..=1 {
            for dx in -1..=1 {
                if dx != 0 || dy != 0 {
                    nb.add(dx, dy, 0);
                }
            }
        }
        nb
    }

    /// All displacements within Euclidean distance `r` of the origin,
    /// origin excluded. Used for neighborhood-ring statistics.
    pub fn euclidean_ball_2d(r: u32) -> Self {
        let mut nb = Neighborhood::new();
        let ri = r as i32;
        let r2 = i64::from(r) * i64::from(r);
        for dy in -ri..=ri {
            for dx in -ri..=ri {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let d2 = i64::from(dx) * i64::from(dx) + i64::from(dy) * i64::from(dy);
                if d2 <= r2 {
                    nb.add(dx, dy, 0);
                }
            }
        }
        nb
    }

    /// 6-connected 3D neighborhood (face neighbors).
    pub fn n6_3d() -> Self {
        let mut nb = Neighborhood::new();
        nb.add(0, 0, -1);
        nb.add(0, -1, 0);
        nb.add(-1, 0, 0);
        nb.add(1, 0, 0);
        nb.add(0, 1, 0);
        nb.add(0, 0, 1);
        nb
    }

    /// 26-connected 3D neighborhood (face, edge and corner neighbors).
    pub fn n26_3d() -> Self {
        let mut nb = Neighborhood::new();
        for dz in -1..=1 {
            for dy in -1..=1 {
                for dx in -1..=1 {
                    if dx != 0 || dy != 0 || dz != 0 {
                        nb.add(dx, dy, dz);
                    }
                }
            }
        }
        nb
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        assert_eq!(Neighborhood::n4_2d().len(), 4);
        assert_eq!(Neighborhood::n8_2d().len(), 8);
        assert_eq!(Neighborhood::n6_3d().len(), 6);
        assert_eq!(Neighborhood::n26_3d().len(), 26);
        assert!(!Neighborhood::n8_2d().points().contains(&[0, 0, 0]));
    }

    #[test]
    fn test_extents() {
        let nb = Neighborhood::n8_2d();
        assert_eq!(nb.negative_extents(), [1, 1, 0]);
        assert_eq!(nb.positive_extents(), [1, 1, 0]);

        let mut skew = Neighborhood::new();
        skew.add(-2, 0, 0);
        skew.add(0, 3, 0);
        assert_eq!(skew.negative_extents(), [2, 0, 0]);
        assert_eq!(skew.positive_extents(), [0, 3, 0]);
    }

    #[test]
    fn test_bind() {
        let mut nb = Neighborhood::n4_2d();
        nb.bind([7, 5, 1]);
        assert_eq!(nb.offsets(), &[-7, -1, 1, 7]);
    }

    #[test]
    fn test_ball() {
        // radius 1 is the 4-neighborhood
        assert_eq!(Neighborhood::euclidean_ball_2d(1).len(), 4);
        // radius 2 keeps |d| <= 2: 12 points
        assert_eq!(Neighborhood::euclidean_ball_2d(2).len(), 12);
    }

    #[test]
    fn test_reflected() {
        let mut nb = Neighborhood::new();
        nb.add(1, -2, 0);
        let r = nb.reflected();
        assert_eq!(r.points(), &[[-1, 2, 0]]);
    }
}
