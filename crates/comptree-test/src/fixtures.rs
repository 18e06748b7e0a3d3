//! Synthetic grayscale fixtures
//!
//! Small deterministic images the regression suites build trees over.
//! They replace on-disk test data: every fixture is cheap to construct and
//! its expected tree shape is easy to derive by hand.

use comptree_core::Image;

/// `w x h` image with every pixel at `v`.
pub fn constant(w: u32, h: u32, v: u8) -> Image<u8> {
    let mut im = Image::new_2d(w, h).expect("fixture dimensions are valid");
    im.fill(v);
    im
}

/// 3x3 zeros with a single 5 in the center.
pub fn central_peak() -> Image<u8> {
    Image::from_vec_2d(3, 3, vec![0, 0, 0, 0, 5, 0, 0, 0, 0])
        .expect("fixture dimensions are valid")
}

/// 4x1 ascending step `[1, 1, 2, 3]`.
pub fn step_row() -> Image<u8> {
    Image::from_vec_2d(4, 1, vec![1, 1, 2, 3]).expect("fixture dimensions are valid")
}

/// Diagonal ramp: `v(x, y) = x + y`, clipped to 255.
pub fn ramp(w: u32, h: u32) -> Image<u8> {
    let mut im = Image::new_2d(w, h).expect("fixture dimensions are valid");
    for (x, y, z) in im.positions().collect::<Vec<_>>() {
        let v = (x + y).min(255) as u8;
        im.set(x, y, z, v).expect("position is in range");
    }
    im
}

/// Deterministic speckle noise from a linear congruential generator.
///
/// Reproducible across runs and platforms; the tree over it exercises
/// many small components.
pub fn speckle(w: u32, h: u32, seed: u64) -> Image<u8> {
    let mut state = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
    let mut data = Vec::with_capacity(w as usize * h as usize);
    for _ in 0..w as usize * h as usize {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        data.push((state >> 33) as u8);
    }
    Image::from_vec_2d(w, h, data).expect("fixture dimensions are valid")
}

/// Two bright plateaus on a dark background, separated by a valley.
///
/// ```text
/// 2 2 0 0 0
/// 2 2 0 3 3
/// 0 0 0 3 3
/// ```
pub fn twin_plateaus() -> Image<u8> {
    Image::from_vec_2d(
        5,
        3,
        vec![
            2, 2, 0, 0, 0, //
            2, 2, 0, 3, 3, //
            0, 0, 0, 3, 3,
        ],
    )
    .expect("fixture dimensions are valid")
}
