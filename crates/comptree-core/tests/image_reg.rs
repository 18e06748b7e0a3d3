//! Image container regression test
//!
//! Verifies:
//! 1. offset arithmetic against hand-computed positions in 2D and 3D
//! 2. border padding and removal round-trip
//! 3. crop/paste consistency
//! 4. neighborhood binding against a concrete shape

use comptree_core::{Image, Neighborhood};
use comptree_test::{RegParams, fixtures};

#[test]
fn image_reg() {
    let mut rp = RegParams::new("image");

    // offsets enumerate in x-fastest order
    let img = Image::<u8>::new(4, 3, 2).expect("valid image");
    rp.compare_ints(1 + 2 * 4 + 12, img.offset_of(1, 2, 1) as i64);
    let mut offset = 0;
    let mut ok = true;
    for (x, y, z) in img.positions() {
        ok &= img.offset_of(x, y, z) == offset && img.coord_of(offset) == (x, y, z);
        offset += 1;
    }
    rp.check("positions enumerate every offset in order", ok);
    rp.compare_ints(img.len() as i64, offset as i64);

    // padding with the extents of a bound neighborhood round-trips
    let base = fixtures::ramp(5, 4);
    let nb = Neighborhood::n8_2d();
    let padded = base
        .add_borders(nb.negative_extents(), nb.positive_extents(), 255)
        .expect("pads");
    rp.compare_ints(7, i64::from(padded.width()));
    rp.compare_ints(6, i64::from(padded.height()));
    rp.check("padding fills the frame", padded.get(0, 0, 0) == Some(255));
    let back = padded
        .remove_borders(nb.negative_extents(), nb.positive_extents())
        .expect("unpads");
    rp.compare_images(&base, &back);

    // crop of a paste recovers the pasted image
    let mut canvas = Image::<u8>::new_2d(10, 10).expect("valid image");
    let patch = fixtures::central_peak();
    canvas.paste(&patch, 4, 6, 0).expect("pastes");
    let cropped = canvas.crop(4..7, 6..9, 0..1).expect("crops");
    rp.compare_images(&patch, &cropped);

    // binding computes flat offsets against the current shape
    let mut nb = Neighborhood::n8_2d();
    nb.bind_to(&canvas);
    rp.check(
        "n8 offsets against width 10",
        nb.offsets() == [-11, -10, -9, -1, 1, 9, 10, 11],
    );

    // reductions and the min-tree inversion helper
    let img = fixtures::central_peak();
    rp.compare_ints(0, i64::from(img.min_value()));
    rp.compare_ints(5, i64::from(img.max_value()));
    let inv = img.inverted();
    rp.compare_ints(0, i64::from(inv.get(1, 1, 0).expect("in range")));
    rp.compare_ints(5, i64::from(inv.get(0, 0, 0).expect("in range")));

    assert!(rp.cleanup(), "image regression test failed");
}
