//! Reconstruction regression test
//!
//! Round-trip and filtering behavior of the three level rules:
//!
//! 1. DIRECT and MIN over an unfiltered tree reproduce the input exactly
//! 2. deactivate-all then restore is the identity
//! 3. an all-pass area filter changes nothing
//! 4. MAX agrees with MIN on curated filtered inputs

use comptree_core::Image;
use comptree_maxtree::{ComponentTree, Rule};
use comptree_test::{RegParams, fixtures};

fn roundtrip(rp: &mut RegParams, img: &Image<u8>) {
    let mut tree = ComponentTree::new(img).expect("tree builds");

    let direct = tree.reconstruct(Rule::Direct).expect("reconstructs");
    rp.compare_images(img, &direct);

    let min = tree.reconstruct(Rule::Min).expect("reconstructs");
    rp.compare_images(img, &min);

    // deactivate everything, restore, rebuild the image
    tree.set_false();
    tree.restore();
    let direct = tree.reconstruct(Rule::Direct).expect("reconstructs");
    rp.compare_images(img, &direct);

    // an all-pass filter is a no-op
    tree.area_filtering(0, i64::MAX);
    let direct = tree.reconstruct(Rule::Direct).expect("reconstructs");
    rp.compare_images(img, &direct);
}

#[test]
fn reconstruct_reg() {
    let mut rp = RegParams::new("reconstruct");

    roundtrip(&mut rp, &fixtures::constant(4, 4, 9));
    roundtrip(&mut rp, &fixtures::central_peak());
    roundtrip(&mut rp, &fixtures::step_row());
    roundtrip(&mut rp, &fixtures::twin_plateaus());
    roundtrip(&mut rp, &fixtures::ramp(8, 5));
    roundtrip(&mut rp, &fixtures::speckle(13, 11, 3));

    // MAX against MIN on a curated filtered tree: pruning one of the two
    // plateaus must flatten it to the background under both rules
    let img = fixtures::twin_plateaus();
    let mut tree = ComponentTree::new(&img).expect("tree builds");
    // contrasts are 3 (root) and 0 (each plateau): a bound of 3 passes
    // everything
    tree.contrast_filtering(0, 3);
    let min = tree.reconstruct(Rule::Min).expect("reconstructs");
    rp.check("plateaus survive a permissive filter", min == img);

    tree.restore();
    // volumes are 20 (root), 8 and 12 (plateaus): a bound of 7 deactivates
    // the whole tree, so both rules produce the zero image
    tree.volumic_filtering(0, 7);
    let min = tree.reconstruct(Rule::Min).expect("reconstructs");
    let max = tree.reconstruct(Rule::Max).expect("reconstructs");
    rp.compare_images(&fixtures::constant(5, 3, 0), &min);
    rp.compare_images(&min, &max);

    assert!(rp.cleanup(), "reconstruct regression test failed");
}
