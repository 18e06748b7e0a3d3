//! PNM regression test
//!
//! Verifies:
//! 1. PGM write-read round-trip with a known byte pattern
//! 2. 16-bit PGM round-trip through the big-endian raster
//! 3. PPM round-trip
//! 4. header edge cases: comments, wrong magic, out-of-range maxval

use comptree_core::{Image, Rgb};
use comptree_io::{read_pgm, read_pgm16, read_ppm, write_pgm, write_pgm16, write_ppm};
use comptree_test::RegParams;

#[test]
fn pnm_reg() {
    let mut rp = RegParams::new("pnm");

    // 4x3 byte pattern 0..12
    let img = Image::from_vec_2d(4, 3, (0u8..12).collect()).expect("valid image");
    let mut buf = Vec::new();
    write_pgm(&img, &mut buf).expect("writes");
    let back = read_pgm(std::io::Cursor::new(buf.clone())).expect("reads");
    rp.compare_images(&img, &back);

    // the emitted header is the documented shape
    let text = String::from_utf8_lossy(&buf[..buf.len() - 13]).to_string();
    rp.check("magic line", text.starts_with("P5\n"));
    rp.check("creator comment", text.contains("#CREATOR"));
    rp.check("dimensions line", text.contains("4 3"));

    // 16-bit values above and below the byte range
    let img16 =
        Image::from_vec_2d(3, 2, vec![0u16, 255, 256, 4095, 65535, 1]).expect("valid image");
    let mut buf = Vec::new();
    write_pgm16(&img16, &mut buf).expect("writes");
    let back = read_pgm16(std::io::Cursor::new(buf)).expect("reads");
    rp.compare_images(&img16, &back);

    // RGB round-trip
    let rgb = Image::from_vec_2d(
        2,
        2,
        vec![
            Rgb::new(10, 20, 30),
            Rgb::new(0, 0, 0),
            Rgb::new(255, 255, 255),
            Rgb::new(1, 2, 3),
        ],
    )
    .expect("valid image");
    let mut buf = Vec::new();
    write_ppm(&rgb, &mut buf).expect("writes");
    let back = read_ppm(std::io::Cursor::new(buf)).expect("reads");
    rp.compare_images(&rgb, &back);

    // comment lines anywhere in the header are skipped
    let file = b"P5\n#one\n3 # two\n1\n255\n\x01\x02\x03".to_vec();
    let im = read_pgm(std::io::Cursor::new(file)).expect("reads");
    rp.check("comments skipped", im.data() == [1, 2, 3]);

    // failures leave the caller with an error, not a partial image
    rp.check(
        "P6 rejected by the PGM reader",
        read_pgm(std::io::Cursor::new(b"P6\n1 1\n255\n\x00".to_vec())).is_err(),
    );
    rp.check(
        "wide maxval rejected by the 8-bit reader",
        read_pgm(std::io::Cursor::new(b"P5\n1 1\n999\n\x00\x00".to_vec())).is_err(),
    );
    rp.check(
        "wide maxval accepted by the 16-bit reader",
        read_pgm16(std::io::Cursor::new(b"P5\n1 1\n999\n\x00\x07".to_vec()))
            .map(|im| im.data() == [7u16])
            .unwrap_or(false),
    );

    assert!(rp.cleanup(), "pnm regression test failed");
}
