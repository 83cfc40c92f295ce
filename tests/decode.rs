extern crate g1a;

use g1a::{Error, HeaderRevision, PackageInfo, Warning};
use std::fs;
use std::path::PathBuf;

//===========================================================================//

#[test]
fn decode_one_bit_icon() {
    compare_icon_and_text("smiley1.bmp", "smiley.txt", &[]);
}

#[test]
fn decode_twenty_four_bit_icon() {
    compare_icon_and_text("smiley24.bmp", "smiley.txt", &[]);
}

#[test]
fn decode_gray_icon() {
    // The one light gray pixel sits where the face is white anyway.
    compare_icon_and_text(
        "gray24.bmp",
        "smiley.txt",
        &[Warning::IconNotMonochrome],
    );
}

#[test]
fn decode_icon_with_unexpected_size() {
    let path = PathBuf::from("tests/images").join("smiley24.bmp");
    let decoded = g1a::read_icon(&path, 32, 17).unwrap();
    assert_eq!(
        decoded.warnings,
        vec![
            Warning::IconWidth { found: 30, expected: 32 },
            Warning::IconHeight { found: 19, expected: 17 },
        ]
    );
}

#[test]
fn decode_missing_icon() {
    let path = PathBuf::from("tests/images").join("missing.bmp");
    match g1a::read_icon(&path, 30, 19) {
        Err(Error::CannotOpen { path: error_path, .. }) => {
            assert_eq!(error_path, path)
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn decode_package_with_bad_signature() {
    let mut file = vec![0u8; 2024];
    file[..8].copy_from_slice(b"NOTVALID");
    for byte in file[..0x20].iter_mut() {
        *byte = !*byte;
    }
    match PackageInfo::decode(&file, 2024, HeaderRevision::Standard) {
        Err(Error::InvalidSignature(signature)) => {
            assert_eq!(signature, "NOTVALID")
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

//===========================================================================//

fn compare_icon_and_text(bmp_path: &str, txt_path: &str, warnings: &[Warning]) {
    let bmp_path = PathBuf::from("tests/images").join(bmp_path);
    let txt_path = PathBuf::from("tests/images").join(txt_path);
    let decoded = g1a::read_icon(&bmp_path, 30, 19).unwrap();
    assert_eq!(
        decoded.warnings, warnings,
        "BMP file {:?} gave unexpected warnings",
        bmp_path
    );
    let expected = fs::read_to_string(&txt_path).unwrap();
    let expected: Vec<&str> = expected.lines().collect();
    let rendered: Vec<String> = decoded.icon.rows().collect();
    assert_eq!(
        rendered.len(),
        expected.len(),
        "BMP file {:?} rendered {} rows, but text file {:?} has {}",
        bmp_path,
        rendered.len(),
        txt_path,
        expected.len()
    );
    for (index, (actual, wanted)) in
        rendered.iter().zip(expected.iter()).enumerate()
    {
        assert_eq!(
            actual, wanted,
            "BMP file {:?} row {} doesn't match text file {:?}",
            bmp_path, index, txt_path
        );
    }
}

//===========================================================================//
