use image::codecs::jpeg::JpegEncoder;
use pictdb_core::metadata::Resolution;
use pictdb_core::PictDb;

fn solid_jpeg(w: u32, h: u32, color: [u8; 3]) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(w, h, image::Rgb(color));
    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, 90)
        .encode_image(&img)
        .unwrap();
    out
}

#[test]
fn identical_payloads_share_orig_storage() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pics.db");
    let payload = solid_jpeg(64, 64, [1, 2, 3]);

    let mut db = PictDb::create(&path, 10, (64, 64), (256, 256)).unwrap();
    db.insert(&payload, "a").unwrap();
    db.insert(&payload, "b").unwrap();

    // Both ids read back the same bytes, and the file only grew by one payload's
    // worth of bytes rather than two (the second insert shares the first's offset).
    let size_after_one = {
        let mut solo = PictDb::create(dir.path().join("solo.db"), 10, (64, 64), (256, 256)).unwrap();
        solo.insert(&payload, "a").unwrap();
        drop(solo);
        std::fs::metadata(dir.path().join("solo.db")).unwrap().len()
    };
    let size_after_two = std::fs::metadata(&path).unwrap().len();
    assert_eq!(size_after_one, size_after_two);

    assert_eq!(db.read("a", Resolution::Orig).unwrap(), payload);
    assert_eq!(db.read("b", Resolution::Orig).unwrap(), payload);
}

#[test]
fn duplicate_id_is_rejected_before_touching_storage() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pics.db");
    let payload = solid_jpeg(32, 32, [5, 5, 5]);

    let mut db = PictDb::create(&path, 10, (64, 64), (256, 256)).unwrap();
    db.insert(&payload, "a").unwrap();
    let err = db.insert(&payload, "a").unwrap_err();
    assert!(matches!(err, pictdb_core::Error::DuplicateId));
    assert_eq!(db.num_files(), 1);
}
