use image::codecs::jpeg::JpegEncoder;
use pictdb_core::catalog::OpenMode;
use pictdb_core::metadata::Resolution;
use pictdb_core::PictDb;

fn solid_jpeg(w: u32, h: u32) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(w, h, image::Rgb([10, 200, 30]));
    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, 90)
        .encode_image(&img)
        .unwrap();
    out
}

#[test]
fn inserted_picture_reads_back_byte_identical_at_orig() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pics.db");
    let payload = solid_jpeg(320, 200);

    let mut db = PictDb::create(&path, 10, (64, 64), (256, 256)).unwrap();
    db.insert(&payload, "pic1").unwrap();
    assert_eq!(db.num_files(), 1);

    let read_back = db.read("pic1", Resolution::Orig).unwrap();
    assert_eq!(read_back, payload);
}

#[test]
fn catalog_survives_a_close_and_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pics.db");
    let payload = solid_jpeg(100, 80);

    {
        let mut db = PictDb::create(&path, 10, (64, 64), (256, 256)).unwrap();
        db.insert(&payload, "pic1").unwrap();
    }

    let mut reopened = PictDb::open(&path, OpenMode::ReadWrite).unwrap();
    assert_eq!(reopened.num_files(), 1);
    let read_back = reopened.read("pic1", Resolution::Orig).unwrap();
    assert_eq!(read_back, payload);
}
