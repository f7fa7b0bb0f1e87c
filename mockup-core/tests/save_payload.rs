use mockup_core::{save_payload, ExportKind, ImagePayload};

#[test]
fn save_payload_writes_decoded_bytes() {
    let bytes = [0x89, b'P', b'N', b'G', 1, 2, 3];
    let payload = ImagePayload::from_bytes("image/png", &bytes).unwrap();

    let path = std::path::Path::new("target/test_exports").join(ExportKind::Edited.file_name());
    save_payload(&path, &payload).unwrap();

    let written = std::fs::read(&path).unwrap();
    assert_eq!(written, bytes.to_vec());
}

#[test]
fn save_payload_refuses_garbage() {
    let payload = ImagePayload::parse("!!!not-base64!!!").unwrap();
    let path = std::path::Path::new("target/test_exports/garbage.png");
    assert!(save_payload(path, &payload).is_err());
}
