//! Property tests for the signed-archive naming contract.
//!
//! Any archive name built by `build_archive_filename()` must yield the
//! same digest back from `parse_digest_from_filename()`.

use attest_core::{build_archive_filename, parse_digest_from_filename, sha256_digest, Document};
use proptest::prelude::*;

proptest! {
    #[test]
    fn filename_roundtrip_hex(base in "[A-Za-z0-9 _().-]{1,40}", payload in proptest::collection::vec(any::<u8>(), 0..256)) {
        let digest = sha256_digest(&payload).to_hex();
        let name = build_archive_filename(&base, &digest);
        prop_assert_eq!(parse_digest_from_filename(&name).unwrap(), digest);
    }

    #[test]
    fn filename_roundtrip_qb64(base in "[A-Za-z0-9_-]{1,40}", digest in "[A-Za-z0-9_-]{1,64}") {
        let name = build_archive_filename(&base, &digest);
        prop_assert_eq!(parse_digest_from_filename(&name).unwrap(), digest);
    }

    #[test]
    fn digest_is_deterministic(payload in proptest::collection::vec(any::<u8>(), 0..1024)) {
        let a = Document::new("a.bin", payload.clone()).unwrap();
        let b = Document::new("a.bin", payload).unwrap();
        prop_assert_eq!(a.digest(), b.digest());
    }
}

#[test]
fn report_pdf_scenario_name() {
    let doc = Document::new("report.pdf", b"%PDF-1.7 quarterly".to_vec()).unwrap();
    let digest = doc.digest().to_hex();
    let name = build_archive_filename(doc.stem(), &digest);
    assert_eq!(name, format!("report-digest={digest}.zip"));
}
