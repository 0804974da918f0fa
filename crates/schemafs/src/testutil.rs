//! Shared helpers for unit tests.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

/// Gzip-then-base64 a payload the way the packer does.
pub fn gz64(data: &[u8]) -> String {
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::io::Write;

    let mut enc = GzEncoder::new(Vec::new(), Compression::default());
    enc.write_all(data).unwrap();
    STANDARD.encode(enc.finish().unwrap())
}
