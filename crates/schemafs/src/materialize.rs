//! Lazy payload materialization.
//!
//! Payloads live in the table as base64 text over gzip bytes. Each
//! record decodes at most once: the first caller runs the pipeline and
//! every later or concurrent caller shares the cached outcome, whether
//! that outcome is the content or an error.

use std::io::Read;
use std::sync::Arc;
use std::sync::atomic::Ordering;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use flate2::read::GzDecoder;
use tracing::{debug, warn};

use crate::error::FsError;
use crate::registry::AssetRecord;

impl AssetRecord {
    /// Decoded content of this record.
    ///
    /// Concurrent callers wait on a single decode instead of repeating
    /// it. A zero declared size returns empty content without touching
    /// either codec.
    pub async fn materialize(&self) -> Result<Arc<[u8]>, FsError> {
        if self.declared_size == 0 {
            return Ok(Arc::from(&[][..]));
        }

        self.content
            .get_or_init(|| async {
                let result = self.decode();
                if let Err(err) = &result {
                    warn!(path = %self.path, error = %err, "asset decode failed");
                }
                result
            })
            .await
            .clone()
    }

    fn decode(&self) -> Result<Arc<[u8]>, FsError> {
        self.decode_attempts.fetch_add(1, Ordering::Relaxed);

        let payload = match self.payload.as_deref() {
            Some(p) => p,
            None => {
                return Err(FsError::Decode {
                    path: self.path.clone(),
                    reason: "no payload recorded".to_string(),
                });
            }
        };

        // Packers are allowed to wrap the base64 text.
        let text: String = payload.split_ascii_whitespace().collect();
        let compressed = STANDARD.decode(text).map_err(|e| FsError::Decode {
            path: self.path.clone(),
            reason: format!("base64: {e}"),
        })?;

        let mut decoded = Vec::with_capacity(self.declared_size as usize);
        GzDecoder::new(compressed.as_slice())
            .read_to_end(&mut decoded)
            .map_err(|e| FsError::Decode {
                path: self.path.clone(),
                reason: format!("gzip: {e}"),
            })?;

        if decoded.len() as u64 != self.declared_size {
            return Err(FsError::SizeMismatch {
                path: self.path.clone(),
                declared: self.declared_size,
                actual: decoded.len() as u64,
            });
        }

        debug!(path = %self.path, bytes = decoded.len(), "materialized asset");
        Ok(Arc::from(decoded))
    }
}
