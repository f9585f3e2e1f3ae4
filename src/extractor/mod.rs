//! Signature extraction: file text to structural record.
//!
//! `extract` is total: any unparsable, oversized, or adversarial input maps
//! to a (possibly empty or partial) [`FileInfo`], never an error. The safety
//! gates run before structural parsing and route input to the right strategy;
//! see [`gates::choose_strategy`].

pub mod fallback;
pub mod gates;
pub mod language;
mod structural;

use std::path::Path;
use tracing::{debug, warn};

use crate::error::DegradeReason;
use crate::index::FileInfo;
pub use gates::{choose_strategy, SafetyPolicy, Strategy, MAX_FILE_BYTES};
pub use language::{Dialect, SOURCE_EXTENSIONS};

/// Outcome of one extraction: the record plus the degradation that produced
/// it, if any.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub info: FileInfo,
    pub degraded: Option<DegradeReason>,
}

/// Extract the structural record for one file under the default safety
/// policy.
pub fn extract(content: &str, path: &str) -> FileInfo {
    extract_with_policy(content, path, &SafetyPolicy::default()).info
}

/// Extract with an explicit gate policy, reporting any degradation.
pub fn extract_with_policy(content: &str, path: &str, policy: &SafetyPolicy) -> Extraction {
    let Some(dialect) = Dialect::from_path(Path::new(path)) else {
        // Unrecognized extension: nothing we know how to parse.
        return Extraction {
            info: FileInfo::default(),
            degraded: None,
        };
    };

    match choose_strategy(content, policy) {
        Strategy::Skip => {
            warn!(
                path,
                bytes = content.len(),
                "file exceeds size ceiling; returning empty record"
            );
            Extraction {
                info: FileInfo::default(),
                degraded: Some(DegradeReason::OversizedFile),
            }
        }
        Strategy::Fallback => {
            warn!(path, "suspicious content; using fallback extraction");
            Extraction {
                info: fallback::extract_fallback(content),
                degraded: Some(DegradeReason::SuspiciousContent),
            }
        }
        Strategy::Structural => match structural::extract_structural(content, dialect) {
            Some(info) => {
                debug!(
                    path,
                    dialect = dialect.name(),
                    imports = info.imports.len(),
                    functions = info.functions.len(),
                    "structural extraction complete"
                );
                Extraction {
                    info,
                    degraded: None,
                }
            }
            None => {
                warn!(path, "tree construction failed; using fallback extraction");
                Extraction {
                    info: fallback::extract_fallback(content),
                    degraded: Some(DegradeReason::StructuralParseFailure),
                }
            }
        },
    }
}
