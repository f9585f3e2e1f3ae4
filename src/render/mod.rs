//! Textual encodings of the index.
//!
//! Each format is a lossy projection of the same [`ProjectIndex`]; all of
//! them are deterministic functions of the index value, with no wall-clock or
//! randomness, so rendered output for an unchanged index is byte-stable.

pub mod dsl;
pub mod graph;
pub mod json;
pub mod report;
pub mod tree;

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::debug;

use crate::error::{CodemapError, Result};
use crate::index::ProjectIndex;

/// Node count at which `Auto` switches from the rich report to the compact
/// tag-DSL.
pub const AUTO_DSL_THRESHOLD: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderFormat {
    Dsl,
    Graph,
    Tree,
    Report,
    Json,
    /// Size-based selection: `Report` for small projects, `Dsl` at or above
    /// [`AUTO_DSL_THRESHOLD`] files.
    Auto,
}

impl RenderFormat {
    pub const NAMES: [&'static str; 6] = ["dsl", "graph", "tree", "report", "json", "auto"];

    /// The format `Auto` resolves to for a given project size.
    pub fn auto_for(total_files: usize, threshold: usize) -> RenderFormat {
        if total_files >= threshold {
            RenderFormat::Dsl
        } else {
            RenderFormat::Report
        }
    }

    fn resolve(self, index: &ProjectIndex) -> RenderFormat {
        match self {
            RenderFormat::Auto => {
                Self::auto_for(index.metadata.total_files, AUTO_DSL_THRESHOLD)
            }
            other => other,
        }
    }
}

impl FromStr for RenderFormat {
    type Err = CodemapError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "dsl" => Ok(RenderFormat::Dsl),
            "graph" => Ok(RenderFormat::Graph),
            "tree" => Ok(RenderFormat::Tree),
            "report" => Ok(RenderFormat::Report),
            "json" => Ok(RenderFormat::Json),
            "auto" => Ok(RenderFormat::Auto),
            other => Err(CodemapError::UnknownFormat(other.to_string())),
        }
    }
}

/// Render the index in the requested format.
pub fn render(index: &ProjectIndex, format: RenderFormat) -> String {
    let resolved = format.resolve(index);
    debug!(?format, ?resolved, files = index.metadata.total_files, "rendering index");
    match resolved {
        RenderFormat::Dsl => dsl::render(index),
        RenderFormat::Graph => graph::render(index),
        RenderFormat::Tree => tree::render(index),
        RenderFormat::Report => report::render(index),
        RenderFormat::Json => json::render(index),
        RenderFormat::Auto => unreachable!("resolve never returns Auto"),
    }
}

/// Size comparison between the full pretty-printed index and one rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompressionStats {
    pub original_size: usize,
    pub compressed_size: usize,
    pub reduction_percent: f64,
    pub estimated_token_count: usize,
}

/// Compare a rendering against the pretty-printed full index.
///
/// The token estimate is `ceil(chars / 4)`; a heuristic, not a tokenizer,
/// chosen for stability across calls.
pub fn compression_stats(index: &ProjectIndex, rendered: &str) -> Result<CompressionStats> {
    let original = serde_json::to_string_pretty(index)?;
    let original_size = original.len();
    let compressed_size = rendered.len();
    let reduction_percent = if original_size == 0 {
        0.0
    } else {
        (1.0 - compressed_size as f64 / original_size as f64) * 100.0
    };
    let chars = rendered.chars().count();
    let estimated_token_count = chars.div_ceil(4);

    Ok(CompressionStats {
        original_size,
        compressed_size,
        reduction_percent,
        estimated_token_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::extract;
    use crate::index::{FileInfo, GraphBuilder};

    fn small_index() -> ProjectIndex {
        let records = vec![
            (
                "src/a.ts".to_string(),
                extract(
                    "import { b } from './b';\nexport function go(n: number): void {}\n",
                    "src/a.ts",
                ),
            ),
            (
                "src/b.ts".to_string(),
                extract("export const B = 1;\n", "src/b.ts"),
            ),
        ];
        GraphBuilder::new("/p").build(records).index
    }

    #[test]
    fn format_names_parse() {
        for name in RenderFormat::NAMES {
            assert!(RenderFormat::from_str(name).is_ok());
        }
        assert!(matches!(
            RenderFormat::from_str("yaml"),
            Err(CodemapError::UnknownFormat(_))
        ));
    }

    #[test]
    fn auto_picks_report_below_threshold() {
        let index = small_index();
        assert_eq!(
            render(&index, RenderFormat::Auto),
            render(&index, RenderFormat::Report)
        );
    }

    #[test]
    fn auto_picks_dsl_at_threshold() {
        let records: Vec<(String, FileInfo)> = (0..AUTO_DSL_THRESHOLD)
            .map(|i| (format!("src/f{i}.ts"), FileInfo::default()))
            .collect();
        let index = GraphBuilder::new("/p").build(records).index;
        assert_eq!(
            render(&index, RenderFormat::Auto),
            render(&index, RenderFormat::Dsl)
        );
    }

    #[test]
    fn rendering_is_deterministic() {
        let index = small_index();
        for format in [
            RenderFormat::Dsl,
            RenderFormat::Graph,
            RenderFormat::Tree,
            RenderFormat::Report,
            RenderFormat::Json,
        ] {
            assert_eq!(render(&index, format), render(&index, format));
        }
    }

    #[test]
    fn dsl_and_graph_compress_a_nonempty_index() {
        let index = small_index();
        for format in [RenderFormat::Dsl, RenderFormat::Graph] {
            let rendered = render(&index, format);
            let stats = compression_stats(&index, &rendered).unwrap();
            assert!(
                stats.compressed_size < stats.original_size,
                "{format:?} did not compress"
            );
            assert!(stats.reduction_percent > 0.0);
        }
    }

    #[test]
    fn token_estimate_is_ceil_of_quarter_chars() {
        let index = small_index();
        let stats = compression_stats(&index, "abcde").unwrap();
        assert_eq!(stats.estimated_token_count, 2);
        let stats = compression_stats(&index, "").unwrap();
        assert_eq!(stats.estimated_token_count, 0);
    }
}
