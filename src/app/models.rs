use serde::Serialize;
use std::collections::BTreeSet;

/// Represents the final configuration after merging the file and CLI args.
///
/// Built once at start-up, held unchanged for the rest of the run. The
/// utility-class generation tool is the sole consumer of the two fields: it
/// globs `content` for files to scan and keeps every `safelist` entry in its
/// output whether or not the scan ever encounters it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanConfig {
    /// Glob patterns selecting the files scanned for class-name usage, in
    /// declaration order.
    pub content: Vec<String>,
    /// Class names exempt from usage-based pruning.
    pub safelist: BTreeSet<String>,
}
