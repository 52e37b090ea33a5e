//! Configuration validation for graph integrity.
//!
//! A config is checked in three stages, in order:
//!
//! 1. **Uniqueness**: every node id is unique
//! 2. **References**: every `depends_on` entry names a declared node
//! 3. **Cycle detection**: DFS with a recursion stack, skipped when the
//!    engine runs under [`CyclePolicy::FixedPoint`](crate::config::CyclePolicy)
//!
//! Cycle detection needs resolvable references, so it only runs once the
//! first two stages pass. All errors from a stage are reported together.
//!
//! # Examples
//!
//! ```rust
//! use dagboard::config::{validate_config, Config};
//! use dagboard::errors::ValidationError;
//!
//! let cfg: Config = serde_yaml::from_str(r#"
//! nodes:
//!   - { id: a, kind: table, depends_on: [b] }
//!   - { id: b, kind: table, depends_on: [a] }
//! "#).unwrap();
//!
//! match validate_config(&cfg) {
//!     Err(errors) => assert!(matches!(errors[0], ValidationError::CyclicDependency { .. })),
//!     Ok(()) => unreachable!(),
//! }
//! ```

use crate::config::Config;
use crate::errors::ValidationError;
use crate::graph::validate_structure;

/// Validate the graph a config describes.
///
/// Each `depends_on` entry is treated as an edge from the dependency into
/// the node that declares it.
pub fn validate_config(config: &Config) -> Result<(), Vec<ValidationError>> {
    let links = config.nodes.iter().flat_map(|node| {
        node.depends_on
            .iter()
            .map(move |dep| (dep.as_str(), node.id.as_str()))
    });

    validate_structure(
        config.nodes.iter().map(|n| n.id.as_str()),
        links,
        !config.engine.allows_cycles(),
    )
}
