//! Style resolution.
//!
//! Computed styles come from a [`StyleSource`], baselines from a
//! [`BaselineCache`]; the [`StyleEngine`] decides which computed values are
//! worth carrying into the document model.

mod baseline;
mod engine;
mod source;
mod whitelist;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub use baseline::{BaselineCache, BaselineProvider, UserAgentBaseline};
pub use engine::{inherited_from_parent, is_ua_diff, StyleEngine};
pub use source::{parse_inline_style, SnapshotStyleSource, StyleSource};
pub use whitelist::{is_inheritable, Whitelist, INHERITED_PROPERTIES, STANDARD_PROPERTIES};

/// Computed style of one element, keyed by kebab-case property
pub type StyleSnapshot = IndexMap<String, String>;

/// Which computed properties count as worth keeping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StyleMode {
    /// Every whitelisted property, no comparison
    All,
    /// Inheritable properties equal to the parent's value
    InheritedOnly,
    /// Properties differing from the tag baseline
    UaDiff,
    /// Either of the above
    #[default]
    UaDiffPlusInherited,
}
