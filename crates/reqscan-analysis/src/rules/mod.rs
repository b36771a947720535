//! Static-analysis rule plugins over the run snapshot.

pub mod builtin;
pub mod registry;

pub use builtin::{DeadRoutinesRule, DuplicateHeadersRule, NearDuplicateRoutinesRule};
pub use registry::{RuleContext, RuleRegistry, StaticRule};
