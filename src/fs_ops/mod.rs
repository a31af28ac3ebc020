//! Safe in-place file header rewriting, modularized.
//!
//! Flow: `rewrite` opens the target, `staging` creates a sibling, `io_copy` streams
//! transform + body into it, `atomic` swaps it in with rollback on failure.

pub mod atomic;
pub mod hints;
pub mod io_copy;
pub mod rewrite;
pub mod staging;
pub mod transform;

pub use atomic::{commit, CommitOutcome, CommitState, Namespace, StdNamespace, Transaction};
pub use io_copy::{CopyResult, DurabilityMode};
pub use rewrite::{rewrite_head, rewrite_head_with, RewriteOptions, RewriteOutcome};
pub use staging::StagedFile;
pub use transform::{discard_exact, HeaderTransform};
