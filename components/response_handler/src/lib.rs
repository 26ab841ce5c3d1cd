//! Decision stage of the update pipeline
//!
//! Turns an [`OmahaResponse`](update_types::OmahaResponse) into an
//! [`InstallPlan`](update_types::InstallPlan), or decides the update must
//! not proceed. This is where rollback avoidance, p2p URL substitution,
//! hash-check policy, resume detection and install device resolution are
//! applied, before any payload bytes are downloaded.

mod action;
mod deadline;
mod decision;
mod error;
mod handler;
mod hash_policy;

pub use action::ResponseHandlerAction;
pub use deadline::{DeadlineFile, DEFAULT_DEADLINE_FILE};
pub use decision::Decision;
pub use error::{DeadlineError, Result};
pub use handler::ResponseHandler;
pub use hash_policy::mandatory_hash_checks;
