//! TestOps core: pure job model, status lifecycle and list/merge rules.
mod extract;
mod kind;
mod list;
mod status;
mod summary;
mod view;

pub use extract::{extract_metadata, ResultMetadata};
pub use kind::JobKind;
pub use list::JobList;
pub use status::JobStatus;
pub use summary::{JobSummary, JobUpdate};
pub use view::LiveJobView;
