//! pollwatch-core: poll result payload types and markup rendering.
//! Pure functions only; fetching and scheduling live in the runtime crate.

pub mod render;
pub mod types;

pub use render::{MISSING_POLL_ID, NO_RESULTS, escape_html, render_error, render_results};
pub use types::{OptionId, PollOption, PollResultPayload, ResultRow};
