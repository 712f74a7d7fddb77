//! pollwatch-http: poll results IO boundary.
//! Builds the results endpoint URL, performs the GET and parses the body as
//! JSON. Payload interpretation stays in `pollwatch-core`.

pub mod error;
pub mod fetcher;

pub use error::FetchError;
pub use fetcher::{DEFAULT_BASE_URL, HttpFetcher, ResultsFetcher, result_url};
