//! pollwatch-runtime: page model, output targets and the results poller.
//! The `pollwatch` binary wires these to the CLI configuration.

pub mod cli;
pub mod output;
pub mod page;
pub mod poller;
