//! Git plumbing for diffpost.
//!
//! Everything here shells out to the `git` binary against a CI checkout:
//! listing the files a pull request touched, blaming individual lines and
//! reading commit subjects. Failures degrade rather than abort wherever the
//! report can still be produced without them.

pub mod blame;
pub mod changes;
pub mod filter;
pub mod history;
pub mod runner;
