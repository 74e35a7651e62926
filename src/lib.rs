//! The library code for the `docr` static site generator. The architecture
//! can be generally broken down into two distinct steps:
//!
//! 1. Loading pages from dated markdown source files on disk ([`crate::page`])
//! 2. Converting the pages into output files on disk ([`crate::write`] and
//!    [`crate::feed`])
//!
//! The first step is where the interesting decisions live: a page's title and
//! publish date are derived from its file name when the name follows the
//! `yyyy-mm-dd-title.md` convention, and from filesystem metadata otherwise
//! ([`crate::page::parse_base_name`]). The resulting page collection is sorted
//! newest-first and consumed three ways: one output HTML file per page, a
//! navigation fragment of dated links on the index page ([`crate::navbar`]),
//! and an RSS feed ([`crate::feed`]).
//!
//! Everything is a full rebuild: pages are materialized once per run, held in
//! memory, and discarded when the run completes. There is no caching and no
//! partial-success mode; the first unrecoverable error aborts the run.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod build;
pub mod config;
pub mod feed;
pub mod markdown;
pub mod navbar;
pub mod page;
pub mod write;
