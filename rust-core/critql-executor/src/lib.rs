// SPDX-License-Identifier: PMPL-1.0-or-later
//! critql Executor
//!
//! Runs compiled criteria against a [`SearchBackend`]. The executor owns the
//! concerns the compiler leaves out: collection scoping, sort keys, page
//! windows. An [`InMemorySearchBackend`] evaluates queries directly over JSON
//! documents for tests and local development.

pub mod backend;
pub mod config;
pub mod error;
pub mod executor;
pub mod memory;
pub mod page;

pub use backend::{Document, SearchBackend};
pub use config::ExecutorConfig;
pub use error::BackendError;
pub use executor::CriteriaExecutor;
pub use memory::InMemorySearchBackend;
pub use page::{Direction, Order, Page, Pageable, Sort};
