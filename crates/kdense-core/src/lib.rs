#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

//! Shared building blocks for the research agent: configuration, the
//! closed error taxonomy, domain types and the document store.

pub mod answer;
pub mod config;
pub mod error;
pub mod response;
pub mod snapshot;
pub mod store;
pub mod tooling;
pub mod traits;
pub mod types;
