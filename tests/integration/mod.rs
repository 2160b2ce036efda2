//! Integration tests for kvdir

mod cli_contracts;
mod concurrent_materialize;
mod namespace_scenarios;
mod orphan_boundary;
mod sled_backend;
mod store_failures;
mod support;
