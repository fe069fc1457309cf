//! Domain logic for the scenario/task backend.
//!
//! Everything in this crate is free of database access. Repositories in
//! `ports_db` and handlers in `ports_api` call into these modules for the
//! rules that do not depend on storage.

pub mod error;
pub mod geometry;
pub mod owner;
pub mod progress;
pub mod results;
pub mod scenario_id;
pub mod simulation;
pub mod storage;
pub mod task;
pub mod types;
