//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts

pub mod area;
pub mod progress;
pub mod scenario;
pub mod settings;
pub mod solar;
pub mod task;
pub mod uploaded_file;
