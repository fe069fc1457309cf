//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods.
//! Methods that also run inside transactions accept any [`sqlx::PgExecutor`]
//! (a `&PgPool` or `&mut *tx`); the rest take `&PgPool`.

pub mod area_repo;
pub mod owner_repo;
pub mod progress_repo;
pub mod scenario_repo;
pub mod settings_repo;
pub mod solar_repo;
pub mod task_repo;
pub mod uploaded_file_repo;

pub use area_repo::AreaRepo;
pub use owner_repo::OwnerRepo;
pub use progress_repo::ProgressRepo;
pub use scenario_repo::ScenarioRepo;
pub use settings_repo::SettingsRepo;
pub use solar_repo::SolarRepo;
pub use task_repo::TaskRepo;
pub use uploaded_file_repo::UploadedFileRepo;
