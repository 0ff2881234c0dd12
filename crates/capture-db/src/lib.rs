//! Persistence for capture records
//!
//! [`CaptureRepository`] is the port the services depend on. Two adapters are
//! provided: [`PgCaptureRepository`] over PostgreSQL and
//! [`InMemoryCaptureRepository`] for tests and runs without a database.

pub mod memory;
pub mod postgres;
pub mod repository;

pub use memory::InMemoryCaptureRepository;
pub use postgres::{connect, run_migrations, PgCaptureRepository};
pub use repository::CaptureRepository;
