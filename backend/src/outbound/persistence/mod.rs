//! PostgreSQL persistence adapters using Diesel.
//!
//! Repositories implement the domain's driven ports on top of `diesel-async`
//! with a `bb8` pool. Row structs (`models.rs`) and table definitions
//! (`schema.rs`) stay private to this module; rows are re-validated through
//! the domain constructors on the way out.
//!
//! # Example
//!
//! ```ignore
//! use medcycle::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/medcycle")).await?;
//! let users = DieselUserRepository::new(pool);
//! ```

mod diesel_basic_error_mapping;
mod diesel_community_repository;
mod diesel_medicine_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_community_repository::DieselCommunityRepository;
pub use diesel_medicine_repository::DieselMedicineRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
