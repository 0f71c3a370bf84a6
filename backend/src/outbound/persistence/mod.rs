//! PostgreSQL persistence adapters using Diesel.
//!
//! Repository implementations translate between Diesel rows and domain types
//! and contain no business logic. Connections come from a `bb8` pool driven
//! through `diesel-async`; every database error is mapped into the port's own
//! error type before it leaves this module.
//!
//! # Example
//!
//! ```ignore
//! use darasa::outbound::persistence::{DbPool, DieselJobInfoRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/darasa")).await?;
//! let job_infos = DieselJobInfoRepository::new(pool);
//! ```

mod diesel_basic_error_mapping;
mod diesel_feedback_repository;
mod diesel_interview_repository;
mod diesel_job_info_repository;
mod diesel_question_repository;
mod diesel_usage_counter;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_feedback_repository::DieselFeedbackRepository;
pub use diesel_interview_repository::DieselInterviewRepository;
pub use diesel_job_info_repository::DieselJobInfoRepository;
pub use diesel_question_repository::DieselQuestionRepository;
pub use diesel_usage_counter::DieselUsageCounter;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
