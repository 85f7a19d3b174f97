//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **messaging**: WhatsApp delivery through a Twilio-compatible REST API
//! - **credentials**: Argon2id password hashing
//!
//! Adapters are thin translators between domain types and infrastructure
//! representations. They contain no business logic.

pub mod credentials;
pub mod messaging;
pub mod persistence;
