//! Common library for the CaseCycle application
//!
//! This crate provides shared infrastructure used across the CaseCycle
//! services: PostgreSQL connection pooling, database configuration, and
//! the database error taxonomy.

pub mod database;
pub mod error;
