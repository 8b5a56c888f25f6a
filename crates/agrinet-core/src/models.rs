//! Domain models for Agrinet.
//!
//! These are the core types shared across all crates.

pub mod account_link;
pub mod certificate;
pub mod entity;
pub mod profile;
pub mod project;
pub mod review;
pub mod service;
pub mod session;
pub mod user;
pub mod validation;
