//! Agrinet Core — domain models, repository traits, and the shared
//! error taxonomy for the agricultural professional network.

pub mod error;
pub mod models;
pub mod repository;
