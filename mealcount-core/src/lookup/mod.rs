//! Calorie lookup service.
//!
//! The history store only depends on the [`CalorieLookup`] trait; the HTTP
//! client is one implementation of it.

mod client;
mod error;

pub use client::{CalorieLookup, HttpCalorieLookup, CALORIES_ENDPOINT};
pub use error::{ErrorBody, LookupError};
