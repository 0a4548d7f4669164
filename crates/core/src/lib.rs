//! SuperMango domain logic.
//!
//! Turns a batch of mango-leaf photos and a weather reading into a disease
//! severity summary and a treatment recommendation. Everything here is
//! synchronous and request-scoped; the model itself sits behind
//! [`classifier::SeverityClassifier`].

pub mod advisory;
pub mod batch;
pub mod classifier;
pub mod error;
pub mod leaf;
pub mod prescription;
pub mod severity;
pub mod weather;
