//! ONNX-backed leaf severity classifier.
//!
//! Loads a four-class leaf model exported to ONNX and runs it with `tract`.
//! The optimized plan is immutable after loading and is shared by all
//! requests.

pub mod onnx;

pub use onnx::{ClassifierError, OnnxSeverityClassifier};
