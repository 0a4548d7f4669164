//! Interface to the leaf severity model.

use image::RgbImage;

use crate::error::CoreError;

/// A loaded, read-only severity model.
///
/// Implementations are shared across concurrent requests without locking,
/// so `classify` must not mutate the model.
pub trait SeverityClassifier: Send + Sync {
    /// Short identifier reported by the health endpoint.
    fn name(&self) -> &str;

    /// Classify one prepared `INPUT_SIZE` × `INPUT_SIZE` RGB raster.
    ///
    /// Returns the raw class index; callers reject anything above
    /// `MAX_SEVERITY`.
    fn classify(&self, image: &RgbImage) -> Result<usize, CoreError>;
}
