//! Failure taxonomy of the export pipeline.

use thiserror::Error;

/// Errors raised while turning a laid-out document into a bitmap
#[derive(Debug, Error)]
pub enum RasterError {
    #[error("render surface of {width}x{height} px exceeds the {max} px height limit")]
    SurfaceTooLarge { width: u32, height: u32, max: u32 },
    #[error("failed to encode bitmap: {0}")]
    Encode(#[from] image::ImageError),
    #[error("render backend failed: {0}")]
    Backend(String),
}

/// Any failure of an export call; the user sees one generic message for all of them
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("an export is already in progress")]
    InProgress,
    #[error(transparent)]
    Raster(#[from] RasterError),
    #[error("rasterized document has no rows")]
    EmptyCapture,
    #[error("failed to write PDF: {0:#}")]
    Pdf(anyhow::Error),
    #[error("failed to deliver PDF: {0:#}")]
    Delivery(anyhow::Error),
}
