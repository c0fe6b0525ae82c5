//! Calendar PDF export pipeline.
//!
//! A request is assembled into a [`document::Document`], rasterized in an
//! offscreen container, sliced into pages and handed to an [`output::OutputSink`].

pub mod assembler;
pub mod document;
pub mod error;
pub mod html;
pub mod output;
pub mod paginator;
pub mod progress;
pub mod raster;
pub mod service;
pub mod surface;

pub use assembler::DocumentAssembler;
pub use error::{ExportError, RasterError};
pub use output::{DirectorySink, MemorySink, OutputSink};
pub use progress::{toast_callback, ToastCallback};
pub use raster::{BitmapRasterizer, Capture, Rasterizer};
pub use service::{ExportOutcome, PdfExportService};
