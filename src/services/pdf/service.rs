//! PDF export service implementation

use anyhow::anyhow;
use chrono::Local;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use super::assembler::{DocumentAssembler, DOCUMENT_TITLE};
use super::error::{ExportError, RasterError};
use super::html::to_html;
use super::output::{DirectorySink, OutputSink};
use super::paginator::{PageWriter, RenderedPdf};
use super::progress::{ProgressReporter, ToastCallback};
use super::raster::{BitmapRasterizer, Rasterizer};
use super::surface::RenderHost;
use crate::models::request::ExportRequest;
use crate::models::settings::ExportSettings;
use crate::models::view::export_filename;

/// Result of a successful export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOutcome {
    pub filename: String,
    pub location: PathBuf,
    pub page_count: usize,
    pub size_bytes: usize,
}

/// Service for exporting calendar views to PDF
pub struct PdfExportService<R = BitmapRasterizer> {
    settings: ExportSettings,
    rasterizer: Arc<R>,
    sink: Box<dyn OutputSink>,
    host: RenderHost,
    in_flight: Arc<AtomicBool>,
}

impl PdfExportService<BitmapRasterizer> {
    /// Service writing into the configured download directory
    pub fn new(settings: ExportSettings) -> anyhow::Result<Self> {
        let sink = DirectorySink::from_settings(&settings);
        Self::with_sink(settings, sink)
    }

    pub fn with_sink(
        settings: ExportSettings,
        sink: impl OutputSink + 'static,
    ) -> anyhow::Result<Self> {
        let rasterizer = BitmapRasterizer::new(&settings);
        Self::with_rasterizer(settings, rasterizer, sink)
    }
}

impl<R: Rasterizer + Send + Sync + 'static> PdfExportService<R> {
    /// Fails when `settings` do not pass [`ExportSettings::validate`]
    pub fn with_rasterizer(
        settings: ExportSettings,
        rasterizer: R,
        sink: impl OutputSink + 'static,
    ) -> anyhow::Result<Self> {
        settings
            .validate()
            .map_err(|e| anyhow!("Invalid export settings: {}", e))?;

        Ok(Self {
            settings,
            rasterizer: Arc::new(rasterizer),
            sink: Box::new(sink),
            host: RenderHost::new(),
            in_flight: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn settings(&self) -> &ExportSettings {
        &self.settings
    }

    /// Host owning the offscreen containers of running exports
    pub fn render_host(&self) -> &RenderHost {
        &self.host
    }

    pub fn is_exporting(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Export `request` and deliver the file.
    ///
    /// Progress goes to `on_update_toast`. Every failure is logged and shown
    /// as one generic message; nothing is delivered on failure. A call made
    /// while another export is running is rejected with
    /// [`ExportError::InProgress`].
    pub async fn export(
        &self,
        request: &ExportRequest,
        on_update_toast: ToastCallback,
    ) -> Result<ExportOutcome, ExportError> {
        let reporter = ProgressReporter::new(on_update_toast, self.settings.toast_duration());

        let Some(_guard) = InFlightGuard::acquire(&self.in_flight) else {
            log::warn!("Rejected {} export: another export is running", request.view);
            reporter.busy();
            return Err(ExportError::InProgress);
        };

        let label = request.view.label();
        reporter.started(label, request.events.len());

        match self.run(request).await {
            Ok(outcome) => {
                log::info!(
                    "Exported {} events to {:?} ({} pages, {} bytes)",
                    request.events.len(),
                    outcome.location,
                    outcome.page_count,
                    outcome.size_bytes
                );
                reporter.succeeded(label);
                Ok(outcome)
            }
            Err(e) => {
                log::error!("Failed to export PDF: {}", e);
                reporter.failed();
                Err(e)
            }
        }
    }

    /// HTML preview of the document an export of `request` would render
    pub fn preview_html(&self, request: &ExportRequest) -> String {
        let document = DocumentAssembler::new(&self.settings, Local::now().naive_local())
            .assemble(request);
        to_html(&document, self.settings.render_width_px)
    }

    async fn run(&self, request: &ExportRequest) -> Result<ExportOutcome, ExportError> {
        let started = Instant::now();
        let document = DocumentAssembler::new(&self.settings, Local::now().naive_local())
            .assemble(request);
        log::debug!(
            "Assembled {} blocks ({} page breaks) in {:?}",
            document.blocks.len(),
            document.page_breaks(),
            started.elapsed()
        );

        let container = self.host.attach(document, self.settings.render_width_px);

        let settle = self.rasterizer.settled(&container);
        if tokio::time::timeout(self.settings.settle_timeout(), settle)
            .await
            .is_err()
        {
            log::warn!(
                "Render resources not settled after {:?}; capturing anyway",
                self.settings.settle_timeout()
            );
        }

        // Painting and JPEG encoding run on the blocking pool; the container
        // detaches when the task finishes or unwinds
        let rasterizer = Arc::clone(&self.rasterizer);
        let settings = self.settings.clone();
        let pdf = tokio::task::spawn_blocking(move || -> Result<RenderedPdf, ExportError> {
            let capture = rasterizer.rasterize(&container)?;
            drop(container);
            log::debug!(
                "Captured {}x{} px after {:?}",
                capture.width(),
                capture.height(),
                started.elapsed()
            );
            PageWriter::new(&settings).write(&capture, DOCUMENT_TITLE)
        })
        .await
        .map_err(|e| RasterError::Backend(format!("render task failed: {}", e)))??;

        let filename = export_filename(request.view, request.date);
        let location = self
            .sink
            .deliver(&filename, &pdf.bytes)
            .map_err(ExportError::Delivery)?;

        Ok(ExportOutcome {
            filename,
            location,
            page_count: pdf.page_count,
            size_bytes: pdf.bytes.len(),
        })
    }
}

/// Marks an export as running until dropped
struct InFlightGuard {
    flag: Arc<AtomicBool>,
}

impl InFlightGuard {
    fn acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self {
                flag: Arc::clone(flag),
            })
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
