// Scheduled Tasks Calendar export library
// Assembles, rasterizes and paginates calendar views into PDF downloads

pub mod models;
pub mod services;
pub mod utils;

pub use models::event::{CalendarEvent, EventId, TaskKind, TaskStatus};
pub use models::filters::CalendarFilters;
pub use models::request::ExportRequest;
pub use models::settings::ExportSettings;
pub use models::view::{export_filename, ViewMode};
pub use services::pdf::{ExportError, ExportOutcome, PdfExportService};
