pub mod export;
pub mod pdf;

pub use export::{ExportAssembler, ExportError, ExportFile, ExportFormat, ExportRequest, ExportSections};
pub use pdf::{CommandPdfRenderer, PdfError, PdfRenderer};
