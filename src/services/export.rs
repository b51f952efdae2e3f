//! Export assembler: gathers care logs for every baby a user owns and renders
//! them as CSV, HTML or PDF.
//!
//! Both renderers walk the same [`BabyReport`] structure, so the CSV and the
//! HTML/PDF documents always carry the same sections in the same order. Sections
//! with no rows still appear, with a `No <x> records found` line in place of the
//! table.

use std::sync::Arc;

use futures::future::try_join_all;
use handlebars::Handlebars;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info};

use super::pdf::{PdfError, PdfRenderer};
use crate::api::extract::parse_optional_date;
use crate::database::manager::DatabaseError;
use crate::database::models::{Baby, DateRange, FeedingSchedule, Growth, Milestone, StoolEntry};
use crate::database::ports::{
    BabyRepository, ExportRepository, FeedingRepository, GrowthRepository, MilestoneRepository,
    StoolRepository,
};
use crate::error::ApiError;

const DOCUMENT_TITLE: &str = "Baby Records Export";
const NO_BABIES: &str = "No babies found";
const HTML_TEMPLATE_NAME: &str = "export";

const HTML_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{{title}}</title>
<style>
  body { font-family: Helvetica, Arial, sans-serif; font-size: 12px; color: #222; }
  h1 { font-size: 20px; }
  h2 { font-size: 16px; border-bottom: 1px solid #ccc; padding-bottom: 4px; }
  h3 { font-size: 13px; margin-bottom: 4px; }
  table { border-collapse: collapse; width: 100%; margin-bottom: 12px; }
  th, td { border: 1px solid #ddd; padding: 4px 6px; text-align: left; }
  th { background: #f4f4f4; }
  .empty { color: #777; font-style: italic; }
</style>
</head>
<body>
<h1>{{title}}</h1>
<p>Date Range: {{range}}</p>
{{#each babies}}
<section>
<h2>{{name}}</h2>
<p>Birthdate: {{birthdate}}</p>
{{#each sections}}
<h3>{{title}}</h3>
{{#if rows}}
<table>
<thead><tr>{{#each headers}}<th>{{this}}</th>{{/each}}</tr></thead>
<tbody>
{{#each rows}}<tr>{{#each this}}<td>{{this}}</td>{{/each}}</tr>
{{/each}}</tbody>
</table>
{{else}}
<p class="empty">{{empty_message}}</p>
{{/if}}
{{/each}}
</section>
{{else}}
<p class="empty">{{@root.no_babies}}</p>
{{/each}}
</body>
</html>
"#;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV buffer error: {0}")]
    CsvBuffer(String),

    #[error("Template error: {0}")]
    Template(#[from] handlebars::RenderError),

    #[error("Template registration error: {0}")]
    TemplateRegistration(#[from] Box<handlebars::TemplateError>),

    #[error(transparent)]
    Pdf(#[from] PdfError),
}

impl From<ExportError> for ApiError {
    fn from(err: ExportError) -> Self {
        match err {
            ExportError::Database(db) => db.into(),
            other => {
                error!("Export failed: {}", other);
                ApiError::internal_server_error("Failed to generate export")
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Pdf,
    Html,
}

impl ExportFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "csv" => Some(ExportFormat::Csv),
            "pdf" => Some(ExportFormat::Pdf),
            "html" => Some(ExportFormat::Html),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Pdf => "pdf",
            ExportFormat::Html => "html",
        }
    }

    pub fn extension(self) -> &'static str {
        self.as_str()
    }

    pub fn content_type(self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv; charset=utf-8",
            ExportFormat::Pdf => "application/pdf",
            ExportFormat::Html => "text/html; charset=utf-8",
        }
    }
}

/// Which care logs to include
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportSections {
    pub growth: bool,
    pub milestones: bool,
    pub feeding: bool,
    pub stool: bool,
}

impl ExportSections {
    pub fn is_empty(&self) -> bool {
        !(self.growth || self.milestones || self.feeding || self.stool)
    }

    /// Selected section keys in canonical order
    pub fn keys(&self) -> Vec<&'static str> {
        [
            (self.growth, "growth"),
            (self.milestones, "milestones"),
            (self.feeding, "feeding"),
            (self.stool, "stool"),
        ]
        .into_iter()
        .filter_map(|(selected, key)| selected.then_some(key))
        .collect()
    }
}

/// Validated export parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRequest {
    pub format: ExportFormat,
    pub range: DateRange,
    pub sections: ExportSections,
}

impl ExportRequest {
    pub fn parse(
        format: Option<&str>,
        start_date: Option<&str>,
        end_date: Option<&str>,
        sections: ExportSections,
    ) -> Result<Self, ApiError> {
        let format = match format.map(str::trim).filter(|f| !f.is_empty()) {
            Some(raw) => ExportFormat::parse(raw)
                .ok_or_else(|| ApiError::bad_request("Invalid format: expected csv, pdf or html"))?,
            None => return Err(ApiError::missing_fields(&["format"])),
        };

        if sections.is_empty() {
            return Err(ApiError::bad_request("Select at least one section to export"));
        }

        let start = parse_optional_date("startDate", start_date)?;
        let end = parse_optional_date("endDate", end_date)?;
        if let (Some(s), Some(e)) = (start, end) {
            if s > e {
                return Err(ApiError::bad_request("startDate must be on or before endDate"));
            }
        }

        Ok(Self {
            format,
            range: DateRange::new(start, end),
            sections,
        })
    }

    /// `baby-records_<sections>_<range>.<ext>`
    pub fn file_name(&self) -> String {
        format!(
            "baby-records_{}_{}.{}",
            self.sections.keys().join("-"),
            self.range.label(),
            self.format.extension()
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub content_type: &'static str,
}

/// Rendered table for one care log of one baby
#[derive(Debug, Clone, Serialize)]
struct Section {
    title: &'static str,
    empty_message: &'static str,
    headers: &'static [&'static str],
    rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, Serialize)]
struct BabyReport {
    name: String,
    birthdate: String,
    sections: Vec<Section>,
}

#[derive(Serialize)]
struct HtmlView<'a> {
    title: &'static str,
    no_babies: &'static str,
    range: String,
    babies: &'a [BabyReport],
}

fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn growth_section(rows: Vec<Growth>) -> Section {
    Section {
        title: "Growth Records",
        empty_message: "No growth records found",
        headers: &["Date", "Height", "Weight", "Notes"],
        rows: rows
            .iter()
            .map(|g| vec![g.date.to_string(), g.height.to_string(), g.weight.to_string(), text(&g.notes)])
            .collect(),
    }
}

fn milestone_section(rows: Vec<Milestone>) -> Section {
    Section {
        title: "Milestones",
        empty_message: "No milestone records found",
        headers: &["Date", "Title", "Details"],
        rows: rows
            .iter()
            .map(|m| vec![m.date.to_string(), m.title.clone(), text(&m.details)])
            .collect(),
    }
}

fn feeding_section(rows: Vec<FeedingSchedule>) -> Section {
    Section {
        title: "Feeding Schedule",
        empty_message: "No feeding records found",
        headers: &["Date", "Time", "Meal", "Type", "Amount", "Issues", "Notes"],
        rows: rows
            .iter()
            .map(|f| {
                vec![
                    f.date.to_string(),
                    f.time.format("%H:%M:%S").to_string(),
                    f.meal.clone(),
                    f.feeding_type.clone(),
                    text(&f.amount),
                    text(&f.issues),
                    text(&f.notes),
                ]
            })
            .collect(),
    }
}

fn stool_section(rows: Vec<StoolEntry>) -> Section {
    Section {
        title: "Stool Records",
        empty_message: "No stool records found",
        headers: &["Timestamp", "Color", "Consistency", "Notes"],
        rows: rows
            .iter()
            .map(|s| {
                vec![
                    s.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
                    s.color.clone(),
                    s.consistency.clone(),
                    text(&s.notes),
                ]
            })
            .collect(),
    }
}

pub struct ExportAssembler {
    babies: Arc<dyn BabyRepository>,
    growth: Arc<dyn GrowthRepository>,
    milestones: Arc<dyn MilestoneRepository>,
    feeding: Arc<dyn FeedingRepository>,
    stool: Arc<dyn StoolRepository>,
    exports: Arc<dyn ExportRepository>,
    pdf: Arc<dyn PdfRenderer>,
    templates: Handlebars<'static>,
}

impl ExportAssembler {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        babies: Arc<dyn BabyRepository>,
        growth: Arc<dyn GrowthRepository>,
        milestones: Arc<dyn MilestoneRepository>,
        feeding: Arc<dyn FeedingRepository>,
        stool: Arc<dyn StoolRepository>,
        exports: Arc<dyn ExportRepository>,
        pdf: Arc<dyn PdfRenderer>,
    ) -> Result<Self, ExportError> {
        let mut templates = Handlebars::new();
        templates
            .register_template_string(HTML_TEMPLATE_NAME, HTML_TEMPLATE)
            .map_err(Box::new)?;

        Ok(Self {
            babies,
            growth,
            milestones,
            feeding,
            stool,
            exports,
            pdf,
            templates,
        })
    }

    /// Build the document, record it in the export history, then hand back the bytes
    pub async fn assemble(&self, user_id: i32, request: &ExportRequest) -> Result<ExportFile, ExportError> {
        let mut babies = self.babies.list_for_user(user_id).await?;
        babies.sort_by_key(|b| b.baby_id);

        let reports = try_join_all(
            babies
                .into_iter()
                .map(|baby| self.collect(baby, request.range, request.sections)),
        )
        .await?;

        let bytes = match request.format {
            ExportFormat::Csv => render_csv(&reports, &request.range)?,
            ExportFormat::Html => self.render_html(&reports, &request.range)?.into_bytes(),
            ExportFormat::Pdf => {
                let html = self.render_html(&reports, &request.range)?;
                self.pdf.render(&html).await?
            }
        };

        let file_name = request.file_name();
        self.exports
            .record_export(user_id, &file_name, request.format.as_str())
            .await?;

        info!(
            "User {} exported {} ({} bytes, {} babies)",
            user_id,
            file_name,
            bytes.len(),
            reports.len()
        );

        Ok(ExportFile {
            bytes,
            file_name,
            content_type: request.format.content_type(),
        })
    }

    async fn collect(&self, baby: Baby, range: DateRange, sections: ExportSections) -> Result<BabyReport, DatabaseError> {
        let id = baby.baby_id;
        let mut out = Vec::new();

        if sections.growth {
            out.push(growth_section(self.growth.list(id, range).await?));
        }
        if sections.milestones {
            out.push(milestone_section(self.milestones.list(id, range).await?));
        }
        if sections.feeding {
            out.push(feeding_section(self.feeding.list(id, range).await?));
        }
        if sections.stool {
            out.push(stool_section(self.stool.list(id, range).await?));
        }

        Ok(BabyReport {
            name: baby.full_name(),
            birthdate: baby.birthdate.to_string(),
            sections: out,
        })
    }

    fn render_html(&self, reports: &[BabyReport], range: &DateRange) -> Result<String, ExportError> {
        let view = HtmlView {
            title: DOCUMENT_TITLE,
            no_babies: NO_BABIES,
            range: range.describe(),
            babies: reports,
        };
        Ok(self.templates.render(HTML_TEMPLATE_NAME, &view)?)
    }
}

fn render_csv(reports: &[BabyReport], range: &DateRange) -> Result<Vec<u8>, ExportError> {
    let mut wtr = csv::WriterBuilder::new()
        .flexible(true)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    let blank: [&str; 0] = [];

    wtr.write_record([DOCUMENT_TITLE])?;
    wtr.write_record(["Date Range", range.describe().as_str()])?;
    wtr.write_record(blank)?;

    if reports.is_empty() {
        wtr.write_record([NO_BABIES])?;
    }

    for report in reports {
        wtr.write_record(["Baby", report.name.as_str()])?;
        wtr.write_record(["Birthdate", report.birthdate.as_str()])?;
        wtr.write_record(blank)?;

        for section in &report.sections {
            wtr.write_record([section.title])?;
            if section.rows.is_empty() {
                wtr.write_record([section.empty_message])?;
            } else {
                wtr.write_record(section.headers)?;
                for row in &section.rows {
                    wtr.write_record(row)?;
                }
            }
            wtr.write_record(blank)?;
        }
    }

    wtr.into_inner().map_err(|e| ExportError::CsvBuffer(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MemoryStore, StubPdfRenderer};
    use chrono::NaiveDate;

    fn assembler(store: &Arc<MemoryStore>) -> ExportAssembler {
        ExportAssembler::new(
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            Arc::new(StubPdfRenderer),
        )
        .unwrap()
    }

    fn sections(growth: bool, milestones: bool, feeding: bool, stool: bool) -> ExportSections {
        ExportSections { growth, milestones, feeding, stool }
    }

    #[test]
    fn file_name_is_deterministic() {
        let request = ExportRequest::parse(
            Some("csv"),
            Some("2024-01-01"),
            Some("2024-03-31"),
            sections(true, false, true, true),
        )
        .unwrap();
        assert_eq!(request.file_name(), "baby-records_growth-feeding-stool_2024-01-01_to_2024-03-31.csv");

        let request = ExportRequest::parse(Some("PDF"), None, None, sections(false, true, false, false)).unwrap();
        assert_eq!(request.file_name(), "baby-records_milestones_all-time.pdf");
    }

    #[test]
    fn request_validation() {
        let none = ExportSections::default();
        let growth = sections(true, false, false, false);
        assert!(ExportRequest::parse(Some("csv"), None, None, none).is_err());
        assert!(ExportRequest::parse(Some("docx"), None, None, growth).is_err());
        assert_eq!(
            ExportRequest::parse(None, None, None, growth).unwrap_err().message(),
            "Missing required fields: format"
        );
        assert!(ExportRequest::parse(Some("csv"), Some("2024-02-01"), Some("2024-01-01"), growth).is_err());
        assert!(ExportRequest::parse(Some("csv"), Some("01/02/2024"), None, growth).is_err());
    }

    #[tokio::test]
    async fn csv_marks_empty_sections() {
        let store = Arc::new(MemoryStore::new());
        let user = store.seed_user("parent@example.com", "parent");
        store.seed_baby(user.user_id, "Ada");

        let request = ExportRequest::parse(Some("csv"), None, None, sections(true, false, false, false)).unwrap();
        let file = assembler(&store).assemble(user.user_id, &request).await.unwrap();
        let body = String::from_utf8(file.bytes).unwrap();
        let lines: Vec<&str> = body.lines().collect();

        let header = lines.iter().position(|l| *l == "Growth Records").unwrap();
        assert_eq!(lines[header + 1], "No growth records found");
        assert_eq!(lines[0], "Baby Records Export");
        assert_eq!(file.content_type, "text/csv; charset=utf-8");
        assert_eq!(store.export_count(user.user_id), 1);
    }

    #[tokio::test]
    async fn csv_filters_rows_by_range_and_escapes_fields() {
        let store = Arc::new(MemoryStore::new());
        let user = store.seed_user("parent@example.com", "parent");
        let baby = store.seed_baby(user.user_id, "Ada");
        let d = |s: &str| NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap();
        store.seed_growth(baby.baby_id, d("2024-01-10"), 50.5, 3.4, Some("first, check"));
        store.seed_growth(baby.baby_id, d("2023-12-01"), 48.0, 3.1, None);

        let request = ExportRequest::parse(
            Some("csv"),
            Some("2024-01-01"),
            Some("2024-01-31"),
            sections(true, false, false, false),
        )
        .unwrap();
        let file = assembler(&store).assemble(user.user_id, &request).await.unwrap();
        let body = String::from_utf8(file.bytes).unwrap();

        assert!(body.contains("Date,Height,Weight,Notes\n"));
        assert!(body.contains("2024-01-10,50.5,3.4,\"first, check\"\n"));
        assert!(!body.contains("2023-12-01"));
        assert!(body.contains("Date Range,2024-01-01 to 2024-01-31\n"));
    }

    #[tokio::test]
    async fn user_without_babies_gets_placeholder() {
        let store = Arc::new(MemoryStore::new());
        let user = store.seed_user("parent@example.com", "parent");

        let request = ExportRequest::parse(Some("csv"), None, None, sections(true, true, true, true)).unwrap();
        let file = assembler(&store).assemble(user.user_id, &request).await.unwrap();
        assert!(String::from_utf8(file.bytes).unwrap().lines().any(|l| l == "No babies found"));

        let request = ExportRequest::parse(Some("html"), None, None, sections(true, false, false, false)).unwrap();
        let file = assembler(&store).assemble(user.user_id, &request).await.unwrap();
        assert!(String::from_utf8(file.bytes).unwrap().contains("No babies found"));
    }

    #[tokio::test]
    async fn html_escapes_values_and_pdf_goes_through_renderer() {
        let store = Arc::new(MemoryStore::new());
        let user = store.seed_user("parent@example.com", "parent");
        let baby = store.seed_baby(user.user_id, "<script>");
        let d = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        store.seed_milestone(baby.baby_id, d, "First steps & smiles");

        let request = ExportRequest::parse(Some("html"), None, None, sections(false, true, false, true)).unwrap();
        let file = assembler(&store).assemble(user.user_id, &request).await.unwrap();
        let html = String::from_utf8(file.bytes).unwrap();
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("First steps &amp; smiles"));
        assert!(html.contains("No stool records found"));

        let request = ExportRequest::parse(Some("pdf"), None, None, sections(false, true, false, false)).unwrap();
        let file = assembler(&store).assemble(user.user_id, &request).await.unwrap();
        assert!(file.bytes.starts_with(b"%PDF"));
        assert_eq!(file.content_type, "application/pdf");
    }
}
