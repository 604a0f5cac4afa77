//! Report export
//!
//! Converts the assessment markdown to styled HTML and renders it to PDF
//! through an external `wkhtmltopdf` binary. When the renderer is missing or
//! fails, export degrades to the raw markdown with a recorded diagnostic
//! instead of failing the operation.

use base64::Engine;
use chrono::Local;
use pulldown_cmark::{html, Event, Options, Parser, Tag, TagEnd};
use std::io::Write;
use std::process::Command;
use tracing::{debug, info, warn};

use threatlens_core::{AssessmentReport, Branding, ReportSettings};

use crate::types::{ArtifactContent, ContentType, ReportArtifact, ReportError, ReportResult};

const PDF_SIGNATURE: &[u8] = b"%PDF";

/// Exporter that turns report markdown into a downloadable artifact
pub struct ReportExporter {
    renderer_path: String,
}

impl ReportExporter {
    pub fn new(renderer_path: impl Into<String>) -> Self {
        Self {
            renderer_path: renderer_path.into(),
        }
    }

    pub fn from_settings(settings: &ReportSettings) -> Self {
        Self::new(settings.renderer_path.clone())
    }

    /// Probe whether the HTML-to-PDF renderer exists in this environment
    pub fn renderer_available(&self) -> bool {
        Command::new(&self.renderer_path)
            .arg("--version")
            .output()
            .map(|output| output.status.success())
            .unwrap_or(false)
    }

    /// Export a report, preferring PDF and degrading to markdown.
    ///
    /// Never fails: a missing or broken renderer produces a markdown artifact
    /// with the reason recorded in `diagnostic`.
    pub fn export(&self, report: &AssessmentReport, branding: &Branding) -> ReportArtifact {
        if !self.renderer_available() {
            let reason = format!(
                "PDF renderer '{}' is not available in this environment",
                self.renderer_path
            );
            info!(reason = %reason, "Exporting markdown fallback");
            return self.markdown_artifact(report, Some(reason));
        }

        let html = self.build_html(report, branding);
        match self.render_pdf(&html) {
            Ok(bytes) => {
                info!(bytes = bytes.len(), "Rendered PDF report");
                ReportArtifact {
                    filename: suggested_filename(&report.project_name, ContentType::Pdf),
                    content: ArtifactContent::Binary(bytes),
                    content_type: ContentType::Pdf,
                    diagnostic: None,
                }
            }
            Err(e) => {
                warn!(error = %e, "PDF rendering failed, falling back to markdown");
                self.markdown_artifact(report, Some(e.to_string()))
            }
        }
    }

    fn markdown_artifact(
        &self,
        report: &AssessmentReport,
        diagnostic: Option<String>,
    ) -> ReportArtifact {
        ReportArtifact {
            filename: suggested_filename(&report.project_name, ContentType::Markdown),
            content: ArtifactContent::Text(report.markdown.clone()),
            content_type: ContentType::Markdown,
            diagnostic,
        }
    }

    /// Convert the report markdown into the full styled HTML document
    pub fn build_html(&self, report: &AssessmentReport, branding: &Branding) -> String {
        let body = markdown_to_html(&report.markdown);
        let toc = table_of_contents(&report.markdown);

        let logo = branding.logo.as_ref().map(|bytes| {
            format!(
                r#"<img class="logo" src="data:{};base64,{}" alt="logo">"#,
                logo_mime(bytes),
                base64::engine::general_purpose::STANDARD.encode(bytes)
            )
        });

        document_shell(
            &report.project_name,
            logo.as_deref(),
            branding.company_name.as_deref(),
            branding.footer_text.as_deref(),
            &toc,
            &body,
            &report.generated_at.format("%Y-%m-%d").to_string(),
        )
    }

    /// Render HTML to PDF via the external renderer, verifying the output
    /// carries the PDF signature.
    fn render_pdf(&self, html: &str) -> ReportResult<Vec<u8>> {
        let dir = tempfile::tempdir()?;
        let html_path = dir.path().join("report.html");
        let pdf_path = dir.path().join("report.pdf");

        let mut file = std::fs::File::create(&html_path)?;
        file.write_all(html.as_bytes())?;

        debug!(renderer = %self.renderer_path, "Invoking PDF renderer");

        let output = Command::new(&self.renderer_path)
            .arg("--quiet")
            .arg("--enable-local-file-access")
            .arg(&html_path)
            .arg(&pdf_path)
            .output()
            .map_err(|e| {
                ReportError::RendererUnavailable(format!(
                    "failed to launch '{}': {}",
                    self.renderer_path, e
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ReportError::Render(format!(
                "renderer exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let bytes = std::fs::read(&pdf_path)?;
        if !bytes.starts_with(PDF_SIGNATURE) {
            return Err(ReportError::Render(
                "renderer produced output without a PDF signature".to_string(),
            ));
        }

        Ok(bytes)
    }
}

/// Convert markdown to HTML with tables and fenced code enabled
pub fn markdown_to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_FOOTNOTES);

    let parser = Parser::new_ext(markdown, options);
    let mut html = String::new();
    html::push_html(&mut html, parser);
    html
}

/// Build a table-of-contents list from the markdown heading stream
fn table_of_contents(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);

    let mut toc = String::from("<ul class=\"toc\">\n");
    let mut current: Option<(u32, String)> = None;

    for event in Parser::new_ext(markdown, options) {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                current = Some((level as u32, String::new()));
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some((_, buffer)) = current.as_mut() {
                    buffer.push_str(&text);
                }
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some((level, title)) = current.take() {
                    toc.push_str(&format!(
                        "  <li class=\"toc-level-{}\">{}</li>\n",
                        level, title
                    ));
                }
            }
            _ => {}
        }
    }

    toc.push_str("</ul>");
    toc
}

/// Download filename: project name with spaces replaced, date-stamped,
/// extension matching the produced content type.
pub fn suggested_filename(project_name: &str, content_type: ContentType) -> String {
    format!(
        "Threat_Assessment_{}_{}.{}",
        project_name.replace(' ', "_"),
        Local::now().format("%Y%m%d"),
        content_type.extension()
    )
}

/// Sniff the logo image format from its magic bytes. Unknown formats fall
/// back to PNG, the most common upload.
fn logo_mime(bytes: &[u8]) -> &'static str {
    if bytes.starts_with(&[0x89, b'P', b'N', b'G']) {
        "image/png"
    } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        "image/jpeg"
    } else if bytes.starts_with(b"GIF8") {
        "image/gif"
    } else if bytes.starts_with(b"<svg") || bytes.starts_with(b"<?xml") {
        "image/svg+xml"
    } else {
        "image/png"
    }
}

fn document_shell(
    project_name: &str,
    logo: Option<&str>,
    company_name: Option<&str>,
    footer_text: Option<&str>,
    toc: &str,
    body: &str,
    date: &str,
) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Threat Assessment - {project_name}</title>
    <style>
{css}
    </style>
</head>
<body>
    <div class="container">
        <header>
            {logo}
            <h1>Threat Assessment Report</h1>
            <p class="subtitle">{project_name}{company}</p>
            <p class="date">{date}</p>
        </header>

        <nav>
            <h2>Contents</h2>
            {toc}
        </nav>

        <main>
            {body}
        </main>

        <footer>
            <p>{footer}</p>
        </footer>
    </div>
</body>
</html>"#,
        project_name = project_name,
        css = REPORT_CSS,
        logo = logo.unwrap_or(""),
        company = company_name
            .map(|name| format!(" &mdash; {}", name))
            .unwrap_or_default(),
        date = date,
        toc = toc,
        body = body,
        footer = footer_text.unwrap_or("Generated by Threatlens"),
    )
}

const REPORT_CSS: &str = r#"body {
    font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
    line-height: 1.6;
    color: #333;
    margin: 0;
    padding: 0;
}

.container {
    max-width: 900px;
    margin: 0 auto;
    padding: 24px;
}

header {
    text-align: center;
    margin-bottom: 40px;
    padding-bottom: 20px;
    border-bottom: 2px solid #eee;
}

header .logo {
    max-height: 64px;
}

h1 {
    color: #1976D2;
    font-weight: 700;
}

h2 {
    color: #424242;
    font-weight: 600;
    margin-top: 2rem;
}

.subtitle {
    color: #757575;
    font-size: 1.1em;
}

.date {
    color: #9e9e9e;
    font-size: 0.9em;
}

nav .toc {
    list-style: none;
    padding-left: 0;
}

nav .toc-level-2 {
    padding-left: 1.5em;
}

nav .toc-level-3 {
    padding-left: 3em;
}

table {
    border-collapse: collapse;
    width: 100%;
    margin: 1em 0;
}

th, td {
    border: 1px solid #E0E0E0;
    padding: 8px 12px;
    text-align: left;
}

th {
    background-color: #E3F2FD;
}

code {
    background-color: #f5f5f5;
    padding: 2px 4px;
    border-radius: 4px;
}

pre code {
    display: block;
    padding: 12px;
    overflow-x: auto;
}

footer {
    margin-top: 40px;
    padding-top: 16px;
    border-top: 1px solid #eee;
    text-align: center;
    color: #9e9e9e;
    font-size: 0.85em;
}"#;
