//! Content negotiation and output formats for employee views.

use anyhow::{Context, Result};
use handlebars::Handlebars;
use products_hr::ProjectedEmployee;

const EMPLOYEE_TEMPLATE: &str = "employee";

const EMPLOYEE_HTML: &str = r#"<table class="employee">
  <tr><th>Id:</th><td>{{id}}</td></tr>
  <tr><th>Name:</th><td>{{name}}</td></tr>
  <tr><th>Title:</th><td>{{title}}</td></tr>
  <tr><th>Salary:</th><td>{{salary}}</td></tr>
</table>
"#;

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Format {
    Json,
    Html,
    Xml,
}

impl Format {
    pub fn content_type(self) -> &'static str {
        match self {
            Format::Json => "application/json",
            Format::Html => "text/html; charset=utf-8",
            Format::Xml => "application/xml; charset=utf-8",
        }
    }

    fn from_media_range(range: &str) -> Option<Self> {
        match range {
            "application/json" | "application/*" | "*/*" => Some(Format::Json),
            "text/html" | "application/xhtml+xml" | "text/*" => Some(Format::Html),
            "application/xml" | "text/xml" => Some(Format::Xml),
            _ => None,
        }
    }
}

/// Pick an output format from an `Accept` header. A missing or blank header
/// means JSON; `None` means nothing acceptable is on offer.
pub fn negotiate(accept: Option<&str>) -> Option<Format> {
    let Some(accept) = accept.map(str::trim).filter(|value| !value.is_empty()) else {
        return Some(Format::Json);
    };

    let mut ranges = accept
        .split(',')
        .filter_map(|entry| {
            let mut parts = entry.split(';');
            let range = parts.next()?.trim().to_ascii_lowercase();
            let quality = parts
                .filter_map(|param| {
                    let (key, value) = param.split_once('=')?;
                    (key.trim() == "q").then(|| value.trim().parse::<f32>().ok())?
                })
                .next()
                .unwrap_or(1.0);
            Some((range, quality))
        })
        .filter(|(_, quality)| *quality > 0.0)
        .collect::<Vec<_>>();
    // stable: equal weights keep header order
    ranges.sort_by(|a, b| b.1.total_cmp(&a.1));

    ranges
        .iter()
        .find_map(|(range, _)| Format::from_media_range(range))
}

pub struct Renderer {
    handlebars: Handlebars<'static>,
}

impl Renderer {
    pub fn new() -> Result<Self> {
        let mut handlebars = Handlebars::new();
        handlebars
            .register_template_string(EMPLOYEE_TEMPLATE, EMPLOYEE_HTML)
            .context("invalid employee template")?;
        Ok(Self { handlebars })
    }

    pub fn render(&self, format: Format, view: &ProjectedEmployee) -> Result<String> {
        match format {
            Format::Json => serde_json::to_string(view).context("failed to encode employee JSON"),
            Format::Html => self
                .handlebars
                .render(EMPLOYEE_TEMPLATE, view)
                .context("failed to render employee HTML"),
            Format::Xml => {
                let body = quick_xml::se::to_string_with_root("employee", view)
                    .context("failed to encode employee XML")?;
                Ok(format!("{XML_DECLARATION}\n{body}"))
            }
        }
    }
}
