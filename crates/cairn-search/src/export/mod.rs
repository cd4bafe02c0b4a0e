//! Results exporter: renders a stored response as CSV, a SpreadsheetML
//! workbook or a single-document PDF report.

pub mod csv;
pub mod excel;
pub mod pdf;

use cairn_core::errors::CairnResult;
use cairn_core::models::{ExportArtifact, ExportFormat, ExportOptions, SearchResponse};

/// Column headers and string cells shared by every format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportTable {
    pub title: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ExportTable {
    pub fn from_response(response: &SearchResponse, options: &ExportOptions) -> Self {
        let mut headers: Vec<String> = [
            "rank",
            "document_id",
            "object_type",
            "name",
            "database",
            "category",
            "relevance_score",
            "contains_pii",
            "pii_category",
            "description",
        ]
        .iter()
        .map(|h| h.to_string())
        .collect();
        if options.include_contributions {
            headers.push("contributions".into());
        }
        if options.include_lineage {
            headers.push("upstream".into());
            headers.push("downstream".into());
        }

        let rows = response
            .results
            .iter()
            .map(|item| {
                let mut row = vec![
                    item.rank.to_string(),
                    item.document_id.clone(),
                    item.object_type.clone(),
                    item.name.clone(),
                    item.database.clone().unwrap_or_default(),
                    item.category.clone().unwrap_or_default(),
                    format!("{:.6}", item.relevance_score),
                    item.contains_pii.to_string(),
                    item.pii_category.clone().unwrap_or_default(),
                    item.description.clone(),
                ];
                if options.include_contributions {
                    row.push(
                        item.contributions
                            .iter()
                            .map(|(path, score)| format!("{path}={score:.6}"))
                            .collect::<Vec<_>>()
                            .join("; "),
                    );
                }
                if options.include_lineage {
                    let (up, down) = item
                        .lineage
                        .as_ref()
                        .map(|l| (l.upstream.join("; "), l.downstream.join("; ")))
                        .unwrap_or_default();
                    row.push(up);
                    row.push(down);
                }
                row
            })
            .collect();

        Self {
            title: options
                .title
                .clone()
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| format!("Search results: {}", response.original_query)),
            headers,
            rows,
        }
    }
}

/// Render `response` in `format`.
pub fn render(
    response: &SearchResponse,
    format: ExportFormat,
    options: &ExportOptions,
) -> CairnResult<ExportArtifact> {
    let table = ExportTable::from_response(response, options);
    let bytes = match format {
        ExportFormat::Csv => csv::render(&table).into_bytes(),
        ExportFormat::Excel => excel::render(&table).into_bytes(),
        ExportFormat::Pdf => pdf::render(&table, response)?,
    };
    let short_id: String = response.query_id.chars().take(8).collect();
    Ok(ExportArtifact {
        format,
        file_name: format!("cairn-results-{short_id}.{}", format.extension()),
        content_type: format.content_type().to_string(),
        bytes,
    })
}
