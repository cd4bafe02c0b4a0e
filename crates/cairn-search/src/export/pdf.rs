//! Single-document PDF report: title block, then one entry per result.
//!
//! Plain PDF 1.4 with the built-in Helvetica font, one content stream per
//! page and a byte-accurate cross-reference table.

use std::fmt::Write;

use cairn_core::errors::{CairnResult, ExportError};
use cairn_core::models::{ExportFormat, SearchResponse};

use super::ExportTable;

const PAGE_WIDTH: u32 = 595;
const PAGE_HEIGHT: u32 = 842;
const MARGIN: u32 = 50;
const LEADING: u32 = 14;
const FONT_SIZE: u32 = 10;
const WRAP_COLUMNS: usize = 95;

fn lines_per_page() -> usize {
    ((PAGE_HEIGHT - 2 * MARGIN) / LEADING) as usize
}

/// Escape for a PDF literal string; non-ASCII becomes `?`.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '(' => out.push_str("\\("),
            ')' => out.push_str("\\)"),
            c if c.is_ascii() && !c.is_ascii_control() => out.push(c),
            _ => out.push('?'),
        }
    }
    out
}

fn wrap(text: &str, width: usize, indent: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.len() + 1 + word.len() > width {
            lines.push(format!("{indent}{current}"));
            current.clear();
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(format!("{indent}{current}"));
    }
    lines
}

fn report_lines(table: &ExportTable, response: &SearchResponse) -> Vec<String> {
    let mut lines = vec![
        table.title.clone(),
        String::new(),
        format!("Query: {}", response.original_query),
        format!("Query id: {}", response.query_id),
        format!("Routing path: {}", response.routing_path),
        format!("Generated: {}", response.created_at.to_rfc3339()),
        format!("Results: {}", response.results.len()),
        String::new(),
    ];
    for item in &response.results {
        lines.push(format!(
            "{}. {} ({}) score {:.4}",
            item.rank, item.document_id, item.object_type, item.relevance_score
        ));
        if let Some(category) = &item.pii_category {
            lines.push(format!("    PII: {category}"));
        }
        lines.extend(wrap(&item.description, WRAP_COLUMNS, "    "));
        if let Some(lineage) = &item.lineage {
            lines.push(format!(
                "    Upstream {} / downstream {}",
                lineage.upstream_count, lineage.downstream_count
            ));
        }
        lines.push(String::new());
    }
    if !response.pii_flows.is_empty() {
        lines.push("PII flows".to_string());
        for flow in &response.pii_flows {
            let mut path = vec![flow.source_id.as_str()];
            path.extend(flow.intermediate_ids.iter().map(String::as_str));
            path.push(flow.destination_id.as_str());
            lines.push(format!("    [{}] {}", flow.pii_category, path.join(" -> ")));
        }
    }
    lines
}

fn content_stream(lines: &[String]) -> Result<String, std::fmt::Error> {
    let mut s = String::new();
    writeln!(s, "BT")?;
    writeln!(s, "/F1 {FONT_SIZE} Tf")?;
    writeln!(s, "{LEADING} TL")?;
    writeln!(s, "{MARGIN} {} Td", PAGE_HEIGHT - MARGIN)?;
    for line in lines {
        writeln!(s, "({}) Tj T*", escape(line))?;
    }
    writeln!(s, "ET")?;
    Ok(s)
}

fn document(pages: &[Vec<String>]) -> Result<Vec<u8>, std::fmt::Error> {
    // Objects: 1 catalog, 2 page tree, 3 font, then a (page, content) pair per page.
    let mut objects: Vec<String> = Vec::new();
    let kids: Vec<String> = (0..pages.len())
        .map(|i| format!("{} 0 R", 4 + 2 * i))
        .collect();
    objects.push("<< /Type /Catalog /Pages 2 0 R >>".to_string());
    objects.push(format!(
        "<< /Type /Pages /Kids [{}] /Count {} >>",
        kids.join(" "),
        pages.len()
    ));
    objects.push(
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
            .to_string(),
    );
    for (i, lines) in pages.iter().enumerate() {
        let content_id = 5 + 2 * i;
        objects.push(format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {PAGE_WIDTH} {PAGE_HEIGHT}] \
             /Resources << /Font << /F1 3 0 R >> >> /Contents {content_id} 0 R >>"
        ));
        let stream = content_stream(lines)?;
        objects.push(format!(
            "<< /Length {} >>\nstream\n{stream}endstream",
            stream.len()
        ));
    }

    let mut out = String::from("%PDF-1.4\n");
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        write!(out, "{} 0 obj\n{body}\nendobj\n", i + 1)?;
    }
    let xref_at = out.len();
    writeln!(out, "xref\n0 {}", objects.len() + 1)?;
    out.push_str("0000000000 65535 f \n");
    for offset in offsets {
        writeln!(out, "{offset:010} 00000 n ")?;
    }
    write!(
        out,
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_at}\n%%EOF\n",
        objects.len() + 1
    )?;
    Ok(out.into_bytes())
}

pub fn render(table: &ExportTable, response: &SearchResponse) -> CairnResult<Vec<u8>> {
    let lines = report_lines(table, response);
    let pages: Vec<Vec<String>> = lines
        .chunks(lines_per_page())
        .map(<[String]>::to_vec)
        .collect();
    document(&pages).map_err(|e| {
        ExportError::RenderFailed {
            format: ExportFormat::Pdf,
            reason: e.to_string(),
        }
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_strings_are_escaped() {
        assert_eq!(escape(r"a(b)\c"), r"a\(b\)\\c");
        assert_eq!(escape("café"), "caf?");
    }

    #[test]
    fn wrap_respects_width_and_indent() {
        let lines = wrap("one two three four", 9, "  ");
        assert_eq!(lines, vec!["  one two", "  three", "  four"]);
        assert!(wrap("", 10, "").is_empty());
    }

    #[test]
    fn xref_offsets_point_at_objects() {
        let pages = vec![vec!["hello".to_string()], vec!["world".to_string()]];
        let bytes = document(&pages).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with("%PDF-1.4\n"));
        assert!(text.contains("/Count 2"));

        let xref_at: usize = text
            .rsplit("startxref\n")
            .next()
            .and_then(|tail| tail.lines().next())
            .and_then(|n| n.parse().ok())
            .unwrap();
        assert!(text[xref_at..].starts_with("xref"));
        let entries: Vec<&str> = text[xref_at..].lines().skip(3).take(7).collect();
        for (i, entry) in entries.iter().enumerate() {
            let offset: usize = entry[..10].parse().unwrap();
            assert!(text[offset..].starts_with(&format!("{} 0 obj", i + 1)));
        }
    }
}
