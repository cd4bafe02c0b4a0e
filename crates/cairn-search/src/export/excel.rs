//! SpreadsheetML 2003 workbook: a single worksheet, header row in bold.
//! Opens in Excel and LibreOffice without any binary container.

use super::ExportTable;

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\n' => out.push_str("&#10;"),
            '\r' => {}
            c if (c as u32) < 0x20 && c != '\t' => {}
            c => out.push(c),
        }
    }
    out
}

/// Worksheet names are at most 31 characters and exclude `[]:*?/\`.
fn sheet_name(title: &str) -> String {
    let cleaned: String = title
        .chars()
        .filter(|c| !matches!(c, '[' | ']' | ':' | '*' | '?' | '/' | '\\'))
        .take(31)
        .collect();
    if cleaned.trim().is_empty() {
        "Results".to_string()
    } else {
        cleaned
    }
}

fn cell(value: &str, numeric: bool, style: Option<&str>) -> String {
    let style = style.map_or_else(String::new, |s| format!(" ss:StyleID=\"{s}\""));
    let kind = if numeric { "Number" } else { "String" };
    format!("<Cell{style}><Data ss:Type=\"{kind}\">{}</Data></Cell>", escape(value))
}

pub fn render(table: &ExportTable) -> String {
    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    out.push_str("<?mso-application progid=\"Excel.Sheet\"?>\n");
    out.push_str(
        "<Workbook xmlns=\"urn:schemas-microsoft-com:office:spreadsheet\" \
         xmlns:ss=\"urn:schemas-microsoft-com:office:spreadsheet\">\n",
    );
    out.push_str(
        "<Styles><Style ss:ID=\"header\"><Font ss:Bold=\"1\"/></Style></Styles>\n",
    );
    out.push_str(&format!(
        "<Worksheet ss:Name=\"{}\">\n<Table>\n",
        escape(&sheet_name(&table.title))
    ));

    out.push_str("<Row>");
    for header in &table.headers {
        out.push_str(&cell(header, false, Some("header")));
    }
    out.push_str("</Row>\n");

    for row in &table.rows {
        out.push_str("<Row>");
        for (header, value) in table.headers.iter().zip(row) {
            let numeric = matches!(header.as_str(), "rank" | "relevance_score")
                && value.parse::<f64>().is_ok();
            out.push_str(&cell(value, numeric, None));
        }
        out.push_str("</Row>\n");
    }

    out.push_str("</Table>\n</Worksheet>\n</Workbook>\n");
    out
}
