//! RFC 4180 CSV: CRLF line endings, fields quoted when they contain a comma,
//! quote, CR or LF, embedded quotes doubled.

use super::ExportTable;

fn field(value: &str) -> String {
    if value.contains(&[',', '"', '\r', '\n'][..]) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn line(cells: &[String]) -> String {
    cells.iter().map(|c| field(c)).collect::<Vec<_>>().join(",")
}

pub fn render(table: &ExportTable) -> String {
    let mut out = line(&table.headers);
    out.push_str("\r\n");
    for row in &table.rows {
        out.push_str(&line(row));
        out.push_str("\r\n");
    }
    out
}
