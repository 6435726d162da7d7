// src/report/csv.rs
// =============================================================================
// CSV output for report rows.
//
// Columns: URL, Category, Message, Locator. A header row is always written,
// so an empty report is still a valid CSV file.
//
// Quoting follows RFC 4180: a field containing a comma, a double quote, CR
// or LF is wrapped in double quotes, with inner quotes doubled.
// =============================================================================

use super::ReportRow;
use std::io::{self, Write};

const HEADER: [&str; 4] = ["URL", "Category", "Message", "Locator"];

pub fn write_csv<W: Write>(rows: &[ReportRow], mut writer: W) -> io::Result<()> {
    write_record(&mut writer, &HEADER)?;
    for row in rows {
        write_record(
            &mut writer,
            &[
                row.url.as_str(),
                row.category.as_str(),
                row.message.as_str(),
                row.locator.as_str(),
            ],
        )?;
    }
    writer.flush()
}

fn write_record<W: Write>(writer: &mut W, fields: &[&str]) -> io::Result<()> {
    let line: Vec<String> = fields.iter().map(|f| escape(f)).collect();
    write!(writer, "{}\r\n", line.join(","))
}

fn escape(field: &str) -> String {
    if field.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
