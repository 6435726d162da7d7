// src/checks/lists.rs
// =============================================================================
// List and table structure.
//
// Lists: <ul>/<ol> may only hold <li> items directly (plus script-supporting
// <script>/<template>). Anything else, stray text, or a list with no items at
// all is reported.
//
// Tables: a table needs a header (<thead> or <th> cells) and at least one
// data row, and every data row should span as many columns as the header row.
// Widths count colspan. Tables that use rowspan are not width-checked, since
// a cell spanning rows shifts every row below it.
// =============================================================================

use super::Check;
use crate::config::AuditConfig;
use crate::document::{self, Document};
use crate::finding::{Category, Finding};
use scraper::ElementRef;

pub struct ListTableCheck;

const LIST_CHILDREN: &[&str] = &["li", "script", "template"];

// Upper bound browsers apply to colspan
const MAX_COLSPAN: usize = 1000;

impl Check for ListTableCheck {
    fn name(&self) -> &'static str {
        "lists-tables"
    }

    fn run(&self, document: &Document, _config: &AuditConfig) -> Vec<Finding> {
        let mut findings = Vec::new();

        for list in document.elements_named(&["ul", "ol"]) {
            check_list(list, &mut findings);
        }
        for table in document.elements_named(&["table"]) {
            check_table(table, &mut findings);
        }

        findings
    }
}

fn check_list(list: ElementRef<'_>, findings: &mut Vec<Finding>) {
    let tag = list.value().name();

    let invalid: Vec<&str> = document::child_elements(list)
        .map(|child| child.value().name())
        .filter(|name| !LIST_CHILDREN.contains(name))
        .collect();
    if !invalid.is_empty() {
        findings.push(
            Finding::new(
                Category::ListStructure,
                format!("<{}> contains non-<li> children: {}", tag, invalid.join(", ")),
            )
            .at(tag),
        );
    }

    if document::has_stray_text(list) {
        findings.push(
            Finding::new(
                Category::ListStructure,
                format!("<{}> contains text outside <li>", tag),
            )
            .at(tag),
        );
    }

    let has_items = document::child_elements(list).any(|child| child.value().name() == "li");
    if !has_items {
        findings.push(
            Finding::new(Category::ListStructure, format!("Empty <{}> list found", tag)).at(tag),
        );
    }
}

// A row of the table, and whether it sits inside <thead>
struct Row<'a> {
    element: ElementRef<'a>,
    in_head: bool,
}

fn check_table(table: ElementRef<'_>, findings: &mut Vec<Finding>) {
    let rows = table_rows(table);

    let has_thead = document::child_elements(table).any(|el| el.value().name() == "thead");
    let has_th = rows
        .iter()
        .any(|row| cells(row.element).any(|cell| cell.value().name() == "th"));
    if !has_thead && !has_th {
        findings.push(
            Finding::new(
                Category::TableStructure,
                "Table missing header row (no <thead> or <th> cells)",
            )
            .at("table"),
        );
    }

    let header = header_row(&rows);
    let data_rows: Vec<(usize, &Row<'_>)> = rows
        .iter()
        .enumerate()
        .filter(|(index, _)| Some(*index) != header)
        .collect();

    if data_rows.is_empty() {
        findings.push(Finding::new(Category::TableStructure, "Table has no data rows").at("table"));
        return;
    }

    let Some(header_index) = header else {
        return;
    };
    let uses_rowspan = rows
        .iter()
        .flat_map(|row| cells(row.element))
        .any(|cell| span(cell, "rowspan") > 1);
    if uses_rowspan {
        return;
    }

    let header_width = row_width(rows[header_index].element);
    for (index, row) in data_rows {
        let width = row_width(row.element);
        if width != header_width {
            findings.push(
                Finding::new(
                    Category::TableStructure,
                    format!(
                        "Table row {} has {} cells but the header has {}",
                        index + 1,
                        width,
                        header_width
                    ),
                )
                .at("tr"),
            );
        }
    }
}

// Rows belonging to this table (not to nested tables), in document order
fn table_rows(table: ElementRef<'_>) -> Vec<Row<'_>> {
    let mut rows = Vec::new();
    for child in document::child_elements(table) {
        match child.value().name() {
            "tr" => rows.push(Row { element: child, in_head: false }),
            section @ ("thead" | "tbody" | "tfoot") => {
                for row in document::child_elements(child).filter(|el| el.value().name() == "tr") {
                    rows.push(Row {
                        element: row,
                        in_head: section == "thead",
                    });
                }
            }
            _ => {}
        }
    }
    rows
}

// The first row of <thead>, or else the first row made only of <th> cells
fn header_row(rows: &[Row<'_>]) -> Option<usize> {
    rows.iter().position(|row| row.in_head).or_else(|| {
        rows.iter().position(|row| {
            let mut row_cells = cells(row.element).peekable();
            row_cells.peek().is_some() && row_cells.all(|cell| cell.value().name() == "th")
        })
    })
}

fn cells<'a>(row: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    document::child_elements(row).filter(|el| matches!(el.value().name(), "td" | "th"))
}

fn row_width(row: ElementRef<'_>) -> usize {
    cells(row).map(|cell| span(cell, "colspan")).sum()
}

// colspan/rowspan value; missing or garbage counts as 1
fn span(cell: ElementRef<'_>, attr: &str) -> usize {
    cell.value()
        .attr(attr)
        .and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|n| *n >= 1)
        .map(|n| n.min(MAX_COLSPAN))
        .unwrap_or(1)
}
