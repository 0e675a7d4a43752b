//! Reading tables from HTML.
//!
//! Builds a [`Table`] and its [`TableOptions`] from `<table>` markup:
//!
//! - headers come from `thead th`, with the declared type in
//!   `data-o-table-data-type` and the sort opt-out in
//!   `data-o-table-heading-disable-sort`
//! - rows come from `tbody tr`, cells from their `td`/`th` children
//! - `data-o-table-sort-value` on a cell supplies an explicit sort value
//! - `data-o-table-*` attributes on the table element supply options

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Node, Selector};

use o_table_core::logging::targets;
use o_table_core::{Error, Result};

use crate::config::TableOptions;
use crate::model::{Cell, CellContent, CellNode, ColumnHeader, ColumnType, Element, SortOrder, Table};

static TABLE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("table").expect("BUG: hardcoded selector 'table' is statically valid")
});

static HEADER_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("thead th").expect("BUG: hardcoded selector 'thead th' is statically valid")
});

static BODY_ROW_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("tbody > tr").expect("BUG: hardcoded selector 'tbody > tr' is statically valid")
});

/// A table read from markup.
#[derive(Debug, Clone)]
pub struct ParsedTable {
    pub table: Table,
    pub options: TableOptions,
}

/// Parse the first `<table>` in an HTML document or fragment.
pub fn parse_table(html: &str) -> Result<ParsedTable> {
    let document = Html::parse_fragment(html);
    let root = document
        .select(&TABLE_SELECTOR)
        .next()
        .ok_or_else(|| Error::markup("no <table> element found"))?;

    let options = TableOptions::from_attributes(root.value().attrs())?;

    let mut presorted = None;
    let headers: Vec<ColumnHeader> = root
        .select(&HEADER_SELECTOR)
        .enumerate()
        .map(|(index, th)| {
            let element = th.value();
            if presorted.is_none() {
                presorted = element
                    .attr("aria-sort")
                    .and_then(|value| value.parse::<SortOrder>().ok())
                    .map(|order| (index, order));
            }
            ColumnHeader::new(th.text().collect::<String>().trim())
                .with_type(ColumnType::parse(element.attr("data-o-table-data-type").unwrap_or_default()))
                .with_sort_disabled(element.attr("data-o-table-heading-disable-sort").is_some())
        })
        .collect();

    let mut table = Table::new(headers);
    for row in root.select(&BODY_ROW_SELECTOR) {
        let cells = row
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|cell| matches!(cell.value().name(), "td" | "th"))
            .map(|cell| read_cell(&cell))
            .collect();
        table.push_row(cells);
    }

    if let Some((column, order)) = presorted {
        table.mark_sorted(column, order);
    }

    tracing::debug!(
        target: targets::MARKUP,
        columns = table.column_count(),
        rows = table.row_count(),
        "parsed table markup"
    );

    Ok(ParsedTable { table, options })
}

/// Parse a single `<td>` or `<th>` fragment into a cell.
///
/// Markup without a cell element is treated as the content of one.
pub fn parse_cell(html: &str) -> Cell {
    let trimmed = html.trim_start();
    let wrapped = if trimmed.starts_with("<td") || trimmed.starts_with("<th") {
        format!("<table><tbody><tr>{html}</tr></tbody></table>")
    } else {
        format!("<table><tbody><tr><td>{html}</td></tr></tbody></table>")
    };

    let document = Html::parse_fragment(&wrapped);
    document
        .select(&BODY_ROW_SELECTOR)
        .next()
        .and_then(|row| {
            row.children()
                .filter_map(ElementRef::wrap)
                .find(|cell| matches!(cell.value().name(), "td" | "th"))
        })
        .map(|cell| read_cell(&cell))
        .unwrap_or_default()
}

fn read_cell(cell: &ElementRef<'_>) -> Cell {
    let content = CellContent::new(read_children(cell));
    let cell_value = Cell::new(content);
    match cell.value().attr("data-o-table-sort-value") {
        Some(value) if !value.is_empty() => cell_value.with_sort_value(value),
        _ => cell_value,
    }
}

fn read_children(element: &ElementRef<'_>) -> Vec<CellNode> {
    element
        .children()
        .filter_map(|child| match child.value() {
            Node::Text(text) => Some(CellNode::text(&**text)),
            Node::Element(_) => ElementRef::wrap(child).map(|el| CellNode::Element(read_element(&el))),
            _ => None,
        })
        .collect()
}

fn read_element(element: &ElementRef<'_>) -> Element {
    let value = element.value();
    let mut out = Element::new(value.name());
    for (name, attr) in value.attrs() {
        out = out.attr(name, attr);
    }
    for child in read_children(element) {
        out = out.child(child);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResponsiveType;
    use crate::model::{CellMarkup, SortValue};
    use crate::model::extract::extract;

    const CHEESES: &str = r#"
        <table class="o-table" data-o-component="o-table" data-o-table-expanded="false"
               data-o-table-minimum-row-count="2" data-o-table-responsive="overflow">
            <thead>
                <tr>
                    <th>Cheese</th>
                    <th data-o-table-data-type="currency" aria-sort="descending">Price</th>
                    <th data-o-table-heading-disable-sort>Notes</th>
                </tr>
            </thead>
            <tbody>
                <tr><td>cheddar</td><td>£4</td><td><span title="Hard"></span></td></tr>
                <tr><td>stilton</td><td data-o-table-sort-value="9">£6*</td><td>Blue</td></tr>
                <tr><td>brie</td><td>n/a</td></tr>
            </tbody>
        </table>
    "#;

    #[test]
    fn test_parse_table_structure() {
        let parsed = parse_table(CHEESES).unwrap();
        let table = &parsed.table;
        assert_eq!(table.column_count(), 3);
        assert_eq!(table.row_count(), 3);

        assert_eq!(table.header(0).unwrap().label(), "Cheese");
        assert_eq!(table.header(1).unwrap().data_type(), &ColumnType::Currency);
        assert_eq!(table.header(1).unwrap().aria_sort(), "descending");
        assert!(table.header(2).unwrap().is_sort_disabled());
        assert!(!table.header(0).unwrap().is_sort_disabled());

        assert!(table.rows()[2].cell(2).is_none());
    }

    #[test]
    fn test_parse_table_options() {
        let parsed = parse_table(CHEESES).unwrap();
        assert_eq!(parsed.options.expanded, Some(false));
        assert_eq!(parsed.options.minimum_row_count, 2);
        assert_eq!(parsed.options.responsive_type, ResponsiveType::Overflow);
    }

    #[test]
    fn test_cells_keep_markup() {
        let parsed = parse_table(CHEESES).unwrap();
        let rows = parsed.table.rows();
        assert_eq!(extract(rows[0].cell(2).unwrap()), "Hard");
        assert_eq!(rows[1].cell(1).unwrap().sort_value(), Some(&SortValue::Number(9.0)));
        assert!(rows[1].cell(1).unwrap().has_override());
        assert_eq!(extract(rows[2].cell(1).unwrap()), "");
    }

    #[test]
    fn test_missing_table() {
        let err = parse_table("<p>No table here</p>").unwrap_err();
        assert!(matches!(err, Error::Markup(_)));
    }

    #[test]
    fn test_parse_cell_fragment() {
        let cell = parse_cell(
            r#"<td><time class="o-date" datetime="2020-06-19T07:56:18Z">2 hours ago</time></td>"#,
        );
        assert_eq!(cell.machine_timestamp(), Some("2020-06-19T07:56:18Z"));
        assert_eq!(extract(&cell), "1592553378000");

        let icon = parse_cell(
            r#"<i class="o-icons-icon o-icons-icon--mail"><a href="mailto:example@ft.com" title="Email Example at example@ft.com"></a></i>"#,
        );
        assert_eq!(extract(&icon), "Email Example at example@ft.com");

        let image = parse_cell(r#"<td>Flag <img alt="United Kingdom" src="uk.png"></td>"#);
        assert_eq!(extract(&image), "United Kingdom");
    }
}
