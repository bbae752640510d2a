//! Excel template rendering.
//!
//! Placeholder tokens are replaced literally in every text-bearing cell of
//! every sheet (shared strings and inline strings alike), producing a
//! modified `.xlsx` artifact. For the PDF preview the workbook is flattened
//! to a heading plus one HTML table per sheet - a deliberately lossy
//! rendering with no styling fidelity.

use quick_xml::events::Event;
use quick_xml::Reader;

use super::html::escape_html;
use super::ooxml::{Container, OoxmlError};

const SHARED_STRINGS_PART: &str = "xl/sharedStrings.xml";
const WORKBOOK_PART: &str = "xl/workbook.xml";
const WORKSHEET_PREFIX: &str = "xl/worksheets/sheet";

#[derive(Debug, Clone)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<Vec<String>>,
}

/// Result of rendering an Excel template: the modified workbook bytes plus a
/// flattened cell grid per sheet for the HTML preview.
pub struct RenderedWorkbook {
    pub xlsx: Vec<u8>,
    pub sheets: Vec<Sheet>,
}

pub fn render_workbook(
    blob: &[u8],
    table: &[(String, String)],
) -> Result<RenderedWorkbook, OoxmlError> {
    let mut container = Container::open(blob)?;
    container.rewrite_text(
        |name| name == SHARED_STRINGS_PART || is_worksheet_part(name),
        table,
    )?;

    let shared = match container.part(SHARED_STRINGS_PART) {
        Ok(xml) => parse_shared_strings(xml)?,
        Err(_) => Vec::new(),
    };
    let names = parse_sheet_names(container.part(WORKBOOK_PART)?)?;

    // Worksheet parts are paired with the workbook sheet order by filename
    // index; the workbook.xml.rels indirection is not consulted.
    let mut sheet_parts: Vec<&str> = container.part_names().filter(|n| is_worksheet_part(n)).collect();
    sheet_parts.sort_by_key(|name| worksheet_index(name));

    let mut sheets = Vec::with_capacity(sheet_parts.len());
    for (position, part_name) in sheet_parts.iter().enumerate() {
        let name = names
            .get(position)
            .cloned()
            .unwrap_or_else(|| format!("Sheet{}", position + 1));
        let rows = parse_grid(container.part(part_name)?, &shared)?;
        sheets.push(Sheet { name, rows });
    }

    let xlsx = container.to_bytes()?;
    Ok(RenderedWorkbook { xlsx, sheets })
}

/// Lossy HTML rendering of the workbook used as PDF preview input.
pub fn preview_html(contract_number: &str, sheets: &[Sheet]) -> String {
    let mut html = String::from("<html><body>");
    html.push_str(&format!(
        "<h1>賃貸借契約書: {}</h1>",
        escape_html(contract_number)
    ));
    for sheet in sheets {
        html.push_str(&format!("<h2>{}</h2>", escape_html(&sheet.name)));
        html.push_str("<table border='1' style='border-collapse: collapse; width: 100%;'>");
        for row in &sheet.rows {
            html.push_str("<tr>");
            for cell in row {
                html.push_str(&format!(
                    "<td style='padding: 5px;'>{}</td>",
                    escape_html(cell)
                ));
            }
            html.push_str("</tr>");
        }
        html.push_str("</table><br>");
    }
    html.push_str("</body></html>");
    html
}

fn is_worksheet_part(name: &str) -> bool {
    name.starts_with(WORKSHEET_PREFIX) && name.ends_with(".xml")
}

fn worksheet_index(name: &str) -> u32 {
    name.strip_prefix(WORKSHEET_PREFIX)
        .and_then(|rest| rest.strip_suffix(".xml"))
        .and_then(|n| n.parse().ok())
        .unwrap_or(u32::MAX)
}

/// Sheet display names in workbook order.
fn parse_sheet_names(xml: &[u8]) -> Result<Vec<String>, OoxmlError> {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();
    let mut names = Vec::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Eof => break,
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"sheet" => {
                if let Ok(Some(attr)) = e.try_get_attribute("name") {
                    let name = attr
                        .unescape_value()
                        .map(|v| v.into_owned())
                        .unwrap_or_default();
                    names.push(name);
                }
            }
            _ => {}
        }
        buf.clear();
    }
    Ok(names)
}

/// Shared string items; rich-text runs are concatenated, phonetic runs are
/// skipped.
fn parse_shared_strings(xml: &[u8]) -> Result<Vec<String>, OoxmlError> {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();
    let mut strings = Vec::new();
    let mut current = String::new();
    let mut in_item = false;
    let mut in_text = false;
    let mut phonetic_depth = 0usize;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Eof => break,
            Event::Start(e) => match e.local_name().as_ref() {
                b"si" => {
                    in_item = true;
                    current.clear();
                }
                b"rPh" => phonetic_depth += 1,
                b"t" if in_item && phonetic_depth == 0 => in_text = true,
                _ => {}
            },
            Event::End(e) => match e.local_name().as_ref() {
                b"si" => {
                    in_item = false;
                    strings.push(current.clone());
                }
                b"rPh" => phonetic_depth = phonetic_depth.saturating_sub(1),
                b"t" => in_text = false,
                _ => {}
            },
            Event::Text(t) if in_text => current.push_str(&t.unescape()?),
            _ => {}
        }
        buf.clear();
    }
    Ok(strings)
}

/// Flatten one worksheet to a dense row/column grid of display strings.
/// Column positions come from the cell reference attribute; gaps become
/// empty cells.
fn parse_grid(xml: &[u8], shared: &[String]) -> Result<Vec<Vec<String>>, OoxmlError> {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();

    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut in_row = false;
    let mut cell_type = String::new();
    let mut cell_column: Option<usize> = None;
    let mut value = String::new();
    let mut in_value = false;
    let mut in_inline_text = false;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Eof => break,
            Event::Start(e) => match e.local_name().as_ref() {
                b"row" => {
                    in_row = true;
                    row = Vec::new();
                }
                b"c" if in_row => {
                    value.clear();
                    cell_type = attribute_value(&e, "t").unwrap_or_default();
                    cell_column = attribute_value(&e, "r").as_deref().map(column_index);
                }
                b"v" => in_value = true,
                b"t" => in_inline_text = true,
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"row" => rows.push(Vec::new()),
                b"c" if in_row => {
                    let column = attribute_value(&e, "r").as_deref().map(column_index);
                    place_cell(&mut row, column, String::new());
                }
                _ => {}
            },
            Event::End(e) => match e.local_name().as_ref() {
                b"row" => {
                    in_row = false;
                    rows.push(std::mem::take(&mut row));
                }
                b"c" if in_row => {
                    let display = match cell_type.as_str() {
                        "s" => value
                            .trim()
                            .parse::<usize>()
                            .ok()
                            .and_then(|i| shared.get(i).cloned())
                            .unwrap_or_default(),
                        _ => value.clone(),
                    };
                    place_cell(&mut row, cell_column.take(), display);
                }
                b"v" => in_value = false,
                b"t" => in_inline_text = false,
                _ => {}
            },
            Event::Text(t) if in_value || in_inline_text => value.push_str(&t.unescape()?),
            _ => {}
        }
        buf.clear();
    }
    Ok(rows)
}

fn attribute_value(e: &quick_xml::events::BytesStart<'_>, name: &str) -> Option<String> {
    match e.try_get_attribute(name) {
        Ok(Some(attr)) => attr.unescape_value().map(|v| v.into_owned()).ok(),
        _ => None,
    }
}

/// Zero-based column index from a cell reference like `C3`.
fn column_index(cell_ref: &str) -> usize {
    let mut index = 0usize;
    for ch in cell_ref.chars().take_while(|c| c.is_ascii_alphabetic()) {
        index = index * 26 + (ch.to_ascii_uppercase() as usize - 'A' as usize + 1);
    }
    index.saturating_sub(1)
}

fn place_cell(row: &mut Vec<String>, column: Option<usize>, display: String) {
    match column {
        Some(col) => {
            while row.len() < col {
                row.push(String::new());
            }
            row.push(display);
        }
        None => row.push(display),
    }
}
