//! Word template rendering.
//!
//! Placeholder tokens are replaced literally in every run of body text -
//! plain paragraphs and table-cell paragraphs alike - producing a modified
//! `.docx` artifact. The PDF preview flattens the document to plain HTML
//! paragraphs and bordered tables, in document order, with all original
//! styling lost.

use quick_xml::events::Event;
use quick_xml::Reader;

use super::html::escape_html;
use super::ooxml::{Container, OoxmlError};

const DOCUMENT_PART: &str = "word/document.xml";

/// Body-level content in document order. Table cell text is the
/// space-joined text of the cell's paragraphs.
#[derive(Debug, Clone, PartialEq)]
pub enum DocBlock {
    Paragraph(String),
    Table(Vec<Vec<String>>),
}

/// Result of rendering a Word template: the modified document bytes plus the
/// flattened block list for the HTML preview.
pub struct RenderedDocument {
    pub docx: Vec<u8>,
    pub blocks: Vec<DocBlock>,
}

pub fn render_document(
    blob: &[u8],
    table: &[(String, String)],
) -> Result<RenderedDocument, OoxmlError> {
    let mut container = Container::open(blob)?;
    container.part(DOCUMENT_PART)?;
    container.rewrite_text(|name| name == DOCUMENT_PART, table)?;

    let blocks = parse_blocks(container.part(DOCUMENT_PART)?)?;
    let docx = container.to_bytes()?;
    Ok(RenderedDocument { docx, blocks })
}

/// Lossy HTML rendering of the document used as PDF preview input. Blank
/// paragraphs are dropped.
pub fn preview_html(contract_number: &str, blocks: &[DocBlock]) -> String {
    let mut html = String::from("<html><body>");
    html.push_str(&format!(
        "<h1>賃貸借契約書: {}</h1>",
        escape_html(contract_number)
    ));
    for block in blocks {
        match block {
            DocBlock::Paragraph(text) => {
                if !text.trim().is_empty() {
                    html.push_str(&format!("<p>{}</p>", escape_html(text)));
                }
            }
            DocBlock::Table(rows) => {
                html.push_str("<table border='1' style='border-collapse: collapse; width: 100%;'>");
                for row in rows {
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
        }
    }
    html.push_str("</body></html>");
    html
}

/// Walk `word/document.xml` collecting body paragraphs and first-level
/// tables. Content of tables nested inside table cells is folded into the
/// enclosing cell text.
fn parse_blocks(xml: &[u8]) -> Result<Vec<DocBlock>, OoxmlError> {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();

    let mut blocks: Vec<DocBlock> = Vec::new();
    let mut table_depth = 0usize;
    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut cell_paragraphs: Vec<String> = Vec::new();
    let mut paragraph = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Eof => break,
            Event::Start(e) => match e.local_name().as_ref() {
                b"p" => paragraph.clear(),
                b"t" => in_text = true,
                b"tbl" => {
                    table_depth += 1;
                    if table_depth == 1 {
                        rows = Vec::new();
                    }
                }
                b"tr" if table_depth == 1 => row = Vec::new(),
                b"tc" if table_depth == 1 => cell_paragraphs = Vec::new(),
                _ => {}
            },
            Event::End(e) => match e.local_name().as_ref() {
                b"p" => {
                    if table_depth == 0 {
                        blocks.push(DocBlock::Paragraph(std::mem::take(&mut paragraph)));
                    } else {
                        cell_paragraphs.push(std::mem::take(&mut paragraph));
                    }
                }
                b"t" => in_text = false,
                b"tbl" => {
                    if table_depth == 1 {
                        blocks.push(DocBlock::Table(std::mem::take(&mut rows)));
                    }
                    table_depth = table_depth.saturating_sub(1);
                }
                b"tr" if table_depth == 1 => rows.push(std::mem::take(&mut row)),
                b"tc" if table_depth == 1 => row.push(cell_paragraphs.join(" ")),
                _ => {}
            },
            Event::Text(t) if in_text => paragraph.push_str(&t.unescape()?),
            _ => {}
        }
        buf.clear();
    }
    Ok(blocks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::placeholders::placeholder_table;
    use crate::pipeline::test_fixtures::sample_bundle;
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn docx_with_body(body: &str) -> Vec<u8> {
        let document = format!(
            r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
        );
        let mut writer = ZipWriter::new(std::io::Cursor::new(Vec::new()));
        writer
            .start_file("word/document.xml", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(document.as_bytes()).unwrap();
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_render_document_replaces_paragraph_tokens() {
        let table = placeholder_table(&sample_bundle());
        let blob = docx_with_body(
            r#"<w:p><w:r><w:t>{{owner.name}}様</w:t></w:r></w:p><w:p><w:r><w:t>賃料は{{contract.rent_amount}}とする。</w:t></w:r></w:p>"#,
        );
        let rendered = render_document(&blob, &table).unwrap();

        assert_eq!(
            rendered.blocks,
            vec![
                DocBlock::Paragraph("山田太郎様".to_string()),
                DocBlock::Paragraph("賃料は150,000円とする。".to_string()),
            ]
        );
    }

    #[test]
    fn test_render_document_replaces_table_cell_tokens() {
        let table = placeholder_table(&sample_bundle());
        let blob = docx_with_body(
            r#"<w:tbl><w:tr><w:tc><w:p><w:r><w:t>借主</w:t></w:r></w:p></w:tc><w:tc><w:p><w:r><w:t>{{contract.tenant_name}}</w:t></w:r></w:p></w:tc></w:tr></w:tbl>"#,
        );
        let rendered = render_document(&blob, &table).unwrap();

        assert_eq!(
            rendered.blocks,
            vec![DocBlock::Table(vec![vec![
                "借主".to_string(),
                "鈴木一郎".to_string()
            ]])]
        );
    }

    #[test]
    fn test_render_document_keeps_document_order() {
        let table = placeholder_table(&sample_bundle());
        let blob = docx_with_body(
            r#"<w:p><w:r><w:t>前文</w:t></w:r></w:p><w:tbl><w:tr><w:tc><w:p><w:r><w:t>セル</w:t></w:r></w:p></w:tc></w:tr></w:tbl><w:p><w:r><w:t>後文</w:t></w:r></w:p>"#,
        );
        let rendered = render_document(&blob, &table).unwrap();

        assert!(matches!(rendered.blocks[0], DocBlock::Paragraph(_)));
        assert!(matches!(rendered.blocks[1], DocBlock::Table(_)));
        assert!(matches!(rendered.blocks[2], DocBlock::Paragraph(_)));
    }

    #[test]
    fn test_render_document_requires_document_part() {
        let mut writer = ZipWriter::new(std::io::Cursor::new(Vec::new()));
        writer
            .start_file("word/other.xml", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(b"<doc/>").unwrap();
        let blob = writer.finish().unwrap().into_inner();

        let table = placeholder_table(&sample_bundle());
        assert!(matches!(
            render_document(&blob, &table),
            Err(OoxmlError::MissingPart(_))
        ));
    }

    #[test]
    fn test_preview_html_skips_blank_paragraphs() {
        let blocks = vec![
            DocBlock::Paragraph("  ".to_string()),
            DocBlock::Paragraph("本文".to_string()),
        ];
        let html = preview_html("X-1", &blocks);
        assert_eq!(html.matches("<p>").count(), 1);
        assert!(html.contains("<p>本文</p>"));
    }
}
