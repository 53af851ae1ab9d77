//! 以 Office Open XML 封裝輸出單一工作表的 `.xlsx` 活頁簿。
//!
//! 第一列為表頭，其後每則貼文一列。文字使用 inline string，計數欄位寫成數值，
//! 圖片欄以換行串接並套用自動換行樣式。

use crate::domain::model::PostRecord;
use crate::utils::error::Result;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

pub const SHEET_NAME: &str = "Sheet1";
pub const SHEET_PATH: &str = "xl/worksheets/sheet1.xml";

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;
const MAIN_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const REL_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const PACKAGE_REL_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

const STYLE_HEADER: u8 = 1;
const STYLE_WRAP: u8 = 2;

enum Cell<'a> {
    Text(&'a str),
    Number(u64),
}

fn content_types() -> String {
    format!(
        concat!(
            "{}",
            r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
            r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#,
            r#"<Default Extension="xml" ContentType="application/xml"/>"#,
            r#"<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>"#,
            r#"<Override PartName="/{}" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#,
            r#"<Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>"#,
            "</Types>"
        ),
        XML_DECLARATION, SHEET_PATH
    )
}

fn root_rels() -> String {
    format!(
        r#"{}<Relationships xmlns="{}"><Relationship Id="rId1" Type="{}/officeDocument" Target="xl/workbook.xml"/></Relationships>"#,
        XML_DECLARATION, PACKAGE_REL_NS, REL_NS
    )
}

fn workbook() -> String {
    format!(
        r#"{}<workbook xmlns="{}" xmlns:r="{}"><sheets><sheet name="{}" sheetId="1" r:id="rId1"/></sheets></workbook>"#,
        XML_DECLARATION, MAIN_NS, REL_NS, SHEET_NAME
    )
}

fn workbook_rels() -> String {
    format!(
        concat!(
            "{decl}",
            r#"<Relationships xmlns="{pkg}">"#,
            r#"<Relationship Id="rId1" Type="{rel}/worksheet" Target="worksheets/sheet1.xml"/>"#,
            r#"<Relationship Id="rId2" Type="{rel}/styles" Target="styles.xml"/>"#,
            "</Relationships>"
        ),
        decl = XML_DECLARATION,
        pkg = PACKAGE_REL_NS,
        rel = REL_NS
    )
}

/// 0: 預設, 1: 粗體表頭, 2: 自動換行
fn styles() -> String {
    format!(
        concat!(
            "{}",
            r#"<styleSheet xmlns="{}">"#,
            r#"<fonts count="2"><font><sz val="11"/><name val="Calibri"/></font><font><b/><sz val="11"/><name val="Calibri"/></font></fonts>"#,
            r#"<fills count="2"><fill><patternFill patternType="none"/></fill><fill><patternFill patternType="gray125"/></fill></fills>"#,
            r#"<borders count="1"><border><left/><right/><top/><bottom/><diagonal/></border></borders>"#,
            r#"<cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs>"#,
            r#"<cellXfs count="3">"#,
            r#"<xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/>"#,
            r#"<xf numFmtId="0" fontId="1" fillId="0" borderId="0" xfId="0" applyFont="1"/>"#,
            r#"<xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0" applyAlignment="1"><alignment wrapText="1"/></xf>"#,
            "</cellXfs>",
            r#"<cellStyles count="1"><cellStyle name="Normal" xfId="0" builtinId="0"/></cellStyles>"#,
            "</styleSheet>"
        ),
        XML_DECLARATION, MAIN_NS
    )
}

/// 0 起算的欄位索引轉成 A, B, ..., Z, AA
pub fn column_name(index: usize) -> String {
    let mut name = Vec::new();
    let mut n = index + 1;
    while n > 0 {
        let rem = (n - 1) % 26;
        name.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    name.reverse();
    String::from_utf8_lossy(&name).into_owned()
}

/// XML 跳脫，並移除 XML 1.0 不允許的控制字元
pub fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\t' | '\n' | '\r' => escaped.push(ch),
            c if (c as u32) < 0x20 || c == '\u{FFFE}' || c == '\u{FFFF}' => {}
            c => escaped.push(c),
        }
    }
    escaped
}

fn write_row(
    xml: &mut String,
    row: usize,
    cells: &[Cell<'_>],
    style: Option<u8>,
    wrap_column: Option<usize>,
) {
    xml.push_str(&format!(r#"<row r="{}">"#, row));
    for (col, cell) in cells.iter().enumerate() {
        let reference = format!("{}{}", column_name(col), row);
        let style = style.or_else(|| (wrap_column == Some(col)).then_some(STYLE_WRAP));
        let style_attr = style.map(|s| format!(r#" s="{}""#, s)).unwrap_or_default();

        match cell {
            Cell::Text(text) => xml.push_str(&format!(
                r#"<c r="{}"{} t="inlineStr"><is><t xml:space="preserve">{}</t></is></c>"#,
                reference,
                style_attr,
                escape_xml(text)
            )),
            Cell::Number(value) => xml.push_str(&format!(
                r#"<c r="{}"{}><v>{}</v></c>"#,
                reference, style_attr, value
            )),
        }
    }
    xml.push_str("</row>");
}

fn worksheet(records: &[PostRecord]) -> String {
    let image_column = PostRecord::FIELD_LABELS.len() - 1;
    let mut xml = format!(r#"{}<worksheet xmlns="{}"><sheetData>"#, XML_DECLARATION, MAIN_NS);

    let header: Vec<Cell<'_>> = PostRecord::FIELD_LABELS.iter().map(|l| Cell::Text(l)).collect();
    write_row(&mut xml, 1, &header, Some(STYLE_HEADER), None);

    for (index, record) in records.iter().enumerate() {
        let images = record.image_cell();
        let cells = [
            Cell::Text(&record.author_name),
            Cell::Text(record.author_tier.as_str()),
            Cell::Text(&record.body_text),
            Cell::Text(&record.published_at),
            Cell::Number(record.repost_count),
            Cell::Number(record.comment_count),
            Cell::Number(record.like_count),
            Cell::Text(&images),
        ];
        write_row(&mut xml, index + 2, &cells, None, Some(image_column));
    }

    xml.push_str("</sheetData></worksheet>");
    xml
}

fn part_options() -> SimpleFileOptions {
    SimpleFileOptions::default().compression_method(CompressionMethod::Deflated)
}

pub fn render(records: &[PostRecord]) -> Result<Vec<u8>> {
    let parts = [
        ("[Content_Types].xml", content_types()),
        ("_rels/.rels", root_rels()),
        ("xl/workbook.xml", workbook()),
        ("xl/_rels/workbook.xml.rels", workbook_rels()),
        ("xl/styles.xml", styles()),
        (SHEET_PATH, worksheet(records)),
    ];

    tracing::debug!("Packing workbook with {} rows", records.len() + 1);

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, content) in parts {
        zip.start_file(name, part_options())?;
        zip.write_all(content.as_bytes())?;
    }

    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}
