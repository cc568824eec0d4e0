use super::document::Document;
use super::tree::{Element, Node};
use crate::error::DocumentError;
use quick_xml::escape::partial_escape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Write;
use std::path::Path;

/// Re-indents the tree with two spaces per depth.
///
/// Whitespace-only text and tails are replaced; real content is kept.
pub fn indent(root: &mut Element) {
    indent_at(root, 0);
}

fn indent_at(element: &mut Element, level: usize) {
    let own = line_indent(level);
    if element.has_children() {
        if is_blank(element.text.as_deref()) {
            element.text = Some(line_indent(level + 1));
        }
        if is_blank(element.tail.as_deref()) {
            element.tail = Some(own.clone());
        }
        for child in &mut element.children {
            match child {
                Node::Element(e) => indent_at(e, level + 1),
                other => {
                    if is_blank(other.tail()) {
                        *other.tail_mut() = Some(line_indent(level + 1));
                    }
                }
            }
        }
        if let Some(last) = element.children.last_mut() {
            if is_blank(last.tail()) {
                *last.tail_mut() = Some(own);
            }
        }
    } else if level > 0 && is_blank(element.tail.as_deref()) {
        element.tail = Some(own);
    }
}

fn line_indent(level: usize) -> String {
    format!("\n{}", "  ".repeat(level))
}

fn is_blank(text: Option<&str>) -> bool {
    text.is_none_or(|t| t.trim().is_empty())
}

/// Serializes a document with an XML declaration and UTF-8 encoding.
pub fn to_bytes(document: &Document) -> Result<Vec<u8>, DocumentError> {
    let mut writer = Writer::new(Vec::new());
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    newline(&mut writer)?;

    if let Some(doctype) = &document.doctype {
        writer.write_event(Event::DocType(BytesText::from_escaped(doctype.as_str())))?;
        newline(&mut writer)?;
    }
    for node in &document.prolog {
        write_misc(&mut writer, node)?;
        newline(&mut writer)?;
    }

    write_element(&mut writer, &document.root)?;
    newline(&mut writer)?;
    Ok(writer.into_inner())
}

/// Writes a document to `path`.
pub fn save<P: AsRef<Path>>(document: &Document, path: P) -> Result<(), DocumentError> {
    let path_ref = path.as_ref();
    let bytes = to_bytes(document)?;
    std::fs::write(path_ref, bytes).map_err(|source| DocumentError::FileWrite {
        path: path_ref.to_path_buf(),
        source,
    })
}

fn newline<W: Write>(writer: &mut Writer<W>) -> Result<(), DocumentError> {
    writer.write_event(Event::Text(BytesText::from_escaped("\n")))?;
    Ok(())
}

fn write_element<W: Write>(writer: &mut Writer<W>, element: &Element) -> Result<(), DocumentError> {
    let mut start = BytesStart::new(element.name.as_str());
    for attr in &element.attributes {
        start.push_attribute((attr.name.as_str(), attr.value.as_str()));
    }

    // Empty text is written self-closed, the form it parses back to.
    if element.text.as_deref().is_none_or(str::is_empty) && !element.has_children() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;
    if let Some(text) = &element.text {
        write_text(writer, text)?;
    }
    for child in &element.children {
        match child {
            Node::Element(e) => write_element(writer, e)?,
            other => write_misc(writer, other)?,
        }
        if let Some(tail) = child.tail() {
            write_text(writer, tail)?;
        }
    }
    writer.write_event(Event::End(BytesEnd::new(element.name.as_str())))?;
    Ok(())
}

fn write_misc<W: Write>(writer: &mut Writer<W>, node: &Node) -> Result<(), DocumentError> {
    match node {
        Node::Comment { text, .. } => {
            writer.write_event(Event::Comment(BytesText::from_escaped(text.as_str())))?;
        }
        Node::Instruction { content, .. } => {
            writer.write_event(Event::PI(BytesText::from_escaped(content.as_str())))?;
        }
        Node::Element(e) => write_element(writer, e)?,
    }
    Ok(())
}

fn write_text<W: Write>(writer: &mut Writer<W>, text: &str) -> Result<(), DocumentError> {
    writer.write_event(Event::Text(BytesText::from_escaped(partial_escape(text))))?;
    Ok(())
}
