//! USLM 1.0 document writer.
//!
//! Same contract shape as the Akoma Ntoso writer: an FRBR identification
//! triple, the sparse hierarchy, then the subsection tree. Element and
//! attribute vocabulary follow the USLM schema (`identifier` instead of
//! `eId`, `chapeau`/`content` instead of `intro`/`content`), and the
//! direct-text cap is tighter.

use std::io;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use super::{flat_paragraphs, hierarchy_parts, level_tag, IdAllocator};
use crate::citation::sanitize_id;
use crate::config::{cap_text, USLM_NS, USLM_TEXT_CAP};
use crate::types::{Statute, Subsection};

type XmlWriter = Writer<Vec<u8>>;

pub(crate) fn write_document(statute: &Statute, generated_on: &str) -> io::Result<String> {
    let mut xml = Writer::new_with_indent(Vec::new(), b' ', 2);
    xml.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let identifier = format!("/{}", statute.rac_path);
    let mut root = BytesStart::new("lawDoc");
    root.push_attribute(("xmlns", USLM_NS));
    root.push_attribute(("xmlns:uslm", USLM_NS));
    root.push_attribute(("identifier", identifier.as_str()));
    xml.write_event(Event::Start(root))?;

    write_meta(&mut xml, statute, generated_on)?;
    write_main(&mut xml, statute)?;

    xml.write_event(Event::End(BytesEnd::new("lawDoc")))?;

    String::from_utf8(xml.into_inner()).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

fn write_meta(xml: &mut XmlWriter, statute: &Statute, generated_on: &str) -> io::Result<()> {
    let work = format!("/{}", statute.rac_path);
    let expression = format!("{work}/en@{generated_on}");
    let manifestation = format!("{expression}/main.xml");
    let author = format!("/ontology/organization/{}/legislature", statute.section.jurisdiction);

    xml.write_event(Event::Start(BytesStart::new("meta")))?;

    xml.write_event(Event::Start(BytesStart::new("work")))?;
    empty_with(xml, "this", &[("value", &format!("{work}/main"))])?;
    empty_with(xml, "uri", &[("value", &work)])?;
    empty_with(xml, "date", &[("date", generated_on), ("name", "generation")])?;
    empty_with(xml, "author", &[("href", &author)])?;
    xml.write_event(Event::End(BytesEnd::new("work")))?;

    xml.write_event(Event::Start(BytesStart::new("expression")))?;
    empty_with(xml, "this", &[("value", &format!("{expression}/main"))])?;
    empty_with(xml, "uri", &[("value", &expression)])?;
    empty_with(xml, "date", &[("date", generated_on), ("name", "generation")])?;
    empty_with(xml, "author", &[("href", &author)])?;
    empty_with(xml, "language", &[("language", "en")])?;
    xml.write_event(Event::End(BytesEnd::new("expression")))?;

    xml.write_event(Event::Start(BytesStart::new("manifestation")))?;
    empty_with(xml, "this", &[("value", &manifestation)])?;
    empty_with(xml, "uri", &[("value", &manifestation)])?;
    empty_with(xml, "date", &[("date", generated_on), ("name", "generation")])?;
    empty_with(xml, "author", &[("href", &author)])?;
    xml.write_event(Event::End(BytesEnd::new("manifestation")))?;

    xml.write_event(Event::End(BytesEnd::new("meta")))
}

fn write_main(xml: &mut XmlWriter, statute: &Statute) -> io::Result<()> {
    xml.write_event(Event::Start(BytesStart::new("main")))?;

    let levels = statute.section.hierarchy.levels();
    for (level, label) in &levels {
        let (tag, prefix) = hierarchy_parts(level);
        let id = format!("{prefix}_{}", sanitize_id(label));
        let mut el = BytesStart::new(tag);
        el.push_attribute(("identifier", id.as_str()));
        xml.write_event(Event::Start(el))?;
        text_element(xml, "num", label)?;
    }

    write_section(xml, statute)?;

    for (level, _) in levels.iter().rev() {
        let (tag, _) = hierarchy_parts(level);
        xml.write_event(Event::End(BytesEnd::new(tag)))?;
    }

    xml.write_event(Event::End(BytesEnd::new("main")))
}

fn write_section(xml: &mut XmlWriter, statute: &Statute) -> io::Result<()> {
    let section = &statute.section;
    let section_id = format!("sec_{}", sanitize_id(&section.section_number));

    let mut el = BytesStart::new("section");
    el.push_attribute(("identifier", section_id.as_str()));
    xml.write_event(Event::Start(el))?;

    let mut num = BytesStart::new("num");
    num.push_attribute(("value", section.section_number.as_str()));
    xml.write_event(Event::Start(num))?;
    xml.write_event(Event::Text(BytesText::new(&format!(
        "§ {}.",
        section.section_number
    ))))?;
    xml.write_event(Event::End(BytesEnd::new("num")))?;

    if !section.title.is_empty() {
        text_element(xml, "heading", &section.title)?;
    }

    if let Some(history) = &section.history {
        let mut note = BytesStart::new("note");
        note.push_attribute(("marker", "history"));
        xml.write_event(Event::Start(note))?;
        text_element(xml, "p", history)?;
        xml.write_event(Event::End(BytesEnd::new("note")))?;
    }

    if section.subsections.is_empty() {
        let paragraphs = flat_paragraphs(&section.text);
        if !paragraphs.is_empty() {
            xml.write_event(Event::Start(BytesStart::new("content")))?;
            for paragraph in &paragraphs {
                text_element(xml, "p", paragraph)?;
            }
            xml.write_event(Event::End(BytesEnd::new("content")))?;
        }
    } else {
        if !section.text.is_empty() {
            text_element(xml, "chapeau", &cap_text(&section.text, USLM_TEXT_CAP))?;
        }
        let mut ids = IdAllocator::new();
        for subsection in &section.subsections {
            write_subsection(xml, subsection, &section_id, 0, &mut ids)?;
        }
    }

    xml.write_event(Event::End(BytesEnd::new("section")))
}

fn write_subsection(
    xml: &mut XmlWriter,
    node: &Subsection,
    parent_id: &str,
    depth: usize,
    ids: &mut IdAllocator,
) -> io::Result<()> {
    let tag = level_tag(depth);
    let id = ids.node_id(parent_id, depth, &node.identifier);

    let mut el = BytesStart::new(tag);
    el.push_attribute(("identifier", id.as_str()));
    xml.write_event(Event::Start(el))?;

    text_element(xml, "num", &format!("({})", node.identifier))?;
    if let Some(heading) = &node.heading {
        text_element(xml, "heading", heading)?;
    }

    let capped = cap_text(&node.text, USLM_TEXT_CAP);
    if node.children.is_empty() {
        if !capped.is_empty() {
            text_element(xml, "content", &capped)?;
        }
    } else {
        if !capped.is_empty() {
            text_element(xml, "chapeau", &capped)?;
        }
        for child in &node.children {
            write_subsection(xml, child, &id, depth + 1, ids)?;
        }
    }

    xml.write_event(Event::End(BytesEnd::new(tag)))
}

fn text_element(xml: &mut XmlWriter, name: &str, text: &str) -> io::Result<()> {
    xml.write_event(Event::Start(BytesStart::new(name)))?;
    xml.write_event(Event::Text(BytesText::new(text)))?;
    xml.write_event(Event::End(BytesEnd::new(name)))
}

fn empty_with(xml: &mut XmlWriter, name: &str, attrs: &[(&str, &str)]) -> io::Result<()> {
    let mut el = BytesStart::new(name);
    for (key, value) in attrs {
        el.push_attribute((*key, *value));
    }
    xml.write_event(Event::Empty(el))
}
