//! Akoma Ntoso 3.0 document writer.

use std::io;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use super::{flat_paragraphs, hierarchy_parts, level_tag, IdAllocator};
use crate::citation::sanitize_id;
use crate::config::{cap_text, AKN_NS, AKN_TEXT_CAP};
use crate::jurisdiction;
use crate::types::{Statute, Subsection};

type XmlWriter = Writer<Vec<u8>>;

pub(crate) fn write_document(statute: &Statute, generated_on: &str) -> io::Result<String> {
    let mut xml = Writer::new_with_indent(Vec::new(), b' ', 2);
    xml.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut root = BytesStart::new("akomaNtoso");
    root.push_attribute(("xmlns", AKN_NS));
    root.push_attribute(("xmlns:akn", AKN_NS));
    xml.write_event(Event::Start(root))?;

    let code = statute.section.code.to_lowercase();
    let mut act = BytesStart::new("act");
    act.push_attribute(("name", code.as_str()));
    xml.write_event(Event::Start(act))?;

    write_meta(&mut xml, statute, generated_on)?;
    write_body(&mut xml, statute)?;

    xml.write_event(Event::End(BytesEnd::new("act")))?;
    xml.write_event(Event::End(BytesEnd::new("akomaNtoso")))?;

    String::from_utf8(xml.into_inner()).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// FRBR identification plus the organization reference it points at.
fn write_meta(xml: &mut XmlWriter, statute: &Statute, generated_on: &str) -> io::Result<()> {
    let work = format!("/{}", statute.rac_path);
    let expression = format!("{work}/eng@{generated_on}");
    let manifestation = format!("{expression}/main.xml");

    xml.write_event(Event::Start(BytesStart::new("meta")))?;

    let mut identification = BytesStart::new("identification");
    identification.push_attribute(("source", "#legislature"));
    xml.write_event(Event::Start(identification))?;

    xml.write_event(Event::Start(BytesStart::new("FRBRWork")))?;
    empty_with(xml, "FRBRthis", &[("value", &format!("{work}/main"))])?;
    empty_with(xml, "FRBRuri", &[("value", &work)])?;
    empty_with(xml, "FRBRdate", &[("date", generated_on), ("name", "generation")])?;
    empty_with(xml, "FRBRauthor", &[("href", "#legislature")])?;
    empty_with(xml, "FRBRcountry", &[("value", "us")])?;
    xml.write_event(Event::End(BytesEnd::new("FRBRWork")))?;

    xml.write_event(Event::Start(BytesStart::new("FRBRExpression")))?;
    empty_with(xml, "FRBRthis", &[("value", &format!("{expression}/main"))])?;
    empty_with(xml, "FRBRuri", &[("value", &expression)])?;
    empty_with(xml, "FRBRdate", &[("date", generated_on), ("name", "generation")])?;
    empty_with(xml, "FRBRauthor", &[("href", "#legislature")])?;
    empty_with(xml, "FRBRlanguage", &[("language", "eng")])?;
    xml.write_event(Event::End(BytesEnd::new("FRBRExpression")))?;

    xml.write_event(Event::Start(BytesStart::new("FRBRManifestation")))?;
    empty_with(xml, "FRBRthis", &[("value", &manifestation)])?;
    empty_with(xml, "FRBRuri", &[("value", &manifestation)])?;
    empty_with(xml, "FRBRdate", &[("date", generated_on), ("name", "generation")])?;
    empty_with(xml, "FRBRauthor", &[("href", "#legislature")])?;
    xml.write_event(Event::End(BytesEnd::new("FRBRManifestation")))?;

    xml.write_event(Event::End(BytesEnd::new("identification")))?;

    let jurisdiction_id = statute.section.jurisdiction.as_str();
    let show_as = match jurisdiction::lookup(jurisdiction_id) {
        Some(j) => format!("{} Legislature", j.name),
        None => format!("{jurisdiction_id} Legislature"),
    };
    let href = format!("/ontology/organization/{jurisdiction_id}/legislature");

    let mut references = BytesStart::new("references");
    references.push_attribute(("source", "#legislature"));
    xml.write_event(Event::Start(references))?;
    empty_with(
        xml,
        "TLCOrganization",
        &[
            ("eId", "legislature"),
            ("href", href.as_str()),
            ("showAs", show_as.as_str()),
        ],
    )?;
    xml.write_event(Event::End(BytesEnd::new("references")))?;

    xml.write_event(Event::End(BytesEnd::new("meta")))
}

fn write_body(xml: &mut XmlWriter, statute: &Statute) -> io::Result<()> {
    xml.write_event(Event::Start(BytesStart::new("body")))?;

    // Sparse structural hierarchy: only levels the fetcher supplied.
    let levels = statute.section.hierarchy.levels();
    for (level, label) in &levels {
        let (tag, prefix) = hierarchy_parts(level);
        let eid = format!("{prefix}_{}", sanitize_id(label));
        let mut el = BytesStart::new(tag);
        el.push_attribute(("eId", eid.as_str()));
        xml.write_event(Event::Start(el))?;
        text_element(xml, "num", label)?;
    }

    write_section(xml, statute)?;

    for (level, _) in levels.iter().rev() {
        let (tag, _) = hierarchy_parts(level);
        xml.write_event(Event::End(BytesEnd::new(tag)))?;
    }

    xml.write_event(Event::End(BytesEnd::new("body")))
}

fn write_section(xml: &mut XmlWriter, statute: &Statute) -> io::Result<()> {
    let section = &statute.section;
    let section_id = format!("sec_{}", sanitize_id(&section.section_number));

    let mut el = BytesStart::new("section");
    el.push_attribute(("eId", section_id.as_str()));
    xml.write_event(Event::Start(el))?;

    text_element(xml, "num", &format!("§ {}", section.section_number))?;
    if !section.title.is_empty() {
        text_element(xml, "heading", &section.title)?;
    }

    if let Some(history) = &section.history {
        let mut note = BytesStart::new("authorialNote");
        note.push_attribute(("marker", "history"));
        note.push_attribute(("placement", "bottom"));
        xml.write_event(Event::Start(note))?;
        text_element(xml, "p", history)?;
        xml.write_event(Event::End(BytesEnd::new("authorialNote")))?;
    }

    if section.subsections.is_empty() {
        // No recognized structure: render the flat text as capped paragraphs.
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
            xml.write_event(Event::Start(BytesStart::new("intro")))?;
            text_element(xml, "p", &cap_text(&section.text, AKN_TEXT_CAP))?;
            xml.write_event(Event::End(BytesEnd::new("intro")))?;
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
    let eid = ids.node_id(parent_id, depth, &node.identifier);

    let mut el = BytesStart::new(tag);
    el.push_attribute(("eId", eid.as_str()));
    xml.write_event(Event::Start(el))?;

    text_element(xml, "num", &format!("({})", node.identifier))?;
    if let Some(heading) = &node.heading {
        text_element(xml, "heading", heading)?;
    }

    let capped = cap_text(&node.text, AKN_TEXT_CAP);
    if node.children.is_empty() {
        if !capped.is_empty() {
            xml.write_event(Event::Start(BytesStart::new("content")))?;
            text_element(xml, "p", &capped)?;
            xml.write_event(Event::End(BytesEnd::new("content")))?;
        }
    } else {
        if !capped.is_empty() {
            xml.write_event(Event::Start(BytesStart::new("intro")))?;
            text_element(xml, "p", &capped)?;
            xml.write_event(Event::End(BytesEnd::new("intro")))?;
        }
        for child in &node.children {
            write_subsection(xml, child, &eid, depth + 1, ids)?;
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
