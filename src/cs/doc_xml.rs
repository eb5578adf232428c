//! Reading and writing documentation documents
//!
//! Documents are written with `quick-xml`, indented by two spaces. Every value
//! lives in an attribute; only `xmldoc` carries character data, as one or more
//! CDATA sections. The reader accepts any formatting and also plain escaped
//! text inside `xmldoc`.

use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::escape::{resolve_predefined_entity, unescape};
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, Event};

use super::doc_record::{DOCUMENTATION_SCHEMA_VERSION, MemberFlags, MemberRecord};
use super::error::{DocSyncError, SyncResult};
use super::symbols::{
    Accessibility, AttributeArgument, AttributeInfo, ParameterInfo, Signature, SymbolKind,
    TypeParameterInfo,
};
use super::xml_text::{escape_xml, split_cdata, strip_illegal_chars};

const ROOT_ELEMENT: &str = "doc";
const MEMBER_ELEMENT: &str = "member";
const XMLDOC_ELEMENT: &str = "xmldoc";

/// Thin wrapper over an indenting `quick-xml` writer
pub(crate) struct DocWriter {
    writer: Writer<Vec<u8>>,
}

impl DocWriter {
    /// Start a document with the XML declaration and the versioned root element
    pub(crate) fn new(version: &str) -> SyncResult<Self> {
        let mut doc = Self {
            writer: Writer::new_with_indent(Vec::new(), b' ', 2),
        };
        doc.write(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
        doc.start(ROOT_ELEMENT, &[("version", version)])?;
        Ok(doc)
    }

    fn write(&mut self, event: Event) -> SyncResult<()> {
        self.writer
            .write_event(event)
            .map_err(|e| DocSyncError::XmlWrite {
                message: e.to_string(),
            })
    }

    fn element<'a>(name: &'a str, attributes: &[(&str, &str)]) -> BytesStart<'a> {
        let mut element = BytesStart::new(name);
        for (key, value) in attributes {
            element.push_attribute((*key, strip_illegal_chars(value).as_str()));
        }
        element
    }

    pub(crate) fn start(&mut self, name: &str, attributes: &[(&str, &str)]) -> SyncResult<()> {
        self.write(Event::Start(Self::element(name, attributes)))
    }

    pub(crate) fn empty(&mut self, name: &str, attributes: &[(&str, &str)]) -> SyncResult<()> {
        self.write(Event::Empty(Self::element(name, attributes)))
    }

    pub(crate) fn end(&mut self, name: &str) -> SyncResult<()> {
        self.write(Event::End(BytesEnd::new(name)))
    }

    /// Write text as CDATA, split so that no section is terminated early
    pub(crate) fn cdata(&mut self, text: &str) -> SyncResult<()> {
        let text = strip_illegal_chars(text);
        for piece in split_cdata(&text) {
            self.write(Event::CData(BytesCData::new(piece)))?;
        }
        Ok(())
    }

    /// Close the root element and return the document text
    pub(crate) fn finish(mut self) -> SyncResult<String> {
        self.end(ROOT_ELEMENT)?;
        let mut bytes = self.writer.into_inner();
        bytes.push(b'\n');
        String::from_utf8(bytes).map_err(|e| DocSyncError::XmlWrite {
            message: e.to_string(),
        })
    }
}

/// Serialize type records as a documentation document
pub fn write_documentation(records: &[MemberRecord]) -> SyncResult<String> {
    let mut writer = DocWriter::new(DOCUMENTATION_SCHEMA_VERSION)?;
    for record in records {
        write_member(&mut writer, record)?;
    }
    writer.finish()
}

fn write_member(writer: &mut DocWriter, record: &MemberRecord) -> SyncResult<()> {
    let mut attributes: Vec<(&str, &str)> = vec![("name", record.name.as_str()), ("type", record.kind.as_str())];
    if let Some(namespace) = &record.namespace {
        attributes.push(("namespace", namespace.as_str()));
    }
    if let Some(containing_type) = &record.containing_type {
        attributes.push(("containingType", containing_type.as_str()));
    }
    if let Some(inherits) = &record.inherits {
        attributes.push(("inherits", inherits.as_str()));
    }
    if let Some(accessibility) = record.accessibility {
        attributes.push(("accessibility", accessibility.as_str()));
    }
    for (flag, value) in record.flags.entries() {
        if value {
            attributes.push((flag, "true"));
        }
    }
    if let Some(value) = &record.value {
        attributes.push(("value", value.as_str()));
    }
    writer.start(MEMBER_ELEMENT, &attributes)?;

    if !record.interfaces.is_empty() {
        writer.start("interfaces", &[])?;
        for interface in &record.interfaces {
            writer.empty("interface", &[("name", interface.as_str())])?;
        }
        writer.end("interfaces")?;
    }

    write_type_parameters(writer, &record.type_parameters)?;

    if let Some(signature) = &record.signature {
        write_signature(writer, signature)?;
    }

    if !record.attributes.is_empty() {
        writer.start("attributes", &[])?;
        for attribute in &record.attributes {
            write_attribute(writer, attribute)?;
        }
        writer.end("attributes")?;
    }

    match record.xmldoc.as_deref() {
        Some(text) if !text.is_empty() => {
            writer.start(XMLDOC_ELEMENT, &[])?;
            writer.cdata(text)?;
            writer.end(XMLDOC_ELEMENT)?;
        }
        _ => writer.empty(XMLDOC_ELEMENT, &[])?,
    }

    for member in &record.members {
        write_member(writer, member)?;
    }

    writer.end(MEMBER_ELEMENT)
}

fn write_type_parameters(writer: &mut DocWriter, parameters: &[TypeParameterInfo]) -> SyncResult<()> {
    if parameters.is_empty() {
        return Ok(());
    }
    writer.start("typeParameters", &[])?;
    for parameter in parameters {
        let mut attributes = vec![("name", parameter.name.as_str())];
        if let Some(variance) = &parameter.variance {
            attributes.push(("variance", variance.as_str()));
        }
        if parameter.constraints.is_empty() {
            writer.empty("typeParameter", &attributes)?;
            continue;
        }
        writer.start("typeParameter", &attributes)?;
        for constraint in &parameter.constraints {
            writer.empty("constraint", &[("value", constraint.as_str())])?;
        }
        writer.end("typeParameter")?;
    }
    writer.end("typeParameters")
}

fn write_signature(writer: &mut DocWriter, signature: &Signature) -> SyncResult<()> {
    let mut attributes = Vec::new();
    if let Some(return_type) = &signature.return_type {
        attributes.push(("returnType", return_type.as_str()));
    }
    if signature.parameters.is_empty() {
        return writer.empty("signature", &attributes);
    }

    writer.start("signature", &attributes)?;
    writer.start("parameters", &[])?;
    for parameter in &signature.parameters {
        let mut attributes = vec![
            ("name", parameter.name.as_str()),
            ("type", parameter.type_identity.as_str()),
        ];
        if let Some(modifier) = &parameter.modifier {
            attributes.push(("modifier", modifier.as_str()));
        }
        if let Some(default_value) = &parameter.default_value {
            attributes.push(("default", default_value.as_str()));
        }
        writer.empty("parameter", &attributes)?;
    }
    writer.end("parameters")?;
    writer.end("signature")
}

fn write_attribute(writer: &mut DocWriter, attribute: &AttributeInfo) -> SyncResult<()> {
    let type_attribute = [("type", attribute.type_name.as_str())];
    if attribute.arguments.is_empty() {
        return writer.empty("attribute", &type_attribute);
    }
    writer.start("attribute", &type_attribute)?;
    for argument in &attribute.arguments {
        let mut attributes = Vec::new();
        if let Some(name) = &argument.name {
            attributes.push(("name", name.as_str()));
        }
        attributes.push(("value", argument.value.as_str()));
        attributes.push(("type", argument.value_type.as_str()));
        writer.empty("argument", &attributes)?;
    }
    writer.end("attribute")
}

/// Generic element tree produced by the reader
#[derive(Debug, Clone, Default)]
pub(crate) struct XmlElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlElement>,
    pub text: String,
}

impl XmlElement {
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    fn required(&self, name: &str) -> SyncResult<&str> {
        self.attribute(name).ok_or_else(|| DocSyncError::InvalidDocument {
            message: format!("{} is missing the '{}' attribute", self.start_tag(), name),
        })
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.children.iter().filter(move |c| c.name == name)
    }

    fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Start tag of the element as it would be written
    pub fn start_tag(&self) -> String {
        let mut tag = format!("<{}", self.name);
        for (key, value) in &self.attributes {
            tag.push_str(&format!(" {}=\"{}\"", key, escape_xml(value)));
        }
        tag.push('>');
        tag
    }
}

fn invalid(message: impl Into<String>) -> DocSyncError {
    DocSyncError::InvalidDocument {
        message: message.into(),
    }
}

fn decode_text(bytes: &[u8]) -> SyncResult<String> {
    let text = std::str::from_utf8(bytes).map_err(|e| invalid(e.to_string()))?;
    unescape(text)
        .map(|t| t.into_owned())
        .map_err(|e| invalid(e.to_string()))
}

fn element_from_start(start: &BytesStart) -> SyncResult<XmlElement> {
    let name = std::str::from_utf8(start.name().as_ref())
        .map_err(|e| invalid(e.to_string()))?
        .to_string();
    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| invalid(e.to_string()))?;
        let key = std::str::from_utf8(attr.key.as_ref())
            .map_err(|e| invalid(e.to_string()))?
            .to_string();
        attributes.push((key, decode_text(&attr.value)?));
    }
    Ok(XmlElement {
        name,
        attributes,
        children: Vec::new(),
        text: String::new(),
    })
}

/// Parse XML text into an element tree rooted at the document element
pub(crate) fn parse_element_tree(text: &str) -> SyncResult<XmlElement> {
    // Text is kept untrimmed: spaces next to entity references are content
    let mut reader = Reader::from_str(text);

    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    fn attach(stack: &mut [XmlElement], root: &mut Option<XmlElement>, element: XmlElement) {
        match stack.last_mut() {
            Some(parent) => parent.children.push(element),
            None => {
                if root.is_none() {
                    *root = Some(element);
                }
            }
        }
    }

    loop {
        match reader.read_event()? {
            Event::Start(ref e) => stack.push(element_from_start(e)?),
            Event::Empty(ref e) => {
                let element = element_from_start(e)?;
                attach(&mut stack, &mut root, element);
            }
            Event::End(_) => {
                let element = stack.pop().ok_or_else(|| invalid("unbalanced end tag"))?;
                attach(&mut stack, &mut root, element);
            }
            Event::Text(ref e) => {
                let text = decode_text(e)?;
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&text);
                }
            }
            Event::CData(e) => {
                let inner = e.into_inner();
                let text = std::str::from_utf8(&inner).map_err(|e| invalid(e.to_string()))?;
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(text);
                }
            }
            Event::GeneralRef(ref e) => {
                let name = std::str::from_utf8(e).map_err(|e| invalid(e.to_string()))?;
                let resolved = match e.resolve_char_ref() {
                    Ok(Some(ch)) => ch.to_string(),
                    _ => resolve_predefined_entity(name)
                        .map(str::to_string)
                        .ok_or_else(|| invalid(format!("unknown entity '&{};'", name)))?,
                };
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&resolved);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(invalid("document ended inside an element"));
    }
    root.ok_or_else(|| invalid("document has no root element"))
}

/// Check the root element name and schema version
pub(crate) fn check_root(root: &XmlElement, version: &str) -> SyncResult<()> {
    if root.name != ROOT_ELEMENT {
        return Err(invalid(format!(
            "expected <{}> root element, found <{}>",
            ROOT_ELEMENT, root.name
        )));
    }
    match root.attribute("version") {
        Some(found) if found == version => Ok(()),
        found => Err(invalid(format!(
            "unsupported document version {:?}, expected \"{}\"",
            found.unwrap_or_default(),
            version
        ))),
    }
}

/// Parse a documentation document into its type records
pub fn read_documentation(text: &str) -> SyncResult<Vec<MemberRecord>> {
    let root = parse_element_tree(text)?;
    check_root(&root, DOCUMENTATION_SCHEMA_VERSION)?;
    root.children_named(MEMBER_ELEMENT)
        .map(record_from_element)
        .collect()
}

fn record_from_element(element: &XmlElement) -> SyncResult<MemberRecord> {
    let name = element.required("name")?;
    let kind_text = element.required("type")?;
    let kind = SymbolKind::parse(kind_text)
        .ok_or_else(|| invalid(format!("{} has unknown type '{}'", element.start_tag(), kind_text)))?;

    let mut record = MemberRecord::new(name, kind);
    record.source_tag = element.start_tag();
    record.namespace = element.attribute("namespace").map(str::to_string);
    record.containing_type = element
        .attribute("containingType")
        .filter(|c| !c.is_empty())
        .map(str::to_string);
    record.inherits = element.attribute("inherits").map(str::to_string);
    record.accessibility = element.attribute("accessibility").and_then(Accessibility::parse);
    record.value = element.attribute("value").map(str::to_string);

    let mut flags = MemberFlags::default();
    for (flag, _) in MemberFlags::default().entries() {
        if let Some(value) = element.attribute(flag) {
            flags.set(flag, value.eq_ignore_ascii_case("true"));
        }
    }
    record.flags = flags;

    if let Some(interfaces) = element.child("interfaces") {
        record.interfaces = interfaces
            .children_named("interface")
            .filter_map(|i| i.attribute("name"))
            .map(str::to_string)
            .collect();
    }

    if let Some(parameters) = element.child("typeParameters") {
        record.type_parameters = parameters
            .children_named("typeParameter")
            .map(|p| TypeParameterInfo {
                name: p.attribute("name").unwrap_or_default().to_string(),
                variance: p.attribute("variance").map(str::to_string),
                constraints: p
                    .children_named("constraint")
                    .filter_map(|c| c.attribute("value"))
                    .map(str::to_string)
                    .collect(),
            })
            .collect();
    }

    if let Some(signature) = element.child("signature") {
        let parameters = signature
            .child("parameters")
            .map(|list| {
                list.children_named("parameter")
                    .map(|p| ParameterInfo {
                        name: p.attribute("name").unwrap_or_default().to_string(),
                        type_identity: p.attribute("type").unwrap_or_default().to_string(),
                        modifier: p.attribute("modifier").map(str::to_string),
                        default_value: p.attribute("default").map(str::to_string),
                    })
                    .collect()
            })
            .unwrap_or_default();
        record.signature = Some(Signature {
            return_type: signature.attribute("returnType").map(str::to_string),
            type_parameters: Vec::new(),
            parameters,
        });
    }

    if let Some(attributes) = element.child("attributes") {
        record.attributes = attributes
            .children_named("attribute")
            .map(|a| AttributeInfo {
                type_name: a.attribute("type").unwrap_or_default().to_string(),
                arguments: a
                    .children_named("argument")
                    .map(|arg| AttributeArgument {
                        name: arg.attribute("name").map(str::to_string),
                        value: arg.attribute("value").unwrap_or_default().to_string(),
                        value_type: arg.attribute("type").unwrap_or_default().to_string(),
                    })
                    .collect(),
            })
            .collect();
    }

    record.xmldoc = element.child(XMLDOC_ELEMENT).map(|x| x.text.clone());

    record.members = element
        .children_named(MEMBER_ELEMENT)
        .map(record_from_element)
        .collect::<SyncResult<Vec<_>>>()?;

    Ok(record)
}

#[cfg(test)]
#[path = "doc_xml_tests.rs"]
mod tests;
