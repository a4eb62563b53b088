//! Minimal namespace-aware XML element tree.
//!
//! The flowdoc reader needs random access to trailer definitions before it
//! walks the body, so documents are first materialized into a small tree of
//! [`XmlElement`]s built from quick-xml events.

use crate::common::{Error, Result};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::borrow::Cow;

/// Namespace URI bound to the reserved `xml` prefix.
const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// A parsed XML element with its resolved namespace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlElement {
    namespace: Option<String>,
    name: String,
    attributes: Vec<(String, String)>,
    text: String,
    children: Vec<XmlElement>,
}

/// Namespace declarations introduced by one element.
#[derive(Debug, Default)]
struct NamespaceScope {
    default: Option<Option<String>>,
    prefixes: Vec<(String, String)>,
}

impl XmlElement {
    /// Local name of the element (without prefix).
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Resolved namespace URI, if the element is bound to one.
    #[inline]
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Check the element's local name and namespace.
    #[inline]
    pub fn is(&self, namespace: &str, name: &str) -> bool {
        self.name == name && self.namespace.as_deref() == Some(namespace)
    }

    /// Direct text content (concatenation of all text nodes of this element).
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Child elements in document order.
    #[inline]
    pub fn children(&self) -> &[XmlElement] {
        &self.children
    }

    /// Get attribute value by local name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Get an attribute that must be present.
    pub fn required_attr(&self, name: &'static str) -> Result<&str> {
        self.attr(name).ok_or_else(|| Error::MissingAttribute {
            element: self.name.clone(),
            attribute: name,
        })
    }

    /// Get boolean attribute value; anything but `true`/`false` reads as unset.
    pub fn bool_attr(&self, name: &str) -> Option<bool> {
        match self.attr(name)? {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        }
    }

    /// Get unsigned integer attribute value; invalid numbers read as unset.
    pub fn u32_attr(&self, name: &str) -> Option<u32> {
        self.attr(name).and_then(|s| s.trim().parse().ok())
    }

    /// Parse a complete document and return its single root element.
    pub fn parse_document(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(false);

        let mut buf = Vec::new();
        let mut stack: Vec<XmlElement> = Vec::new();
        let mut scopes: Vec<NamespaceScope> = Vec::new();
        let mut root: Option<XmlElement> = None;

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => {
                    if root.is_some() {
                        return Err(Error::MalformedDocument(
                            "Multiple root elements".to_string(),
                        ));
                    }
                    let (element, scope) = Self::open(e, &scopes)?;
                    scopes.push(scope);
                    stack.push(element);
                },
                Ok(Event::Empty(ref e)) => {
                    if root.is_some() {
                        return Err(Error::MalformedDocument(
                            "Multiple root elements".to_string(),
                        ));
                    }
                    let (element, _) = Self::open(e, &scopes)?;
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(element),
                        None => root = Some(element),
                    }
                },
                Ok(Event::End(_)) => {
                    scopes.pop();
                    if let Some(element) = stack.pop() {
                        match stack.last_mut() {
                            Some(parent) => parent.children.push(element),
                            None => root = Some(element),
                        }
                    }
                },
                Ok(Event::Text(ref t)) => {
                    if let Some(current) = stack.last_mut() {
                        let raw = std::str::from_utf8(t.as_ref())?;
                        let text = quick_xml::escape::unescape(raw)
                            .map_err(|e| Error::XmlError(e.to_string()))?;
                        current.text.push_str(&text);
                    }
                },
                Ok(Event::CData(ref t)) => {
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(std::str::from_utf8(t.as_ref())?);
                    }
                },
                Ok(Event::GeneralRef(ref r)) => {
                    if let Some(current) = stack.last_mut() {
                        let resolved = match r
                            .resolve_char_ref()
                            .map_err(|e| Error::XmlError(e.to_string()))?
                        {
                            Some(ch) => Cow::Owned(ch.to_string()),
                            None => {
                                let name = r.decode().map_err(|e| Error::XmlError(e.to_string()))?;
                                let value = quick_xml::escape::resolve_predefined_entity(&name)
                                    .ok_or_else(|| {
                                        Error::XmlError(format!("Unknown entity '&{};'", name))
                                    })?;
                                Cow::Borrowed(value)
                            },
                        };
                        current.text.push_str(&resolved);
                    }
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(Error::XmlError(e.to_string())),
                _ => {},
            }
            buf.clear();
        }

        if !stack.is_empty() {
            return Err(Error::MalformedDocument("Unclosed element".to_string()));
        }
        root.ok_or_else(|| Error::MalformedDocument("No root element found".to_string()))
    }

    /// Build an element from a start tag, resolving names against the
    /// enclosing scopes plus the declarations found on the tag itself.
    fn open(e: &BytesStart<'_>, scopes: &[NamespaceScope]) -> Result<(Self, NamespaceScope)> {
        let mut scope = NamespaceScope::default();
        let mut attributes = Vec::new();

        for attr in e.attributes() {
            let attr = attr?;
            let key = std::str::from_utf8(attr.key.as_ref())?;
            let value = attr
                .unescape_value()
                .map_err(|e| Error::XmlError(e.to_string()))?
                .into_owned();

            if key == "xmlns" {
                scope.default = Some(if value.is_empty() { None } else { Some(value) });
            } else if let Some(prefix) = key.strip_prefix("xmlns:") {
                scope.prefixes.push((prefix.to_string(), value));
            } else {
                // Attributes are addressed by local name; flowdoc attributes are unqualified
                let local = key.rsplit(':').next().unwrap_or(key);
                attributes.push((local.to_string(), value));
            }
        }

        let qname = std::str::from_utf8(e.name().as_ref())?.to_string();
        let (prefix, local) = match qname.split_once(':') {
            Some((prefix, local)) => (Some(prefix), local),
            None => (None, qname.as_str()),
        };

        let namespace = match prefix {
            Some("xml") => Some(XML_NAMESPACE.to_string()),
            Some(prefix) => Some(
                Self::lookup_prefix(prefix, &scope, scopes).ok_or_else(|| {
                    Error::XmlError(format!("Unbound namespace prefix '{}'", prefix))
                })?,
            ),
            None => Self::lookup_default(&scope, scopes),
        };

        let element = XmlElement {
            namespace,
            name: local.to_string(),
            attributes,
            text: String::new(),
            children: Vec::new(),
        };
        Ok((element, scope))
    }

    fn lookup_prefix(prefix: &str, own: &NamespaceScope, scopes: &[NamespaceScope]) -> Option<String> {
        std::iter::once(own)
            .chain(scopes.iter().rev())
            .find_map(|scope| {
                scope
                    .prefixes
                    .iter()
                    .find(|(p, _)| p == prefix)
                    .map(|(_, uri)| uri.clone())
            })
    }

    fn lookup_default(own: &NamespaceScope, scopes: &[NamespaceScope]) -> Option<String> {
        std::iter::once(own)
            .chain(scopes.iter().rev())
            .find_map(|scope| scope.default.clone())
            .flatten()
    }
}
