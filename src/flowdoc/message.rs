//! XML form of script messages.
//!
//! A message is stored as its parsed token tree, one element per token:
//!
//! ```xml
//! <message key="items">
//!   <plural var="n" mode="cardinal">
//!     <one><t>1 item</t></one>
//!     <other><count/><t> items</t></other>
//!   </plural>
//! </message>
//! ```
//!
//! Messages outside the supported grammar, and messages whose source is not
//! in canonical form, are stored verbatim as a single `<c>` child.

use super::constants::{C, CHOOSE, COUNT, EXACT, MESSAGE, OTHER, PLURAL, T, VALUE, WHEN};
use crate::common::xml::{Attrs, XmlElement, XmlWriter};
use crate::script::{MessageFormat, MessageNode, PluralCase, PluralMode, SelectCase};

/// Write `<message key>` for one message source string.
pub(crate) fn write_message(w: &mut XmlWriter, key: &str, source: &str) {
    let mut attrs = Attrs::new();
    attrs.push("key", key);
    w.open(MESSAGE, &attrs);
    match MessageFormat::parse(source) {
        Ok(message) if message.to_source() == source => write_nodes(w, message.nodes()),
        Ok(_) => {
            tracing::debug!(key, "Storing non-canonical message as literal text");
            w.text_element(C, &Attrs::new(), source);
        },
        Err(e) => {
            tracing::warn!(key, error = %e, "Storing unsupported message as literal text");
            w.text_element(C, &Attrs::new(), source);
        },
    }
    w.close(MESSAGE);
}

fn write_nodes(w: &mut XmlWriter, nodes: &[MessageNode]) {
    for node in nodes {
        match node {
            MessageNode::Text(text) => w.text_element(T, &Attrs::new(), text),
            MessageNode::Count => w.empty(COUNT, &Attrs::new()),
            MessageNode::Value { var } => {
                let mut attrs = Attrs::new();
                attrs.push("var", var.as_str());
                w.empty(VALUE, &attrs);
            },
            MessageNode::Plural {
                var,
                mode,
                offset,
                cases,
            } => {
                let mut attrs = Attrs::new();
                attrs
                    .push("var", var.as_str())
                    .push("mode", mode.as_str())
                    .push_opt("offset", *offset);
                w.open(PLURAL, &attrs);
                for (case, body) in cases {
                    let mut attrs = Attrs::new();
                    let tag = match case {
                        PluralCase::Exact(digits) => {
                            attrs.push("eq", digits.as_str());
                            EXACT
                        },
                        other => other.category().unwrap_or(OTHER),
                    };
                    write_case(w, tag, &attrs, body);
                }
                w.close(PLURAL);
            },
            MessageNode::Select { var, cases } => {
                let mut attrs = Attrs::new();
                attrs.push("var", var.as_str());
                w.open(CHOOSE, &attrs);
                for (case, body) in cases {
                    let mut attrs = Attrs::new();
                    let tag = match case {
                        SelectCase::When(key) => {
                            attrs.push("eq", key.as_str());
                            WHEN
                        },
                        SelectCase::Other => OTHER,
                    };
                    write_case(w, tag, &attrs, body);
                }
                w.close(CHOOSE);
            },
        }
    }
}

fn write_case(w: &mut XmlWriter, tag: &str, attrs: &Attrs, body: &[MessageNode]) {
    if body.is_empty() {
        w.empty(tag, attrs);
    } else {
        w.open(tag, attrs);
        write_nodes(w, body);
        w.close(tag);
    }
}

/// Reassemble message source text from a `<message>` element.
pub(crate) fn read_message(el: &XmlElement) -> String {
    // Literal fallback
    if let [only] = el.children() {
        if only.name() == C {
            return only.text().to_string();
        }
    }
    MessageFormat::from_nodes(read_nodes(el)).to_source()
}

fn read_nodes(el: &XmlElement) -> Vec<MessageNode> {
    let mut nodes = Vec::new();
    for child in el.children() {
        match child.name() {
            T => nodes.push(MessageNode::Text(child.text().to_string())),
            COUNT => nodes.push(MessageNode::Count),
            VALUE => nodes.push(MessageNode::Value {
                var: child.attr("var").unwrap_or_default().to_string(),
            }),
            PLURAL => {
                let cases = child
                    .children()
                    .iter()
                    .filter_map(|case| {
                        let key = match case.name() {
                            EXACT => PluralCase::Exact(case.attr("eq")?.to_string()),
                            name => PluralCase::parse(name)?,
                        };
                        Some((key, read_nodes(case)))
                    })
                    .collect();
                nodes.push(MessageNode::Plural {
                    var: child.attr("var").unwrap_or_default().to_string(),
                    mode: child
                        .attr("mode")
                        .and_then(PluralMode::parse)
                        .unwrap_or(PluralMode::Cardinal),
                    offset: child.u32_attr("offset"),
                    cases,
                });
            },
            CHOOSE => {
                let cases = child
                    .children()
                    .iter()
                    .filter_map(|case| {
                        let key = match case.name() {
                            WHEN => SelectCase::When(case.attr("eq")?.to_string()),
                            OTHER => SelectCase::Other,
                            _ => return None,
                        };
                        Some((key, read_nodes(case)))
                    })
                    .collect();
                nodes.push(MessageNode::Select {
                    var: child.attr("var").unwrap_or_default().to_string(),
                    cases,
                });
            },
            other => tracing::warn!(element = other, "Skipping unknown message element"),
        }
    }
    nodes
}
