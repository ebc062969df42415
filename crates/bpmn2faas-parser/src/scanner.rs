//! XML scanning phase.
//!
//! Streams the document with `quick-xml` and collects the elements the
//! compiler cares about into [`RawDocument`]. Element and attribute names are
//! matched by local name, so any namespace prefix works. Everything else
//! (diagram interchange, documentation, extension elements) is skipped.

use std::fmt::Display;

use log::trace;
use quick_xml::{
    Reader,
    events::{BytesStart, Event},
};

use crate::{
    document_types::{Attributes, RawDocument, RawFlow, RawLane, RawNode, RawProcess},
    error::{Diagnostic, ParseError},
    span::{Span, Spanned},
};

/// Flow node elements recognized directly inside a `process`.
const FLOW_NODE_TAGS: &[&str] = &[
    "startEvent",
    "endEvent",
    "intermediateCatchEvent",
    "intermediateThrowEvent",
    "boundaryEvent",
    "task",
    "serviceTask",
    "userTask",
    "sendTask",
    "receiveTask",
    "manualTask",
    "scriptTask",
    "businessRuleTask",
    "callActivity",
    "subProcess",
    "exclusiveGateway",
    "parallelGateway",
    "inclusiveGateway",
    "eventBasedGateway",
    "complexGateway",
];

/// Which element's text is being collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Capture {
    Outgoing,
    Condition,
    FlowNodeRef,
}

impl Capture {
    fn tag(self) -> &'static str {
        match self {
            Capture::Outgoing => "outgoing",
            Capture::Condition => "conditionExpression",
            Capture::FlowNodeRef => "flowNodeRef",
        }
    }
}

/// Scan `source` into raw elements.
///
/// # Errors
///
/// Returns an `E001` diagnostic when the document is not well-formed XML.
pub(crate) fn scan(source: &str) -> Result<RawDocument, ParseError> {
    let mut scanner = Scanner::default();
    let mut reader = Reader::from_str(source);
    reader.config_mut().trim_text(true);

    loop {
        let before = reader.buffer_position() as usize;
        let event = reader
            .read_event()
            .map_err(|err| malformed(err, before, reader.buffer_position() as usize))?;
        let span = Span::new(skip_whitespace(source, before)..reader.buffer_position() as usize);

        match event {
            Event::Start(element) => {
                scanner.depth += 1;
                let (name, attributes) = read_element(&element, span)?;
                scanner.open(&name, attributes, span);
            }
            Event::Empty(element) => {
                scanner.depth += 1;
                let (name, attributes) = read_element(&element, span)?;
                scanner.open(&name, attributes, span);
                scanner.close(&name, span);
                scanner.depth -= 1;
            }
            Event::End(element) => {
                let name = String::from_utf8_lossy(element.local_name().as_ref()).into_owned();
                scanner.close(&name, span);
                scanner.depth = scanner.depth.saturating_sub(1);
            }
            Event::Text(text) => {
                let text = text.unescape().map_err(|err| malformed(err, span.start(), span.end()))?;
                scanner.text(&text);
            }
            Event::CData(data) => {
                scanner.text(&String::from_utf8_lossy(&data.into_inner()));
            }
            Event::Eof => break,
            _ => {}
        }
    }

    trace!(processes_count = scanner.document.processes.len(); "Document scanned");
    Ok(scanner.document)
}

fn read_element(element: &BytesStart<'_>, span: Span) -> Result<(String, Attributes), ParseError> {
    let name = String::from_utf8_lossy(element.local_name().as_ref()).into_owned();
    let mut attributes = Attributes::default();
    for attribute in element.attributes() {
        let attribute = attribute.map_err(|err| malformed(err, span.start(), span.end()))?;
        let key = String::from_utf8_lossy(attribute.key.local_name().as_ref()).into_owned();
        let value = attribute
            .unescape_value()
            .map_err(|err| malformed(err, span.start(), span.end()))?;
        attributes.push(key, value.into_owned());
    }
    Ok((name, attributes))
}

/// Advance `position` past whitespace that trimmed text events swallowed.
fn skip_whitespace(source: &str, position: usize) -> usize {
    let rest = source.get(position..).unwrap_or_default();
    position + (rest.len() - rest.trim_start().len())
}

fn malformed(err: impl Display, start: usize, end: usize) -> ParseError {
    Diagnostic::malformed_xml(err, Span::new(start..end)).into()
}

#[derive(Debug, Default)]
struct Scanner {
    document: RawDocument,
    depth: usize,
    process: Option<(usize, RawProcess)>,
    node: Option<RawNode>,
    flow: Option<RawFlow>,
    lanes: Vec<RawLane>,
    capture: Option<(Capture, Span, String)>,
}

impl Scanner {
    fn open(&mut self, name: &str, attributes: Attributes, span: Span) {
        let Some(process_depth) = self.process_depth() else {
            if name == "process" {
                self.process = Some((
                    self.depth,
                    RawProcess {
                        span,
                        attributes,
                        ..RawProcess::default()
                    },
                ));
            }
            return;
        };
        let child_of_process = self.depth == process_depth + 1;

        if child_of_process && FLOW_NODE_TAGS.contains(&name) {
            self.node = Some(RawNode {
                tag: name.to_string(),
                span,
                attributes,
                outgoing: Vec::new(),
            });
        } else if child_of_process && name == "sequenceFlow" {
            self.flow = Some(RawFlow {
                span,
                attributes,
                condition: None,
            });
        } else if name == "lane" {
            self.lanes.push(RawLane {
                span,
                attributes,
                refs: Vec::new(),
            });
        } else if name == "outgoing" && self.depth == process_depth + 2 && self.node.is_some() {
            self.capture = Some((Capture::Outgoing, span, String::new()));
        } else if name == "conditionExpression" && self.flow.is_some() {
            self.capture = Some((Capture::Condition, span, String::new()));
        } else if name == "flowNodeRef" && !self.lanes.is_empty() {
            self.capture = Some((Capture::FlowNodeRef, span, String::new()));
        }
    }

    fn text(&mut self, text: &str) {
        if let Some((_, _, buffer)) = &mut self.capture {
            buffer.push_str(text);
        }
    }

    fn close(&mut self, name: &str, span: Span) {
        if self
            .capture
            .as_ref()
            .is_some_and(|(capture, _, _)| capture.tag() == name)
        {
            self.finish_capture(span);
            return;
        }

        let Some(process_depth) = self.process_depth() else {
            return;
        };

        if name == "process" && self.depth == process_depth {
            if let Some((_, process)) = self.process.take() {
                self.document.processes.push(process);
            }
            return;
        }

        let child_of_process = self.depth == process_depth + 1;
        let Some((_, process)) = &mut self.process else {
            return;
        };

        if child_of_process && self.node.as_ref().is_some_and(|node| node.tag == name) {
            if let Some(node) = self.node.take() {
                process.nodes.push(node);
            }
        } else if child_of_process && name == "sequenceFlow" {
            if let Some(flow) = self.flow.take() {
                process.flows.push(flow);
            }
        } else if name == "lane" {
            if let Some(lane) = self.lanes.pop() {
                process.lanes.push(lane);
            }
        }
    }

    fn process_depth(&self) -> Option<usize> {
        self.process.as_ref().map(|(depth, _)| *depth)
    }

    fn finish_capture(&mut self, end: Span) {
        let Some((capture, start, buffer)) = self.capture.take() else {
            return;
        };
        let value = buffer.trim().to_string();
        let span = start.union(end);

        match capture {
            Capture::Outgoing => {
                if let (Some(node), false) = (&mut self.node, value.is_empty()) {
                    node.outgoing.push(Spanned::new(value, span));
                }
            }
            Capture::Condition => {
                if let (Some(flow), false) = (&mut self.flow, value.is_empty()) {
                    flow.condition = Some(value);
                }
            }
            Capture::FlowNodeRef => {
                if let (Some(lane), false) = (self.lanes.last_mut(), value.is_empty()) {
                    lane.refs.push(Spanned::new(value, span));
                }
            }
        }
    }
}
