use std::collections::{HashMap, HashSet};
use std::fs;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str;

use log::info;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use xz::bufread::XzDecoder;

use crate::data::{ElementKind, RawTag, SourceElement};
use crate::errors::{Error, Result};

pub const DEFAULT_KINDS: [ElementKind; 2] = [ElementKind::Point, ElementKind::Way];

enum ParserState {
    Top,
    /// Collecting children of an element that was opened at `depth`.
    Element { element: SourceElement, depth: usize },
}

/// Forward-only stream of the completed elements of an .osm document.
///
/// Only the element under construction is kept in memory. The event buffer is
/// cleared after every event, so memory stays bounded by the largest single
/// element rather than by the size of the file.
pub struct OsmElements<R: BufRead> {
    reader: Reader<R>,
    buf: Vec<u8>,
    kinds: HashSet<ElementKind>,
    state: ParserState,
    depth: usize,
    seen_root: bool,
    root_closed: bool,
    finished: bool,
}

/// Opens an .osm file, decompressing it on the fly when it ends in `.xz`.
pub fn open_osm_reader(path: &Path) -> Result<OsmElements<Box<dyn BufRead + Send>>> {
    let file = fs::File::open(path)?;
    let file_reader = BufReader::new(file);
    let source: Box<dyn BufRead + Send> = match path.extension().and_then(|ext| ext.to_str()) {
        Some("xz") => {
            let display = path.display().to_string();
            info!(path = display.as_str(); "Reading xz compressed input");
            Box::new(BufReader::new(XzDecoder::new(file_reader)))
        }
        _ => Box::new(file_reader),
    };
    Ok(OsmElements::new(source))
}

impl<R: BufRead> OsmElements<R> {
    pub fn new(source: R) -> OsmElements<R> {
        OsmElements::with_kinds(source, DEFAULT_KINDS)
    }

    pub fn with_kinds(source: R, kinds: impl IntoIterator<Item = ElementKind>) -> OsmElements<R> {
        let mut reader = Reader::from_reader(source);
        reader.trim_text(true);

        OsmElements {
            reader,
            buf: Vec::new(),
            kinds: kinds.into_iter().collect(),
            state: ParserState::Top,
            depth: 0,
            seen_root: false,
            root_closed: false,
            finished: false,
        }
    }

    /// Number of elements currently held in memory, either 0 or 1.
    pub fn in_progress(&self) -> usize {
        match self.state {
            ParserState::Top => 0,
            ParserState::Element { .. } => 1,
        }
    }

    #[cfg(test)]
    fn buffer_capacity(&self) -> usize {
        self.buf.capacity()
    }

    fn read_attributes(el: &BytesStart) -> Result<HashMap<String, String>> {
        let mut attributes = HashMap::new();
        for attribute_res in el.attributes() {
            let attribute = attribute_res?;
            let key = str::from_utf8(attribute.key.as_ref())?;
            let value = attribute.unescape_value()?;
            attributes.insert(key.to_string(), value.into_owned());
        }
        Ok(attributes)
    }

    fn take_attribute(
        attributes: &mut HashMap<String, String>,
        element: &str,
        name: &str,
    ) -> Result<String> {
        attributes
            .remove(name)
            .ok_or_else(|| Error::missing_attribute(element, name))
    }

    /// Records a child of the element being collected.
    fn add_child(element: &mut SourceElement, el: &BytesStart) -> Result<()> {
        match el.name().as_ref() {
            b"tag" => {
                let mut attributes = Self::read_attributes(el)?;
                let key = Self::take_attribute(&mut attributes, "tag", "k")?;
                let value = Self::take_attribute(&mut attributes, "tag", "v")?;
                element.tags.push(RawTag { key, value });
            }
            b"nd" if element.kind == ElementKind::Way => {
                let mut attributes = Self::read_attributes(el)?;
                element.refs.push(Self::take_attribute(&mut attributes, "nd", "ref")?);
            }
            _ => (),
        }
        Ok(())
    }

    /// Starts a new element if `el` is one of the wanted kinds.
    fn begin(kinds: &HashSet<ElementKind>, el: &BytesStart) -> Result<Option<SourceElement>> {
        let kind = ElementKind::from_name(el.name().as_ref());
        if kind == ElementKind::Other || !kinds.contains(&kind) {
            return Ok(None);
        }
        let mut element = SourceElement::new(kind);
        element.attributes = Self::read_attributes(el)?;
        Ok(Some(element))
    }

    /// A document has exactly one root element.
    fn check_single_root(root_closed: bool) -> Result<()> {
        if root_closed {
            return Err(Error::malformed("junk after document element"));
        }
        Ok(())
    }

    fn next_element(&mut self) -> Result<Option<SourceElement>> {
        loop {
            self.buf.clear();
            match self.reader.read_event_into(&mut self.buf)? {
                Event::Eof => {
                    if self.depth > 0 {
                        return Err(Error::malformed(format!(
                            "document ended with {} unclosed element(s)",
                            self.depth
                        )));
                    }
                    if !self.seen_root {
                        return Err(Error::malformed("no root element found"));
                    }
                    return Ok(None);
                }
                Event::Start(e) => {
                    Self::check_single_root(self.root_closed)?;
                    self.seen_root = true;
                    self.depth += 1;
                    match self.state {
                        ParserState::Element { ref mut element, .. } => Self::add_child(element, &e)?,
                        ParserState::Top => {
                            if let Some(element) = Self::begin(&self.kinds, &e)? {
                                self.state = ParserState::Element {
                                    element,
                                    depth: self.depth,
                                };
                            }
                        }
                    }
                }
                Event::Empty(e) => {
                    Self::check_single_root(self.root_closed)?;
                    self.seen_root = true;
                    self.root_closed = self.depth == 0;
                    match self.state {
                        ParserState::Element { ref mut element, .. } => Self::add_child(element, &e)?,
                        ParserState::Top => {
                            if let Some(element) = Self::begin(&self.kinds, &e)? {
                                return Ok(Some(element));
                            }
                        }
                    }
                }
                Event::End(_) => {
                    let closing = self.depth;
                    self.depth = self
                        .depth
                        .checked_sub(1)
                        .ok_or_else(|| Error::malformed("unexpected closing tag"))?;
                    self.root_closed = self.depth == 0;
                    if matches!(self.state, ParserState::Element { depth, .. } if depth == closing) {
                        if let ParserState::Element { element, .. } =
                            std::mem::replace(&mut self.state, ParserState::Top)
                        {
                            return Ok(Some(element));
                        }
                    }
                }
                // Whitespace-only text is already trimmed away by the reader.
                Event::Text(_) | Event::CData(_) if self.depth == 0 => {
                    return Err(Error::malformed("text outside the document element"));
                }
                // Declarations, comments, text and processing instructions carry no records.
                _ => (),
            }
        }
    }
}

impl<R: BufRead> Iterator for OsmElements<R> {
    type Item = Result<SourceElement>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.next_element() {
            Ok(Some(element)) => Some(Ok(element)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(err) => {
                self.finished = true;
                Some(Err(err))
            }
        }
    }
}
