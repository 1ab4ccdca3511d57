/// Color map from the slide master.
///
/// The master's `clrMap` element aliases logical color names used on
/// slides ("bg1", "tx1") to concrete theme slots ("lt1", "dk1"). Masters
/// routinely swap these to build dark variants of a deck.
use quick_xml::Reader;
use quick_xml::events::Event;
use std::collections::HashMap;

/// Mapping from logical color names to theme scheme slots.
#[derive(Debug, Clone)]
pub struct ColorMap {
    map: HashMap<String, String>,
}

impl ColorMap {
    /// The mapping used when no master declares one.
    pub fn standard() -> Self {
        let mut map = HashMap::new();
        map.insert("bg1".to_string(), "lt1".to_string());
        map.insert("tx1".to_string(), "dk1".to_string());
        map.insert("bg2".to_string(), "lt2".to_string());
        map.insert("tx2".to_string(), "dk2".to_string());
        Self { map }
    }

    /// Read the `clrMap` element out of a slide master part.
    ///
    /// Returns the standard mapping when the element is absent or the XML
    /// cannot be read. Declared aliases override the standard ones; theme
    /// slot names used directly ("accent1") always pass through untouched.
    pub fn from_master_xml(xml: &[u8]) -> Self {
        let mut colormap = Self::standard();
        let mut reader = Reader::from_reader(xml);
        reader.config_mut().trim_text(true);

        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                    if e.local_name().as_ref() != b"clrMap" {
                        continue;
                    }
                    for attr in e.attributes().flatten() {
                        if let (Ok(key), Ok(value)) = (
                            std::str::from_utf8(attr.key.as_ref()),
                            std::str::from_utf8(&attr.value),
                        ) {
                            colormap.map.insert(key.to_string(), value.to_string());
                        }
                    }
                    break;
                },
                Ok(Event::Eof) => break,
                Err(_) => break,
                _ => {},
            }
        }

        colormap
    }

    /// Translate a logical color name to its theme slot.
    #[inline]
    pub fn translate<'a>(&'a self, name: &'a str) -> &'a str {
        self.map.get(name).map(String::as_str).unwrap_or(name)
    }
}

impl Default for ColorMap {
    fn default() -> Self {
        Self::standard()
    }
}
