//! Declarative bean definition scanning
//!
//! Scans XML entries whose document root is `<beans>` for direct `<bean>`
//! children. A bean is identified by its `id` attribute, falling back to
//! `name`, then to `class`; a bean with none of the three is anonymous and
//! not reportable.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use thiserror::Error;
use tracing::{debug, warn};

use crate::model::Resource;

/// Decoding failure for a single XML entry; logged and skipped by the
/// extractor.
#[derive(Debug, Error)]
pub enum BeanScanError {
    #[error("malformed XML: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("malformed attribute: {0}")]
    Attr(#[from] quick_xml::events::attributes::AttrError),
}

/// Scan one XML entry for bean definitions.
///
/// Returns an empty list when the document root is not `beans`. The
/// resource `defining_object` is `<entry name>@<containing artifact>`.
pub fn scan_beans(
    data: &[u8],
    entry_name: &str,
    containing_artifact: &str,
) -> Result<Vec<Resource>, BeanScanError> {
    let mut reader = Reader::from_reader(data);
    reader.config_mut().trim_text(true);

    let defining_object = format!("{entry_name}@{containing_artifact}");
    let mut beans = Vec::new();
    let mut depth = 0usize;
    let mut saw_root = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                if depth == 0 {
                    if e.name().as_ref() != b"beans" {
                        return Ok(Vec::new());
                    }
                    saw_root = true;
                } else if depth == 1 && e.name().as_ref() == b"bean" {
                    extend_with_bean(&e, entry_name, &defining_object, &mut beans)?;
                }
                depth += 1;
            }
            Event::Empty(e) => {
                if depth == 0 {
                    // self-closing root, nothing to scan
                    return Ok(Vec::new());
                }
                if depth == 1 && e.name().as_ref() == b"bean" {
                    extend_with_bean(&e, entry_name, &defining_object, &mut beans)?;
                }
            }
            Event::End(_) => depth = depth.saturating_sub(1),
            Event::Eof => break,
            _ => {}
        }
        if depth == 0 && saw_root {
            break;
        }
    }

    Ok(beans)
}

fn extend_with_bean(
    element: &BytesStart<'_>,
    entry_name: &str,
    defining_object: &str,
    beans: &mut Vec<Resource>,
) -> Result<(), BeanScanError> {
    let mut id = None;
    let mut name = None;
    let mut class = None;

    for attr in element.attributes() {
        let attr = attr?;
        let value = attr.unescape_value()?.into_owned();
        match attr.key.as_ref() {
            b"id" => id = non_blank(value),
            b"name" => name = non_blank(value),
            b"class" => class = non_blank(value),
            _ => {}
        }
    }

    let bean_id = match (id, name, &class) {
        (Some(id), _, _) => id,
        (None, Some(name), _) => name,
        (None, None, Some(class)) => {
            warn!(
                entry = entry_name,
                class = class.as_str(),
                "anonymous bean, falling back to its class as the id"
            );
            class.clone()
        }
        (None, None, None) => {
            // No id, no name, no class: nothing reportable.
            warn!(entry = entry_name, "dropping anonymous bean definition");
            return Ok(());
        }
    };

    debug!(bean = bean_id.as_str(), defining_object, "found bean");
    beans.push(Resource::bean(bean_id, defining_object, class));
    Ok(())
}

fn non_blank(value: String) -> Option<String> {
    if value.trim().is_empty() { None } else { Some(value) }
}
