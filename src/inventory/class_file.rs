//! Minimal Java class-file reader
//!
//! This is not a bytecode verifier or disassembler. It decodes just enough
//! of the class-file format to answer two questions: which other classes
//! does this class reference, and which class-level marker annotations does
//! it carry. Method bodies are never decoded.
//!
//! References are collected from `CONSTANT_Class` entries and from the class
//! names embedded in field/method descriptors (`L...;`) referenced through
//! `CONSTANT_NameAndType`. Array types are unwrapped to their element class.

use std::collections::BTreeSet;

use thiserror::Error;

const MAGIC: u32 = 0xCAFE_BABE;

const TAG_UTF8: u8 = 1;
const TAG_INTEGER: u8 = 3;
const TAG_FLOAT: u8 = 4;
const TAG_LONG: u8 = 5;
const TAG_DOUBLE: u8 = 6;
const TAG_CLASS: u8 = 7;
const TAG_STRING: u8 = 8;
const TAG_FIELDREF: u8 = 9;
const TAG_METHODREF: u8 = 10;
const TAG_INTERFACE_METHODREF: u8 = 11;
const TAG_NAME_AND_TYPE: u8 = 12;
const TAG_METHOD_HANDLE: u8 = 15;
const TAG_METHOD_TYPE: u8 = 16;
const TAG_DYNAMIC: u8 = 17;
const TAG_INVOKE_DYNAMIC: u8 = 18;
const TAG_MODULE: u8 = 19;
const TAG_PACKAGE: u8 = 20;

const DEPRECATED_ANNOTATION: &str = "Ljava/lang/Deprecated;";

/// Decoding failure for a single class file. Never fatal to an extraction
/// run: the caller logs and skips the entry.
#[derive(Debug, Error)]
pub enum ClassParseError {
    #[error("truncated class file")]
    Truncated,
    #[error("bad class file magic")]
    BadMagic,
    #[error("unknown constant pool tag {0}")]
    UnknownTag(u8),
    #[error("constant pool index {0} out of range")]
    BadIndex(u16),
    #[error("malformed modified-UTF-8 constant")]
    BadUtf8,
}

/// What the reader extracts from one class file.
#[derive(Debug, Clone)]
pub struct ClassSummary {
    /// Binary name of the class itself, e.g. `com/example/Foo`.
    pub binary_name: String,
    /// Binary names of every other class this one references.
    pub referenced_classes: BTreeSet<String>,
    /// Descriptors of class-level annotations, e.g. `Lcom/acme/PublicApi;`.
    pub annotations: Vec<String>,
    /// Deprecation marker: `@java.lang.Deprecated` or the legacy
    /// `Deprecated` attribute.
    pub deprecated: bool,
}

impl ClassSummary {
    pub fn has_annotation(&self, descriptor: &str) -> bool {
        self.annotations.iter().any(|a| a == descriptor)
    }
}

enum PoolEntry {
    Utf8(String),
    Class { name_index: u16 },
    NameAndType { descriptor_index: u16 },
    Other,
}

struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Reader { data, pos: 0 }
    }

    fn bytes(&mut self, n: usize) -> Result<&'a [u8], ClassParseError> {
        let end = self.pos.checked_add(n).ok_or(ClassParseError::Truncated)?;
        if end > self.data.len() {
            return Err(ClassParseError::Truncated);
        }
        let slice = &self.data[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn u8(&mut self) -> Result<u8, ClassParseError> {
        Ok(self.bytes(1)?[0])
    }

    fn u16(&mut self) -> Result<u16, ClassParseError> {
        let b = self.bytes(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    fn u32(&mut self) -> Result<u32, ClassParseError> {
        let b = self.bytes(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn skip(&mut self, n: usize) -> Result<(), ClassParseError> {
        self.bytes(n).map(|_| ())
    }
}

/// Decode the parts of a class file the checkers care about.
pub fn parse_class(data: &[u8]) -> Result<ClassSummary, ClassParseError> {
    let mut r = Reader::new(data);

    if r.u32()? != MAGIC {
        return Err(ClassParseError::BadMagic);
    }
    r.skip(4)?; // minor + major version

    let pool = read_constant_pool(&mut r)?;

    r.skip(2)?; // access flags
    let this_class = r.u16()?;
    r.skip(2)?; // super class

    let interface_count = r.u16()? as usize;
    r.skip(interface_count * 2)?;

    skip_members(&mut r)?; // fields
    skip_members(&mut r)?; // methods

    let binary_name = class_name(&pool, this_class)?.to_string();

    let mut referenced_classes = BTreeSet::new();
    for entry in &pool {
        match entry {
            PoolEntry::Class { name_index } => {
                if let Some(name) = descriptor_to_class(class_name(&pool, *name_index)?) {
                    referenced_classes.insert(name);
                }
            }
            PoolEntry::NameAndType { descriptor_index } => {
                collect_descriptor_classes(
                    utf8(&pool, *descriptor_index)?,
                    &mut referenced_classes,
                );
            }
            _ => {}
        }
    }
    referenced_classes.remove(&binary_name);

    let (annotations, deprecated_attr) = read_class_attributes(&mut r, &pool)?;
    let deprecated =
        deprecated_attr || annotations.iter().any(|a| a == DEPRECATED_ANNOTATION);

    Ok(ClassSummary {
        binary_name,
        referenced_classes,
        annotations,
        deprecated,
    })
}

fn read_constant_pool(r: &mut Reader<'_>) -> Result<Vec<PoolEntry>, ClassParseError> {
    let count = r.u16()? as usize;
    // Index 0 is unused; 8-byte constants occupy two slots.
    let mut pool: Vec<PoolEntry> = Vec::with_capacity(count);
    pool.push(PoolEntry::Other);

    while pool.len() < count {
        let tag = r.u8()?;
        let entry = match tag {
            TAG_UTF8 => {
                let len = r.u16()? as usize;
                let bytes = r.bytes(len)?;
                // Modified UTF-8 differs from UTF-8 only for NUL and
                // supplementary characters, neither of which occurs in class
                // or descriptor names we care about.
                let s = String::from_utf8(bytes.to_vec())
                    .map_err(|_| ClassParseError::BadUtf8)?;
                PoolEntry::Utf8(s)
            }
            TAG_CLASS => PoolEntry::Class {
                name_index: r.u16()?,
            },
            TAG_NAME_AND_TYPE => {
                r.skip(2)?; // name index
                PoolEntry::NameAndType {
                    descriptor_index: r.u16()?,
                }
            }
            TAG_INTEGER | TAG_FLOAT => {
                r.skip(4)?;
                PoolEntry::Other
            }
            TAG_LONG | TAG_DOUBLE => {
                r.skip(8)?;
                pool.push(PoolEntry::Other); // second slot
                PoolEntry::Other
            }
            TAG_STRING | TAG_METHOD_TYPE | TAG_MODULE | TAG_PACKAGE => {
                r.skip(2)?;
                PoolEntry::Other
            }
            TAG_FIELDREF | TAG_METHODREF | TAG_INTERFACE_METHODREF | TAG_DYNAMIC
            | TAG_INVOKE_DYNAMIC => {
                r.skip(4)?;
                PoolEntry::Other
            }
            TAG_METHOD_HANDLE => {
                r.skip(3)?;
                PoolEntry::Other
            }
            other => return Err(ClassParseError::UnknownTag(other)),
        };
        pool.push(entry);
    }

    Ok(pool)
}

fn skip_members(r: &mut Reader<'_>) -> Result<(), ClassParseError> {
    let count = r.u16()?;
    for _ in 0..count {
        r.skip(6)?; // access flags, name index, descriptor index
        skip_attributes(r)?;
    }
    Ok(())
}

fn skip_attributes(r: &mut Reader<'_>) -> Result<(), ClassParseError> {
    let count = r.u16()?;
    for _ in 0..count {
        r.skip(2)?; // name index
        let len = r.u32()? as usize;
        r.skip(len)?;
    }
    Ok(())
}

fn read_class_attributes(
    r: &mut Reader<'_>,
    pool: &[PoolEntry],
) -> Result<(Vec<String>, bool), ClassParseError> {
    let mut annotations = Vec::new();
    let mut deprecated = false;

    let count = r.u16()?;
    for _ in 0..count {
        let name_index = r.u16()?;
        let len = r.u32()? as usize;
        match utf8(pool, name_index)? {
            "RuntimeVisibleAnnotations" | "RuntimeInvisibleAnnotations" => {
                let data = r.bytes(len)?;
                read_annotations(data, pool, &mut annotations)?;
            }
            "Deprecated" => {
                deprecated = true;
                r.skip(len)?;
            }
            _ => r.skip(len)?,
        }
    }

    Ok((annotations, deprecated))
}

fn read_annotations(
    data: &[u8],
    pool: &[PoolEntry],
    out: &mut Vec<String>,
) -> Result<(), ClassParseError> {
    let mut r = Reader::new(data);
    let count = r.u16()?;
    for _ in 0..count {
        let type_index = skip_annotation(&mut r)?;
        out.push(utf8(pool, type_index)?.to_string());
    }
    Ok(())
}

/// Skip one `annotation` structure, returning its type descriptor index.
fn skip_annotation(r: &mut Reader<'_>) -> Result<u16, ClassParseError> {
    let type_index = r.u16()?;
    let pairs = r.u16()?;
    for _ in 0..pairs {
        r.skip(2)?; // element name index
        skip_element_value(r)?;
    }
    Ok(type_index)
}

fn skip_element_value(r: &mut Reader<'_>) -> Result<(), ClassParseError> {
    match r.u8()? {
        b'B' | b'C' | b'D' | b'F' | b'I' | b'J' | b'S' | b'Z' | b's' | b'c' => r.skip(2),
        b'e' => r.skip(4), // enum: type name + const name
        b'@' => skip_annotation(r).map(|_| ()),
        b'[' => {
            let n = r.u16()?;
            for _ in 0..n {
                skip_element_value(r)?;
            }
            Ok(())
        }
        _ => Err(ClassParseError::Truncated),
    }
}

fn utf8(pool: &[PoolEntry], index: u16) -> Result<&str, ClassParseError> {
    match pool.get(index as usize) {
        Some(PoolEntry::Utf8(s)) => Ok(s),
        _ => Err(ClassParseError::BadIndex(index)),
    }
}

fn class_name(pool: &[PoolEntry], class_index: u16) -> Result<&str, ClassParseError> {
    match pool.get(class_index as usize) {
        Some(PoolEntry::Class { name_index }) => utf8(pool, *name_index),
        _ => Err(ClassParseError::BadIndex(class_index)),
    }
}

/// Normalize a `CONSTANT_Class` name to a binary class name.
///
/// Class entries usually hold plain binary names (`com/example/Foo`), but
/// array classes appear in descriptor form (`[Lcom/example/Foo;`, `[[I`).
/// Primitive arrays have no class to report.
fn descriptor_to_class(name: &str) -> Option<String> {
    let element = name.trim_start_matches('[');
    if element.len() == name.len() {
        return Some(name.to_string());
    }
    element
        .strip_prefix('L')
        .and_then(|s| s.strip_suffix(';'))
        .map(ToString::to_string)
}

/// Pull every `L...;` class reference out of a field or method descriptor.
fn collect_descriptor_classes(descriptor: &str, out: &mut BTreeSet<String>) {
    let mut rest = descriptor;
    while let Some(start) = rest.find('L') {
        let Some(end) = rest[start..].find(';') else {
            return;
        };
        out.insert(rest[start + 1..start + end].to_string());
        rest = &rest[start + end + 1..];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::test_bytes::class_bytes;

    #[test]
    fn test_parses_name_and_references() {
        let data = class_bytes(
            "com/example/Foo",
            &["com/example/Bar", "org/acme/util/Baz"],
            &[],
            false,
        );
        let summary = parse_class(&data).unwrap();

        assert_eq!(summary.binary_name, "com/example/Foo");
        assert!(summary.referenced_classes.contains("com/example/Bar"));
        assert!(summary.referenced_classes.contains("org/acme/util/Baz"));
        // superclass is a reference too
        assert!(summary.referenced_classes.contains("java/lang/Object"));
        // never references itself
        assert!(!summary.referenced_classes.contains("com/example/Foo"));
        assert!(!summary.deprecated);
    }

    #[test]
    fn test_array_class_entry_unwraps_to_element() {
        let data = class_bytes("com/example/Foo", &["[Lcom/example/Elem;"], &[], false);
        let summary = parse_class(&data).unwrap();
        assert!(summary.referenced_classes.contains("com/example/Elem"));
        assert!(!summary.referenced_classes.iter().any(|c| c.starts_with('[')));
    }

    #[test]
    fn test_class_annotations_and_deprecation() {
        let data = class_bytes(
            "org/acme/Api",
            &[],
            &["Lorg/acme/api/PublicApi;", "Ljava/lang/Deprecated;"],
            false,
        );
        let summary = parse_class(&data).unwrap();
        assert!(summary.has_annotation("Lorg/acme/api/PublicApi;"));
        assert!(summary.deprecated);
    }

    #[test]
    fn test_legacy_deprecated_attribute() {
        let data = class_bytes("org/acme/Old", &[], &[], true);
        let summary = parse_class(&data).unwrap();
        assert!(summary.deprecated);
        assert!(summary.annotations.is_empty());
    }

    #[test]
    fn test_bad_magic_rejected() {
        let err = parse_class(&[0u8; 16]).unwrap_err();
        assert!(matches!(err, ClassParseError::BadMagic));
    }

    #[test]
    fn test_truncated_file_rejected() {
        let mut data = class_bytes("com/example/Foo", &[], &[], false);
        data.truncate(data.len() / 2);
        assert!(parse_class(&data).is_err());
    }

    #[test]
    fn test_descriptor_class_collection() {
        let mut out = BTreeSet::new();
        collect_descriptor_classes(
            "(Lcom/example/A;ILjava/util/List;)Lcom/example/B;",
            &mut out,
        );
        assert_eq!(
            out.into_iter().collect::<Vec<_>>(),
            vec!["com/example/A", "com/example/B", "java/util/List"]
        );
    }
}
