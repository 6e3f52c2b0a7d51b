//! Hand-assembled class-file bytes for parser tests
//!
//! Builds the smallest structurally valid class file: a constant pool with
//! the requested class references and annotation descriptors, no fields, no
//! methods.

use std::collections::HashMap;

const SUPER_CLASS: &str = "java/lang/Object";

#[derive(Default)]
struct PoolBuilder {
    entries: Vec<Vec<u8>>,
    utf8_cache: HashMap<String, u16>,
}

impl PoolBuilder {
    fn utf8(&mut self, s: &str) -> u16 {
        if let Some(&idx) = self.utf8_cache.get(s) {
            return idx;
        }
        let mut entry = vec![1u8];
        entry.extend_from_slice(&(s.len() as u16).to_be_bytes());
        entry.extend_from_slice(s.as_bytes());
        self.entries.push(entry);
        let idx = self.entries.len() as u16;
        self.utf8_cache.insert(s.to_string(), idx);
        idx
    }

    fn class(&mut self, name: &str) -> u16 {
        let name_index = self.utf8(name);
        let mut entry = vec![7u8];
        entry.extend_from_slice(&name_index.to_be_bytes());
        self.entries.push(entry);
        self.entries.len() as u16
    }
}

/// Assemble class-file bytes for `this_class` referencing `refs`, carrying
/// the given class-level annotation descriptors and optionally the legacy
/// `Deprecated` attribute.
pub fn class_bytes(
    this_class: &str,
    refs: &[&str],
    annotations: &[&str],
    deprecated_attr: bool,
) -> Vec<u8> {
    let mut pool = PoolBuilder::default();

    let this_index = pool.class(this_class);
    let super_index = pool.class(SUPER_CLASS);
    for r in refs {
        pool.class(r);
    }

    let annotation_indices: Vec<u16> = annotations.iter().map(|a| pool.utf8(a)).collect();
    let rva_name = if annotations.is_empty() {
        0
    } else {
        pool.utf8("RuntimeVisibleAnnotations")
    };
    let deprecated_name = if deprecated_attr { pool.utf8("Deprecated") } else { 0 };

    let mut out = Vec::new();
    out.extend_from_slice(&0xCAFE_BABEu32.to_be_bytes());
    out.extend_from_slice(&0u16.to_be_bytes()); // minor
    out.extend_from_slice(&52u16.to_be_bytes()); // major (Java 8)

    out.extend_from_slice(&((pool.entries.len() + 1) as u16).to_be_bytes());
    for entry in &pool.entries {
        out.extend_from_slice(entry);
    }

    out.extend_from_slice(&0x0021u16.to_be_bytes()); // ACC_PUBLIC | ACC_SUPER
    out.extend_from_slice(&this_index.to_be_bytes());
    out.extend_from_slice(&super_index.to_be_bytes());
    out.extend_from_slice(&0u16.to_be_bytes()); // interfaces
    out.extend_from_slice(&0u16.to_be_bytes()); // fields
    out.extend_from_slice(&0u16.to_be_bytes()); // methods

    let mut attr_count = 0u16;
    if !annotations.is_empty() {
        attr_count += 1;
    }
    if deprecated_attr {
        attr_count += 1;
    }
    out.extend_from_slice(&attr_count.to_be_bytes());

    if !annotations.is_empty() {
        out.extend_from_slice(&rva_name.to_be_bytes());
        let len = 2 + 4 * annotation_indices.len() as u32;
        out.extend_from_slice(&len.to_be_bytes());
        out.extend_from_slice(&(annotation_indices.len() as u16).to_be_bytes());
        for idx in &annotation_indices {
            out.extend_from_slice(&idx.to_be_bytes());
            out.extend_from_slice(&0u16.to_be_bytes()); // no element-value pairs
        }
    }

    if deprecated_attr {
        out.extend_from_slice(&deprecated_name.to_be_bytes());
        out.extend_from_slice(&0u32.to_be_bytes());
    }

    out
}
