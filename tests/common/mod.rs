//! Shared fixture builders for integration tests
//!
//! Builds real zip-based archives (amp, war) with hand-assembled class-file
//! bytes, plus pre-baked baseline inventory reports in the store JSON
//! schema.

#![allow(dead_code)]

use std::io::{Cursor, Write};
use std::path::Path;

use zip::ZipWriter;
use zip::write::SimpleFileOptions;

const SUPER_CLASS: &str = "java/lang/Object";

/// Assemble the smallest structurally valid class file: `this_class`
/// referencing `refs` through constant-pool class entries.
pub fn class_bytes(this_class: &str, refs: &[&str]) -> Vec<u8> {
    let mut entries: Vec<Vec<u8>> = Vec::new();

    let mut utf8 = |entries: &mut Vec<Vec<u8>>, s: &str| -> u16 {
        let mut entry = vec![1u8];
        entry.extend_from_slice(&(s.len() as u16).to_be_bytes());
        entry.extend_from_slice(s.as_bytes());
        entries.push(entry);
        entries.len() as u16
    };
    let mut class = |entries: &mut Vec<Vec<u8>>, name: &str| -> u16 {
        let name_index = utf8(entries, name);
        let mut entry = vec![7u8];
        entry.extend_from_slice(&name_index.to_be_bytes());
        entries.push(entry);
        entries.len() as u16
    };

    let this_index = class(&mut entries, this_class);
    let super_index = class(&mut entries, SUPER_CLASS);
    for r in refs {
        class(&mut entries, r);
    }

    let mut out = Vec::new();
    out.extend_from_slice(&0xCAFE_BABEu32.to_be_bytes());
    out.extend_from_slice(&0u16.to_be_bytes()); // minor
    out.extend_from_slice(&52u16.to_be_bytes()); // major (Java 8)
    out.extend_from_slice(&((entries.len() + 1) as u16).to_be_bytes());
    for entry in &entries {
        out.extend_from_slice(entry);
    }
    out.extend_from_slice(&0x0021u16.to_be_bytes()); // ACC_PUBLIC | ACC_SUPER
    out.extend_from_slice(&this_index.to_be_bytes());
    out.extend_from_slice(&super_index.to_be_bytes());
    out.extend_from_slice(&0u16.to_be_bytes()); // interfaces
    out.extend_from_slice(&0u16.to_be_bytes()); // fields
    out.extend_from_slice(&0u16.to_be_bytes()); // methods
    out.extend_from_slice(&0u16.to_be_bytes()); // attributes
    out
}

/// Build zip bytes in memory from (entry name, content) pairs.
pub fn zip_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = ZipWriter::new(&mut cursor);
        for (name, content) in entries {
            writer
                .start_file(*name, SimpleFileOptions::default())
                .unwrap();
            writer.write_all(content).unwrap();
        }
        writer.finish().unwrap();
    }
    cursor.into_inner()
}

/// Write a zip-based archive fixture to disk.
pub fn write_archive(path: &Path, entries: &[(&str, &[u8])]) {
    std::fs::write(path, zip_bytes(entries)).unwrap();
}

/// A bean-definitions XML document with the given bean ids.
pub fn beans_xml(ids: &[&str]) -> Vec<u8> {
    let mut xml = String::from("<?xml version=\"1.0\"?>\n<beans>\n");
    for id in ids {
        xml.push_str(&format!(
            "    <bean id=\"{id}\" class=\"com.example.{id}\"/>\n"
        ));
    }
    xml.push_str("</beans>\n");
    xml.into_bytes()
}

/// Write a version-tagged baseline inventory report into a store directory.
pub fn write_store_report(store: &Path, version: &str, report: serde_json::Value) {
    let mut report = report;
    report["version"] = serde_json::Value::String(version.to_string());
    std::fs::write(
        store.join(format!("{version}.json")),
        serde_json::to_string_pretty(&report).unwrap(),
    )
    .unwrap();
}

/// A baseline report with the usual suspects: one bean, a couple of
/// classpath elements, and one installed file.
pub fn baseline_report(beans: &[&str], classpath: &[&str], files: &[&str]) -> serde_json::Value {
    let beans: Vec<serde_json::Value> = beans
        .iter()
        .map(|id| {
            serde_json::json!({
                "type": "bean",
                "id": id,
                "definingObject": "core-context.xml@/platform.war",
            })
        })
        .collect();
    let classpath: Vec<serde_json::Value> = classpath
        .iter()
        .map(|id| {
            serde_json::json!({
                "type": "classpathElement",
                "id": id,
                "definingObject": "/WEB-INF/lib/core.jar",
            })
        })
        .collect();
    let files: Vec<serde_json::Value> = files
        .iter()
        .map(|id| {
            serde_json::json!({
                "type": "file",
                "id": id,
                "definingObject": "/platform.war",
            })
        })
        .collect();

    serde_json::json!({
        "resources": {
            "bean": beans,
            "classpathElement": classpath,
            "file": files,
        }
    })
}
