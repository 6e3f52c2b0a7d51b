//! Archive inventory extraction
//!
//! Turns a zip-based archive (extension .amp/.jar or baseline .war) into a
//! classified [`InventoryReport`] plus, for classpath elements, the
//! per-class outbound-dependency map two of the checkers consume.
//!
//! Extraction never aborts on a single bad entry: malformed class files and
//! XML documents are logged and skipped, producing a partial inventory.

mod beans;
mod class_file;
#[cfg(test)]
pub(crate) mod test_bytes;

use std::collections::{BTreeSet, HashMap};
use std::fs::File;
use std::io::{Cursor, Read};
use std::path::Path;

use tracing::{debug, warn};
use zip::ZipArchive;

use crate::error::{ExtcheckError, Result, archive_open_failed};
use crate::model::{InventoryReport, Resource};

pub use class_file::parse_class;

/// Classpath entries under this prefix are addressed relative to it.
const WEB_INF_CLASSES: &str = "WEB-INF/classes/";

/// Subsystem-internal wiring is not extension-relevant; bean definitions
/// under this prefix are never scanned.
const SUBSYSTEMS_PREFIX: &str = "alfresco/subsystems/";

/// Per-class outbound dependencies, keyed by classpath-element id
/// (`/pkg/Name.class`). Keyed by id only: a class duplicated across
/// defining objects has one dependency set (duplicates are unioned).
pub type DependencyMap = HashMap<String, BTreeSet<String>>;

/// The archive flavors the extractor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    Amp,
    Jar,
    War,
}

impl ArchiveKind {
    pub fn from_path(path: &Path) -> Result<Self> {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("amp") => Ok(ArchiveKind::Amp),
            Some("jar") => Ok(ArchiveKind::Jar),
            Some("war") => Ok(ArchiveKind::War),
            _ => Err(ExtcheckError::UnsupportedArchiveType {
                path: path.display().to_string(),
            }),
        }
    }

    /// In extension archives every entry is a classpath element; in a war
    /// only `WEB-INF/classes/` (and nested jars) are on the classpath.
    fn whole_archive_on_classpath(self) -> bool {
        matches!(self, ArchiveKind::Amp | ArchiveKind::Jar)
    }
}

/// Extraction settings beyond the archive itself.
#[derive(Debug, Clone, Default)]
pub struct ExtractorConfig {
    /// Dotted package prefix of the platform's internal code, e.g.
    /// `org.acme`. Scopes the public-API annotation scan.
    pub internal_package_prefix: Option<String>,
    /// Dotted qualified name of the public-API marker annotation. The scan
    /// only runs when this is set.
    pub public_api_annotation: Option<String>,
    /// Version tag for baseline reports.
    pub version: Option<String>,
}

/// Everything extracted from one archive.
#[derive(Debug, Clone)]
pub struct ExtractedInventory {
    pub report: InventoryReport,
    pub dependencies: DependencyMap,
}

/// Extract the classified inventory of an archive on disk.
///
/// Fatal only when the archive itself cannot be opened; individual
/// undecodable entries are skipped with a warning.
pub fn extract_inventory(path: &Path, config: &ExtractorConfig) -> Result<ExtractedInventory> {
    let kind = ArchiveKind::from_path(path)?;
    let display_path = path.display().to_string();

    let file =
        File::open(path).map_err(|e| archive_open_failed(&display_path, e.to_string()))?;
    let mut archive =
        ZipArchive::new(file).map_err(|e| archive_open_failed(&display_path, e.to_string()))?;

    let archive_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(&display_path);
    let defining_object = leading_slash(archive_name);

    let mut extraction = Extraction::new(kind, config);
    for index in 0..archive.len() {
        let (name, data) = match read_entry(&mut archive, index) {
            Ok(Some(entry)) => entry,
            Ok(None) => continue, // directory
            Err(e) => {
                warn!(archive = display_path.as_str(), index, error = %e, "skipping unreadable archive entry");
                continue;
            }
        };
        extraction.process_entry(&name, &data, &defining_object, false);
    }

    Ok(extraction.finish())
}

fn read_entry<R: Read + std::io::Seek>(
    archive: &mut ZipArchive<R>,
    index: usize,
) -> std::result::Result<Option<(String, Vec<u8>)>, zip::result::ZipError> {
    let mut entry = archive.by_index(index)?;
    if entry.is_dir() {
        return Ok(None);
    }
    let name = entry.name().to_string();
    let mut data = Vec::with_capacity(entry_capacity_hint(entry.size()));
    entry.read_to_end(&mut data)?;
    Ok(Some((name, data)))
}

/// Initial buffer capacity for one entry. The declared size comes from the
/// zip header, which is untrusted input: a crafted entry must not be able to
/// force a huge allocation before any bytes are read.
fn entry_capacity_hint(declared_size: u64) -> usize {
    const MAX_PREALLOC: u64 = 1 << 20;
    usize::try_from(declared_size.min(MAX_PREALLOC)).unwrap_or(0)
}

struct Extraction {
    kind: ArchiveKind,
    public_api_annotation: Option<String>,
    internal_path_prefix: Option<String>,
    report: InventoryReport,
    dependencies: DependencyMap,
}

impl Extraction {
    fn new(kind: ArchiveKind, config: &ExtractorConfig) -> Self {
        Extraction {
            kind,
            public_api_annotation: config
                .public_api_annotation
                .as_deref()
                .map(annotation_descriptor),
            internal_path_prefix: config
                .internal_package_prefix
                .as_deref()
                .map(|p| format!("{}/", p.replace('.', "/"))),
            report: InventoryReport::new(config.version.clone()),
            dependencies: DependencyMap::new(),
        }
    }

    fn finish(self) -> ExtractedInventory {
        ExtractedInventory {
            report: self.report,
            dependencies: self.dependencies,
        }
    }

    /// Classify one entry; `in_jar` marks entries of an expanded nested jar.
    fn process_entry(&mut self, name: &str, data: &[u8], defining_object: &str, in_jar: bool) {
        if !in_jar && name.to_ascii_lowercase().ends_with(".jar") {
            self.expand_nested_jar(name, data);
            return;
        }

        if !in_jar {
            self.report
                .add(Resource::file(leading_slash(name), defining_object));
        }

        let on_classpath = in_jar
            || self.kind.whole_archive_on_classpath()
            || name.starts_with(WEB_INF_CLASSES);

        if on_classpath {
            let id = classpath_id(name);
            self.report
                .add(Resource::classpath_element(&id, defining_object));

            if name.to_ascii_lowercase().ends_with(".class") {
                self.process_class(&id, name, data, defining_object);
            }
        }

        if name.to_ascii_lowercase().ends_with(".xml") && !self.is_subsystem_entry(name, defining_object) {
            match beans::scan_beans(data, name, defining_object) {
                Ok(beans) => {
                    for bean in beans {
                        self.report.add(bean);
                    }
                }
                Err(e) => {
                    warn!(entry = name, error = %e, "skipping unparsable XML entry");
                }
            }
        }
    }

    fn process_class(&mut self, id: &str, name: &str, data: &[u8], defining_object: &str) {
        let summary = match parse_class(data) {
            Ok(summary) => summary,
            Err(e) => {
                warn!(entry = name, error = %e, "skipping unparsable class file");
                return;
            }
        };

        let refs: BTreeSet<String> = summary
            .referenced_classes
            .iter()
            .map(|c| format!("/{c}.class"))
            .collect();
        self.dependencies.entry(id.to_string()).or_default().extend(refs);

        if let Some(descriptor) = &self.public_api_annotation {
            let in_scope = self
                .internal_path_prefix
                .as_deref()
                .is_none_or(|prefix| summary.binary_name.starts_with(prefix));
            if in_scope && summary.has_annotation(descriptor) {
                let dotted = summary.binary_name.replace('/', ".");
                debug!(class = dotted.as_str(), deprecated = summary.deprecated, "public API class");
                self.report.add(Resource::public_api_class(
                    dotted,
                    defining_object,
                    summary.deprecated,
                ));
            }
        }
    }

    fn expand_nested_jar(&mut self, name: &str, data: &[u8]) {
        let jar_defining_object = leading_slash(name);
        let mut jar = match ZipArchive::new(Cursor::new(data)) {
            Ok(jar) => jar,
            Err(e) => {
                warn!(entry = name, error = %e, "skipping unreadable nested jar");
                return;
            }
        };

        for index in 0..jar.len() {
            match read_entry(&mut jar, index) {
                Ok(Some((inner_name, inner_data))) => {
                    self.process_entry(&inner_name, &inner_data, &jar_defining_object, true);
                }
                Ok(None) => {}
                Err(e) => {
                    warn!(jar = name, index, error = %e, "skipping unreadable nested jar entry");
                }
            }
        }
    }

    fn is_subsystem_entry(&self, name: &str, defining_object: &str) -> bool {
        name.starts_with(SUBSYSTEMS_PREFIX)
            || defining_object
                .trim_start_matches('/')
                .starts_with(SUBSYSTEMS_PREFIX)
    }
}

/// Classpath id of an archive entry: `WEB-INF/classes/` stripped, leading
/// `/` re-applied.
fn classpath_id(name: &str) -> String {
    let stripped = name.strip_prefix(WEB_INF_CLASSES).unwrap_or(name);
    leading_slash(stripped)
}

fn leading_slash(name: &str) -> String {
    if name.starts_with('/') {
        name.to_string()
    } else {
        format!("/{name}")
    }
}

/// `org.acme.api.PublicApi` -> `Lorg/acme/api/PublicApi;`
fn annotation_descriptor(dotted: &str) -> String {
    format!("L{};", dotted.replace('.', "/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::test_bytes::class_bytes;
    use crate::model::ResourceType;
    use std::io::Write;
    use zip::ZipWriter;
    use zip::write::SimpleFileOptions;

    fn build_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, data) in entries {
            writer
                .start_file(*name, SimpleFileOptions::default())
                .unwrap();
            writer.write_all(data).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    fn write_archive(dir: &tempfile::TempDir, name: &str, entries: &[(&str, &[u8])]) -> std::path::PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, build_zip(entries)).unwrap();
        path
    }

    fn extract(path: &Path) -> ExtractedInventory {
        extract_inventory(path, &ExtractorConfig::default()).unwrap()
    }

    #[test]
    fn test_extension_entries_are_files_and_classpath_elements() {
        let dir = tempfile::TempDir::new().unwrap();
        let class = class_bytes("com/example/A", &["com/example/B"], &[], false);
        let path = write_archive(
            &dir,
            "ext.amp",
            &[
                ("com/example/A.class", class.as_slice()),
                ("docs/readme.txt", b"hi"),
            ],
        );

        let extracted = extract(&path);
        let files = extracted.report.resources_of(ResourceType::File);
        let cpes = extracted.report.resources_of(ResourceType::ClasspathElement);

        assert_eq!(files.len(), 2);
        assert_eq!(cpes.len(), 2); // whole extension archive is on the classpath
        assert!(cpes.iter().any(|r| r.id() == "/com/example/A.class"
            && r.defining_object() == "/ext.amp"));

        let deps = &extracted.dependencies["/com/example/A.class"];
        assert!(deps.contains("/com/example/B.class"));
        assert!(deps.contains("/java/lang/Object.class"));
    }

    #[test]
    fn test_war_classpath_is_web_inf_classes_only() {
        let dir = tempfile::TempDir::new().unwrap();
        let class = class_bytes("org/acme/Svc", &[], &[], false);
        let path = write_archive(
            &dir,
            "platform.war",
            &[
                ("WEB-INF/classes/org/acme/Svc.class", class.as_slice()),
                ("index.jsp", b"<html/>"),
            ],
        );

        let extracted = extract(&path);
        let cpes = extracted.report.resources_of(ResourceType::ClasspathElement);
        assert_eq!(cpes.len(), 1);
        // WEB-INF/classes/ prefix is stripped from the id
        assert_eq!(cpes[0].id(), "/org/acme/Svc.class");
        assert_eq!(extracted.report.resources_of(ResourceType::File).len(), 2);
    }

    #[test]
    fn test_nested_jar_is_expanded_not_listed() {
        let dir = tempfile::TempDir::new().unwrap();
        let class = class_bytes("org/lib/Util", &[], &[], false);
        let inner = build_zip(&[("org/lib/Util.class", class.as_slice())]);
        let path = write_archive(
            &dir,
            "platform.war",
            &[("WEB-INF/lib/util-1.0.jar", inner.as_slice())],
        );

        let extracted = extract(&path);
        // the jar itself yields no File resource
        assert!(extracted.report.resources_of(ResourceType::File).is_empty());

        let cpes = extracted.report.resources_of(ResourceType::ClasspathElement);
        assert_eq!(cpes.len(), 1);
        assert_eq!(cpes[0].id(), "/org/lib/Util.class");
        assert_eq!(cpes[0].defining_object(), "/WEB-INF/lib/util-1.0.jar");
    }

    #[test]
    fn test_beans_scanned_and_subsystems_skipped() {
        let dir = tempfile::TempDir::new().unwrap();
        let xml = br#"<beans><bean id="svc" class="org.acme.Svc"/></beans>"#;
        let path = write_archive(
            &dir,
            "ext.amp",
            &[
                ("config/module-ctx.xml", xml.as_slice()),
                ("alfresco/subsystems/x/ctx.xml", xml.as_slice()),
            ],
        );

        let extracted = extract(&path);
        let beans = extracted.report.resources_of(ResourceType::Bean);
        assert_eq!(beans.len(), 1);
        assert_eq!(beans[0].id(), "svc");
        assert_eq!(beans[0].defining_object(), "config/module-ctx.xml@/ext.amp");
    }

    #[test]
    fn test_public_api_scan_requires_annotation_config() {
        let dir = tempfile::TempDir::new().unwrap();
        let api = class_bytes("org/acme/Api", &[], &["Lorg/acme/api/PublicApi;"], false);
        let old = class_bytes(
            "org/acme/OldApi",
            &[],
            &["Lorg/acme/api/PublicApi;", "Ljava/lang/Deprecated;"],
            false,
        );
        let other = class_bytes("com/other/Api", &[], &["Lorg/acme/api/PublicApi;"], false);
        let path = write_archive(
            &dir,
            "platform.war",
            &[
                ("WEB-INF/classes/org/acme/Api.class", api.as_slice()),
                ("WEB-INF/classes/org/acme/OldApi.class", old.as_slice()),
                ("WEB-INF/classes/com/other/Api.class", other.as_slice()),
            ],
        );

        let plain = extract(&path);
        assert!(plain.report.resources_of(ResourceType::PublicApiClass).is_empty());

        let config = ExtractorConfig {
            internal_package_prefix: Some("org.acme".to_string()),
            public_api_annotation: Some("org.acme.api.PublicApi".to_string()),
            version: Some("6.0.0".to_string()),
        };
        let scanned = extract_inventory(&path, &config).unwrap();
        let api_classes = scanned.report.resources_of(ResourceType::PublicApiClass);
        // com.other.Api is outside the internal prefix
        assert_eq!(api_classes.len(), 2);
        assert!(api_classes
            .iter()
            .any(|r| r.id() == "org.acme.Api"));
        let deprecated = api_classes
            .iter()
            .find(|r| r.id() == "org.acme.OldApi")
            .unwrap();
        assert!(matches!(
            deprecated,
            Resource::PublicApiClass { deprecated: true, .. }
        ));
        assert_eq!(scanned.report.version.as_deref(), Some("6.0.0"));
    }

    #[test]
    fn test_corrupt_class_entry_is_partial_not_fatal() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_archive(
            &dir,
            "ext.amp",
            &[("com/example/Broken.class", b"\x00\x01garbage".as_slice())],
        );

        let extracted = extract(&path);
        // still classified, just no dependency data
        assert_eq!(
            extracted.report.resources_of(ResourceType::ClasspathElement).len(),
            1
        );
        assert!(extracted.dependencies.is_empty());
    }

    #[test]
    fn test_entry_capacity_hint_is_capped() {
        assert_eq!(entry_capacity_hint(0), 0);
        assert_eq!(entry_capacity_hint(4096), 4096);
        // A lying size header cannot drive the pre-allocation.
        assert_eq!(entry_capacity_hint(u64::MAX), 1 << 20);
    }

    #[test]
    fn test_unsupported_archive_type_is_fatal() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("ext.tar");
        std::fs::write(&path, b"whatever").unwrap();
        assert!(matches!(
            extract_inventory(&path, &ExtractorConfig::default()).unwrap_err(),
            ExtcheckError::UnsupportedArchiveType { .. }
        ));
    }
}
