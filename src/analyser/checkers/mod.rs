//! The six conflict checkers

mod bean_overwrite;
mod bean_restricted_class;
mod classpath_element;
mod file_overwrite;
mod usage;

pub use bean_overwrite::BeanOverwriteChecker;
pub use bean_restricted_class::BeanRestrictedClassChecker;
pub use classpath_element::ClasspathElementChecker;
pub use file_overwrite::FileOverwriteChecker;
pub use usage::{CustomCodeUsageChecker, ThirdPartyLibraryUsageChecker};
