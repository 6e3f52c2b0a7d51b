//! List-versions command implementation

use crate::analyser::{DirInventoryStore, TargetInventoryStore};
use crate::cli::ListVersionsArgs;
use crate::error::Result;

/// Run list-versions command
pub fn run(args: ListVersionsArgs) -> Result<()> {
    let store = DirInventoryStore::open(&args.store)?;

    if store.known_versions().is_empty() {
        println!("No baseline inventories found in the store.");
        return Ok(());
    }

    for version in store.known_versions() {
        println!("{version}");
    }
    Ok(())
}
