use std::fs;
use std::io::Read;
use std::path::Path;

use crate::error::Result;
use crate::resolver::InMemoryResolver;

/// Read a decklist from a text file
pub fn read_decklist<P: AsRef<Path>>(path: P) -> Result<String> {
    Ok(fs::read_to_string(path)?)
}

/// Read a decklist from any reader (stdin for the CLI)
pub fn read_decklist_from<R: Read>(mut reader: R) -> Result<String> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    Ok(text)
}

/// Load an offline print fixture: `{ "<card name>": [PrintRecord, ...] }`
pub fn load_prints_file<P: AsRef<Path>>(path: P) -> Result<InMemoryResolver> {
    let content = fs::read_to_string(path.as_ref())?;
    let resolver: InMemoryResolver = serde_json::from_str(&content)?;
    log::info!(
        "Loaded printings for {} cards from {}",
        resolver.len(),
        path.as_ref().display()
    );
    Ok(resolver)
}
