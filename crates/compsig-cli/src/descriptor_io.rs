//! Reading and writing descriptor files.

use compsig_schemas::ComponentDescriptor;
use std::io::{self, Read};

/// Reads a descriptor from `path`, or stdin if no path is given.
pub fn read_descriptor(path: Option<&str>) -> Result<ComponentDescriptor, Box<dyn std::error::Error>> {
    let json_str = if let Some(path) = path {
        std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read file {}: {}", path, e))?
    } else {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    };

    let descriptor = serde_json::from_str(&json_str)
        .map_err(|e| format!("Invalid component descriptor: {}", e))?;
    Ok(descriptor)
}

/// Writes `descriptor` as pretty JSON to `out`, or stdout if no path is given.
pub fn write_descriptor(
    descriptor: &ComponentDescriptor,
    out: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let json_str = serde_json::to_string_pretty(descriptor)?;
    match out {
        Some(path) => std::fs::write(path, json_str + "\n")
            .map_err(|e| format!("Failed to write file {}: {}", path, e))?,
        None => println!("{}", json_str),
    }
    Ok(())
}
