//! CLI command implementations.

pub mod canon;
pub mod id;
pub mod verify;

use std::io::{self, Read};

/// Reads the raw input bytes from a file or stdin.
pub fn read_input(input: Option<String>) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    match input {
        Some(path) => std::fs::read(&path)
            .map_err(|e| format!("Failed to read file {}: {}", path, e).into()),
        None => {
            let mut buffer = Vec::new();
            io::stdin().read_to_end(&mut buffer)?;
            Ok(buffer)
        }
    }
}
