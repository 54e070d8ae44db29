//! Version command implementation.

use crate::contract::DATABASE_VERSION;
use crate::error::Result;
use serde::Serialize;

#[derive(Serialize)]
struct VersionOutput {
    version: &'static str,
    schema_version: i32,
    build: &'static str,
}

/// Print the crate version and the schema version this build expects.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn execute(json: bool) -> Result<()> {
    let output = VersionOutput {
        version: env!("CARGO_PKG_VERSION"),
        schema_version: DATABASE_VERSION,
        build: if cfg!(debug_assertions) { "dev" } else { "release" },
    };

    if json {
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!(
            "inv version {} ({}, schema v{})",
            output.version, output.build, output.schema_version
        );
    }
    Ok(())
}
