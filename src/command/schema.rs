use anyhow::{anyhow, Result};
use itertools::Itertools;
use matrixgen::helpers::suggest;
use matrixgen::variant::Variant;

use crate::argsets::SchemaArgs;

pub fn schema(args: SchemaArgs) -> Result<()> {
    let variant = Variant::from_platform(&args.platform).ok_or_else(|| {
        let suggestions = suggest(&args.platform, Variant::platforms());
        anyhow!(
            "Unknown platform '{}'; known platforms: {}{}",
            args.platform,
            Variant::platforms().join(", "),
            if suggestions.is_empty() {
                String::new()
            } else {
                format!(" (did you mean '{}'?)", suggestions[0])
            }
        )
    })?;
    println!("{}", serde_json::to_string_pretty(variant.schema())?);
    Ok(())
}
