use anyhow::Result;
use serde_json::json;

use crate::argsets::ConfigArgs;

pub fn emit(args: ConfigArgs) -> Result<()> {
    let report = super::run_checked(&args.config)?;
    let emitted: Vec<_> = report
        .emitted()
        .map(|instance| {
            json!({
                "platform": instance.variant.platform(),
                "operations": instance.operations,
            })
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&emitted)?);
    Ok(())
}
