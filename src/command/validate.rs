use anyhow::Result;
use serde_json::json;

use crate::argsets::ConfigArgs;

pub fn validate(args: ConfigArgs) -> Result<()> {
    let report = super::run_checked(&args.config)?;
    let normalized: Vec<_> = report
        .emitted()
        .map(|instance| {
            json!({
                "platform": instance.variant.platform(),
                "config": instance.config,
            })
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&normalized)?);
    log::info!("{} is valid", args.config.display());
    Ok(())
}
