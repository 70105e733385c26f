use std::fs;

use anyhow::{Context, Result};

use crate::argsets::CodegenArgs;

pub fn codegen(args: CodegenArgs) -> Result<()> {
    let report = super::run_checked(&args.config)?;
    let code = report
        .emitted()
        .map(|instance| {
            format!(
                "// {}: {}\n{}\n",
                instance.variant.platform(),
                instance.operations[0].id(),
                instance.render()
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    match args.output {
        Some(path) => {
            fs::write(&path, &code)
                .with_context(|| format!("could not write {}", path.display()))?;
            log::info!("Wrote initialization code to {}", path.display());
        }
        None => print!("{code}"),
    }
    Ok(())
}
