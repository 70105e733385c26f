mod codegen;
mod emit;
mod schema;
mod validate;

use std::path::Path;

use anyhow::{anyhow, Result};
use matrixgen::document::BuildDocument;
use matrixgen::pipeline::{run_build, BuildReport};

pub use codegen::codegen;
pub use emit::emit;
pub use schema::schema;
pub use validate::validate;

/// Load a build document and run every display through the pipeline
///
/// Fails when any display is rejected, so nothing is printed for a build
/// that cannot be compiled.
fn run_checked(config: &Path) -> Result<BuildReport> {
    let document = BuildDocument::load(config)?;
    let report = run_build(&document)?;
    if !report.is_success() {
        let rejected = report.rejected().count();
        return Err(anyhow!(
            "{} of {} display(s) in {} failed validation:\n{}",
            rejected,
            report.instances.len(),
            config.display(),
            report.format_errors()
        ));
    }
    Ok(report)
}
