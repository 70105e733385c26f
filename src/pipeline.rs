//! Per-build orchestration
//!
//! Every configured instance runs through validate and emit on its own. A
//! rejected instance never stops the others; identifiers must be unique
//! across the whole build, and must not clash with the buses displays use.

use std::collections::HashSet;

use serde::Serialize;

use crate::constants::keys;
use crate::document::{BuildDocument, InstanceDocument};
use crate::emit::{emit, render, EmitError, EmittedOperation};
use crate::helpers::suggest;
use crate::validate::{validate, Identifier, NormalizedDocument, ValidationError, ValidationErrors};
use crate::variant::Variant;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EmittedInstance {
    pub variant: Variant,
    pub config: NormalizedDocument,
    pub operations: Vec<EmittedOperation>,
}

impl EmittedInstance {
    pub fn render(&self) -> String {
        render::render(&self.operations)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum InstanceOutcome {
    Emitted(EmittedInstance),
    Rejected(ValidationErrors),
}

#[derive(Clone, Debug, PartialEq)]
pub struct InstanceReport {
    /// Position in the build document's display list
    pub index: usize,
    /// Absent when the entry was too malformed to name one
    pub platform: Option<String>,
    pub outcome: InstanceOutcome,
}

impl InstanceReport {
    /// Human-readable label: the identifier when there is one
    pub fn label(&self) -> String {
        match (&self.outcome, &self.platform) {
            (InstanceOutcome::Emitted(instance), _) => instance.operations[0].id().to_string(),
            (InstanceOutcome::Rejected(_), Some(platform)) => {
                format!("display #{} ({platform})", self.index + 1)
            }
            (InstanceOutcome::Rejected(_), None) => format!("display #{}", self.index + 1),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct BuildReport {
    pub instances: Vec<InstanceReport>,
}

impl BuildReport {
    pub fn emitted(&self) -> impl Iterator<Item = &EmittedInstance> {
        self.instances.iter().filter_map(|r| match &r.outcome {
            InstanceOutcome::Emitted(instance) => Some(instance),
            InstanceOutcome::Rejected(_) => None,
        })
    }

    pub fn rejected(&self) -> impl Iterator<Item = (&InstanceReport, &ValidationErrors)> {
        self.instances.iter().filter_map(|r| match &r.outcome {
            InstanceOutcome::Rejected(errors) => Some((r, errors)),
            InstanceOutcome::Emitted(_) => None,
        })
    }

    pub fn is_success(&self) -> bool {
        self.rejected().next().is_none()
    }

    /// Every rejected instance with its errors
    pub fn format_errors(&self) -> String {
        self.rejected()
            .map(|(report, errors)| format!("{}:\n{errors}", report.label()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Names already taken in one build
///
/// Display identifiers and the I2C buses they reference share one C++
/// namespace.
#[derive(Debug, Default)]
struct Namespace {
    displays: HashSet<String>,
    buses: HashSet<String>,
}

impl Namespace {
    /// Claim a display's identifier and note its bus, or report why not
    fn claim(&mut self, id: &Identifier, bus: &Identifier) -> Result<(), ValidationErrors> {
        let (id, bus) = (id.as_str(), bus.as_str());
        let mut errors = Vec::new();
        if self.displays.contains(id) || self.buses.contains(id) || id == bus {
            errors.push(ValidationError::DuplicateIdentifier { id: id.to_string() });
        }
        if self.displays.contains(bus) {
            errors.push(ValidationError::BusIsDisplay {
                key: keys::I2C_ID.to_string(),
                id: bus.to_string(),
            });
        }
        if let Some(errors) = ValidationErrors::new(errors) {
            return Err(errors);
        }
        self.displays.insert(id.to_string());
        self.buses.insert(bus.to_string());
        Ok(())
    }
}

/// Validate and emit every instance of a build
///
/// Contract violations between validation and emission abort the build.
pub fn run_build(document: &BuildDocument) -> Result<BuildReport, EmitError> {
    let mut names = Namespace::default();
    let mut report = BuildReport::default();

    for (index, entry) in document.instances.iter().enumerate() {
        let (platform, outcome) = match entry {
            Ok(instance) => (
                Some(instance.platform.clone()),
                run_instance(instance, &mut names)?,
            ),
            Err(malformed) => (
                None,
                InstanceOutcome::Rejected(ValidationErrors::single(
                    ValidationError::MalformedInstance {
                        reason: malformed.reason.clone(),
                    },
                )),
            ),
        };
        if let InstanceOutcome::Rejected(errors) = &outcome {
            log::warn!(
                "Display #{} ({}) rejected with {} error(s)",
                index + 1,
                platform.as_deref().unwrap_or("no platform"),
                errors.len()
            );
        }
        report.instances.push(InstanceReport {
            index,
            platform,
            outcome,
        });
    }

    log::info!(
        "Processed {} display(s), {} emitted",
        report.instances.len(),
        report.emitted().count()
    );
    Ok(report)
}

fn run_instance(
    instance: &InstanceDocument,
    names: &mut Namespace,
) -> Result<InstanceOutcome, EmitError> {
    let Some(variant) = Variant::from_platform(&instance.platform) else {
        return Ok(InstanceOutcome::Rejected(ValidationErrors::single(
            ValidationError::UnknownPlatform {
                platform: instance.platform.clone(),
                suggestions: suggest(&instance.platform, Variant::platforms()),
            },
        )));
    };

    let config = match validate(variant.schema(), &instance.config) {
        Ok(config) => config,
        Err(errors) => return Ok(InstanceOutcome::Rejected(errors)),
    };

    if let (Some(id), Some(bus)) = (
        config.identifier(keys::IDENTIFIER),
        config.identifier(keys::I2C_ID),
    ) {
        if let Err(errors) = names.claim(id, bus) {
            return Ok(InstanceOutcome::Rejected(errors));
        }
    }

    let operations = emit(variant, &config)?;
    Ok(InstanceOutcome::Emitted(EmittedInstance {
        variant,
        config,
        operations,
    }))
}
