mod argsets;
mod command;

use anyhow::{anyhow, Result};
use dotenv::dotenv;
use env_logger::Env;

use matrixgen::constants::{defaults, envvars};

const CMD_VALIDATE: &str = "validate";
const CMD_EMIT: &str = "emit";
const CMD_CODEGEN: &str = "codegen";
const CMD_SCHEMA: &str = "schema";

const OPT_OUTPUT: &str = "--output";

fn main() -> Result<()> {
    let _ = dotenv();
    env_logger::Builder::from_env(Env::default().filter_or(envvars::LOG_LEVEL, defaults::LOG_LEVEL))
        .init();

    let mut args = pico_args::Arguments::from_env();
    let result = match args.subcommand()?.as_deref() {
        Some(CMD_VALIDATE) => command::validate(argsets::ConfigArgs {
            config: args.free_from_str()?,
        }),
        Some(CMD_EMIT) => command::emit(argsets::ConfigArgs {
            config: args.free_from_str()?,
        }),
        Some(CMD_CODEGEN) => {
            let output = args.opt_value_from_str(OPT_OUTPUT)?;
            command::codegen(argsets::CodegenArgs {
                config: args.free_from_str()?,
                output,
            })
        }
        Some(CMD_SCHEMA) => command::schema(argsets::SchemaArgs {
            platform: args.free_from_str()?,
        }),
        _ => Err(anyhow!(
            "Subcommand must be one of 'validate', 'emit', 'codegen', 'schema'"
        )),
    };

    let unused = args.finish();
    if !unused.is_empty() {
        log::warn!("Ignored extra arguments: {:?}", unused);
    }
    result
}
