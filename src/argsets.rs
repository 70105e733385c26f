use std::path::PathBuf;

pub struct ConfigArgs {
    pub config: PathBuf,
}

pub struct CodegenArgs {
    pub config: PathBuf,
    pub output: Option<PathBuf>,
}

pub struct SchemaArgs {
    pub platform: String,
}
