pub const TYPE: &str = "is31fl3731::IS31FL3731Component";
pub const REF_TYPE: &str = "is31fl3731::IS31FL3731Component &";

pub const WRITER_PARAM: &str = "it";
pub const WRITER_RETURN_TYPE: &str = "void";
