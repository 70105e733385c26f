// Build document
pub const DISPLAY: &str = "display";
pub const PLATFORM: &str = "platform";

// Instance configuration
pub const IDENTIFIER: &str = "identifier";
pub const WIDTH: &str = "width";
pub const HEIGHT: &str = "height";
pub const UPDATE_INTERVAL: &str = "update_interval";
pub const BUS_ADDRESS: &str = "bus_address";
pub const I2C_ID: &str = "i2c_id";
pub const WRITER: &str = "writer";
pub const ROTATION: &str = "rotation";
pub const AUTO_CLEAR_ENABLED: &str = "auto_clear_enabled";
pub const SHOW_TEST_CARD: &str = "show_test_card";
pub const SETUP_PRIORITY: &str = "setup_priority";

// Writer lambda object form
pub const LAMBDA_BODY: &str = "body";
pub const LAMBDA_PARAMS: &str = "params";
pub const LAMBDA_PARAM_TYPE: &str = "type";
pub const LAMBDA_PARAM_NAME: &str = "name";
pub const LAMBDA_RETURN_TYPE: &str = "return_type";
