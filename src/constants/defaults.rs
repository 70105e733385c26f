pub const LOG_LEVEL: &str = "INFO";

pub const DISPLAY_UPDATE_INTERVAL: &str = "1s";
pub const POLLING_UPDATE_INTERVAL: &str = "60s";

pub const I2C_ADDRESS_LOW: u8 = 0x74;
pub const I2C_ADDRESS_HIGH: u8 = 0x76;
pub const I2C_ADDRESS_MAX: i64 = 0x7F;
pub const I2C_BUS_ID: &str = "i2c_bus";

// One LED per PWM register, so neither dimension can exceed the LED count
pub const MATRIX_DIMENSION_MIN: i64 = 1;
pub const MATRIX_DIMENSION_MAX: i64 = 144;

// Scheduler sentinel for an interval of "never"
pub const SCHEDULER_DONT_RUN: u32 = u32::MAX;
