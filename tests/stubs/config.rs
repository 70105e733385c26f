#![allow(dead_code)]
// Not every test file uses every payload

pub const VALID_BUILD_YAML: &str = r#"
esphome:
  name: matrix-panel

i2c:
  id: i2c_bus
  sda: 21
  scl: 22

display:
  - platform: is31fl3731
    identifier: disp1
    width: 144
    height: 9

  - platform: is31fl3731_basic_v2
    identifier: disp2

  - platform: is31fl3731_basic
    identifier: disp3
    bus_address: 0x75
    update_interval: 250ms
    writer: !lambda |-
      it.fill(COLOR_OFF);
      it.draw_pixel_at(0, 0, COLOR_ON);
"#;

pub const VALID_BUILD_JSON: &str = r#"
{
  "display": [
    {
      "platform": "is31fl3731",
      "identifier": "panel",
      "width": 16,
      "height": 9,
      "rotation": 180,
      "show_test_card": true,
      "setup_priority": 800
    }
  ]
}
"#;

pub const OUT_OF_RANGE_YAML: &str = r#"
display:
  - platform: is31fl3731
    identifier: disp1
    width: 0
    height: 9
"#;

pub const MULTIPLE_ERRORS_YAML: &str = r#"
display:
  - platform: is31fl3731
    identifier: disp1
    widht: 16
    height: 145
    writer:
      params:
        - type: int
          name: x
      body: "return x;"

  - platform: is31fl3731_basic
    identifier: fine
"#;

pub const DUPLICATE_ID_YAML: &str = r#"
display:
  - platform: is31fl3731_basic
    identifier: matrix
  - platform: is31fl3731_basic_v2
    identifier: matrix
"#;

pub const UNKNOWN_PLATFORM_YAML: &str = r#"
display:
  - platform: is31fl3731_basc
    identifier: matrix
"#;

pub const MALFORMED_ENTRY_YAML: &str = r#"
display:
  - identifier: nameless
  - platform: is31fl3731
    identifier: disp1
    width: .inf
    height: 9
  - platform: is31fl3731_basic
    identifier: i2c_bus
"#;

pub const INVALID_YAML: &str = "display: [";
