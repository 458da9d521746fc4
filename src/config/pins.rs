//! GPIO pin assignment for the driver and light lines.

use serde::Deserialize;

/// Board header pin numbers (physical numbering) for every controlled line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PinAssignment {
    /// Light on/off.
    #[serde(default = "default_light")]
    pub light: u8,

    /// Motor step input (pulse train).
    #[serde(default = "default_step")]
    pub step: u8,

    /// Motor direction.
    #[serde(default = "default_dir")]
    pub dir: u8,

    /// Driver not-enable (active low).
    #[serde(default = "default_n_enable")]
    pub n_enable: u8,

    /// Driver not-sleep (active low).
    #[serde(default = "default_n_sleep")]
    pub n_sleep: u8,

    /// Driver not-reset (active low).
    #[serde(default = "default_n_reset")]
    pub n_reset: u8,
}

fn default_light() -> u8 {
    40
}

fn default_step() -> u8 {
    37
}

fn default_dir() -> u8 {
    38
}

fn default_n_enable() -> u8 {
    36
}

fn default_n_sleep() -> u8 {
    33
}

fn default_n_reset() -> u8 {
    35
}

impl Default for PinAssignment {
    fn default() -> Self {
        Self {
            light: default_light(),
            step: default_step(),
            dir: default_dir(),
            n_enable: default_n_enable(),
            n_sleep: default_n_sleep(),
            n_reset: default_n_reset(),
        }
    }
}

impl PinAssignment {
    /// All lines as `(name, header pin)` pairs.
    pub fn lines(&self) -> [(&'static str, u8); 6] {
        [
            ("light", self.light),
            ("step", self.step),
            ("dir", self.dir),
            ("n_enable", self.n_enable),
            ("n_sleep", self.n_sleep),
            ("n_reset", self.n_reset),
        ]
    }
}

/// Map a 40-pin header position to its Broadcom GPIO number.
///
/// Returns `None` for power, ground and ID EEPROM pins.
pub fn board_to_bcm(board: u8) -> Option<u8> {
    let bcm = match board {
        3 => 2,
        5 => 3,
        7 => 4,
        8 => 14,
        10 => 15,
        11 => 17,
        12 => 18,
        13 => 27,
        15 => 22,
        16 => 23,
        18 => 24,
        19 => 10,
        21 => 9,
        22 => 25,
        23 => 11,
        24 => 8,
        26 => 7,
        29 => 5,
        31 => 6,
        32 => 12,
        33 => 13,
        35 => 19,
        36 => 16,
        37 => 26,
        38 => 20,
        40 => 21,
        _ => return None,
    };
    Some(bcm)
}
