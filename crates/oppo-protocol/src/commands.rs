//! Commands that can be sent to the player.
//!
//! Every command is identified by a fixed 3-byte code. A few carry a single
//! numeric parameter that is rendered in decimal after the code. Parameter
//! ranges are not validated here; out of range values are rejected by the
//! device itself.

use std::time::Duration;

use crate::constants::DEFAULT_TIMEOUT;
use crate::error::{ProtocolError, ProtocolResult};
use crate::frame::encode_command_frame;
use crate::responses::ResponseParser;
use crate::types::Code;

/// Commands that can be sent to the player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    // ========== Power ==========
    /// Toggle power. The reply payload (`ON`/`OFF`) reports the new state.
    PowerToggle,
    /// Query the power state.
    PowerQuery,
    /// Power on.
    PowerOn,
    /// Power off.
    PowerOff,

    // ========== Tray / Display ==========
    /// Open or close the disc tray.
    EjectToggle,
    /// Cycle the front panel dimmer.
    DimmerToggle,

    // ========== Volume ==========
    /// Volume up.
    VolumeUp,
    /// Volume down.
    VolumeDown,
    /// Toggle mute.
    Mute,
    /// Query the volume level.
    VolumeQuery,
    /// Set the volume level.
    VolumeSet {
        /// Volume level.
        value: u32,
    },

    // ========== Keypad ==========
    /// Numeric key. Values above 9 encode as `NU9` but do not compare equal
    /// to `Digit(9)`; use [`Command::digit`] to reject them instead.
    Digit(u8),
    /// Clear key.
    Clear,

    // ========== Info ==========
    /// Toggle the on-screen display.
    Osd,
    /// Show the info hub.
    Info,

    // ========== Navigation ==========
    /// Home menu.
    Home,
    /// Goto.
    Goto,
    /// Page up.
    PageUp,
    /// Page down.
    PageDown,
    /// Disc top menu.
    TopMenu,
    /// Disc pop-up menu.
    PopUpMenu,
    /// Cursor up.
    Up,
    /// Cursor down.
    Down,
    /// Cursor left.
    Left,
    /// Cursor right.
    Right,
    /// Select / enter.
    Select,
    /// Return.
    Return,
    /// Red function key.
    Red,
    /// Green function key.
    Green,
    /// Blue function key.
    Blue,
    /// Yellow function key.
    Yellow,

    // ========== Transport ==========
    /// Play.
    Play,
    /// Pause.
    Pause,
    /// Previous chapter/track.
    Previous,
    /// Next chapter/track.
    Next,
    /// Fast reverse, optionally at an explicit speed step.
    FastReverse {
        /// Speed step; without it the device cycles to the next speed.
        speed: Option<u32>,
    },
    /// Fast forward, optionally at an explicit speed step.
    FastForward {
        /// Speed step; without it the device cycles to the next speed.
        speed: Option<u32>,
    },

    // ========== Verbose Mode ==========
    /// Query the verbose (update reporting) mode.
    VerboseModeQuery,
    /// Set the verbose (update reporting) mode.
    VerboseModeSet {
        /// Mode value.
        value: u32,
    },

    // ========== Raw ==========
    /// A command outside the catalogue.
    Raw {
        /// The command code.
        code: Code,
        /// Optional parameter text.
        params: Option<String>,
    },
}

impl Command {
    /// Build a raw command from a string code.
    pub fn raw(code: &str, params: Option<&str>) -> ProtocolResult<Command> {
        Ok(Command::Raw {
            code: code.parse()?,
            params: params.map(str::to_string),
        })
    }

    /// Build a numeric key command, rejecting values above 9.
    pub fn digit(n: u8) -> ProtocolResult<Command> {
        if n > 9 {
            return Err(ProtocolError::InvalidCode(format!("NU{}", n)));
        }
        Ok(Command::Digit(n))
    }

    /// The 3-byte code identifying this command.
    pub fn code(&self) -> Code {
        let bytes = match self {
            Command::PowerToggle => b"PWR",
            Command::PowerQuery => b"QPW",
            Command::PowerOn => b"PON",
            Command::PowerOff => b"POF",
            Command::EjectToggle => b"EJT",
            Command::DimmerToggle => b"DIM",
            Command::VolumeUp => b"VUP",
            Command::VolumeDown => b"VDN",
            Command::Mute => b"MUT",
            Command::VolumeQuery => b"QVL",
            Command::VolumeSet { .. } => b"SVL",
            Command::Digit(n) => return Code::from_bytes([b'N', b'U', b'0' + (*n).min(9)]),
            Command::Clear => b"CLR",
            Command::Osd => b"OSD",
            Command::Info => b"INH",
            Command::Home => b"HOM",
            Command::Goto => b"GOT",
            Command::PageUp => b"PUP",
            Command::PageDown => b"PDN",
            Command::TopMenu => b"TTL",
            Command::PopUpMenu => b"MNU",
            Command::Up => b"NUP",
            Command::Down => b"NDN",
            Command::Left => b"NLT",
            Command::Right => b"NRT",
            Command::Select => b"SEL",
            Command::Return => b"RET",
            Command::Red => b"RED",
            Command::Green => b"GRN",
            Command::Blue => b"BLU",
            Command::Yellow => b"YLW",
            Command::Play => b"PLA",
            Command::Pause => b"PAU",
            Command::Previous => b"PRE",
            Command::Next => b"NXT",
            Command::FastReverse { .. } => b"REV",
            Command::FastForward { .. } => b"FWD",
            Command::VerboseModeQuery => b"QVM",
            Command::VerboseModeSet { .. } => b"SVM",
            Command::Raw { code, .. } => return *code,
        };
        Code::from_bytes(*bytes)
    }

    /// Parameter text rendered after the code, if the command takes one.
    pub fn params(&self) -> Option<String> {
        match self {
            Command::VolumeSet { value } | Command::VerboseModeSet { value } => {
                Some(value.to_string())
            }
            Command::FastReverse { speed } | Command::FastForward { speed } => {
                speed.map(|s| s.to_string())
            }
            Command::Raw { params, .. } => params.clone(),
            _ => None,
        }
    }

    /// How the reply to this command is decoded.
    pub fn response_parser(&self) -> ResponseParser {
        match self {
            Command::PowerToggle => ResponseParser::PowerState,
            _ => ResponseParser::Default,
        }
    }

    /// Advisory time to wait for a reply. Enforcement is up to the caller.
    pub fn timeout(&self) -> Duration {
        DEFAULT_TIMEOUT
    }

    /// Encode the command as a frame to send to the player.
    ///
    /// Returns the bytes to send, including the `\r\n` terminator.
    pub fn encode(&self) -> ProtocolResult<Vec<u8>> {
        let code = self.code();
        let params = self.params();
        if let Some(params) = &params {
            validate_params(&code, params)?;
        }
        Ok(encode_command_frame(&code, params.as_deref().map(str::as_bytes)))
    }
}

/// Params must be printable ASCII (spaces allowed) so they can never
/// contain the frame terminator.
fn validate_params(code: &Code, params: &str) -> ProtocolResult<()> {
    match params.bytes().find(|b| !(b.is_ascii_graphic() || *b == b' ')) {
        Some(b) => Err(ProtocolError::Encoding {
            code: code.to_string(),
            reason: format!("parameter byte 0x{:02X} is not printable ASCII", b),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_power_toggle() {
        assert_eq!(Command::PowerToggle.encode().unwrap(), b"#PWR\r\n");
    }

    #[test]
    fn test_encode_volume_set() {
        let cmd = Command::VolumeSet { value: 50 };
        assert_eq!(cmd.encode().unwrap(), b"#SVL 50\r\n");
    }

    #[test]
    fn test_encode_optional_speed() {
        assert_eq!(Command::FastForward { speed: None }.encode().unwrap(), b"#FWD\r\n");
        assert_eq!(Command::FastReverse { speed: Some(3) }.encode().unwrap(), b"#REV 3\r\n");
    }

    #[test]
    fn test_digit_codes() {
        assert_eq!(Command::Digit(0).code().as_bytes(), b"NU0");
        assert_eq!(Command::Digit(7).code().as_bytes(), b"NU7");
        assert_eq!(Command::Digit(42).code().as_bytes(), b"NU9");
    }

    #[test]
    fn test_digit_constructor_checks_range() {
        assert_eq!(Command::digit(9).unwrap(), Command::Digit(9));
        assert_eq!(Command::digit(0).unwrap().encode().unwrap(), b"#NU0\r\n");
        assert!(matches!(Command::digit(10), Err(ProtocolError::InvalidCode(_))));
    }

    #[test]
    fn test_encode_raw() {
        let cmd = Command::raw("QPL", None).unwrap();
        assert_eq!(cmd.encode().unwrap(), b"#QPL\r\n");

        let cmd = Command::raw("SRP", Some("1080P")).unwrap();
        assert_eq!(cmd.encode().unwrap(), b"#SRP 1080P\r\n");
    }

    #[test]
    fn test_raw_rejects_bad_code() {
        assert!(matches!(Command::raw("QP", None), Err(ProtocolError::InvalidCode(_))));
    }

    #[test]
    fn test_raw_rejects_unencodable_params() {
        let cmd = Command::raw("SRP", Some("bad\rvalue")).unwrap();
        assert!(matches!(cmd.encode(), Err(ProtocolError::Encoding { .. })));

        let cmd = Command::raw("SRP", Some("caf\u{e9}")).unwrap();
        assert!(matches!(cmd.encode(), Err(ProtocolError::Encoding { .. })));
    }

    #[test]
    fn test_response_parser_selection() {
        assert_eq!(Command::PowerToggle.response_parser(), ResponseParser::PowerState);
        assert_eq!(Command::PowerQuery.response_parser(), ResponseParser::Default);
    }

    #[test]
    fn test_default_timeout() {
        assert_eq!(Command::Play.timeout(), Duration::from_secs(10));
    }
}
