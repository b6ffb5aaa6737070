//! Unsolicited status updates and the registry that decodes them.
//!
//! With verbose mode enabled the player pushes `@CODE DATA\r` frames on its
//! own. The set of known codes is fixed: the registry is built once from
//! [`UPDATE_TABLE`] and never mutated afterwards.

use std::collections::HashMap;
use std::sync::LazyLock;

use bytes::Bytes;

use crate::error::{ProtocolError, ProtocolResult};
use crate::frame::{leading_code, UpdateFrame};
use crate::types::Code;

/// Kinds of unsolicited update the player sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpdateKind {
    /// Power state changed (`UPW`).
    Power,
    /// Playback status changed (`UPL`).
    Playback,
    /// Volume changed (`UVL`).
    Volume,
    /// Disc type detected (`UDT`).
    DiscType,
    /// Audio type changed (`UAT`).
    AudioType,
    /// Time code tick (`UTC`).
    TimeCode,
    /// Output resolution changed (`UVO`).
    Resolution,
}

/// Binds an update code to the kind that decodes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateDescriptor {
    /// Wire code.
    pub code: Code,
    /// Update kind.
    pub kind: UpdateKind,
}

impl UpdateDescriptor {
    const fn new(code: &[u8; 3], kind: UpdateKind) -> Self {
        UpdateDescriptor {
            code: Code::from_bytes(*code),
            kind,
        }
    }
}

/// The updates known to this crate.
pub const UPDATE_TABLE: &[UpdateDescriptor] = &[
    UpdateDescriptor::new(b"UPW", UpdateKind::Power),
    UpdateDescriptor::new(b"UPL", UpdateKind::Playback),
    UpdateDescriptor::new(b"UVL", UpdateKind::Volume),
    UpdateDescriptor::new(b"UDT", UpdateKind::DiscType),
    UpdateDescriptor::new(b"UAT", UpdateKind::AudioType),
    UpdateDescriptor::new(b"UTC", UpdateKind::TimeCode),
    UpdateDescriptor::new(b"UVO", UpdateKind::Resolution),
];

static STANDARD_REGISTRY: LazyLock<UpdateRegistry> = LazyLock::new(|| {
    UpdateRegistry::from_descriptors(UPDATE_TABLE.iter().copied())
        .expect("built-in update codes are unique")
});

/// Lookup table from update code to update kind.
#[derive(Debug, Clone, Default)]
pub struct UpdateRegistry {
    entries: HashMap<Code, UpdateKind>,
}

impl UpdateRegistry {
    /// Build a registry, failing on the first duplicate code.
    pub fn from_descriptors<I>(descriptors: I) -> ProtocolResult<Self>
    where
        I: IntoIterator<Item = UpdateDescriptor>,
    {
        let mut entries = HashMap::new();
        for descriptor in descriptors {
            if entries.insert(descriptor.code, descriptor.kind).is_some() {
                return Err(ProtocolError::DuplicateRegistration(descriptor.code));
            }
        }
        Ok(UpdateRegistry { entries })
    }

    /// The registry built from [`UPDATE_TABLE`].
    pub fn standard() -> &'static UpdateRegistry {
        &STANDARD_REGISTRY
    }

    /// Look up the update kind registered for `code`.
    pub fn lookup(&self, code: &Code) -> Option<UpdateKind> {
        self.entries.get(code).copied()
    }

    /// Number of registered codes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no codes are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Decode `frame` as an update if its code is registered.
    ///
    /// Returns `None` for unregistered codes and for frames that do not
    /// follow the update grammar.
    pub fn decode(&self, frame: &[u8]) -> Option<Update> {
        let code = Code::parse(leading_code(frame)?).ok()?;
        let kind = self.lookup(&code)?;
        let Some(parsed) = UpdateFrame::parse(frame) else {
            log::warn!("Ignoring malformed {} update: {:?}", code, String::from_utf8_lossy(frame));
            return None;
        };
        Some(Update {
            kind,
            code,
            data: parsed.data.map(Bytes::copy_from_slice),
        })
    }
}

/// Volume level reported by a volume update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeLevel {
    /// Numeric level.
    Level(u32),
    /// Muted.
    Muted,
}

/// A decoded unsolicited update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Update {
    kind: UpdateKind,
    code: Code,
    data: Option<Bytes>,
}

impl Update {
    /// The update kind.
    pub fn kind(&self) -> UpdateKind {
        self.kind
    }

    /// The update code.
    pub fn code(&self) -> Code {
        self.code
    }

    /// Payload bytes following the code.
    pub fn data(&self) -> Option<&[u8]> {
        self.data.as_deref()
    }

    /// Payload as text, if present and valid UTF-8.
    pub fn data_str(&self) -> Option<&str> {
        self.data().and_then(|d| std::str::from_utf8(d).ok())
    }

    /// Power flag carried by a power update.
    pub fn power_on(&self) -> Option<bool> {
        if self.kind != UpdateKind::Power {
            return None;
        }
        match self.data()? {
            b"ON" => Some(true),
            b"OFF" => Some(false),
            _ => None,
        }
    }

    /// Volume level carried by a volume update.
    pub fn volume(&self) -> Option<VolumeLevel> {
        if self.kind != UpdateKind::Volume {
            return None;
        }
        match self.data_str()?.trim() {
            "MUT" => Some(VolumeLevel::Muted),
            level => level.parse().ok().map(VolumeLevel::Level),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_registry() {
        let registry = UpdateRegistry::standard();
        assert_eq!(registry.len(), UPDATE_TABLE.len());
        assert_eq!(registry.lookup(&"UPW".parse().unwrap()), Some(UpdateKind::Power));
        assert_eq!(registry.lookup(&"PWR".parse().unwrap()), None);
    }

    #[test]
    fn test_duplicate_registration() {
        let descriptors = [
            UpdateDescriptor::new(b"UPW", UpdateKind::Power),
            UpdateDescriptor::new(b"UVL", UpdateKind::Volume),
            UpdateDescriptor::new(b"UPW", UpdateKind::Playback),
        ];
        let err = UpdateRegistry::from_descriptors(descriptors).unwrap_err();
        assert_eq!(err, ProtocolError::DuplicateRegistration("UPW".parse().unwrap()));
    }

    #[test]
    fn test_decode_power_update() {
        let update = UpdateRegistry::standard().decode(b"@UPW OFF\r").unwrap();
        assert_eq!(update.kind(), UpdateKind::Power);
        assert_eq!(update.code().as_str(), "UPW");
        assert_eq!(update.power_on(), Some(false));
        assert_eq!(update.volume(), None);
    }

    #[test]
    fn test_decode_volume_update() {
        let registry = UpdateRegistry::standard();
        let level = registry.decode(b"@UVL 045\r").unwrap();
        assert_eq!(level.volume(), Some(VolumeLevel::Level(45)));

        let muted = registry.decode(b"@UVL MUT\r").unwrap();
        assert_eq!(muted.volume(), Some(VolumeLevel::Muted));
    }

    #[test]
    fn test_decode_raw_payload() {
        let update = UpdateRegistry::standard().decode(b"@UTC 001 002 E 00:12:34\r").unwrap();
        assert_eq!(update.kind(), UpdateKind::TimeCode);
        assert_eq!(update.data_str(), Some("001 002 E 00:12:34"));
    }

    #[test]
    fn test_decode_unknown_code() {
        assert!(UpdateRegistry::standard().decode(b"@ZZZ 1\r").is_none());
        assert!(UpdateRegistry::standard().decode(b"@U").is_none());
    }
}
