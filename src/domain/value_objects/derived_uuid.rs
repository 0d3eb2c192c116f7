//! Derived UUID value object
//!
//! OSCAL objects need UUIDs. Random ones would make every assemble produce a
//! different document, so identifiers are derived from a stable seed
//! (object name plus path inside the model) with SHA-256 and formatted as a
//! version-5-style UUID.

use std::fmt;

use sha2::{Digest, Sha256};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DerivedUuid(String);

impl DerivedUuid {
    pub fn from_seed(seed: &str) -> Self {
        let digest = Sha256::digest(seed.as_bytes());
        let mut bytes = [0u8; 16];
        bytes.copy_from_slice(&digest[..16]);

        // version 5, RFC 4122 variant
        bytes[6] = (bytes[6] & 0x0f) | 0x50;
        bytes[8] = (bytes[8] & 0x3f) | 0x80;

        let hex: String = bytes.iter().map(|b| format!("{:02x}", b)).collect();
        Self(format!(
            "{}-{}-{}-{}-{}",
            &hex[0..8],
            &hex[8..12],
            &hex[12..16],
            &hex[16..20],
            &hex[20..32]
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for DerivedUuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<DerivedUuid> for String {
    fn from(uuid: DerivedUuid) -> Self {
        uuid.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_uuid() {
        assert_eq!(
            DerivedUuid::from_seed("test-ssp/ac-1"),
            DerivedUuid::from_seed("test-ssp/ac-1")
        );
    }

    #[test]
    fn different_seed_different_uuid() {
        assert_ne!(
            DerivedUuid::from_seed("test-ssp/ac-1"),
            DerivedUuid::from_seed("test-ssp/ac-2")
        );
    }

    #[test]
    fn uuid_shape() {
        let uuid = DerivedUuid::from_seed("anything");
        let groups: Vec<&str> = uuid.as_str().split('-').collect();
        assert_eq!(
            groups.iter().map(|g| g.len()).collect::<Vec<_>>(),
            vec![8, 4, 4, 4, 12]
        );
        assert!(groups[2].starts_with('5'));
        assert!(matches!(groups[3].chars().next(), Some('8' | '9' | 'a' | 'b')));
    }
}
