//! Beacon identity, addressing and the static beacon table.
//!
//! Beacons are loaded once from configuration and never mutated. A scan
//! reports radio addresses; the [`BeaconTable`] resolves those to the
//! stable identifiers the estimator works with.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::domain::geometry::Point2;
use crate::error::PositioningError;

// ---------------------------------------------------------------------------
// BeaconId -- Value Object
// ---------------------------------------------------------------------------

/// Stable, human-assigned beacon identifier such as `"AP-12"`.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BeaconId(String);

impl BeaconId {
    /// Create an identifier from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BeaconId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BeaconId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

// ---------------------------------------------------------------------------
// BeaconAddress -- Value Object
// ---------------------------------------------------------------------------

/// A 6-byte radio address (BLE MAC or WiFi BSSID) advertised by a beacon.
#[derive(Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct BeaconAddress(pub [u8; 6]);

impl BeaconAddress {
    /// Parse an address such as `"3C:A3:08:03:C5:40"`.
    ///
    /// Accepts `:` or `-` separators and either letter case.
    pub fn parse(s: &str) -> Result<Self, PositioningError> {
        let parse_err = || PositioningError::AddressParse { input: s.to_owned() };

        let normalised = s.trim().replace('-', ":");
        let parts: Vec<&str> = normalised.split(':').collect();
        if parts.len() != 6 {
            return Err(parse_err());
        }

        let mut bytes = [0u8; 6];
        for (i, part) in parts.iter().enumerate() {
            if part.len() != 2 {
                return Err(parse_err());
            }
            bytes[i] = u8::from_str_radix(part, 16).map_err(|_| parse_err())?;
        }
        Ok(Self(bytes))
    }

    /// Return the raw 6-byte address.
    pub fn as_bytes(&self) -> &[u8; 6] {
        &self.0
    }
}

impl fmt::Debug for BeaconAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BeaconAddress({self})")
    }
}

impl fmt::Display for BeaconAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02X}:{b:02X}:{c:02X}:{d:02X}:{e:02X}:{g:02X}")
    }
}

impl FromStr for BeaconAddress {
    type Err = PositioningError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for BeaconAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for BeaconAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Beacon -- Entity
// ---------------------------------------------------------------------------

/// Descriptive metadata carried alongside a beacon. Never used numerically.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BeaconMeta {
    /// Radio address the scanner reports for this beacon, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<BeaconAddress>,
    /// Building / floor the beacon is mounted in.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub location: String,
    /// Free-form description ("ceiling in front of 7411").
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

/// A fixed transmitter with a known floor position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Beacon {
    /// Stable identifier.
    pub id: BeaconId,
    /// Mounting position in the floor frame.
    pub position: Point2,
    /// Descriptive metadata.
    #[serde(default)]
    pub meta: BeaconMeta,
}

impl Beacon {
    /// Create a beacon with empty metadata.
    pub fn new(id: impl Into<BeaconId>, position: Point2) -> Self {
        Self {
            id: id.into(),
            position,
            meta: BeaconMeta::default(),
        }
    }

    /// Attach the radio address the scanner reports for this beacon.
    #[must_use]
    pub fn with_address(mut self, address: BeaconAddress) -> Self {
        self.meta.address = Some(address);
        self
    }
}

// ---------------------------------------------------------------------------
// BeaconTable -- Aggregate
// ---------------------------------------------------------------------------

/// Immutable lookup of every configured beacon by id and by radio address.
#[derive(Debug, Clone, Default)]
pub struct BeaconTable {
    beacons: HashMap<BeaconId, Beacon>,
    by_address: HashMap<BeaconAddress, BeaconId>,
}

impl BeaconTable {
    /// Build a table, rejecting duplicate ids or addresses.
    pub fn from_beacons(
        beacons: impl IntoIterator<Item = Beacon>,
    ) -> Result<Self, crate::error::ConfigError> {
        use crate::error::ConfigError;

        let mut table = Self::default();
        for beacon in beacons {
            if let Some(address) = beacon.meta.address {
                if table.by_address.insert(address, beacon.id.clone()).is_some() {
                    return Err(ConfigError::invalid_value(
                        "beacons",
                        format!("duplicate beacon address {address}"),
                    ));
                }
            }
            if table.beacons.contains_key(&beacon.id) {
                return Err(ConfigError::invalid_value(
                    "beacons",
                    format!("duplicate beacon id {}", beacon.id),
                ));
            }
            table.beacons.insert(beacon.id.clone(), beacon);
        }
        Ok(table)
    }

    /// Look up a beacon by id.
    pub fn get(&self, id: &BeaconId) -> Option<&Beacon> {
        self.beacons.get(id)
    }

    /// Position of a beacon by id.
    pub fn position(&self, id: &BeaconId) -> Option<Point2> {
        self.beacons.get(id).map(|b| b.position)
    }

    /// Resolve a scanned radio address to a beacon id.
    pub fn resolve(&self, address: &BeaconAddress) -> Option<&BeaconId> {
        self.by_address.get(address)
    }

    /// The number of beacons.
    pub fn len(&self) -> usize {
        self.beacons.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.beacons.is_empty()
    }

    /// Iterate over every beacon (unordered).
    pub fn iter(&self) -> impl Iterator<Item = &Beacon> {
        self.beacons.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_roundtrip_normalises_case_and_separator() {
        let addr = BeaconAddress::parse("3c-a3-08-03-c5-40").unwrap();
        assert_eq!(addr.to_string(), "3C:A3:08:03:C5:40");
        assert_eq!("3C:A3:08:03:C5:40".parse::<BeaconAddress>().unwrap(), addr);
    }

    #[test]
    fn address_parse_errors() {
        assert!(BeaconAddress::parse("aa:bb:cc").is_err());
        assert!(BeaconAddress::parse("zz:bb:cc:dd:ee:ff").is_err());
        assert!(BeaconAddress::parse("aaa:b:cc:dd:ee:ff").is_err());
        assert!(BeaconAddress::parse("").is_err());
    }

    #[test]
    fn table_resolves_addresses() {
        let addr = BeaconAddress::parse("3C:A3:08:03:37:29").unwrap();
        let table = BeaconTable::from_beacons([
            Beacon::new("AP-12", Point2::new(5.0, 3.5)),
            Beacon::new("AP-11", Point2::new(25.3, 3.5)).with_address(addr),
        ])
        .unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.resolve(&addr), Some(&BeaconId::new("AP-11")));
        assert_eq!(
            table.position(&BeaconId::new("AP-12")),
            Some(Point2::new(5.0, 3.5))
        );
    }

    #[test]
    fn table_rejects_duplicate_ids() {
        let result = BeaconTable::from_beacons([
            Beacon::new("AP-12", Point2::new(5.0, 3.5)),
            Beacon::new("AP-12", Point2::new(6.0, 3.5)),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn beacon_serde_uses_string_address() {
        let beacon = Beacon::new("AP-07", Point2::new(58.7, 3.5))
            .with_address(BeaconAddress([0x3c, 0xa3, 0x08, 0x11, 0x93, 0x9e]));
        let json = serde_json::to_string(&beacon).unwrap();
        assert!(json.contains("\"3C:A3:08:11:93:9E\""));
        let back: Beacon = serde_json::from_str(&json).unwrap();
        assert_eq!(back, beacon);
    }
}
