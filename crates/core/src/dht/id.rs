#![warn(missing_docs)]

//! This module defines the identifier of a node on the Chord ring.
//! An identifier is an element of the finite ring R(P) where P = 2^m,
//! represented by its canonical value in [0, 2^m). Because the bit
//! length m is a runtime parameter of the simulation (anything from a
//! toy m = 3 up to the production m = 160), identifiers wrap an
//! arbitrary-precision [BigUint] rather than a fixed-width word.
//!
//! Total order is the usual integer order on canonical representatives.
//! The only ring-aware predicate an identifier answers by itself is
//! [Id::is_on_arc]: membership on the closed clockwise arc between two
//! other identifiers. Width-dependent arithmetic (finger offsets) lives
//! on the identifier space, which knows m.

use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

use num_bigint::BigUint;
use serde::de;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;

use crate::error::Error;
use crate::error::Result;

/// An identifier on the Chord ring, canonical value in [0, 2^m).
#[derive(Clone, Eq, Ord, PartialEq, PartialOrd, Hash)]
pub struct Id(BigUint);

impl Id {
    /// Test whether this identifier lies on the closed arc walking
    /// clockwise from `from` to `to`, inclusive of both endpoints.
    /// When the arc wraps past zero (`from > to`), membership means
    /// being at or after `from`, or at or before `to`.
    pub fn is_on_arc(&self, from: &Id, to: &Id) -> bool {
        if from <= to {
            from <= self && self <= to
        } else {
            self <= to || self >= from
        }
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for Id {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Id({})", self.0)
    }
}

impl Deref for Id {
    type Target = BigUint;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<BigUint> for Id {
    fn from(n: BigUint) -> Id {
        Id(n)
    }
}

impl From<Id> for BigUint {
    fn from(id: Id) -> BigUint {
        id.0
    }
}

impl From<u32> for Id {
    fn from(n: u32) -> Id {
        Id(BigUint::from(n))
    }
}

impl From<u64> for Id {
    fn from(n: u64) -> Id {
        Id(BigUint::from(n))
    }
}

impl FromStr for Id {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        let n = BigUint::from_str(s).map_err(|_| Error::IdentifierParse(s.to_string()))?;
        Ok(Id(n))
    }
}

impl Serialize for Id {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where S: Serializer {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Id {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where D: Deserializer<'de> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order() {
        let a = Id::from(3u32);
        let b = Id::from(100u32);
        let c: Id = "340282366920938463463374607431768211456".parse().unwrap();
        assert!(a < b && b < c);
        assert_eq!(a, Id::from(3u64));
    }

    #[test]
    fn test_arc_membership_plain() {
        let (a, b) = (Id::from(2u32), Id::from(6u32));
        assert!(Id::from(2u32).is_on_arc(&a, &b));
        assert!(Id::from(4u32).is_on_arc(&a, &b));
        assert!(Id::from(6u32).is_on_arc(&a, &b));
        assert!(!Id::from(1u32).is_on_arc(&a, &b));
        assert!(!Id::from(7u32).is_on_arc(&a, &b));
    }

    #[test]
    fn test_arc_membership_wrapped() {
        // Arc from 6 clockwise to 2 passes through zero.
        let (a, b) = (Id::from(6u32), Id::from(2u32));
        assert!(Id::from(6u32).is_on_arc(&a, &b));
        assert!(Id::from(7u32).is_on_arc(&a, &b));
        assert!(Id::from(0u32).is_on_arc(&a, &b));
        assert!(Id::from(2u32).is_on_arc(&a, &b));
        assert!(!Id::from(3u32).is_on_arc(&a, &b));
        assert!(!Id::from(5u32).is_on_arc(&a, &b));
    }

    #[test]
    fn test_degenerate_arc() {
        // A closed arc with equal endpoints contains only that point.
        let a = Id::from(3u32);
        assert!(Id::from(3u32).is_on_arc(&a, &a));
        assert!(!Id::from(0u32).is_on_arc(&a, &a));
    }

    #[test]
    fn test_dump_and_load() {
        assert!(Id::from_str("banana").is_err());
        assert!(Id::from_str("-1").is_err());

        let id = Id::from_str("1208925819614629174706176").unwrap();
        assert_eq!(id.to_string(), "1208925819614629174706176");

        // Serialize as base-10 text
        assert_eq!(
            serde_json::to_string(&id).unwrap(),
            "\"1208925819614629174706176\""
        );

        // Deserialize
        let back = serde_json::from_str::<Id>("\"1208925819614629174706176\"").unwrap();
        assert_eq!(back, id);

        // Debug and Display
        assert_eq!(format!("{}", Id::from(42u32)), "42");
        assert_eq!(format!("{:?}", Id::from(42u32)), "Id(42)");
    }
}
