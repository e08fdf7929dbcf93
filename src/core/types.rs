//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`Address`] - Validated record address (identity and lookup key)
//! - [`ThingType`] - Discriminant selecting a record variant
//!
//! # Validation
//!
//! These types enforce validity at construction time. Invalid values
//! cannot be represented, so resolvers and the tree builder never see an
//! empty address or an unknown discriminant.
//!
//! # Examples
//!
//! ```
//! use seedtree::core::types::{Address, ThingType};
//!
//! let address = Address::new("leaf1").unwrap();
//! assert_eq!(address.as_str(), "leaf1");
//!
//! assert_eq!(ThingType::from_code(1).unwrap(), ThingType::Text);
//! assert!(Address::new("").is_err());
//! assert!(ThingType::from_code(9).is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from type validation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("unknown thing type {0}")]
    UnknownThingType(i64),

    #[error("unknown thing type name '{0}'")]
    UnknownThingTypeName(String),
}

/// A validated record address.
///
/// Addresses are opaque to the traversal logic. The only rules are:
/// - Cannot be empty
/// - Cannot contain ASCII control characters
///
/// Whether an address is usable as a file name is a separate question,
/// answered by [`Address::is_path_safe`].
///
/// # Example
///
/// ```
/// use seedtree::core::types::Address;
///
/// let address = Address::new("seed").unwrap();
/// assert!(address.is_path_safe());
///
/// let nested = Address::new("a/b").unwrap();
/// assert!(!nested.is_path_safe());
///
/// assert!(Address::new("bad\naddress").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    /// Create a new validated address.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidAddress` if the address is empty or
    /// contains control characters.
    pub fn new(address: impl Into<String>) -> Result<Self, TypeError> {
        let address = address.into();
        Self::validate(&address)?;
        Ok(Self(address))
    }

    fn validate(address: &str) -> Result<(), TypeError> {
        if address.is_empty() {
            return Err(TypeError::InvalidAddress(
                "address cannot be empty".into(),
            ));
        }
        if address.chars().any(|c| c.is_control()) {
            return Err(TypeError::InvalidAddress(
                "address cannot contain control characters".into(),
            ));
        }
        Ok(())
    }

    /// Get the address as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check whether the address can be used directly as a file stem.
    ///
    /// Rejects separators and parent-directory components so a store
    /// lookup can never escape its root directory.
    pub fn is_path_safe(&self) -> bool {
        !(self.0.contains('/')
            || self.0.contains('\\')
            || self.0.contains("..")
            || self.0.starts_with('.'))
    }
}

impl TryFrom<String> for Address {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.0
    }
}

impl AsRef<str> for Address {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Discriminant selecting which record variant a value is.
///
/// On the wire this is a small integer:
///
/// | code | variant     |
/// |------|-------------|
/// | 0    | `Container` |
/// | 1    | `Text`      |
/// | 2    | `Number`    |
/// | 3    | `Image`     |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum ThingType {
    /// Holds ordered references to other records
    #[default]
    Container,
    /// Holds a single string
    Text,
    /// Holds a single floating point number
    Number,
    /// Holds a byte payload (base64 on the wire)
    Image,
}

impl ThingType {
    /// All variants, in wire-code order.
    pub fn all() -> &'static [ThingType] {
        &[
            ThingType::Container,
            ThingType::Text,
            ThingType::Number,
            ThingType::Image,
        ]
    }

    /// Parse a wire code.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::UnknownThingType` for codes outside `0..=3`.
    pub fn from_code(code: i64) -> Result<Self, TypeError> {
        match code {
            0 => Ok(ThingType::Container),
            1 => Ok(ThingType::Text),
            2 => Ok(ThingType::Number),
            3 => Ok(ThingType::Image),
            other => Err(TypeError::UnknownThingType(other)),
        }
    }

    /// The wire code for this variant.
    pub fn code(&self) -> i64 {
        match self {
            ThingType::Container => 0,
            ThingType::Text => 1,
            ThingType::Number => 2,
            ThingType::Image => 3,
        }
    }

    /// Lowercase name, as accepted on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            ThingType::Container => "container",
            ThingType::Text => "text",
            ThingType::Number => "number",
            ThingType::Image => "image",
        }
    }

    /// Parse a variant from its name or its wire code.
    ///
    /// # Example
    ///
    /// ```
    /// use seedtree::core::types::ThingType;
    ///
    /// assert_eq!(ThingType::parse("Text").unwrap(), ThingType::Text);
    /// assert_eq!(ThingType::parse("2").unwrap(), ThingType::Number);
    /// assert!(ThingType::parse("video").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, TypeError> {
        if let Ok(code) = s.parse::<i64>() {
            return Self::from_code(code);
        }
        match s.to_lowercase().as_str() {
            "container" => Ok(ThingType::Container),
            "text" | "string" => Ok(ThingType::Text),
            "number" => Ok(ThingType::Number),
            "image" => Ok(ThingType::Image),
            _ => Err(TypeError::UnknownThingTypeName(s.to_string())),
        }
    }

    /// Check if this is the container variant.
    pub fn is_container(&self) -> bool {
        matches!(self, ThingType::Container)
    }
}

impl TryFrom<i64> for ThingType {
    type Error = TypeError;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        Self::from_code(code)
    }
}

impl From<ThingType> for i64 {
    fn from(thing_type: ThingType) -> Self {
        thing_type.code()
    }
}

impl std::str::FromStr for ThingType {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for ThingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod address {
        use super::*;

        #[test]
        fn valid_addresses() {
            assert!(Address::new("root").is_ok());
            assert!(Address::new("leaf-1").is_ok());
            assert!(Address::new("0xdeadbeef").is_ok());
            assert!(Address::new("a b c").is_ok());
        }

        #[test]
        fn empty_rejected() {
            assert!(matches!(
                Address::new(""),
                Err(TypeError::InvalidAddress(_))
            ));
        }

        #[test]
        fn control_chars_rejected() {
            assert!(Address::new("tab\there").is_err());
            assert!(Address::new("nul\0").is_err());
        }

        #[test]
        fn path_safety() {
            assert!(Address::new("seed").unwrap().is_path_safe());
            assert!(!Address::new("../etc/passwd").unwrap().is_path_safe());
            assert!(!Address::new("a\\b").unwrap().is_path_safe());
            assert!(!Address::new(".hidden").unwrap().is_path_safe());
        }

        #[test]
        fn serde_rejects_empty() {
            let result: Result<Address, _> = serde_json::from_str("\"\"");
            assert!(result.is_err());
        }

        #[test]
        fn display() {
            let address = Address::new("leaf1").unwrap();
            assert_eq!(format!("{}", address), "leaf1");
        }
    }

    mod thing_type {
        use super::*;

        #[test]
        fn codes_roundtrip() {
            for t in ThingType::all() {
                assert_eq!(ThingType::from_code(t.code()).unwrap(), *t);
            }
        }

        #[test]
        fn unknown_code_rejected() {
            assert_eq!(
                ThingType::from_code(7),
                Err(TypeError::UnknownThingType(7))
            );
            assert!(ThingType::from_code(-1).is_err());
        }

        #[test]
        fn parse_names() {
            assert_eq!(ThingType::parse("container").unwrap(), ThingType::Container);
            assert_eq!(ThingType::parse("STRING").unwrap(), ThingType::Text);
            assert_eq!(ThingType::parse("image").unwrap(), ThingType::Image);
            assert_eq!(ThingType::parse("0").unwrap(), ThingType::Container);
        }

        #[test]
        fn default_is_container() {
            assert_eq!(ThingType::default(), ThingType::Container);
        }

        #[test]
        fn serde_as_integer() {
            assert_eq!(serde_json::to_string(&ThingType::Number).unwrap(), "2");
            let parsed: ThingType = serde_json::from_str("3").unwrap();
            assert_eq!(parsed, ThingType::Image);
            assert!(serde_json::from_str::<ThingType>("4").is_err());
        }
    }
}
