//! core::thing
//!
//! The self-describing record format.
//!
//! # Variants
//!
//! A [`Thing`] is one of four closed variants, selected by its `type`
//! discriminant:
//! - [`ContainerThing`] - ordered [`Feature`] references to other Things
//! - [`TextThing`] - a single string
//! - [`NumberThing`] - a single number
//! - [`ImageThing`] - a single byte payload
//!
//! # Wire Format
//!
//! Things are JSON objects. The common fields (`address`, `version`, `type`,
//! `registry`, `tradable`, `spawner`, `cert`, `proof`, `hash`, `updated`) are
//! shared by every variant; the payload is either a `data` scalar or a
//! `features` array, never both. Byte fields are base64 strings and
//! `updated` is Unix seconds. Unknown fields are ignored.
//!
//! Decoding reads the `type` envelope first and then dispatches to the
//! variant, mirroring how a record's payload kind is fully determined by
//! its discriminant.
//!
//! # Example
//!
//! ```
//! use seedtree::core::thing::Thing;
//! use seedtree::core::types::ThingType;
//!
//! let json = br#"{"address":"leaf1","type":1,"data":"hello"}"#;
//! let thing = Thing::decode(json).unwrap();
//!
//! assert_eq!(thing.address().as_str(), "leaf1");
//! assert_eq!(thing.thing_type(), ThingType::Text);
//! assert_eq!(thing.data_string(), "hello");
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::types::{Address, ThingType};

/// Errors from decoding an encoded Thing.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The input is not a JSON object at all.
    #[error("malformed thing: {0}")]
    Syntax(#[source] serde_json::Error),

    /// No `type` field and no expected type was supplied.
    #[error("thing has no type and none was expected")]
    MissingType,

    /// The `type` field holds a code outside the known variants.
    #[error("unknown thing type {0}")]
    UnknownType(i64),

    /// The encoded `type` disagrees with the expected type.
    #[error("expected {expected} thing, found {found}")]
    TypeMismatch {
        expected: ThingType,
        found: ThingType,
    },

    /// The fields do not parse for the selected variant.
    #[error("malformed {variant} thing: {source}")]
    Malformed {
        variant: ThingType,
        #[source]
        source: serde_json::Error,
    },

    /// The payload does not match the variant (wrong scalar, or both kinds).
    #[error("invalid {variant} payload: {reason}")]
    Payload { variant: ThingType, reason: String },
}

/// Attributes shared by every Thing variant.
///
/// Everything except `address` is opaque to traversal.
#[derive(Debug, Clone, PartialEq)]
pub struct Common {
    /// Identity and lookup key
    pub address: Address,
    /// Informational version string
    pub version: String,
    /// Registry identifier
    pub registry: Option<String>,
    /// Whether the Thing can be traded
    pub tradable: bool,
    /// Whether the Thing can spawn others
    pub spawner: bool,
    /// Certificate bytes
    pub cert: Vec<u8>,
    /// Provenance proof
    pub proof: Option<String>,
    /// Integrity hash bytes
    pub hash: Vec<u8>,
    /// Last modification time
    pub updated: Option<DateTime<Utc>>,
}

impl Common {
    /// Create the common attributes with the mandatory data.
    pub fn new(
        address: Address,
        version: impl Into<String>,
        tradable: bool,
        spawner: bool,
        cert: Vec<u8>,
    ) -> Self {
        Self {
            address,
            version: version.into(),
            registry: None,
            tradable,
            spawner,
            cert,
            proof: None,
            hash: Vec::new(),
            updated: None,
        }
    }

    /// Common attributes with only an address (everything else zeroed).
    pub fn at(address: Address) -> Self {
        Self::new(address, "", false, false, Vec::new())
    }

    /// Set the registry.
    pub fn with_registry(mut self, registry: impl Into<String>) -> Self {
        self.registry = Some(registry.into());
        self
    }

    /// Set the last modification time.
    pub fn with_updated(mut self, updated: DateTime<Utc>) -> Self {
        self.updated = Some(updated);
        self
    }
}

/// A typed, ordered reference from a container to another Thing's address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    /// Sequencing hint among siblings
    #[serde(default)]
    pub order: i64,
    /// Address of the referenced Thing
    pub address: Address,
    /// Expected type of the referenced Thing
    #[serde(rename = "type", default)]
    pub thing_type: ThingType,
    /// Human label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl Feature {
    /// Create a Feature referencing a container Thing.
    ///
    /// Use [`Feature::with_type`] for references to leaf Things.
    pub fn new(order: i64, address: Address) -> Self {
        Self {
            order,
            address,
            thing_type: ThingType::Container,
            title: None,
        }
    }

    /// Set the expected type of the target.
    pub fn with_type(mut self, thing_type: ThingType) -> Self {
        self.thing_type = thing_type;
        self
    }

    /// Set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Container Thing: holds references to nested Things.
#[derive(Debug, Clone, PartialEq)]
pub struct ContainerThing {
    pub common: Common,
    pub features: Vec<Feature>,
}

impl ContainerThing {
    /// Features sorted by declared `order`.
    ///
    /// The sort is stable, so features sharing an order keep their
    /// declaration order.
    pub fn features_in_order(&self) -> Vec<&Feature> {
        let mut ordered: Vec<&Feature> = self.features.iter().collect();
        ordered.sort_by_key(|f| f.order);
        ordered
    }
}

/// Text Thing.
#[derive(Debug, Clone, PartialEq)]
pub struct TextThing {
    pub common: Common,
    pub data: String,
}

/// Number Thing.
#[derive(Debug, Clone, PartialEq)]
pub struct NumberThing {
    pub common: Common,
    pub data: f64,
}

/// Image Thing (raw bytes, optionally labelled with a compression scheme).
#[derive(Debug, Clone, PartialEq)]
pub struct ImageThing {
    pub common: Common,
    pub compression: Option<String>,
    pub data: Vec<u8>,
}

/// A polymorphic, addressable record.
#[derive(Debug, Clone, PartialEq)]
pub enum Thing {
    Container(ContainerThing),
    Text(TextThing),
    Number(NumberThing),
    Image(ImageThing),
}

impl Thing {
    /// Build a container Thing.
    pub fn container(common: Common, features: Vec<Feature>) -> Self {
        Thing::Container(ContainerThing { common, features })
    }

    /// Build a text Thing.
    pub fn text(common: Common, data: impl Into<String>) -> Self {
        Thing::Text(TextThing {
            common,
            data: data.into(),
        })
    }

    /// Build a number Thing.
    pub fn number(common: Common, data: f64) -> Self {
        Thing::Number(NumberThing { common, data })
    }

    /// Build an image Thing.
    pub fn image(common: Common, data: Vec<u8>) -> Self {
        Thing::Image(ImageThing {
            common,
            compression: None,
            data,
        })
    }

    /// Decode a Thing, reading the discriminant from the encoded `type`.
    ///
    /// # Errors
    ///
    /// Returns `DecodeError::MissingType` if there is no `type` field, and
    /// any other `DecodeError` if the fields are malformed for the variant.
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        Self::decode_with(None, bytes)
    }

    /// Decode a Thing as the expected variant.
    ///
    /// If the encoded `type` is present it must agree with `expected`.
    ///
    /// # Example
    ///
    /// ```
    /// use seedtree::core::thing::{DecodeError, Thing};
    /// use seedtree::core::types::ThingType;
    ///
    /// // No type on the wire: the expected type decides.
    /// let thing = Thing::decode_as(ThingType::Number, br#"{"address":"n","data":2.5}"#).unwrap();
    /// assert_eq!(thing.data_string(), "2.500000");
    ///
    /// // Disagreeing type on the wire is rejected.
    /// let err = Thing::decode_as(ThingType::Number, br#"{"address":"n","type":1,"data":"x"}"#);
    /// assert!(matches!(err, Err(DecodeError::TypeMismatch { .. })));
    /// ```
    pub fn decode_as(expected: ThingType, bytes: &[u8]) -> Result<Self, DecodeError> {
        Self::decode_with(Some(expected), bytes)
    }

    fn decode_with(expected: Option<ThingType>, bytes: &[u8]) -> Result<Self, DecodeError> {
        // Extract the envelope first so unknown codes are reported as such
        let envelope: ThingEnvelope = serde_json::from_slice(bytes).map_err(DecodeError::Syntax)?;

        let encoded = envelope
            .thing_type
            .map(|code| ThingType::from_code(code).map_err(|_| DecodeError::UnknownType(code)))
            .transpose()?;

        let variant = match (expected, encoded) {
            (Some(expected), Some(found)) if expected != found => {
                return Err(DecodeError::TypeMismatch { expected, found });
            }
            (Some(expected), _) => expected,
            (None, Some(found)) => found,
            (None, None) => return Err(DecodeError::MissingType),
        };

        let document: ThingDocument = serde_json::from_slice(bytes)
            .map_err(|source| DecodeError::Malformed { variant, source })?;

        document.into_thing(variant)
    }

    /// Encode the Thing to its JSON wire format.
    pub fn encode(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(&ThingDocument::from_thing(self))
    }

    /// Encode the Thing as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&ThingDocument::from_thing(self))
    }

    /// Encode the Thing as a JSON value.
    pub fn to_json_value(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(ThingDocument::from_thing(self))
    }

    /// Get the shared attributes.
    pub fn common(&self) -> &Common {
        match self {
            Thing::Container(t) => &t.common,
            Thing::Text(t) => &t.common,
            Thing::Number(t) => &t.common,
            Thing::Image(t) => &t.common,
        }
    }

    /// Get the address.
    pub fn address(&self) -> &Address {
        &self.common().address
    }

    /// Get the discriminant.
    pub fn thing_type(&self) -> ThingType {
        match self {
            Thing::Container(_) => ThingType::Container,
            Thing::Text(_) => ThingType::Text,
            Thing::Number(_) => ThingType::Number,
            Thing::Image(_) => ThingType::Image,
        }
    }

    /// Check if this is a container Thing.
    pub fn is_container(&self) -> bool {
        matches!(self, Thing::Container(_))
    }

    /// Get the container variant, if this is one.
    pub fn as_container(&self) -> Option<&ContainerThing> {
        match self {
            Thing::Container(c) => Some(c),
            _ => None,
        }
    }

    /// Get the features. `None` for leaf Things.
    pub fn features(&self) -> Option<&[Feature]> {
        self.as_container().map(|c| c.features.as_slice())
    }

    /// Human-readable rendering of the payload.
    ///
    /// - text: the string itself
    /// - number: fixed six decimal places
    /// - image: byte count (and compression, if labelled)
    /// - container: feature count
    pub fn data_string(&self) -> String {
        match self {
            Thing::Container(c) => match c.features.len() {
                1 => "<1 feature>".to_string(),
                n => format!("<{} features>", n),
            },
            Thing::Text(t) => t.data.clone(),
            Thing::Number(n) => format!("{:.6}", n.data),
            Thing::Image(i) => match &i.compression {
                Some(compression) => format!("<{} bytes, {}>", i.data.len(), compression),
                None => format!("<{} bytes>", i.data.len()),
            },
        }
    }
}

/// One-line form of [`Thing`]; line breaks in text payloads are escaped.
impl std::fmt::Display for Thing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let data = self.data_string();
        write!(
            f,
            "{} ({}): {}",
            self.address(),
            self.thing_type(),
            data.replace('\r', "\\r").replace('\n', "\\n")
        )
    }
}

/// Envelope for type dispatch before full parsing.
#[derive(Debug, Deserialize)]
struct ThingEnvelope {
    #[serde(rename = "type", default)]
    thing_type: Option<i64>,
}

/// The wire shape shared by every variant.
#[derive(Debug, Serialize, Deserialize)]
struct ThingDocument {
    address: Address,
    #[serde(default)]
    version: String,
    #[serde(rename = "type", default, skip_deserializing)]
    thing_type: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    registry: Option<String>,
    #[serde(default)]
    tradable: bool,
    #[serde(default)]
    spawner: bool,
    #[serde(default, with = "base64_bytes")]
    cert: Vec<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    proof: Option<String>,
    #[serde(default, with = "base64_bytes", skip_serializing_if = "Vec::is_empty")]
    hash: Vec<u8>,
    #[serde(
        default,
        with = "chrono::serde::ts_seconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    updated: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    compression: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    data: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    features: Option<Vec<Feature>>,
}

impl ThingDocument {
    fn into_thing(self, variant: ThingType) -> Result<Thing, DecodeError> {
        let ThingDocument {
            address,
            version,
            registry,
            tradable,
            spawner,
            cert,
            proof,
            hash,
            updated,
            compression,
            data,
            features,
            ..
        } = self;

        let common = Common {
            address,
            version,
            registry,
            tradable,
            spawner,
            cert,
            proof,
            hash,
            updated,
        };

        let payload_error = |reason: &str| DecodeError::Payload {
            variant,
            reason: reason.to_string(),
        };

        // A leaf carries exactly one scalar and no features
        let leaf_data = |data: Option<serde_json::Value>| {
            if features.as_ref().is_some_and(|f| !f.is_empty()) {
                return Err(payload_error("leaf things cannot carry features"));
            }
            data.filter(|d| !d.is_null())
                .ok_or_else(|| payload_error("missing data"))
        };

        match variant {
            ThingType::Container => {
                if data.as_ref().is_some_and(|d| !d.is_null()) {
                    return Err(payload_error("container things cannot carry data"));
                }
                Ok(Thing::container(common, features.clone().unwrap_or_default()))
            }
            ThingType::Text => match leaf_data(data)? {
                serde_json::Value::String(s) => Ok(Thing::text(common, s)),
                _ => Err(payload_error("data must be a string")),
            },
            ThingType::Number => leaf_data(data)?
                .as_f64()
                .map(|n| Thing::number(common, n))
                .ok_or_else(|| payload_error("data must be a number")),
            ThingType::Image => {
                let data = leaf_data(data)?;
                let encoded = data
                    .as_str()
                    .ok_or_else(|| payload_error("data must be a base64 string"))?;
                let bytes = base64_bytes::decode(encoded)
                    .map_err(|e| payload_error(&format!("data is not valid base64: {}", e)))?;
                Ok(Thing::Image(ImageThing {
                    common,
                    compression,
                    data: bytes,
                }))
            }
        }
    }

    fn from_thing(thing: &Thing) -> Self {
        let common = thing.common().clone();
        let (data, features, compression) = match thing {
            Thing::Container(c) => (None, Some(c.features.clone()), None),
            Thing::Text(t) => (Some(serde_json::Value::from(t.data.clone())), None, None),
            Thing::Number(n) => (Some(serde_json::Value::from(n.data)), None, None),
            Thing::Image(i) => (
                Some(serde_json::Value::from(base64_bytes::encode(&i.data))),
                None,
                i.compression.clone(),
            ),
        };

        Self {
            address: common.address,
            version: common.version,
            thing_type: thing.thing_type().code(),
            registry: common.registry,
            tradable: common.tradable,
            spawner: common.spawner,
            cert: common.cert,
            proof: common.proof,
            hash: common.hash,
            updated: common.updated,
            compression,
            data,
            features,
        }
    }
}

/// Base64 (standard alphabet) encoding for byte fields.
mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn encode(bytes: &[u8]) -> String {
        STANDARD.encode(bytes)
    }

    pub fn decode(encoded: &str) -> Result<Vec<u8>, base64::DecodeError> {
        STANDARD.decode(encoded.as_bytes())
    }

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(encoded) => decode(&encoded).map_err(serde::de::Error::custom),
            None => Ok(Vec::new()),
        }
    }
}
