// Copyright (c) 2025 - Cowboy AI, Inc.
//! Event Versioning Infrastructure
//!
//! Provides upcasting support for event schema evolution. When event schemas
//! change over time, upcasters transform old versions to the latest version
//! on-read.
//!
//! # Design Principles
//!
//! 1. **Upcasting on Read**: Old events are transformed when loaded from the event store
//! 2. **Application Sees Latest Only**: Business logic only handles current versions
//! 3. **Chain of Upcasters**: Multiple version migrations compose
//!
//! # Architecture
//!
//! ```text
//! Event Store → Raw JSON → Upcast → Deserialize → Application
//!                            ↓
//!              V1 → V2 → V3 (chain per event type)
//! ```
//!
//! Every store read path asks the registry to migrate the raw JSON before
//! typed deserialization; an empty registry is a pass-through.

use std::collections::HashMap;
use std::fmt;

use crate::errors::SchedulingError;

/// Error type for upcasting operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpcastError {
    /// Version not supported by the available upcasters
    UnsupportedVersion { from: u32, to: u32, found: u32 },

    /// JSON transformation failed
    TransformationFailed(String),

    /// Missing required field in old version
    MissingField(String),
}

impl fmt::Display for UpcastError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpcastError::UnsupportedVersion { from, to, found } => {
                write!(
                    f,
                    "Upcaster expects version {}, got version {}. Can only upcast to version {}",
                    from, found, to
                )
            }
            UpcastError::TransformationFailed(msg) => {
                write!(f, "Event transformation failed: {}", msg)
            }
            UpcastError::MissingField(field) => {
                write!(f, "Required field '{}' missing in old event version", field)
            }
        }
    }
}

impl std::error::Error for UpcastError {}

impl From<UpcastError> for SchedulingError {
    fn from(err: UpcastError) -> Self {
        SchedulingError::Serialization(err.to_string())
    }
}

/// Trait for upcasting one event type from one schema version to the next
///
/// Upcasters work on JSON values so old shapes never need Rust types.
/// The transformation happens between store read and typed deserialization.
pub trait Upcaster: Send + Sync {
    /// Version this upcaster expects as input
    fn from_version(&self) -> u32;

    /// Version this upcaster produces as output
    fn to_version(&self) -> u32;

    /// Transform event JSON from old version to new version
    ///
    /// Implementations must update the `event_version` field; helpers
    /// [`get_event_version`] and [`set_event_version`] are provided.
    fn upcast(&self, value: serde_json::Value) -> Result<serde_json::Value, UpcastError>;
}

/// Chain of upcasters migrating one event type through multiple versions
pub struct UpcasterChain {
    upcasters: Vec<Box<dyn Upcaster>>,
}

impl UpcasterChain {
    pub fn new() -> Self {
        Self {
            upcasters: Vec::new(),
        }
    }

    /// Add an upcaster; add in version order (v1→v2, then v2→v3, ...)
    pub fn add<U: Upcaster + 'static>(mut self, upcaster: U) -> Self {
        self.upcasters.push(Box::new(upcaster));
        self
    }

    /// Latest version this chain can produce
    pub fn latest_version(&self) -> Option<u32> {
        self.upcasters.last().map(|u| u.to_version())
    }

    /// Apply all applicable upcasters in order until the latest version
    pub fn upcast_to_latest(
        &self,
        mut value: serde_json::Value,
        current_version: u32,
    ) -> Result<serde_json::Value, UpcastError> {
        let mut version = current_version;

        for upcaster in &self.upcasters {
            if version == upcaster.from_version() {
                value = upcaster.upcast(value)?;
                version = upcaster.to_version();
            }
        }

        Ok(value)
    }
}

impl Default for UpcasterChain {
    fn default() -> Self {
        Self::new()
    }
}

/// Registry of upcaster chains keyed by stable event type name
///
/// The event stores run every raw event JSON through the registry before
/// deserializing into [`crate::events::ScheduleEvent`]. An empty registry
/// passes events through unchanged.
#[derive(Default)]
pub struct UpcasterRegistry {
    chains: HashMap<String, UpcasterChain>,
}

impl UpcasterRegistry {
    pub fn new() -> Self {
        Self {
            chains: HashMap::new(),
        }
    }

    /// Register the chain for one event type, replacing any existing chain
    pub fn register(mut self, event_type: impl Into<String>, chain: UpcasterChain) -> Self {
        self.chains.insert(event_type.into(), chain);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }

    /// Migrate raw event JSON to the latest schema for its type
    ///
    /// Events without a registered chain pass through unchanged. The
    /// version is read from the JSON's `event_version` field.
    pub fn upcast(
        &self,
        event_type: &str,
        value: serde_json::Value,
    ) -> Result<serde_json::Value, UpcastError> {
        match self.chains.get(event_type) {
            Some(chain) => {
                let version = get_event_version(&value)?;
                chain.upcast_to_latest(value, version)
            }
            None => Ok(value),
        }
    }
}

/// Helper to extract event version from JSON
pub fn get_event_version(value: &serde_json::Value) -> Result<u32, UpcastError> {
    value
        .get("event_version")
        .and_then(|v| v.as_u64())
        .map(|v| v as u32)
        .ok_or_else(|| UpcastError::MissingField("event_version".to_string()))
}

/// Helper to set event version in JSON
pub fn set_event_version(value: &mut serde_json::Value, version: u32) -> Result<(), UpcastError> {
    if let Some(obj) = value.as_object_mut() {
        obj.insert("event_version".to_string(), serde_json::json!(version));
        Ok(())
    } else {
        Err(UpcastError::TransformationFailed(
            "Event is not a JSON object".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Sample migration: v1 FeedbackSubmitted had no comment_type field
    struct AddCommentTypeV1ToV2;

    impl Upcaster for AddCommentTypeV1ToV2 {
        fn from_version(&self) -> u32 {
            1
        }

        fn to_version(&self) -> u32 {
            2
        }

        fn upcast(&self, mut value: serde_json::Value) -> Result<serde_json::Value, UpcastError> {
            let obj = value.as_object_mut().ok_or_else(|| {
                UpcastError::TransformationFailed("Not an object".to_string())
            })?;
            obj.entry("comment_type")
                .or_insert(serde_json::json!("general"));
            set_event_version(&mut value, 2)?;
            Ok(value)
        }
    }

    #[test]
    fn test_get_event_version() {
        let json = serde_json::json!({ "event_version": 2, "data": "x" });
        assert_eq!(get_event_version(&json).unwrap(), 2);

        let missing = serde_json::json!({ "data": "x" });
        assert!(get_event_version(&missing).is_err());
    }

    #[test]
    fn test_chain_migrates_old_event() {
        let chain = UpcasterChain::new().add(AddCommentTypeV1ToV2);
        assert_eq!(chain.latest_version(), Some(2));

        let v1 = serde_json::json!({ "event_version": 1, "comment_text": "move CS101" });
        let v2 = chain.upcast_to_latest(v1, 1).unwrap();

        assert_eq!(get_event_version(&v2).unwrap(), 2);
        assert_eq!(v2["comment_type"], "general");
    }

    #[test]
    fn test_chain_leaves_current_event_alone() {
        let chain = UpcasterChain::new().add(AddCommentTypeV1ToV2);

        let v2 = serde_json::json!({
            "event_version": 2,
            "comment_text": "move CS101",
            "comment_type": "time_change_request"
        });
        let out = chain.upcast_to_latest(v2.clone(), 2).unwrap();
        assert_eq!(out, v2);
    }

    #[test]
    fn test_registry_routes_by_event_type() {
        let registry = UpcasterRegistry::new().register(
            "feedback_submitted",
            UpcasterChain::new().add(AddCommentTypeV1ToV2),
        );

        let v1 = serde_json::json!({ "event_version": 1 });
        let migrated = registry.upcast("feedback_submitted", v1.clone()).unwrap();
        assert_eq!(get_event_version(&migrated).unwrap(), 2);

        // Unregistered types pass through without even requiring a version field
        let other = serde_json::json!({ "anything": true });
        let untouched = registry.upcast("exam_added", other.clone()).unwrap();
        assert_eq!(untouched, other);
    }
}
