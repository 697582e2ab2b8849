//! Stored layout shapes.
//!
//! Each admin screen stores its canvas differently: the page builder keeps a
//! flat `items` list, the org chart keeps `nodes` plus `edges`. A
//! [`LayoutFormat`] ties a payload type to one of those shapes so sessions,
//! stores and the CLI can stay generic over the screen.

use std::fmt::Debug;

use canvas::codec::CodecError;
use canvas::doc::{CanvasDocument, Payload};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

pub trait LayoutFormat: Send + Sync + 'static {
    /// What each item carries besides its geometry.
    type Payload: Payload + Serialize + DeserializeOwned + Clone + Debug + Send + Sync;

    /// Document content the canvas does not position (org-chart edges).
    type Extra: Default + Clone + Debug + PartialEq + Send + Sync;

    /// Short name used in logs.
    const NAME: &'static str;

    /// Read a stored layout field.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError`] when the stored value is not a layout of this shape.
    fn decode(stored: &Value) -> Result<(CanvasDocument<Self::Payload>, Self::Extra), CodecError>;

    /// Produce the value to store in the layout field.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError`] when a payload cannot be serialized as an object.
    fn encode(doc: &CanvasDocument<Self::Payload>, extra: &Self::Extra) -> Result<Value, CodecError>;
}
