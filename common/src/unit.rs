//! Marker types.

/// Marker type tagging the moment an entity was created at.
#[derive(Clone, Copy, Debug)]
pub struct Creation;
