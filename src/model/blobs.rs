//! Opaque serialized blobs: the root signature and the view-id state.
//!
//! Their contents are produced and consumed by the respective subsystems; the metadata only
//! wraps and unwraps the buffers.

/// A serialized root signature.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct RootSignature {
    serialized: Vec<u8>,
}

impl RootSignature {
    /// Wraps an already serialized root signature.
    #[must_use]
    pub fn from_serialized(serialized: Vec<u8>) -> Self {
        RootSignature { serialized }
    }

    /// The serialized form.
    #[must_use]
    pub fn serialized(&self) -> &[u8] {
        &self.serialized
    }

    /// Returns `true` if there is no root signature.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.serialized.is_empty()
    }

    /// Drops the root signature.
    pub fn clear(&mut self) {
        self.serialized.clear();
    }

    /// Replaces the contents with a serialized root signature.
    pub fn deserialize(&mut self, serialized: &[u8]) {
        self.serialized = serialized.to_vec();
    }
}

/// Serialized view-id dependency state.
///
/// A state whose words are all zero is equivalent to no state at all and is normalized to the
/// empty zero state.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct ViewIdState {
    serialized: Vec<u32>,
}

impl ViewIdState {
    /// Wraps serialized words, normalizing an all-zero buffer to the zero state.
    #[must_use]
    pub fn from_serialized(serialized: &[u32]) -> Self {
        let mut state = ViewIdState::default();
        state.deserialize(serialized);
        state
    }

    /// The serialized form. Empty for the zero state.
    #[must_use]
    pub fn serialized(&self) -> &[u32] {
        &self.serialized
    }

    /// Returns `true` if every serialized word is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.serialized.iter().all(|word| *word == 0)
    }

    /// Restores the zero state.
    pub fn clear(&mut self) {
        self.serialized.clear();
    }

    /// Replaces the contents with serialized words.
    pub fn deserialize(&mut self, serialized: &[u32]) {
        if serialized.iter().all(|word| *word == 0) {
            self.serialized.clear();
        } else {
            self.serialized = serialized.to_vec();
        }
    }
}
