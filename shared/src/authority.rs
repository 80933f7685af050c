//! Process roles and the authority capability.
//!
//! A relay either holds an [`AuthorityToken`] and may mutate simulation state, or it is an
//! observer holding read-only replicas. The token cannot be cloned or built outside this
//! crate, so a relay only becomes authoritative through [`crate::MotionRelay::authority`].

/// Identifier of a connected process (server, client, bot).
pub type PeerId = u64;

/// Role of the local process, fixed at construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Authority,
    Observer,
}

/// Capability proving the holder may write actor simulation state.
#[derive(Debug)]
pub struct AuthorityToken {
    _private: (),
}

impl AuthorityToken {
    pub(crate) fn grant() -> Self {
        Self { _private: () }
    }
}
