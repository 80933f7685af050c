use thiserror::Error;

use crate::ActorId;

/// Errors reported by the motion relay.
///
/// Every variant is local and recoverable: the relay keeps running and the caller decides
/// whether to retry. No operation mutates actor state before returning one of these.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RelayError {
    /// The operation referenced an actor this relay does not know about.
    #[error("Actor {actor_id} not found")]
    NotFound { actor_id: ActorId },

    /// An authority-only operation was invoked on an observer, or an intent came from a
    /// peer that does not control the actor.
    #[error("Cannot {operation} on actor {actor_id} - caller lacks the required authority")]
    Unauthorized {
        actor_id: ActorId,
        operation: &'static str,
    },

    /// A relay-wide authority-only operation was invoked on an observer.
    #[error("Cannot {operation} - this relay is not the authority")]
    NotAuthority { operation: &'static str },

    /// An actor with this id is already registered.
    #[error("Actor {actor_id} already exists")]
    AlreadyExists { actor_id: ActorId },

    /// Configuration values were rejected during validation or parsing.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl RelayError {
    pub(crate) fn unauthorized(actor_id: ActorId, operation: &'static str) -> Self {
        Self::Unauthorized {
            actor_id,
            operation,
        }
    }
}
