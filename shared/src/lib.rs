pub mod actor;
pub mod authority;
pub mod bitmask_flags;
pub mod config;
pub mod constants;
pub mod error;
pub mod ground;
pub mod integrator;
pub mod intent;
pub mod rapier_world;
pub mod relay;
pub mod replication;
pub mod sequence;
pub mod session;
pub mod ticker;
pub mod transport;

pub use actor::{ActorBody, ActorId, ActorState, PendingIntent};
pub use authority::{AuthorityToken, PeerId, Role};
pub use bitmask_flags::{BitmaskFlags, FlagBitmask, LayerMask, SurfaceLayer};
pub use config::{ActorConfig, ConnectionConfig, RelayConfig};
pub use error::RelayError;
pub use ground::{FlatGround, GroundProbe, NoGround};
pub use integrator::{BallisticIntegrator, FrozenIntegrator, Integrator, advance_vertical_velocity};
pub use intent::{Intent, IntentMessage, IntentSampler};
pub use rapier_world::{
    ColliderShapeDef, KinematicIntegrator, StaticQueryWorld, WorldStaticDef, collider_from_def,
};
pub use relay::{MotionRelay, Physics};
pub use replication::{
    ActorSnapshot, ReplicaView, ReplicationEvent, ReplicationSink, SnapshotLog, SnapshotSender,
    snapshot_channel,
};
pub use sequence::{IntentSeq, SequenceGate};
pub use session::{SessionEvent, SessionObserver};
pub use ticker::FixedTicker;
pub use transport::{IntentSender, IntentSink, NullSink, intent_channel};
