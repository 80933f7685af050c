mod actor_table;
mod pending_intent_table;
mod relay_settings_table;
mod world_static_table;

pub use actor_table::*;
pub use pending_intent_table::*;
pub use relay_settings_table::*;
pub use world_static_table::*;
