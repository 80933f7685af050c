mod db_vec2;
mod shapes;

pub use db_vec2::DbVec2;
pub use shapes::{ColliderShape, DbCapsule, DbRoundCuboid};
