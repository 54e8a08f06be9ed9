pub mod blend;
pub mod placement;
pub mod sprite_source;
