use crate::shared::sprite::Sprite;

/// Looks up and decodes the sprite for a filter identifier.
///
/// `None` means the filter is unknown or unreadable; callers treat that as
/// "draw nothing" rather than an error.
pub trait SpriteSource: Send {
    fn load(&self, filter_id: &str) -> Option<Sprite>;
}
