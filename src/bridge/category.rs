use crate::models::AppCategory;

/// Classify an app from its package-manager flags. Precedence: Game before
/// System before Other: an app flagged as both game and system is a Game.
pub fn classify(system: bool, game: bool) -> AppCategory {
    if game {
        AppCategory::Game
    } else if system {
        AppCategory::System
    } else {
        AppCategory::Other
    }
}
