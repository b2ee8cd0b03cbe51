pub mod installed;
pub mod item;
pub mod steam_api;

pub use installed::{scan_installed, InstalledSet};
pub use item::{build_items, Item};
pub use steam_api::{Game, SteamClient};
