use chrono::{DateTime, Local};

use super::installed::InstalledSet;
use super::steam_api::Game;

/// A display-ready game row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    title: String,
    description: String,
    app_id: u32,
    installed: bool,
    last_played: i64,
}

impl Item {
    /// Project a game into a row, marking it installed if its id is in `installed`
    pub fn from_game(game: &Game, installed: &InstalledSet) -> Self {
        let is_installed = installed.contains(&game.app_id.to_string());

        Self {
            title: game.name.clone(),
            description: describe(game, is_installed),
            app_id: game.app_id,
            installed: is_installed,
            last_played: game.last_played,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn app_id(&self) -> u32 {
        self.app_id
    }

    pub fn installed(&self) -> bool {
        self.installed
    }

    pub fn last_played(&self) -> i64 {
        self.last_played
    }

    /// Text the live filter matches against
    pub fn filter_value(&self) -> &str {
        &self.title
    }
}

/// Build rows for every game, keeping the order of `games`
pub fn build_items(games: &[Game], installed: &InstalledSet) -> Vec<Item> {
    games
        .iter()
        .map(|game| Item::from_game(game, installed))
        .collect()
}

/// `Last Played: <date> - <hours>hrs`, plus ` INSTALLED` when installed
pub fn describe(game: &Game, installed: bool) -> String {
    let mut description = format!(
        "Last Played: {} - {}hrs",
        format_last_played(game.last_played),
        game.playtime_forever / 60
    );

    if installed {
        description.push_str(" INSTALLED");
    }

    description
}

/// Local `YYYY-MM-DD`, or "Never" for a zero (or unrepresentable) timestamp
pub fn format_last_played(timestamp: i64) -> String {
    if timestamp == 0 {
        return "Never".to_string();
    }

    DateTime::from_timestamp(timestamp, 0)
        .map(|utc| utc.with_timezone(&Local).format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "Never".to_string())
}
