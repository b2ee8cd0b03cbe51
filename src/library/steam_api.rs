use log::{info, warn};
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::error::ApiError;

/// Default Steam Web API endpoint
pub const STEAM_API_BASE_URL: &str = "https://api.steampowered.com";

const OWNED_GAMES_PATH: &str = "IPlayerService/GetOwnedGames/v0001/";

/// An owned game as returned by `GetOwnedGames`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Game {
    #[serde(rename = "appid")]
    pub app_id: u32,
    pub name: String,
    /// Total playtime in minutes
    #[serde(default)]
    pub playtime_forever: u32,
    /// Unix seconds, 0 when never played
    #[serde(default, rename = "rtime_last_played")]
    pub last_played: i64,
}

#[derive(Debug, Default, Deserialize)]
struct OwnedGames {
    #[serde(default)]
    game_count: u32,
    #[serde(default)]
    games: Vec<Game>,
}

#[derive(Debug, Deserialize)]
struct OwnedGamesResponse {
    #[serde(default)]
    response: OwnedGames,
}

/// Steam Web API client
#[derive(Clone)]
pub struct SteamClient {
    client: Client,
    base_url: String,
}

impl SteamClient {
    /// Create a client against the public Steam API
    pub fn new() -> Self {
        Self::with_base_url(STEAM_API_BASE_URL)
    }

    /// Create a client against another base URL
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Fetch every game owned by `steam_id`, sorted by name.
    pub async fn fetch_owned_games(
        &self,
        api_key: &str,
        steam_id: &str,
    ) -> Result<Vec<Game>, ApiError> {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), OWNED_GAMES_PATH);

        info!("Fetching owned games for account {}", steam_id);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("key", api_key),
                ("steamid", steam_id),
                ("format", "json"),
                ("include_appinfo", "true"),
                ("include_played_free_games", "true"),
            ])
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized);
        }
        if !status.is_success() {
            return Err(ApiError::Status(status));
        }

        let body = response.text().await?;
        let games = parse_owned_games(&body)?;

        info!("Steam reports {} owned games", games.len());
        Ok(games)
    }
}

impl Default for SteamClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode a `GetOwnedGames` body and sort the games by name (ordinal).
pub fn parse_owned_games(body: &str) -> Result<Vec<Game>, serde_json::Error> {
    let parsed: OwnedGamesResponse = serde_json::from_str(body)?;
    let OwnedGames { game_count, mut games } = parsed.response;

    if game_count as usize != games.len() {
        warn!(
            "game_count is {} but {} games were returned",
            game_count,
            games.len()
        );
    }

    sort_by_name(&mut games);
    Ok(games)
}

/// Case-sensitive ordinal sort on the display name
pub fn sort_by_name(games: &mut [Game]) {
    games.sort_by(|a, b| a.name.cmp(&b.name));
}
