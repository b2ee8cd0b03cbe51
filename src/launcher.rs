use log::{error, info};

use crate::error::LaunchError;

/// Something that can start a game by app id
pub trait Launch {
    fn launch(&self, app_id: u32) -> Result<(), LaunchError>;
}

/// Hands `steam://rungameid/<id>` to the OS URI handler
#[derive(Debug, Default, Clone, Copy)]
pub struct SteamLauncher;

/// The URI Steam registers for starting a game
pub fn launch_uri(app_id: u32) -> String {
    format!("steam://rungameid/{}", app_id)
}

impl Launch for SteamLauncher {
    fn launch(&self, app_id: u32) -> Result<(), LaunchError> {
        let uri = launch_uri(app_id);
        info!("Launching {}", uri);

        open::that(&uri).map_err(|e| {
            error!("Failed to open {}: {}", uri, e);
            LaunchError::from(e)
        })
    }
}
