//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;
use peace_config::PeaceConfig;
use peace_presence::Visibility;

#[derive(Debug, Parser)]
#[command(
    name = "peace-online",
    about = "Live count of online users from the presence server"
)]
pub struct Args {
    /// Presence server WebSocket URL.
    #[arg(long)]
    pub url: Option<String>,

    /// Config file. Defaults to the platform config directory.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Cookie file holding the access token.
    #[arg(long)]
    pub cookie_file: Option<String>,

    /// Access token. Takes precedence over any cookie file.
    #[arg(long)]
    pub token: Option<String>,

    /// Start as if the view were hidden.
    #[arg(long)]
    pub hidden: bool,
}

impl Args {
    /// Apply command-line overrides. These win over file and environment.
    pub fn apply(&self, config: &mut PeaceConfig) {
        if let Some(url) = &self.url {
            config.presence.server_url = url.clone();
        }
        if let Some(path) = &self.cookie_file {
            config.presence.cookie_file = path.clone();
        }
    }

    pub fn visibility(&self) -> Visibility {
        if self.hidden {
            Visibility::Hidden
        } else {
            Visibility::Visible
        }
    }
}
