use std::{env, fs, path::Path};

use crate::{
    domain::{ChatId, Destination},
    errors::Error,
    Result,
};

/// Typed process configuration, loaded once at startup and read-only after.
#[derive(Clone, Debug)]
pub struct Config {
    /// Telegram bot credential.
    pub bot_token: String,
    /// Externally reachable base URL, used when printing relay links.
    pub public_base_url: String,
    /// HTTP listen port.
    pub port: u16,
    /// Optional global destination for operational notifications. Stored
    /// pre-resolved (never as a token) so the notification sink has nothing
    /// to decode.
    pub log_destination: Option<Destination>,
}

impl Config {
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));

        let bot_token = env_str("BOT_TOKEN").and_then(non_empty).ok_or_else(|| {
            Error::Config("BOT_TOKEN environment variable is required".to_string())
        })?;

        let public_base_url = env_str("PUBLIC_BASE_URL")
            .and_then(non_empty)
            .map(|u| u.trim_end_matches('/').to_string())
            .ok_or_else(|| {
                Error::Config("PUBLIC_BASE_URL environment variable is required".to_string())
            })?;

        let port = match env_str("SERVER_PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| Error::Config(format!("invalid SERVER_PORT: {raw}")))?,
            None => 5000,
        };

        let log_destination = match env_str("LOG_CHAT_ID") {
            Some(raw) => {
                let chat = raw
                    .trim()
                    .parse::<i64>()
                    .map_err(|_| Error::Config(format!("invalid LOG_CHAT_ID: {raw}")))?;
                let thread = env_str("LOG_THREAD_ID").and_then(non_empty);
                Some(Destination {
                    chat: ChatId(chat),
                    thread,
                })
            }
            None => None,
        };

        Ok(Self {
            bot_token,
            public_base_url,
            port,
            log_destination,
        })
    }
}

fn env_str(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }
        if env::var_os(key).is_some() {
            continue; // do not override existing env
        }

        let mut val = v.trim().to_string();
        // Strip optional surrounding quotes.
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = val[1..val.len() - 1].to_string();
        }

        env::set_var(key, val);
    }
}
