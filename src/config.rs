use std::{fs, path::Path};

use serde::Deserialize;
use tracing::info;

use crate::error::ConfigError;
use crate::model::entity::Name;

pub const DEFAULT_SUBJECT: &str = "Secret Santa {{ year }}!";
pub const DEFAULT_BODY: &str = "Hi {{ giver_names }},

You are the Secret Santa for: {{ receiver_names }}!

Merry Christmas!";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MemberConfig {
    pub group: Vec<Name>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub exclude: Vec<Name>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Templates {
    #[serde(default = "default_subject")]
    pub subject: String,
    #[serde(default = "default_body")]
    pub body: String,
}

impl Default for Templates {
    fn default() -> Self {
        Templates { subject: default_subject(), body: default_body() }
    }
}

fn default_subject() -> String {
    DEFAULT_SUBJECT.to_string()
}

fn default_body() -> String {
    DEFAULT_BODY.to_string()
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub members: Vec<MemberConfig>,
    #[serde(default, rename = "email_templates")]
    pub templates: Templates,
}

impl Config {
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        let text = fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        let config = Config::parse(&text)
            .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })?;
        info!(path = %path.display(), members = config.members.len(), "loaded config");
        Ok(config)
    }

    pub fn parse(text: &str) -> Result<Config, serde_json::Error> {
        serde_json::from_str(text)
    }
}
