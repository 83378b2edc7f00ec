use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the PPOB API
    #[clap(long, env, default_value = "https://take-home-test-api.nutech-integrasi.com")]
    pub api_base_url: String,

    /// File holding the persisted session token
    #[clap(long, env, default_value = ".ppob-token")]
    pub token_path: PathBuf,
}
