use dotenvy::dotenv;
use once_cell::sync::Lazy;
use std::env;

pub static CONFIG: Lazy<Config> = Lazy::new(|| {
    dotenv().ok(); // Load .env file if present
    Config {
        agent_api_url: get_env_or_default("AGENT_API_URL", "http://localhost:8000"),
        listen_port: get_env_or_default("LOOKOUT_PORT", "3000")
            .parse()
            .unwrap_or_else(|_| panic!("LOOKOUT_PORT must be a valid port number")),
    }
});

pub struct Config {
    /// Base URL of the remote intelligence agent (search/status backend).
    pub agent_api_url: String,
    /// Port the web front end binds to.
    pub listen_port: u16,
}

fn get_env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}
