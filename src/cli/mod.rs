use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    // --- Remote Service Args ---
    /// Base URL of the chat endpoint (serves /token and /push)
    #[arg(long, env = "ENDPOINT", default_value = "https://pucci.thembi.me")]
    pub endpoint: String,

    // --- Local Store Args ---
    /// Local store type (file, redis, memory)
    #[arg(long, env = "STORE_TYPE", default_value = "file")]
    pub store_type: String,

    /// Directory holding one file per stored key (file store only)
    #[arg(long, env = "STORE_PATH", default_value = ".pucci")]
    pub store_path: String,

    /// Redis URL for the local store (e.g., redis://127.0.0.1:6379)
    #[arg(long, env = "STORE_REDIS_URL", default_value = "redis://127.0.0.1:6379")]
    pub store_redis_url: String,

    /// Prefix for Redis store keys.
    #[arg(long, env = "STORE_REDIS_PREFIX", default_value = "pucci:")]
    pub store_redis_prefix: String,

    // --- Notification Args ---
    /// Answer given when notification permission is requested
    #[arg(long, env = "NOTIFICATIONS_GRANTED", default_value = "true", action = clap::ArgAction::Set)]
    pub notifications_granted: bool,

    /// Fixed push token. A token is generated once per run if not set.
    #[arg(long, env = "PUSH_TOKEN")]
    pub push_token: Option<String>,

    // --- Session Args ---
    /// JSON file listing known chat users. Defaults to the built-in pair.
    #[arg(long, env = "USERS_PATH")]
    pub users_path: Option<String>,

    /// Username to log in with at startup if no token is stored
    #[arg(long, env = "PUCCI_USERNAME")]
    pub username: Option<String>,

    /// Password to log in with at startup if no token is stored
    #[arg(long, env = "PUCCI_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Seconds between background refreshes. 0 disables the timer.
    #[arg(long, env = "REFRESH_SECS", default_value = "0")]
    pub refresh_secs: u64,

    // --- General App Args ---
    /// Enable debug logging/output
    #[arg(long, env = "DEBUG", default_value = "false")]
    pub debug: bool,
}
