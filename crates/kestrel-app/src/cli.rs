use clap::Parser;

/// Kestrel: a terminal chat client with live updates.
#[derive(Parser, Debug)]
#[command(name = "kestrel", version, about)]
pub struct Args {
    /// Username to chat as. Created on the backend if it does not exist.
    pub username: String,

    /// Config file path override.
    #[arg(long)]
    pub config: Option<String>,

    /// Log filter override (e.g. `debug`, `kestrel=trace`).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Run without the Redis feed. Views refresh only on user actions.
    #[arg(long)]
    pub offline: bool,
}

pub fn parse() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_username_and_flags() {
        let args = Args::parse_from([
            "kestrel",
            "ada",
            "--config",
            "/tmp/k.toml",
            "--log-level",
            "debug",
            "--offline",
        ]);
        assert_eq!(args.username, "ada");
        assert_eq!(args.config.as_deref(), Some("/tmp/k.toml"));
        assert_eq!(args.log_level.as_deref(), Some("debug"));
        assert!(args.offline);
    }

    #[test]
    fn username_is_required() {
        assert!(Args::try_parse_from(["kestrel"]).is_err());
    }

    #[test]
    fn flags_default_off() {
        let args = Args::parse_from(["kestrel", "bob"]);
        assert!(args.config.is_none());
        assert!(args.log_level.is_none());
        assert!(!args.offline);
    }
}
