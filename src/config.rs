//! Configuration and CLI argument handling

use std::{path::PathBuf, time::Duration};

use clap::Parser;

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "plan-eats")]
#[command(about = "Cooking-mode server: recipe steps with per-step countdown timers")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Recipe document (JSON) to cook
    #[arg(short, long)]
    pub recipe: PathBuf,

    /// Milliseconds between timer ticks; each tick counts as one second
    #[arg(long, default_value = "1000", value_parser = clap::value_parser!(u64).range(1..))]
    pub tick_millis: u64,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply() {
        let config = Config::try_parse_from(["plan-eats", "--recipe", "pasta.json"]).unwrap();
        assert_eq!(config.address(), "127.0.0.1:20554");
        assert_eq!(config.tick_period(), Duration::from_secs(1));
        assert_eq!(config.log_level(), "info");
    }

    #[test]
    fn verbose_and_fast_clock() {
        let config = Config::try_parse_from([
            "plan-eats", "-r", "pasta.json", "-v", "--tick-millis", "50", "-p", "8080",
        ])
        .unwrap();
        assert_eq!(config.log_level(), "debug");
        assert_eq!(config.tick_period(), Duration::from_millis(50));
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn recipe_is_required() {
        assert!(Config::try_parse_from(["plan-eats"]).is_err());
    }

    #[test]
    fn zero_tick_period_is_rejected() {
        assert!(Config::try_parse_from(["plan-eats", "-r", "x.json", "--tick-millis", "0"]).is_err());
    }
}
