use clap::Parser;

#[derive(Parser)]
#[command(name = "jirafrog")]
#[command(about = "Browse the Jira issues assigned to you in open sprints", version)]
#[command(after_help = "KEYS:
    Up/Down     Move the selection
    Enter       Open the selected issue in your browser
    q           Quit

Credentials are read from config.toml in the jirafrog config directory
and requested interactively on first run. Set JIRAFROG_LOG=debug for logs.")]
pub struct Cli {}
