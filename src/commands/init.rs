use crate::config::Config;
use crate::error::{JiraFrogError, Result};
use crate::terminal;

/// First-run onboarding: ask for the server, username and API token.
pub fn prompt() -> Result<Config> {
    println!("Looks like jirafrog has not been configured yet. Let's get started:");

    let server = required(terminal::read_line("Enter your server URL: ")?, "server URL")?;
    let username = required(terminal::read_line("Enter your username: ")?, "username")?;
    let token = required_secret(terminal::read_secret("Enter your API key: ")?, "API key")?;

    Ok(Config {
        server,
        username,
        token,
    })
}

fn required(answer: String, field: &'static str) -> Result<String> {
    let answer = answer.trim();
    if answer.is_empty() {
        return Err(JiraFrogError::EmptyField(field));
    }
    Ok(answer.to_string())
}

/// Secrets are stored exactly as typed.
fn required_secret(answer: String, field: &'static str) -> Result<String> {
    if answer.is_empty() {
        return Err(JiraFrogError::EmptyField(field));
    }
    Ok(answer)
}
