//! login / register / logout / whoami commands

use std::io::BufRead;
use std::path::Path;

use anyhow::{Context, Result};

use crate::client::auth::{self, Registration};
use crate::client::NotesApi;

/// Password from the flag, else the first line of stdin
pub fn resolve_password(password: Option<String>) -> Result<String> {
    if let Some(p) = password {
        return Ok(p);
    }
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read password from stdin")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

pub async fn run_login<A: NotesApi>(
    api: &A,
    state_dir: &Path,
    username: &str,
    password: &str,
    quiet: bool,
) -> Result<()> {
    let message = auth::login(api, state_dir, username, password)
        .await
        .context("Login failed")?;
    if !quiet {
        println!("{}", message);
    }
    Ok(())
}

pub async fn run_register<A: NotesApi>(
    api: &A,
    registration: &Registration,
    quiet: bool,
) -> Result<()> {
    let message = auth::register(api, registration)
        .await
        .context("Registration failed")?;
    if !quiet {
        println!("{}", message);
    }
    Ok(())
}

pub async fn run_logout(state_dir: &Path, quiet: bool) -> Result<()> {
    let removed = auth::logout(state_dir).await.context("Failed to remove session")?;
    if !quiet {
        println!("{}", if removed { "Signed out" } else { "Not signed in" });
    }
    Ok(())
}

pub async fn run_whoami(state_dir: &Path) -> Result<()> {
    match auth::whoami(state_dir).await.context("Failed to read session")? {
        Some(username) => println!("{}", username),
        None => println!("Not signed in"),
    }
    Ok(())
}
