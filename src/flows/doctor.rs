//! Doctor - configuration and backend reachability

use anyhow::Result;
use colored::Colorize;

use crate::client::auth;
use crate::client::NotesApi;
use crate::config::Config;

/// One diagnostic line
#[derive(Debug, Clone)]
pub struct Check {
    pub name: String,
    pub ok: bool,
    pub detail: String,
    pub required: bool,
}

impl Check {
    pub fn render(&self, color: bool) -> String {
        let mark = if self.ok { "✓" } else { "✗" };
        let mark = match (color, self.ok) {
            (false, _) => mark.normal(),
            (true, true) => mark.green(),
            (true, false) => mark.red(),
        };
        let required = if self.required {
            "required"
        } else {
            "optional"
        };
        format!("{} {} ({}) - {}", mark, self.name, required, self.detail)
    }
}

/// Run every check against `config`
pub async fn check_all<A: NotesApi>(api: &A, config: &Config) -> Vec<Check> {
    let mut checks = Vec::new();

    checks.push(Check {
        name: "api url".to_string(),
        ok: true,
        detail: config.api_url.clone(),
        required: true,
    });

    let reachable = api.ping().await;
    checks.push(Check {
        name: "backend".to_string(),
        ok: reachable,
        detail: if reachable {
            "reachable".to_string()
        } else {
            format!("no answer within {}s", config.timeout.as_secs())
        },
        required: true,
    });

    let session = auth::whoami(&config.state_dir).await;
    checks.push(Check {
        name: "session".to_string(),
        ok: matches!(session, Ok(Some(_))),
        detail: match session {
            Ok(Some(user)) => format!("signed in as {}", user),
            Ok(None) => format!("not signed in ({})", config.state_dir.display()),
            Err(e) => format!("unreadable session file: {}", e),
        },
        required: false,
    });

    checks
}

/// Run the doctor command
pub async fn run_doctor<A: NotesApi>(api: &A, config: &Config, color: bool) -> Result<()> {
    let checks = check_all(api, config).await;
    for check in &checks {
        println!("{}", check.render(color));
    }

    if checks.iter().any(|c| c.required && !c.ok) {
        eprintln!("\n⚠️  The notes backend is not reachable!");
    }
    Ok(())
}
