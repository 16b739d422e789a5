use std::io::{self, BufRead, Write};

use registrard::config::Settings;
use registrard::{db, ipc, logging};
use tracing::{debug, info, warn};

fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let settings = Settings::load()?;
    logging::init(&settings);

    let mut state = ipc::AppState {
        workspace: None,
        db: None,
    };
    if let Some(path) = settings.workspace.clone() {
        match db::open_db(&path) {
            Ok(conn) => {
                info!(workspace = %path.display(), "workspace opened from config");
                state.workspace = Some(path);
                state.db = Some(conn);
            }
            Err(e) => warn!(
                workspace = %path.display(),
                error = %e,
                "configured workspace failed to open"
            ),
        }
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(v) => v,
            Err(_) => break,
        };
        if line.trim().is_empty() {
            continue;
        }

        let req: ipc::Request = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                // Can't reply without id.
                let resp = serde_json::json!({
                    "ok": false,
                    "error": { "code": "bad_json", "message": e.to_string() }
                });
                let _ = writeln!(stdout, "{resp}");
                let _ = stdout.flush();
                continue;
            }
        };

        debug!(id = %req.id, method = %req.method, "request");
        let resp = ipc::handle_request(&mut state, req);
        let _ = writeln!(
            stdout,
            "{}",
            serde_json::to_string(&resp).unwrap_or_else(|_| "{\"ok\":false}".to_string())
        );
        let _ = stdout.flush();
    }
    Ok(())
}
