use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::models::ReadingSession;

/// Load the session log. A missing file is an empty log, not an error.
pub fn load_sessions(path: &Path) -> Result<Vec<ReadingSession>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let contents = fs::read_to_string(path)?;
    let sessions: Vec<ReadingSession> = serde_json::from_str(&contents)?;
    Ok(sessions)
}

/// Persist the full session log.
pub fn save_sessions(path: &Path, sessions: &[ReadingSession]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(sessions)?;
    fs::write(path, json)?;
    Ok(())
}

/// Append one session to the log.
pub fn append_session(path: &Path, session: ReadingSession) -> Result<()> {
    let mut sessions = load_sessions(path)?;
    sessions.push(session);
    save_sessions(path, &sessions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use tempfile::TempDir;
    use uuid::Uuid;

    fn make_session(title: &str) -> ReadingSession {
        let start = Utc::now() - Duration::minutes(30);
        ReadingSession::new(Uuid::now_v7(), title, start, Utc::now())
    }

    #[test]
    fn test_missing_log_is_empty() {
        let dir = TempDir::new().unwrap();
        let log = dir.path().join("sessions.json");
        assert!(load_sessions(&log).unwrap().is_empty());
    }

    #[test]
    fn test_append_and_reload() {
        let dir = TempDir::new().unwrap();
        let log = dir.path().join("sessions.json");

        append_session(&log, make_session("Dune")).unwrap();
        append_session(&log, make_session("LotR")).unwrap();

        let sessions = load_sessions(&log).unwrap();
        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0].book_title, "Dune");
        assert_eq!(sessions[1].book_title, "LotR");
    }
}
