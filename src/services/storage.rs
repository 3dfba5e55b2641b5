use std::path::PathBuf;

/// Appends one line to the audit log. Failures are logged, never raised.
pub fn audit(action: &str, data: serde_json::Value) {
    let path = match audit_path() {
        Ok(p) => p,
        Err(e) => {
            tracing::warn!(error = %e, "audit log unavailable");
            return;
        }
    };
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    let event = serde_json::json!({
        "ts": chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
        "action": action,
        "data": data
    });
    let line = format!("{}\n", event);
    if let Err(e) = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .and_then(|mut f| std::io::Write::write_all(&mut f, line.as_bytes()))
    {
        tracing::warn!(error = %e, path = %path.display(), "audit write failed");
    }
}

fn audit_path() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")?;
    Ok(PathBuf::from(home).join(".config/priorauth/audit.jsonl"))
}

