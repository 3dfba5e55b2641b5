use crate::*;

pub fn handle_config_commands(cli: &Cli, settings: &Settings) -> anyhow::Result<bool> {
    let Commands::Config { command } = &cli.command else {
        return Ok(false);
    };

    match command {
        ConfigCommands::Show => {
            let report = settings.report()?;
            print_one(cli.json, report, |r| {
                format!(
                    "base_url={} ({})\nconfig={}\npoll_interval_secs={} max_polls={}",
                    r.base_url, r.base_url_source, r.config_path, r.poll_interval_secs, r.max_polls
                )
            })?;
        }
    }

    Ok(true)
}

pub fn handle_health_command(cli: &Cli, api: &ApiClient) -> anyhow::Result<bool> {
    let Commands::Health = &cli.command else {
        return Ok(false);
    };

    let health = api.health()?;
    print_one(cli.json, health, |h| match &h.timestamp {
        Some(ts) => format!("{} at {}", h.status, ts),
        None => h.status.clone(),
    })?;
    Ok(true)
}

pub fn handle_file_commands(cli: &Cli, api: &ApiClient) -> anyhow::Result<bool> {
    let Commands::File { command } = &cli.command else {
        return Ok(false);
    };

    match command {
        FileCommands::Upload { path, file_type } => {
            let upload = PdfUpload::from_path(path)?;
            let file = api.upload_file(&upload, *file_type)?;
            audit(
                "upload",
                serde_json::json!({"id": file.id, "file_type": file_type, "size": file.size}),
            );
            print_one(cli.json, file, |f| {
                format!("{}\t{}\t{}", f.id, f.original_name, f.size)
            })?;
        }
        FileCommands::Get { id, out } => {
            let bytes = api.fetch_file(id)?;
            std::fs::write(out, &bytes)?;
            print_one(
                cli.json,
                serde_json::json!({"id": id, "path": out, "bytes": bytes.len()}),
                |_| format!("wrote {} bytes to {}", bytes.len(), out.display()),
            )?;
        }
        FileCommands::Url { id } => {
            let url = api.file_url(id);
            print_one(cli.json, serde_json::json!({"id": id, "url": url}), |_| url.clone())?;
        }
        FileCommands::Delete { id } => {
            let resp = api.delete_file(id)?;
            audit("file_delete", serde_json::json!({"id": id}));
            print_one(cli.json, resp, |r| r.message.clone())?;
        }
    }

    Ok(true)
}

/// Groups questions by category, keeping the order categories first appear in.
pub fn group_questions(questions: Vec<NecessityQuestion>) -> Vec<QuestionGroup> {
    let mut groups: Vec<QuestionGroup> = Vec::new();
    for q in questions {
        match groups.iter_mut().find(|g| g.category == q.category) {
            Some(g) => g.questions.push(q),
            None => groups.push(QuestionGroup {
                category: q.category.clone(),
                questions: vec![q],
            }),
        }
    }
    groups
}

fn question_lines(groups: &Vec<QuestionGroup>) -> Vec<String> {
    let mut lines = Vec::new();
    for g in groups {
        lines.push(if g.category.is_empty() {
            "uncategorized".to_string()
        } else {
            g.category.clone()
        });
        for q in &g.questions {
            lines.push(format!("  [{}] {}", q.id, q.question));
            if let Some(answer) = q.answer.as_deref().filter(|a| !a.is_empty()) {
                lines.push(format!("      {}", answer));
            }
        }
    }
    lines
}

pub fn handle_question_commands(cli: &Cli, api: &ApiClient) -> anyhow::Result<bool> {
    let Commands::Questions { command } = &cli.command else {
        return Ok(false);
    };

    match command {
        QuestionCommands::List { id } => {
            let groups = group_questions(api.list_questions(id)?);
            print_lines(cli.json, groups, question_lines)?;
        }
        QuestionCommands::Answer { id, answers } => {
            let updates = answers
                .iter()
                .map(|raw| {
                    parse_answer(raw).map(|(question_id, answer)| QuestionAnswerUpdate {
                        question_id,
                        answer,
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            let resp = api.update_answers(id, &updates)?;
            audit("answer", serde_json::json!({"id": id, "count": updates.len()}));
            print_one(cli.json, resp, |r| r.message.clone())?;
        }
    }

    Ok(true)
}
