use crate::*;
use std::time::Duration;

fn row_text(r: &RecordRow) -> String {
    format!(
        "{}\t{}\t{}\t{}\t{}",
        r.id, r.patient_name, r.date, r.procedure, r.status
    )
}

pub fn handle_record_commands(
    cli: &Cli,
    settings: &Settings,
    api: &ApiClient,
    store: &mut RecordStore,
) -> anyhow::Result<bool> {
    match &cli.command {
        Commands::List => {
            store.refresh(api)?;
            let rows: Vec<RecordRow> = store.records().iter().map(record_row).collect();
            if !cli.json && rows.is_empty() {
                println!("no prior authorizations");
            } else {
                print_out(cli.json, &rows, row_text)?;
            }
        }
        Commands::Show {
            id,
            tab,
            watch,
            interval_secs,
            max_polls,
        } => {
            let mut view = DetailView::new();
            view.select_tab(*tab);
            let ticket = view.mount(id, store.get(id).cloned());
            view.load(api, ticket);

            if *watch {
                let interval = Duration::from_secs(interval_secs.unwrap_or(settings.poll_interval_secs));
                let limit = max_polls.unwrap_or(settings.max_polls);
                let mut polls = 0;
                while view.phase() == &Phase::Ready && !view.has_criteria() && polls < limit {
                    polls += 1;
                    tracing::debug!(id = %id, poll = polls, "criteria not extracted yet");
                    eprintln!("criteria not extracted yet, refreshing ({}/{})", polls, limit);
                    std::thread::sleep(interval);
                    let ticket = view.refresh();
                    view.load(api, ticket);
                }
            }

            if let Phase::Error(e) = view.phase() {
                return Err(e.clone().into());
            }
            let Some(record) = view.record() else {
                anyhow::bail!("prior authorization {} not loaded", id);
            };
            let snapshot = DetailSnapshot::new(view.phase(), view.tab(), record, |fid| api.file_url(fid));
            print_lines(cli.json, snapshot, render_detail)?;
        }
        Commands::Criteria { id } => {
            let record = api.get_prior_auth(id)?;
            let report = CriteriaReport::from_questions(record.auth_questions.as_ref());
            print_lines(cli.json, report, render_report)?;
        }
        Commands::Create {
            patient_name,
            procedure,
            auth_document,
            clinical_notes,
        } => {
            if patient_name.trim().is_empty() {
                return Err(InputError::Missing("Patient name").into());
            }
            if procedure.trim().is_empty() {
                return Err(InputError::Missing("Procedure").into());
            }
            let form = NewPriorAuth {
                patient_name: patient_name.trim().to_string(),
                procedure: procedure.trim().to_string(),
                auth_document: PdfUpload::from_path(auth_document)?,
                clinical_notes: PdfUpload::from_path(clinical_notes)?,
            };
            let created = store.add(api, &form)?;
            audit(
                "create",
                serde_json::json!({"id": created.id, "patient_name": created.patient_name}),
            );
            print_one(cli.json, record_row(&created), |r| format!("created {}", row_text(r)))?;
        }
        Commands::Update {
            id,
            patient_name,
            procedure,
            status,
        } => {
            let req = UpdatePriorAuthRequest {
                patient_name: patient_name.clone(),
                procedure: procedure.clone(),
                status: status.clone(),
            };
            if req.is_empty() {
                return Err(InputError::EmptyUpdate.into());
            }
            let updated = api.update_prior_auth(id, &req)?;
            audit("update", serde_json::json!({"id": id, "fields": req}));
            print_one(cli.json, record_row(&updated), |r| format!("updated {}", row_text(r)))?;
        }
        Commands::Delete { id } => {
            store.remove(api, id)?;
            audit("delete", serde_json::json!({"id": id}));
            print_one(
                cli.json,
                serde_json::json!({"id": id, "deleted": true}),
                |_| format!("deleted {}", id),
            )?;
        }
        Commands::Health | Commands::File { .. } | Commands::Questions { .. } | Commands::Config { .. } => {
            return Ok(false);
        }
    }

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaves_other_command_trees_alone() {
        let settings = resolve(None, None, &ConfigFile::default());
        // nothing listens on the discard port; any request would fail the call
        let api = ApiClient::new("http://127.0.0.1:9").expect("client");
        let mut store = RecordStore::new();
        for args in [
            vec!["priorauth", "config", "show"],
            vec!["priorauth", "health"],
            vec!["priorauth", "file", "url", "f-1"],
            vec!["priorauth", "questions", "list", "pa-1"],
        ] {
            let cli = Cli::try_parse_from(args).expect("parse");
            assert!(!handle_record_commands(&cli, &settings, &api, &mut store).expect("not handled"));
        }
        assert!(store.records().is_empty());
        assert!(store.error().is_none());
    }
}
