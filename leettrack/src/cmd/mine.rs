use crate::cmd::{connect_pool, identity, print_json, progress::report_save, progress_store};
use anyhow::Result;
use clap::{Args, Subcommand};
use leettrack_libs::{
    catalog::{
        model::{Difficulty, Problem},
        parser::{problem_id, resolve_url},
    },
    personal::{PersonalProblems, TrackerError},
    progress::model::Status,
    store::{postgres::PgRecordStore, PersonalProblemPatch},
};

#[derive(Debug, Args)]
pub struct MineArgs {
    #[command(subcommand)]
    command: MineCommand,
    #[arg(long, global = true)]
    user: Option<String>,
}

#[derive(Debug, Subcommand)]
enum MineCommand {
    List,
    Add {
        title: String,
        #[arg(long)]
        company: String,
        #[arg(long, default_value = "Unknown")]
        difficulty: Difficulty,
        #[arg(long, default_value = "")]
        link: String,
        #[arg(long, default_value = "")]
        topics: String,
    },
    Update {
        id: i64,
        #[arg(long)]
        status: Option<Status>,
        #[arg(long)]
        remarks: Option<String>,
    },
    Delete {
        id: i64,
    },
}

/// Problem built from command-line fields the same way the catalog normalizes a row.
fn tracked_problem(
    title: String,
    company: String,
    difficulty: Difficulty,
    link: &str,
    topics: String,
) -> Problem {
    let link = Some(link.trim()).filter(|link| !link.is_empty());
    let url = resolve_url(link, &title);
    Problem {
        id: problem_id(&url, &title),
        title,
        difficulty,
        acceptance: String::from("0%"),
        frequency: String::from("0"),
        url,
        company,
        topics,
    }
}

fn notice(e: TrackerError) -> anyhow::Error {
    if e.is_warning() {
        tracing::warn!("{}", e);
    } else {
        tracing::error!("{}", e);
    }
    anyhow::Error::new(e)
}

pub async fn run(args: MineArgs) -> Result<()> {
    let owner = identity(args.user.as_deref());
    if owner.is_none() {
        return Err(notice(TrackerError::NotSignedIn));
    }

    let pool = connect_pool().await?;
    let records = PgRecordStore::new(&pool);
    let service = PersonalProblems::new(&records);

    match args.command {
        MineCommand::List => {
            let problems = service.list(owner.as_ref()).await.map_err(notice)?;
            print_json(&problems)
        }
        MineCommand::Add {
            title,
            company,
            difficulty,
            link,
            topics,
        } => {
            let problem = tracked_problem(title, company, difficulty, &link, topics);
            let added = service.add(owner.as_ref(), &problem).await.map_err(notice)?;
            print_json(&added)
        }
        MineCommand::Update {
            id,
            status,
            remarks,
        } => {
            let patch = PersonalProblemPatch { status, remarks };
            let updated = service
                .update(owner.as_ref(), id, &patch)
                .await
                .map_err(notice)?;
            print_json(&updated)
        }
        MineCommand::Delete { id } => {
            let store = progress_store();
            let report = service
                .delete_from_local(owner.as_ref(), id, &store)
                .await
                .map_err(notice)?;
            report_save(&report);
            tracing::info!("problem {} deleted", id);
            Ok(())
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn missing_link_falls_back_to_search() {
        let problem = tracked_problem(
            String::from("Two Sum"),
            String::from("Google"),
            Difficulty::Easy,
            "",
            String::new(),
        );

        assert_eq!(problem.url, "https://leetcode.com/problemset/all/?search=Two%20Sum");
        assert_eq!(problem.id, "two-sum");
    }

    #[test]
    fn id_comes_from_problem_link() {
        let problem = tracked_problem(
            String::from("LRU Cache"),
            String::from("Amazon"),
            Difficulty::Medium,
            "https://leetcode.com/problems/lru-cache/description",
            String::from("Design"),
        );

        assert_eq!(problem.url, "https://leetcode.com/problems/lru-cache/description");
        assert_eq!(problem.id, "lru-cache");
    }
}
