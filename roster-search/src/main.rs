use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::info;

use roster_search::logging::init_tracing;
use roster_search::storage::Roster;
use roster_search::{Dependencies, InMemoryRosterStore, RosterSearchError};
use roster_search_shared::InstructorAttributes;

/// Project id of the datastore backing the command line tool.
const PROJECT_ID: &str = "roster-search";

#[derive(Parser)]
#[command(name = "roster-search")]
#[command(about = "Index a course roster into the search engine and search it")]
struct Cli {
    /// Roster file holding courses, students and instructors as JSON
    #[arg(short, long, default_value = "roster.json")]
    roster: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Put every student and instructor of the roster into the search engine
    Index,
    /// Search students, optionally as seen by one instructor
    SearchStudents {
        query: String,
        /// Only return students from the courses this instructor teaches
        #[arg(long = "as-instructor", value_name = "EMAIL")]
        instructor_email: Option<String>,
    },
    /// Search instructors
    SearchInstructors { query: String },
}

fn load_roster(path: &Path) -> Result<Roster, RosterSearchError> {
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

/// Every instructor record of `email`, one per course taught.
fn instructor_scope(
    store: &InMemoryRosterStore,
    email: &str,
) -> Result<Vec<InstructorAttributes>, RosterSearchError> {
    Ok(store
        .all_instructors()?
        .into_iter()
        .filter(|i| i.email == email)
        .collect())
}

#[tokio::main]
async fn main() -> Result<(), RosterSearchError> {
    init_tracing();
    let cli = Cli::parse();

    let roster = load_roster(&cli.roster)?;
    let store = Arc::new(InMemoryRosterStore::from_roster(PROJECT_ID, roster)?);
    let _session = store.begin();

    let Dependencies { search_manager } = Dependencies::new(store.clone()).await?;

    match cli.command {
        Commands::Index => {
            let students = store.all_students()?;
            let instructors = store.all_instructors()?;
            info!(
                students = students.len(),
                instructors = instructors.len(),
                "Indexing roster"
            );
            search_manager.put_student_search_documents(&students).await;
            search_manager
                .put_instructor_search_documents(&instructors)
                .await;
        }
        Commands::SearchStudents {
            query,
            instructor_email,
        } => {
            let scope = match instructor_email {
                Some(email) => Some(instructor_scope(&store, &email)?),
                None => None,
            };
            let bundle = search_manager
                .search_students(&query, scope.as_deref())
                .await?;
            println!("{}", serde_json::to_string_pretty(&bundle)?);
        }
        Commands::SearchInstructors { query } => {
            let bundle = search_manager.search_instructors(&query).await?;
            println!("{}", serde_json::to_string_pretty(&bundle)?);
        }
    }

    Ok(())
}
