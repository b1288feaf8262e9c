use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use gamenotebook::atoms::storage::{config_dir, edit_content, load_config, resolve_editor};
use gamenotebook::coordinator::actions;
use gamenotebook::coordinator::{
    FolderSync, SnippetStore, StderrNotifier, SyncTrigger, TerminalConfirm,
};
use gamenotebook::molecules::editor::ContentAutosave;
use gamenotebook::molecules::export::SyncOutcome;
use gamenotebook::molecules::list::{FileChangeAction, ListView, SnippetList};
use gamenotebook::types::{Config, NewSnippet, SnippetField};
use gamenotebook::{FolderLoad, StoreError};

#[derive(Parser)]
#[command(name = "gamenotebook", version, about = "A folder-backed snippet notebook")]
struct Cli {
    /// Snippet folder; defaults to the most recently opened one
    #[arg(short, long, global = true, env = "GAMENOTEBOOK_FOLDER")]
    folder: Option<PathBuf>,

    /// Answer yes to every confirmation
    #[arg(short = 'y', long, global = true)]
    yes: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Open a folder and add it to the history
    Open { path: PathBuf },
    /// Show recently opened folders
    History {
        /// Forget a folder instead of listing
        #[arg(long)]
        remove: Option<PathBuf>,
    },
    /// List snippets, newest first
    List {
        #[arg(long)]
        trash: bool,
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Create a snippet; the body is read from stdin when piped
    New {
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        language: Option<String>,
        #[arg(short, long)]
        prefix: Option<String>,
    },
    /// Print a snippet's body
    Show { id: String },
    /// Edit a snippet's body in $VISUAL / $EDITOR
    Edit { id: String },
    /// Stream stdin into a snippet's body, saving as input settles
    Write { id: String },
    Rename { id: String, name: String },
    Language { id: String, language: String },
    /// Set the VS Code prefix; omit to clear it
    Prefix { id: String, prefix: Option<String> },
    /// Move snippets to the trash
    Trash {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Restore snippets from the trash
    Restore {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Delete a snippet forever
    Delete { id: String },
    /// Permanently erase everything in the trash
    EmptyTrash,
    /// Rewrite this folder's VS Code snippets
    Sync,
    /// Follow changes made to the folder by other programs
    Watch,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config(&config_dir())?;

    let mut store = SnippetStore::from_config(&config).with_notifier(Box::new(StderrNotifier));
    store.init().await;
    debug!("app data in {:?}", store.app_dir());

    let confirm = TerminalConfirm {
        assume_yes: cli.yes,
    };

    match cli.command {
        Command::Open { path } => {
            let path = absolute_folder(path);
            match store.load_folder(&path).await? {
                FolderLoad::Loaded { snippets } => {
                    println!("{} ({} snippets)", path.display(), snippets)
                }
                FolderLoad::Missing => std::process::exit(1),
            }
        }
        Command::History { remove: Some(path) } => {
            store.remove_folder_from_history(&path).await?;
        }
        Command::History { remove: None } => {
            for folder in &store.state().app.folders {
                println!("{}", folder);
            }
        }
        command => {
            open_folder(&mut store, cli.folder).await?;
            run(&mut store, &confirm, &config, command).await?;
        }
    }

    Ok(())
}

/// History keys are absolute so they mean the same thing from any cwd.
fn absolute_folder(path: PathBuf) -> PathBuf {
    std::path::absolute(&path).unwrap_or(path)
}

fn pick_folder(flag: Option<PathBuf>, most_recent: Option<&str>) -> Option<PathBuf> {
    flag.or_else(|| most_recent.map(PathBuf::from))
        .map(absolute_folder)
}

async fn open_folder(store: &mut SnippetStore, folder: Option<PathBuf>) -> Result<()> {
    let Some(folder) = pick_folder(folder, store.state().app.most_recent()) else {
        bail!("No folder opened yet. Run `gamenotebook open <path>` first.");
    };

    if store.load_folder(&folder).await? == FolderLoad::Missing {
        std::process::exit(1);
    }
    Ok(())
}

async fn run(
    store: &mut SnippetStore,
    confirm: &TerminalConfirm,
    config: &Config,
    command: Command,
) -> Result<()> {
    match command {
        Command::Open { .. } | Command::History { .. } => {}
        Command::List { trash, search } => {
            let mut list = SnippetList::new();
            if trash {
                list.set_view(ListView::Trash);
            }
            if let Some(query) = search {
                list.set_search_query(query);
            }
            for snippet in list.visible(store.snippets()) {
                let language = snippet.language.as_deref().unwrap_or("-");
                match snippet.export_prefix() {
                    Some(prefix) => println!(
                        "{}  {}  [{}]  {}",
                        snippet.id, snippet.name, language, prefix
                    ),
                    None => println!("{}  {}  [{}]", snippet.id, snippet.name, language),
                }
            }
        }
        Command::New {
            name,
            language,
            prefix,
        } => {
            let mut fields = NewSnippet::default();
            if let Some(name) = name {
                fields.name = name;
            }
            if language.is_some() {
                fields.language = language;
            }
            fields.export_prefix = prefix;

            let content = read_piped_stdin()?;
            if let Some(id) = store.create_snippet(fields, &content).await? {
                println!("{}", id);
            }
        }
        Command::Show { id } => match store.read_snippet_content(&id).await {
            Ok(content) => print!("{}", content),
            Err(StoreError::ContentNotFound { id }) => bail!("No content for snippet {}", id),
            Err(e) => return Err(e.into()),
        },
        Command::Edit { id } => edit_external(store, &id).await?,
        Command::Write { id } => {
            write_streamed(store, &id, config.editor.save_debounce_ms).await?
        }
        Command::Rename { id, name } => {
            store.update_snippet(&id, SnippetField::Name(name)).await?;
        }
        Command::Language { id, language } => {
            store
                .update_snippet(&id, SnippetField::Language(Some(language)))
                .await?;
        }
        Command::Prefix { id, prefix } => {
            store
                .update_snippet(&id, SnippetField::ExportPrefix(prefix))
                .await?;
        }
        Command::Trash { ids } => {
            if let [id] = ids.as_slice() {
                if store.snippet(id).is_some_and(|s| !s.is_trashed()) {
                    actions::trash_or_restore(store, confirm, id).await?;
                }
            } else {
                actions::trash_or_restore_selected(store, confirm, &ids, false).await?;
            }
        }
        Command::Restore { ids } => {
            if let [id] = ids.as_slice() {
                if store.snippet(id).is_some_and(|s| s.is_trashed()) {
                    actions::trash_or_restore(store, confirm, id).await?;
                }
            } else {
                actions::trash_or_restore_selected(store, confirm, &ids, true).await?;
            }
        }
        Command::Delete { id } => {
            actions::delete_forever(store, confirm, &id).await?;
        }
        Command::EmptyTrash => {
            actions::empty_trash(store, confirm).await?;
        }
        Command::Sync => match store.sync_snippets_to_vscode().await? {
            Some(SyncOutcome::Written { entries }) => println!("exported {} snippets", entries),
            Some(SyncOutcome::Skipped) => println!("VS Code not found, nothing exported"),
            None => println!("export disabled"),
        },
        Command::Watch => watch(store, config).await?,
    }

    Ok(())
}

fn read_piped_stdin() -> Result<String> {
    let mut content = String::new();
    if !io::stdin().is_terminal() {
        io::stdin()
            .read_to_string(&mut content)
            .context("Failed to read snippet body from stdin")?;
    }
    Ok(content)
}

async fn edit_external(store: &mut SnippetStore, id: &str) -> Result<()> {
    let Some(language) = store.snippet(id).map(|s| s.language.clone()) else {
        bail!("Snippet not found: {}", id);
    };
    let original = store.read_snippet_content(id).await?;

    let editor = resolve_editor();
    match edit_content(&editor, id, language.as_deref(), &original).await? {
        Some(content) if content != original => {
            store.update_snippet_content(id, &content).await?;
            info!("saved {} after external edit", id);
        }
        Some(_) => debug!("{} unchanged after external edit", id),
        None => eprintln!("Editor exited with an error, changes discarded"),
    }
    Ok(())
}

/// Each stdin line grows the body; saves happen once input pauses for the
/// configured debounce and again when stdin closes.
async fn write_streamed(store: &mut SnippetStore, id: &str, debounce_ms: u64) -> Result<()> {
    if store.snippet(id).is_none() {
        bail!("Snippet not found: {}", id);
    }
    let saved = store.read_snippet_content(id).await.unwrap_or_default();
    let mut autosave = ContentAutosave::new(id, saved, Duration::from_millis(debounce_ms));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut body = String::new();
    let mut stdin_open = true;

    loop {
        tokio::select! {
            line = lines.next_line(), if stdin_open => match line? {
                Some(line) => {
                    body.push_str(&line);
                    body.push('\n');
                    autosave.edit(body.clone());
                }
                None => {
                    stdin_open = false;
                    autosave.close();
                }
            },
            settled = autosave.next_save() => match settled {
                Some(content) => store.update_snippet_content(autosave.snippet_id(), &content).await?,
                None => break,
            },
        }
    }

    Ok(())
}

async fn watch(store: &mut SnippetStore, config: &Config) -> Result<()> {
    let Some(folder) = store.folder().map(|f| f.to_path_buf()) else {
        return Ok(());
    };
    let mut sync = FolderSync::start(&folder, &config.watch);
    eprintln!("watching {} (ctrl-c to stop)", folder.display());

    loop {
        tokio::select! {
            trigger = sync.next(config.watch.poll_interval_ms) => {
                let action = store.refresh(&trigger).await?;
                report(&trigger, &action);
                if store.folder().is_none() {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    Ok(())
}

fn report(trigger: &SyncTrigger, action: &FileChangeAction) {
    match (trigger, action) {
        (SyncTrigger::Event(_), FileChangeAction::ReloadIndex) => println!("index reloaded"),
        (_, FileChangeAction::ReloadContent { id }) => println!("changed: {}", id),
        (_, FileChangeAction::ContentRemoved { id }) => println!("removed: {}", id),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_folder_flag_is_made_absolute() {
        let picked = pick_folder(Some(PathBuf::from(".")), None).unwrap();
        assert!(picked.is_absolute());
        assert!(picked.starts_with(std::env::current_dir().unwrap()));
    }

    #[test]
    fn test_flag_wins_over_history() {
        let picked = pick_folder(Some(PathBuf::from("/ws/a")), Some("/ws/b")).unwrap();
        assert_eq!(picked, PathBuf::from("/ws/a"));
    }

    #[test]
    fn test_falls_back_to_most_recent() {
        assert_eq!(pick_folder(None, Some("/ws/b")), Some(PathBuf::from("/ws/b")));
        assert_eq!(pick_folder(None, None), None);
    }
}
