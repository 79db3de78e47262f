use clap::Subcommand;
use pomodoro_core::{AppPaths, Config, NotesManager};

#[derive(Subcommand)]
pub enum NotesAction {
    /// Print the notes
    Show,
    /// Append a timestamped entry
    Add {
        /// Entry text; multiple words are joined with spaces
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Erase all notes
    Clear,
    /// Print the notes file location
    Path,
}

pub fn run(paths: &AppPaths, action: NotesAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load(&paths.config_file)?;
    let notes = NotesManager::from_config(&config.notes, paths);

    match action {
        NotesAction::Show => {
            let text = notes.load()?;
            if text.is_empty() {
                eprintln!("(no notes)");
            } else {
                print!("{text}");
                if !text.ends_with('\n') {
                    println!();
                }
            }
        }
        NotesAction::Add { text } => {
            notes.append(&text.join(" "))?;
            println!("note added");
        }
        NotesAction::Clear => {
            notes.clear()?;
            println!("notes cleared");
        }
        NotesAction::Path => {
            println!("{}", notes.path().display());
        }
    }
    Ok(())
}
