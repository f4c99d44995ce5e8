use std::error::Error;
use std::io::Write;
use std::path::PathBuf;

use chrono::Utc;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::backend::FileBackend;
use crate::io::config_io;
use crate::io::prefs::{read_prefs, write_prefs};
use crate::io::recovery::{clear_recovery, read_recovery_entries, recovery_log_path};
use crate::io::store::{Store, SyncStatus};
use crate::logging::log_path;
use crate::model::board::AppState;
use crate::model::config::AppConfig;
use crate::model::day::{DAYS_PER_WEEK, day_name, today};
use crate::ops::board_ops::{self, ensure_default_board};
use crate::ops::diagram;
use crate::ops::{OpError, task_ops};

/// Resolved configuration and locations a command runs against
pub struct Context {
    pub config: AppConfig,
    pub config_path: PathBuf,
    pub data_dir: PathBuf,
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli, ctx: &Context) -> Result<(), Box<dyn Error>> {
    let json = cli.json;
    let Some(cmd) = cli.command else {
        return Err("no command given (try `wf --help`)".into());
    };

    match cmd {
        // Local-only commands (no document load)
        Commands::Where => cmd_where(ctx, json),
        Commands::Theme(args) => cmd_theme(args, ctx, json),
        Commands::Recovery(args) => cmd_recovery(args, ctx, json),

        // Read commands
        Commands::Boards => cmd_boards(ctx, json),
        Commands::Tasks(args) => cmd_tasks(args, ctx, json),
        Commands::Today => cmd_today(ctx, json),
        Commands::Diagram(args) => cmd_diagram(args, ctx),

        // Write commands
        Commands::Board(args) => cmd_board(args, ctx),
        Commands::Add(args) => cmd_add(args, ctx, json),
        Commands::Toggle(args) => cmd_toggle(args, ctx),
        Commands::Edit(args) => cmd_edit(args, ctx),
        Commands::Rm(args) => cmd_rm(args, ctx),
        Commands::Template(args) => cmd_template(args, ctx),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// The loaded document and the store it came from. A command mutates
/// `state` and calls `save` once.
struct Session {
    store: Store,
    state: AppState,
}

impl Session {
    /// Load the document, creating the default board when there is none
    fn open(ctx: &Context) -> Result<Self, Box<dyn Error>> {
        let store = Store::new(
            Box::new(FileBackend::new(&ctx.data_dir)),
            ctx.config.store.row_id,
        )
        .with_recovery_dir(&ctx.data_dir);
        let mut state = store.load();
        let created = ensure_default_board(&mut state, Utc::now());
        let session = Session { store, state };
        if created {
            tracing::info!("created default board");
            session.save()?;
        }
        Ok(session)
    }

    fn save(&self) -> Result<(), Box<dyn Error>> {
        match self.store.save(&self.state) {
            SyncStatus::Failed(e) => Err(format!("could not save: {}", e).into()),
            _ => Ok(()),
        }
    }

    fn active_board_id(&self) -> Result<String, OpError> {
        self.state
            .active_board()
            .map(|b| b.id.clone())
            .ok_or(OpError::NoActiveBoard)
    }

    /// Find a board by id, falling back to an exact name match
    fn resolve_board(&self, query: &str) -> Result<String, Box<dyn Error>> {
        if let Some(board) = self.state.board(query) {
            return Ok(board.id.clone());
        }
        let matches: Vec<&str> = self
            .state
            .boards
            .iter()
            .filter(|b| b.name == query)
            .map(|b| b.id.as_str())
            .collect();
        match matches.as_slice() {
            [id] => Ok(id.to_string()),
            [] => Err(OpError::BoardNotFound(query.to_string()).into()),
            ids => Err(format!(
                "'{}' names {} boards, use an id: {}",
                query,
                ids.len(),
                ids.join(", ")
            )
            .into()),
        }
    }
}

/// Ask on stderr and read a y/n answer from stdin
fn confirm(prompt: &str) -> Result<bool, Box<dyn Error>> {
    eprint!("{} [y/n] ", prompt);
    std::io::stderr().flush()?;
    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    Ok(input.trim().eq_ignore_ascii_case("y"))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// Local-only handlers
// ---------------------------------------------------------------------------

fn cmd_where(ctx: &Context, json: bool) -> Result<(), Box<dyn Error>> {
    let backend = FileBackend::new(&ctx.data_dir);
    let rows = [
        ("data", ctx.data_dir.clone()),
        ("document", backend.row_path(ctx.config.store.row_id)),
        ("config", ctx.config_path.clone()),
        ("log", log_path(&ctx.data_dir)),
        ("recovery", recovery_log_path(&ctx.data_dir)),
    ];

    if json {
        let map: serde_json::Map<String, serde_json::Value> = rows
            .iter()
            .map(|(k, p)| (k.to_string(), p.display().to_string().into()))
            .collect();
        return print_json(&map);
    }
    for (key, path) in &rows {
        println!("{:<9} {}", key, path.display());
    }
    Ok(())
}

fn cmd_theme(args: ThemeArgs, ctx: &Context, json: bool) -> Result<(), Box<dyn Error>> {
    let mut prefs = read_prefs(&ctx.data_dir).unwrap_or_default();
    if let Some(mode) = args.mode {
        prefs.theme = mode;
        write_prefs(&ctx.data_dir, &prefs)?;
        tracing::info!(theme = mode.as_str(), "theme preference set");
    }
    if json {
        return print_json(&serde_json::json!({ "theme": prefs.theme }));
    }
    println!("{}", prefs.theme.as_str());
    Ok(())
}

fn cmd_recovery(args: RecoveryArgs, ctx: &Context, json: bool) -> Result<(), Box<dyn Error>> {
    if args.clear {
        let removed = clear_recovery(&ctx.data_dir)?;
        println!(
            "cleared {} recovery entr{}",
            removed,
            if removed == 1 { "y" } else { "ies" }
        );
        return Ok(());
    }

    let entries = read_recovery_entries(&ctx.data_dir, Some(args.limit.unwrap_or(10)));
    if json {
        let items: Vec<RecoveryEntryJson> = entries.iter().map(recovery_to_json).collect();
        return print_json(&items);
    }
    if entries.is_empty() {
        println!("No recovery entries.");
        return Ok(());
    }
    for entry in &entries {
        println!("{}", format_recovery_entry(entry));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Read handlers
// ---------------------------------------------------------------------------

fn cmd_boards(ctx: &Context, json: bool) -> Result<(), Box<dyn Error>> {
    let session = Session::open(ctx)?;
    let state = &session.state;

    if json {
        let items: Vec<BoardJson> = state.boards.iter().map(|b| board_to_json(state, b)).collect();
        return print_json(&items);
    }
    for board in &state.boards {
        println!("{}", format_board_line(state, board));
    }
    Ok(())
}

fn cmd_tasks(args: TasksArgs, ctx: &Context, json: bool) -> Result<(), Box<dyn Error>> {
    let session = Session::open(ctx)?;
    let board = session.state.active_board().ok_or(OpError::NoActiveBoard)?;

    if json {
        let days: Vec<DayJson> = match args.day {
            Some(day) => vec![day_to_json(board, day)],
            None => (0..DAYS_PER_WEEK).map(|d| day_to_json(board, d)).collect(),
        };
        return print_json(&serde_json::json!({
            "board": board_to_json(&session.state, board),
            "days": days,
        }));
    }

    let lines = match args.day {
        Some(day) => {
            let mut lines = vec![board.name.clone()];
            lines.extend(format_day(board, day, Some("(no tasks)")));
            lines
        }
        None => format_week(board),
    };
    for line in lines {
        println!("{}", line);
    }
    Ok(())
}

fn cmd_today(ctx: &Context, json: bool) -> Result<(), Box<dyn Error>> {
    let session = Session::open(ctx)?;
    let day = today();
    let board = session.state.active_board().ok_or(OpError::NoActiveBoard)?;

    if json {
        return print_json(&day_to_json(board, day));
    }
    println!("{} \u{00B7} {}", board.name, day_name(day));
    let tasks = board.day(day);
    if tasks.is_empty() {
        println!("  {}", diagram::PLACEHOLDER_LABEL);
    }
    for task in tasks {
        println!("  {}", format_task_line(task));
    }
    Ok(())
}

fn cmd_diagram(args: DiagramArgs, ctx: &Context) -> Result<(), Box<dyn Error>> {
    let session = Session::open(ctx)?;
    let theme = args
        .theme
        .unwrap_or_else(|| read_prefs(&ctx.data_dir).unwrap_or_default().theme);
    let day = args.day.unwrap_or_else(today);
    print!("{}", diagram::generate(session.state.active_board(), day, theme));
    Ok(())
}

// ---------------------------------------------------------------------------
// Write handlers
// ---------------------------------------------------------------------------

fn cmd_board(args: BoardCmd, ctx: &Context) -> Result<(), Box<dyn Error>> {
    let mut session = Session::open(ctx)?;

    match args.action {
        BoardAction::New(a) => {
            let id = board_ops::create_board(&mut session.state, &a.name, Utc::now())?;
            session.save()?;
            tracing::info!(board = %id, "board created");
            println!("{}", id);
        }
        BoardAction::Rename(a) => {
            let id = session.resolve_board(&a.board)?;
            board_ops::rename_board(&mut session.state, &id, &a.name)?;
            session.save()?;
        }
        BoardAction::Dup(a) => {
            let id = session.resolve_board(&a.board)?;
            let new_id = board_ops::duplicate_board(&mut session.state, &id, &a.name, Utc::now())?;
            session.save()?;
            tracing::info!(from = %id, board = %new_id, "board duplicated");
            println!("{}", new_id);
        }
        BoardAction::Use(a) => {
            let id = session.resolve_board(&a.board)?;
            board_ops::set_active_board(&mut session.state, &id)?;
            session.save()?;
        }
        BoardAction::Rm(a) => {
            let id = session.resolve_board(&a.board)?;
            if !a.yes {
                let (name, count) = session
                    .state
                    .board(&id)
                    .map(|b| (b.name.clone(), b.task_count()))
                    .unwrap_or_default();
                if !confirm(&format!("Delete board '{}' and its {} tasks?", name, count))? {
                    println!("cancelled");
                    return Ok(());
                }
            }
            board_ops::remove_board(&mut session.state, &id)?;
            session.save()?;
            tracing::info!(board = %id, "board removed");
        }
    }
    Ok(())
}

fn cmd_add(args: AddArgs, ctx: &Context, json: bool) -> Result<(), Box<dyn Error>> {
    let mut session = Session::open(ctx)?;
    let id = task_ops::add_task(&mut session.state, args.day, &args.time, &args.title)?;
    session.save()?;

    if json {
        let task = session
            .state
            .active_board()
            .and_then(|b| b.day(args.day).iter().find(|t| t.id == id))
            .ok_or_else(|| OpError::TaskNotFound(id.clone()))?;
        return print_json(&task_to_json(task));
    }
    println!("{}", id);
    Ok(())
}

fn cmd_toggle(args: TaskRef, ctx: &Context) -> Result<(), Box<dyn Error>> {
    let mut session = Session::open(ctx)?;
    let board_id = session.active_board_id()?;
    let done = task_ops::toggle_task(&mut session.state, &board_id, args.day, &args.id)?;
    session.save()?;
    println!("{} {}", args.id, if done { "done" } else { "not done" });
    Ok(())
}

fn cmd_edit(args: EditArgs, ctx: &Context) -> Result<(), Box<dyn Error>> {
    if args.time.is_none() && args.title.is_none() {
        return Err("nothing to change (pass --time and/or --title)".into());
    }
    let mut session = Session::open(ctx)?;
    let board_id = session.active_board_id()?;
    let current = session
        .state
        .board(&board_id)
        .and_then(|b| b.day(args.task.day).iter().find(|t| t.id == args.task.id))
        .cloned()
        .ok_or_else(|| OpError::TaskNotFound(args.task.id.clone()))?;

    let time = args.time.unwrap_or(current.time);
    let title = args.title.unwrap_or(current.title);
    task_ops::update_task(
        &mut session.state,
        &board_id,
        args.task.day,
        &args.task.id,
        &time,
        &title,
    )?;
    session.save()
}

fn cmd_rm(args: RmArgs, ctx: &Context) -> Result<(), Box<dyn Error>> {
    let mut session = Session::open(ctx)?;
    let board_id = session.active_board_id()?;
    let day = args.task.day;

    if !args.yes {
        let task = session
            .state
            .board(&board_id)
            .and_then(|b| b.day(day).iter().find(|t| t.id == args.task.id))
            .ok_or_else(|| OpError::TaskNotFound(args.task.id.clone()))?;
        let prompt = format!("Remove {} {} from {}?", task.time, task.title, day_name(day));
        if !confirm(&prompt)? {
            println!("cancelled");
            return Ok(());
        }
    }

    task_ops::remove_task(&mut session.state, &board_id, day, &args.task.id)?;
    session.save()
}

fn cmd_template(args: TemplateArgs, ctx: &Context) -> Result<(), Box<dyn Error>> {
    let mut session = Session::open(ctx)?;
    let board_id = session.active_board_id()?;
    let count = task_ops::copy_day(&mut session.state, &board_id, args.from, args.to)?;
    session.save()?;
    tracing::info!(board = %board_id, from = args.from, to = args.to, count, "day copied");
    println!(
        "copied {} task{} from {} to {}",
        count,
        if count == 1 { "" } else { "s" },
        day_name(args.from),
        day_name(args.to)
    );
    Ok(())
}

/// Resolve the config and data directory for a parsed command line
pub fn context(cli: &Cli) -> Result<Context, Box<dyn Error>> {
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(config_io::config_path);
    let config = config_io::read_config(&config_path)?;
    let data_dir = config_io::resolve_data_dir(&config, cli.data_dir.as_deref());
    Ok(Context {
        config,
        config_path,
        data_dir,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    fn ctx(tmp: &TempDir) -> Context {
        Context {
            config: AppConfig::default(),
            config_path: tmp.path().join("config.toml"),
            data_dir: tmp.path().to_path_buf(),
        }
    }

    fn run(ctx: &Context, args: &[&str]) -> Result<(), Box<dyn Error>> {
        let mut argv = vec!["wf"];
        argv.extend_from_slice(args);
        dispatch(Cli::try_parse_from(argv)?, ctx)
    }

    fn load(ctx: &Context) -> AppState {
        Session::open(ctx).unwrap().state
    }

    #[test]
    fn first_open_creates_default_board() {
        let tmp = TempDir::new().unwrap();
        let state = load(&ctx(&tmp));
        assert_eq!(state.boards.len(), 1);
        assert_eq!(state.boards[0].name, crate::model::board::DEFAULT_BOARD_NAME);
        assert_eq!(state.active_board_id, Some(state.boards[0].id.clone()));
    }

    #[test]
    fn add_sorts_and_toggle_flips() {
        let tmp = TempDir::new().unwrap();
        let ctx = ctx(&tmp);
        run(&ctx, &["board", "new", "Week A"]).unwrap();
        run(&ctx, &["add", "mon", "09:00", "Standup"]).unwrap();
        run(&ctx, &["add", "1", "08:00", "Coffee"]).unwrap();

        let state = load(&ctx);
        let board = state.active_board().unwrap();
        assert_eq!(board.name, "Week A");
        let titles: Vec<&str> = board.day(1).iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["Coffee", "Standup"]);

        let standup = board.day(1)[1].id.clone();
        run(&ctx, &["toggle", "mon", &standup]).unwrap();
        assert!(load(&ctx).active_board().unwrap().day(1)[1].done);
        run(&ctx, &["toggle", "mon", &standup]).unwrap();
        assert!(!load(&ctx).active_board().unwrap().day(1)[1].done);
    }

    #[test]
    fn edit_keeps_unspecified_fields() {
        let tmp = TempDir::new().unwrap();
        let ctx = ctx(&tmp);
        run(&ctx, &["add", "2", "09:00", "Standup"]).unwrap();
        let id = load(&ctx).active_board().unwrap().day(2)[0].id.clone();

        run(&ctx, &["edit", "2", &id, "--time", "10:15"]).unwrap();
        let state = load(&ctx);
        let task = &state.active_board().unwrap().day(2)[0];
        assert_eq!(task.time, "10:15");
        assert_eq!(task.title, "Standup");

        assert!(run(&ctx, &["edit", "2", &id]).is_err());
    }

    #[test]
    fn rm_with_yes_removes() {
        let tmp = TempDir::new().unwrap();
        let ctx = ctx(&tmp);
        run(&ctx, &["add", "3", "09:00", "Standup"]).unwrap();
        let id = load(&ctx).active_board().unwrap().day(3)[0].id.clone();
        run(&ctx, &["rm", "3", &id, "--yes"]).unwrap();
        assert!(load(&ctx).active_board().unwrap().day(3).is_empty());
    }

    #[test]
    fn template_from_empty_day_fails() {
        let tmp = TempDir::new().unwrap();
        let ctx = ctx(&tmp);
        let err = run(&ctx, &["template", "0", "1"]).unwrap_err();
        assert_eq!(err.to_string(), "Sunday has no tasks to copy");
    }

    #[test]
    fn boards_by_name_and_removal() {
        let tmp = TempDir::new().unwrap();
        let ctx = ctx(&tmp);
        run(&ctx, &["board", "new", "Week A"]).unwrap();
        run(&ctx, &["board", "dup", "Week A", "Week B"]).unwrap();
        assert_eq!(load(&ctx).active_board().unwrap().name, "Week B");

        run(&ctx, &["board", "use", "Week A"]).unwrap();
        assert_eq!(load(&ctx).active_board().unwrap().name, "Week A");

        run(&ctx, &["board", "rm", "Week A", "--yes"]).unwrap();
        let state = load(&ctx);
        let names: Vec<&str> = state.boards.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, [crate::model::board::DEFAULT_BOARD_NAME, "Week B"]);
        assert_eq!(state.active_board().unwrap().name, crate::model::board::DEFAULT_BOARD_NAME);

        assert!(run(&ctx, &["board", "use", "Week A"]).is_err());
    }

    #[test]
    fn ambiguous_board_name_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let ctx = ctx(&tmp);
        run(&ctx, &["board", "new", "Week"]).unwrap();
        run(&ctx, &["board", "new", "Week"]).unwrap();
        let err = run(&ctx, &["board", "use", "Week"]).unwrap_err();
        assert!(err.to_string().contains("names 2 boards"));
    }

    #[test]
    fn theme_is_saved_as_preference() {
        let tmp = TempDir::new().unwrap();
        let ctx = ctx(&tmp);
        run(&ctx, &["theme", "dark"]).unwrap();
        assert_eq!(
            read_prefs(tmp.path()).map(|p| p.theme),
            Some(crate::model::config::ThemeMode::Dark)
        );
    }

    #[test]
    fn context_prefers_data_dir_flag() {
        let tmp = TempDir::new().unwrap();
        let config = tmp.path().join("missing.toml");
        let cli = Cli::try_parse_from([
            "wf",
            "--config",
            config.to_str().unwrap(),
            "-C",
            "/tmp/elsewhere",
            "boards",
        ])
        .unwrap();
        let ctx = context(&cli).unwrap();
        assert_eq!(ctx.data_dir, PathBuf::from("/tmp/elsewhere"));
        assert_eq!(ctx.config_path, config);
    }
}
