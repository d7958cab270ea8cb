pub mod ui;

use chrono::Local;
use clap::{error::ErrorKind, CommandFactory, Parser, Subcommand};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use hifz::{
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    document::{Corpus, VerseRange},
    export::write_csv,
    guided::{GuidedConfig, GuidedSession, Stage},
    loader::{ExtrasKey, ExtrasLoader, LoadToken},
    logging::init_file_logging,
    progress::{load_history, ProgressRecord},
    record::{FocusMode, Mode},
    runtime::{AppEvent, CrosstermEventSource, Runner},
    session::{DrillSession, RecordOutcome, SessionRequest},
    store::{select_store, SessionStore},
    util::now_millis,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::{
    error::Error,
    fs::File,
    io::{self, stdin, stdout, Write},
    path::PathBuf,
    time::Duration,
};

const TICK_RATE_MS: u64 = 100;

/// memorise verses in the terminal with a guided routine, recall drills and progress tracking
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Memorise verses with a fixed guided routine (full reads, chunk reads, verse focus, half-hidden and first-word recall), run recall drills, and track streaks and scores over time."
)]
pub struct Cli {
    /// config file to use instead of the platform default
    #[clap(long, global = true)]
    config: Option<PathBuf>,

    /// directory with extra documents and translations/ and transliterations/ files
    #[clap(long, global = true)]
    corpus_dir: Option<PathBuf>,

    /// account id; history is kept in the account store when set
    #[clap(long, global = true)]
    account: Option<String>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// walk a verse range through the guided routine
    #[clap(allow_negative_numbers = true)]
    Guided {
        /// document slug, see `hifz list`
        slug: String,

        /// first verse (clamped to the document)
        #[clap(short, long)]
        start: Option<i64>,

        /// last verse (clamped to the document)
        #[clap(short, long)]
        end: Option<i64>,

        /// verses per chunk
        #[clap(short = 'k', long)]
        chunk_size: Option<i64>,
    },

    /// drill a verse range, answering remembered or forgot for each verse
    #[clap(allow_negative_numbers = true)]
    Recall {
        slug: String,

        #[clap(short, long)]
        start: Option<i64>,

        #[clap(short, long)]
        end: Option<i64>,

        /// none, full, word, first-word or half; anything else shows every word
        #[clap(long)]
        hide: Option<String>,

        /// times to go through the range
        #[clap(short, long)]
        reps: Option<f64>,

        /// practice, drill or recall
        #[clap(short, long)]
        mode: Option<Mode>,

        /// primary-script or transliteration
        #[clap(long)]
        focus: Option<FocusMode>,
    },

    /// show streaks, averages and per-document scores
    Stats {
        /// print a text summary instead of opening the dashboard
        #[clap(long)]
        plain: bool,
    },

    /// write the session history as CSV
    Export {
        /// output file; stdout when omitted
        #[clap(short, long)]
        output: Option<PathBuf>,
    },

    /// list available documents
    List,
}

impl Cli {
    fn config_store(&self) -> FileConfigStore {
        match &self.config {
            Some(path) => FileConfigStore::with_path(path),
            None => FileConfigStore::new(),
        }
    }

    /// Stored config with this run's flags applied.
    fn effective_config(&self, store: &FileConfigStore) -> Config {
        let mut cfg = store.load();
        if let Some(dir) = &self.corpus_dir {
            cfg.corpus_dir = Some(dir.clone());
        }
        if let Some(account) = &self.account {
            cfg.account = Some(account.clone());
        }
        if let Command::Guided {
            chunk_size: Some(k),
            ..
        } = &self.command
        {
            cfg.chunk_size = *k;
        }
        cfg
    }

    fn needs_tty(&self) -> bool {
        matches!(
            self.command,
            Command::Guided { .. } | Command::Recall { .. } | Command::Stats { plain: false }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Guided,
    Drill,
    Stats,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct App {
    pub config: Config,
    pub corpus: Corpus,
    pub store: Box<dyn SessionStore>,
    pub loader: Option<ExtrasLoader>,
    /// Outstanding extras request for whichever session is on screen.
    pub pending_extras: Option<LoadToken>,
    pub state: AppState,
    pub guided: Option<GuidedSession>,
    pub drill: Option<DrillSession>,
    /// Whether the current drill verse is shown in full.
    pub revealed: bool,
    /// Focus used when rendering guided verses and starting drills.
    pub focus: FocusMode,
    pub progress: ProgressRecord,
    pub status: Option<String>,
}

impl App {
    pub fn new(config: Config, corpus: Corpus, store: Box<dyn SessionStore>) -> Self {
        let loader = config.corpus_dir.as_ref().map(ExtrasLoader::new);
        let progress = ProgressRecord::compute(
            &load_history(store.as_ref()),
            Local::now(),
            config.average_window,
            config.timeline_days,
        );
        Self {
            focus: config.default_focus,
            config,
            corpus,
            store,
            loader,
            pending_extras: None,
            state: AppState::Stats,
            guided: None,
            drill: None,
            revealed: false,
            progress,
            status: None,
        }
    }

    pub fn start_guided(&mut self, slug: &str, start: Option<i64>, end: Option<i64>) -> hifz::Result<()> {
        let guided_config = GuidedConfig::from_config(&self.config)?;
        let document = self.corpus.get(slug)?;
        let total = document.verse_count();
        let range = VerseRange::clamped(
            start.unwrap_or(1),
            end.unwrap_or(total as i64),
            total,
        )?;
        self.guided = Some(GuidedSession::new(document, range, guided_config)?);
        self.state = AppState::Guided;
        self.request_extras();
        Ok(())
    }

    /// Ask the loader for translation and transliteration of the drill, or
    /// of the guided range when no drill is running. Any earlier request is
    /// superseded.
    fn request_extras(&mut self) {
        let Some(loader) = &self.loader else {
            return;
        };
        let key = match (&self.drill, &self.guided) {
            (Some(drill), _) => ExtrasKey {
                slug: drill.document_slug.clone(),
                range: drill.range,
            },
            (None, Some(guided)) => ExtrasKey {
                slug: guided.document_slug.clone(),
                range: guided.range,
            },
            (None, None) => {
                loader.cancel();
                self.pending_extras = None;
                return;
            }
        };
        self.pending_extras = Some(loader.request(key));
    }

    fn reset_guided(&mut self) {
        if let Some(loader) = &self.loader {
            loader.cancel();
        }
        self.pending_extras = None;
        if let Some(guided) = self.guided.as_mut() {
            guided.reset();
        }
        self.request_extras();
    }

    pub fn start_drill(&mut self, request: &SessionRequest) -> hifz::Result<()> {
        let drill = request.resolve(&self.corpus)?;
        tracing::debug!(
            "drill {} {} x{} hide={}",
            drill.document_slug,
            drill.range,
            drill.repetitions,
            drill.hide
        );
        self.drill = Some(drill);
        self.revealed = false;
        self.status = None;
        self.state = AppState::Drill;
        self.request_extras();
        Ok(())
    }

    fn leave_drill(&mut self) {
        self.drill = None;
        self.revealed = false;
        self.state = if self.guided.is_some() {
            AppState::Guided
        } else {
            AppState::Stats
        };
        // the guided page may still be waiting on its own lines
        self.request_extras();
    }

    pub fn refresh_progress(&mut self) {
        self.progress = ProgressRecord::compute(
            &load_history(self.store.as_ref()),
            Local::now(),
            self.config.average_window,
            self.config.timeline_days,
        );
    }

    /// Commit freshly loaded extras to the session they were requested for.
    pub fn on_tick(&mut self) {
        let Some((key, extras)) = self.loader.as_ref().and_then(ExtrasLoader::poll) else {
            return;
        };
        self.pending_extras = None;
        match (&mut self.drill, &mut self.guided) {
            (Some(drill), _) if key.slug == drill.document_slug && key.range == drill.range => {
                drill.apply_extras(extras);
            }
            (None, Some(guided)) if key.slug == guided.document_slug && key.range == guided.range => {
                guided.apply_extras(extras);
            }
            _ => tracing::debug!("dropping extras for {} {}", key.slug, key.range),
        }
    }

    fn answer(&mut self, correct: bool) {
        let Some(drill) = self.drill.as_mut() else {
            return;
        };
        drill.answer(correct);
        self.revealed = false;
        if !drill.is_finished() {
            return;
        }
        match drill.record_if_finished(self.store.as_ref(), now_millis()) {
            RecordOutcome::Saved(result) => {
                self.status = Some(format!(
                    "Saved {}/{} ({}%) to {} history",
                    result.correct_count,
                    result.total_count,
                    result.percent,
                    self.store.name()
                ));
                self.refresh_progress();
            }
            RecordOutcome::Failed { result, error } => {
                self.status = Some(format!(
                    "Scored {}% but could not save: {}",
                    result.percent, error
                ));
            }
            RecordOutcome::AlreadyRecorded | RecordOutcome::NotFinished => {}
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) -> Flow {
        if key.code == KeyCode::Esc
            || (key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c'))
        {
            return Flow::Quit;
        }
        match self.state {
            AppState::Guided => self.on_guided_key(key),
            AppState::Drill => self.on_drill_key(key),
            AppState::Stats => match key.code {
                KeyCode::Char('q') => return Flow::Quit,
                KeyCode::Char('b') | KeyCode::Backspace if self.guided.is_some() => {
                    self.state = AppState::Guided;
                }
                _ => {}
            },
        }
        Flow::Continue
    }

    fn on_guided_key(&mut self, key: KeyEvent) {
        let Some(guided) = self.guided.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Char(' ') | KeyCode::Enter | KeyCode::Right => {
                if guided.stage() == Stage::Complete {
                    self.reset_guided();
                } else {
                    guided.advance();
                }
            }
            KeyCode::Char('d') => {
                if let Some(request) = guided.suggested_drill(self.focus) {
                    if let Err(e) = self.start_drill(&request) {
                        self.status = Some(e.to_string());
                    }
                }
            }
            KeyCode::Char('r') => self.reset_guided(),
            KeyCode::Char('f') => self.focus = self.focus.toggled(),
            KeyCode::Char('s') => {
                self.refresh_progress();
                self.state = AppState::Stats;
            }
            _ => {}
        }
    }

    fn on_drill_key(&mut self, key: KeyEvent) {
        let finished = self.drill.as_ref().is_some_and(DrillSession::is_finished);
        match key.code {
            KeyCode::Char(' ') | KeyCode::Enter if !finished => {
                if self.revealed {
                    self.answer(true);
                } else {
                    self.revealed = true;
                }
            }
            KeyCode::Right if self.revealed => self.answer(true),
            KeyCode::Left if self.revealed => self.answer(false),
            KeyCode::Char('r') => {
                if let Some(drill) = self.drill.as_mut() {
                    drill.restart();
                }
                self.revealed = false;
                self.status = None;
            }
            KeyCode::Char('f') => {
                if let Some(drill) = self.drill.as_mut() {
                    drill.toggle_focus();
                }
            }
            KeyCode::Char('b') | KeyCode::Backspace => self.leave_drill(),
            KeyCode::Char('s') if finished => {
                self.refresh_progress();
                self.state = AppState::Stats;
            }
            _ => {}
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    init_file_logging(&AppDirs::log_path());

    let config_store = cli.config_store();
    let config = cli.effective_config(&config_store);
    if cli.config.is_none() && !config_store.path().exists() {
        // leave an editable copy of the defaults behind
        if let Err(e) = config_store.save(&Config::default()) {
            tracing::warn!("could not write default config: {}", e);
        }
    }

    let corpus = match &config.corpus_dir {
        Some(dir) => Corpus::with_dir(dir)?,
        None => Corpus::embedded()?,
    };
    let store = select_store(config.account.as_deref(), &AppDirs::state_dir());

    match &cli.command {
        Command::List => {
            let mut out = stdout().lock();
            for doc in corpus.documents() {
                writeln!(
                    out,
                    "{:>4}  {:<16} {:<16} {} verses",
                    doc.number,
                    doc.slug,
                    doc.name,
                    doc.verse_count()
                )?;
            }
            return Ok(());
        }
        Command::Export { output } => {
            let history = store.load_all()?;
            let rows = match output {
                Some(path) => write_csv(&history, File::create(path)?)?,
                None => write_csv(&history, stdout().lock())?,
            };
            tracing::info!("exported {} sessions", rows);
            return Ok(());
        }
        Command::Stats { plain: true } => {
            let record = ProgressRecord::compute(
                &load_history(store.as_ref()),
                Local::now(),
                config.average_window,
                config.timeline_days,
            );
            let mut out = stdout().lock();
            for line in ui::stats::summary_lines(&record, Local::now()) {
                writeln!(out, "{line}")?;
            }
            return Ok(());
        }
        _ => {}
    }

    let mut app = App::new(config, corpus, store);
    match &cli.command {
        Command::Guided { slug, start, end, .. } => app.start_guided(slug, *start, *end)?,
        Command::Recall {
            slug,
            start,
            end,
            hide,
            reps,
            mode,
            focus,
        } => {
            let request = SessionRequest {
                slug: slug.clone(),
                start: start.unwrap_or(1),
                end: end.unwrap_or(i64::MAX),
                hide: hide
                    .clone()
                    .unwrap_or_else(|| app.config.default_hide.to_string()),
                reps: reps.unwrap_or(app.config.default_reps as f64),
                mode: mode.unwrap_or(app.config.default_mode),
                focus: focus.unwrap_or(app.config.default_focus),
            };
            app.start_drill(&request)?;
        }
        _ => app.state = AppState::Stats,
    }

    if cli.needs_tty() && !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(
        CrosstermEventSource::new(),
        Duration::from_millis(TICK_RATE_MS),
    );

    terminal.draw(|f| ui(app, f))?;
    loop {
        match runner.step() {
            AppEvent::Tick => {
                app.on_tick();
                if app.state == AppState::Drill {
                    terminal.draw(|f| ui(app, f))?;
                }
            }
            AppEvent::Resize => {
                terminal.draw(|f| ui(app, f))?;
            }
            AppEvent::Key(key) => {
                if app.on_key(key) == Flow::Quit {
                    break;
                }
                terminal.draw(|f| ui(app, f))?;
            }
        }
    }
    if let Some(loader) = &app.loader {
        loader.cancel();
    }
    Ok(())
}

fn ui(app: &mut App, f: &mut Frame) {
    ui::screen::current_screen(&app.state).render(app, f);
}

#[cfg(test)]
mod tests {
    use super::*;
    use hifz::masking::HidePolicy;
    use hifz::store::LocalSessionStore;
    use std::time::{Duration, Instant};
    use tempfile::TempDir;

    fn guided_hide(app: &App) -> HidePolicy {
        app.guided.as_ref().unwrap().hide_policy()
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn test_app() -> (App, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalSessionStore::with_path(dir.path().join("sessions.json"));
        let app = App::new(
            Config::default(),
            Corpus::embedded().unwrap(),
            Box::new(store),
        );
        (app, dir)
    }

    fn app_with_corpus_dir(translations: &[&str]) -> (App, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let extras = dir.path().join("translations");
        std::fs::create_dir_all(&extras).unwrap();
        std::fs::write(
            extras.join("al-ikhlas.json"),
            serde_json::to_string(translations).unwrap(),
        )
        .unwrap();
        let config = Config {
            corpus_dir: Some(dir.path().to_path_buf()),
            ..Config::default()
        };
        let store = LocalSessionStore::with_path(dir.path().join("sessions.json"));
        let app = App::new(config, Corpus::embedded().unwrap(), Box::new(store));
        (app, dir)
    }

    fn tick_until(app: &mut App, done: impl Fn(&App) -> bool) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while !done(app) {
            assert!(Instant::now() < deadline, "extras never arrived");
            app.on_tick();
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    fn recall(slug: &str, start: i64, end: i64) -> SessionRequest {
        SessionRequest {
            slug: slug.into(),
            start,
            end,
            hide: "half".into(),
            reps: 1.0,
            mode: Mode::Recall,
            focus: FocusMode::PrimaryScript,
        }
    }

    #[test]
    fn test_cli_recall_arguments() {
        let cli = Cli::parse_from([
            "hifz", "recall", "al-ikhlas", "-s", "-3", "-e", "9", "--hide", "half", "-r", "2",
            "--mode", "drill", "--focus", "translit",
        ]);
        match cli.command {
            Command::Recall {
                slug,
                start,
                end,
                hide,
                reps,
                mode,
                focus,
            } => {
                assert_eq!(slug, "al-ikhlas");
                assert_eq!(start, Some(-3));
                assert_eq!(end, Some(9));
                assert_eq!(hide.as_deref(), Some("half"));
                assert_eq!(reps, Some(2.0));
                assert_eq!(mode, Some(Mode::Drill));
                assert_eq!(focus, Some(FocusMode::Transliteration));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_cli_guided_chunk_size_overrides_config() {
        let dir = tempfile::tempdir().unwrap();
        let cli = Cli::parse_from([
            "hifz", "--config", dir.path().join("c.json").to_str().unwrap(), "guided", "an-nas",
            "-k", "2",
        ]);
        let cfg = cli.effective_config(&cli.config_store());
        assert_eq!(cfg.chunk_size, 2);
        assert!(cli.needs_tty());
    }

    #[test]
    fn test_cli_plain_stats_needs_no_tty() {
        let cli = Cli::parse_from(["hifz", "stats", "--plain"]);
        assert!(!cli.needs_tty());
        let cli = Cli::parse_from(["hifz", "--account", "me", "list"]);
        assert!(!cli.needs_tty());
        assert_eq!(cli.account.as_deref(), Some("me"));
    }

    #[test]
    fn test_drill_reveal_then_answer() {
        let (mut app, _dir) = test_app();
        app.start_drill(&recall("al-ikhlas", 1, 2)).unwrap();
        assert_eq!(app.state, AppState::Drill);

        // arrows do nothing until the verse is revealed
        app.on_key(key(KeyCode::Right));
        assert_eq!(app.drill.as_ref().unwrap().index(), 0);

        app.on_key(key(KeyCode::Char(' ')));
        assert!(app.revealed);
        app.on_key(key(KeyCode::Left));
        assert!(!app.revealed);
        assert_eq!(app.drill.as_ref().unwrap().score(), 0);

        app.on_key(key(KeyCode::Enter));
        app.on_key(key(KeyCode::Enter));
        let drill = app.drill.as_ref().unwrap();
        assert!(drill.is_finished());
        assert_eq!(drill.score(), 1);
        assert!(app.status.as_deref().unwrap().contains("50%"));
        assert_eq!(app.progress.total_sessions, 1);
    }

    #[test]
    fn test_finished_drill_is_saved_once() {
        let (mut app, _dir) = test_app();
        app.start_drill(&recall("an-nas", 1, 1)).unwrap();
        for _ in 0..4 {
            app.on_key(key(KeyCode::Char(' ')));
        }
        assert_eq!(app.store.load_all().unwrap().len(), 1);

        app.on_key(key(KeyCode::Char('r')));
        assert_eq!(app.drill.as_ref().unwrap().index(), 0);
        app.on_key(key(KeyCode::Char(' ')));
        app.on_key(key(KeyCode::Char(' ')));
        assert_eq!(app.store.load_all().unwrap().len(), 2);
    }

    #[test]
    fn test_guided_suggests_drill_and_returns() {
        let (mut app, _dir) = test_app();
        app.start_guided("al-ikhlas", None, None).unwrap();
        assert_eq!(guided_hide(&app), HidePolicy::None);
        // 3 full, 3 chunk, 3 verses x 3 reads
        for _ in 0..(3 + 3 + 9) {
            app.on_key(key(KeyCode::Char(' ')));
        }
        assert_eq!(app.guided.as_ref().unwrap().stage(), Stage::ChunkHalf);
        assert_eq!(guided_hide(&app), HidePolicy::Half);

        app.on_key(key(KeyCode::Char('d')));
        assert_eq!(app.state, AppState::Drill);
        let drill = app.drill.as_ref().unwrap();
        assert_eq!(drill.range, VerseRange { start: 1, end: 3 });
        assert_eq!(drill.hide, HidePolicy::Half);
        assert_eq!(drill.repetitions, 3);

        app.on_key(key(KeyCode::Char('b')));
        assert_eq!(app.state, AppState::Guided);
        assert!(app.drill.is_none());
        assert_eq!(app.guided.as_ref().unwrap().stage(), Stage::ChunkHalf);
    }

    #[test]
    fn test_guided_loads_extras_for_its_range() {
        let (mut app, _dir) = app_with_corpus_dir(&["T1", "T2", "T3", "T4"]);
        app.start_guided("al-ikhlas", Some(2), Some(3)).unwrap();
        assert_eq!(
            app.guided.as_ref().unwrap().translation(0),
            Some("Allah, the eternally Besought of all!")
        );
        tick_until(&mut app, |app| {
            app.guided.as_ref().unwrap().translation(0) == Some("T2")
        });
        let guided = app.guided.as_ref().unwrap();
        assert_eq!(guided.translation(0), Some("T2"));
        assert_eq!(guided.translation(1), Some("T3"));
        assert!(app.pending_extras.is_none());
    }

    #[test]
    fn test_guided_reset_and_drill_supersede_pending_extras() {
        let (mut app, _dir) = app_with_corpus_dir(&["T1", "T2", "T3", "T4"]);
        app.start_guided("al-ikhlas", None, None).unwrap();
        let first = app.pending_extras.unwrap();

        app.on_key(key(KeyCode::Char('r')));
        let loader = app.loader.as_ref().unwrap();
        assert!(!loader.is_current(first));
        let after_reset = app.pending_extras.unwrap();
        assert!(loader.is_current(after_reset));

        app.start_drill(&recall("al-ikhlas", 1, 2)).unwrap();
        assert!(!app.loader.as_ref().unwrap().is_current(after_reset));
        tick_until(&mut app, |app| {
            app.drill.as_ref().unwrap().current_translation() == Some("T1")
        });
        // nothing went to the guided session while the drill was up
        assert_eq!(
            app.guided.as_ref().unwrap().translation(0),
            Some("Say: He is Allah, the One!")
        );

        // back on the guided page its lines are fetched again
        app.on_key(key(KeyCode::Char('b')));
        tick_until(&mut app, |app| {
            app.guided.as_ref().unwrap().translation(0) == Some("T1")
        });
        assert_eq!(app.guided.as_ref().unwrap().translation(3), Some("T4"));
    }

    #[test]
    fn test_quit_keys() {
        let (mut app, _dir) = test_app();
        assert_eq!(app.on_key(key(KeyCode::Char('q'))), Flow::Quit);
        app.start_guided("al-fatihah", Some(2), Some(4)).unwrap();
        assert_eq!(app.on_key(key(KeyCode::Char('q'))), Flow::Continue);
        assert_eq!(app.on_key(key(KeyCode::Esc)), Flow::Quit);
        assert_eq!(
            app.on_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Flow::Quit
        );
    }

    #[test]
    fn test_invalid_guided_config_refuses_to_start() {
        let (mut app, _dir) = test_app();
        app.config.chunk_size = 0;
        assert!(app.start_guided("al-ikhlas", None, None).is_err());
        assert!(app.guided.is_none());
    }
}
