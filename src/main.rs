use std::fs::File;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use tokio::sync::mpsc;
use tokio::time::{Instant, Interval, MissedTickBehavior};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use kubepods_kubectl::{
    CommandRunner, ContextInfo, DeleteOptions, Kubectl, KubectlError, PodRecord, ProcessRunner,
};
use kubepods_tui::{
    Action, AppState, Command, CommandPaletteState, DeleteMenuState, Event, EventHandler,
    FsBrowser, KeyBindings, KeyContext, Overrides, Screen, Settings, Tui, config::FileConfig,
    pod_table_commands, render,
};
use kubepods_types::{SortKey, TableRow, render_plain, sort_rows};

const TICK_RATE: Duration = Duration::from_millis(250);

/// kubepods - a terminal pod table driven by kubectl
#[derive(Parser, Debug)]
#[command(name = "kubepods")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Switch kubectl to this context before starting
    #[arg(long)]
    context: Option<String>,

    /// Scope pod commands to this namespace
    #[arg(short, long)]
    namespace: Option<String>,

    /// kubectl binary to run
    #[arg(long, value_name = "PATH")]
    kubectl: Option<String>,

    /// Config file (default: ~/.config/kubepods/config.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Seconds between automatic refreshes, 0 to disable
    #[arg(long, value_name = "SECS")]
    refresh_interval: Option<u64>,

    /// Command run by exec, split on whitespace
    #[arg(long, value_name = "CMD")]
    shell: Option<String>,

    /// Initial sort column: name, namespace, status, restarts or age
    #[arg(long)]
    sort: Option<SortKey>,

    /// Print the pod table once and exit
    #[arg(long)]
    print: bool,

    /// Write logs here instead of discarding them
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_tracing(&args)?;

    let result = run(args).await;

    if let Err(e) = &result {
        eprintln!("Error: {:#}", e);
    }

    result
}

/// Logs go to `--log-file` when given. Otherwise stderr in print mode, and
/// nowhere while the TUI owns the terminal.
fn init_tracing(args: &Args) -> Result<()> {
    let filter = || EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    if let Some(path) = &args.log_file {
        let file = File::create(path)
            .with_context(|| format!("Failed to create log file {}", path.display()))?;
        tracing_subscriber::fmt()
            .with_env_filter(filter())
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    } else if args.print {
        tracing_subscriber::fmt()
            .with_env_filter(filter())
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter())
            .with_writer(std::io::sink)
            .init();
    }

    Ok(())
}

async fn run(args: Args) -> Result<()> {
    let file = FileConfig::load(args.config.as_deref())?;
    let settings = Settings::resolve(
        file,
        Overrides {
            kubectl: args.kubectl.clone(),
            namespace: args.namespace.clone(),
            exec_command: args
                .shell
                .as_deref()
                .map(|s| s.split_whitespace().map(str::to_string).collect()),
            refresh_interval_secs: args.refresh_interval,
            sort: args.sort,
        },
    );
    debug!(?settings, "resolved settings");

    let kubectl = Arc::new(Kubectl::new(
        settings.kubectl.clone(),
        settings.namespace.clone(),
    ));

    if let Some(context) = &args.context {
        let name = context.clone();
        blocking(&kubectl, move |k| k.use_context(&name))
            .await
            .with_context(|| format!("Failed to switch to context '{}'", context))?;
        info!(context = %context, "switched context");
    }

    if args.print {
        print_table(&kubectl, settings.sort).await
    } else {
        run_app(kubectl, settings).await
    }
}

/// One-shot mode: fetch, project, print
async fn print_table(kubectl: &Arc<Kubectl>, sort: SortKey) -> Result<()> {
    let pods = Arc::clone(kubectl)
        .fetch_pods()
        .await
        .context("Failed to fetch pods")?;

    let now = Utc::now();
    let mut rows: Vec<TableRow> = pods.iter().map(|p| TableRow::project(p, now)).collect();
    sort_rows(&mut rows, sort, false);

    // Every line, the last included, already ends in a newline
    print!("{}", render_plain(&rows));
    Ok(())
}

/// Run a kubectl call on the blocking pool
async fn blocking<R, T, F>(kubectl: &Arc<Kubectl<R>>, f: F) -> Result<T, KubectlError>
where
    R: CommandRunner + 'static,
    F: FnOnce(&Kubectl<R>) -> Result<T, KubectlError> + Send + 'static,
    T: Send + 'static,
{
    let kubectl = Arc::clone(kubectl);
    tokio::task::spawn_blocking(move || f(&kubectl))
        .await
        .map_err(|e| KubectlError::Task(e.to_string()))?
}

/// Results of background kubectl calls
enum InternalAction {
    PodsLoaded(Result<Vec<PodRecord>, KubectlError>),
    ContextsLoaded(Result<Vec<ContextInfo>, KubectlError>),
}

/// What the loop must do after an action that needs the terminal
enum Handoff {
    Exec(String),
}

/// Everything action handlers need besides the state itself
struct Session<R = ProcessRunner> {
    kubectl: Arc<Kubectl<R>>,
    exec_command: Vec<String>,
    internal_tx: mpsc::UnboundedSender<InternalAction>,
}

impl<R: CommandRunner + 'static> Session<R> {
    /// Ask for a refresh through the gate, starting a fetch if none is running
    fn request_refresh(&self, state: &mut AppState) {
        if state.refresh.request() {
            self.spawn_fetch();
        } else {
            debug!("refresh already running; coalescing");
        }
    }

    fn spawn_fetch(&self) {
        let kubectl = Arc::clone(&self.kubectl);
        let tx = self.internal_tx.clone();
        tokio::spawn(async move {
            let result = kubectl.fetch_pods().await;
            let _ = tx.send(InternalAction::PodsLoaded(result));
        });
    }

    fn spawn_contexts(&self) {
        let kubectl = Arc::clone(&self.kubectl);
        let tx = self.internal_tx.clone();
        tokio::spawn(async move {
            let result = blocking(&kubectl, |k| k.contexts()).await;
            let _ = tx.send(InternalAction::ContextsLoaded(result));
        });
    }

    /// Delete the pod captured when the delete was requested, never the
    /// current selection, which a refresh may have moved
    async fn delete(&self, state: &mut AppState, target: Option<String>, options: DeleteOptions) {
        let target = if options.all { None } else { target };

        let what = target.clone().unwrap_or_else(|| "all pods".to_string());
        match blocking(&self.kubectl, move |k| k.delete_pods(target.as_deref(), &options)).await {
            Ok(out) => {
                info!(target = %what, "deleted");
                let msg = out.lines().last().unwrap_or_default();
                if msg.is_empty() {
                    state.show_status(format!("Deleted {}", what));
                } else {
                    state.show_status(msg);
                }
            }
            Err(KubectlError::NoTarget) => {
                state.show_error("No pod selected");
                return;
            }
            Err(e) => state.show_error(format!("Delete failed: {}", e)),
        }

        self.request_refresh(state);
    }

    async fn select_context(&self, state: &mut AppState, name: String) {
        let target = name.clone();
        match blocking(&self.kubectl, move |k| k.use_context(&target)).await {
            Ok(out) => {
                info!(context = %name, "switched context");
                state.context_switched(name.clone());
                state.go_back();
                if out.is_empty() {
                    state.show_status(format!("Switched to context \"{}\"", name));
                } else {
                    state.show_status(out);
                }
                self.request_refresh(state);
            }
            Err(e) => state.show_error(format!("Context switch failed: {}", e)),
        }
    }

    /// List `path` in the pod being browsed, or open a browser on `pod` at `/`
    async fn list_dir(&self, state: &mut AppState, pod: String, path: String) {
        let (p, dir) = (pod.clone(), path.clone());
        match blocking(&self.kubectl, move |k| k.list_dir(&p, &dir)).await {
            Ok(entries) => {
                debug!(pod = %pod, path = %path, count = entries.len(), "listed directory");
                match &mut state.fs_browser {
                    Some(browser) if browser.pod == pod => browser.set_listing(path, entries),
                    _ => {
                        let mut browser = FsBrowser::new(pod);
                        browser.set_listing(path, entries);
                        state.fs_browser = Some(browser);
                        state.navigate_to(Screen::FileBrowser);
                    }
                }
            }
            Err(e) => state.show_error(format!("Cannot list {}: {}", path, e)),
        }
    }
}

async fn run_app(kubectl: Arc<Kubectl>, settings: Settings) -> Result<()> {
    // Create action channels
    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();
    let (internal_tx, mut internal_rx) = mpsc::unbounded_channel::<InternalAction>();

    let mut state = AppState::new(action_tx.clone(), settings.sort);
    state.namespace = kubectl.namespace().map(str::to_string);
    state.current_context = match blocking(&kubectl, |k| k.current_context()).await {
        Ok(current) => current,
        Err(e) => {
            warn!(error = %e, "could not read current context");
            None
        }
    };

    let session = Session {
        kubectl,
        exec_command: settings.exec_command.clone(),
        internal_tx,
    };

    let mut tui = Tui::new().context("Failed to initialise terminal")?;
    let mut events = EventHandler::new(TICK_RATE);
    let keybindings = KeyBindings::new();

    let mut palette_state = CommandPaletteState::default();
    let commands = pod_table_commands();

    let mut refresh_timer = settings.refresh_interval.map(|period| {
        let mut timer = tokio::time::interval_at(Instant::now() + period, period);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        timer
    });

    session.request_refresh(&mut state);
    draw(&mut tui, &mut state, &mut palette_state, &commands)?;

    loop {
        let mut handoff = None;

        tokio::select! {
            Some(event) = events.next() => {
                match event {
                    Event::Key(key) => {
                        let action = if palette_state.visible {
                            keybindings.get_palette_action(&key)
                        } else if state.ui_state.delete_menu.is_some() {
                            keybindings.get_delete_menu_action(&key)
                        } else {
                            let context = match state.current_screen {
                                Screen::PodTable => KeyContext::PodTable,
                                Screen::ContextSelect => KeyContext::ListNavigation,
                                Screen::FileBrowser => KeyContext::FileBrowser,
                            };
                            keybindings.get_action(context, &key)
                        };

                        if let Some(action) = action {
                            let _ = action_tx.send(action);
                        }
                    }
                    Event::Tick => {}
                    Event::Resize(_, _) => {
                        let _ = action_tx.send(Action::Render);
                    }
                    Event::Error(e) => {
                        state.show_error(e);
                    }
                }
            }

            _ = next_tick(&mut refresh_timer) => {
                if state.current_screen == Screen::PodTable {
                    session.request_refresh(&mut state);
                }
            }

            Some(action) = action_rx.recv() => {
                handoff = handle_action(&mut state, &session, &mut palette_state, &commands, action).await;
            }

            Some(internal) = internal_rx.recv() => {
                handle_internal(&mut state, &session, internal);
            }
        }

        if let Some(Handoff::Exec(pod)) = handoff {
            events = exec_in_pod(&mut tui, events, &mut state, &session, pod).await?;
        }

        if state.should_quit {
            break;
        }

        draw(&mut tui, &mut state, &mut palette_state, &commands)?;
    }

    events.shutdown();
    tui.restore()?;

    Ok(())
}

fn handle_internal<R: CommandRunner + 'static>(
    state: &mut AppState,
    session: &Session<R>,
    internal: InternalAction,
) {
    match internal {
        InternalAction::PodsLoaded(Ok(pods)) => {
            if state.refresh_succeeded(&pods) {
                session.spawn_fetch();
            }
        }
        InternalAction::PodsLoaded(Err(e)) => {
            warn!(error = %e, "refresh failed");
            if state.refresh_failed(e.to_string()) {
                session.spawn_fetch();
            }
        }
        InternalAction::ContextsLoaded(Ok(contexts)) => {
            state.open_contexts(contexts);
        }
        InternalAction::ContextsLoaded(Err(e)) => {
            state.show_error(format!("Failed to list contexts: {}", e));
        }
    }
}

/// Resolves on the next auto-refresh tick, never when auto-refresh is off
async fn next_tick(timer: &mut Option<Interval>) {
    match timer {
        Some(timer) => {
            timer.tick().await;
        }
        None => std::future::pending().await,
    }
}

/// Hand the terminal to `kubectl exec -it` and take it back afterwards.
///
/// The input reader is stopped first so it cannot steal keystrokes from the
/// child; a fresh one is returned.
async fn exec_in_pod<R: CommandRunner + 'static>(
    tui: &mut Tui,
    events: EventHandler,
    state: &mut AppState,
    session: &Session<R>,
    pod: String,
) -> Result<EventHandler> {
    events.stop().await;
    tui.suspend().context("Failed to release terminal")?;

    let (p, command) = (pod.clone(), session.exec_command.clone());
    let result = blocking(&session.kubectl, move |k| k.exec(&p, &command)).await;

    tui.resume().context("Failed to restore terminal")?;

    match result {
        Ok(()) => state.show_status(format!("Exec session in {} ended", pod)),
        Err(e) => state.show_error(format!("Exec failed: {}", e)),
    }
    session.request_refresh(state);

    Ok(EventHandler::new(TICK_RATE))
}

async fn handle_action<R: CommandRunner + 'static>(
    state: &mut AppState,
    session: &Session<R>,
    palette_state: &mut CommandPaletteState,
    commands: &[Command],
    action: Action,
) -> Option<Handoff> {
    match action {
        Action::Quit => {
            state.should_quit = true;
        }

        Action::GoBack => {
            if state.ui_state.help_visible {
                state.ui_state.help_visible = false;
            } else {
                state.go_back();
            }
        }

        Action::ListUp => state.list_up(),
        Action::ListDown => state.list_down(),
        Action::ListTop => state.list_top(),
        Action::ListBottom => state.list_bottom(),

        Action::ListSelect => match state.current_screen {
            Screen::PodTable => {
                let _ = state.action_tx.send(Action::Visit);
            }
            Screen::ContextSelect => {
                if let Some(name) = state.highlighted_context() {
                    let _ = state.action_tx.send(Action::SelectContext(name.to_string()));
                }
            }
            Screen::FileBrowser => {
                let Some(browser) = &state.fs_browser else {
                    return None;
                };
                let pod = browser.pod.clone();
                let dir = browser.selected_dir_path();
                let file = browser.selected().map(|e| e.name.clone());

                if let Some(path) = dir {
                    session.list_dir(state, pod, path).await;
                } else if let Some(name) = file {
                    state.show_status(format!("{} is not a directory", name));
                }
            }
        },

        Action::ToggleCommandPalette => {
            if state.current_screen == Screen::PodTable {
                palette_state.open(commands);
            }
        }
        Action::PaletteUp => palette_state.move_up(),
        Action::PaletteDown => palette_state.move_down(),
        Action::PaletteInput(c) => palette_state.input_char(c, commands),
        Action::PaletteBackspace => palette_state.input_backspace(commands),
        Action::PaletteClose => palette_state.close(),
        Action::PaletteSelect => {
            let selected = palette_state.selected_command(commands).map(|c| c.action.clone());
            palette_state.close();
            if let Some(action) = selected {
                let _ = state.action_tx.send(action);
            }
        }

        Action::ToggleHelp => {
            state.ui_state.help_visible = !state.ui_state.help_visible;
        }

        Action::Refresh => session.request_refresh(state),

        Action::OpenContexts => session.spawn_contexts(),
        Action::SelectContext(name) => session.select_context(state, name).await,

        Action::DeletePod => match state.selected_pod() {
            Some(pod) => {
                let _ = state.action_tx.send(Action::ConfirmDelete {
                    target: Some(pod.to_string()),
                    options: DeleteOptions::default(),
                });
            }
            None => state.show_error("No pod selected"),
        },
        Action::OpenDeleteMenu => {
            let target = state.selected_pod().map(str::to_string);
            state.ui_state.delete_menu = Some(DeleteMenuState::new(target));
        }
        Action::DeleteMenuUp => {
            if let Some(menu) = &mut state.ui_state.delete_menu {
                menu.move_up();
            }
        }
        Action::DeleteMenuDown => {
            if let Some(menu) = &mut state.ui_state.delete_menu {
                menu.move_down();
            }
        }
        Action::DeleteMenuToggle => {
            if let Some(menu) = &mut state.ui_state.delete_menu {
                menu.toggle_selected();
            }
        }
        Action::DeleteMenuConfirm => {
            if let Some(menu) = state.ui_state.delete_menu.take_if(|m| m.can_confirm()) {
                let _ = state.action_tx.send(Action::ConfirmDelete {
                    target: menu.target,
                    options: menu.options,
                });
            }
        }
        Action::DeleteMenuClose => {
            state.ui_state.delete_menu = None;
        }
        Action::ConfirmDelete { target, options } => {
            session.delete(state, target, options).await
        }

        Action::Exec => match state.selected_pod() {
            Some(pod) => return Some(Handoff::Exec(pod.to_string())),
            None => state.show_error("No pod selected"),
        },

        Action::OpenFilesystem => match state.selected_pod() {
            Some(pod) => {
                let pod = pod.to_string();
                session.list_dir(state, pod, "/".to_string()).await;
            }
            None => state.show_error("No pod selected"),
        },
        Action::FsParent => {
            if let Some(browser) = &state.fs_browser {
                if let Some(parent) = browser.parent_path() {
                    let pod = browser.pod.clone();
                    session.list_dir(state, pod, parent).await;
                }
            }
        }
        Action::FsReload => {
            if let Some(browser) = &state.fs_browser {
                let (pod, path) = (browser.pod.clone(), browser.path.clone());
                session.list_dir(state, pod, path).await;
            }
        }

        Action::Visit => {
            let visited = state
                .pod_table
                .selected()
                .map(|row| format!("Pod {}/{}", row.namespace, row.name));
            match visited {
                Some(msg) => state.show_status(msg),
                None => state.show_error("No pod selected"),
            }
        }

        Action::CycleSort => state.pod_table.cycle_sort_key(),
        Action::ReverseSort => {
            let key = state.pod_table.sort_key();
            state.pod_table.set_sort_key(key);
        }
        Action::SortBy(key) => state.pod_table.set_sort_key(key),

        Action::DismissMessage => state.dismiss_message(),

        Action::Tick | Action::Render => {}
    }

    None
}

fn draw(
    tui: &mut Tui,
    state: &mut AppState,
    palette_state: &mut CommandPaletteState,
    commands: &[Command],
) -> Result<()> {
    tui.terminal()
        .draw(|frame| render(frame, state, palette_state, commands))?;
    Ok(())
}
