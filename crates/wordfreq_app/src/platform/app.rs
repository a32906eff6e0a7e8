use std::io::{self, BufRead, Write};
use std::sync::mpsc;
use std::thread;

use anyhow::{bail, Result};
use engine_logging::{engine_debug, engine_info};
use wordfreq_core::{update, AppState, AppViewModel, ExportNotice, Msg, Screen};

use super::effects::EffectRunner;
use super::ui::chart::{ensure_chart_registered, ChartRegistry};
use super::ui::commands::{help_text, parse_command, Command};
use super::ui::constants::PROMPT;
use super::ui::render::render;
use crate::config::AppConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Read commands from stdin until `quit` or end of input.
    Interactive,
    /// Fetch, print, export and exit.
    Once,
}

/// Everything the main loop reacts to: user commands and engine results.
#[derive(Debug)]
pub enum AppInput {
    Msg(Msg),
    Help,
    Quit,
}

pub fn run_app(config: AppConfig, mode: RunMode) -> Result<()> {
    let registry = ensure_chart_registered();
    let (input_tx, input_rx) = mpsc::channel::<AppInput>();
    let runner = EffectRunner::new(&config, input_tx.clone())?;
    let mut app = App::new(AppState::with_source_url(config.url.clone()), registry, runner);

    app.present()?;
    match mode {
        RunMode::Interactive => {
            println!("{}", help_text());
            prompt()?;
            spawn_stdin_reader(input_tx);
            app.run_interactive(input_rx)
        }
        RunMode::Once => {
            drop(input_tx);
            app.run_once(input_rx)
        }
    }
}

struct App {
    state: AppState,
    registry: &'static ChartRegistry,
    runner: EffectRunner,
}

impl App {
    fn new(state: AppState, registry: &'static ChartRegistry, runner: EffectRunner) -> Self {
        Self {
            state,
            registry,
            runner,
        }
    }

    fn dispatch(&mut self, msg: Msg) -> Result<AppViewModel> {
        engine_debug!("Dispatching {:?}", msg);
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        if self.state.consume_dirty() {
            self.present()?;
        }
        self.runner.enqueue(effects);
        Ok(self.state.view())
    }

    fn present(&self) -> Result<()> {
        let text = render(self.registry, &self.state.view());
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{text}")?;
        stdout.flush()?;
        Ok(())
    }

    fn run_interactive(&mut self, input_rx: mpsc::Receiver<AppInput>) -> Result<()> {
        while let Ok(input) = input_rx.recv() {
            match input {
                AppInput::Msg(msg) => {
                    self.dispatch(msg)?;
                }
                AppInput::Help => println!("{}", help_text()),
                AppInput::Quit => break,
            }
            prompt()?;
        }
        engine_info!("Leaving interactive loop");
        Ok(())
    }

    fn run_once(&mut self, input_rx: mpsc::Receiver<AppInput>) -> Result<()> {
        let view = self.dispatch(Msg::FetchClicked)?;
        if !view.fetch_in_flight {
            bail!(
                "fetch not started: {}",
                view.last_error.unwrap_or_default()
            );
        }

        while let Ok(input) = input_rx.recv() {
            let AppInput::Msg(msg) = input else {
                continue;
            };
            let view = self.dispatch(msg)?;
            match (&view.screen, &view.export_notice) {
                (Screen::Idle, _) if !view.fetch_in_flight => {
                    bail!("fetch failed: {}", view.last_error.unwrap_or_default());
                }
                (Screen::Displaying, None) => {
                    self.dispatch(Msg::ExportClicked)?;
                }
                (Screen::Displaying, Some(ExportNotice::Saved { .. })) => return Ok(()),
                (Screen::Displaying, Some(ExportNotice::Failed { message })) => {
                    bail!("export failed: {message}");
                }
                _ => {}
            }
        }
        bail!("engine stopped before the document was analyzed")
    }
}

fn prompt() -> Result<()> {
    let mut stdout = io::stdout().lock();
    write!(stdout, "{PROMPT}")?;
    stdout.flush()?;
    Ok(())
}

fn spawn_stdin_reader(input_tx: mpsc::Sender<AppInput>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else {
                break;
            };
            let input = match parse_command(&line) {
                Some(Command::Msg(msg)) => AppInput::Msg(msg),
                Some(Command::Help) => AppInput::Help,
                Some(Command::Quit) => AppInput::Quit,
                Some(Command::Unknown(text)) => {
                    println!("Unknown command {text:?}; type `help`.");
                    continue;
                }
                None => continue,
            };
            if input_tx.send(input).is_err() {
                return;
            }
        }
        let _ = input_tx.send(AppInput::Quit);
    });
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::Arc;

    use tempfile::TempDir;
    use wordfreq_engine::{
        EngineHandle, FailureKind, FetchError, FetchedDocument, Fetcher, PipelineSettings,
        ProgressSink, RequestId, CSV_FILENAME,
    };

    use super::*;

    struct StaticFetcher {
        body: Result<&'static str, FailureKind>,
    }

    #[async_trait::async_trait]
    impl Fetcher for StaticFetcher {
        async fn fetch(
            &self,
            _request_id: RequestId,
            url: &str,
            _sink: &dyn ProgressSink,
        ) -> Result<FetchedDocument, FetchError> {
            let body = self
                .body
                .clone()
                .map_err(|kind| FetchError::new(kind, "static failure"))?;
            Ok(FetchedDocument {
                body: body.as_bytes().to_vec(),
                final_url: url.to_string(),
                content_type: Some("text/plain".to_string()),
            })
        }
    }

    fn once_app(
        body: Result<&'static str, FailureKind>,
        output_dir: &Path,
    ) -> (App, mpsc::Receiver<AppInput>) {
        let config = AppConfig {
            url: "https://example.com/test.txt".to_string(),
            output_dir: output_dir.to_path_buf(),
            write_manifest: false,
            ..AppConfig::default()
        };
        let engine = EngineHandle::with_fetcher(
            Arc::new(StaticFetcher { body }),
            PipelineSettings::default(),
        )
        .expect("engine starts");
        let (input_tx, input_rx) = mpsc::channel();
        let runner = EffectRunner::with_engine(engine, &config, input_tx);
        let app = App::new(
            AppState::with_source_url(config.url.clone()),
            ensure_chart_registered(),
            runner,
        );
        (app, input_rx)
    }

    #[test]
    fn once_mode_fetches_and_exports() {
        engine_logging::initialize_for_tests();
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("out");
        let (mut app, input_rx) = once_app(Ok("the cat sat on the mat. the cat ran."), &out);

        app.run_once(input_rx).expect("once mode succeeds");

        let csv = std::fs::read_to_string(out.join(CSV_FILENAME)).unwrap();
        assert_eq!(csv, "the,3\ncat,2\nsat,1\non,1\nmat,1\nran,1\n,1");
        assert!(matches!(
            app.state.view().export_notice,
            Some(ExportNotice::Saved { .. })
        ));
    }

    #[test]
    fn once_mode_fails_when_the_fetch_fails() {
        engine_logging::initialize_for_tests();
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("out");
        let (mut app, input_rx) = once_app(Err(FailureKind::HttpStatus(404)), &out);

        let err = app.run_once(input_rx).unwrap_err();
        assert!(err.to_string().starts_with("fetch failed"), "{err}");
        assert!(err.to_string().contains("http status 404"), "{err}");
        assert!(!out.join(CSV_FILENAME).exists());
    }

    #[test]
    fn once_mode_rejects_an_invalid_source_url() {
        let temp = TempDir::new().unwrap();
        let (mut app, input_rx) = once_app(Ok("unused"), temp.path());
        app.dispatch(Msg::SourceUrlChanged("ftp://example.com/file".to_string()))
            .unwrap();

        let err = app.run_once(input_rx).unwrap_err();
        assert!(err.to_string().starts_with("fetch not started"), "{err}");
    }
}
