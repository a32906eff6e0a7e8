use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

use chrono::Utc;
use engine_logging::{engine_error, engine_info, engine_warn};
use wordfreq_core::{Effect, HistogramRow, Msg};
use wordfreq_engine::{
    write_export, Analysis, EngineEvent, EngineHandle, ExportOptions, FetchError, RankedEntry,
    MANIFEST_FILENAME,
};

use super::app::AppInput;
use crate::config::AppConfig;

pub struct EffectRunner {
    engine: EngineHandle,
    output_dir: PathBuf,
    write_manifest: bool,
    input_tx: mpsc::Sender<AppInput>,
}

impl EffectRunner {
    pub fn new(config: &AppConfig, input_tx: mpsc::Sender<AppInput>) -> Result<Self, FetchError> {
        let engine = EngineHandle::new(config.engine_settings())?;
        Ok(Self::with_engine(engine, config, input_tx))
    }

    pub fn with_engine(
        engine: EngineHandle,
        config: &AppConfig,
        input_tx: mpsc::Sender<AppInput>,
    ) -> Self {
        let runner = Self {
            engine,
            output_dir: config.output_dir.clone(),
            write_manifest: config.write_manifest,
            input_tx,
        };
        runner.spawn_event_loop();
        runner
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::FetchDocument { request_id, url } => {
                    engine_info!("FetchDocument request_id={} url={}", request_id, url);
                    if let Err(err) = self.engine.fetch(request_id, url) {
                        engine_error!("Request {} not started: {}", request_id, err);
                        self.send(Msg::FetchFailed {
                            request_id,
                            message: err.to_string(),
                        });
                    }
                }
                Effect::ExportCsv {
                    rows,
                    total_tokens,
                    distinct_tokens,
                    source_url,
                } => {
                    let analysis = Analysis {
                        histogram: rows.into_iter().map(to_entry).collect(),
                        total_tokens,
                        distinct_tokens,
                    };
                    let result = self.export(&analysis, source_url);
                    self.send(Msg::ExportFinished(result));
                }
            }
        }
    }

    fn send(&self, msg: Msg) {
        if self.input_tx.send(AppInput::Msg(msg)).is_err() {
            engine_warn!("Main loop is gone; dropping message");
        }
    }

    fn export(&self, analysis: &Analysis, source_url: String) -> Result<String, String> {
        let options = ExportOptions {
            manifest_filename: self.write_manifest.then(|| MANIFEST_FILENAME.to_string()),
            source_url: Some(source_url),
            generated_utc: Some(Utc::now().to_rfc3339()),
            ..ExportOptions::default()
        };
        match write_export(&self.output_dir, analysis, &options) {
            Ok(summary) => Ok(summary.csv_path.display().to_string()),
            Err(err) => {
                engine_error!("Export to {:?} failed: {}", self.output_dir, err);
                Err(err.to_string())
            }
        }
    }

    fn spawn_event_loop(&self) {
        let engine = self.engine.clone();
        let input_tx = self.input_tx.clone();
        thread::spawn(move || {
            while let Some(event) = engine.recv() {
                let msg = match event {
                    EngineEvent::Progress {
                        request_id,
                        stage,
                        bytes,
                    } => {
                        engine_info!("Request {} at {:?} ({:?} bytes)", request_id, stage, bytes);
                        continue;
                    }
                    EngineEvent::AnalysisCompleted { request_id, result } => match result {
                        Ok(analysis) => Msg::FetchSucceeded {
                            request_id,
                            rows: analysis.histogram.into_iter().map(to_row).collect(),
                            total_tokens: analysis.total_tokens,
                            distinct_tokens: analysis.distinct_tokens,
                        },
                        Err(err) => {
                            engine_warn!("Request {} failed: {}", request_id, err);
                            Msg::FetchFailed {
                                request_id,
                                message: err.to_string(),
                            }
                        }
                    },
                };
                if input_tx.send(AppInput::Msg(msg)).is_err() {
                    break;
                }
            }
        });
    }
}

fn to_row(entry: RankedEntry) -> HistogramRow {
    HistogramRow::new(entry.word, entry.frequency)
}

fn to_entry(row: HistogramRow) -> RankedEntry {
    RankedEntry::new(row.word, row.frequency)
}
