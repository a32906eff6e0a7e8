use url::Url;

use crate::{AppState, Effect, ExportNotice, Msg, Screen};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::SourceUrlChanged(raw) => {
            let url = raw.trim();
            let editable = state.screen() == Screen::Idle && state.in_flight().is_none();
            if editable && url != state.source_url() {
                state.set_source_url(url.to_string());
            }
            Vec::new()
        }
        Msg::FetchClicked => {
            // A fetch already in flight keeps the trigger disabled.
            if state.screen() != Screen::Idle || state.in_flight().is_some() {
                return (state, Vec::new());
            }
            match Url::parse(state.source_url()) {
                Ok(url) if matches!(url.scheme(), "http" | "https") => {
                    let url = state.source_url().to_string();
                    let request_id = state.begin_fetch();
                    vec![Effect::FetchDocument { request_id, url }]
                }
                Ok(url) => {
                    state.set_error(format!("unsupported url scheme {}", url.scheme()));
                    Vec::new()
                }
                Err(err) => {
                    state.set_error(format!("invalid source url: {err}"));
                    Vec::new()
                }
            }
        }
        Msg::FetchSucceeded {
            request_id,
            rows,
            total_tokens,
            distinct_tokens,
        } => {
            if state.in_flight() == Some(request_id) {
                state.show_histogram(rows, total_tokens, distinct_tokens);
            }
            Vec::new()
        }
        Msg::FetchFailed {
            request_id,
            message,
        } => {
            if state.in_flight() == Some(request_id) {
                state.fail_fetch(message);
            }
            Vec::new()
        }
        Msg::ExportClicked => {
            if state.screen() == Screen::Displaying {
                let (total_tokens, distinct_tokens) = state.totals();
                vec![Effect::ExportCsv {
                    rows: state.rows().to_vec(),
                    total_tokens,
                    distinct_tokens,
                    source_url: state.source_url().to_string(),
                }]
            } else {
                Vec::new()
            }
        }
        Msg::ExportFinished(result) => {
            if state.screen() == Screen::Displaying {
                let notice = match result {
                    Ok(path) => ExportNotice::Saved { path },
                    Err(message) => ExportNotice::Failed { message },
                };
                state.set_export_notice(notice);
            }
            Vec::new()
        }
        Msg::BackClicked => {
            if state.screen() == Screen::Displaying {
                state.reset();
            }
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
