use std::sync::Once;

use pretty_assertions::assert_eq;
use wordfreq_core::{update, AppState, Effect, ExportNotice, HistogramRow, Msg, Screen};

const URL: &str = "https://www.terriblytinytales.com/test.txt";

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(engine_logging::initialize_for_tests);
}

fn rows() -> Vec<HistogramRow> {
    vec![HistogramRow::new("the", 3), HistogramRow::new("cat", 2)]
}

fn fetching() -> (AppState, u64) {
    let (state, effects) = update(AppState::with_source_url(URL), Msg::FetchClicked);
    match effects.as_slice() {
        [Effect::FetchDocument { request_id, .. }] => (state, *request_id),
        other => panic!("unexpected effects {other:?}"),
    }
}

fn displaying() -> AppState {
    let (state, request_id) = fetching();
    let (state, _) = update(
        state,
        Msg::FetchSucceeded {
            request_id,
            rows: rows(),
            total_tokens: 5,
            distinct_tokens: 2,
        },
    );
    state
}

#[test]
fn fetch_clicked_emits_fetch_effect() {
    init_logging();
    let (mut state, effects) = update(AppState::with_source_url(URL), Msg::FetchClicked);

    assert_eq!(
        effects,
        vec![Effect::FetchDocument {
            request_id: 1,
            url: URL.to_string(),
        }]
    );
    let view = state.view();
    assert_eq!(view.screen, Screen::Idle);
    assert!(view.fetch_in_flight);
    assert!(!view.can_fetch());
    assert!(state.consume_dirty());
    assert!(!state.consume_dirty());
}

#[test]
fn second_click_while_in_flight_is_ignored() {
    init_logging();
    let (state, _) = fetching();
    let (state, effects) = update(state, Msg::FetchClicked);
    assert!(effects.is_empty());
    assert_eq!(state.in_flight(), Some(1));
}

#[test]
fn success_moves_to_displaying() {
    init_logging();
    let state = displaying();
    let view = state.view();

    assert_eq!(view.screen, Screen::Displaying);
    assert!(!view.fetch_in_flight);
    assert_eq!(view.rows, rows());
    assert_eq!(view.total_tokens, 5);
    assert_eq!(view.distinct_tokens, 2);
    assert_eq!(view.max_frequency(), 3);
    assert_eq!(view.last_error, None);
}

#[test]
fn failure_stays_idle_with_visible_error() {
    init_logging();
    let (state, request_id) = fetching();
    let (mut state, effects) = update(
        state,
        Msg::FetchFailed {
            request_id,
            message: "network error: connection refused".to_string(),
        },
    );

    assert!(effects.is_empty());
    let view = state.view();
    assert_eq!(view.screen, Screen::Idle);
    assert!(view.rows.is_empty());
    assert!(view.can_fetch());
    assert_eq!(
        view.last_error.as_deref(),
        Some("network error: connection refused")
    );
    assert!(state.consume_dirty());

    // Retry is available and clears the notice.
    let (state, effects) = update(state, Msg::FetchClicked);
    assert_eq!(
        effects,
        vec![Effect::FetchDocument {
            request_id: 2,
            url: URL.to_string(),
        }]
    );
    assert_eq!(state.view().last_error, None);
}

#[test]
fn stale_results_are_dropped() {
    init_logging();
    let (state, request_id) = fetching();
    let (state, _) = update(
        state,
        Msg::FetchSucceeded {
            request_id: request_id + 10,
            rows: rows(),
            total_tokens: 5,
            distinct_tokens: 2,
        },
    );
    assert_eq!(state.screen(), Screen::Idle);
    assert_eq!(state.in_flight(), Some(request_id));

    let (state, _) = update(
        state,
        Msg::FetchFailed {
            request_id: request_id + 10,
            message: "late".to_string(),
        },
    );
    assert_eq!(state.in_flight(), Some(request_id));
    assert_eq!(state.view().last_error, None);
}

#[test]
fn invalid_source_url_surfaces_error_without_effect() {
    init_logging();
    let (state, effects) = update(AppState::with_source_url("not a url"), Msg::FetchClicked);
    assert!(effects.is_empty());
    assert!(state.in_flight().is_none());
    assert!(state
        .view()
        .last_error
        .unwrap()
        .starts_with("invalid source url"));

    let (state, effects) = update(
        AppState::with_source_url("ftp://example.com/test.txt"),
        Msg::FetchClicked,
    );
    assert!(effects.is_empty());
    assert_eq!(
        state.view().last_error.as_deref(),
        Some("unsupported url scheme ftp")
    );
}

#[test]
fn source_url_only_editable_while_idle() {
    init_logging();
    let (state, _) = update(
        AppState::new(),
        Msg::SourceUrlChanged("  https://example.com/a.txt \n".to_string()),
    );
    assert_eq!(state.source_url(), "https://example.com/a.txt");

    let state = displaying();
    let (state, _) = update(
        state,
        Msg::SourceUrlChanged("https://example.com/b.txt".to_string()),
    );
    assert_eq!(state.source_url(), URL);
}

#[test]
fn export_only_while_displaying() {
    init_logging();
    let (_, effects) = update(AppState::with_source_url(URL), Msg::ExportClicked);
    assert!(effects.is_empty());

    let (state, effects) = update(displaying(), Msg::ExportClicked);
    assert_eq!(
        effects,
        vec![Effect::ExportCsv {
            rows: rows(),
            total_tokens: 5,
            distinct_tokens: 2,
            source_url: URL.to_string(),
        }]
    );

    let (state, _) = update(
        state,
        Msg::ExportFinished(Ok("out/histogram-data.csv".to_string())),
    );
    assert_eq!(
        state.view().export_notice,
        Some(ExportNotice::Saved {
            path: "out/histogram-data.csv".to_string()
        })
    );

    let (state, _) = update(state, Msg::ExportFinished(Err("disk full".to_string())));
    assert_eq!(
        state.view().export_notice,
        Some(ExportNotice::Failed {
            message: "disk full".to_string()
        })
    );
}

#[test]
fn back_resets_to_idle_and_clears_histogram() {
    init_logging();
    let (mut state, _) = update(displaying(), Msg::ExportClicked);
    state.consume_dirty();
    let (mut state, effects) = update(state, Msg::BackClicked);

    assert!(effects.is_empty());
    assert!(state.consume_dirty());
    let view = state.view();
    assert_eq!(view.screen, Screen::Idle);
    assert!(view.rows.is_empty());
    assert_eq!(view.total_tokens, 0);
    assert_eq!(view.export_notice, None);
    assert!(view.can_fetch());

    // Back while idle does nothing.
    let (mut state, _) = update(state, Msg::BackClicked);
    assert!(!state.consume_dirty());
}

#[test]
fn fetch_ignored_while_displaying() {
    init_logging();
    let (state, effects) = update(displaying(), Msg::FetchClicked);
    assert!(effects.is_empty());
    assert_eq!(state.screen(), Screen::Displaying);
}
