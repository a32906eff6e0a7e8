//! Word frequency core: pure presentation state machine and view-model helpers.
mod effect;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::Msg;
pub use state::{AppState, ExportNotice, HistogramRow, RequestId, Screen};
pub use update::update;
pub use view_model::AppViewModel;
