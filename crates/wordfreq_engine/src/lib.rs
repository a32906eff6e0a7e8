//! Word frequency engine: text-to-histogram pipeline, fetching and export.
mod count;
mod decode;
mod delimited;
mod engine;
mod export;
mod fetch;
mod persist;
mod pipeline;
mod rank;
mod tokenize;
mod types;

pub use count::FrequencyTable;
pub use decode::{decode_text, DecodeError, DecodedText};
pub use delimited::{parse_delimited_text, to_delimited_text, ParseError};
pub use engine::{EngineHandle, EngineSettings};
pub use export::{
    write_export, ExportError, ExportOptions, ExportSummary, CSV_FILENAME, CSV_MIME_TYPE,
    MANIFEST_FILENAME,
};
pub use fetch::{FetchSettings, Fetcher, ProgressSink, ReqwestFetcher, DEFAULT_SOURCE_URL};
pub use persist::{ensure_output_dir, write_atomically, PersistError};
pub use pipeline::{analyze, Analysis, PipelineSettings};
pub use rank::{rank, HistogramResult, RankedEntry, DEFAULT_LIMIT};
pub use tokenize::{is_delimiter, EmptyTokens, Tokenizer, DELIMITERS};
pub use types::{EngineEvent, FailureKind, FetchError, FetchedDocument, RequestId, Stage};
