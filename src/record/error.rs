/// Errors raised while decoding a telemetry document into a [`super::RawRecord`]
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    /// The document is not a JSON object
    #[error("document is not an object")]
    NotAnObject,

    /// The document has no `groundTime` field
    #[error("missing groundTime")]
    MissingGroundTime,

    /// `groundTime` is present but cannot be parsed as a timestamp
    #[error("unparseable groundTime: {0}")]
    InvalidGroundTime(String),

    /// `params` is present but malformed
    #[error("malformed params: {0}")]
    MalformedParams(String),
}
