use thiserror::Error;

/// Why a single feed bundle contributed nothing to a request.
///
/// Every variant is recovered inside the provider: the failure is logged
/// with its bundle and the aggregation proceeds on the remaining bundles.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("upstream returned HTTP {0}")]
    UpstreamStatus(reqwest::StatusCode),
    #[error("response too large: {0} bytes")]
    Oversized(usize),
    #[error("protobuf decode error: {0}")]
    Decode(#[from] prost::DecodeError),
}
