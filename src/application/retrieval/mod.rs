//! Retrieval - retrying client and batch splitting over the retrieval port.

mod batch_splitter;
mod client;

pub use batch_splitter::{perturb_query, BatchPolicy, BatchSplitter};
pub use client::{
    HealthStatus, RetrievalClient, RetrievalHealth, RetryPolicy, PROBE_QUERY, PROBE_TIMEOUT,
};
