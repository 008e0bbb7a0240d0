// HTTP middleware implementations

pub mod tracing; // Per-request span, request id propagation and HTTP metrics
