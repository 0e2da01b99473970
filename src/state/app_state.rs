use crate::models::consent::ConsentStore;
use crate::services::guard::OpGate;

/// Shared per-process state handed to every handler.
///
/// The pipelines themselves are stateless; what lives here are the
/// injected capabilities (consent storage, outbound probe client) and the
/// in-flight gates that keep each pipeline single-occupancy.
pub struct AppState {
    pub consent: ConsentStore,
    pub probe_client: reqwest::Client,
    pub encode_gate: OpGate,
    pub scan_gate: OpGate,
}
