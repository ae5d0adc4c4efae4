mod use_activity_signals;
mod use_portal_session;
mod use_session_poller;

pub use use_activity_signals::{use_activity_signals, ActivitySignals, ActivitySignalsConfig};
pub use use_portal_session::{
    use_portal_session, PortalSessionState, UsePortalSessionActions, UsePortalSessionResult,
};
pub use use_session_poller::{use_session_poller, UseSessionPollerResult};
