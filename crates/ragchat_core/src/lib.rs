//! Ragchat core: pure conversation state machine and view-model helpers.
mod effect;
mod model;
mod msg;
mod prompt;
mod reindex;
mod state;
mod update;
mod view_model;

pub use effect::{AskPurpose, AskRequest, Effect, Notification, NotificationLevel};
pub use model::{Answer, Document, Message, Role, Source, Stats};
pub use msg::Msg;
pub use prompt::{is_accepted_upload, SUGGESTIONS};
pub use reindex::needs_reindex;
pub use state::{Activity, AppState, CatalogState, SessionState};
pub use update::update;
pub use view_model::AppViewModel;
