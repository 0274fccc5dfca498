pub mod events;
pub mod session;

pub use events::{SaveEvent, SaveNotifier, SaveStatus};
pub use session::{BoardSession, DragOutcome};
