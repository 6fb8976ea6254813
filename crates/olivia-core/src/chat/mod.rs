//! Chat session, message log, and history window logic.
//!
//! - `TurnStore`: the persistence port for an identity's ordered turn log
//! - `ChangeNotifier` / `snapshot_stream`: subscription plumbing shared by stores
//! - `ChatSession`: the session controller (submit -> complete -> persist)

pub mod history;
pub mod notify;
pub mod session;
pub mod store;
