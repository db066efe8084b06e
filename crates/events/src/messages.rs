use core_types::{UserProfile, UserTransaction};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A transaction notification enriched with the owning user's display name,
/// so clients can render it without a second lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionNotice {
    pub user_name: String,
    pub transaction: UserTransaction,
}

/// The top-level WebSocket message enum.
/// All communication from the server to the client is one of these variants.
///
/// The `#[serde(tag = "type", content = "payload")]` attribute serializes the
/// enum into a clean JSON object that is easy for the frontend to dispatch on.
/// For example, a `UserCreated` variant looks like:
/// `{
///   "type": "UserCreated",
///   "payload": { "id": "...", "name": "...", ... }
/// }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum WsMessage {
    /// A simple message to confirm to a new client that its WebSocket connection is active.
    Connected,
    /// A profile was created.
    UserCreated(UserProfile),
    /// A profile's name, age or balance changed.
    UserUpdated(UserProfile),
    /// A profile (and its transactions) was removed.
    UserDeleted(Uuid),
    /// A transaction was recorded against a profile.
    TransactionAdded(TransactionNotice),
}
