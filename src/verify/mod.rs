//! Verification: the callback pipeline and the three upstream clients it drives.

pub mod discord;
pub mod epic;
pub mod error;
pub mod locker;
pub mod notice;
pub mod pipeline;
pub mod state;
pub mod upstream;

pub use discord::DiscordClient;
pub use epic::{AccessCredential, ConsentLink, EpicClient, EpicCredentials};
pub use error::VerifyError;
pub use locker::{InventorySnapshot, Item, LockerClient};
pub use notice::VerificationNotice;
pub use pipeline::{
    CallbackRequest, InventoryLookup, NotificationDispatch, Pipeline, TokenExchange, Verified,
};
pub use state::RequesterId;
pub use upstream::UpstreamOptions;

/// The pipeline wired to the real upstreams.
pub type Verifier = Pipeline<EpicClient, LockerClient, DiscordClient>;
