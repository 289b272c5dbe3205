pub mod bridge;
pub mod display;
pub mod error;
pub mod location;
pub mod normalize;
pub mod orchestrator;
pub mod pagination;
pub mod query;
mod retry;
pub mod store;
pub mod types;
pub mod upstream;

pub use bridge::BridgeClient;
pub use error::{JumpError, SearchError, StorageError};
pub use location::{
    HttpReverseGeocoder, LocationResolver, LocationStorage, MemoryStorage, ReverseGeocoder,
    StateFile,
};
pub use normalize::{normalize, normalize_body, normalize_result};
pub use orchestrator::{SearchBackend, SearchOrchestrator};
pub use pagination::{required_pages, validate_jump, PaginationPlan};
pub use query::{PriceSelection, QueryBuilder, QueryDescriptor, QueryParams};
pub use store::{FilterStore, SearchPhase};
pub use types::{BridgeRequest, BridgeResponse, Business, BusinessSearchResponse};
pub use upstream::UpstreamClient;
