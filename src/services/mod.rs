pub mod auxiliary;
pub mod client;
pub mod credentials;
pub mod debounce;
pub mod endpoint;
pub mod filters;
pub mod orchestrator;
pub mod transport;

pub use client::CatalogClient;
pub use credentials::AuthMode;
pub use debounce::DebouncedInput;
pub use endpoint::{Endpoint, EndpointBuilder, QueryParams};
pub use filters::{FilterState, GenreSelection};
pub use orchestrator::{spawn_query_listener, QueryOrchestrator, QuerySnapshot};
pub use transport::{CatalogTransport, RawResponse, ReqwestTransport};
