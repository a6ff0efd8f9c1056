//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod api_transport;
mod durable_storage;
mod navigation;

#[cfg(test)]
pub use api_transport::MockApiTransport;
pub use api_transport::{
    ApiRequest, ApiTransport, ApiTransportError, Method, RecordingApiTransport,
};
#[cfg(test)]
pub use durable_storage::MockDurableStorage;
pub use durable_storage::{
    DurableStorage, InMemoryStorage, StorageError, TOKEN_KEY, USER_INFO_KEY,
};
#[cfg(test)]
pub use navigation::{MockNavigator, MockNotifier};
pub use navigation::{
    Navigator, Notice, Notifier, RecordingNavigator, RecordingNotifier,
};
