//! Composition root.
//!
//! [`AppState`] replaces process-wide singletons: it owns the durable
//! storage, the shared session and cart state, the guarded router, and the
//! API facades, all wired to a single session-aware transport.

use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::api::{
    AdminApi, AuthApi, ChatApi, CommentApi, FavoriteApi, FinanceApi, OrderApi, ProductApi,
    ServiceApi,
};
use crate::config::{ClientConfig, ConfigError};
use crate::domain::ports::{ApiTransport, ApiTransportError, DurableStorage, Notifier, StorageError};
use crate::domain::{CartState, SessionState};
use crate::inbound::{Router, SessionAwareTransport, SessionInvalidationHandler};
use crate::outbound::http::HttpTransport;
use crate::outbound::notifier::TracingNotifier;
use crate::outbound::storage::FileDurableStorage;
use crate::stores::{CartStore, SessionStore};

/// Errors raised while assembling the application.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to open durable storage: {0}")]
    Storage(#[from] StorageError),
    #[error("failed to build backend transport: {0}")]
    Transport(#[from] ApiTransportError),
}

/// Everything the UI layer needs, wired once.
pub struct AppState {
    pub storage: Arc<dyn DurableStorage>,
    pub session: SessionStore,
    pub cart: CartStore,
    pub router: Arc<Router>,
    pub auth: AuthApi,
    pub products: ProductApi,
    pub orders: OrderApi,
    pub finance: FinanceApi,
    pub services: ServiceApi,
    pub admin: AdminApi,
    pub comments: CommentApi,
    pub favorites: FavoriteApi,
    pub chat: ChatApi,
}

impl AppState {
    /// Build the production graph: file storage, reqwest transport and
    /// log-based notices.
    ///
    /// # Errors
    ///
    /// Returns [`AppError`] when storage cannot be opened or the transport
    /// cannot be built.
    pub fn from_config(config: &ClientConfig) -> Result<Self, AppError> {
        let storage: Arc<dyn DurableStorage> =
            Arc::new(FileDurableStorage::open(&config.storage_dir)?);
        let transport = HttpTransport::new(&config.base_url, config.timeout, storage.clone())?;
        debug!(base_url = %transport.base_url(), storage_dir = %config.storage_dir, "assembling client");
        Ok(Self::with_ports(
            config,
            storage,
            transport,
            Arc::new(TracingNotifier),
        ))
    }

    /// Build the graph over caller-supplied ports.
    ///
    /// The session is hydrated from `storage` before anything else reads it.
    pub fn with_ports<T>(
        config: &ClientConfig,
        storage: Arc<dyn DurableStorage>,
        transport: T,
        notifier: Arc<dyn Notifier>,
    ) -> Self
    where
        T: ApiTransport + 'static,
    {
        let state = SessionState::hydrate(storage.as_ref());
        let router = Arc::new(Router::new(state.clone(), notifier));
        let handler = SessionInvalidationHandler::new(state.clone(), storage.clone(), router.clone());
        let transport: Arc<dyn ApiTransport> =
            Arc::new(SessionAwareTransport::new(transport, handler));

        let auth = AuthApi::new(transport.clone());
        let orders = OrderApi::with_cart_update_method(transport.clone(), config.cart_update_method);
        Self {
            session: SessionStore::new(auth.clone(), storage.clone(), state),
            cart: CartStore::new(orders.clone(), CartState::default()),
            storage,
            router,
            auth,
            products: ProductApi::new(transport.clone()),
            orders,
            finance: FinanceApi::new(transport.clone()),
            services: ServiceApi::new(transport.clone()),
            admin: AdminApi::new(transport.clone()),
            comments: CommentApi::new(transport.clone()),
            favorites: FavoriteApi::new(transport.clone()),
            chat: ChatApi::with_timeout(transport, config.chat_timeout),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for application wiring.
    use super::*;
    use crate::api::CartUpdateMethod;
    use crate::domain::ports::{
        InMemoryStorage, Method, RecordingApiTransport, RecordingNotifier, TOKEN_KEY,
        USER_INFO_KEY,
    };
    use crate::inbound::NavigationOutcome;
    use camino::Utf8PathBuf;
    use std::time::Duration;
    use url::Url;

    fn config() -> ClientConfig {
        ClientConfig {
            base_url: Url::parse("http://localhost:8080").expect("url"),
            timeout: Duration::from_secs(10),
            chat_timeout: Duration::from_secs(60),
            storage_dir: Utf8PathBuf::from(".community"),
            cart_update_method: CartUpdateMethod::Patch,
        }
    }

    fn app(
        storage: InMemoryStorage,
        transport: RecordingApiTransport,
    ) -> (AppState, Arc<RecordingNotifier>) {
        let notifier = Arc::new(RecordingNotifier::default());
        let app = AppState::with_ports(&config(), Arc::new(storage), transport, notifier.clone());
        (app, notifier)
    }

    #[test]
    fn hydrates_session_before_routing() {
        let storage = InMemoryStorage::with_entries([
            (TOKEN_KEY, "abc"),
            (USER_INFO_KEY, r#"{"id":1,"role":"store"}"#),
        ]);
        let (app, notifier) = app(storage, RecordingApiTransport::default());

        assert!(app.session.snapshot().is_logged_in());
        assert!(matches!(
            app.router.push("/admin/orders"),
            NavigationOutcome::Arrived(_)
        ));
        assert!(matches!(
            app.router.push("/admin/users"),
            NavigationOutcome::Denied(_)
        ));
        assert_eq!(notifier.notices().len(), 1);
    }

    #[tokio::test]
    async fn facades_share_the_session_aware_transport() {
        let storage = InMemoryStorage::with_entries([(TOKEN_KEY, "abc")]);
        let transport = RecordingApiTransport::default();
        transport.push_response(Err(ApiTransportError::session_invalidated("expired")));
        let (app, _) = app(storage, transport);
        app.router.push("/cart");

        let error = app.products.detail(1).await.expect_err("rejected");

        assert_eq!(error.to_string(), "expired");
        assert!(!app.session.snapshot().is_logged_in());
        assert_eq!(app.storage.get(TOKEN_KEY).expect("get"), None);
        assert_eq!(app.router.location().path, "/login");
    }

    #[tokio::test]
    async fn corrupt_storage_document_still_allows_logout() {
        let tmp = tempfile::TempDir::new().expect("temp dir");
        let storage_dir = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf-8");
        std::fs::write(
            storage_dir.join(local_storage::DEFAULT_DOCUMENT_NAME),
            r#"{"token": "abc""#,
        )
        .expect("seed corrupt document");
        let closed = std::net::TcpListener::bind("127.0.0.1:0")
            .and_then(|listener| listener.local_addr())
            .expect("free loopback port");
        let config = ClientConfig {
            base_url: Url::parse(&format!("http://{closed}")).expect("url"),
            timeout: Duration::from_millis(500),
            storage_dir,
            ..config()
        };

        let app = AppState::from_config(&config).expect("assembles despite corrupt storage");
        assert!(!app.session.snapshot().is_logged_in());

        app.session.logout().await;

        assert!(!app.session.snapshot().is_logged_in());
        assert_eq!(app.storage.get(TOKEN_KEY).expect("get"), None);
    }

    #[tokio::test]
    async fn cart_update_method_comes_from_config() {
        let transport = Arc::new(RecordingApiTransport::default());
        let orders = OrderApi::with_cart_update_method(transport.clone(), config().cart_update_method);
        orders.update_cart_quantity(3, 2).await.expect("updated");
        let request = transport.last_request().expect("request");
        assert_eq!(request.method, Method::Patch);
    }
}
