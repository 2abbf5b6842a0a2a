use crate::handlers;
use crate::session::{SessionError, SessionManager};
use holdem_engine::RoundLogger;
use std::convert::Infallible;
use std::net::{SocketAddr, ToSocketAddrs};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use warp::filters::BoxedFilter;
use warp::reply::Reply;
use warp::Filter;

const CLEANUP_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
pub struct ServerConfig {
    host: String,
    port: u16,
    /// Optional JSONL round history path.
    history_path: Option<PathBuf>,
}

impl ServerConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            history_path: None,
        }
    }

    pub fn with_history(mut self, path: impl Into<PathBuf>) -> Self {
        self.history_path = Some(path.into());
        self
    }

    pub fn for_tests() -> Self {
        Self::new("127.0.0.1", 0)
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn history_path(&self) -> Option<&PathBuf> {
        self.history_path.as_ref()
    }
}

#[derive(Debug, Clone)]
pub struct AppContext {
    config: ServerConfig,
    sessions: Arc<SessionManager>,
}

impl AppContext {
    pub fn new(config: ServerConfig) -> Result<Self, ServerError> {
        let sessions = match config.history_path() {
            Some(path) => {
                let logger = RoundLogger::create(path)
                    .map_err(|err| ServerError::ConfigError(err.to_string()))?;
                Arc::new(SessionManager::with_history(logger))
            }
            None => Arc::new(SessionManager::new()),
        };
        Ok(Self { config, sessions })
    }

    pub fn new_for_tests() -> Self {
        Self::new(ServerConfig::for_tests()).expect("test context")
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn sessions(&self) -> Arc<SessionManager> {
        Arc::clone(&self.sessions)
    }
}

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Failed to bind to address: {0}")]
    BindError(#[from] std::io::Error),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Session error: {0}")]
    SessionError(#[from] SessionError),
}

#[derive(Debug, Clone)]
pub struct WebServer {
    context: AppContext,
}

impl WebServer {
    pub fn new(config: ServerConfig) -> Result<Self, ServerError> {
        let context = AppContext::new(config)?;
        Ok(Self { context })
    }

    pub fn from_context(context: AppContext) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &AppContext {
        &self.context
    }

    pub async fn start(self) -> Result<ServerHandle, ServerError> {
        let WebServer { context } = self;
        let config = context.config().clone();
        let bind_addr = Self::bind_addr(&config)?;

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let routes = Self::routes(&context);
        let shutdown_signal = async move {
            let _ = shutdown_rx.await;
        };

        let (addr, server_future) = warp::serve(routes)
            .try_bind_with_graceful_shutdown(bind_addr, shutdown_signal)
            .map_err(Self::map_warp_error)?;

        tracing::info!(address = %addr, "web server listening");

        let task = tokio::spawn(async move {
            server_future.await;
            Ok(())
        });

        let cleanup = {
            let sessions = context.sessions();
            tokio::spawn(async move {
                let mut interval = tokio::time::interval(CLEANUP_INTERVAL);
                loop {
                    interval.tick().await;
                    sessions.cleanup_expired_sessions();
                }
            })
        };

        Ok(ServerHandle::new(addr, shutdown_tx, task, cleanup, context))
    }

    fn bind_addr(config: &ServerConfig) -> Result<SocketAddr, ServerError> {
        let host = config.host();

        if let Ok(addr) = host.parse::<SocketAddr>() {
            return Ok(addr);
        }

        if let Ok(ip) = host.parse::<std::net::IpAddr>() {
            return Ok(SocketAddr::new(ip, config.port()));
        }

        let candidate = format!("{}:{}", host, config.port());
        let mut addrs = candidate.to_socket_addrs().map_err(|err| {
            ServerError::ConfigError(format!("failed to resolve address `{candidate}`: {err}"))
        })?;

        addrs.next().ok_or_else(|| {
            ServerError::ConfigError(format!("failed to resolve address `{candidate}`"))
        })
    }

    fn map_warp_error(err: warp::Error) -> ServerError {
        use std::error::Error as StdError;

        if let Some(source) = err.source() {
            if let Some(io_err) = source.downcast_ref::<std::io::Error>() {
                let recreated = std::io::Error::new(io_err.kind(), io_err.to_string());
                return ServerError::BindError(recreated);
            }
        }

        ServerError::ConfigError(err.to_string())
    }

    pub fn routes(context: &AppContext) -> BoxedFilter<(warp::reply::Response,)> {
        let health = Self::health_route();
        let api_routes = Self::api_routes(context);

        health.or(api_routes).unify().boxed()
    }

    fn health_route() -> BoxedFilter<(warp::reply::Response,)> {
        warp::path("health")
            .and(warp::get())
            .and(warp::path::end())
            .map(|| handlers::health::health().into_response())
            .boxed()
    }

    fn api_routes(context: &AppContext) -> BoxedFilter<(warp::reply::Response,)> {
        let sessions = context.sessions();

        let create = warp::path!("api" / "sessions")
            .and(warp::post())
            .and(Self::with_session_manager(sessions.clone()))
            .and(warp::body::json())
            .and_then(
                |sessions: Arc<SessionManager>,
                 request: handlers::CreateSessionRequest| async move {
                    let response = handlers::create_session(sessions, request).await;
                    Ok::<_, Infallible>(response)
                },
            );

        let state = warp::path!("api" / "sessions" / String / "state")
            .and(warp::get())
            .and(Self::with_session_manager(sessions.clone()))
            .and_then(
                |session_id: String, sessions: Arc<SessionManager>| async move {
                    let response = handlers::get_state(sessions, session_id).await;
                    Ok::<_, Infallible>(response)
                },
            );

        let new_game = warp::path!("api" / "sessions" / String / "new-game")
            .and(warp::post())
            .and(Self::with_session_manager(sessions.clone()))
            .and_then(
                |session_id: String, sessions: Arc<SessionManager>| async move {
                    let response = handlers::new_game(sessions, session_id).await;
                    Ok::<_, Infallible>(response)
                },
            );

        let start_game = warp::path!("api" / "sessions" / String / "start-game")
            .and(warp::post())
            .and(Self::with_session_manager(sessions.clone()))
            .and_then(
                |session_id: String, sessions: Arc<SessionManager>| async move {
                    let response = handlers::start_game(sessions, session_id).await;
                    Ok::<_, Infallible>(response)
                },
            );

        let action = warp::path!("api" / "sessions" / String / "action")
            .and(warp::post())
            .and(Self::with_session_manager(sessions.clone()))
            .and(warp::body::json())
            .and_then(
                |session_id: String,
                 sessions: Arc<SessionManager>,
                 request: handlers::ActionRequest| async move {
                    let response = handlers::submit_action(sessions, session_id, request).await;
                    Ok::<_, Infallible>(response)
                },
            );

        let advance = warp::path!("api" / "sessions" / String / "advance-turn")
            .and(warp::post())
            .and(Self::with_session_manager(sessions.clone()))
            .and_then(
                |session_id: String, sessions: Arc<SessionManager>| async move {
                    let response = handlers::advance_turn(sessions, session_id).await;
                    Ok::<_, Infallible>(response)
                },
            );

        let bot = warp::path!("api" / "sessions" / String / "bot-turn")
            .and(warp::post())
            .and(Self::with_session_manager(sessions.clone()))
            .and_then(
                |session_id: String, sessions: Arc<SessionManager>| async move {
                    let response = handlers::bot_turn(sessions, session_id).await;
                    Ok::<_, Infallible>(response)
                },
            );

        let delete = warp::path!("api" / "sessions" / String)
            .and(warp::delete())
            .and(Self::with_session_manager(sessions))
            .and_then(
                |session_id: String, sessions: Arc<SessionManager>| async move {
                    let response = handlers::delete_session(sessions, session_id).await;
                    Ok::<_, Infallible>(response)
                },
            );

        create
            .or(state)
            .unify()
            .or(new_game)
            .unify()
            .or(start_game)
            .unify()
            .or(action)
            .unify()
            .or(advance)
            .unify()
            .or(bot)
            .unify()
            .or(delete)
            .unify()
            .boxed()
    }

    fn with_session_manager(
        sessions: Arc<SessionManager>,
    ) -> impl Filter<Extract = (Arc<SessionManager>,), Error = Infallible> + Clone {
        warp::any().map(move || Arc::clone(&sessions))
    }
}

#[derive(Debug)]
pub struct ServerHandle {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<Result<(), ServerError>>>,
    cleanup: Option<JoinHandle<()>>,
    context: AppContext,
}

impl ServerHandle {
    fn new(
        addr: SocketAddr,
        shutdown: oneshot::Sender<()>,
        task: JoinHandle<Result<(), ServerError>>,
        cleanup: JoinHandle<()>,
        context: AppContext,
    ) -> Self {
        Self {
            addr,
            shutdown: Some(shutdown),
            task: Some(task),
            cleanup: Some(cleanup),
            context,
        }
    }

    pub fn address(&self) -> SocketAddr {
        self.addr
    }

    pub fn context(&self) -> &AppContext {
        &self.context
    }

    pub async fn shutdown(mut self) -> Result<(), ServerError> {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(cleanup) = self.cleanup.take() {
            cleanup.abort();
        }

        if let Some(task) = self.task.take() {
            match task.await {
                Ok(result) => result?,
                Err(err) => {
                    return Err(ServerError::ConfigError(format!(
                        "server task join error: {err}"
                    )))
                }
            }
        }

        Ok(())
    }
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(cleanup) = self.cleanup.take() {
            cleanup.abort();
        }
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
