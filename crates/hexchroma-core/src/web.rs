//! HTTP server for the color API (feature-gated: web).
//!
//! Serves the four color operations plus /docs and /health. Every color
//! route goes through [`HexGuard`], which normalizes the path, validates the
//! `hex` parameter and hands the handler a canonical [`HexColor`].

use crate::api::{
    self, COLOR_ROUTES, ROUTE_COMPLEMENTARY, ROUTE_HEX_TO_RGB, ROUTE_NAME, ROUTE_TRIADIC,
};
use crate::codec::HexColor;
use crate::error::ColorError;
use crate::{Error, Result, VERSION};
use asupersync::net::TcpListener;
use fastapi::ResponseBody;
use fastapi::core::{ControlFlow, Cx, Handler, Middleware, StartupOutcome};
use fastapi::prelude::{App, Method, Request, RequestContext, Response, StatusCode};
use fastapi::{ServerConfig, ServerError, TcpServer};
use serde::Serialize;
use std::future::Future;
use std::net::{SocketAddr, TcpStream};
use std::pin::Pin;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;
const DOCS_PATH: &str = "/docs";
const FALLBACK_BASE_URL: &str = "http://localhost";

type ResponseFuture = Pin<Box<dyn Future<Output = Response> + Send>>;

/// Configuration for the web server.
#[derive(Debug, Clone)]
pub struct WebServerConfig {
    host: String,
    port: u16,
    /// Overrides the Host-derived base URL in /docs and fallback links.
    public_base_url: Option<String>,
    /// Must be set to `true` to bind on a non-localhost address.
    allow_public_bind: bool,
}

impl WebServerConfig {
    /// Create a new config with the default localhost host.
    #[must_use]
    pub fn new(port: u16) -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port,
            public_base_url: None,
            allow_public_bind: false,
        }
    }

    /// Override the port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Override the bind host.
    ///
    /// Non-localhost addresses require [`Self::with_dangerous_public_bind`].
    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Use `url` (e.g. `https://colors.example.com`) as the base of every
    /// absolute link the server emits.
    #[must_use]
    pub fn with_public_base_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        let trimmed = url.trim().trim_end_matches('/');
        self.public_base_url = (!trimmed.is_empty()).then(|| trimmed.to_string());
        self
    }

    /// Explicitly opt in to binding on a non-localhost address.
    ///
    /// Without this, [`start_web_server`] refuses to bind publicly.
    #[must_use]
    pub fn with_dangerous_public_bind(mut self) -> Self {
        self.allow_public_bind = true;
        self
    }

    #[must_use]
    fn bind_addr(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }

    /// Returns `true` when the configured host is a loopback address.
    fn is_localhost(&self) -> bool {
        matches!(
            self.host.as_str(),
            "127.0.0.1" | "::1" | "localhost" | "[::1]"
        )
    }
}

impl Default for WebServerConfig {
    fn default() -> Self {
        Self::new(DEFAULT_PORT)
    }
}

impl From<&crate::config::ServerConfig> for WebServerConfig {
    fn from(server: &crate::config::ServerConfig) -> Self {
        let mut config = Self::new(server.port).with_host(server.host.clone());
        if let Some(url) = &server.public_base_url {
            config = config.with_public_base_url(url.clone());
        }
        if server.allow_public_bind {
            config = config.with_dangerous_public_bind();
        }
        config
    }
}

/// Handle to a running web server.
pub struct WebServerHandle {
    bound_addr: SocketAddr,
    server: Arc<TcpServer>,
    app: Arc<App>,
    join: tokio::task::JoinHandle<std::result::Result<(), ServerError>>,
}

impl WebServerHandle {
    /// The address the server actually bound to.
    #[must_use]
    pub fn bound_addr(&self) -> SocketAddr {
        self.bound_addr
    }

    /// Trigger graceful shutdown and wait for completion.
    pub async fn shutdown(self) -> Result<()> {
        self.server.shutdown();
        poke_listener(self.bound_addr);
        handle_server_exit(self.join.await, &self.server, &self.app).await
    }
}

// =============================================================================
// Middleware
// =============================================================================

#[derive(Debug, Clone, Copy)]
struct RequestStart(Instant);

#[derive(Debug, Clone, Default)]
struct RequestSpanLogger;

impl Middleware for RequestSpanLogger {
    fn before<'a>(
        &'a self,
        _ctx: &'a RequestContext,
        req: &'a mut Request,
    ) -> fastapi::core::BoxFuture<'a, ControlFlow> {
        req.insert_extension(RequestStart(Instant::now()));
        Box::pin(async { ControlFlow::Continue })
    }

    fn after<'a>(
        &'a self,
        _ctx: &'a RequestContext,
        req: &'a Request,
        response: Response,
    ) -> fastapi::core::BoxFuture<'a, Response> {
        let start = req
            .get_extension::<RequestStart>()
            .map(|s| s.0)
            .unwrap_or_else(Instant::now);
        let duration = start.elapsed();
        let method = req.method();
        let path = req.path();
        let status = response.status().as_u16();

        info!(
            target: "hexchroma.web",
            method = %method,
            path = %path,
            status,
            duration_ms = duration.as_millis(),
            "web request"
        );

        Box::pin(async move { response })
    }

    fn name(&self) -> &'static str {
        "RequestSpanLogger"
    }
}

/// Adds `access-control-allow-origin: *` to every response.
#[derive(Debug, Clone, Default)]
struct CorsHeaders;

impl Middleware for CorsHeaders {
    fn after<'a>(
        &'a self,
        _ctx: &'a RequestContext,
        _req: &'a Request,
        response: Response,
    ) -> fastapi::core::BoxFuture<'a, Response> {
        let response = response.header("access-control-allow-origin", b"*".to_vec());
        Box::pin(async move { response })
    }

    fn name(&self) -> &'static str {
        "CorsHeaders"
    }
}

/// Shared application state available to all handlers.
#[derive(Debug, Clone, Default)]
struct AppState {
    public_base_url: Option<String>,
}

/// Middleware that injects [`AppState`] into every request.
#[derive(Clone)]
struct StateInjector {
    state: AppState,
}

impl Middleware for StateInjector {
    fn before<'a>(
        &'a self,
        _ctx: &'a RequestContext,
        req: &'a mut Request,
    ) -> fastapi::core::BoxFuture<'a, ControlFlow> {
        req.insert_extension(self.state.clone());
        Box::pin(async { ControlFlow::Continue })
    }

    fn name(&self) -> &'static str {
        "StateInjector"
    }
}

/// Validates the color parameter and routes on the normalized path.
///
/// Color routes get a canonical [`HexColor`] extension or a 400. A malformed
/// `hex` is rejected on every other route too. Spellings
/// that the router would miss (`/Hex_Para_Rgb/`) are answered here. Unknown
/// paths get the discovery fallback and `/` redirects to `/docs`.
#[derive(Clone, Default)]
struct HexGuard;

impl Middleware for HexGuard {
    fn before<'a>(
        &'a self,
        _ctx: &'a RequestContext,
        req: &'a mut Request,
    ) -> fastapi::core::BoxFuture<'a, ControlFlow> {
        let flow = guard(req);
        Box::pin(async move { flow })
    }

    fn name(&self) -> &'static str {
        "HexGuard"
    }
}

fn guard(req: &mut Request) -> ControlFlow {
    let raw_path = req.path().to_string();
    if raw_path == "/" {
        return ControlFlow::Break(redirect(DOCS_PATH));
    }

    let route = normalize_path(&raw_path);
    let canonical = raw_path.strip_prefix('/') == Some(route.as_str());

    let color_route = COLOR_ROUTES.iter().copied().find(|r| *r == route);
    let raw_hex = first_query_value(req.query(), "hex");
    let present = raw_hex.as_deref().is_some_and(|v| !v.is_empty());

    // A present `hex` is validated on every route; only color routes require one.
    let hex = if color_route.is_some() || present {
        match HexColor::parse(raw_hex.as_deref().unwrap_or("")) {
            Ok(hex) => Some(hex),
            Err(err) => {
                debug!(
                    target: "hexchroma.web",
                    path = %raw_path,
                    error_code = err.code(),
                    hex = raw_hex.as_deref().unwrap_or(""),
                    "rejected color parameter"
                );
                return ControlFlow::Break(color_error_response(&err));
            }
        }
    } else {
        None
    };

    if let (Some(color_route), Some(hex)) = (color_route, hex) {
        req.insert_extension(hex);
        if canonical {
            return ControlFlow::Continue;
        }
        return ControlFlow::Break(color_response(color_route, hex));
    }

    match route.as_str() {
        "docs" | "health" if canonical => ControlFlow::Continue,
        "docs" => ControlFlow::Break(docs_response(req)),
        "health" => ControlFlow::Break(health_response()),
        _ => ControlFlow::Break(fallback_response(req)),
    }
}

/// Strip one trailing `/`, then one leading `/`, then lowercase.
fn normalize_path(path: &str) -> String {
    let path = path.strip_suffix('/').unwrap_or(path);
    let path = path.strip_prefix('/').unwrap_or(path);
    path.to_lowercase()
}

/// First value for `key` in a form-urlencoded query; later repeats are ignored.
fn first_query_value(query: Option<&str>, key: &str) -> Option<String> {
    url::form_urlencoded::parse(query?.as_bytes())
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

// =============================================================================
// Response envelope
// =============================================================================

#[derive(Serialize)]
struct Envelope<T> {
    success: bool,
    message: String,
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_code: Option<&'static str>,
    version: &'static str,
}

fn json_ok<T: Serialize>(message: &str, data: T) -> Response {
    let envelope = Envelope {
        success: true,
        message: message.to_string(),
        data: Some(data),
        error_code: None,
        version: VERSION,
    };
    Response::json(&envelope).unwrap_or_else(|_| Response::internal_error())
}

fn json_err<T: Serialize>(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
    data: Option<T>,
) -> Response {
    let envelope = Envelope {
        success: false,
        message: message.into(),
        data,
        error_code: Some(code),
        version: VERSION,
    };
    match serde_json::to_vec(&envelope) {
        Ok(body) => Response::with_status(status)
            .header("content-type", b"application/json".to_vec())
            .body(ResponseBody::Bytes(body)),
        Err(err) => {
            error!(target: "hexchroma.web", error = %err, "failed to serialize error envelope");
            Response::internal_error()
        }
    }
}

fn color_error_response(err: &ColorError) -> Response {
    json_err::<()>(status_code(err.status()), err.code(), err.to_string(), None)
}

/// Map a numeric status from the core onto the framework's status type.
fn status_code(status: u16) -> StatusCode {
    match status {
        404 => StatusCode::NOT_FOUND,
        500 => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::BAD_REQUEST,
    }
}

fn redirect(location: &str) -> Response {
    Response::with_status(StatusCode::FOUND)
        .header("location", location.as_bytes().to_vec())
        .body(ResponseBody::Bytes(Vec::new()))
}

/// Base for absolute links: configured override, else the Host header.
fn base_url(req: &Request) -> String {
    if let Some(url) = req
        .get_extension::<AppState>()
        .and_then(|state| state.public_base_url.clone())
    {
        return url;
    }
    req.headers()
        .get("host")
        .and_then(|v| std::str::from_utf8(v).ok())
        .map(str::trim)
        .filter(|host| !host.is_empty())
        .map_or_else(|| FALLBACK_BASE_URL.to_string(), |host| format!("http://{host}"))
}

// =============================================================================
// Handlers
// =============================================================================

/// Run one color operation and wrap it in the envelope.
fn color_response(route: &str, hex: HexColor) -> Response {
    match route {
        ROUTE_HEX_TO_RGB => json_ok("HEX to RGB conversion complete.", api::hex_to_rgb(hex)),
        ROUTE_COMPLEMENTARY => json_ok(
            "Complementary color computed (RGB inversion).",
            api::complementary(hex),
        ),
        ROUTE_TRIADIC => json_ok(
            "Triadic palette generated (HSL hue rotation).",
            api::triadic(hex),
        ),
        ROUTE_NAME => match api::name(hex) {
            Ok(hit) => json_ok("Color name found in the built-in table.", hit),
            Err(miss) => json_err(
                StatusCode::NOT_FOUND,
                "not_found",
                "No descriptive name for this HEX in the built-in table.",
                Some(miss),
            ),
        },
        other => {
            warn!(target: "hexchroma.web", route = other, "no handler for color route");
            Response::internal_error()
        }
    }
}

fn handle_color(route: &'static str, req: &Request) -> ResponseFuture {
    let response = match req.get_extension::<HexColor>().copied() {
        Some(hex) => color_response(route, hex),
        None => {
            error!(target: "hexchroma.web", route, "color route reached without a validated hex");
            Response::internal_error()
        }
    };
    Box::pin(async move { response })
}

fn docs_response(req: &Request) -> Response {
    Response::json(&api::docs(&base_url(req))).unwrap_or_else(|_| Response::internal_error())
}

fn fallback_response(req: &Request) -> Response {
    json_err(
        StatusCode::NOT_FOUND,
        "unknown_route",
        "Unknown or missing method. See /docs for the full documentation.",
        Some(api::fallback(&base_url(req))),
    )
}

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    version: &'static str,
}

fn health_response() -> Response {
    let payload = HealthResponse {
        ok: true,
        version: VERSION,
    };
    Response::json(&payload).unwrap_or_else(|_| Response::internal_error())
}

// =============================================================================
// App builder
// =============================================================================

fn build_app(public_base_url: Option<String>) -> App {
    let state = AppState { public_base_url };

    App::builder()
        .middleware(RequestSpanLogger)
        .middleware(CorsHeaders)
        .middleware(StateInjector { state })
        .middleware(HexGuard)
        .route(
            "/health",
            Method::Get,
            |_ctx: &RequestContext, _req: &mut Request| async { health_response() },
        )
        .route(
            "/docs",
            Method::Get,
            |_ctx: &RequestContext, req: &mut Request| {
                let response = docs_response(req);
                async move { response }
            },
        )
        .route(
            "/hex_para_rgb",
            Method::Get,
            |_ctx: &RequestContext, req: &mut Request| handle_color(ROUTE_HEX_TO_RGB, req),
        )
        .route(
            "/calcular_complementar",
            Method::Get,
            |_ctx: &RequestContext, req: &mut Request| handle_color(ROUTE_COMPLEMENTARY, req),
        )
        .route(
            "/gerar_paleta_triadica",
            Method::Get,
            |_ctx: &RequestContext, req: &mut Request| handle_color(ROUTE_TRIADIC, req),
        )
        .route(
            "/obter_nome_cor",
            Method::Get,
            |_ctx: &RequestContext, req: &mut Request| handle_color(ROUTE_NAME, req),
        )
        .build()
}

/// Start the web server and return a handle for shutdown.
///
/// Refuses to bind on non-localhost addresses unless the config was
/// created with [`WebServerConfig::with_dangerous_public_bind`].
pub async fn start_web_server(config: WebServerConfig) -> Result<WebServerHandle> {
    if !config.is_localhost() && !config.allow_public_bind {
        return Err(Error::Runtime(format!(
            "refusing to bind on public address '{}'; \
             use --dangerous-bind-any or with_dangerous_public_bind() to override",
            config.host
        )));
    }
    if !config.is_localhost() {
        warn!(
            target: "hexchroma.web",
            host = %config.host,
            "binding web server on non-localhost address; endpoints may be remotely reachable"
        );
    }
    let bind_addr = config.bind_addr();
    let app = build_app(config.public_base_url);

    match app.run_startup_hooks().await {
        StartupOutcome::Success => {}
        StartupOutcome::PartialSuccess { warnings } => {
            warn!(target: "hexchroma.web", warnings, "web startup hooks had warnings");
        }
        StartupOutcome::Aborted(err) => {
            return Err(Error::Runtime(format!(
                "web startup aborted: {}",
                err.message
            )));
        }
    }

    let app = Arc::new(app);
    let listener = TcpListener::bind(bind_addr.clone())
        .await
        .map_err(Error::Io)?;
    let local_addr = listener.local_addr().map_err(Error::Io)?;

    let server = Arc::new(TcpServer::new(ServerConfig::new(bind_addr)));
    let handler: Arc<dyn Handler> = Arc::clone(&app) as Arc<dyn Handler>;

    let server_task = {
        let server = Arc::clone(&server);
        tokio::spawn(async move {
            let cx = Cx::for_testing();
            server.serve_on_handler(&cx, listener, handler).await
        })
    };

    info!(
        target: "hexchroma.web",
        bound_addr = %local_addr,
        "web server listening"
    );

    Ok(WebServerHandle {
        bound_addr: local_addr,
        server,
        app,
        join: server_task,
    })
}

/// Run the web server until Ctrl+C or SIGTERM, then shut down gracefully.
pub async fn run_web_server(config: WebServerConfig) -> Result<()> {
    let WebServerHandle {
        bound_addr,
        server,
        app,
        mut join,
    } = start_web_server(config).await?;

    println!("hexchroma listening on http://{bound_addr}");

    tokio::select! {
        result = &mut join => {
            handle_server_exit(result, &server, &app).await?;
        }
        shutdown = wait_for_shutdown_signal() => {
            shutdown?;
            info!(target: "hexchroma.web", "shutdown signal received");
            server.shutdown();
            poke_listener(bound_addr);
            handle_server_exit(join.await, &server, &app).await?;
        }
    }

    Ok(())
}

async fn wait_for_shutdown_signal() -> Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut term = signal(SignalKind::terminate())
            .map_err(|e| Error::Runtime(format!("SIGTERM handler failed: {e}")))?;

        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = term.recv() => {}
        }
        Ok(())
    }
    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c()
            .await
            .map_err(|e| Error::Runtime(format!("Ctrl+C handler failed: {e}")))?;
        Ok(())
    }
}

async fn handle_server_exit(
    result: std::result::Result<std::result::Result<(), ServerError>, tokio::task::JoinError>,
    server: &Arc<TcpServer>,
    app: &Arc<App>,
) -> Result<()> {
    match result {
        Ok(Ok(()) | Err(ServerError::Shutdown)) => {}
        Ok(Err(err)) => {
            return Err(Error::Runtime(format!("web server error: {err}")));
        }
        Err(err) => {
            return Err(Error::Runtime(format!("web server join error: {err}")));
        }
    }

    let forced = server.drain().await;
    if forced > 0 {
        warn!(target: "hexchroma.web", forced, "web server forced closed connections");
    }
    app.run_shutdown_hooks().await;
    Ok(())
}

fn poke_listener(addr: SocketAddr) {
    let _ = TcpStream::connect_timeout(&addr, Duration::from_millis(200));
}
