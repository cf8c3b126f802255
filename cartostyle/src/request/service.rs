//! Tile request orchestration.
//!
//! [`TileService::handle`] walks one request through
//!
//! ```text
//! Idle → ParsingParams → CompilingStyle → Rendering → Encoding → Responding
//!          └──────────────┴────────────────┴───────────┴→ Error(kind) → Responding
//! ```
//!
//! Compile errors surface before the engine is touched. Every request ends in
//! `Responding` with either a complete PNG or an error payload.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::config::RenderSettings;
use crate::log::{Logger, NoOpLogger};
use crate::render::{EncodedTile, TileRenderer};
use crate::style::StyleCompiler;
use crate::{log_debug, log_info, log_trace, log_warn};

use super::error::{ErrorKind, RequestError};
use super::params::TileParams;

/// Processing state of one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerState {
    Idle,
    ParsingParams,
    CompilingStyle,
    Rendering,
    Encoding,
    Responding,
    Error(ErrorKind),
}

impl HandlerState {
    /// Whether `self → next` is a legal step.
    pub fn can_transition_to(&self, next: HandlerState) -> bool {
        use HandlerState::*;
        matches!(
            (self, next),
            (Idle, ParsingParams)
                | (ParsingParams, CompilingStyle)
                | (CompilingStyle, Rendering)
                | (Rendering, Encoding)
                | (Encoding, Responding)
                | (Error(_), Responding)
        ) || (!matches!(self, Responding | Error(_)) && matches!(next, Error(_)))
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, HandlerState::Responding)
    }
}

impl fmt::Display for HandlerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandlerState::Idle => f.write_str("idle"),
            HandlerState::ParsingParams => f.write_str("parsing-params"),
            HandlerState::CompilingStyle => f.write_str("compiling-style"),
            HandlerState::Rendering => f.write_str("rendering"),
            HandlerState::Encoding => f.write_str("encoding"),
            HandlerState::Responding => f.write_str("responding"),
            HandlerState::Error(kind) => write!(f, "error({})", kind),
        }
    }
}

/// Body of an error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorPayload {
    pub kind: ErrorKind,
    pub message: String,
}

impl ErrorPayload {
    pub fn to_json(&self) -> String {
        serde_json::json!({
            "kind": self.kind.as_str(),
            "message": self.message,
        })
        .to_string()
    }
}

impl From<&RequestError> for ErrorPayload {
    fn from(err: &RequestError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

/// What the transport sends back.
#[derive(Debug, Clone, PartialEq)]
pub enum TileResponse {
    Image(EncodedTile),
    Error(ErrorPayload),
}

impl TileResponse {
    pub fn is_success(&self) -> bool {
        matches!(self, TileResponse::Image(_))
    }

    pub fn status(&self) -> u16 {
        match self {
            TileResponse::Image(_) => 200,
            TileResponse::Error(payload) => payload.kind.http_status(),
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            TileResponse::Image(tile) => tile.content_type,
            TileResponse::Error(_) => "application/json",
        }
    }

    pub fn body(&self) -> Vec<u8> {
        match self {
            TileResponse::Image(tile) => tile.bytes.clone(),
            TileResponse::Error(payload) => payload.to_json().into_bytes(),
        }
    }

    /// `Content-Type` and `Content-Length` headers.
    pub fn headers(&self) -> Vec<(&'static str, String)> {
        let length = match self {
            TileResponse::Image(tile) => tile.len(),
            TileResponse::Error(payload) => payload.to_json().len(),
        };
        vec![
            ("Content-Type", self.content_type().to_string()),
            ("Content-Length", length.to_string()),
        ]
    }

    fn from_error(err: &RequestError) -> Self {
        TileResponse::Error(ErrorPayload::from(err))
    }
}

/// Tracks state transitions of one request.
struct StateTrail<'a> {
    current: HandlerState,
    visited: Vec<HandlerState>,
    logger: &'a dyn Logger,
}

impl<'a> StateTrail<'a> {
    fn new(logger: &'a dyn Logger) -> Self {
        Self {
            current: HandlerState::Idle,
            visited: vec![HandlerState::Idle],
            logger,
        }
    }

    fn enter(&mut self, next: HandlerState) {
        if !self.current.can_transition_to(next) {
            log_warn!(self.logger, "Unexpected transition {} -> {}", self.current, next);
        }
        log_trace!(self.logger, "Request state {} -> {}", self.current, next);
        self.current = next;
        self.visited.push(next);
    }

    /// Routes an error through `Error(kind)` to `Responding`.
    fn fail(&mut self, err: &RequestError) -> TileResponse {
        self.enter(HandlerState::Error(err.kind()));
        self.enter(HandlerState::Responding);
        TileResponse::from_error(err)
    }
}

/// Compiles and renders tile requests.
pub struct TileService {
    compiler: StyleCompiler,
    renderer: TileRenderer,
    resource_dir: PathBuf,
    settings: RenderSettings,
    logger: Arc<dyn Logger>,
}

impl TileService {
    pub fn new(renderer: TileRenderer, resource_dir: impl Into<PathBuf>, settings: RenderSettings) -> Self {
        Self {
            compiler: StyleCompiler::new(),
            renderer,
            resource_dir: resource_dir.into(),
            settings,
            logger: Arc::new(NoOpLogger),
        }
    }

    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.compiler = StyleCompiler::with_logger(Arc::clone(&logger));
        self.logger = logger;
        self
    }

    pub fn resource_dir(&self) -> &Path {
        &self.resource_dir
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    pub fn timeout(&self) -> Duration {
        self.settings.timeout_duration()
    }

    /// Handles one request synchronously.
    ///
    /// Blocks for the whole engine call; async callers should use
    /// [`handle_async`](Self::handle_async).
    pub fn handle(&self, params: &TileParams) -> TileResponse {
        self.handle_traced(params).0
    }

    /// Like [`handle`](Self::handle), also returning every state visited.
    pub fn handle_traced(&self, params: &TileParams) -> (TileResponse, Vec<HandlerState>) {
        let started = Instant::now();
        let mut trail = StateTrail::new(self.logger.as_ref());

        let response = self.run(params, &mut trail);
        match &response {
            TileResponse::Image(tile) => log_info!(
                self.logger,
                "Rendered tile: {} bytes in {:?}",
                tile.len(),
                started.elapsed()
            ),
            TileResponse::Error(payload) => log_warn!(
                self.logger,
                "Request failed ({}): {}",
                payload.kind,
                payload.message
            ),
        }
        (response, trail.visited)
    }

    fn run(&self, params: &TileParams, trail: &mut StateTrail<'_>) -> TileResponse {
        trail.enter(HandlerState::ParsingParams);
        let job = match params.decode(&self.settings) {
            Ok(job) => job,
            Err(e) => return trail.fail(&e),
        };

        trail.enter(HandlerState::CompilingStyle);
        let document = match self.compiler.compile(
            &job.styles,
            &job.zooms,
            &job.layers,
            &job.srs,
            &job.background_color,
        ) {
            Ok(document) => document,
            Err(e) => return trail.fail(&RequestError::from(e)),
        };
        log_debug!(self.logger, "Map document is {} bytes", document.len());

        trail.enter(HandlerState::Rendering);
        let image = match self
            .renderer
            .rasterize(document, &self.resource_dir, &job.render_request())
        {
            Ok(image) => image,
            Err(e) => return trail.fail(&RequestError::from(e)),
        };

        trail.enter(HandlerState::Encoding);
        let tile = match self.renderer.encode(&image) {
            Ok(tile) => tile,
            Err(e) => return trail.fail(&RequestError::from(e)),
        };

        trail.enter(HandlerState::Responding);
        TileResponse::Image(tile)
    }

    /// Handles a request on the blocking pool, bounded by the configured
    /// timeout.
    ///
    /// On timeout the caller gets a `Timeout` error right away. The engine
    /// call itself cannot be interrupted: it runs to completion in the
    /// background and keeps the engine gate until it returns.
    pub async fn handle_async(self: &Arc<Self>, params: TileParams) -> TileResponse {
        let timeout = self.timeout();
        let service = Arc::clone(self);
        let task = tokio::task::spawn_blocking(move || service.handle(&params));

        match tokio::time::timeout(timeout, task).await {
            Ok(Ok(response)) => response,
            Ok(Err(join_error)) => {
                let err = RequestError::Aborted(join_error.to_string());
                log_warn!(self.logger, "{}", err);
                TileResponse::from_error(&err)
            }
            Err(_) => {
                let err = RequestError::Timeout(timeout);
                log_warn!(self.logger, "{}; render continues in the background", err);
                TileResponse::from_error(&err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::BoundingBox;
    use crate::render::{EngineCall, PixelBuffer, RenderEngine, RenderError};
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingEngine {
        calls: AtomicUsize,
        last_dir: Mutex<Option<PathBuf>>,
    }

    impl RenderEngine for CountingEngine {
        fn render(&self, call: &EngineCall<'_>, buffer: &mut PixelBuffer) -> Result<(), RenderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_dir.lock() = Some(call.resource_dir.to_path_buf());
            buffer.as_mut_bytes().fill(0xff);
            Ok(())
        }

        fn name(&self) -> &str {
            "counting"
        }

        fn is_reentrant(&self) -> bool {
            true
        }
    }

    struct BrokenEngine;

    impl RenderEngine for BrokenEngine {
        fn render(&self, _call: &EngineCall<'_>, _buffer: &mut PixelBuffer) -> Result<(), RenderError> {
            Err(RenderError::engine_failure("broken", "returned code 2"))
        }

        fn name(&self) -> &str {
            "broken"
        }

        fn is_reentrant(&self) -> bool {
            true
        }
    }

    fn service(engine: Arc<dyn RenderEngine>) -> TileService {
        TileService::new(TileRenderer::new(engine), "/srv/carto", RenderSettings::default())
    }

    fn params(maxzoom: usize) -> TileParams {
        TileParams::from_query([
            (
                "style".to_string(),
                format!(
                    r##"[{{"name":"water","rules":[{{"maxzoom":{},
                    "symbolizers":[{{"type":"polygon","params":[["fill","#ff0000"]]}}]}}]}}]"##,
                    maxzoom
                ),
            ),
            ("zooms".to_string(), "[1000,2000,3000]".to_string()),
            (
                "layers".to_string(),
                r#"[{"name":"coast","style":"water","srs":"+init=epsg:4326",
                   "source":{"kind":"file","type":"shape","path":"coast.shp"}}]"#
                    .to_string(),
            ),
            ("width".to_string(), "64".to_string()),
            ("height".to_string(), "64".to_string()),
            ("lon0".to_string(), "-1".to_string()),
            ("lat0".to_string(), "-1".to_string()),
            ("lon1".to_string(), "1".to_string()),
            ("lat1".to_string(), "1".to_string()),
        ])
    }

    #[test]
    fn test_success_walks_every_state() {
        let engine = Arc::new(CountingEngine::default());
        let (response, states) = service(engine.clone()).handle_traced(&params(0));

        assert!(response.is_success());
        assert_eq!(
            states,
            [
                HandlerState::Idle,
                HandlerState::ParsingParams,
                HandlerState::CompilingStyle,
                HandlerState::Rendering,
                HandlerState::Encoding,
                HandlerState::Responding,
            ]
        );
        assert_eq!(engine.calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            engine.last_dir.lock().as_deref(),
            Some(Path::new("/srv/carto"))
        );
    }

    #[test]
    fn test_success_response_headers() {
        let response = service(Arc::new(CountingEngine::default())).handle(&params(0));

        assert_eq!(response.status(), 200);
        assert_eq!(response.content_type(), "image/png");
        let body = response.body();
        assert_eq!(&body[..8], &crate::render::PNG_SIGNATURE);
        assert_eq!(
            response.headers(),
            vec![
                ("Content-Type", "image/png".to_string()),
                ("Content-Length", body.len().to_string()),
            ]
        );
    }

    #[test]
    fn test_compile_error_skips_engine() {
        let engine = Arc::new(CountingEngine::default());
        let (response, states) = service(engine.clone()).handle_traced(&params(5));

        assert_eq!(
            states,
            [
                HandlerState::Idle,
                HandlerState::ParsingParams,
                HandlerState::CompilingStyle,
                HandlerState::Error(ErrorKind::UnknownZoomReference),
                HandlerState::Responding,
            ]
        );
        assert_eq!(engine.calls.load(Ordering::SeqCst), 0);
        match response {
            TileResponse::Error(payload) => {
                assert_eq!(payload.kind, ErrorKind::UnknownZoomReference);
                assert!(payload.message.contains("maxscale_zoom5"));
            }
            other => panic!("expected error response, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_error_response() {
        let mut params = params(0);
        params.set("width", "zero");
        let (response, states) = service(Arc::new(CountingEngine::default())).handle_traced(&params);

        assert_eq!(states[2], HandlerState::Error(ErrorKind::MalformedInput));
        assert_eq!(response.status(), 400);
        assert_eq!(response.content_type(), "application/json");

        let body: serde_json::Value = serde_json::from_slice(&response.body()).unwrap();
        assert_eq!(body["kind"], "MalformedInput");
        assert!(body["message"].as_str().unwrap().contains("width"));
    }

    #[test]
    fn test_engine_failure_response() {
        let (response, states) = service(Arc::new(BrokenEngine)).handle_traced(&params(0));

        assert_eq!(
            states[states.len() - 2],
            HandlerState::Error(ErrorKind::RenderEngineFailure)
        );
        assert_eq!(response.status(), 500);
        assert!(!response.is_success());
    }

    #[test]
    fn test_transition_rules() {
        use HandlerState::*;
        assert!(Idle.can_transition_to(ParsingParams));
        assert!(Rendering.can_transition_to(Error(ErrorKind::RenderEngineFailure)));
        assert!(Error(ErrorKind::Timeout).can_transition_to(Responding));
        assert!(!Idle.can_transition_to(Rendering));
        assert!(!Responding.can_transition_to(Error(ErrorKind::Timeout)));
        assert!(!Error(ErrorKind::Timeout).can_transition_to(Error(ErrorKind::Timeout)));
        assert!(Responding.is_terminal());
        assert!(!Error(ErrorKind::Timeout).is_terminal());
    }

    #[test]
    fn test_error_payload_json() {
        let payload = ErrorPayload {
            kind: ErrorKind::EncodingFailure,
            message: "disk \"full\"".to_string(),
        };
        let parsed: serde_json::Value = serde_json::from_str(&payload.to_json()).unwrap();
        assert_eq!(parsed["kind"], "EncodingFailure");
        assert_eq!(parsed["message"], "disk \"full\"");
        assert_eq!(serde_json::to_string(&payload).unwrap(), payload.to_json());
    }

    #[test]
    fn test_state_display() {
        assert_eq!(HandlerState::CompilingStyle.to_string(), "compiling-style");
        assert_eq!(
            HandlerState::Error(ErrorKind::Timeout).to_string(),
            "error(Timeout)"
        );
    }

    struct SlowEngine(Duration);

    impl RenderEngine for SlowEngine {
        fn render(&self, _call: &EngineCall<'_>, _buffer: &mut PixelBuffer) -> Result<(), RenderError> {
            std::thread::sleep(self.0);
            Ok(())
        }

        fn name(&self) -> &str {
            "slow"
        }

        fn is_reentrant(&self) -> bool {
            true
        }
    }

    #[tokio::test]
    async fn test_handle_async_success() {
        let service = Arc::new(service(Arc::new(CountingEngine::default())));
        let response = service.handle_async(params(0)).await;
        assert!(response.is_success());
    }

    #[tokio::test]
    async fn test_handle_async_timeout() {
        let settings = RenderSettings {
            timeout: 1,
            ..RenderSettings::default()
        };
        let service = Arc::new(TileService::new(
            TileRenderer::new(Arc::new(SlowEngine(Duration::from_secs(2)))),
            ".",
            settings,
        ));

        let response = service.handle_async(params(0)).await;

        match response {
            TileResponse::Error(payload) => assert_eq!(payload.kind, ErrorKind::Timeout),
            other => panic!("expected timeout, got {:?}", other),
        }
    }

    #[test]
    fn test_bbox_reaches_engine() {
        struct BboxEngine(Mutex<Option<BoundingBox>>);
        impl RenderEngine for BboxEngine {
            fn render(&self, call: &EngineCall<'_>, _buffer: &mut PixelBuffer) -> Result<(), RenderError> {
                *self.0.lock() = Some(call.bbox);
                Ok(())
            }
            fn name(&self) -> &str {
                "bbox"
            }
        }

        let engine = Arc::new(BboxEngine(Mutex::new(None)));
        service(engine.clone()).handle(&params(0));

        assert_eq!(
            *engine.0.lock(),
            Some(BoundingBox::new(-1.0, -1.0, 1.0, 1.0).unwrap())
        );
    }
}
