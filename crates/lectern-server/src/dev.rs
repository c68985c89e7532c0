//! Development server: build, serve, watch and reload.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
    routing::get,
    Router,
};
use tokio::sync::broadcast;

use lectern_config::{project_root, ProjectConfig};
use lectern_static::{BuildConfig, BuildResult, StaticBuilder};

use crate::preview::preview_router;
use crate::reload::{reload_client_script, ReloadHub, ReloadMessage, RELOAD_PATH};
use crate::watcher::{FileWatcher, WatchEvent};
use crate::ServerError;

/// Configuration for the development server.
#[derive(Debug, Clone)]
pub struct DevServerConfig {
    /// Path of `lectern.toml`
    pub config_path: PathBuf,

    /// Where development builds are written, relative to the project root
    pub output_dir: PathBuf,

    /// Port to listen on
    pub port: u16,

    /// Host to bind to
    pub host: String,

    /// Open browser on start
    pub open: bool,
}

impl Default for DevServerConfig {
    fn default() -> Self {
        Self {
            config_path: PathBuf::from(lectern_config::CONFIG_FILE),
            output_dir: PathBuf::from(".lectern/dev"),
            port: 5173,
            host: "127.0.0.1".to_string(),
            open: true,
        }
    }
}

/// Development server.
pub struct DevServer {
    config: DevServerConfig,
}

impl DevServer {
    pub fn new(config: DevServerConfig) -> Self {
        Self { config }
    }

    fn root(&self) -> PathBuf {
        project_root(&self.config.config_path)
    }

    fn output_dir(&self) -> PathBuf {
        self.root().join(&self.config.output_dir)
    }

    /// Load the project and build it with the live-reload client injected.
    async fn rebuild(&self) -> Result<(ProjectConfig, BuildResult), ServerError> {
        let root = self.root();
        let project = ProjectConfig::load(&self.config.config_path)?;

        let mut build = BuildConfig::from_project(project.clone(), &root);
        build.output_dir = self.output_dir();
        build.minify = false;
        build.live_reload = Some(reload_client_script());

        let result = StaticBuilder::new(build)?.build().await?;
        Ok((project, result))
    }

    /// Start the development server.
    pub async fn start(self) -> Result<(), ServerError> {
        let addr: SocketAddr = format!("{}:{}", self.config.host, self.config.port)
            .parse()
            .map_err(|_| {
                ServerError::InvalidAddress(format!("{}:{}", self.config.host, self.config.port))
            })?;

        let (project, result) = self.rebuild().await?;
        tracing::info!(
            "Built {} pages in {}ms",
            result.pages,
            result.duration_ms
        );

        let base = project.site.base.clone();
        // Watchers report absolute paths on some platforms
        let root = self.root().canonicalize().unwrap_or_else(|_| self.root());
        let hub = ReloadHub::new();

        // Never watch build output, or every rebuild would trigger another
        let ignore = vec![
            root.join(&self.config.output_dir),
            root.join(&project.build.out_dir),
            root.join(".git"),
        ];
        let (watcher, mut rx) =
            FileWatcher::new(&[root], ignore).map_err(ServerError::Watch)?;

        let server = Arc::new(self);
        let watch_server = Arc::clone(&server);
        let watch_hub = hub.clone();
        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                handle_watch_event(&watch_server, &watch_hub, event).await;
            }
            // Keep watcher alive
            drop(watcher);
        });

        let app = Router::new()
            .route(RELOAD_PATH, get(ws_handler))
            .with_state(hub)
            .merge(preview_router(&server.output_dir(), &base));

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::Bind(addr, e))?;

        let url = format!("http://{}{}", addr, base);
        tracing::info!("Dev server running at {}", url);

        if server.config.open {
            if let Err(e) = open::that(&url) {
                tracing::warn!("Failed to open browser: {}", e);
            }
        }

        axum::serve(listener, app).await.map_err(ServerError::Serve)
    }
}

/// Rebuild after a change and tell browsers about it.
async fn handle_watch_event(server: &DevServer, hub: &ReloadHub, event: WatchEvent) {
    let change = match &event {
        WatchEvent::Page(_) => "Page changed",
        WatchEvent::Config(_) => "Config changed",
        WatchEvent::Asset(_) => "File changed",
        WatchEvent::Removed(_) => "File removed",
    };
    tracing::info!("{}: {}", change, event.path().display());

    match server.rebuild().await {
        Ok((_, result)) => {
            tracing::info!(
                "Rebuilt {} pages in {}ms, reloading {} browser(s)",
                result.pages,
                result.duration_ms,
                hub.subscriber_count()
            );
            hub.send(ReloadMessage::Reload);
        }
        Err(e) => {
            tracing::error!("Rebuild failed: {}", e);
            hub.send(ReloadMessage::Error {
                message: e.to_string(),
            });
        }
    }
}

/// Handler for the live-reload WebSocket endpoint.
async fn ws_handler(ws: WebSocketUpgrade, State(hub): State<ReloadHub>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws(socket, hub))
}

/// Forward reload messages to one browser.
async fn handle_ws(mut socket: WebSocket, hub: ReloadHub) {
    let mut rx = hub.subscribe();

    if send(&mut socket, &ReloadMessage::Connected).await.is_err() {
        return;
    }

    loop {
        let msg = match rx.recv().await {
            Ok(msg) => msg,
            // Missed messages still mean the site changed
            Err(broadcast::error::RecvError::Lagged(_)) => ReloadMessage::Reload,
            Err(broadcast::error::RecvError::Closed) => break,
        };
        if send(&mut socket, &msg).await.is_err() {
            break;
        }
    }
}

async fn send(socket: &mut WebSocket, msg: &ReloadMessage) -> Result<(), axum::Error> {
    let json = serde_json::to_string(msg).map_err(axum::Error::new)?;
    socket.send(Message::Text(json.into())).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const CONFIG: &str = r#"
[site]
title = "Swift vs TypeScript"
description = "Swift and TypeScript compared side by side"
src_dir = "./pages"
base = "/SwiftVsTypeScript/"

[site.theme_config]
logo = "logo.svg"

[[site.theme_config.sidebar]]
text = "Cheatsheet"

[[site.theme_config.sidebar.items]]
text = "Arrays"
link = "/arrays"
"#;

    #[test]
    fn creates_server_with_default_config() {
        let server = DevServer::new(DevServerConfig::default());
        assert_eq!(server.config.port, 5173);
        assert_eq!(server.config.output_dir, PathBuf::from(".lectern/dev"));
    }

    #[tokio::test]
    async fn rebuild_injects_reload_client() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        fs::write(root.join("lectern.toml"), CONFIG).unwrap();
        fs::write(root.join("logo.svg"), "<svg></svg>").unwrap();
        fs::create_dir_all(root.join("pages")).unwrap();
        fs::write(root.join("pages/arrays.md"), "# Arrays\n").unwrap();

        let server = DevServer::new(DevServerConfig {
            config_path: root.join("lectern.toml"),
            open: false,
            ..Default::default()
        });

        let (project, result) = server.rebuild().await.unwrap();

        assert_eq!(project.site.base, "/SwiftVsTypeScript/");
        assert_eq!(result.pages, 1);
        let html = fs::read_to_string(root.join(".lectern/dev/arrays.html")).unwrap();
        assert!(html.contains(RELOAD_PATH));
        assert!(!root.join("dist").exists());
    }

    #[tokio::test]
    async fn rebuild_reports_invalid_config() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        fs::write(root.join("lectern.toml"), CONFIG).unwrap();

        let server = DevServer::new(DevServerConfig {
            config_path: root.join("lectern.toml"),
            open: false,
            ..Default::default()
        });

        let result = server.rebuild().await;

        assert!(matches!(result, Err(ServerError::Build(_))));
    }

    #[tokio::test]
    async fn watch_events_broadcast_rebuild_outcome() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        fs::write(root.join("lectern.toml"), CONFIG).unwrap();
        fs::create_dir_all(root.join("pages")).unwrap();
        fs::write(root.join("pages/arrays.md"), "# Arrays\n").unwrap();

        let server = DevServer::new(DevServerConfig {
            config_path: root.join("lectern.toml"),
            open: false,
            ..Default::default()
        });
        let hub = ReloadHub::new();
        let mut rx = hub.subscribe();

        // No logo yet, so the rebuild fails
        let event = WatchEvent::Page(root.join("pages/arrays.md"));
        handle_watch_event(&server, &hub, event).await;
        assert!(matches!(rx.try_recv().unwrap(), ReloadMessage::Error { .. }));

        fs::write(root.join("logo.svg"), "<svg></svg>").unwrap();
        let event = WatchEvent::Asset(root.join("logo.svg"));
        handle_watch_event(&server, &hub, event).await;
        assert_eq!(rx.try_recv().unwrap(), ReloadMessage::Reload);
    }
}
