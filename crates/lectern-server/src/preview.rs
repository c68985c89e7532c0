//! Serving a built site under its base path.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use axum::body::Body;
use axum::http::{Request, Uri};
use axum::response::Redirect;
use axum::routing::get;
use axum::Router;
use tower::ServiceExt;
use tower_http::services::{ServeDir, ServeFile};

use crate::ServerError;

/// Configuration for the preview server.
#[derive(Debug, Clone)]
pub struct PreviewConfig {
    /// Built site
    pub dir: PathBuf,

    /// Base path the site is served under
    pub base: String,

    /// Port to listen on
    pub port: u16,

    /// Host to bind to
    pub host: String,

    /// Open browser on start
    pub open: bool,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("dist"),
            base: "/".to_string(),
            port: 4173,
            host: "127.0.0.1".to_string(),
            open: false,
        }
    }
}

/// Router serving `dir` under `base`.
///
/// `/base/arrays` resolves to `arrays.html`, directories to their
/// `index.html`, `/` redirects to the base and unknown paths get `404.html`.
pub fn preview_router(dir: &Path, base: &str) -> Router {
    let root = dir.to_path_buf();
    let files = ServeDir::new(dir)
        .append_index_html_on_directories(true)
        .not_found_service(ServeFile::new(dir.join("404.html")))
        .map_request(move |req: Request<Body>| rewrite_clean_url(req, &root));

    let prefix = base.trim_end_matches('/');
    if prefix.is_empty() {
        return Router::new().fallback_service(files);
    }

    let base = base.to_string();
    Router::new()
        .route(
            "/",
            get(move || {
                let base = base.clone();
                async move { Redirect::temporary(&base) }
            }),
        )
        .nest_service(prefix, files)
}

/// Point extension-less requests at the matching `.html` file.
fn rewrite_clean_url<B>(mut req: Request<B>, root: &Path) -> Request<B> {
    let Some(target) = clean_url_target(req.uri().path(), root) else {
        return req;
    };

    let target = match req.uri().query() {
        Some(query) => format!("{}?{}", target, query),
        None => target,
    };
    if let Ok(uri) = target.parse::<Uri>() {
        *req.uri_mut() = uri;
    }
    req
}

/// `/arrays` -> `/arrays.html` and `/guide` -> `/guide/index.html` when
/// that file exists under `root`.
///
/// Directories are served in place because a trailing-slash redirect from
/// inside the nested service would drop the base path.
pub fn clean_url_target(path: &str, root: &Path) -> Option<String> {
    if path.ends_with('/') || Path::new(path).extension().is_some() {
        return None;
    }

    let relative = path.trim_start_matches('/');
    if root.join(format!("{}.html", relative)).is_file() {
        return Some(format!("{}.html", path));
    }
    root.join(relative)
        .join("index.html")
        .is_file()
        .then(|| format!("{}/index.html", path))
}

/// Static server for a built site.
pub struct PreviewServer {
    config: PreviewConfig,
}

impl PreviewServer {
    pub fn new(config: PreviewConfig) -> Self {
        Self { config }
    }

    /// Serve until the process is stopped.
    pub async fn start(self) -> Result<(), ServerError> {
        if !self.config.dir.is_dir() {
            return Err(ServerError::MissingDir(self.config.dir.clone()));
        }

        let addr: SocketAddr = format!("{}:{}", self.config.host, self.config.port)
            .parse()
            .map_err(|_| {
                ServerError::InvalidAddress(format!("{}:{}", self.config.host, self.config.port))
            })?;

        let app = preview_router(&self.config.dir, &self.config.base);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::Bind(addr, e))?;

        let url = format!("http://{}{}", addr, self.config.base);
        tracing::info!("Serving {} at {}", self.config.dir.display(), url);

        if self.config.open {
            if let Err(e) = open::that(&url) {
                tracing::warn!("Failed to open browser: {}", e);
            }
        }

        axum::serve(listener, app).await.map_err(ServerError::Serve)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use std::fs;
    use tempfile::tempdir;

    fn site() -> tempfile::TempDir {
        let temp = tempdir().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("assets")).unwrap();
        fs::create_dir_all(root.join("guide")).unwrap();
        fs::write(root.join("index.html"), "home").unwrap();
        fs::write(root.join("arrays.html"), "arrays").unwrap();
        fs::write(root.join("guide/index.html"), "guide").unwrap();
        fs::write(root.join("404.html"), "not found").unwrap();
        fs::write(root.join("assets/style.css"), "body{}").unwrap();
        temp
    }

    async fn get_path(app: Router, path: &str) -> (StatusCode, String) {
        let response = app
            .oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8_lossy(&bytes).to_string())
    }

    #[test]
    fn resolves_clean_urls() {
        let temp = site();

        assert_eq!(
            clean_url_target("/arrays", temp.path()),
            Some("/arrays.html".to_string())
        );
        assert_eq!(clean_url_target("/objects", temp.path()), None);
        assert_eq!(clean_url_target("/guide/", temp.path()), None);
        assert_eq!(
            clean_url_target("/guide", temp.path()),
            Some("/guide/index.html".to_string())
        );
        assert_eq!(clean_url_target("/assets/style.css", temp.path()), None);
    }

    #[tokio::test]
    async fn serves_pages_under_base() {
        let temp = site();
        let app = preview_router(temp.path(), "/SwiftVsTypeScript/");

        assert_eq!(
            get_path(app.clone(), "/SwiftVsTypeScript/").await,
            (StatusCode::OK, "home".to_string())
        );
        assert_eq!(
            get_path(app.clone(), "/SwiftVsTypeScript/arrays").await,
            (StatusCode::OK, "arrays".to_string())
        );
        assert_eq!(
            get_path(app.clone(), "/SwiftVsTypeScript/arrays.html").await,
            (StatusCode::OK, "arrays".to_string())
        );
        assert_eq!(
            get_path(app.clone(), "/SwiftVsTypeScript/guide/").await,
            (StatusCode::OK, "guide".to_string())
        );
        assert_eq!(
            get_path(app, "/SwiftVsTypeScript/assets/style.css").await,
            (StatusCode::OK, "body{}".to_string())
        );
    }

    #[tokio::test]
    async fn directory_without_slash_stays_under_base() {
        let temp = site();
        let app = preview_router(temp.path(), "/SwiftVsTypeScript/");

        assert_eq!(
            get_path(app, "/SwiftVsTypeScript/guide").await,
            (StatusCode::OK, "guide".to_string())
        );
    }

    #[tokio::test]
    async fn unknown_pages_get_not_found_page() {
        let temp = site();
        let app = preview_router(temp.path(), "/SwiftVsTypeScript/");

        let (status, body) = get_path(app, "/SwiftVsTypeScript/missing").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, "not found");
    }

    #[tokio::test]
    async fn root_redirects_to_base() {
        let temp = site();
        let app = preview_router(temp.path(), "/SwiftVsTypeScript/");

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(response.headers()["location"], "/SwiftVsTypeScript/");
    }

    #[tokio::test]
    async fn serves_at_root_base() {
        let temp = site();
        let app = preview_router(temp.path(), "/");

        assert_eq!(
            get_path(app, "/arrays").await,
            (StatusCode::OK, "arrays".to_string())
        );
    }
}
