//! Manifest origin.
//!
//! Request paths are resolved against the configured origin host and the
//! manifest text is fetched over HTTP. No retries.

use manifest_filters::{Protocol, Scoped, detail_segments};
use reqwest::header::CONTENT_TYPE;
use tracing::debug;
use url::Url;

/// Failure to resolve or fetch a manifest.
#[derive(Debug, thiserror::Error)]
pub enum OriginError {
    #[error("origin: origin host is not configured")]
    HostNotConfigured,

    #[error("origin: invalid url format {path}")]
    InvalidUrl { path: String },

    #[error("fetching manifest: {reason}")]
    Request { reason: String },

    #[error("fetching manifest: returning http status of {status}")]
    Status { status: u16 },

    #[error("fetching manifest: response body is not valid utf-8")]
    InvalidBody,
}

impl OriginError {
    /// Whether the error happened while resolving the URL rather than fetching.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::HostNotConfigured | Self::InvalidUrl { .. })
    }
}

impl Scoped for OriginError {
    fn scope(&self) -> String {
        if self.is_configuration() {
            "origin".to_string()
        } else {
            "fetching manifest".to_string()
        }
    }

    fn details(&self) -> Vec<String> {
        match self {
            Self::HostNotConfigured => vec!["origin host is not configured".to_string()],
            Self::InvalidUrl { path } => detail_segments([format!("invalid url format {path}")]),
            Self::Request { reason } => detail_segments([reason]),
            Self::Status { status } => vec![format!("returning http status of {status}")],
            Self::InvalidBody => vec!["response body is not valid utf-8".to_string()],
        }
    }
}

/// Manifest text as served by the origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedManifest {
    pub content: String,
    /// `Content-Type` of the origin response, if any
    pub content_type: Option<String>,
}

impl FetchedManifest {
    /// Protocol the origin declared through its content type.
    pub fn protocol(&self) -> Option<Protocol> {
        self.content_type.as_deref().and_then(Protocol::from_content_type)
    }
}

/// Where a manifest lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    url: Url,
}

impl Origin {
    /// Joins `manifest_path` onto `origin_host`.
    pub fn configure(origin_host: Option<&str>, manifest_path: &str) -> Result<Self, OriginError> {
        let host = origin_host
            .map(str::trim)
            .filter(|host| !host.is_empty())
            .ok_or(OriginError::HostNotConfigured)?;

        let path = manifest_path.trim_start_matches('/');
        let joined = format!("{}/{}", host.trim_end_matches('/'), path);

        let invalid = || OriginError::InvalidUrl {
            path: manifest_path.to_string(),
        };
        let url = Url::parse(&joined).map_err(|_| invalid())?;
        if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
            return Err(invalid());
        }

        Ok(Self { url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Fetch the manifest text. The client's timeout applies.
    pub async fn fetch_manifest(
        &self,
        client: &reqwest::Client,
    ) -> Result<FetchedManifest, OriginError> {
        debug!(url = %self.url, "fetching manifest");

        let response = client
            .get(self.url.clone())
            .send()
            .await
            .map_err(|e| OriginError::Request {
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(OriginError::Status {
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        let body = response.bytes().await.map_err(|e| OriginError::Request {
            reason: e.to_string(),
        })?;

        let content = String::from_utf8(body.to_vec()).map_err(|_| OriginError::InvalidBody)?;

        Ok(FetchedManifest {
            content,
            content_type,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Router,
        http::{StatusCode, header},
        routing::get,
    };
    use manifest_filters::split_scope;

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[test]
    fn test_configure_joins_path() {
        let origin = Origin::configure(Some("https://cdn.example.com/"), "/vod/manifest.mpd").unwrap();
        assert_eq!(origin.url().as_str(), "https://cdn.example.com/vod/manifest.mpd");

        let origin = Origin::configure(Some("http://cdn.example.com/base"), "a/b.m3u8?x=1").unwrap();
        assert_eq!(origin.url().as_str(), "http://cdn.example.com/base/a/b.m3u8?x=1");
    }

    #[test]
    fn test_configure_errors() {
        let err = Origin::configure(None, "/a.mpd").unwrap_err();
        assert_eq!(err.to_string(), "origin: origin host is not configured");

        let err = Origin::configure(Some("  "), "/a.mpd").unwrap_err();
        assert!(matches!(err, OriginError::HostNotConfigured));

        let err = Origin::configure(Some("ftp://cdn.example.com"), "/a.mpd").unwrap_err();
        assert_eq!(err.to_string(), "origin: invalid url format /a.mpd");

        let err = Origin::configure(Some("not a host"), "/a.mpd").unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_scope_matches_message() {
        let errors = [
            OriginError::HostNotConfigured,
            OriginError::InvalidUrl {
                path: "/x.mpd".to_string(),
            },
            OriginError::InvalidUrl {
                path: "/a: b.mpd".to_string(),
            },
            OriginError::Request {
                reason: "error sending request: connection refused".to_string(),
            },
            OriginError::Status { status: 404 },
            OriginError::InvalidBody,
        ];
        for err in &errors {
            let (scope, details) = split_scope(&err.to_string());
            assert_eq!(scope, err.scope());
            assert_eq!(details, err.details());
        }
    }

    #[tokio::test]
    async fn test_fetch_manifest() {
        let base = serve(
            Router::new()
                .route("/ok.m3u8", get(|| async { "#EXTM3U\n" }))
                .route("/missing.m3u8", get(|| async { StatusCode::NOT_FOUND }))
                .route("/binary.mpd", get(|| async { vec![0xff_u8, 0xfe, 0x00] }))
                .route(
                    "/typed",
                    get(|| async {
                        (
                            [(header::CONTENT_TYPE, "application/dash+xml; charset=utf-8")],
                            "<MPD/>",
                        )
                    }),
                ),
        )
        .await;
        let client = reqwest::Client::new();

        let origin = Origin::configure(Some(&base), "/ok.m3u8").unwrap();
        let manifest = origin.fetch_manifest(&client).await.unwrap();
        assert_eq!(manifest.content, "#EXTM3U\n");
        // served as text/plain
        assert_eq!(manifest.protocol(), None);

        let origin = Origin::configure(Some(&base), "/typed").unwrap();
        let manifest = origin.fetch_manifest(&client).await.unwrap();
        assert_eq!(manifest.content, "<MPD/>");
        assert_eq!(manifest.protocol(), Some(Protocol::Dash));

        let origin = Origin::configure(Some(&base), "/missing.m3u8").unwrap();
        let err = origin.fetch_manifest(&client).await.unwrap_err();
        assert_eq!(err.to_string(), "fetching manifest: returning http status of 404");

        let origin = Origin::configure(Some(&base), "/binary.mpd").unwrap();
        let err = origin.fetch_manifest(&client).await.unwrap_err();
        assert!(matches!(err, OriginError::InvalidBody));
    }
}
