#![allow(dead_code)]

use actix_web::http::StatusCode;
use actix_web::{App, HttpRequest, HttpResponse, HttpServer, web};

/// A canned response served at an exact path
#[derive(Clone, Debug)]
pub struct Route {
    pub path: String,
    pub status: u16,
    pub content_type: String,
    pub body: String,
    pub headers: Vec<(String, String)>,
}

impl Route {
    pub fn html(path: &str, body: &str) -> Self {
        Self {
            path: path.to_string(),
            status: 200,
            content_type: "text/html; charset=utf-8".to_string(),
            body: body.to_string(),
            headers: vec![],
        }
    }

    pub fn text(path: &str, content_type: &str, body: &str) -> Self {
        Self {
            content_type: content_type.to_string(),
            ..Self::html(path, body)
        }
    }

    pub fn status(path: &str, status: u16) -> Self {
        Self {
            status,
            ..Self::text(path, "text/plain", "")
        }
    }

    pub fn redirect(path: &str, status: u16, location: &str) -> Self {
        Self::status(path, status).with_header("Location", location)
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }
}

async fn serve(req: HttpRequest, routes: web::Data<Vec<Route>>) -> HttpResponse {
    let Some(route) = routes.iter().find(|r| r.path == req.path()) else {
        return HttpResponse::NotFound().body("Not Found");
    };

    let status = StatusCode::from_u16(route.status).expect("Route status should be valid");
    let mut response = HttpResponse::build(status);
    response.content_type(route.content_type.as_str());
    for (name, value) in &route.headers {
        response.insert_header((name.as_str(), value.as_str()));
    }
    response.body(route.body.clone())
}

/// Starts a server answering `routes` (404 for anything else) and returns its base URL
pub async fn start_server(routes: Vec<Route>) -> String {
    let routes = web::Data::new(routes);
    let http_server = HttpServer::new(move || {
        App::new()
            .app_data(routes.clone())
            .default_service(web::to(serve))
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .expect("Failed to bind test server");

    let addr = http_server
        .addrs()
        .first()
        .cloned()
        .expect("No address bound");
    let url = format!("http://{}", addr);

    let app_server = http_server.run();
    tokio::spawn(async move {
        if let Err(e) = app_server.await {
            eprintln!("Test server error: {}", e);
        }
    });

    url
}

/// A page that exercises most analyzers
pub const GOOD_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <title>Rust Guides</title>
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <meta name="robots" content="index, follow">
  <link rel="canonical" href="/guide">
  <script type="application/ld+json">
  {"@context": "https://schema.org", "@type": "Organization", "name": "Rust Guides", "url": "https://example.com"}
  </script>
</head>
<body>
  <h1>Learning Rust</h1>
  <h2>Ownership</h2>
  <p>Rust is a language. Ownership keeps memory safe. Borrowing lets code share data.</p>
  <img src="/logo.png" alt="Logo">
  <a href="/about">About us</a>
  <a href="/missing">Missing page</a>
  <a href="https://external.invalid/">External site</a>
  <button>Subscribe</button>
</body>
</html>"#;
