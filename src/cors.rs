use axum::{
  http::{header, HeaderValue, Method, Request, StatusCode},
  middleware::Next,
  response::{IntoResponse, Response},
};

/// Open CORS on every response; preflights are answered right here.
pub async fn open_cors<B>(req: Request<B>, next: Next<B>) -> Response {
  let mut resp = if req.method() == Method::OPTIONS {
    StatusCode::NO_CONTENT.into_response()
  } else {
    next.run(req).await
  };

  let headers = resp.headers_mut();
  headers.insert(
    header::ACCESS_CONTROL_ALLOW_ORIGIN,
    HeaderValue::from_static("*"),
  );
  headers.insert(
    header::ACCESS_CONTROL_ALLOW_METHODS,
    HeaderValue::from_static("GET, OPTIONS"),
  );
  headers.insert(
    header::ACCESS_CONTROL_ALLOW_HEADERS,
    HeaderValue::from_static("Content-Type"),
  );

  resp
}
