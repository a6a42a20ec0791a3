//! HTTP routing for the demo REST API
//!
//! Five routes over `/users`, stateless per request, structured 404 bodies.
//! Handlers take any request body type so tests can drive them in-process
//! without a socket.

use http_body_util::BodyExt;
use http_body_util::Full;
use hyper::Method;
use hyper::Request;
use hyper::Response;
use hyper::StatusCode;
use hyper::body::Body;
use hyper::body::Bytes;

use crudgrid_lib::model::Record;

use crate::store::UserStore;

/// Handles one request and logs the outcome line.
pub async fn handle<B: Body>(req: Request<B>, store: &UserStore) -> Response<Full<Bytes>> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = route(req, store).await;
    log::info!("{} {} -> {}", method, path, response.status().as_u16());
    response
}

async fn route<B: Body>(req: Request<B>, store: &UserStore) -> Response<Full<Bytes>> {
    let method = req.method().clone();
    let path = req.uri().path().trim_end_matches('/').to_string();

    if path == "/users" {
        return match method {
            Method::GET => json_response(StatusCode::OK, &store.list()),
            Method::POST => match read_record(req).await {
                Ok(partial) => json_response(StatusCode::CREATED, &store.create(partial)),
                Err(response) => response,
            },
            _ => not_found(),
        };
    }

    if let Some(id_text) = path.strip_prefix("/users/") {
        // A non-numeric id can't match any user.
        let Ok(id) = id_text.parse::<i64>() else {
            return user_not_found();
        };

        return match method {
            Method::GET => match store.find(id) {
                Some(user) => json_response(StatusCode::OK, &user),
                None => user_not_found(),
            },
            Method::PUT => match read_record(req).await {
                Ok(patch) => match store.update(id, patch) {
                    Some(user) => json_response(StatusCode::OK, &user),
                    None => user_not_found(),
                },
                Err(response) => response,
            },
            Method::DELETE => match store.remove(id) {
                Some(user) => json_response(StatusCode::OK, &user),
                None => user_not_found(),
            },
            _ => not_found(),
        };
    }

    not_found()
}

async fn read_record<B: Body>(req: Request<B>) -> Result<Record, Response<Full<Bytes>>> {
    let bytes = match req.into_body().collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(_) => {
            return Err(message_response(
                StatusCode::BAD_REQUEST,
                "Failed to read request body",
            ));
        }
    };

    serde_json::from_slice(&bytes)
        .map_err(|_| message_response(StatusCode::BAD_REQUEST, "Invalid JSON body"))
}

fn json_response<T: serde::Serialize>(status: StatusCode, body: &T) -> Response<Full<Bytes>> {
    let bytes = serde_json::to_vec(body).unwrap_or_default();
    let mut response = Response::new(Full::new(Bytes::from(bytes)));
    *response.status_mut() = status;
    response.headers_mut().insert(
        hyper::header::CONTENT_TYPE,
        hyper::header::HeaderValue::from_static("application/json"),
    );
    response
}

fn message_response(status: StatusCode, message: &str) -> Response<Full<Bytes>> {
    json_response(status, &serde_json::json!({ "message": message }))
}

fn user_not_found() -> Response<Full<Bytes>> {
    message_response(StatusCode::NOT_FOUND, "User not found")
}

fn not_found() -> Response<Full<Bytes>> {
    message_response(StatusCode::NOT_FOUND, "Not found")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(method: Method, uri: &str, body: &str) -> Request<Full<Bytes>> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Full::new(Bytes::from(body.to_string())))
            .unwrap()
    }

    async fn body_json(response: Response<Full<Bytes>>) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_get_users_returns_seed() {
        let store = UserStore::seeded();

        let response = handle(request(Method::GET, "/users", ""), &store).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["name"], "Jane Smith 1");
    }

    #[tokio::test]
    async fn test_get_user_by_id() {
        let store = UserStore::seeded();

        let response = handle(request(Method::GET, "/users/1", ""), &store).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["id"], 1);
        assert_eq!(body["age"], 30);

        let response = handle(request(Method::GET, "/users/2", ""), &store).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({ "message": "User not found" })
        );
    }

    #[tokio::test]
    async fn test_post_creates_user() {
        let store = UserStore::seeded();

        let response = handle(
            request(Method::POST, "/users", r#"{"name":"Jane Smith 2","age":25}"#),
            &store,
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let body = body_json(response).await;
        assert_eq!(body["id"], 2);
        assert_eq!(body["name"], "Jane Smith 2");
        assert_eq!(body["age"], 25);
        assert_eq!(store.list().len(), 2);
    }

    #[tokio::test]
    async fn test_put_merges_user() {
        let store = UserStore::seeded();

        let response = handle(
            request(Method::PUT, "/users/1", r#"{"age":31}"#),
            &store,
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["age"], 31);
        assert_eq!(body["name"], "Jane Smith 1");

        let response = handle(
            request(Method::PUT, "/users/42", r#"{"age":31}"#),
            &store,
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_returns_deleted_record() {
        let store = UserStore::seeded();

        let response = handle(request(Method::DELETE, "/users/1", ""), &store).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["name"], "Jane Smith 1");
        assert!(store.list().is_empty());
    }

    #[tokio::test]
    async fn test_delete_missing_user_is_404() {
        let store = UserStore::seeded();

        let response = handle(request(Method::DELETE, "/users/999", ""), &store).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({ "message": "User not found" })
        );
    }

    #[tokio::test]
    async fn test_invalid_json_body_is_400() {
        let store = UserStore::seeded();

        let response = handle(request(Method::POST, "/users", "{not json"), &store).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({ "message": "Invalid JSON body" })
        );
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let store = UserStore::seeded();

        let response = handle(request(Method::GET, "/accounts", ""), &store).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({ "message": "Not found" })
        );

        let response = handle(request(Method::PATCH, "/users", ""), &store).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_non_numeric_id_is_404() {
        let store = UserStore::seeded();

        let response = handle(request(Method::GET, "/users/abc", ""), &store).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({ "message": "User not found" })
        );
    }
}
