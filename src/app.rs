use std::net::SocketAddr;

use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::AppConfig;
use crate::state::AppState;
use crate::{directory, labels, pantry, plans, shopping};

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .merge(plans::router())
        .merge(shopping::router())
        .merge(pantry::router())
        .merge(directory::router())
        .merge(labels::router())
        .route("/health", get(|| async { "ok" }))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!("http_request", %method, uri = %uri, status = tracing::field::Empty)
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        let latency_ms = latency.as_millis() as u64;
                        if status.is_server_error() {
                            tracing::error!(%status, latency_ms, "response");
                        } else {
                            tracing::info!(%status, latency_ms, "response");
                        }
                    },
                ),
        )
}

pub async fn serve(app: Router, config: &AppConfig) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
        response::Response,
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;

    async fn send(app: &Router, method: Method, uri: &str, form: Option<&str>) -> Response {
        let mut req = Request::builder().method(method).uri(uri);
        let body = match form {
            Some(f) => {
                req = req.header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
                Body::from(f.to_string())
            }
            None => Body::empty(),
        };
        app.clone().oneshot(req.body(body).unwrap()).await.unwrap()
    }

    async fn json(res: Response) -> Value {
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn add_item(app: &Router, name: &str, category: &str) -> i64 {
        let res = send(
            app,
            Method::POST,
            "/pantry/directory/add",
            Some(&format!("name={name}&category={category}")),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);
        json(res).await["id"].as_i64().unwrap()
    }

    async fn intake(app: &Router, item_id: i64, date: &str) -> Response {
        send(
            app,
            Method::POST,
            "/pantry/intake/add",
            Some(&format!("item_id={item_id}&expiration_date={date}")),
        )
        .await
    }

    #[tokio::test]
    async fn health() {
        let app = build_app(AppState::fake());
        let res = send(&app, Method::GET, "/health", None).await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn directory_add_search_and_lookup() {
        let app = build_app(AppState::fake());
        let id = add_item(&app, "Whole+Milk", "Dairy").await;
        add_item(&app, "Butter", "Dairy").await;

        let res = send(&app, Method::GET, "/pantry/directory/search?q=MILK", None).await;
        let hits = json(res).await;
        assert_eq!(hits.as_array().unwrap().len(), 1);
        assert_eq!(hits[0]["name"], "Whole Milk");
        assert_eq!(hits[0]["id"], id);

        let res = send(&app, Method::GET, "/pantry/directory/search?q=", None).await;
        assert_eq!(json(res).await, serde_json::json!([]));

        let res = send(&app, Method::POST, "/pantry/directory/get_item", Some(&format!("item_id={id}"))).await;
        assert_eq!(json(res).await["name"], "Whole Milk");

        let res = send(&app, Method::POST, "/pantry/directory/get_item", Some("item_id=")).await;
        assert_eq!(json(res).await["name"], Value::Null);

        let res = send(&app, Method::GET, "/pantry/intake", None).await;
        let options = json(res).await;
        assert_eq!(options["items"].as_array().unwrap().len(), 2);
        assert!(options["categories"].as_array().unwrap().contains(&Value::from("Dairy")));
    }

    #[tokio::test]
    async fn directory_add_requires_name_and_category() {
        let app = build_app(AppState::fake());
        let res = send(&app, Method::POST, "/pantry/directory/add", Some("name=Milk")).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json(res).await["code"], "MISSING_PARAMETER");
        let res = send(&app, Method::GET, "/pantry/directory", None).await;
        assert_eq!(json(res).await, serde_json::json!([]));
    }

    #[tokio::test]
    async fn directory_search_matches_the_query_as_typed() {
        let app = build_app(AppState::fake());
        let id = add_item(&app, "Whole+Milk", "Dairy").await;
        add_item(&app, "Butter", "Dairy").await;

        let res = send(&app, Method::GET, "/pantry/directory/search?q=%20", None).await;
        let hits = json(res).await;
        assert_eq!(hits.as_array().unwrap().len(), 1);
        assert_eq!(hits[0]["id"], id);

        let res = send(&app, Method::GET, "/pantry/directory/search?q=milk%20", None).await;
        assert_eq!(json(res).await, serde_json::json!([]));

        let res = send(&app, Method::GET, "/pantry/directory/search?q=e%20m", None).await;
        assert_eq!(json(res).await[0]["name"], "Whole Milk");
    }

    #[tokio::test]
    async fn directory_keeps_names_as_sent() {
        let app = build_app(AppState::fake());
        let id = add_item(&app, "%20Oat+Milk%20", "%20Dairy").await;

        let res = send(&app, Method::POST, "/pantry/directory/get_item", Some(&format!("item_id={id}"))).await;
        assert_eq!(json(res).await["name"], " Oat Milk ");

        let res = send(&app, Method::GET, "/pantry/directory", None).await;
        let items = json(res).await;
        assert_eq!(items[0]["category"], " Dairy");

        let res = send(&app, Method::POST, "/pantry/directory/add", Some("name=%20%20&category=Dairy")).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn intake_flow_and_label() {
        let app = build_app(AppState::fake());
        let milk = add_item(&app, "Milk", "Dairy").await;

        let res = intake(&app, milk, "2025-06-30").await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let location = res.headers()[header::LOCATION].to_str().unwrap().to_string();
        let body = json(res).await;
        let serial = body["serial"].as_i64().unwrap();
        assert_eq!(body["label_url"], location.as_str());

        let res = send(&app, Method::GET, &location, None).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.headers()[header::CONTENT_TYPE], "image/svg+xml");
        let svg = String::from_utf8(to_bytes(res.into_body(), usize::MAX).await.unwrap().to_vec()).unwrap();
        assert!(svg.contains(">Milk</text>"));
        assert!(svg.contains(&format!(">{serial}</text>")));

        let res = send(&app, Method::POST, "/pantry/get_by_serial", Some(&format!("serial={serial}"))).await;
        let entry = json(res).await;
        assert_eq!(entry["name"], "Milk");
        assert_eq!(entry["expiration_date"], "2025-06-30");

        let res = send(&app, Method::POST, "/pantry/get_count", Some(&format!("item_id={milk}"))).await;
        assert_eq!(json(res).await["count"], 1);

        let res = send(&app, Method::POST, "/pantry/delete_oldest_by_id", Some(&format!("item_id={milk}"))).await;
        assert_eq!(res.status(), StatusCode::NO_CONTENT);
        let res = send(&app, Method::GET, "/pantry", None).await;
        assert_eq!(json(res).await, serde_json::json!([]));
    }

    #[tokio::test]
    async fn intake_of_unknown_item_is_rejected() {
        let app = build_app(AppState::fake());
        let res = intake(&app, 1_234_567_890, "2025-06-30").await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert_eq!(json(res).await["code"], "UNKNOWN_ITEM");

        let res = send(&app, Method::GET, "/pantry", None).await;
        assert_eq!(json(res).await, serde_json::json!([]));
    }

    #[tokio::test]
    async fn intake_rejects_bad_dates() {
        let app = build_app(AppState::fake());
        let milk = add_item(&app, "Milk", "Dairy").await;
        let res = intake(&app, milk, "tomorrow").await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json(res).await["code"], "INVALID_PARAMETER");
    }

    #[tokio::test]
    async fn label_for_deleted_item_says_unknown() {
        let app = build_app(AppState::fake());
        let res = send(
            &app,
            Method::GET,
            "/pantry/label/image?serial=1111111111&item_id=2222222222&expiration_date=2025-01-01",
            None,
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let svg = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        assert!(String::from_utf8_lossy(&svg).contains(">Unknown Item</text>"));
    }

    #[tokio::test]
    async fn week_save_merge_and_shopping_list() {
        let app = build_app(AppState::fake());
        let milk = add_item(&app, "Milk", "Dairy").await;
        let foil = add_item(&app, "Foil", "Ingredients").await;
        for date in ["2025-01-01", "2025-01-02"] {
            assert_eq!(intake(&app, milk, date).await.status(), StatusCode::CREATED);
        }

        let first = format!(
            "week=2025-W07&monday_dinner=Pancakes&monday_ingredients%5B%5D={milk}&monday_quantities%5B%5D=3"
        );
        let res = send(&app, Method::POST, "/save_week", Some(&first)).await;
        assert_eq!(res.status(), StatusCode::OK);

        let second = format!(
            "week=2025-W07&tuesday_dinner=Soup&tuesday_ingredients%5B%5D={milk}&tuesday_quantities%5B%5D=2\
             &additional_ingredients%5B%5D={foil}&additional_quantities%5B%5D=1"
        );
        let res = send(&app, Method::POST, "/save_week", Some(&second)).await;
        let merged = json(res).await;
        assert_eq!(merged["week"], "2025-W07");
        assert_eq!(merged["monday_dinner"], "Pancakes");
        assert_eq!(merged["tuesday_dinner"], "Soup");
        assert_eq!(merged["monday_ingredients"][0]["qty"], 3);

        let res = send(&app, Method::GET, "/get_week_items?week=2025-W07", None).await;
        assert_eq!(json(res).await, merged);

        let res = send(&app, Method::GET, "/shopping_list?week=2025-W07", None).await;
        let list = json(res).await;
        assert_eq!(list["buy"], serde_json::json!(["Milk", "Foil"]));
        assert_eq!(list["check"], serde_json::json!(["Milk"]));

        let res = send(&app, Method::GET, "/download_shopping_list?week=2025-W07", None).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.headers()[header::CONTENT_TYPE], "application/pdf");
        assert_eq!(
            res.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"shopping_list_2025-W07.pdf\""
        );
        let pdf = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        assert!(pdf.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn week_endpoints_validate_the_week() {
        let app = build_app(AppState::fake());

        let res = send(&app, Method::POST, "/save_week", Some("monday_dinner=Soup")).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json(res).await["code"], "MISSING_PARAMETER");

        let res = send(&app, Method::GET, "/get_week_items?week=2031-W01", None).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert_eq!(json(res).await["code"], "WEEK_NOT_FOUND");

        let res = send(&app, Method::GET, "/download_shopping_list", None).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let res = send(&app, Method::GET, "/download_shopping_list?week=2031-W01", None).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
