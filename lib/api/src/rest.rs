use actix_cors::Cors;
use actix_web::http::StatusCode;
use actix_web::{web, App, HttpResponse, HttpServer, Result as ActixResult};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};
use tripsim_core::{Catalog, CatalogKind, Error};
use tripsim_similarity::{CombinedQuery, Recommender};

/// Result sizes per endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecommendLimits {
    /// Browse listings
    pub browse: usize,
    /// Single-item nearest neighbours
    pub nearest: usize,
    /// Preference-list recommendations
    pub preferences: usize,
    /// Per catalog, for the combined endpoint
    pub combined: usize,
}

impl Default for RecommendLimits {
    fn default() -> Self {
        Self {
            browse: 50,
            nearest: 10,
            preferences: 50,
            combined: 20,
        }
    }
}

#[derive(Deserialize)]
struct RestaurantQuery {
    mode: Option<String>,
    name: Option<String>,
}

#[derive(Deserialize)]
struct NameQuery {
    name: Option<String>,
}

#[derive(Deserialize)]
struct UserPreferences {
    #[serde(default)]
    user_preferences: Vec<String>,
}

#[derive(Deserialize)]
struct HotelPreferences {
    #[serde(default)]
    hotels: Vec<String>,
}

#[derive(Serialize)]
struct NamedItem {
    name: String,
}

#[derive(Serialize)]
struct CatalogInfo {
    kind: CatalogKind,
    items: usize,
    features: usize,
    columns: Vec<String>,
}

fn catalog_info(kind: CatalogKind, catalog: &Catalog) -> CatalogInfo {
    CatalogInfo {
        kind,
        items: catalog.len(),
        features: catalog.feature_dim(),
        columns: catalog.columns().to_vec(),
    }
}

fn named(names: Vec<String>) -> Vec<NamedItem> {
    names.into_iter().map(|name| NamedItem { name }).collect()
}

fn error_json(status: StatusCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::build(status).json(serde_json::json!({
        "error": message.into()
    }))
}

/// Map a core error to a response; `no_match` is the status used for
/// [`Error::NoMatch`], which differs between endpoints.
fn error_response(err: Error, no_match: StatusCode, no_match_message: &str) -> HttpResponse {
    match err {
        Error::ItemNotFound(_) | Error::UnknownCatalog(_) => {
            error_json(StatusCode::NOT_FOUND, err.to_string())
        }
        Error::NoMatch => error_json(no_match, no_match_message),
        other => {
            warn!("Recommendation failed: {}", other);
            error_json(StatusCode::INTERNAL_SERVER_ERROR, other.to_string())
        }
    }
}

pub struct RestApi;

impl RestApi {
    pub async fn start(
        recommender: Arc<Recommender>,
        limits: RecommendLimits,
        port: u16,
    ) -> std::io::Result<()> {
        HttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600);

            let recommender = recommender.clone();
            let limits = limits.clone();
            App::new()
                .wrap(cors)
                .configure(move |cfg| Self::configure(cfg, recommender, limits))
        })
        .bind(("0.0.0.0", port))?
        .run()
        .await
    }

    /// Register shared state and routes
    pub fn configure(
        cfg: &mut web::ServiceConfig,
        recommender: Arc<Recommender>,
        limits: RecommendLimits,
    ) {
        cfg.app_data(web::Data::new(recommender))
            .app_data(web::Data::new(limits))
            .route("/catalogs", web::get().to(list_catalogs))
            .route("/catalogs/{kind}", web::get().to(get_catalog))
            .route("/api/restaurants", web::get().to(get_restaurants))
            .route("/api/restaurants", web::post().to(recommend_restaurants))
            .route("/api/hotels", web::get().to(get_hotels))
            .route("/api/hotels", web::post().to(recommend_hotels))
            .route("/api/places", web::get().to(get_places))
            .route("/api/places", web::post().to(recommend_places))
            .route("/recommend", web::post().to(recommend_combined));
    }
}

async fn list_catalogs(rec: web::Data<Arc<Recommender>>) -> ActixResult<HttpResponse> {
    let registry = rec.registry();
    let catalogs: Vec<CatalogInfo> = registry
        .kinds()
        .into_iter()
        .filter_map(|kind| registry.get(kind).ok().map(|catalog| catalog_info(kind, catalog)))
        .collect();
    Ok(HttpResponse::Ok().json(catalogs))
}

/// Accepts the same spellings as [`CatalogKind`]'s parser, e.g. `hotels`
async fn get_catalog(
    rec: web::Data<Arc<Recommender>>,
    path: web::Path<String>,
) -> ActixResult<HttpResponse> {
    let result = path
        .parse::<CatalogKind>()
        .and_then(|kind| rec.registry().get(kind).map(|catalog| catalog_info(kind, catalog)));

    Ok(match result {
        Ok(info) => HttpResponse::Ok().json(info),
        Err(e) => error_response(e, StatusCode::NOT_FOUND, ""),
    })
}

/// `?mode=restaurants` lists, `?name=...` finds similar restaurants
async fn get_restaurants(
    rec: web::Data<Arc<Recommender>>,
    limits: web::Data<RecommendLimits>,
    query: web::Query<RestaurantQuery>,
) -> ActixResult<HttpResponse> {
    if query.mode.as_deref() == Some("restaurants") {
        return Ok(match rec.list_items(CatalogKind::Restaurant, limits.browse) {
            Ok(names) => HttpResponse::Ok().json(named(names)),
            Err(e) => error_response(e, StatusCode::NOT_FOUND, ""),
        });
    }

    let Some(name) = query.name.as_deref().map(str::trim).filter(|n| !n.is_empty()) else {
        return Ok(error_json(
            StatusCode::BAD_REQUEST,
            "Provide ?mode=restaurants or ?name=...",
        ));
    };

    Ok(match rec.nearest_neighbors(CatalogKind::Restaurant, name, limits.nearest) {
        Ok(names) => HttpResponse::Ok().json(named(names)),
        Err(Error::ItemNotFound(_)) => error_json(
            StatusCode::NOT_FOUND,
            format!("Restaurant '{}' not found.", name),
        ),
        Err(e) => error_response(e, StatusCode::NOT_FOUND, ""),
    })
}

async fn recommend_restaurants(
    rec: web::Data<Arc<Recommender>>,
    limits: web::Data<RecommendLimits>,
    req: web::Json<UserPreferences>,
) -> ActixResult<HttpResponse> {
    Ok(
        match rec.aggregate_by_voting(CatalogKind::Restaurant, &req.user_preferences, limits.preferences) {
            Ok(names) => HttpResponse::Ok().json(named(names)),
            Err(e) => error_response(e, StatusCode::NOT_FOUND, "No matching restaurants found"),
        },
    )
}

/// `?name=hotels` lists, any other name finds similar hotels
async fn get_hotels(
    rec: web::Data<Arc<Recommender>>,
    limits: web::Data<RecommendLimits>,
    query: web::Query<NameQuery>,
) -> ActixResult<HttpResponse> {
    let Some(name) = query.name.as_deref().filter(|n| !n.is_empty()) else {
        return Ok(error_json(StatusCode::BAD_REQUEST, "Missing 'name' parameter"));
    };

    let result = if name.eq_ignore_ascii_case("hotels") {
        rec.list_items(CatalogKind::Hotel, limits.browse)
    } else {
        rec.nearest_neighbors(CatalogKind::Hotel, name, limits.nearest)
    };

    Ok(match result {
        Ok(names) => HttpResponse::Ok().json(named(names)),
        Err(Error::ItemNotFound(_)) => {
            error_json(StatusCode::NOT_FOUND, format!("Hotel '{}' not found.", name))
        }
        Err(e) => error_response(e, StatusCode::NOT_FOUND, ""),
    })
}

async fn recommend_hotels(
    rec: web::Data<Arc<Recommender>>,
    limits: web::Data<RecommendLimits>,
    req: web::Json<HotelPreferences>,
) -> ActixResult<HttpResponse> {
    Ok(
        match rec.aggregate_by_voting(CatalogKind::Hotel, &req.hotels, limits.preferences) {
            Ok(names) => HttpResponse::Ok().json(named(names)),
            Err(e) => error_response(e, StatusCode::NOT_FOUND, "No valid hotel names found"),
        },
    )
}

/// `?name=places` lists; any other name finds similar places
async fn get_places(
    rec: web::Data<Arc<Recommender>>,
    limits: web::Data<RecommendLimits>,
    query: web::Query<NameQuery>,
) -> ActixResult<HttpResponse> {
    let name = query.name.as_deref().unwrap_or_default();

    if name.eq_ignore_ascii_case("places") {
        return Ok(match rec.list_items(CatalogKind::Place, limits.browse) {
            Ok(names) => HttpResponse::Ok().json(named(names)),
            Err(e) => error_response(e, StatusCode::NOT_FOUND, ""),
        });
    }

    Ok(match rec.nearest_neighbors(CatalogKind::Place, name, limits.nearest) {
        Ok(names) => HttpResponse::Ok().json(serde_json::json!({
            "results": named(names)
        })),
        Err(Error::ItemNotFound(_)) => {
            error_json(StatusCode::NOT_FOUND, format!("Place '{}' not found.", name))
        }
        Err(e) => error_response(e, StatusCode::NOT_FOUND, ""),
    })
}

async fn recommend_places(
    rec: web::Data<Arc<Recommender>>,
    limits: web::Data<RecommendLimits>,
    req: web::Json<UserPreferences>,
) -> ActixResult<HttpResponse> {
    Ok(
        match rec.aggregate_by_centroid(CatalogKind::Place, &req.user_preferences, limits.preferences) {
            Ok(names) => HttpResponse::Ok().json(serde_json::json!({
                "results": named(names)
            })),
            Err(e) => error_response(e, StatusCode::BAD_REQUEST, "No valid places found"),
        },
    )
}

async fn recommend_combined(
    rec: web::Data<Arc<Recommender>>,
    limits: web::Data<RecommendLimits>,
    req: web::Json<CombinedQuery>,
) -> ActixResult<HttpResponse> {
    info!(
        "Combined recommendation: {} hotels, {} restaurants, {} places",
        req.hotels.len(),
        req.restaurants.len(),
        req.tourist_places.len()
    );
    Ok(match rec.combined(&req, limits.combined) {
        Ok(result) => HttpResponse::Ok().json(result),
        Err(e) => error_response(e, StatusCode::BAD_REQUEST, ""),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test;
    use serde_json::{json, Value};
    use tripsim_core::{CatalogRegistry, FeatureStore, RawRow};

    fn recommender() -> Arc<Recommender> {
        let restaurants = FeatureStore::new()
            .build(vec![
                RawRow::dense("Felfela", &[4.5, 1.5, 2.5]),
                RawRow::dense("Zooba", &[4.6, 1.2, 2.8]),
                RawRow::dense("Sequoia", &[4.2, 4.0, 0.5]),
                RawRow::dense("Kazouza", &[4.1, 3.8, 0.7]),
            ])
            .unwrap();
        let hotels = FeatureStore::new()
            .build(vec![
                RawRow::dense("Mena House", &[5.0, 300.0]),
                RawRow::dense("Steigenberger", &[4.5, 180.0]),
                RawRow::dense("Ibis", &[3.0, 60.0]),
            ])
            .unwrap();
        let places = FeatureStore::new()
            .build(vec![
                RawRow::dense("Pyramids", &[1.0, 0.0, 1.0]),
                RawRow::dense("Egyptian Museum", &[1.0, 1.0, 0.0]),
                RawRow::dense("Khan el-Khalili", &[0.0, 1.0, 1.0]),
            ])
            .unwrap();
        let registry = CatalogRegistry::builder()
            .insert(CatalogKind::Restaurant, restaurants)
            .insert(CatalogKind::Hotel, hotels)
            .insert(CatalogKind::Place, places)
            .build();
        Arc::new(Recommender::new(Arc::new(registry)))
    }

    macro_rules! app {
        () => {
            test::init_service(App::new().configure(|cfg| {
                RestApi::configure(cfg, recommender(), RecommendLimits::default())
            }))
            .await
        };
    }

    #[actix_web::test]
    async fn test_browse_restaurants() {
        let app = app!();
        let req = test::TestRequest::get()
            .uri("/api/restaurants?mode=restaurants")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(
            body,
            json!([
                {"name": "Felfela"},
                {"name": "Zooba"},
                {"name": "Sequoia"},
                {"name": "Kazouza"}
            ])
        );
    }

    #[actix_web::test]
    async fn test_similar_restaurants() {
        let app = app!();
        let req = test::TestRequest::get()
            .uri("/api/restaurants?name=%20Felfela")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let names: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|item| item["name"].as_str().unwrap())
            .collect();
        assert_eq!(names.len(), 3);
        assert_eq!(names[0], "Zooba");
        assert!(!names.contains(&"Felfela"));
    }

    #[actix_web::test]
    async fn test_restaurant_errors() {
        let app = app!();

        let req = test::TestRequest::get().uri("/api/restaurants").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::get()
            .uri("/api/restaurants?name=Nowhere")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::post()
            .uri("/api/restaurants")
            .set_json(json!({"user_preferences": ["Nowhere"]}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_hotel_preferences() {
        let app = app!();
        let req = test::TestRequest::post()
            .uri("/api/hotels")
            .set_json(json!({"hotels": ["Mena House"]}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!([{"name": "Steigenberger"}, {"name": "Ibis"}]));

        let req = test::TestRequest::get().uri("/api/hotels").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::get().uri("/api/hotels?name=Hotels").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.as_array().unwrap().len(), 3);
    }

    #[actix_web::test]
    async fn test_place_endpoints() {
        let app = app!();

        let req = test::TestRequest::get()
            .uri("/api/places?name=Pyramids")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["results"].as_array().unwrap().len(), 2);

        let req = test::TestRequest::post()
            .uri("/api/places")
            .set_json(json!({"user_preferences": ["Pyramids"]}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let results = body["results"].as_array().unwrap();
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|item| item["name"] != "Pyramids"));

        // Centroid aggregation reports an unmatched list as a bad request
        let req = test::TestRequest::post()
            .uri("/api/places")
            .set_json(json!({"user_preferences": ["Atlantis"]}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::get().uri("/api/places").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_combined_falls_back_when_nothing_matches() {
        let app = app!();
        let req = test::TestRequest::post()
            .uri("/recommend")
            .set_json(json!({
                "hotels": ["Atlantis Resort"],
                "restaurants": ["Sequoia"]
            }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["hotels"], json!(["Mena House", "Steigenberger", "Ibis"]));
        assert_eq!(body["restaurants"][0], "Kazouza");
        assert_eq!(body["restaurants"].as_array().unwrap().len(), 3);
        assert_eq!(
            body["tourist_places"],
            json!(["Pyramids", "Egyptian Museum", "Khan el-Khalili"])
        );
    }

    #[actix_web::test]
    async fn test_list_catalogs() {
        let app = app!();
        let req = test::TestRequest::get().uri("/catalogs").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body[0]["kind"], "restaurant");
        assert_eq!(body[0]["items"], 4);
        assert_eq!(body[1]["features"], 2);
    }

    #[actix_web::test]
    async fn test_catalog_by_kind() {
        let app = app!();
        let req = test::TestRequest::get().uri("/catalogs/tourist_places").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["kind"], "place");
        assert_eq!(body["items"], 3);

        let req = test::TestRequest::get().uri("/catalogs/spaceships").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
