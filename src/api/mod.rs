use axum::{
    Router,
    extract::{
        Json, Query,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::core::{
    DEFAULT_AMORTIZATION_YEARS, DEFAULT_HISTOGRAM_BINS, DEFAULT_HORIZON_YEARS,
    DEFAULT_SIMULATIONS, HistogramBin, MetricsSummary, SimulationInput, SimulationTrialRow,
    YearBand, cash_flow_histogram, compute_monthly_payment, run_simulation, summarize,
    year_bands,
};

const MAX_SIMULATIONS: u32 = 100_000;
const MAX_HORIZON_YEARS: u32 = 50;
const MAX_HISTOGRAM_BINS: u32 = 200;
const MAX_AMORTIZATION_YEARS: u32 = 50;

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SimulatePayload {
    price: Option<f64>,
    rent: Option<f64>,
    down_pct: Option<f64>,
    annual_rate: Option<f64>,
    strata_fee: Option<f64>,
    property_tax: Option<f64>,
    vacancy_pct: Option<f64>,
    simulations: Option<u32>,
    horizon_years: Option<u32>,
    seed: Option<u64>,
    histogram_bins: Option<u32>,
    include_rows: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MortgageQuery {
    principal: f64,
    annual_rate: f64,
    amortization_years: Option<u32>,
}

#[derive(Parser, Debug)]
#[command(
    name = "dwellwell",
    about = "Monte Carlo cash flow and equity estimator for a residential property purchase"
)]
struct Cli {
    #[arg(long, help = "Purchase price in whole currency units")]
    price: f64,
    #[arg(long, help = "Expected monthly rent")]
    rent: f64,
    #[arg(long, default_value_t = 20.0, help = "Down payment in percent")]
    down_pct: f64,
    #[arg(long, default_value_t = 5.0, help = "Annual mortgage rate in percent")]
    annual_rate: f64,
    #[arg(long, default_value_t = 0.0, help = "Monthly strata fee")]
    strata_fee: f64,
    #[arg(long, default_value_t = 0.0, help = "Annual property tax")]
    property_tax: f64,
    #[arg(long, default_value_t = 2.0, help = "Vacancy rate in percent")]
    vacancy_pct: f64,
    #[arg(long, default_value_t = DEFAULT_SIMULATIONS)]
    simulations: u32,
    #[arg(long, default_value_t = DEFAULT_HORIZON_YEARS)]
    horizon_years: u32,
    #[arg(long, help = "Fixed seed for reproducible runs; random when omitted")]
    seed: Option<u64>,
    #[arg(long, default_value_t = DEFAULT_HISTOGRAM_BINS)]
    histogram_bins: u32,
    #[arg(long, default_value_t = false, help = "Include every trial-year row in the output")]
    include_rows: bool,
}

#[derive(Debug)]
struct ApiRequest {
    inputs: SimulationInput,
    histogram_bins: u32,
    include_rows: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SimulateResponse {
    monthly_mortgage: f64,
    seed: u64,
    simulations: u32,
    horizon_years: u32,
    metrics: MetricsSummary,
    year_bands: Vec<YearBand>,
    cash_flow_histogram: Vec<HistogramBin>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rows: Option<Vec<SimulationTrialRow>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MortgageResponse {
    principal: f64,
    annual_rate: f64,
    amortization_years: u32,
    monthly_payment: f64,
    monthly_payment_cents: i64,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

fn build_inputs(cli: Cli) -> Result<ApiRequest, String> {
    if cli.simulations == 0 {
        return Err("--simulations must be > 0".to_string());
    }
    if cli.simulations > MAX_SIMULATIONS {
        return Err(format!("--simulations must be <= {MAX_SIMULATIONS}"));
    }

    if cli.horizon_years == 0 {
        return Err("--horizon-years must be > 0".to_string());
    }
    if cli.horizon_years > MAX_HORIZON_YEARS {
        return Err(format!("--horizon-years must be <= {MAX_HORIZON_YEARS}"));
    }

    if !(1..=MAX_HISTOGRAM_BINS).contains(&cli.histogram_bins) {
        return Err(format!(
            "--histogram-bins must be between 1 and {MAX_HISTOGRAM_BINS}"
        ));
    }

    if !(0.0..=100.0).contains(&cli.down_pct) {
        return Err("--down-pct must be between 0 and 100".to_string());
    }

    if !(0.0..=100.0).contains(&cli.vacancy_pct) {
        return Err("--vacancy-pct must be between 0 and 100".to_string());
    }

    Ok(ApiRequest {
        inputs: SimulationInput {
            price: cli.price,
            rent: cli.rent,
            down_pct: cli.down_pct,
            annual_rate: cli.annual_rate,
            strata_fee: cli.strata_fee,
            property_tax: cli.property_tax,
            vacancy_pct: cli.vacancy_pct,
            n_sim: cli.simulations,
            horizon_years: cli.horizon_years,
            seed: cli.seed,
            ..SimulationInput::default()
        },
        histogram_bins: cli.histogram_bins,
        include_rows: cli.include_rows,
    })
}

fn default_cli_for_api() -> Cli {
    Cli {
        price: 500_000.0,
        rent: 2_000.0,
        down_pct: 20.0,
        annual_rate: 5.0,
        strata_fee: 0.0,
        property_tax: 0.0,
        vacancy_pct: 2.0,
        simulations: DEFAULT_SIMULATIONS,
        horizon_years: DEFAULT_HORIZON_YEARS,
        seed: None,
        histogram_bins: DEFAULT_HISTOGRAM_BINS,
        include_rows: false,
    }
}

#[cfg(test)]
fn api_request_from_json(json: &str) -> Result<ApiRequest, String> {
    let payload = serde_json::from_str::<SimulatePayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    api_request_from_payload(payload)
}

fn api_request_from_payload(payload: SimulatePayload) -> Result<ApiRequest, String> {
    let mut cli = default_cli_for_api();

    if let Some(v) = payload.price {
        cli.price = v;
    }
    if let Some(v) = payload.rent {
        cli.rent = v;
    }
    if let Some(v) = payload.down_pct {
        cli.down_pct = v;
    }
    if let Some(v) = payload.annual_rate {
        cli.annual_rate = v;
    }
    if let Some(v) = payload.strata_fee {
        cli.strata_fee = v;
    }
    if let Some(v) = payload.property_tax {
        cli.property_tax = v;
    }
    if let Some(v) = payload.vacancy_pct {
        cli.vacancy_pct = v;
    }
    if let Some(v) = payload.simulations {
        cli.simulations = v;
    }
    if let Some(v) = payload.horizon_years {
        cli.horizon_years = v;
    }
    if payload.seed.is_some() {
        cli.seed = payload.seed;
    }
    if let Some(v) = payload.histogram_bins {
        cli.histogram_bins = v;
    }
    if let Some(v) = payload.include_rows {
        cli.include_rows = v;
    }

    build_inputs(cli)
}

fn run_request(request: ApiRequest) -> Result<SimulateResponse, String> {
    let output = run_simulation(&request.inputs).map_err(|e| e.to_string())?;
    let metrics = summarize(&output.rows, output.monthly_payment).map_err(|e| e.to_string())?;
    let bands = year_bands(&output.rows).map_err(|e| e.to_string())?;
    let histogram =
        cash_flow_histogram(&output.rows, request.histogram_bins).map_err(|e| e.to_string())?;

    Ok(SimulateResponse {
        monthly_mortgage: output.monthly_payment,
        seed: output.seed,
        simulations: request.inputs.n_sim,
        horizon_years: output.horizon_years,
        metrics,
        year_bands: bands,
        cash_flow_histogram: histogram,
        rows: request.include_rows.then_some(output.rows),
    })
}

fn mortgage_response(query: MortgageQuery) -> Result<MortgageResponse, String> {
    if !query.principal.is_finite() || query.principal < 0.0 {
        return Err("principal must be >= 0".to_string());
    }
    let amortization_years = query.amortization_years.unwrap_or(DEFAULT_AMORTIZATION_YEARS);
    if amortization_years > MAX_AMORTIZATION_YEARS {
        return Err(format!(
            "amortizationYears must be <= {MAX_AMORTIZATION_YEARS}"
        ));
    }
    let principal_cents = (query.principal * 100.0).round_ties_even() as i64;
    let cents = compute_monthly_payment(principal_cents, query.annual_rate, amortization_years)
        .map_err(|e| e.to_string())?;

    Ok(MortgageResponse {
        principal: query.principal,
        annual_rate: query.annual_rate,
        amortization_years,
        monthly_payment: cents as f64 / 100.0,
        monthly_payment_cents: cents,
    })
}

/// Parse process arguments, run one simulation and render it as pretty JSON.
pub fn run_cli() -> Result<String, String> {
    let request = build_inputs(Cli::parse())?;
    let response = run_request(request)?;
    serde_json::to_string_pretty(&response).map_err(|e| format!("Failed to encode output: {e}"))
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "property simulation HTTP API listening");

    axum::serve(listener, router()).await
}

fn router() -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/mortgage", get(mortgage_handler))
        .route(
            "/api/simulate",
            get(simulate_get_handler).post(simulate_post_handler),
        )
        .fallback(not_found_handler)
}

async fn health_handler() -> Response {
    json_response(StatusCode::OK, serde_json::json!({ "status": "ok" }))
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn mortgage_handler(query: Result<Query<MortgageQuery>, QueryRejection>) -> Response {
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return error_response(rejection.status(), &rejection.body_text()),
    };
    match mortgage_response(query) {
        Ok(body) => json_response(StatusCode::OK, body),
        Err(msg) => error_response(StatusCode::BAD_REQUEST, &msg),
    }
}

async fn simulate_get_handler(
    payload: Result<Query<SimulatePayload>, QueryRejection>,
) -> Response {
    match payload {
        Ok(Query(payload)) => simulate_handler_impl(payload).await,
        Err(rejection) => error_response(rejection.status(), &rejection.body_text()),
    }
}

async fn simulate_post_handler(payload: Result<Json<SimulatePayload>, JsonRejection>) -> Response {
    match payload {
        Ok(Json(payload)) => simulate_handler_impl(payload).await,
        Err(rejection) => error_response(rejection.status(), &rejection.body_text()),
    }
}

async fn simulate_handler_impl(payload: SimulatePayload) -> Response {
    let request = match api_request_from_payload(payload) {
        Ok(request) => request,
        Err(msg) => return error_response(StatusCode::BAD_REQUEST, &msg),
    };

    info!(
        simulations = request.inputs.n_sim,
        horizon_years = request.inputs.horizon_years,
        "simulate request"
    );

    let result = tokio::task::spawn_blocking(move || run_request(request)).await;
    match result {
        Ok(Ok(response)) => json_response(StatusCode::OK, response),
        Ok(Err(msg)) => error_response(StatusCode::BAD_REQUEST, &msg),
        Err(e) => {
            warn!(error = %e, "simulation task failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Simulation failed")
        }
    }
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn sample_cli() -> Cli {
        Cli {
            strata_fee: 300.0,
            property_tax: 2_000.0,
            simulations: 100,
            horizon_years: 5,
            seed: Some(0),
            ..default_cli_for_api()
        }
    }

    #[test]
    fn cli_parses_flags_and_applies_defaults() {
        let cli = Cli::try_parse_from([
            "dwellwell",
            "--price",
            "650000",
            "--rent",
            "2400",
            "--strata-fee",
            "350",
            "--seed",
            "7",
        ])
        .expect("valid flags");

        assert_approx(cli.price, 650_000.0);
        assert_approx(cli.rent, 2_400.0);
        assert_approx(cli.strata_fee, 350.0);
        assert_approx(cli.down_pct, 20.0);
        assert_approx(cli.annual_rate, 5.0);
        assert_approx(cli.vacancy_pct, 2.0);
        assert_eq!(cli.simulations, 1_000);
        assert_eq!(cli.horizon_years, 10);
        assert_eq!(cli.seed, Some(7));
        assert!(!cli.include_rows);
    }

    #[test]
    fn cli_requires_price_and_rent() {
        assert!(Cli::try_parse_from(["dwellwell", "--rent", "2000"]).is_err());
        assert!(Cli::try_parse_from(["dwellwell", "--price", "500000"]).is_err());
    }

    #[test]
    fn build_inputs_rejects_out_of_range_counts() {
        let mut cli = sample_cli();
        cli.simulations = 0;
        let err = build_inputs(cli).expect_err("zero simulations");
        assert!(err.contains("--simulations"));

        let mut cli = sample_cli();
        cli.horizon_years = MAX_HORIZON_YEARS + 1;
        let err = build_inputs(cli).expect_err("horizon too long");
        assert!(err.contains("--horizon-years"));

        let mut cli = sample_cli();
        cli.histogram_bins = 0;
        let err = build_inputs(cli).expect_err("no bins");
        assert!(err.contains("--histogram-bins"));
    }

    #[test]
    fn build_inputs_rejects_bad_percentages() {
        let mut cli = sample_cli();
        cli.down_pct = 101.0;
        let err = build_inputs(cli).expect_err("down payment over 100%");
        assert!(err.contains("--down-pct"));

        let mut cli = sample_cli();
        cli.vacancy_pct = -1.0;
        let err = build_inputs(cli).expect_err("negative vacancy");
        assert!(err.contains("--vacancy-pct"));
    }

    #[test]
    fn api_request_from_json_parses_web_keys() {
        let json = r#"{
          "price": 725000,
          "rent": 2850,
          "downPct": 25,
          "annualRate": 4.75,
          "strataFee": 410,
          "propertyTax": 3100,
          "vacancyPct": 3.5,
          "simulations": 250,
          "horizonYears": 15,
          "seed": 11,
          "histogramBins": 20,
          "includeRows": true
        }"#;
        let request = api_request_from_json(json).expect("json should parse");
        let inputs = request.inputs;

        assert_approx(inputs.price, 725_000.0);
        assert_approx(inputs.rent, 2_850.0);
        assert_approx(inputs.down_pct, 25.0);
        assert_approx(inputs.annual_rate, 4.75);
        assert_approx(inputs.strata_fee, 410.0);
        assert_approx(inputs.property_tax, 3_100.0);
        assert_approx(inputs.vacancy_pct, 3.5);
        assert_eq!(inputs.n_sim, 250);
        assert_eq!(inputs.horizon_years, 15);
        assert_eq!(inputs.seed, Some(11));
        assert_eq!(request.histogram_bins, 20);
        assert!(request.include_rows);
    }

    #[test]
    fn api_request_from_empty_json_uses_defaults() {
        let request = api_request_from_json("{}").expect("json should parse");
        assert_approx(request.inputs.price, 500_000.0);
        assert_eq!(request.inputs.n_sim, DEFAULT_SIMULATIONS);
        assert_eq!(request.inputs.horizon_years, DEFAULT_HORIZON_YEARS);
        assert_eq!(request.inputs.seed, None);
        assert_eq!(request.histogram_bins, DEFAULT_HISTOGRAM_BINS);
        assert!(!request.include_rows);
    }

    #[test]
    fn api_request_from_json_rejects_malformed_payload() {
        let err = api_request_from_json(r#"{"price": "lots"}"#).expect_err("bad type");
        assert!(err.contains("Invalid API JSON payload"));
    }

    #[test]
    fn negative_price_surfaces_core_validation_error() {
        let mut cli = sample_cli();
        cli.price = -10.0;
        let request = build_inputs(cli).expect("count checks pass");
        let err = run_request(request).expect_err("negative price");
        assert!(err.contains("price"), "{err}");
    }

    #[test]
    fn simulate_response_serialization_contains_expected_fields() {
        let request = build_inputs(sample_cli()).expect("valid inputs");
        let response = run_request(request).expect("simulation runs");
        let json = serde_json::to_value(&response).expect("serializable");

        assert_approx(json["monthlyMortgage"].as_f64().expect("number"), 2_338.36);
        assert_eq!(json["seed"], 0);
        assert_eq!(json["simulations"], 100);
        assert_eq!(json["horizonYears"], 5);
        assert!(json.get("rows").is_none());

        let metrics = json["metrics"].as_object().expect("metrics object");
        assert_eq!(metrics.len(), 5);
        for key in [
            "monthly_mortgage",
            "p50_cash_flow",
            "p10_cash_flow",
            "p90_cash_flow",
            "p50_equity_year10",
        ] {
            assert!(metrics[key].is_number(), "missing {key}");
        }

        assert_eq!(json["yearBands"].as_array().expect("bands").len(), 5);
        assert!(json["yearBands"][0].get("p50Equity").is_some());
        let histogram = json["cashFlowHistogram"].as_array().expect("histogram");
        let total: u64 = histogram
            .iter()
            .map(|b| b["count"].as_u64().expect("count"))
            .sum();
        assert_eq!(total, 100);
    }

    #[test]
    fn include_rows_returns_every_trial_year() {
        let mut cli = sample_cli();
        cli.include_rows = true;
        let response = run_request(build_inputs(cli).expect("valid inputs")).expect("runs");
        let rows = response.rows.expect("rows requested");
        assert_eq!(rows.len(), 500);

        let json = serde_json::to_value(rows[0]).expect("serializable");
        for key in ["year", "trial", "net_cash_flow", "equity", "cumulative_cf"] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
    }

    #[test]
    fn seeded_requests_are_reproducible() {
        let a = run_request(build_inputs(sample_cli()).expect("valid")).expect("runs");
        let b = run_request(build_inputs(sample_cli()).expect("valid")).expect("runs");
        assert_eq!(a.metrics, b.metrics);
        assert_eq!(a.year_bands, b.year_bands);
    }

    #[test]
    fn mortgage_response_reports_cents_and_units() {
        let response = mortgage_response(MortgageQuery {
            principal: 400_000.0,
            annual_rate: 5.0,
            amortization_years: None,
        })
        .expect("valid loan");
        assert_eq!(response.amortization_years, 25);
        assert_eq!(response.monthly_payment_cents, 233_836);
        assert_approx(response.monthly_payment, 2_338.36);
    }

    #[test]
    fn mortgage_response_rejects_zero_term_and_negative_principal() {
        let err = mortgage_response(MortgageQuery {
            principal: 400_000.0,
            annual_rate: 5.0,
            amortization_years: Some(0),
        })
        .expect_err("zero term");
        assert!(err.contains("zero months"), "{err}");

        let err = mortgage_response(MortgageQuery {
            principal: -1.0,
            annual_rate: 5.0,
            amortization_years: None,
        })
        .expect_err("negative principal");
        assert!(err.contains("principal"));
    }

    #[test]
    fn mortgage_query_parses_camel_case_keys() {
        let query: MortgageQuery = serde_json::from_str(
            r#"{"principal": 300000, "annualRate": 4.2, "amortizationYears": 30}"#,
        )
        .expect("valid query");
        assert_eq!(query.amortization_years, Some(30));
        assert_approx(query.annual_rate, 4.2);
    }

    #[test]
    fn mortgage_response_caps_amortization_term() {
        let err = mortgage_response(MortgageQuery {
            principal: 400_000.0,
            annual_rate: 5.0,
            amortization_years: Some(20_000),
        })
        .expect_err("term too long");
        assert!(err.contains("amortizationYears"), "{err}");

        let longest = mortgage_response(MortgageQuery {
            principal: 400_000.0,
            annual_rate: 5.0,
            amortization_years: Some(MAX_AMORTIZATION_YEARS),
        })
        .expect("longest allowed term");
        assert!(longest.monthly_payment_cents > 0);
    }

    mod routes {
        use super::*;
        use axum::body::{Body, to_bytes};
        use axum::http::Request;
        use tower::ServiceExt;

        async fn send(request: Request<Body>) -> (StatusCode, Option<String>, serde_json::Value) {
            let response = router().oneshot(request).await.expect("router is infallible");
            let status = response.status();
            let cache_control = response
                .headers()
                .get(header::CACHE_CONTROL)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            let bytes = to_bytes(response.into_body(), usize::MAX)
                .await
                .expect("readable body");
            let json = serde_json::from_slice(&bytes).expect("json body");
            (status, cache_control, json)
        }

        fn get_request(uri: &str) -> Request<Body> {
            Request::builder()
                .uri(uri)
                .body(Body::empty())
                .expect("valid request")
        }

        fn post_json(uri: &str, body: &str) -> Request<Body> {
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .expect("valid request")
        }

        #[tokio::test]
        async fn health_reports_ok() {
            let (status, cache_control, json) = send(get_request("/health")).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(cache_control.as_deref(), Some("no-store"));
            assert_eq!(json["status"], "ok");
        }

        #[tokio::test]
        async fn simulate_get_parses_query_string() {
            let (status, cache_control, json) = send(get_request(
                "/api/simulate?price=500000&rent=2000&strataFee=300&propertyTax=2000\
                 &simulations=50&horizonYears=4&seed=3&includeRows=true",
            ))
            .await;

            assert_eq!(status, StatusCode::OK);
            assert_eq!(cache_control.as_deref(), Some("no-store"));
            assert_eq!(json["simulations"], 50);
            assert_eq!(json["horizonYears"], 4);
            assert_eq!(json["seed"], 3);
            assert_eq!(json["rows"].as_array().expect("rows").len(), 200);
            assert_approx(json["monthlyMortgage"].as_f64().expect("number"), 2_338.36);
        }

        #[tokio::test]
        async fn simulate_post_accepts_json_body() {
            let (status, _, json) = send(post_json(
                "/api/simulate",
                r#"{"price": 600000, "rent": 2500, "simulations": 20, "horizonYears": 3, "seed": 9}"#,
            ))
            .await;

            assert_eq!(status, StatusCode::OK);
            assert_eq!(json["yearBands"].as_array().expect("bands").len(), 3);
            assert!(json.get("rows").is_none());
            assert_eq!(json["metrics"].as_object().expect("metrics").len(), 5);
        }

        #[tokio::test]
        async fn simulate_rejects_zero_simulations_with_json_400() {
            let (status, cache_control, json) =
                send(get_request("/api/simulate?simulations=0")).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(cache_control.as_deref(), Some("no-store"));
            assert!(
                json["error"].as_str().expect("message").contains("--simulations"),
                "{json}"
            );
        }

        #[tokio::test]
        async fn malformed_payloads_get_json_errors() {
            let (status, _, json) = send(post_json("/api/simulate", "{not json")).await;
            assert!(status.is_client_error(), "{status}");
            assert!(json["error"].is_string(), "{json}");

            let (status, _, json) = send(get_request("/api/simulate?price=lots")).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert!(json["error"].is_string(), "{json}");

            let (status, _, json) = send(get_request("/api/mortgage?annualRate=5")).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert!(json["error"].is_string(), "{json}");
        }

        #[tokio::test]
        async fn mortgage_endpoint_returns_payment_and_caps_term() {
            let (status, _, json) =
                send(get_request("/api/mortgage?principal=400000&annualRate=5")).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(json["monthlyPaymentCents"], 233_836);

            let (status, _, json) = send(get_request(
                "/api/mortgage?principal=400000&annualRate=5&amortizationYears=20000",
            ))
            .await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert!(json["error"].as_str().expect("message").contains("amortizationYears"));
        }

        #[tokio::test]
        async fn unknown_routes_get_json_404() {
            let (status, cache_control, json) = send(get_request("/nope")).await;
            assert_eq!(status, StatusCode::NOT_FOUND);
            assert_eq!(cache_control.as_deref(), Some("no-store"));
            assert_eq!(json["error"], "Not found");
        }
    }
}
