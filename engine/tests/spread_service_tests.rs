use std::sync::Arc;

use chrono::{Days, NaiveDate};
use corelib::{PricePoint, Signal};
use engine::{AnalysisError, AnalysisParams, AnalysisRequest, SignalSummary, SpreadService};

use mock_provider::MockProvider;

fn day(n: u64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2021, 1, 1).unwrap() + Days::new(n)
}

fn points(offset: u64, prices: &[f64]) -> Vec<PricePoint> {
    prices
        .iter()
        .enumerate()
        .map(|(i, &p)| PricePoint::new(day(offset + i as u64), p))
        .collect()
}

fn request(params: AnalysisParams) -> AnalysisRequest {
    AnalysisRequest::new("AAA", "BBB", day(0), day(365)).with_params(params)
}

async fn service_with(a: Vec<PricePoint>, b: Vec<PricePoint>) -> (SpreadService, MockProvider) {
    let provider = MockProvider::new();
    provider.insert("AAA", a).await;
    provider.insert("BBB", b).await;

    (SpreadService::new(Arc::new(provider.clone())), provider)
}

#[tokio::test]
async fn runs_full_pipeline_over_provider_data() {
    let mut a = vec![10.0; 30];
    a.push(20.0);
    let (svc, provider) = service_with(points(0, &a), points(0, &[0.0; 31])).await;

    let records = svc.run(&request(AnalysisParams::default())).await.unwrap();

    assert_eq!(provider.call_count(), 2);
    assert_eq!(records.len(), 31);
    assert_eq!(records.last().unwrap().signal, Signal::Sell);

    let summary = SignalSummary::from_records(&records);
    assert_eq!(summary.warm_up, 29);
    assert_eq!(summary.sells(), 1);
    assert_eq!(summary.buys(), 0);
}

#[tokio::test]
async fn partial_overlap_is_joined_on_shared_dates() {
    // A covers days 0..50, B covers days 20..80: 30 shared days.
    let a: Vec<f64> = (0..50).map(|i| 100.0 + i as f64).collect();
    let b: Vec<f64> = (0..60).map(|i| 50.0 + (i % 3) as f64).collect();
    let (svc, _) = service_with(points(0, &a), points(20, &b)).await;

    let records = svc.run(&request(AnalysisParams::new(10, 2.0, -2.0))).await.unwrap();

    assert_eq!(records.len(), 30);
    assert_eq!(records.first().unwrap().date, day(20));
    assert_eq!(records.last().unwrap().date, day(49));
    assert!(records.windows(2).all(|w| w[0].date < w[1].date));
}

#[tokio::test]
async fn disjoint_history_is_insufficient_data() {
    let (svc, _) = service_with(points(0, &[1.0; 10]), points(100, &[1.0; 10])).await;

    let err = svc.run(&request(AnalysisParams::default())).await.unwrap_err();
    assert!(matches!(err, AnalysisError::InsufficientData { .. }));
}

#[tokio::test]
async fn unknown_ticker_is_insufficient_data_not_a_crash() {
    let provider = MockProvider::new();
    provider.insert("AAA", points(0, &[1.0; 10])).await;
    let svc = SpreadService::new(Arc::new(provider));

    let err = svc.run(&request(AnalysisParams::default())).await.unwrap_err();
    assert!(matches!(err, AnalysisError::InsufficientData { .. }));
}

#[tokio::test]
async fn provider_failure_propagates_unchanged() {
    let (svc, provider) = service_with(points(0, &[1.0; 10]), points(0, &[1.0; 10])).await;
    provider.fail_on("BBB").await;

    let err = svc.run(&request(AnalysisParams::default())).await.unwrap_err();

    match err {
        AnalysisError::DataSource(e) => {
            assert_eq!(e.ticker, "BBB");
            assert!(e.to_string().contains("upstream unavailable"));
        }
        other => panic!("expected DataSource error, got {other:?}"),
    }
}

#[tokio::test]
async fn invalid_params_never_reach_the_provider() {
    let (svc, provider) = service_with(points(0, &[1.0; 10]), points(0, &[1.0; 10])).await;

    let err = svc.run(&request(AnalysisParams::new(1, 2.0, -2.0))).await.unwrap_err();
    assert!(matches!(err, AnalysisError::InvalidParameter(_)));

    let err = svc.run(&request(AnalysisParams::new(30, -1.0, 1.0))).await.unwrap_err();
    assert!(matches!(err, AnalysisError::InvalidParameter(_)));

    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn range_end_is_exclusive() {
    let (svc, _) = service_with(points(0, &[5.0; 40]), points(0, &[1.0; 40])).await;

    let req = AnalysisRequest::new("AAA", "BBB", day(0), day(10));
    let records = svc.run(&req).await.unwrap();

    assert_eq!(records.len(), 10);
    assert_eq!(records.last().unwrap().date, day(9));
}

#[tokio::test]
async fn concurrent_runs_are_independent() {
    let a: Vec<f64> = (0..60).map(|i| 100.0 + ((i * 7) % 11) as f64).collect();
    let (svc, _) = service_with(points(0, &a), points(0, &[90.0; 60])).await;

    let req_small = request(AnalysisParams::new(5, 1.0, -1.0));
    let req_large = request(AnalysisParams::new(20, 1.0, -1.0));

    let (small, large) = tokio::join!(svc.run(&req_small), svc.run(&req_large));
    let (small, large) = (small.unwrap(), large.unwrap());

    assert_eq!(small.len(), 60);
    assert_eq!(large.len(), 60);
    assert_eq!(SignalSummary::from_records(&small).warm_up, 4);
    assert_eq!(SignalSummary::from_records(&large).warm_up, 19);

    // Same request again gives the same answer.
    assert_eq!(svc.run(&req_small).await.unwrap(), small);
}
