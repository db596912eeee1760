//! RateService unit tests.

use std::sync::Arc;
use std::time::Duration;

use rates_types::{
    FetchContext, ProviderError, RateError, RateProvider, RateRequest, ValidationError,
};

use crate::testing::{Script, ScriptedProvider};
use crate::{Aggregator, RateService};

fn service_with(providers: Vec<Arc<ScriptedProvider>>) -> RateService {
    let providers: Vec<Arc<dyn RateProvider>> = providers
        .into_iter()
        .map(|p| p as Arc<dyn RateProvider>)
        .collect();
    RateService::new(Aggregator::new(providers).unwrap()).with_timeout(Duration::from_secs(2))
}

#[tokio::test(start_paused = true)]
async fn test_get_rate_success() {
    let provider = Arc::new(ScriptedProvider::new("currencyapi", 10, Script::Rate(0.92)));
    let service = service_with(vec![provider]);

    let quote = service.get_rate("usd-eur").await.unwrap();

    assert_eq!(quote.pair.to_string(), "USD-EUR");
    assert_eq!(quote.rate, 0.92);
    assert_eq!(quote.source, "currencyapi");
}

#[tokio::test(start_paused = true)]
async fn test_invalid_pair_never_reaches_providers() {
    let provider = Arc::new(ScriptedProvider::new("currencyapi", 10, Script::Rate(0.92)));
    let service = service_with(vec![Arc::clone(&provider)]);

    let result = service.get_rate("USDEUR").await;

    assert!(matches!(
        result,
        Err(RateError::Validation(ValidationError::MissingSeparator))
    ));
    assert_eq!(provider.calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_negative_amount_never_reaches_providers() {
    let provider = Arc::new(ScriptedProvider::new("currencyapi", 10, Script::Rate(0.92)));
    let service = service_with(vec![Arc::clone(&provider)]);

    let result = service
        .convert(&FetchContext::new(), "USD-EUR", -5.0)
        .await;

    assert!(matches!(
        result,
        Err(RateError::Validation(ValidationError::NegativeAmount(_)))
    ));
    assert_eq!(provider.calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_convert_applies_rate() {
    let provider = Arc::new(ScriptedProvider::new("currencyapi", 10, Script::Rate(0.92)));
    let service = service_with(vec![provider]);

    let conversion = service
        .convert(&service.context(), "USD-EUR", 100.0)
        .await
        .unwrap();

    assert_eq!(conversion.amount, 100.0);
    assert_eq!(conversion.converted_amount, 92.0);
    assert_eq!(conversion.quote.source, "currencyapi");
}

#[tokio::test(start_paused = true)]
async fn test_quote_without_amount_omits_conversion() {
    let provider = Arc::new(ScriptedProvider::new("currencyapi", 10, Script::Rate(1.27)));
    let service = service_with(vec![provider]);

    let response = service
        .quote(RateRequest {
            currency_pair: "gbp-usd".into(),
            amount: None,
        })
        .await
        .unwrap();

    assert_eq!(response.currency_pair, "GBP-USD");
    assert_eq!(response.rate, 1.27);
    assert_eq!(response.converted_amount, None);
}

#[tokio::test(start_paused = true)]
async fn test_quote_with_amount_converts() {
    let provider = Arc::new(ScriptedProvider::new("currencyapi", 10, Script::Rate(2.0)));
    let service = service_with(vec![provider]);

    let response = service
        .quote(RateRequest {
            currency_pair: "EUR-USD".into(),
            amount: Some(12.5),
        })
        .await
        .unwrap();

    assert_eq!(response.converted_amount, Some(25.0));
}

#[tokio::test(start_paused = true)]
async fn test_quote_rejects_overflowing_conversion() {
    let provider = Arc::new(ScriptedProvider::new("currencyapi", 10, Script::Rate(10.0)));
    let service = service_with(vec![provider]);

    let result = service
        .quote(RateRequest {
            currency_pair: "USD-EUR".into(),
            amount: Some(1e308),
        })
        .await;

    assert!(matches!(
        result,
        Err(RateError::Validation(ValidationError::ConversionOverflow { .. }))
    ));
}

#[tokio::test(start_paused = true)]
async fn test_all_providers_failing_surfaces_aggregate_failure() {
    let a = Arc::new(ScriptedProvider::new(
        "currencyapi",
        10,
        Script::Fail(ProviderError::Status(401)),
    ));
    let b = Arc::new(ScriptedProvider::new(
        "exchangeratesapi",
        20,
        Script::Fail(ProviderError::Upstream("invalid_access_key".into())),
    ));
    let service = service_with(vec![a, b]);

    let result = service.get_rate("USD-EUR").await;

    match result {
        Err(RateError::Aggregate(failure)) => {
            assert_eq!(failure.failures().len(), 2);
            assert_eq!(failure.failures()[0].source(), "currencyapi");
            assert_eq!(failure.failures()[1].source(), "exchangeratesapi");
        }
        other => panic!("expected aggregate failure, got {:?}", other),
    }
}

#[tokio::test(start_paused = true)]
async fn test_configured_timeout_bounds_the_request() {
    let provider = Arc::new(ScriptedProvider::new("slow", 10_000, Script::Rate(0.92)));
    let service = service_with(vec![provider]);

    let start = tokio::time::Instant::now();
    let result = service.get_rate("USD-EUR").await;

    assert!(start.elapsed() < Duration::from_secs(10));
    match result {
        Err(RateError::Aggregate(failure)) => assert!(failure.is_timeout()),
        other => panic!("expected timeout, got {:?}", other),
    }
}
