//! Multi-provider rate race.
//!
//! Every provider is queried concurrently; the first valid quote wins and
//! the rest are cancelled. Provider errors are absorbed and only escalate
//! as an [`AggregateFailure`] once no provider can succeed any more.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use rates_types::{
    AggregateFailure, ConfigError, CurrencyPair, FetchContext, ProviderError, ProviderFailure,
    RateProvider, RateQuote,
};

/// One provider task's outcome, tagged with the provider's position.
struct Completion {
    index: usize,
    outcome: Result<RateQuote, ProviderError>,
}

/// Races a fixed, ordered set of rate providers.
pub struct Aggregator {
    providers: Vec<Arc<dyn RateProvider>>,
}

impl Aggregator {
    /// Creates an aggregator over `providers`. At least one is required.
    pub fn new(providers: Vec<Arc<dyn RateProvider>>) -> Result<Self, ConfigError> {
        if providers.is_empty() {
            return Err(ConfigError::NoProviders);
        }
        Ok(Self { providers })
    }

    /// Names of the configured providers, in configuration order.
    pub fn provider_names(&self) -> Vec<String> {
        self.providers.iter().map(|p| p.name().to_string()).collect()
    }

    /// Resolves `pair` by racing all providers.
    ///
    /// "First" means first to complete as observed here, not provider
    /// priority; two providers answering within the same scheduling tick may
    /// win in either order across runs.
    ///
    /// Returns the first valid quote, or every provider's failure in
    /// completion order. Providers still outstanding when the deadline of
    /// `ctx` elapses (or `ctx` is cancelled) are recorded as
    /// `DeadlineExceeded` (or `Cancelled`) after the completed ones.
    #[tracing::instrument(
        name = "resolve_rate",
        skip(self, ctx),
        fields(pair = %pair, providers = self.providers.len())
    )]
    pub async fn resolve(
        &self,
        ctx: &FetchContext,
        pair: &CurrencyPair,
    ) -> Result<RateQuote, AggregateFailure> {
        let race = ctx.child();
        let total = self.providers.len();
        if ctx.deadline().is_none() {
            warn!("Resolving without a deadline");
        }

        // Sized so no provider ever blocks on send, even after we stop reading.
        let (tx, mut rx) = mpsc::channel::<Completion>(total);
        // Dropping the set aborts whatever is still running.
        let mut tasks = JoinSet::new();

        for (index, provider) in self.providers.iter().enumerate() {
            let provider = Arc::clone(provider);
            let task_ctx = race.clone();
            let pair = *pair;
            let tx = tx.clone();
            tasks.spawn(async move {
                let outcome = provider.fetch_rate(&task_ctx, &pair).await;
                let _ = tx.send(Completion { index, outcome }).await;
            });
        }
        drop(tx);

        let mut pending = vec![true; total];
        let mut failures = Vec::with_capacity(total);

        while failures.len() < total {
            let completion = tokio::select! {
                biased;
                completion = rx.recv() => completion,
                _ = ctx.cancelled() => {
                    return Err(self.abandon(&race, pair, &pending, failures, ProviderError::Cancelled));
                }
                _ = ctx.expired() => {
                    return Err(self.abandon(&race, pair, &pending, failures, ProviderError::DeadlineExceeded));
                }
            };

            // Every sender is gone: the remaining tasks died without reporting.
            let Some(Completion { index, outcome }) = completion else {
                break;
            };
            pending[index] = false;
            let source = self.providers[index].name();
            debug!(provider = source, ok = outcome.is_ok(), "Provider completed");

            match outcome.and_then(|quote| quote.validate(pair).map(|()| quote)) {
                Ok(mut quote) => {
                    race.cancel();
                    if quote.source != source {
                        debug!(provider = source, reported = %quote.source, "Overriding quote source");
                        quote.source = source.to_string();
                    }
                    info!(provider = source, rate = quote.rate, "Rate resolved");
                    return Ok(quote);
                }
                Err(cause) => {
                    warn!(provider = source, error = %cause, "Provider failed to return rate");
                    failures.push(ProviderFailure::new(source, cause));
                }
            }
        }

        for (index, _) in pending.iter().enumerate().filter(|(_, p)| **p) {
            failures.push(ProviderFailure::new(
                self.providers[index].name(),
                ProviderError::TaskAborted,
            ));
        }

        warn!(failures = failures.len(), "All providers failed");
        Err(AggregateFailure::new(*pair, failures))
    }

    /// Stops the race, marking every outstanding provider with `cause`.
    fn abandon(
        &self,
        race: &FetchContext,
        pair: &CurrencyPair,
        pending: &[bool],
        mut failures: Vec<ProviderFailure>,
        cause: ProviderError,
    ) -> AggregateFailure {
        race.cancel();
        warn!(error = %cause, "Abandoning outstanding providers");

        failures.extend(
            pending
                .iter()
                .enumerate()
                .filter(|(_, p)| **p)
                .map(|(index, _)| ProviderFailure::new(self.providers[index].name(), cause.clone())),
        );
        AggregateFailure::new(*pair, failures)
    }
}
