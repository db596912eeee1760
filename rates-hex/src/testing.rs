//! Scripted providers for exercising the aggregator and service.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use rates_types::{CurrencyPair, FetchContext, ProviderError, RateProvider, RateQuote};

/// What a scripted provider does once its delay has elapsed.
#[derive(Clone)]
pub enum Script {
    Rate(f64),
    Fail(ProviderError),
    /// Answers for a different pair than requested.
    WrongPair(f64),
    /// Never answers on its own.
    Hang,
    Panic,
    /// Answers with a quote attributed to some other source.
    ForeignSource(f64),
    /// Sleeps out its delay and answers, never looking at the context.
    Stubborn(f64),
}

/// Provider that answers after a fixed (virtual) delay.
pub struct ScriptedProvider {
    name: String,
    delay: Duration,
    script: Script,
    calls: AtomicUsize,
    finished: AtomicUsize,
    last_ctx: Mutex<Option<FetchContext>>,
}

impl ScriptedProvider {
    pub fn new(name: &str, delay_ms: u64, script: Script) -> Self {
        Self {
            name: name.to_string(),
            delay: Duration::from_millis(delay_ms),
            script,
            calls: AtomicUsize::new(0),
            finished: AtomicUsize::new(0),
            last_ctx: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Calls that ran to completion instead of being dropped.
    pub fn finished(&self) -> usize {
        self.finished.load(Ordering::SeqCst)
    }

    /// Whether the context of the last call has been cancelled.
    pub fn saw_cancellation(&self) -> bool {
        self.last_ctx
            .lock()
            .unwrap()
            .as_ref()
            .is_some_and(FetchContext::is_cancelled)
    }
}

#[async_trait]
impl RateProvider for ScriptedProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch_rate(
        &self,
        ctx: &FetchContext,
        pair: &CurrencyPair,
    ) -> Result<RateQuote, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_ctx.lock().unwrap() = Some(ctx.clone());

        if let Script::Stubborn(rate) = &self.script {
            tokio::time::sleep(self.delay).await;
            self.finished.fetch_add(1, Ordering::SeqCst);
            return Ok(RateQuote::new(*pair, *rate, &self.name));
        }

        let result = ctx
            .race(async {
                tokio::time::sleep(self.delay).await;
                match &self.script {
                    Script::Rate(rate) => Ok(RateQuote::new(*pair, *rate, &self.name)),
                    Script::Fail(err) => Err(err.clone()),
                    Script::WrongPair(rate) => {
                        Ok(RateQuote::new(pair.inverse(), *rate, &self.name))
                    }
                    Script::ForeignSource(rate) => {
                        Ok(RateQuote::new(*pair, *rate, "elsewhere"))
                    }
                    Script::Hang => std::future::pending().await,
                    Script::Panic => panic!("scripted provider panic"),
                    Script::Stubborn(_) => unreachable!(),
                }
            })
            .await;
        self.finished.fetch_add(1, Ordering::SeqCst);
        result
    }
}
