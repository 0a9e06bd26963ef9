//! Resilient handle over the reasoning collaborator.
//!
//! Every stage talks to the model through this handle: the primary reasoner is
//! invoked once with a wait notice; on failure or an empty output the fallback
//! reasoner (when configured) is invoked once, also with a wait notice. No
//! retries beyond that single fallback attempt.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::error::AgentError;
use crate::llm::resilient::{invoke_with_fallback, invoke_with_wait_notice, DEFAULT_WAIT_NOTICE};
use crate::llm::{Decision, PlanOutcome, ReasonContext, Reasoner, SubgoalReview};

/// Primary + optional fallback reasoner with wait-notice observability.
#[derive(Clone)]
pub struct ResilientReasoner {
    primary: Arc<dyn Reasoner>,
    fallback: Option<Arc<dyn Reasoner>>,
    wait_notice: Duration,
}

impl ResilientReasoner {
    pub fn new(primary: Arc<dyn Reasoner>) -> Self {
        Self {
            primary,
            fallback: None,
            wait_notice: DEFAULT_WAIT_NOTICE,
        }
    }

    /// Sets the fallback reasoner used after a failed or empty primary call.
    pub fn with_fallback(mut self, fallback: Arc<dyn Reasoner>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    /// Overrides the wait-notice delay (observability only, never a deadline).
    pub fn with_wait_notice(mut self, wait_notice: Duration) -> Self {
        self.wait_notice = wait_notice;
        self
    }

    async fn call<'a, T, F, Fut>(&'a self, f: F) -> Result<Option<T>, AgentError>
    where
        F: Fn(&'a dyn Reasoner) -> Fut,
        Fut: Future<Output = Result<Option<T>, AgentError>> + 'a,
    {
        match &self.fallback {
            Some(fb) => {
                invoke_with_fallback(
                    || invoke_with_wait_notice(f(self.primary.as_ref()), self.wait_notice),
                    || invoke_with_wait_notice(f(fb.as_ref()), self.wait_notice),
                    true,
                )
                .await
            }
            None => invoke_with_wait_notice(f(self.primary.as_ref()), self.wait_notice).await,
        }
    }

    pub async fn plan(&self, ctx: &ReasonContext) -> Result<Option<PlanOutcome>, AgentError> {
        self.call(|r| r.plan(ctx)).await
    }

    pub async fn review_subgoals(
        &self,
        ctx: &ReasonContext,
    ) -> Result<Option<SubgoalReview>, AgentError> {
        self.call(|r| r.review_subgoals(ctx)).await
    }

    pub async fn decide(&self, ctx: &ReasonContext) -> Result<Option<Decision>, AgentError> {
        self.call(|r| r.decide(ctx)).await
    }

    pub async fn summarize(&self, ctx: &ReasonContext) -> Result<Option<String>, AgentError> {
        self.call(|r| r.summarize(ctx)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MockReasoner;

    /// **Scenario**: A failing primary decision falls back to the secondary model.
    #[tokio::test]
    async fn falls_back_to_secondary_reasoner() {
        let primary = MockReasoner::new().push_decision_error("main model down");
        let fallback = MockReasoner::new().push_decision(Decision {
            payload: "{}".to_string(),
            rationale: "fallback decided".to_string(),
            complete_subgoal_ids: vec![],
            tool_calls: vec![],
        });

        let reasoner = ResilientReasoner::new(Arc::new(primary))
            .with_fallback(Arc::new(fallback))
            .with_wait_notice(Duration::from_millis(50));

        let ctx = ReasonContext::default();
        let decision = reasoner.decide(&ctx).await.unwrap().unwrap();
        assert_eq!(decision.rationale, "fallback decided");
    }

    /// **Scenario**: Without a fallback, a primary failure propagates.
    #[tokio::test]
    async fn primary_failure_propagates_without_fallback() {
        let primary = MockReasoner::new().push_decision_error("down");
        let reasoner = ResilientReasoner::new(Arc::new(primary));
        let ctx = ReasonContext::default();
        assert!(matches!(
            reasoner.decide(&ctx).await,
            Err(AgentError::Inference(_))
        ));
    }

    /// **Scenario**: An empty primary output triggers the fallback once.
    #[tokio::test]
    async fn empty_primary_output_falls_back() {
        let primary = MockReasoner::new().push_empty_decision();
        let fallback = MockReasoner::new().push_decision(Decision {
            payload: "{}".to_string(),
            rationale: "second opinion".to_string(),
            complete_subgoal_ids: vec![],
            tool_calls: vec![],
        });
        let reasoner =
            ResilientReasoner::new(Arc::new(primary)).with_fallback(Arc::new(fallback));

        let ctx = ReasonContext::default();
        let decision = reasoner.decide(&ctx).await.unwrap().unwrap();
        assert_eq!(decision.rationale, "second opinion");
    }
}
