//! Query resolution: curated lookup first, text generation second.

use crate::models::{Audience, Role};
use crate::services::metrics;
use crate::services::providers::{ProviderError, TextProvider};
use crate::services::{AnswerTable, RoleClassifier};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Answer returned whenever the text-generation backend cannot be used.
pub const FALLBACK_ANSWER: &str =
    "Sorry, I couldn't answer that at the moment. Please try again later.";

const PORTAL_INTRO: &str =
    "You are a helpful assistant for the DTE EMIS government portal (https://emis.dtemaharashtra.gov.in/)";

const ANSWER_STYLE: &str = "Answer in 1-2 sentences, briefly and concisely: ";

/// Where an answer came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerSource {
    Curated,
    Generated,
    Fallback,
}

impl AnswerSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnswerSource::Curated => "curated",
            AnswerSource::Generated => "generated",
            AnswerSource::Fallback => "fallback",
        }
    }
}

/// Outcome of resolving one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub answer: String,
    pub audience: Audience,
    pub source: AnswerSource,
}

/// Resolves chat messages against curated tables with a generative fallback.
///
/// Without a classifier every message is answered from the implicit
/// [`Role::Default`] table and caller-supplied roles are ignored.
pub struct AnswerResolver {
    table: Arc<AnswerTable>,
    classifier: Option<RoleClassifier>,
    provider: Arc<dyn TextProvider>,
    provider_timeout: Duration,
}

impl AnswerResolver {
    pub fn new(
        table: Arc<AnswerTable>,
        classifier: Option<RoleClassifier>,
        provider: Arc<dyn TextProvider>,
        provider_timeout: Duration,
    ) -> Self {
        Self {
            table,
            classifier,
            provider,
            provider_timeout,
        }
    }

    pub fn is_role_aware(&self) -> bool {
        self.classifier.is_some()
    }

    pub fn table(&self) -> &AnswerTable {
        &self.table
    }

    pub fn provider(&self) -> &dyn TextProvider {
        self.provider.as_ref()
    }

    /// Pick the audience for a message: caller-supplied role first, then
    /// the classifier, then the implicit default scope.
    pub fn audience_for(&self, message: &str, requested_role: Option<&str>) -> Audience {
        let Some(classifier) = &self.classifier else {
            return Audience::Known(Role::Default);
        };

        match requested_role.filter(|role| !role.trim().is_empty()) {
            Some(label) => Audience::from_label(label),
            None => Audience::Known(classifier.classify(message)),
        }
    }

    pub async fn resolve(&self, message: &str, requested_role: Option<&str>) -> Resolution {
        let message = message.trim();
        let audience = self.audience_for(message, requested_role);

        // A blank stored answer counts as a miss.
        let curated = audience
            .role()
            .and_then(|role| self.table.lookup(role, message))
            .filter(|answer| !answer.trim().is_empty());

        let (answer, source) = match curated {
            Some(answer) => (answer.to_string(), AnswerSource::Curated),
            None => {
                let prompt = build_prompt(&audience, message, self.is_role_aware());
                match self.generate(&prompt).await {
                    Ok(text) => (text, AnswerSource::Generated),
                    Err(e) => {
                        tracing::warn!(
                            error = %e,
                            provider = self.provider.name(),
                            role = %audience,
                            "Text generation failed, returning fallback answer"
                        );
                        (FALLBACK_ANSWER.to_string(), AnswerSource::Fallback)
                    }
                }
            }
        };

        tracing::info!(
            role = %audience,
            source = source.as_str(),
            message_len = message.len(),
            "Resolved chat message"
        );
        metrics::record_answer(source.as_str(), audience.metrics_label());

        Resolution {
            answer,
            audience,
            source,
        }
    }

    /// One bounded call to the provider. Blank output counts as failure.
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        let started = Instant::now();
        let call = self.provider.generate(prompt);
        let outcome = match tokio::time::timeout(self.provider_timeout, call).await {
            Ok(Ok(text)) => match text.trim() {
                "" => Err(ProviderError::EmptyResponse),
                trimmed => Ok(trimmed.to_string()),
            },
            Ok(Err(e)) => Err(e),
            Err(_) => Err(ProviderError::Timeout(self.provider_timeout)),
        };

        let label = match &outcome {
            Ok(_) => "ok",
            Err(e) => e.kind(),
        };
        metrics::record_provider_call(self.provider.name(), label, started.elapsed());

        outcome
    }
}

/// Instruction prefix followed by the original (trimmed) message.
pub fn build_prompt(audience: &Audience, message: &str, role_aware: bool) -> String {
    if !role_aware {
        return format!("{}. {}{}", PORTAL_INTRO, ANSWER_STYLE, message);
    }

    let asker = audience.role().map(|r| r.asker()).unwrap_or("a portal visitor");
    format!(
        "{}, answering a question from {}. {}{}",
        PORTAL_INTRO, asker, ANSWER_STYLE, message
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::providers::mock::{MockBehavior, MockTextProvider};

    fn resolver_with(provider: Arc<MockTextProvider>, role_aware: bool) -> AnswerResolver {
        AnswerResolver::new(
            Arc::new(AnswerTable::builtin()),
            role_aware.then(RoleClassifier::default),
            provider,
            Duration::from_secs(5),
        )
    }

    #[tokio::test]
    async fn curated_answer_is_returned_verbatim_without_calling_provider() {
        let provider = Arc::new(MockTextProvider::echo());
        let resolver = resolver_with(provider.clone(), false);

        let resolution = resolver
            .resolve("   What is the OFFICIAL website for DTE EMIS   ", None)
            .await;

        assert_eq!(
            resolution.answer,
            "The official website is https://emis.dtemaharashtra.gov.in/."
        );
        assert_eq!(resolution.source, AnswerSource::Curated);
        assert_eq!(resolution.audience, Audience::Known(Role::Default));
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn every_curated_question_resolves_to_its_answer() {
        let provider = Arc::new(MockTextProvider::echo());
        let resolver = resolver_with(provider.clone(), true);
        let table = AnswerTable::builtin();

        for role in Role::AUDIENCES {
            for question in table.questions(role) {
                let shouted = format!("  {}  ", question.to_uppercase());
                let resolution = resolver.resolve(&shouted, Some(role.as_str())).await;
                assert_eq!(
                    Some(resolution.answer.as_str()),
                    table.lookup(role, &question)
                );
            }
        }
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn miss_forwards_original_case_message_with_prefix() {
        let provider = Arc::new(MockTextProvider::new(MockBehavior::Reply(
            "  Results are out in June.  ".to_string(),
        )));
        let resolver = resolver_with(provider.clone(), false);

        let resolution = resolver.resolve("  When are RESULTS declared?  ", None).await;

        assert_eq!(resolution.answer, "Results are out in June.");
        assert_eq!(resolution.source, AnswerSource::Generated);
        assert_eq!(
            provider.prompts(),
            vec![
                "You are a helpful assistant for the DTE EMIS government portal (https://emis.dtemaharashtra.gov.in/). \
                 Answer in 1-2 sentences, briefly and concisely: When are RESULTS declared?"
                    .to_string()
            ]
        );
    }

    #[tokio::test]
    async fn trailing_punctuation_is_a_miss() {
        let provider = Arc::new(MockTextProvider::echo());
        let resolver = resolver_with(provider.clone(), false);

        let resolution = resolver.resolve("What is DTE EMIS?", None).await;

        assert_eq!(resolution.source, AnswerSource::Generated);
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn provider_failure_becomes_fallback_answer() {
        let provider = Arc::new(MockTextProvider::failing(ProviderError::NetworkError(
            "connection refused".to_string(),
        )));
        let resolver = resolver_with(provider, false);

        let resolution = resolver.resolve("Something unusual", None).await;

        assert_eq!(resolution.answer, FALLBACK_ANSWER);
        assert_eq!(resolution.source, AnswerSource::Fallback);
    }

    #[tokio::test]
    async fn blank_provider_output_becomes_fallback_answer() {
        let provider = Arc::new(MockTextProvider::new(MockBehavior::Reply("  \n".to_string())));
        let resolver = resolver_with(provider, false);

        let resolution = resolver.resolve("Something unusual", None).await;

        assert_eq!(resolution.answer, FALLBACK_ANSWER);
    }

    #[tokio::test]
    async fn slow_provider_times_out_into_fallback() {
        let provider = Arc::new(MockTextProvider::new(MockBehavior::Delay(
            Duration::from_secs(5),
        )));
        let resolver = AnswerResolver::new(
            Arc::new(AnswerTable::builtin()),
            None,
            provider,
            Duration::from_millis(20),
        );

        let resolution = resolver.resolve("Something unusual", None).await;

        assert_eq!(resolution.answer, FALLBACK_ANSWER);
        assert_eq!(resolution.source, AnswerSource::Fallback);
    }

    #[tokio::test]
    async fn single_table_mode_ignores_requested_role() {
        let provider = Arc::new(MockTextProvider::echo());
        let resolver = resolver_with(provider, false);

        let resolution = resolver.resolve("what is dte emis", Some("teacher")).await;

        assert_eq!(resolution.audience, Audience::Known(Role::Default));
        assert_eq!(resolution.source, AnswerSource::Curated);
    }

    #[tokio::test]
    async fn role_aware_mode_classifies_when_no_role_given() {
        let provider = Arc::new(MockTextProvider::echo());
        let resolver = resolver_with(provider.clone(), true);

        let resolution = resolver.resolve("How do I check exam timetable", None).await;

        assert_eq!(resolution.audience, Audience::Known(Role::Student));
        assert_eq!(resolution.source, AnswerSource::Curated);
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn role_aware_prompt_names_the_audience() {
        let provider = Arc::new(MockTextProvider::echo());
        let resolver = resolver_with(provider.clone(), true);

        let resolution = resolver.resolve("How do I check exam timetable?", None).await;

        assert_eq!(resolution.audience, Audience::Known(Role::Student));
        assert_eq!(resolution.source, AnswerSource::Generated);
        let prompts = provider.prompts();
        assert!(prompts[0].contains("answering a question from a student"));
        assert!(prompts[0].ends_with("How do I check exam timetable?"));
    }

    #[tokio::test]
    async fn requested_role_overrides_classifier() {
        let provider = Arc::new(MockTextProvider::echo());
        let resolver = resolver_with(provider, true);

        let resolution = resolver.resolve("how do i apply for hostel", Some("Parent")).await;
        assert_eq!(resolution.audience, Audience::Known(Role::Parent));
        assert_eq!(resolution.source, AnswerSource::Curated);

        let resolution = resolver
            .resolve("how do i apply for hostel", Some("student"))
            .await;
        assert_eq!(resolution.audience, Audience::Known(Role::Student));
        assert_eq!(resolution.source, AnswerSource::Generated);
    }

    #[tokio::test]
    async fn unknown_requested_role_always_generates() {
        let provider = Arc::new(MockTextProvider::echo());
        let resolver = resolver_with(provider.clone(), true);

        let resolution = resolver.resolve("what is dte emis", Some("Alumni")).await;

        assert_eq!(
            resolution.audience,
            Audience::Unrecognized("alumni".to_string())
        );
        assert_eq!(resolution.source, AnswerSource::Generated);
        assert!(provider.prompts()[0].contains("from a portal visitor"));
    }

    #[tokio::test]
    async fn blank_requested_role_falls_back_to_classifier() {
        let provider = Arc::new(MockTextProvider::echo());
        let resolver = resolver_with(provider, true);

        let resolution = resolver.resolve("circular for staff", Some("  ")).await;

        assert_eq!(resolution.audience, Audience::Known(Role::Teacher));
    }

    #[tokio::test]
    async fn whitespace_message_is_an_empty_lookup() {
        let provider = Arc::new(MockTextProvider::echo());
        let resolver = resolver_with(provider.clone(), false);

        let resolution = resolver.resolve("   ", None).await;

        assert_eq!(resolution.source, AnswerSource::Generated);
        assert!(provider.prompts()[0].ends_with("briefly and concisely: "));
    }

    #[tokio::test]
    async fn resolving_twice_gives_identical_results() {
        let provider = Arc::new(MockTextProvider::echo());
        let resolver = resolver_with(provider, true);

        let first = resolver.resolve("how do i register for an fdp", None).await;
        let second = resolver.resolve("how do i register for an fdp", None).await;

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn blank_curated_answer_is_treated_as_a_miss() {
        let table = AnswerTable::from_json_str(
            r#"{"default": {"what is emis": "", "who runs emis": "   "}}"#,
            "inline",
        )
        .unwrap();
        let provider = Arc::new(MockTextProvider::new(MockBehavior::Reply(
            "EMIS is the DTE management portal.".to_string(),
        )));
        let resolver =
            AnswerResolver::new(Arc::new(table), None, provider.clone(), Duration::from_secs(5));

        let resolution = resolver.resolve("what is emis", None).await;
        assert_eq!(resolution.answer, "EMIS is the DTE management portal.");
        assert_eq!(resolution.source, AnswerSource::Generated);

        let resolution = resolver.resolve("Who runs EMIS", None).await;
        assert_eq!(resolution.source, AnswerSource::Generated);
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn timeout_error_keeps_sub_second_duration() {
        let provider = Arc::new(MockTextProvider::new(MockBehavior::Delay(
            Duration::from_secs(5),
        )));
        let resolver = AnswerResolver::new(
            Arc::new(AnswerTable::builtin()),
            None,
            provider,
            Duration::from_millis(250),
        );

        let err = resolver.generate("prompt").await.unwrap_err();

        assert_eq!(err, ProviderError::Timeout(Duration::from_millis(250)));
        assert_eq!(err.to_string(), "Provider timed out after 250ms");
    }

    #[tokio::test]
    async fn caller_chosen_roles_do_not_create_metric_series() {
        crate::services::metrics::init_metrics().unwrap();
        let provider = Arc::new(MockTextProvider::echo());
        let resolver = resolver_with(provider, true);

        for i in 0..200 {
            let role = format!("visitor-{}", i);
            let resolution = resolver.resolve("hello", Some(&role)).await;
            assert_eq!(resolution.audience.as_str(), role);
        }

        let rendered = crate::services::metrics::get_metrics();
        let series: Vec<&str> = rendered
            .lines()
            .filter(|line| line.starts_with("chat_answers_total{"))
            .collect();
        assert!(!rendered.contains("visitor-"));
        assert!(series.iter().any(|line| line.contains(r#"role="unknown""#)));
        // At most every source paired with every role label.
        assert!(series.len() <= 3 * 6, "unexpected series: {:?}", series);
    }
}
