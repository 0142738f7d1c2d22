//! Question dispatcher.
//!
//! Walks the rule set in priority order. The first rule that both matches and
//! answers (or fails) decides the resolution; a rule reporting
//! [`RuleOutcome::NotApplicable`] passes the question on to the next one.

use tracing::Instrument;
use uuid::Uuid;

use buddhi_core::types::Upload;

use crate::rule::RuleSet;
use crate::types::{Resolution, RuleOutcome};

/// Resolves questions against an ordered [`RuleSet`].
pub struct Dispatcher {
    rules: RuleSet,
}

impl Dispatcher {
    pub fn new(rules: RuleSet) -> Self {
        tracing::debug!(rules = ?rules.kinds(), "Dispatcher ready");
        Self { rules }
    }

    /// Resolve a question, falling back to the fixed unknown-question reply
    /// when no rule produces an outcome.
    pub async fn resolve(&self, question: &str, upload: Option<&Upload>) -> Resolution {
        let span = tracing::info_span!(
            "resolve",
            request_id = %Uuid::new_v4(),
            has_upload = upload.is_some()
        );

        async move {
            for rule in self.rules.iter() {
                let kind = rule.kind();
                if !rule.matches(question, upload) {
                    continue;
                }
                tracing::debug!(rule = %kind, "Rule matched");

                match rule.answer(question, upload).await {
                    RuleOutcome::Answered(answer) => {
                        tracing::info!(rule = %kind, "Question answered");
                        return Resolution::Answered { rule: kind, answer };
                    }
                    RuleOutcome::Failed(message) => {
                        tracing::info!(rule = %kind, message = %message, "Rule failed");
                        return Resolution::Failed { rule: kind, message };
                    }
                    RuleOutcome::NotApplicable => {
                        tracing::debug!(rule = %kind, "Rule passed, trying next");
                    }
                }
            }
            tracing::info!("No rule answered, using fallback");
            Resolution::Fallback
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;
    use buddhi_core::config::DispatchConfig;
    use buddhi_core::types::FALLBACK_ANSWER;
    use buddhi_store::AnswerStore;

    use crate::rule::AnswerRule;
    use crate::types::RuleKind;

    /// Rule that always matches and returns a canned outcome.
    struct StubRule {
        kind: RuleKind,
        outcome: RuleOutcome,
        calls: Arc<AtomicUsize>,
    }

    impl StubRule {
        fn boxed(kind: RuleKind, outcome: RuleOutcome) -> (Box<dyn AnswerRule>, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            let rule = Self {
                kind,
                outcome,
                calls: Arc::clone(&calls),
            };
            (Box::new(rule), calls)
        }
    }

    #[async_trait]
    impl AnswerRule for StubRule {
        fn kind(&self) -> RuleKind {
            self.kind
        }

        fn matches(&self, _question: &str, _upload: Option<&Upload>) -> bool {
            true
        }

        async fn answer(&self, _question: &str, _upload: Option<&Upload>) -> RuleOutcome {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcome.clone()
        }
    }

    fn default_dispatcher(store: Arc<AnswerStore>) -> Dispatcher {
        let config = DispatchConfig {
            python_interpreter: "definitely-not-a-python-binary".to_string(),
            ..DispatchConfig::default()
        };
        Dispatcher::new(RuleSet::with_defaults(store, &config))
    }

    #[tokio::test]
    async fn test_first_answer_wins() {
        let mut rules = RuleSet::new();
        let (first, first_calls) =
            StubRule::boxed(RuleKind::ArchiveValue, RuleOutcome::Answered("one".into()));
        let (second, second_calls) =
            StubRule::boxed(RuleKind::FileContent, RuleOutcome::Answered("two".into()));
        rules.register(first);
        rules.register(second);

        let res = Dispatcher::new(rules).resolve("q", None).await;
        assert_eq!(
            res,
            Resolution::Answered {
                rule: RuleKind::ArchiveValue,
                answer: "one".to_string()
            }
        );
        assert_eq!(first_calls.load(Ordering::SeqCst), 1);
        assert_eq!(second_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_not_applicable_falls_through() {
        let mut rules = RuleSet::new();
        let (first, _) = StubRule::boxed(RuleKind::CodeExecution, RuleOutcome::NotApplicable);
        let (second, _) =
            StubRule::boxed(RuleKind::FileContent, RuleOutcome::Answered("content".into()));
        rules.register(first);
        rules.register(second);

        let res = Dispatcher::new(rules).resolve("q", None).await;
        assert_eq!(res.rule(), Some(RuleKind::FileContent));
        assert_eq!(res.text(), "content");
    }

    #[tokio::test]
    async fn test_failure_stops_dispatch() {
        let mut rules = RuleSet::new();
        let (first, _) =
            StubRule::boxed(RuleKind::ArchiveValue, RuleOutcome::Failed("broken".into()));
        let (second, second_calls) =
            StubRule::boxed(RuleKind::FileContent, RuleOutcome::Answered("x".into()));
        rules.register(first);
        rules.register(second);

        let res = Dispatcher::new(rules).resolve("q", None).await;
        assert_eq!(
            res,
            Resolution::Failed {
                rule: RuleKind::ArchiveValue,
                message: "broken".to_string()
            }
        );
        assert_eq!(second_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_rule_set_falls_back() {
        let res = Dispatcher::new(RuleSet::new()).resolve("anything", None).await;
        assert_eq!(res, Resolution::Fallback);
        assert_eq!(res.text(), FALLBACK_ANSWER);
    }

    #[tokio::test]
    async fn test_known_answer_beats_other_rules() {
        let store = Arc::new(AnswerStore::in_memory());
        let question = "What is the content of notes.txt?";
        store.upsert(question, "stored").await;
        let dispatcher = default_dispatcher(store);

        let upload = Upload::new(Some("notes.txt".into()), b"from file".to_vec());
        let res = dispatcher.resolve(question, Some(&upload)).await;
        assert_eq!(
            res,
            Resolution::Answered {
                rule: RuleKind::KnownAnswer,
                answer: "stored".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_unknown_question_falls_back() {
        let dispatcher = default_dispatcher(Arc::new(AnswerStore::in_memory()));
        let res = dispatcher.resolve("What is the airspeed of a swallow?", None).await;
        assert_eq!(res, Resolution::Fallback);
    }

    #[tokio::test]
    async fn test_code_failure_falls_through_to_file_content() {
        let dispatcher = default_dispatcher(Arc::new(AnswerStore::in_memory()));
        let question = "What is the output of the following Python code?\n```python\nprint(1)\n```\nWhat does the file contain?";
        let upload = Upload::new(Some("a.txt".into()), b" file text \n".to_vec());

        let res = dispatcher.resolve(question, Some(&upload)).await;
        assert_eq!(
            res,
            Resolution::Answered {
                rule: RuleKind::FileContent,
                answer: "file text".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_archive_without_upload_is_skipped() {
        let dispatcher = default_dispatcher(Arc::new(AnswerStore::in_memory()));
        let question = "Download and unzip file abcd.zip. What is the value in the \"answer\" column?";
        assert_eq!(dispatcher.resolve(question, None).await, Resolution::Fallback);
    }

    #[tokio::test]
    async fn test_archive_failure_stops_dispatch() {
        let dispatcher = default_dispatcher(Arc::new(AnswerStore::in_memory()));
        let question = "Download and unzip file abcd.zip. What is the value in the \"answer\" column? What does the file contain?";
        let upload = Upload::new(Some("abcd.zip".into()), b"plain text".to_vec());

        let res = dispatcher.resolve(question, Some(&upload)).await;
        assert_eq!(res.rule(), Some(RuleKind::ArchiveValue));
        assert!(matches!(res, Resolution::Failed { .. }));
        assert!(res.text().starts_with("Error processing file:"));
    }
}
