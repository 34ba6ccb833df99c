//! Run Answer use case.
//!
//! Answers one question with a card-shaped reply:
//!
//! 1. Reject blank questions (no backend call)
//! 2. Route the question to a card and assemble the prompt
//! 3. First backend call at the configured temperature
//! 4. Validate the reply's bullet structure
//! 5. If invalid, append the corrective turn and make exactly one more call,
//!    returning its reply verbatim
//!
//! Backend failures end the request; they are never retried here.

use crate::config::CompletionParams;
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::llm_gateway::{CompletionRequest, GatewayError, LlmGateway};
use crate::ports::progress::{AnswerProgressNotifier, NoAnswerProgress};
use serde::Serialize;
use std::sync::Arc;
use telcard_domain::core::string::truncate;
use telcard_domain::{
    Card, CardSelector, Message, PromptAssembler, Question, ReplyValidator, count_bullets,
};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Errors surfaced to the caller of [`RunAnswerUseCase`].
///
/// A reply that fails validation is not an error: it triggers the
/// corrective attempt instead.
#[derive(Error, Debug)]
pub enum RunAnswerError {
    #[error("Question is empty")]
    EmptyInput,

    /// The backend failed. Display stays generic; the cause is kept as the
    /// error source for logs.
    #[error("The language model service is unavailable")]
    UpstreamFailure {
        #[source]
        source: GatewayError,
    },

    #[error("Operation cancelled")]
    Cancelled,
}

impl RunAnswerError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, RunAnswerError::Cancelled)
    }

    /// True for errors caused by the caller's input
    pub fn is_user_error(&self) -> bool {
        matches!(self, RunAnswerError::EmptyInput)
    }
}

impl From<GatewayError> for RunAnswerError {
    fn from(source: GatewayError) -> Self {
        RunAnswerError::UpstreamFailure { source }
    }
}

/// Input for the [`RunAnswerUseCase`].
#[derive(Debug, Clone)]
pub struct RunAnswerInput {
    /// The user's question, forwarded verbatim.
    pub question: String,
    /// Prior turns, alternating user/assistant, oldest first.
    pub history: Vec<String>,
}

impl RunAnswerInput {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            history: Vec::new(),
        }
    }

    pub fn with_history(mut self, history: Vec<String>) -> Self {
        self.history = history;
        self
    }
}

/// Result of a successful request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerOutcome {
    pub answer: String,
    pub card: Card,
    /// Backend calls made: 1, or 2 when a correction was needed.
    pub attempts: u8,
    /// Whether the first reply passed validation.
    pub first_reply_valid: bool,
}

impl AnswerOutcome {
    pub fn answer(&self) -> &str {
        &self.answer
    }

    pub fn into_answer(self) -> String {
        self.answer
    }

    pub fn was_corrected(&self) -> bool {
        self.attempts > 1
    }
}

/// Use case for answering a question with a card-shaped reply.
///
/// Holds no per-request state; one instance serves concurrent requests.
#[derive(Clone)]
pub struct RunAnswerUseCase {
    gateway: Arc<dyn LlmGateway>,
    selector: Arc<CardSelector>,
    assembler: PromptAssembler,
    validator: ReplyValidator,
    params: CompletionParams,
    conversation_logger: Arc<dyn ConversationLogger>,
    cancellation_token: Option<CancellationToken>,
}

impl RunAnswerUseCase {
    pub fn new(gateway: Arc<dyn LlmGateway>, assembler: PromptAssembler) -> Self {
        Self {
            gateway,
            selector: Arc::new(CardSelector::standard()),
            assembler,
            validator: ReplyValidator::new(),
            params: CompletionParams::default(),
            conversation_logger: Arc::new(NoConversationLogger),
            cancellation_token: None,
        }
    }

    pub fn with_params(mut self, params: CompletionParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_selector(mut self, selector: Arc<CardSelector>) -> Self {
        self.selector = selector;
        self
    }

    /// Create with a conversation logger.
    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    /// Set a cancellation token; cancelling it aborts the in-flight call.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    pub fn params(&self) -> &CompletionParams {
        &self.params
    }

    pub fn selector(&self) -> &CardSelector {
        &self.selector
    }

    /// Answer a question, returning only the reply text.
    pub async fn answer(
        &self,
        question: &str,
        history: &[String],
    ) -> Result<String, RunAnswerError> {
        let input = RunAnswerInput::new(question).with_history(history.to_vec());
        self.execute(input, &NoAnswerProgress)
            .await
            .map(AnswerOutcome::into_answer)
    }

    /// Answer a question with progress callbacks.
    pub async fn execute(
        &self,
        input: RunAnswerInput,
        progress: &dyn AnswerProgressNotifier,
    ) -> Result<AnswerOutcome, RunAnswerError> {
        let question = Question::try_new(input.question).ok_or(RunAnswerError::EmptyInput)?;

        let card = self.selector.select(question.content());
        info!(card = %card, "Answering: {}", truncate(question.content(), 100));
        progress.on_card_selected(card);

        if input.history.len() % 2 != 0 {
            warn!(
                "History has {} entries; dropping the unpaired last entry",
                input.history.len()
            );
        }

        self.conversation_logger.log(ConversationEvent::new(
            "card_selected",
            serde_json::json!({
                "card": card.name(),
                "question": question.content(),
                "history_len": input.history.len(),
            }),
        ));

        let mut messages = self
            .assembler
            .build(card, &input.history, question.content());

        let first = self
            .call_backend(&messages, Some(self.params.temperature), 1, progress)
            .await?;

        let bullets = count_bullets(&first);
        if self.validator.is_valid(&first) {
            progress.on_attempt_complete(1, Some(true));
            info!(card = %card, bullets, "Reply accepted on first attempt");
            return Ok(AnswerOutcome {
                answer: first,
                card,
                attempts: 1,
                first_reply_valid: true,
            });
        }

        progress.on_attempt_complete(1, Some(false));
        warn!(
            card = %card,
            bullets,
            required = self.validator.required(),
            "Reply failed bullet validation, issuing corrective attempt"
        );
        self.conversation_logger.log(ConversationEvent::new(
            "reply_rejected",
            serde_json::json!({
                "card": card.name(),
                "bullets": bullets,
                "required": self.validator.required(),
            }),
        ));

        self.assembler.append_corrective_turn(&mut messages);
        let second = self
            .call_backend(&messages, self.params.corrective_temperature, 2, progress)
            .await?;

        // The corrective reply is returned as-is, without re-validation.
        progress.on_attempt_complete(2, None);
        info!(card = %card, "Returning corrective reply");

        Ok(AnswerOutcome {
            answer: second,
            card,
            attempts: 2,
            first_reply_valid: false,
        })
    }

    /// One bounded, cancellable backend call.
    async fn call_backend(
        &self,
        messages: &[Message],
        temperature: Option<f32>,
        attempt: u8,
        progress: &dyn AnswerProgressNotifier,
    ) -> Result<String, RunAnswerError> {
        let request = CompletionRequest {
            messages: messages.to_vec(),
            model: self.params.model.clone(),
            temperature,
            timeout: self.params.timeout,
        };

        debug!(
            attempt,
            model = %request.model,
            turns = request.messages.len(),
            "Calling backend"
        );
        self.conversation_logger.log(ConversationEvent::new(
            "llm_request",
            serde_json::json!({
                "attempt": attempt,
                "model": request.model.to_string(),
                "temperature": temperature,
                "messages": request.messages,
            }),
        ));

        progress.on_attempt_start(attempt);
        let call = tokio::time::timeout(self.params.timeout, self.gateway.complete(&request));

        let result = if let Some(ref token) = self.cancellation_token {
            tokio::select! {
                biased;
                _ = token.cancelled() => {
                    info!(attempt, "Request cancelled while waiting for backend");
                    return Err(RunAnswerError::Cancelled);
                }
                result = call => result,
            }
        } else {
            call.await
        };

        let result = match result {
            Ok(inner) => inner,
            Err(_) => Err(GatewayError::Timeout),
        };

        match result {
            Ok(text) => {
                self.conversation_logger.log(ConversationEvent::new(
                    "llm_response",
                    serde_json::json!({
                        "attempt": attempt,
                        "model": request.model.to_string(),
                        "bytes": text.len(),
                        "text": text,
                    }),
                ));
                Ok(text)
            }
            Err(e) => {
                warn!(attempt, "Backend call failed: {}", e);
                progress.on_attempt_failed(attempt, &e.to_string());
                self.conversation_logger.log(ConversationEvent::new(
                    "llm_error",
                    serde_json::json!({
                        "attempt": attempt,
                        "error": e.to_string(),
                    }),
                ));
                Err(RunAnswerError::from(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;
    use telcard_domain::{PromptTemplate, Role};

    // ==================== Test Mocks ====================

    struct MockGateway {
        replies: Mutex<VecDeque<Result<String, GatewayError>>>,
        requests: Mutex<Vec<CompletionRequest>>,
    }

    impl MockGateway {
        fn new(replies: Vec<Result<String, GatewayError>>) -> Self {
            Self {
                replies: Mutex::new(VecDeque::from(replies)),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> usize {
            self.requests.lock().unwrap().len()
        }

        fn request(&self, index: usize) -> CompletionRequest {
            self.requests.lock().unwrap()[index].clone()
        }
    }

    #[async_trait]
    impl LlmGateway for MockGateway {
        async fn complete(&self, request: &CompletionRequest) -> Result<String, GatewayError> {
            self.requests.lock().unwrap().push(request.clone());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(GatewayError::RequestFailed("no more replies".to_string())))
        }
    }

    /// Never answers; used for timeout and cancellation.
    struct HangingGateway;

    #[async_trait]
    impl LlmGateway for HangingGateway {
        async fn complete(&self, _request: &CompletionRequest) -> Result<String, GatewayError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(String::new())
        }
    }

    /// Answers the first call, then never answers again.
    struct FirstThenHangGateway {
        first: String,
        calls: std::sync::atomic::AtomicUsize,
    }

    #[async_trait]
    impl LlmGateway for FirstThenHangGateway {
        async fn complete(&self, _request: &CompletionRequest) -> Result<String, GatewayError> {
            let call = self
                .calls
                .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            if call == 0 {
                return Ok(self.first.clone());
            }
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(String::new())
        }
    }

    #[derive(Default)]
    struct RecordingProgress {
        events: Mutex<Vec<String>>,
    }

    impl AnswerProgressNotifier for RecordingProgress {
        fn on_card_selected(&self, card: Card) {
            self.events.lock().unwrap().push(format!("card:{}", card));
        }

        fn on_attempt_start(&self, attempt: u8) {
            self.events.lock().unwrap().push(format!("start:{}", attempt));
        }

        fn on_attempt_complete(&self, attempt: u8, valid: Option<bool>) {
            self.events
                .lock()
                .unwrap()
                .push(format!("done:{}:{:?}", attempt, valid));
        }

        fn on_attempt_failed(&self, attempt: u8, _error: &str) {
            self.events.lock().unwrap().push(format!("failed:{}", attempt));
        }
    }

    #[derive(Default)]
    struct RecordingLogger {
        events: Mutex<Vec<&'static str>>,
    }

    impl ConversationLogger for RecordingLogger {
        fn log(&self, event: ConversationEvent) {
            self.events.lock().unwrap().push(event.event_type);
        }
    }

    fn bullets(n: usize) -> String {
        (1..=n)
            .map(|i| format!("{}. point {}", i, i))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn use_case(gateway: Arc<dyn LlmGateway>) -> RunAnswerUseCase {
        RunAnswerUseCase::new(gateway, PromptAssembler::new("PREAMBLE"))
    }

    // ==================== Tests ====================

    #[tokio::test]
    async fn test_empty_question_makes_no_backend_call() {
        let gateway = Arc::new(MockGateway::new(vec![Ok(bullets(5))]));
        let uc = use_case(gateway.clone());

        let err = uc.answer("", &[]).await.unwrap_err();
        assert!(matches!(err, RunAnswerError::EmptyInput));
        assert!(err.is_user_error());

        let err = uc.answer("   \n\t", &[]).await.unwrap_err();
        assert!(matches!(err, RunAnswerError::EmptyInput));
        assert_eq!(gateway.calls(), 0);
    }

    #[tokio::test]
    async fn test_valid_first_reply_is_returned_after_one_call() {
        let reply = bullets(5);
        let gateway = Arc::new(MockGateway::new(vec![Ok(reply.clone())]));
        let uc = use_case(gateway.clone());

        let outcome = uc
            .execute(RunAnswerInput::new("what is VoNR?"), &NoAnswerProgress)
            .await
            .unwrap();

        assert_eq!(outcome.answer(), reply);
        assert_eq!(outcome.card, Card::Definition);
        assert_eq!(outcome.attempts, 1);
        assert!(outcome.first_reply_valid);
        assert!(!outcome.was_corrected());
        assert_eq!(gateway.calls(), 1);

        let request = gateway.request(0);
        assert_eq!(request.temperature, Some(0.2));
        assert_eq!(request.timeout, Duration::from_secs(20));
        assert_eq!(request.messages.len(), 2);
        assert!(request.messages[0].content.contains("<<CARD=Definition>>"));
        assert_eq!(request.messages[1], Message::user("what is VoNR?"));
    }

    #[tokio::test]
    async fn test_invalid_first_reply_triggers_one_corrective_call() {
        let gateway = Arc::new(MockGateway::new(vec![Ok(bullets(2)), Ok(bullets(6))]));
        let uc = use_case(gateway.clone());

        let outcome = uc
            .execute(
                RunAnswerInput::new("cell experiencing outage"),
                &NoAnswerProgress,
            )
            .await
            .unwrap();

        assert_eq!(outcome.answer, bullets(6));
        assert_eq!(outcome.card, Card::Troubleshooting);
        assert_eq!(outcome.attempts, 2);
        assert!(!outcome.first_reply_valid);
        assert_eq!(gateway.calls(), 2);

        let first = gateway.request(0);
        let second = gateway.request(1);
        assert_eq!(second.model, first.model);
        assert_eq!(second.messages.len(), first.messages.len() + 1);
        assert_eq!(&second.messages[..first.messages.len()], &first.messages[..]);
        let corrective = second.messages.last().unwrap();
        assert_eq!(corrective.role, Role::Assistant);
        assert_eq!(corrective.content, PromptTemplate::corrective_instruction());
        assert_eq!(second.temperature, None);
    }

    #[tokio::test]
    async fn test_corrective_reply_is_not_revalidated() {
        let gateway = Arc::new(MockGateway::new(vec![
            Ok("no bullets".to_string()),
            Ok("still no bullets".to_string()),
            Ok(bullets(5)),
        ]));
        let uc = use_case(gateway.clone());

        let answer = uc.answer("plan a new cluster", &[]).await.unwrap();
        assert_eq!(answer, "still no bullets");
        assert_eq!(gateway.calls(), 2);
    }

    #[tokio::test]
    async fn test_rate_limit_on_first_call_is_upstream_failure() {
        let gateway = Arc::new(MockGateway::new(vec![
            Err(GatewayError::RateLimited("429 Too Many Requests".to_string())),
            Ok(bullets(5)),
        ]));
        let uc = use_case(gateway.clone());

        let err = uc.answer("what is VoNR?", &[]).await.unwrap_err();
        match &err {
            RunAnswerError::UpstreamFailure { source } => assert!(source.is_rate_limited()),
            other => panic!("Expected UpstreamFailure, got {:?}", other),
        }
        // Generic message, no backend details
        assert!(!err.to_string().contains("429"));
        assert_eq!(gateway.calls(), 1);
    }

    #[tokio::test]
    async fn test_failure_on_corrective_call_is_upstream_failure() {
        let gateway = Arc::new(MockGateway::new(vec![
            Ok(bullets(1)),
            Err(GatewayError::ConnectionError("reset".to_string())),
        ]));
        let uc = use_case(gateway.clone());

        let err = uc.answer("alarm on site 7", &[]).await.unwrap_err();
        assert!(matches!(err, RunAnswerError::UpstreamFailure { .. }));
        assert_eq!(gateway.calls(), 2);
    }

    #[tokio::test]
    async fn test_history_is_forwarded_between_system_and_question() {
        let gateway = Arc::new(MockGateway::new(vec![Ok(bullets(5))]));
        let uc = use_case(gateway.clone());
        let history = vec!["define PCI".to_string(), "1. ...".to_string()];

        uc.answer("and what is RSRP?", &history).await.unwrap();

        let request = gateway.request(0);
        assert_eq!(request.messages.len(), 1 + history.len() + 1);
        assert_eq!(request.messages[1], Message::user("define PCI"));
        assert_eq!(request.messages[2], Message::assistant("1. ..."));
        assert_eq!(request.messages[3], Message::user("and what is RSRP?"));
    }

    #[tokio::test]
    async fn test_odd_history_drops_unpaired_last_entry() {
        let gateway = Arc::new(MockGateway::new(vec![Ok(bullets(5))]));
        let uc = use_case(gateway.clone());
        let history = vec![
            "define PCI".to_string(),
            "1. ...".to_string(),
            "dangling".to_string(),
        ];

        let outcome = uc
            .execute(
                RunAnswerInput::new("and what is RSRP?").with_history(history),
                &NoAnswerProgress,
            )
            .await
            .unwrap();
        assert_eq!(outcome.attempts, 1);

        let request = gateway.request(0);
        assert_eq!(request.messages.len(), 4);
        assert_eq!(request.messages[1], Message::user("define PCI"));
        assert_eq!(request.messages[2], Message::assistant("1. ..."));
        assert_eq!(request.messages[3], Message::user("and what is RSRP?"));
        assert!(request.messages.iter().all(|m| m.content != "dangling"));
    }

    #[tokio::test]
    async fn test_reply_with_bare_angle_bracket_is_accepted_first_time() {
        let reply = "1. Handover when RSRP<threshold\n2. b\n3. c\n4. d\n5. e".to_string();
        let gateway = Arc::new(MockGateway::new(vec![Ok(reply.clone()), Ok(bullets(5))]));
        let uc = use_case(gateway.clone());

        let outcome = uc
            .execute(RunAnswerInput::new("explain A3 handover"), &NoAnswerProgress)
            .await
            .unwrap();

        assert_eq!(outcome.answer, reply);
        assert!(outcome.first_reply_valid);
        assert_eq!(gateway.calls(), 1);
    }

    #[tokio::test]
    async fn test_cancellation_during_corrective_call() {
        let gateway = Arc::new(FirstThenHangGateway {
            first: "no bullets here".to_string(),
            calls: Default::default(),
        });
        let token = CancellationToken::new();
        let uc = use_case(gateway.clone()).with_cancellation(token.clone());
        let progress = RecordingProgress::default();

        let cancel = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            token.cancel();
        });

        let err = uc
            .execute(RunAnswerInput::new("cell outage"), &progress)
            .await
            .unwrap_err();
        assert!(err.is_cancelled());
        cancel.await.unwrap();

        assert_eq!(
            gateway.calls.load(std::sync::atomic::Ordering::SeqCst),
            2
        );
        let events = progress.events.lock().unwrap().clone();
        assert_eq!(
            events,
            vec!["card:Troubleshooting", "start:1", "done:1:Some(false)", "start:2"]
        );
    }

    #[tokio::test]
    async fn test_params_are_applied() {
        let gateway = Arc::new(MockGateway::new(vec![Ok(bullets(0)), Ok(bullets(5))]));
        let params = CompletionParams::default()
            .with_model("telcogpt".into())
            .with_temperature(0.7)
            .with_corrective_temperature(Some(0.0));
        let uc = use_case(gateway.clone()).with_params(params);

        uc.answer("design a macro site", &[]).await.unwrap();

        assert_eq!(gateway.request(0).model.as_str(), "telcogpt");
        assert_eq!(gateway.request(0).temperature, Some(0.7));
        assert_eq!(gateway.request(1).temperature, Some(0.0));
    }

    #[tokio::test]
    async fn test_backend_timeout_is_upstream_failure() {
        let params = CompletionParams::default().with_timeout(Duration::from_millis(20));
        let uc = use_case(Arc::new(HangingGateway)).with_params(params);

        let err = uc.answer("what is VoNR?", &[]).await.unwrap_err();
        match err {
            RunAnswerError::UpstreamFailure { source } => {
                assert!(matches!(source, GatewayError::Timeout))
            }
            other => panic!("Expected UpstreamFailure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_cancellation_aborts_in_flight_call() {
        let token = CancellationToken::new();
        let uc = use_case(Arc::new(HangingGateway)).with_cancellation(token.clone());

        let cancel = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            token.cancel();
        });

        let err = uc.answer("what is VoNR?", &[]).await.unwrap_err();
        assert!(err.is_cancelled());
        cancel.await.unwrap();
    }

    #[tokio::test]
    async fn test_progress_events_for_corrected_request() {
        let gateway = Arc::new(MockGateway::new(vec![Ok(bullets(3)), Ok(bullets(5))]));
        let uc = use_case(gateway);
        let progress = RecordingProgress::default();

        uc.execute(RunAnswerInput::new("cell experiencing outage"), &progress)
            .await
            .unwrap();

        let events = progress.events.lock().unwrap().clone();
        assert_eq!(
            events,
            vec![
                "card:Troubleshooting",
                "start:1",
                "done:1:Some(false)",
                "start:2",
                "done:2:None",
            ]
        );
    }

    #[tokio::test]
    async fn test_conversation_events_are_logged() {
        let gateway = Arc::new(MockGateway::new(vec![
            Ok(bullets(2)),
            Err(GatewayError::Timeout),
        ]));
        let logger = Arc::new(RecordingLogger::default());
        let uc = use_case(gateway).with_conversation_logger(logger.clone());

        let _ = uc.answer("what is VoNR?", &[]).await;

        let events = logger.events.lock().unwrap().clone();
        assert_eq!(
            events,
            vec![
                "card_selected",
                "llm_request",
                "llm_response",
                "reply_rejected",
                "llm_request",
                "llm_error",
            ]
        );
    }
}
