use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc::{self, UnboundedReceiver};

use super::*;
use crate::backend::{MockTransport, Transport};
use crate::config::constants::FALLBACK_QUESTION;
use crate::models::{
    MockContextProvider, NoticeKind, ReplyInteraction, ReplyMessage, StaticContext,
};
use crate::popover::registry::MockChatRegistry;
use crate::popover::roles::ALERT_ANALYSIS_ROLE;

fn reply(conversation_id: &str, summary: &str) -> SendMessageResponse {
    SendMessageResponse {
        interactions: vec![ReplyInteraction::new("older"), ReplyInteraction::new(conversation_id)],
        messages: vec![ReplyMessage::output(summary)],
    }
}

fn transport_replying(reply: SendMessageResponse) -> MockTransport {
    let mut transport = MockTransport::new();
    transport
        .expect_send_message()
        .times(1)
        .returning(move |_| Ok(reply.clone()));
    transport
}

fn new_popover(
    insight: IncontextInsight,
    transport: MockTransport,
) -> (SummaryPopover, UnboundedReceiver<Event>) {
    let (tx, rx) = mpsc::unbounded_channel::<Event>();
    let event_tx: ArcEventTx = Arc::new(tx);
    (
        SummaryPopover::new(insight, Arc::new(transport), event_tx),
        rx,
    )
}

#[tokio::test]
async fn test_generate_summary_uses_fallback_question() {
    let mut transport = MockTransport::new();
    transport
        .expect_send_message()
        .withf(|req| req.input.content == FALLBACK_QUESTION && req.messages.is_empty())
        .times(1)
        .returning(|_| Ok(reply("conv-1", "summary")));

    let (mut popover, _rx) = new_popover(IncontextInsight::new("alerts"), transport);
    assert_eq!(popover.question(), "Please summarize the input");
    popover.generate_summary().await;
    assert!(popover.is_llm_responded());
}

#[tokio::test]
async fn test_generate_summary_uses_first_suggestion() {
    let mut transport = MockTransport::new();
    transport
        .expect_send_message()
        .withf(|req| req.input.content == "Q1")
        .times(1)
        .returning(|_| Ok(reply("conv-1", "summary")));

    let insight = IncontextInsight::new("alerts")
        .with_suggestions(vec!["Q1".to_string(), "Q2".to_string()]);
    let (mut popover, _rx) = new_popover(insight, transport);
    popover.generate_summary().await;
    assert!(popover.is_llm_responded());
}

#[tokio::test]
async fn test_generate_summary_completes() {
    let mut provider = MockContextProvider::new();
    provider
        .expect_context()
        .times(1)
        .returning(|| Ok("alert: cpu above 90%".to_string()));

    let mut transport = MockTransport::new();
    transport
        .expect_send_message()
        .withf(|req| {
            let context = req.input.context.as_ref();
            context.map(|c| c.content.as_str()) == Some("alert: cpu above 90%")
                && context.and_then(|c| c.data_source_id.as_deref()) == Some("ds-1")
                && req.input.prompt_prefix.as_deref() == Some(ALERT_ANALYSIS_ROLE)
                && req.input.content_type == "text"
        })
        .times(1)
        .returning(|_| Ok(reply("conv-42", "CPU has been saturated for an hour.")));

    let insight = IncontextInsight::new("alerts")
        .with_datasource_id(Some("ds-1".to_string()))
        .with_context_provider(Arc::new(provider));
    let (mut popover, mut rx) = new_popover(insight, transport);

    assert_eq!(popover.state(), &SummaryState::Idle);
    let state = popover.generate_summary().await.clone();

    assert_eq!(
        state,
        SummaryState::Completed(Summary {
            text: "CPU has been saturated for an hour.".to_string(),
            conversation_id: "conv-42".to_string(),
        })
    );
    assert!(!popover.is_loading());
    assert!(popover.is_llm_responded());
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_generate_summary_without_role_sends_null_prefix() {
    let mut transport = MockTransport::new();
    transport
        .expect_send_message()
        .withf(|req| {
            req.input.prompt_prefix.is_none()
                && req.input.context.as_ref().map(|c| c.content.as_str()) == Some("")
        })
        .times(1)
        .returning(|_| Ok(reply("conv-1", "summary")));

    let (mut popover, _rx) = new_popover(IncontextInsight::new("dashboards"), transport);
    popover.generate_summary().await;
    assert!(popover.is_llm_responded());
}

#[tokio::test]
async fn test_generate_summary_transport_failure() {
    let mut transport = MockTransport::new();
    transport
        .expect_send_message()
        .times(1)
        .returning(|_| Err(eyre::eyre!("connection refused")));

    let (mut popover, mut rx) = new_popover(IncontextInsight::new("alerts"), transport);
    let state = popover.generate_summary().await;

    assert_eq!(state, &SummaryState::Idle);
    assert!(!popover.is_loading());
    assert!(!popover.is_llm_responded());
    assert!(popover.summary().is_none());

    match rx.try_recv() {
        Ok(Event::Notice(notice)) => {
            assert_eq!(notice.kind(), NoticeKind::Danger);
            assert_eq!(notice.message(), "Generate summary error");
        }
        event => panic!("Unexpected event: {:?}", event),
    }
}

#[tokio::test]
async fn test_generate_summary_retry_after_failure() {
    let mut transport = MockTransport::new();
    let mut seq = mockall::Sequence::new();
    transport
        .expect_send_message()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Err(eyre::eyre!("timeout")));
    transport
        .expect_send_message()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(reply("conv-2", "second try")));

    let (mut popover, _rx) = new_popover(IncontextInsight::new("alerts"), transport);
    assert_eq!(popover.generate_summary().await, &SummaryState::Idle);
    assert!(popover.generate_summary().await != &SummaryState::Idle);
    assert_eq!(
        popover.summary().map(|s| s.text.as_str()),
        Some("second try")
    );
}

#[tokio::test]
async fn test_generate_summary_context_failure() {
    let mut provider = MockContextProvider::new();
    provider
        .expect_context()
        .times(1)
        .returning(|| Err(eyre::eyre!("alert not found")));

    let mut transport = MockTransport::new();
    transport.expect_send_message().times(0);

    let insight = IncontextInsight::new("alerts").with_context_provider(Arc::new(provider));
    let (mut popover, mut rx) = new_popover(insight, transport);

    assert_eq!(popover.generate_summary().await, &SummaryState::Idle);
    assert!(matches!(rx.try_recv(), Ok(Event::Notice(_))));
}

#[tokio::test]
async fn test_generate_summary_ignored_when_not_idle() {
    let transport = transport_replying(reply("conv-1", "summary"));
    let (mut popover, _rx) = new_popover(IncontextInsight::new("alerts"), transport);

    popover.generate_summary().await;
    let state = popover.generate_summary().await;
    assert_eq!(
        state,
        &SummaryState::Completed(Summary {
            text: "summary".to_string(),
            conversation_id: "conv-1".to_string(),
        })
    );
}

#[tokio::test]
async fn test_generate_summary_partial_reply() {
    let transport = transport_replying(SendMessageResponse {
        interactions: vec![ReplyInteraction::new("conv-7")],
        messages: vec![ReplyMessage {
            message_type: "input".to_string(),
            content: serde_json::json!("question"),
        }],
    });
    let insight =
        IncontextInsight::new("alerts").with_context_provider(Arc::new(StaticContext(
            "ctx".to_string(),
        )));
    let (mut popover, _rx) = new_popover(insight, transport);

    let state = popover.generate_summary().await;
    assert_eq!(
        state,
        &SummaryState::Completed(Summary {
            text: String::new(),
            conversation_id: "conv-7".to_string(),
        })
    );
}

#[test]
fn test_apply_empty_reply_keeps_values() {
    let mut summary = Summary {
        text: "previous".to_string(),
        conversation_id: "conv-0".to_string(),
    };
    summary.apply_reply(&SendMessageResponse::default());
    assert_eq!(summary.text, "previous");
    assert_eq!(summary.conversation_id, "conv-0");
}

#[test]
fn test_apply_reply_ignores_trailing_non_output() {
    let mut summary = Summary {
        text: "previous".to_string(),
        conversation_id: "conv-0".to_string(),
    };
    summary.apply_reply(&SendMessageResponse {
        interactions: vec![],
        messages: vec![
            ReplyMessage::output("earlier output"),
            ReplyMessage {
                message_type: "input".to_string(),
                content: serde_json::json!("follow up"),
            },
        ],
    });
    assert_eq!(summary.text, "previous");
    assert_eq!(summary.conversation_id, "conv-0");

    summary.apply_reply(&reply("conv-9", "new text"));
    assert_eq!(summary.text, "new text");
    assert_eq!(summary.conversation_id, "conv-9");
}

#[tokio::test]
async fn test_continue_in_chat() {
    let transport = transport_replying(reply("conv-42", "summary"));

    let mut registry = MockChatRegistry::new();
    registry
        .expect_continue_in_chat()
        .withf(|insight, conversation_id| insight.key() == "alerts" && conversation_id == "conv-42")
        .times(1)
        .returning(|_, _| Ok(()));

    let (popover, mut rx) = new_popover(IncontextInsight::new("alerts"), transport);
    let mut popover = popover_with_registry(popover, registry);

    popover.generate_summary().await;
    popover
        .continue_in_chat()
        .await
        .expect("failed to continue in chat");

    assert_eq!(popover.state(), &SummaryState::Closed);
    assert!(matches!(rx.try_recv(), Ok(Event::ClosePopover)));

    let err = popover.continue_in_chat().await.unwrap_err();
    assert!(matches!(err, PopoverError::NotCompleted("closed")));
}

fn popover_with_registry(popover: SummaryPopover, registry: MockChatRegistry) -> SummaryPopover {
    popover.with_registry(Arc::new(registry))
}

#[tokio::test]
async fn test_continue_in_chat_requires_summary() {
    let mut transport = MockTransport::new();
    transport.expect_send_message().times(0);

    let (mut popover, mut rx) = new_popover(IncontextInsight::new("alerts"), transport);
    let err = popover.continue_in_chat().await.unwrap_err();

    assert!(matches!(err, PopoverError::NotCompleted("idle")));
    assert_eq!(popover.state(), &SummaryState::Idle);
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_continue_in_chat_registry_failure_keeps_popover_open() {
    let transport = transport_replying(reply("conv-1", "summary"));
    let mut registry = MockChatRegistry::new();
    registry
        .expect_continue_in_chat()
        .times(1)
        .returning(|_, _| Err(eyre::eyre!("chat unavailable")));

    let (popover, mut rx) = new_popover(IncontextInsight::new("alerts"), transport);
    let mut popover = popover_with_registry(popover, registry);

    popover.generate_summary().await;
    let err = popover.continue_in_chat().await.unwrap_err();

    assert!(matches!(err, PopoverError::Registry(_)));
    assert!(popover.is_llm_responded());
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_generate_summary_after_teardown() {
    let mut transport = MockTransport::new();
    transport.expect_send_message().times(0);

    let token = CancellationToken::new();
    let (popover, _rx) = new_popover(IncontextInsight::new("alerts"), transport);
    let mut popover = popover.with_cancel_token(token.clone());

    token.cancel();
    assert_eq!(popover.generate_summary().await, &SummaryState::Closed);
}

/// Never answers, so only teardown can end a generation cycle.
struct PendingTransport;

#[async_trait]
impl Transport for PendingTransport {
    fn name(&self) -> &str {
        "pending"
    }

    async fn send_message(&self, _request: SendMessageRequest) -> Result<SendMessageResponse> {
        std::future::pending().await
    }
}

#[tokio::test]
async fn test_teardown_discards_in_flight_reply() {
    let (tx, mut rx) = mpsc::unbounded_channel::<Event>();
    let token = CancellationToken::new();
    let mut popover = SummaryPopover::new(
        IncontextInsight::new("alerts"),
        Arc::new(PendingTransport),
        Arc::new(tx),
    )
    .with_cancel_token(token.clone());

    let canceller = tokio::spawn(async move { token.cancel() });
    let state = popover.generate_summary().await.clone();
    canceller.await.expect("canceller panicked");

    assert_eq!(state, SummaryState::Closed);
    assert!(rx.try_recv().is_err());
}
