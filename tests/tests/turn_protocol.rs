use application::chat_service::{ChatService, DocumentStatus};
use application::session_registry::SessionRegistry;
use domain::conversation::{Role, Turn};
use domain::document::UploadedDocument;
use domain::error::CompletionError;
use infrastructure::completion_client::HttpCompletionClient;
use infrastructure::config::Config;
use infrastructure::pdf_extractor::PdfTextExtractor;
use tests::{canned_endpoint, reply_body, CountingExtractor, SequentialBackend};

const SYSTEM: &str = "You are a helpful assistant.";

fn endpoint_config(url: String) -> Config {
    Config {
        api_key: Some("sk-integration".into()),
        api_url: Some(url),
        model: Some("gpt-oss-120b".into()),
        system_prompt: SYSTEM.into(),
    }
}

#[tokio::test]
async fn upload_then_ask_records_raw_question_and_reply() {
    let chat = ChatService::new(
        CountingExtractor::default().with(b"q3-report", "Revenue grew 10%."),
        SequentialBackend::replying(&["Revenue grew by ten percent."]),
        SYSTEM,
    );
    let mut registry = SessionRegistry::new();
    let id = registry.create();
    let session = registry.get_mut(&id).unwrap();
    session.attach_document(UploadedDocument::new("doc.pdf", b"q3-report".to_vec()));

    let report = chat.handle_input(session, "What grew?").await.unwrap();

    assert_eq!(
        report.effective_prompt,
        "--- DOCUMENT CONTEXT ---\nRevenue grew 10%.\n--- END CONTEXT ---\n\nUser Question: What grew?"
    );
    assert_eq!(
        registry.get(&id).unwrap().conversation.turns(),
        &[
            Turn::user("What grew?"),
            Turn::assistant("Revenue grew by ten percent.")
        ]
    );
}

#[tokio::test]
async fn n_questions_against_one_document_extract_once() {
    let questions = ["What grew?", "By how much?", "Compared to what?", "Why?"];
    let chat = ChatService::new(
        CountingExtractor::default().with(b"q3-report", "Revenue grew 10%."),
        SequentialBackend::replying(&["a", "b", "c", "d"]),
        SYSTEM,
    );
    let mut registry = SessionRegistry::new();
    let id = registry.create();
    let session = registry.get_mut(&id).unwrap();
    session.attach_document(UploadedDocument::new("doc.pdf", b"q3-report".to_vec()));

    for (i, question) in questions.iter().enumerate() {
        let report = chat.handle_input(session, question).await.unwrap();
        let expected = if i == 0 {
            DocumentStatus::Extracted
        } else {
            DocumentStatus::Cached
        };
        assert_eq!(report.document, expected);
    }
    assert_eq!(chat.extractor().calls(), 1);
    assert_eq!(session.conversation.len(), questions.len() * 2);
}

#[tokio::test]
async fn switching_files_between_questions_reextracts() {
    let chat = ChatService::new(
        CountingExtractor::default()
            .with(b"first", "Revenue grew 10%.")
            .with(b"second", "Headcount fell."),
        SequentialBackend::replying(&["a", "b"]),
        SYSTEM,
    );
    let mut registry = SessionRegistry::new();
    let id = registry.create();
    let session = registry.get_mut(&id).unwrap();

    session.attach_document(UploadedDocument::new("doc.pdf", b"first".to_vec()));
    chat.handle_input(session, "What grew?").await.unwrap();
    session.attach_document(UploadedDocument::new("doc2.pdf", b"second".to_vec()));
    let report = chat.handle_input(session, "What fell?").await.unwrap();

    assert_eq!(chat.extractor().calls(), 2);
    assert!(report.effective_prompt.contains("Headcount fell."));
}

#[tokio::test]
async fn failure_appends_one_turn_success_appends_two() {
    let chat = ChatService::new(
        CountingExtractor::default(),
        SequentialBackend::new(vec![
            Err(CompletionError::Transport("dns error".into())),
            Ok("Hello!".into()),
        ]),
        SYSTEM,
    );
    let mut registry = SessionRegistry::new();
    let id = registry.create();
    let session = registry.get_mut(&id).unwrap();

    let before = session.conversation.len();
    let failed = chat.handle_input(session, "Hi?").await.unwrap();
    assert_eq!(session.conversation.len(), before + 1);
    assert!(!failed.error_message().unwrap().is_empty());

    let before = session.conversation.len();
    chat.handle_input(session, "Hi again?").await.unwrap();
    assert_eq!(session.conversation.len(), before + 2);
    let roles: Vec<Role> = session.conversation.turns().iter().map(Turn::role).collect();
    assert_eq!(roles, vec![Role::User, Role::User, Role::Assistant]);
}

#[tokio::test]
async fn destroyed_session_starts_fresh() {
    let chat = ChatService::new(
        CountingExtractor::default().with(b"doc", "text"),
        SequentialBackend::replying(&["a", "b"]),
        SYSTEM,
    );
    let mut registry = SessionRegistry::new();
    let first = registry.create();
    let session = registry.get_mut(&first).unwrap();
    session.attach_document(UploadedDocument::new("doc.pdf", b"doc".to_vec()));
    chat.handle_input(session, "q").await.unwrap();

    assert!(registry.destroy(&first));
    let second = registry.create();
    let session = registry.get_mut(&second).unwrap();
    assert!(session.conversation.is_empty());
    assert!(session.document().is_none());

    let report = chat.handle_input(session, "q").await.unwrap();
    assert_eq!(report.effective_prompt, "User Question: q");
    assert_eq!(
        chat.backend().requests()[1],
        vec![Turn::system(SYSTEM), Turn::user("q"), Turn::user("User Question: q")]
    );
}

#[tokio::test]
async fn real_client_against_canned_endpoint() {
    let url = canned_endpoint("200 OK", reply_body("It grew.")).await;
    let chat = ChatService::new(
        CountingExtractor::default(),
        HttpCompletionClient::new(endpoint_config(url)).unwrap(),
        SYSTEM,
    );
    let mut registry = SessionRegistry::new();
    let id = registry.create();
    let session = registry.get_mut(&id).unwrap();

    let report = chat.handle_input(session, "What grew?").await.unwrap();
    assert_eq!(report.reply(), Some("It grew."));
    assert_eq!(session.conversation.len(), 2);
}

#[tokio::test]
async fn empty_choices_surface_as_error_without_assistant_turn() {
    let url = canned_endpoint("200 OK", r#"{"choices":[]}"#.to_string()).await;
    let chat = ChatService::new(
        CountingExtractor::default(),
        HttpCompletionClient::new(endpoint_config(url)).unwrap(),
        SYSTEM,
    );
    let mut registry = SessionRegistry::new();
    let id = registry.create();
    let session = registry.get_mut(&id).unwrap();

    let report = chat.handle_input(session, "What grew?").await.unwrap();
    assert!(matches!(report.outcome, Err(CompletionError::ResponseShape(_))));
    assert_eq!(session.conversation.turns(), &[Turn::user("What grew?")]);
}

#[tokio::test]
async fn unconfigured_client_reports_setting_and_keeps_question() {
    let mut config = endpoint_config("http://127.0.0.1:9/unused".into());
    config.api_url = None;
    let chat = ChatService::new(
        CountingExtractor::default(),
        HttpCompletionClient::new(config).unwrap(),
        SYSTEM,
    );
    let mut registry = SessionRegistry::new();
    let id = registry.create();
    let session = registry.get_mut(&id).unwrap();

    let report = chat.handle_input(session, "Anyone there?").await.unwrap();
    assert!(report.error_message().unwrap().contains("TLDR_API_URL"));
    assert_eq!(session.conversation.len(), 1);
}

#[tokio::test]
async fn real_extractor_rejects_non_pdf_upload_but_question_is_sent() {
    let chat = ChatService::new(
        PdfTextExtractor::new(),
        SequentialBackend::replying(&["No document, but hello."]),
        SYSTEM,
    );
    let mut registry = SessionRegistry::new();
    let id = registry.create();
    let session = registry.get_mut(&id).unwrap();
    session.attach_document(UploadedDocument::new("fake.pdf", b"<html>not a pdf</html>".to_vec()));

    let report = chat.handle_input(session, "Summarize").await.unwrap();
    assert!(matches!(report.document, DocumentStatus::Failed(_)));
    assert_eq!(report.effective_prompt, "User Question: Summarize");
    assert_eq!(report.reply(), Some("No document, but hello."));
}
