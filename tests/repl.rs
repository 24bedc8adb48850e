mod common;

use common::MockTransport;
use pa_agent::agent::Agent;
use pa_agent::api::CompletionOptions;
use pa_agent::models::Role;
use pa_agent::repl::{run_with, ReplCommand, ReplOptions};

#[test]
fn test_parse_commands_case_insensitively() {
    assert_eq!(ReplCommand::parse("quit"), ReplCommand::Quit);
    assert_eq!(ReplCommand::parse("  QUIT \n"), ReplCommand::Quit);
    assert_eq!(ReplCommand::parse("History"), ReplCommand::History);
    assert_eq!(ReplCommand::parse("clear"), ReplCommand::Clear);
    assert_eq!(ReplCommand::parse("help"), ReplCommand::Help);
    assert_eq!(ReplCommand::parse("   "), ReplCommand::Skip);
    assert_eq!(
        ReplCommand::parse("  quit smoking tips "),
        ReplCommand::Say("quit smoking tips".to_string())
    );
}

fn chat_agent(transport: std::sync::Arc<MockTransport>) -> Agent {
    Agent::new(transport, CompletionOptions::new("test/model")).with_system_prompt("sys")
}

#[tokio::test]
async fn test_commands_never_reach_the_model() {
    let transport = MockTransport::new();
    transport.queue_text("Hello!");
    let mut agent = chat_agent(transport.clone());

    let input: &[u8] = b"hi\nhistory\n\nhelp\nquit\nnever sent\n";
    run_with(&mut agent, ReplOptions::default(), input).await.unwrap();

    assert_eq!(transport.call_count(), 1);
    assert_eq!(transport.requests()[0].messages.last().unwrap().content_or_empty(), "hi");
    assert_eq!(agent.history().len(), 3);
}

#[tokio::test]
async fn test_clear_keeps_system_prompt() {
    let transport = MockTransport::new();
    transport.queue_text("Hello!");
    let mut agent = chat_agent(transport.clone());

    let input: &[u8] = b"hi\nclear\n";
    run_with(&mut agent, ReplOptions::default(), input).await.unwrap();

    assert_eq!(agent.history().len(), 1);
    assert_eq!(agent.history()[0].role, Role::System);
}

#[tokio::test]
async fn test_failed_turn_does_not_end_session() {
    let transport = MockTransport::new();
    transport.queue(Err(pa_agent::AgentError::Api {
        status: 503,
        message: "busy".to_string(),
    }));
    transport.queue_text("Back again.");
    let mut agent = chat_agent(transport.clone());

    let input: &[u8] = b"first\nsecond\n";
    run_with(&mut agent, ReplOptions::default(), input).await.unwrap();

    assert_eq!(transport.call_count(), 2);
    assert_eq!(agent.history().last().unwrap().content_or_empty(), "Back again.");
}

#[tokio::test]
async fn test_streaming_session_records_reply() {
    let transport = MockTransport::new();
    transport.queue_stream(vec![Ok("Hel".to_string()), Ok("lo".to_string())]);
    let mut agent = chat_agent(transport.clone());

    let options = ReplOptions {
        stream: true,
        ..ReplOptions::default()
    };
    let input: &[u8] = b"hi\n";
    run_with(&mut agent, options, input).await.unwrap();

    assert!(transport.requests()[0].streaming);
    assert_eq!(agent.history().last().unwrap().content_or_empty(), "Hello");
}

#[test]
fn test_history_lines_name_tools() {
    use pa_agent::models::{Message, ToolCall};
    use pa_agent::ui::format_history_line;

    let announce = Message::assistant_tool_calls(
        None,
        vec![ToolCall::function("call_1", "extract_email_intent", "{}")],
    );
    assert_eq!(
        format_history_line(&announce),
        "Assistant: [tool calls: extract_email_intent]"
    );

    let result = Message::tool_result("call_1", "extract_email_intent", "{\"status\":\"extracted\"}");
    assert_eq!(
        format_history_line(&result),
        "Tool (extract_email_intent): {\"status\":\"extracted\"}"
    );

    assert_eq!(format_history_line(&Message::user("hi")), "User: hi");
}
