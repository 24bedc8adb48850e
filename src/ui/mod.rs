mod output;

pub use output::{
    display_error, display_fragment, display_history, display_reply, display_tool_call,
    display_tool_outcome, display_turn_summary, display_turn_event, finish_stream,
    format_history_line, ReplyLabel,
};
