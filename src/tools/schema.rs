use serde_json::{json, Value};

pub const EXTRACT_MEETING_INTENT: &str = "extract_meeting_intent";
pub const EXTRACT_EMAIL_INTENT: &str = "extract_email_intent";
pub const TRIGGER_N8N_WEBHOOK: &str = "trigger_n8n_webhook";

pub const DEFAULT_MEETING_MINUTES: u32 = 30;

pub fn meeting_intent_parameters() -> Value {
    json!({
        "type": "object",
        "properties": {
            "attendee_name": {
                "type": "string",
                "description": "Name of the person to meet with"
            },
            "attendee_email": {
                "type": "string",
                "description": "Email address of the attendee"
            },
            "topic": {
                "type": "string",
                "description": "Subject or topic of the meeting"
            },
            "preferred_time": {
                "type": ["string", "null"],
                "description": "Preferred time for the meeting (e.g., 'Tuesday 2pm', 'next week Monday', 'tomorrow at 3pm'). Leave as null if not specified."
            },
            "duration_minutes": {
                "type": "integer",
                "description": "Duration of the meeting in minutes. Default to 30 if not specified.",
                "default": DEFAULT_MEETING_MINUTES
            }
        },
        "required": ["attendee_email", "topic"]
    })
}

pub fn email_intent_parameters() -> Value {
    json!({
        "type": "object",
        "properties": {
            "recipient_email": {
                "type": "string",
                "description": "Email address of the recipient"
            },
            "subject": {
                "type": "string",
                "description": "Subject line of the email"
            },
            "message": {
                "type": "string",
                "description": "Body/content of the email message"
            }
        },
        "required": ["recipient_email", "subject", "message"]
    })
}

pub fn webhook_parameters() -> Value {
    json!({
        "type": "object",
        "properties": {
            "action": {
                "type": "string",
                "enum": ["book_meeting", "send_email"],
                "description": "The action to perform: 'book_meeting' or 'send_email'"
            },
            "data": {
                "type": "object",
                "description": "Structured data for the action. For book_meeting: MUST include attendee_email, topic, and preferred_time. Optionally include attendee_name and duration_minutes. For send_email: MUST include recipient_email, subject, and message. Pass all fields as a flat object, e.g. {'attendee_email': 'john@example.com', 'topic': 'meeting', 'preferred_time': 'Tuesday 2pm'}",
                "properties": {
                    "attendee_email": {"type": "string", "description": "Email of meeting attendee (for book_meeting)"},
                    "attendee_name": {"type": "string", "description": "Name of meeting attendee (for book_meeting)"},
                    "topic": {"type": "string", "description": "Meeting topic/subject (for book_meeting)"},
                    "preferred_time": {"type": "string", "description": "Preferred meeting time (for book_meeting)"},
                    "duration_minutes": {"type": "integer", "description": "Meeting duration in minutes (for book_meeting)"},
                    "recipient_email": {"type": "string", "description": "Email recipient (for send_email)"},
                    "subject": {"type": "string", "description": "Email subject (for send_email)"},
                    "message": {"type": "string", "description": "Email message body (for send_email)"}
                }
            }
        },
        "required": ["action", "data"]
    })
}
