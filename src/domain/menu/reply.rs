//! Outgoing protocol message.

/// One turn's response, marked as continuing or terminating the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnReply {
    /// Session continues; the gateway will prompt for more input.
    Continue(String),
    /// Session terminates; the gateway will not prompt further.
    End(String),
}

impl TurnReply {
    /// Returns the message body without the protocol prefix.
    pub fn message(&self) -> &str {
        match self {
            TurnReply::Continue(msg) | TurnReply::End(msg) => msg,
        }
    }

    /// Returns true if this reply terminates the session.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TurnReply::End(_))
    }

    /// Encodes the reply as the gateway wire format.
    ///
    /// Multi-line menus stay newline-separated inside the single body.
    pub fn to_protocol_string(&self) -> String {
        match self {
            TurnReply::Continue(msg) => format!("CON {}", msg),
            TurnReply::End(msg) => format!("END {}", msg),
        }
    }
}
