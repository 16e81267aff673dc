/// Fixed texts shown on the public-facing display.
///
/// Operator-visible feedback is limited to these messages and the greeting.
/// Error detail goes to the log, never to the screen.
pub struct DisplayMessages;

impl DisplayMessages {
    /// Prefix of the greeting shown on a granted swipe.
    pub const GREETING_PREFIX: &'static str = "Hello";

    /// Unknown or malformed badge.
    pub const ACCESS_DENIED: &'static str = "Access Denied";

    /// Store unreachable or lock link down.
    pub const SERVICE_UNAVAILABLE: &'static str = "Door Unavailable";

    /// Second line under [`SERVICE_UNAVAILABLE`](Self::SERVICE_UNAVAILABLE).
    pub const SEE_ATTENDANT: &'static str = "Please See Attendant";

    /// Greeting for a resolved credential.
    ///
    /// ```
    /// use doorkeep_terminal::DisplayMessages;
    ///
    /// assert_eq!(DisplayMessages::greeting("Alice"), "Hello Alice");
    /// assert_eq!(DisplayMessages::greeting("  "), "Hello");
    /// ```
    pub fn greeting(display_name: &str) -> String {
        let name = display_name.trim();
        if name.is_empty() {
            Self::GREETING_PREFIX.to_string()
        } else {
            format!("{} {}", Self::GREETING_PREFIX, name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_messages_are_ascii() {
        for message in [
            DisplayMessages::ACCESS_DENIED,
            DisplayMessages::SERVICE_UNAVAILABLE,
            DisplayMessages::SEE_ATTENDANT,
        ] {
            assert!(message.is_ascii());
            assert!(message.len() <= doorkeep_core::constants::DEFAULT_DISPLAY_COLUMNS);
        }
    }

    #[test]
    fn test_greeting_trims_name() {
        assert_eq!(DisplayMessages::greeting(" Bob \n"), "Hello Bob");
    }
}
