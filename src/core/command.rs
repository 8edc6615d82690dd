//! Command parser for the : command system

/// Parsed command from user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    // Session
    Quit,
    Help,
    Refresh,

    // Listing scope
    Wallet(Option<String>),
    Filter(Option<String>),

    // Row actions
    Copy,
    Export,
    Deploy(Option<String>),

    // Contract widgets
    Permissions,
    Currency,
    Reveal(Option<String>),
    Media(Option<String>),

    // Endpoint management
    Connect(String),

    // Unknown command
    Unknown(String),
}

/// Parse a command string (without the leading :)
pub fn parse_command(input: &str) -> Command {
    let input = input.trim();
    let mut parts = input.splitn(2, ' ');
    let cmd = parts.next().unwrap_or("");
    let args = parts.next().map(|s| s.trim().to_string());

    match cmd.to_lowercase().as_str() {
        // Session
        "q" | "quit" | "exit" => Command::Quit,
        "help" | "h" => Command::Help,
        "refresh" | "reload" => Command::Refresh,

        // Listing scope
        "wallet" | "w" => Command::Wallet(args),
        "filter" | "f" => Command::Filter(args),
        "clear" | "reset" => Command::Filter(Some("clear".to_string())),

        // Row actions
        "copy" | "cp" => Command::Copy,
        "export" | "csv" => Command::Export,
        "deploy" | "new" => Command::Deploy(args),

        // Contract widgets
        "permissions" | "perms" | "roles" => Command::Permissions,
        "currency" | "cur" => Command::Currency,
        "reveal" => Command::Reveal(args),
        "media" | "file" => Command::Media(args),

        // Endpoint management
        "connect" | "conn" => {
            if let Some(spec) = args {
                Command::Connect(spec)
            } else {
                Command::Unknown(input.to_string())
            }
        }

        _ => Command::Unknown(input.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_session_commands() {
        assert_eq!(parse_command("q"), Command::Quit);
        assert_eq!(parse_command("quit"), Command::Quit);
        assert_eq!(parse_command("help"), Command::Help);
        assert_eq!(parse_command("refresh"), Command::Refresh);
    }

    #[test]
    fn test_parse_scope_commands() {
        assert_eq!(parse_command("wallet"), Command::Wallet(None));
        assert_eq!(
            parse_command("wallet 0x1234"),
            Command::Wallet(Some("0x1234".to_string()))
        );
        assert_eq!(
            parse_command("filter type:nft-drop chain:polygon"),
            Command::Filter(Some("type:nft-drop chain:polygon".to_string()))
        );
        assert_eq!(
            parse_command("clear"),
            Command::Filter(Some("clear".to_string()))
        );
    }

    #[test]
    fn test_parse_row_commands() {
        assert_eq!(parse_command("copy"), Command::Copy);
        assert_eq!(parse_command("export"), Command::Export);
        assert_eq!(parse_command("deploy"), Command::Deploy(None));
        assert_eq!(
            parse_command("deploy polygon"),
            Command::Deploy(Some("polygon".to_string()))
        );
    }

    #[test]
    fn test_parse_widget_commands() {
        assert_eq!(parse_command("permissions"), Command::Permissions);
        assert_eq!(parse_command("roles"), Command::Permissions);
        assert_eq!(parse_command("currency"), Command::Currency);
        assert_eq!(
            parse_command("reveal 3"),
            Command::Reveal(Some("3".to_string()))
        );
        assert_eq!(
            parse_command("media ./art"),
            Command::Media(Some("./art".to_string()))
        );
    }

    #[test]
    fn test_parse_connect_requires_args() {
        assert_eq!(
            parse_command("connect polygon=https://rpc.example"),
            Command::Connect("polygon=https://rpc.example".to_string())
        );
        assert_eq!(
            parse_command("connect"),
            Command::Unknown("connect".to_string())
        );
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(
            parse_command("notacommand"),
            Command::Unknown("notacommand".to_string())
        );
    }
}
