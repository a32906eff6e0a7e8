use wordfreq_core::Msg;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Msg(Msg),
    Help,
    Quit,
    Unknown(String),
}

/// Map one line of user input to a command.
pub fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let command = match word.to_ascii_lowercase().as_str() {
        "fetch" | "f" | "submit" => Command::Msg(Msg::FetchClicked),
        "export" | "e" => Command::Msg(Msg::ExportClicked),
        "back" | "b" => Command::Msg(Msg::BackClicked),
        "url" | "u" if !rest.trim().is_empty() => {
            Command::Msg(Msg::SourceUrlChanged(rest.trim().to_string()))
        }
        "help" | "h" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        _ => Command::Unknown(line.to_string()),
    };
    Some(command)
}

pub fn help_text() -> &'static str {
    "Commands:\n  \
     fetch          fetch and analyze the document\n  \
     export         write histogram-data.csv\n  \
     back           return to the start screen\n  \
     url <address>  change the document address\n  \
     help           show this help\n  \
     quit           exit\n"
}
