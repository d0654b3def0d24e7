//! Parsing of what the user types into the chat input.

/// One line of user input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Input<'a> {
    /// A message for the chatbot.
    Message(&'a str),
    /// A slash command for the session itself.
    Command(Command<'a>),
}

/// Slash commands understood by the terminal front-end.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command<'a> {
    /// `/clear`: start the conversation over.
    Clear,
    /// `/history`: print the conversation so far.
    History,
    /// `/export`: print the conversation as JSON.
    Export,
    /// `/model [id]`: show or switch the model.
    Model(Option<&'a str>),
    /// `/key`: enter a new API key.
    Key,
    /// `/help`: list the commands.
    Help,
    /// `/quit` or `/exit`: end the session.
    Quit,
    /// Anything else starting with a slash.
    Unknown(&'a str),
}

/// Help text listing every command.
pub const HELP: &str = "\
/clear         start the conversation over
/history       print the conversation so far
/export        print the conversation as JSON
/model [id]    show or switch the model
/key           enter a new API key
/help          show this help
/quit          end the session
//text         send \"/text\" as a message";

/// Parses one line of input. Blank lines yield `None`.
///
/// A leading `//` escapes the slash, so `//text` is the message `/text`.
pub fn parse_input(line: &str) -> Option<Input<'_>> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let Some(rest) = line.strip_prefix('/') else {
        return Some(Input::Message(line));
    };
    if rest.starts_with('/') {
        return Some(Input::Message(rest));
    }

    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, Some(arg.trim()).filter(|a| !a.is_empty())),
        None => (rest, None),
    };
    let command = match name {
        "clear" => Command::Clear,
        "history" => Command::History,
        "export" => Command::Export,
        "model" => Command::Model(arg),
        "key" => Command::Key,
        "help" => Command::Help,
        "quit" | "exit" => Command::Quit,
        _ => Command::Unknown(name),
    };
    Some(Input::Command(command))
}
