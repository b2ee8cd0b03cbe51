use log::debug;

use super::list_model::ListModel;

/// Commands accepted by the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `r`: most recently played first
    SortRecent,
    /// `i`: keep only installed games
    FilterInstalled,
    /// `all`: back to the full, name-sorted list
    ShowAll,
    /// `a`: sort by title
    SortAlphabetical,
}

impl Command {
    /// Every command, in help order
    pub const ALL: [Command; 4] = [
        Command::SortAlphabetical,
        Command::SortRecent,
        Command::FilterInstalled,
        Command::ShowAll,
    ];

    /// Exact, case-sensitive match against the command keywords
    pub fn parse(input: &str) -> Option<Self> {
        match input {
            "r" => Some(Command::SortRecent),
            "i" => Some(Command::FilterInstalled),
            "all" => Some(Command::ShowAll),
            "a" => Some(Command::SortAlphabetical),
            _ => None,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            Command::SortRecent => "r",
            Command::FilterInstalled => "i",
            Command::ShowAll => "all",
            Command::SortAlphabetical => "a",
        }
    }

    pub fn help(self) -> &'static str {
        match self {
            Command::SortRecent => "sort by recent",
            Command::FilterInstalled => "filter installed",
            Command::ShowAll => "show all",
            Command::SortAlphabetical => "sort alphabetically",
        }
    }
}

/// Parse `input` and apply it to `list`. Unknown input leaves the list alone.
pub fn dispatch(list: &mut ListModel, input: &str) -> Option<Command> {
    let command = Command::parse(input);

    match command {
        Some(command) => {
            debug!("Applying command {:?}", command);
            list.apply(command);
        }
        None => debug!("Ignoring unknown command {:?}", input),
    }

    command
}
