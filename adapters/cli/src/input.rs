//! Parsing of the line-oriented request language.

use std::{path::PathBuf, str::FromStr};

use lane_defence_core::{
    CellCoord, CustomRoster, DefenderKind, LevelId, RosterError, UnknownUnitKind,
};
use thiserror::Error;

/// One request typed by the player or read from a script.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Request {
    /// Places a defender directly, bypassing the selection flow.
    Place { kind: DefenderKind, cell: CellCoord },
    /// Selects a defender type for placement.
    Select(DefenderKind),
    /// Points at a cell: confirms a placement or inspects the cell.
    Click(CellCoord),
    /// Drops the current selection.
    Cancel,
    /// Ends the turn.
    End,
    /// Reverts the most recent placement or turn.
    Undo,
    /// Reapplies the most recently undone placement or turn.
    Redo,
    /// Starts a campaign level.
    Level(LevelId),
    /// Starts a custom level.
    Custom(CustomRoster),
    /// Writes the running game to a save file.
    Save(PathBuf),
    /// Replaces the running game with one read from a save file.
    Load(PathBuf),
    /// Prints the board.
    Show,
    /// Lists the available requests.
    Help,
    /// Ends the session.
    Quit,
}

/// Reasons a request line could not be parsed.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub(crate) enum InputError {
    #[error("empty request")]
    Empty,
    #[error("unknown request '{0}', type 'help' for a list")]
    UnknownRequest(String),
    #[error("'{request}' expects {expected} argument(s)")]
    WrongArity {
        request: &'static str,
        expected: usize,
    },
    #[error("'{0}' is not a whole number")]
    InvalidNumber(String),
    #[error(transparent)]
    UnknownKind(#[from] UnknownUnitKind),
    #[error("invalid custom level: {0}")]
    Roster(#[from] RosterError),
}

impl FromStr for Request {
    type Err = InputError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Err(InputError::Empty);
        };
        let args: Vec<&str> = words.collect();
        let head = head.to_ascii_lowercase();

        let request = match head.as_str() {
            "place" => {
                let [kind, column, row] = arity::<3>("place", &args)?;
                Self::Place {
                    kind: kind.parse()?,
                    cell: parse_cell(column, row)?,
                }
            }
            "select" => {
                let [kind] = arity::<1>("select", &args)?;
                Self::Select(kind.parse()?)
            }
            "click" => {
                let [column, row] = arity::<2>("click", &args)?;
                Self::Click(parse_cell(column, row)?)
            }
            "cancel" => no_args("cancel", &args, Self::Cancel)?,
            "end" => no_args("end", &args, Self::End)?,
            "undo" => no_args("undo", &args, Self::Undo)?,
            "redo" => no_args("redo", &args, Self::Redo)?,
            "level" => {
                let [number] = arity::<1>("level", &args)?;
                Self::Level(LevelId::new(parse_number(number)?))
            }
            "custom" => {
                let [walkers, tanks, burrowers] = arity::<3>("custom", &args)?;
                Self::Custom(CustomRoster::parse(walkers, tanks, burrowers)?)
            }
            "save" => {
                let [path] = arity::<1>("save", &args)?;
                Self::Save(PathBuf::from(path))
            }
            "load" => {
                let [path] = arity::<1>("load", &args)?;
                Self::Load(PathBuf::from(path))
            }
            "show" => no_args("show", &args, Self::Show)?,
            "help" => no_args("help", &args, Self::Help)?,
            "quit" | "exit" => no_args("quit", &args, Self::Quit)?,
            _ => return Err(InputError::UnknownRequest(head)),
        };
        Ok(request)
    }
}

/// Lines of help printed for the `help` request.
pub(crate) const HELP: &str = "\
place <kind> <col> <row>   place a defender directly
select <kind>              pick a defender type, then 'click' a cell
click <col> <row>          confirm the selected cell, or inspect it
cancel                     drop the current selection
end                        end the turn
undo | redo                step through history
level <n>                  start campaign level 1-3
custom <w> <t> <b>         start a custom level with walkers, tanks, burrowers
save <path> | load <path>  write or read a save file
show                       print the board
quit                       leave
kinds: sunflower flytrap potato walnut peashooter";

fn arity<'a, const N: usize>(
    request: &'static str,
    args: &[&'a str],
) -> Result<[&'a str; N], InputError> {
    <[&str; N]>::try_from(args).map_err(|_| InputError::WrongArity {
        request,
        expected: N,
    })
}

fn no_args(request: &'static str, args: &[&str], value: Request) -> Result<Request, InputError> {
    let [] = arity::<0>(request, args)?;
    Ok(value)
}

fn parse_number(field: &str) -> Result<u32, InputError> {
    field
        .parse()
        .map_err(|_| InputError::InvalidNumber(field.to_owned()))
}

fn parse_cell(column: &str, row: &str) -> Result<CellCoord, InputError> {
    Ok(CellCoord::new(parse_number(column)?, parse_number(row)?))
}
