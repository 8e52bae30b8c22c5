// ABOUTME: Line-oriented script commands for driving the layout engine.
// ABOUTME: Parses one command per line; blank lines and `#` comments are skipped.

use anyhow::{anyhow, bail, Context, Result};
use tg_core::{Direction, DocumentRef, PaneId, TabId};
use tg_layout::PaneTarget;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Open {
        target: PaneTarget,
        document: DocumentRef,
    },
    CloseTab {
        pane: PaneId,
        tab: TabId,
    },
    Select {
        pane: PaneId,
        tab: TabId,
    },
    Split {
        pane: PaneId,
        direction: Option<Direction>,
    },
    Close {
        pane: PaneId,
    },
    Focus {
        pane: PaneId,
    },
    Move {
        from: PaneId,
        tab: TabId,
        to: PaneId,
    },
    FocusDirection(Direction),
    Dirty {
        pane: PaneId,
        tab: TabId,
        dirty: bool,
    },
    Title {
        pane: PaneId,
        tab: TabId,
        title: String,
    },
    Flatten,
    Show,
}

impl Command {
    /// Parse a script line, returning `None` for blank lines and comments
    pub fn parse(line: &str) -> Result<Option<Command>> {
        let line = strip_comment(line);
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Ok(None);
        };
        let args: Vec<&str> = words.collect();

        let command = match name {
            "open" => {
                let (target, path) = args
                    .split_first()
                    .filter(|(_, rest)| !rest.is_empty())
                    .ok_or_else(|| anyhow!("usage: open <pane|active> <path>"))?;
                let target = match *target {
                    "active" => PaneTarget::Active,
                    other => PaneTarget::Pane(parse_pane(other)?),
                };
                Command::Open {
                    target,
                    document: DocumentRef::from(path.join(" ").as_str()),
                }
            }
            "close-tab" => {
                let [pane, tab] = exact(&args, "close-tab <pane> <tab>")?;
                Command::CloseTab {
                    pane: parse_pane(pane)?,
                    tab: parse_tab(tab)?,
                }
            }
            "select" => {
                let [pane, tab] = exact(&args, "select <pane> <tab>")?;
                Command::Select {
                    pane: parse_pane(pane)?,
                    tab: parse_tab(tab)?,
                }
            }
            "split" => match args.as_slice() {
                [pane] => Command::Split {
                    pane: parse_pane(pane)?,
                    direction: None,
                },
                [pane, direction] => Command::Split {
                    pane: parse_pane(pane)?,
                    direction: Some(direction.parse()?),
                },
                _ => bail!("usage: split <pane> [left|right|up|down]"),
            },
            "close" => {
                let [pane] = exact(&args, "close <pane>")?;
                Command::Close {
                    pane: parse_pane(pane)?,
                }
            }
            "focus" => {
                let [pane] = exact(&args, "focus <pane>")?;
                Command::Focus {
                    pane: parse_pane(pane)?,
                }
            }
            "move" => {
                let [from, tab, to] = exact(&args, "move <from> <tab> <to>")?;
                Command::Move {
                    from: parse_pane(from)?,
                    tab: parse_tab(tab)?,
                    to: parse_pane(to)?,
                }
            }
            "focus-dir" => {
                let [direction] = exact(&args, "focus-dir <direction>")?;
                Command::FocusDirection(direction.parse()?)
            }
            "dirty" => {
                let [pane, tab, dirty] = exact(&args, "dirty <pane> <tab> <true|false>")?;
                Command::Dirty {
                    pane: parse_pane(pane)?,
                    tab: parse_tab(tab)?,
                    dirty: dirty
                        .parse()
                        .with_context(|| format!("invalid flag '{}'", dirty))?,
                }
            }
            "title" => match args.as_slice() {
                [pane, tab, title @ ..] if !title.is_empty() => Command::Title {
                    pane: parse_pane(pane)?,
                    tab: parse_tab(tab)?,
                    title: title.join(" "),
                },
                _ => bail!("usage: title <pane> <tab> <text>"),
            },
            "flatten" => {
                exact::<0>(&args, "flatten")?;
                Command::Flatten
            }
            "show" => {
                exact::<0>(&args, "show")?;
                Command::Show
            }
            other => bail!("unknown command '{}'", other),
        };
        Ok(Some(command))
    }
}

/// `#` starts a comment at the beginning of a line or after whitespace
fn strip_comment(line: &str) -> &str {
    let mut previous = None;
    for (index, c) in line.char_indices() {
        if c == '#' && previous.map_or(true, char::is_whitespace) {
            return &line[..index];
        }
        previous = Some(c);
    }
    line
}

fn exact<'a, const N: usize>(args: &[&'a str], usage: &str) -> Result<[&'a str; N]> {
    <[&str; N]>::try_from(args).map_err(|_| anyhow!("usage: {}", usage))
}

/// Ids are accepted bare (`3`) or with their display prefix (`P3`, `T3`)
fn parse_id(text: &str, prefix: char) -> Result<u64> {
    let digits = text
        .strip_prefix(prefix)
        .or_else(|| text.strip_prefix(prefix.to_ascii_lowercase()))
        .unwrap_or(text);
    digits
        .parse()
        .with_context(|| format!("invalid id '{}'", text))
}

fn parse_pane(text: &str) -> Result<PaneId> {
    parse_id(text, 'P').map(PaneId)
}

fn parse_tab(text: &str) -> Result<TabId> {
    parse_id(text, 'T').map(TabId)
}
