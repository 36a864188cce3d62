//! Prompt commands. Page interactions become [`DomEvent`]s so they go
//! through the same binder a browser page would use.

use reelist_core::events::{DomEvent, Target};
use reelist_core::models::MAX_RATING;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// An interaction with a page element.
    Page(DomEvent),
    /// Search whichever input belongs to the visible panel.
    Find(String),
    Watch { key: String, watched: bool },
    Rate { key: String, rating: u8 },
    Favorite { key: String, favorite: bool },
    Dismiss,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  login                 sign in or out
  search <title>        search the catalog
  add <movie id>        add a catalog result to your watchlist
  browse                show the search panel
  watched | unwatched   show one of your lists
  find <title>          search the visible list (or the catalog)
  watch <key>           mark a list entry watched
  unwatch <key>         mark a list entry unwatched
  rate <key> <0-5>      rate a list entry
  fav <key>             mark a list entry favorite
  unfav <key>           clear the favorite flag
  ok                    dismiss the current notice
  help                  show this text
  quit                  exit";

fn click(target: Target) -> Command {
    Command::Page(DomEvent::click(target.element_id()))
}

/// Parse one prompt line. `Ok(None)` for a blank line.
pub fn parse(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = line
        .split_once(char::is_whitespace)
        .map(|(w, r)| (w, r.trim()))
        .unwrap_or((line, ""));

    let required = |what: &str| {
        if rest.is_empty() {
            Err(format!("usage: {word} <{what}>"))
        } else {
            Ok(rest.to_string())
        }
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "login" | "logout" => click(Target::LoginButton),
        "browse" => click(Target::ShowSearch),
        "watched" => click(Target::ShowWatched),
        "unwatched" => click(Target::ShowUnwatched),
        "search" => Command::Page(DomEvent::enter(
            Target::CatalogInput.element_id(),
            required("title")?,
        )),
        "add" => Command::Page(DomEvent::click_add(required("movie id")?)),
        "find" => Command::Find(required("title")?),
        "watch" => Command::Watch {
            key: required("key")?,
            watched: true,
        },
        "unwatch" => Command::Watch {
            key: required("key")?,
            watched: false,
        },
        "fav" => Command::Favorite {
            key: required("key")?,
            favorite: true,
        },
        "unfav" => Command::Favorite {
            key: required("key")?,
            favorite: false,
        },
        "rate" => {
            let usage = || format!("usage: rate <key> <0-{MAX_RATING}>");
            let (key, rating) = rest.rsplit_once(char::is_whitespace).ok_or_else(usage)?;
            let rating: u8 = rating.parse().map_err(|_| usage())?;
            if rating > MAX_RATING {
                return Err(usage());
            }
            Command::Rate {
                key: key.trim().to_string(),
                rating,
            }
        }
        "ok" => Command::Dismiss,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(format!("unknown command {other:?}, try help")),
    };
    Ok(Some(command))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(line: &str) -> DomEvent {
        match parse(line).unwrap().unwrap() {
            Command::Page(event) => event,
            other => panic!("expected page event, got {other:?}"),
        }
    }

    #[test]
    fn test_blank_line() {
        assert_eq!(parse("   "), Ok(None));
    }

    #[test]
    fn test_page_commands() {
        assert_eq!(page("login"), DomEvent::click("btn-login"));
        assert_eq!(page("watched"), DomEvent::click("btn-showWatched"));
        assert_eq!(page("unwatched"), DomEvent::click("btn-showUnWatched"));
        assert_eq!(page("browse"), DomEvent::click("btn-normSearch"));
        assert_eq!(page("add 348"), DomEvent::click_add("348"));
        assert_eq!(
            page("search  the thing "),
            DomEvent::enter("user-input", "the thing")
        );
    }

    #[test]
    fn test_list_commands() {
        assert_eq!(
            parse("rate -K1 4").unwrap(),
            Some(Command::Rate {
                key: "-K1".into(),
                rating: 4
            })
        );
        assert_eq!(
            parse("unwatch 7").unwrap(),
            Some(Command::Watch {
                key: "7".into(),
                watched: false
            })
        );
        assert_eq!(parse("find alien").unwrap(), Some(Command::Find("alien".into())));
    }

    #[test]
    fn test_bad_input() {
        assert!(parse("search").is_err());
        assert!(parse("rate -K1").is_err());
        assert!(parse("rate -K1 9").is_err());
        assert!(parse("dance").is_err());
    }
}
