//! Line-oriented driver for the carousel.
//!
//! `portfolio-carousel browse` reads one command per line and feeds it to a
//! [`Site`] exactly as the page's event handlers would, which makes the
//! controller easy to poke at from a terminal or a script:
//!
//! ```text
//! open bolos        # click the "bolos" trigger button
//! next | prev       # on-screen arrows
//! goto 3            # third dot (1-based)
//! key Escape        # keyboard, DOM key names
//! swipe 300 120     # touch start x, touch end x
//! close             # close button
//! quit
//! ```

use crate::carousel::{InputEvent, Key, OpenOutcome};
use crate::site::Site;
use crate::storage::ObjectStore;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum BrowseError {
    #[error("unknown command '{0}'")]
    Unknown(String),
    #[error("'{0}' needs {1}")]
    MissingArgument(&'static str, &'static str),
    #[error("'{0}' is not a valid number")]
    InvalidNumber(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum BrowseCommand {
    Open(String),
    Input(InputEvent),
    Swipe { start: f64, end: f64 },
    Quit,
}

impl BrowseCommand {
    /// Parse one input line. Blank lines and `#` comments yield `None`.
    pub fn parse(line: &str) -> Result<Option<Self>, BrowseError> {
        let line = line.split('#').next().unwrap_or_default().trim();
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            return Ok(None);
        };

        let cmd = match command {
            "open" => {
                let key = words
                    .next()
                    .ok_or(BrowseError::MissingArgument("open", "a category key"))?;
                BrowseCommand::Open(key.to_string())
            }
            "next" => BrowseCommand::Input(InputEvent::NextButton),
            "prev" => BrowseCommand::Input(InputEvent::PreviousButton),
            "goto" => {
                let raw = words
                    .next()
                    .ok_or(BrowseError::MissingArgument("goto", "a slide number"))?;
                let n: usize = raw
                    .parse()
                    .map_err(|_| BrowseError::InvalidNumber(raw.to_string()))?;
                let index = n
                    .checked_sub(1)
                    .ok_or_else(|| BrowseError::InvalidNumber(raw.to_string()))?;
                BrowseCommand::Input(InputEvent::Dot(index))
            }
            "key" => {
                let name = words
                    .next()
                    .ok_or(BrowseError::MissingArgument("key", "a key name"))?;
                BrowseCommand::Input(InputEvent::Key(Key::from_name(name)))
            }
            "swipe" => {
                let start = parse_coordinate(words.next())?;
                let end = parse_coordinate(words.next())?;
                BrowseCommand::Swipe { start, end }
            }
            "close" => BrowseCommand::Input(InputEvent::CloseButton),
            "quit" | "exit" => BrowseCommand::Quit,
            other => return Err(BrowseError::Unknown(other.to_string())),
        };
        Ok(Some(cmd))
    }
}

fn parse_coordinate(word: Option<&str>) -> Result<f64, BrowseError> {
    let raw = word.ok_or(BrowseError::MissingArgument("swipe", "two x coordinates"))?;
    raw.parse()
        .map_err(|_| BrowseError::InvalidNumber(raw.to_string()))
}

/// What happened when a command ran.
#[derive(Debug, Clone, PartialEq)]
pub enum Applied {
    Opened(Option<OpenOutcome>),
    Changed(bool),
    Quit,
}

/// Run one command against the site.
pub async fn apply<S: ObjectStore>(site: &mut Site<S>, command: BrowseCommand) -> Applied {
    match command {
        BrowseCommand::Open(key) => Applied::Opened(site.open(&key).await),
        BrowseCommand::Input(event) => Applied::Changed(site.handle(event)),
        BrowseCommand::Swipe { start, end } => {
            site.handle(InputEvent::TouchStart { x: start });
            Applied::Changed(site.handle(InputEvent::TouchEnd { x: end }))
        }
        BrowseCommand::Quit => Applied::Quit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::test_helpers::MemoryStore;

    fn parse(line: &str) -> BrowseCommand {
        BrowseCommand::parse(line).unwrap().unwrap()
    }

    // =========================================================================
    // Parsing
    // =========================================================================

    #[test]
    fn parses_navigation_commands() {
        assert_eq!(parse("open bolos"), BrowseCommand::Open("bolos".to_string()));
        assert_eq!(parse("next"), BrowseCommand::Input(InputEvent::NextButton));
        assert_eq!(parse("  prev  "), BrowseCommand::Input(InputEvent::PreviousButton));
        assert_eq!(parse("goto 3"), BrowseCommand::Input(InputEvent::Dot(2)));
        assert_eq!(parse("close"), BrowseCommand::Input(InputEvent::CloseButton));
        assert_eq!(parse("quit"), BrowseCommand::Quit);
    }

    #[test]
    fn parses_keys_and_swipes() {
        assert_eq!(
            parse("key ArrowLeft"),
            BrowseCommand::Input(InputEvent::Key(Key::ArrowLeft))
        );
        assert_eq!(
            parse("key Enter"),
            BrowseCommand::Input(InputEvent::Key(Key::Other))
        );
        assert_eq!(
            parse("swipe 300 120.5"),
            BrowseCommand::Swipe {
                start: 300.0,
                end: 120.5
            }
        );
    }

    #[test]
    fn blank_lines_and_comments_are_skipped() {
        assert_eq!(BrowseCommand::parse(""), Ok(None));
        assert_eq!(BrowseCommand::parse("   # just a note"), Ok(None));
        assert_eq!(parse("next # advance"), BrowseCommand::Input(InputEvent::NextButton));
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!(
            BrowseCommand::parse("jump"),
            Err(BrowseError::Unknown("jump".to_string()))
        );
        assert_eq!(
            BrowseCommand::parse("open"),
            Err(BrowseError::MissingArgument("open", "a category key"))
        );
        assert_eq!(
            BrowseCommand::parse("goto 0"),
            Err(BrowseError::InvalidNumber("0".to_string()))
        );
        assert_eq!(
            BrowseCommand::parse("swipe 10 left"),
            Err(BrowseError::InvalidNumber("left".to_string()))
        );
        assert!(BrowseCommand::parse("swipe 10").is_err());
    }

    // =========================================================================
    // Applying
    // =========================================================================

    #[tokio::test]
    async fn script_drives_the_carousel() {
        let store = MemoryStore::new().with_category("bolos", "Bolos", 0, &["01.jpg", "02.jpg"]);
        let mut site = Site::init(store, SiteConfig::default()).await;

        assert_eq!(
            apply(&mut site, parse("open bolos")).await,
            Applied::Opened(Some(OpenOutcome::Opened(3)))
        );
        assert_eq!(apply(&mut site, parse("swipe 300 100")).await, Applied::Changed(true));
        assert_eq!(site.carousel().current_index(), 1);
        assert_eq!(apply(&mut site, parse("swipe 300 260")).await, Applied::Changed(false));
        apply(&mut site, parse("goto 3")).await;
        assert_eq!(site.carousel().current_index(), 2);
        apply(&mut site, parse("key Escape")).await;
        assert!(!site.carousel().is_open());
        assert_eq!(apply(&mut site, parse("quit")).await, Applied::Quit);
    }
}
