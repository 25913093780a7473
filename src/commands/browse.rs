use tracing::{debug, info, warn};

use crate::client::JiraClient;
use crate::config::Config;
use crate::error::Result;
use crate::output::Frame;
use crate::terminal::{CrosstermScreen, Key, Launcher, Screen, SystemBrowser};
use crate::types::Issue;

/// Issues assigned to the authenticated user in any active sprint
pub const MY_SPRINT_ISSUES_JQL: &str = "assignee = currentUser() and sprint in openSprints()";

/// Connect, fetch the sprint issues once, then browse them until the user quits.
pub async fn run(config: &Config) -> Result<()> {
    let client = JiraClient::connect(config).await?;
    let issues = client.search(MY_SPRINT_ISSUES_JQL).await?;

    browse(config, &issues, &mut CrosstermScreen::new(), &mut SystemBrowser)
}

/// Render/read loop. The screen is redrawn before every key read; `q` or
/// Ctrl-C return without drawing again.
pub fn browse<S, L>(config: &Config, issues: &[Issue], screen: &mut S, launcher: &mut L) -> Result<()>
where
    S: Screen,
    L: Launcher,
{
    let mut selected = 0;

    loop {
        let (width, height) = screen.size()?;
        screen.draw(&Frame::build(issues, selected, width.into(), height.into()))?;

        match screen.read_key()? {
            Key::Char('q') | Key::Interrupt => break,
            Key::Enter => {
                if let Some(issue) = issues.get(selected) {
                    let url = config.browse_url(&issue.key);
                    info!(%url, "opening issue in browser");
                    if let Err(e) = launcher.open(&url) {
                        warn!(%url, error = %e, "failed to open browser");
                    }
                }
            }
            key => {
                selected = move_selection(selected, issues.len(), key);
                debug!(selected, "selection");
            }
        }
    }

    Ok(())
}

/// Up/Down clamped to `0..len`, no wraparound. Other keys leave the selection alone.
pub fn move_selection(selected: usize, len: usize, key: Key) -> usize {
    match key {
        Key::Up => selected.saturating_sub(1),
        Key::Down => (selected + 1).min(len.saturating_sub(1)),
        _ => selected,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use proptest::prelude::*;

    use super::*;
    use crate::error::JiraFrogError;
    use crate::output::{Shade, NO_DESCRIPTION, NO_ISSUES};
    use crate::types::make_issue;

    struct ScriptedScreen {
        keys: VecDeque<Key>,
        frames: Vec<Frame>,
    }

    impl ScriptedScreen {
        fn new(keys: &[Key]) -> Self {
            Self {
                keys: keys.iter().copied().collect(),
                frames: Vec::new(),
            }
        }

        /// Index of the highlighted row in each drawn frame
        fn selections(&self) -> Vec<Option<usize>> {
            self.frames
                .iter()
                .map(|frame| frame.rows.iter().position(|row| row.bg == Some(Shade::Azure)))
                .collect()
        }
    }

    impl Screen for ScriptedScreen {
        fn size(&self) -> Result<(u16, u16)> {
            Ok((80, 40))
        }

        fn draw(&mut self, frame: &Frame) -> Result<()> {
            self.frames.push(frame.clone());
            Ok(())
        }

        fn read_key(&mut self) -> Result<Key> {
            self.keys.pop_front().ok_or(JiraFrogError::Interrupted)
        }
    }

    #[derive(Default)]
    struct RecordingLauncher {
        urls: Vec<String>,
        fail: bool,
    }

    impl Launcher for RecordingLauncher {
        fn open(&mut self, url: &str) -> Result<()> {
            self.urls.push(url.to_string());
            if self.fail {
                return Err(std::io::Error::other("no browser").into());
            }
            Ok(())
        }
    }

    fn config() -> Config {
        Config {
            server: "https://example.atlassian.net".to_string(),
            username: "frog".to_string(),
            token: "token".to_string(),
        }
    }

    fn sample_issues() -> Vec<Issue> {
        vec![
            make_issue("AB-1", "Fix bug", "In Progress", Some("Null pointer on save")),
            make_issue("AB-2", "Add feature", "Done", Some("")),
        ]
    }

    fn three_issues() -> Vec<Issue> {
        vec![
            make_issue("AB-1", "One", "To Do", None),
            make_issue("AB-2", "Two", "To Do", None),
            make_issue("AB-3", "Three", "To Do", None),
        ]
    }

    #[test]
    fn test_move_selection_clamps() {
        assert_eq!(move_selection(0, 3, Key::Up), 0);
        assert_eq!(move_selection(1, 3, Key::Up), 0);
        assert_eq!(move_selection(1, 3, Key::Down), 2);
        assert_eq!(move_selection(2, 3, Key::Down), 2);
        assert_eq!(move_selection(1, 3, Key::Char('x')), 1);
        assert_eq!(move_selection(0, 0, Key::Down), 0);
    }

    proptest! {
        #[test]
        fn test_move_selection_stays_in_bounds(
            len in 1usize..50,
            presses in proptest::collection::vec(any::<bool>(), 0..200),
        ) {
            let mut selected = 0;
            for down in presses {
                let key = if down { Key::Down } else { Key::Up };
                selected = move_selection(selected, len, key);
                prop_assert!(selected < len);
            }
        }

        #[test]
        fn test_move_selection_sticks_at_ends(len in 1usize..50, repeats in 1usize..20) {
            let mut top = 0;
            let mut bottom = len - 1;
            for _ in 0..repeats {
                top = move_selection(top, len, Key::Up);
                bottom = move_selection(bottom, len, Key::Down);
            }
            prop_assert_eq!(top, 0);
            prop_assert_eq!(bottom, len - 1);
        }
    }

    #[test]
    fn test_example_scenario() {
        let issues = sample_issues();
        let mut screen = ScriptedScreen::new(&[Key::Down, Key::Enter, Key::Char('q')]);
        let mut launcher = RecordingLauncher::default();

        browse(&config(), &issues, &mut screen, &mut launcher).unwrap();

        assert_eq!(launcher.urls, vec!["https://example.atlassian.net/browse/AB-2"]);
        assert_eq!(screen.selections(), vec![Some(0), Some(1), Some(1)]);
        assert_eq!(screen.frames[1].detail.last().unwrap().text, NO_DESCRIPTION);
    }

    #[test]
    fn test_quit_stops_rendering() {
        let issues = sample_issues();
        let mut screen = ScriptedScreen::new(&[Key::Char('q'), Key::Down, Key::Down]);
        let mut launcher = RecordingLauncher::default();

        browse(&config(), &issues, &mut screen, &mut launcher).unwrap();

        assert_eq!(screen.frames.len(), 1);
        assert_eq!(screen.keys.len(), 2);
        assert!(launcher.urls.is_empty());
    }

    #[test]
    fn test_interrupt_quits() {
        let mut screen = ScriptedScreen::new(&[Key::Interrupt]);
        let mut launcher = RecordingLauncher::default();

        browse(&config(), &sample_issues(), &mut screen, &mut launcher).unwrap();
        assert_eq!(screen.frames.len(), 1);
    }

    #[test]
    fn test_enter_opens_once_and_continues() {
        let issues = sample_issues();
        let mut screen = ScriptedScreen::new(&[Key::Enter, Key::Other, Key::Char('q')]);
        let mut launcher = RecordingLauncher::default();

        browse(&config(), &issues, &mut screen, &mut launcher).unwrap();

        assert_eq!(launcher.urls, vec!["https://example.atlassian.net/browse/AB-1"]);
        assert_eq!(screen.frames.len(), 3);
    }

    #[test]
    fn test_browser_failure_does_not_exit() {
        let issues = sample_issues();
        let mut screen = ScriptedScreen::new(&[Key::Enter, Key::Down, Key::Char('q')]);
        let mut launcher = RecordingLauncher {
            fail: true,
            ..Default::default()
        };

        browse(&config(), &issues, &mut screen, &mut launcher).unwrap();

        assert_eq!(launcher.urls.len(), 1);
        assert_eq!(screen.selections(), vec![Some(0), Some(0), Some(1)]);
    }

    #[test]
    fn test_clamped_at_both_ends() {
        let issues = three_issues();
        let keys = [
            Key::Up,
            Key::Up,
            Key::Down,
            Key::Down,
            Key::Down,
            Key::Down,
            Key::Char('q'),
        ];
        let mut screen = ScriptedScreen::new(&keys);

        browse(&config(), &issues, &mut screen, &mut RecordingLauncher::default()).unwrap();

        assert_eq!(
            screen.selections(),
            vec![Some(0), Some(0), Some(0), Some(1), Some(2), Some(2), Some(2)]
        );
    }

    #[test]
    fn test_every_key_redraws() {
        let keys = [Key::Char('x'), Key::Other, Key::Char('Q'), Key::Char('q')];
        let mut screen = ScriptedScreen::new(&keys);

        browse(&config(), &three_issues(), &mut screen, &mut RecordingLauncher::default()).unwrap();

        assert_eq!(screen.frames.len(), 4);
        assert!(screen.frames.windows(2).all(|pair| pair[0] == pair[1]));
    }

    #[test]
    fn test_empty_list_only_quits() {
        let keys = [Key::Down, Key::Enter, Key::Up, Key::Char('q')];
        let mut screen = ScriptedScreen::new(&keys);
        let mut launcher = RecordingLauncher::default();

        browse(&config(), &[], &mut screen, &mut launcher).unwrap();

        assert!(launcher.urls.is_empty());
        assert_eq!(screen.frames.len(), 4);
        assert!(screen.frames.iter().all(|frame| frame.rows[0].text == NO_ISSUES));
    }

    #[test]
    fn test_screen_error_propagates() {
        let mut screen = ScriptedScreen::new(&[Key::Down]);

        let result = browse(&config(), &sample_issues(), &mut screen, &mut RecordingLauncher::default());
        assert!(matches!(result, Err(JiraFrogError::Interrupted)));
    }
}
