use crate::game::PlayerAction;
use crate::model::{Difficulty, GameState, Screen};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use std::time::Duration;

#[derive(Clone, Debug)]
pub(crate) struct InputEvent {
    pub(crate) key: KeyCode,
    pub(crate) mods: KeyModifiers,
}

pub(crate) fn collect_input_nonblocking(
    max_frame_time: Duration,
) -> anyhow::Result<Vec<InputEvent>> {
    let mut out = Vec::new();

    // poll with a tiny timeout so we stay responsive
    let timeout = std::cmp::min(Duration::from_millis(1), max_frame_time);
    while event::poll(timeout)? {
        if let Event::Key(k) = event::read()? {
            // no repeats: a held key must not answer twice
            if k.kind == KeyEventKind::Press {
                out.push(InputEvent {
                    key: k.code,
                    mods: k.modifiers,
                });
                if out.len() >= 32 {
                    break;
                }
            }
        }
    }
    Ok(out)
}

pub(crate) fn map_event_to_action(st: &GameState, ev: InputEvent) -> Option<PlayerAction> {
    // Global
    if matches!(ev.key, KeyCode::Char('c')) && ev.mods.contains(KeyModifiers::CONTROL) {
        return Some(PlayerAction::Quit);
    }
    match ev.key {
        KeyCode::Char('q') | KeyCode::Char('Q') => return Some(PlayerAction::Quit),
        KeyCode::Esc => return Some(PlayerAction::Back),
        _ => {}
    }
    if st.loading {
        return None;
    }

    match st.screen {
        Screen::Menu => match ev.key {
            KeyCode::Enter | KeyCode::Char('s') | KeyCode::Char('S') => {
                Some(PlayerAction::Navigate(Screen::Difficulty.id()))
            }
            KeyCode::Char('i') | KeyCode::Char('I') => {
                Some(PlayerAction::Navigate(Screen::Instructions.id()))
            }
            KeyCode::Char('o') | KeyCode::Char('O') | KeyCode::Tab => {
                Some(PlayerAction::Navigate(Screen::Settings.id()))
            }
            _ => None,
        },
        Screen::Difficulty => match ev.key {
            KeyCode::Char('1') | KeyCode::Char('e') | KeyCode::Char('E') => {
                Some(PlayerAction::ChooseDifficulty(Difficulty::Easy))
            }
            KeyCode::Char('2') | KeyCode::Char('m') | KeyCode::Char('M') => {
                Some(PlayerAction::ChooseDifficulty(Difficulty::Medium))
            }
            KeyCode::Char('3') | KeyCode::Char('h') | KeyCode::Char('H') => {
                Some(PlayerAction::ChooseDifficulty(Difficulty::Hard))
            }
            _ => None,
        },
        Screen::Instructions => match ev.key {
            KeyCode::Enter => Some(PlayerAction::Navigate(Screen::Difficulty.id())),
            _ => None,
        },
        Screen::Settings => match ev.key {
            KeyCode::Up => Some(PlayerAction::SettingsMove(-1)),
            KeyCode::Down | KeyCode::Tab => Some(PlayerAction::SettingsMove(1)),
            KeyCode::Enter | KeyCode::Char(' ') => Some(PlayerAction::SettingsToggle),
            _ => None,
        },
        Screen::Game => match ev.key {
            KeyCode::Left | KeyCode::Char('1') | KeyCode::Char('a') | KeyCode::Char('A') => {
                Some(PlayerAction::SelectImage(true))
            }
            KeyCode::Right | KeyCode::Char('2') | KeyCode::Char('d') | KeyCode::Char('D') => {
                Some(PlayerAction::SelectImage(false))
            }
            _ => None,
        },
        Screen::Result => match ev.key {
            KeyCode::Enter | KeyCode::Char('r') | KeyCode::Char('R') => {
                Some(PlayerAction::PlayAgain)
            }
            KeyCode::Char('m') | KeyCode::Char('M') => {
                Some(PlayerAction::Navigate(Screen::Menu.id()))
            }
            _ => None,
        },
    }
}
