use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use kindly_core::{CategoryId, CategorySelector, Route};

use crate::app::App;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Action {
    None,
    Quit,
    /// Switch views by header position (+1 next, -1 previous).
    Cycle(isize),
    /// Hand the category to the mounted synchronizer.
    SelectCategory(CategoryId),
}

pub(crate) fn handle_key_event(key: KeyEvent, app: &mut App) -> Action {
    use KeyCode::{BackTab, Char, Down, Enter, Left, Right, Tab, Up};

    // Global shortcuts
    if key.code == Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Action::Quit;
    }
    if key.code == Char('q') && key.modifiers.is_empty() {
        return Action::Quit;
    }
    match key.code {
        Tab => return Action::Cycle(1),
        BackTab => return Action::Cycle(-1),
        _ => {}
    }

    match app.route() {
        Route::Services => match key.code {
            Char(digit @ '1'..='3') => {
                let index = match digit {
                    '1' => 0,
                    '2' => 1,
                    _ => 2,
                };
                app.selector_index = index;
                activate_selector(index)
            }
            Enter | Char(' ') => activate_selector(app.selector_index),
            Left => {
                app.move_selector(false);
                Action::None
            }
            Right => {
                app.move_selector(true);
                Action::None
            }
            Up | Char('k') => {
                app.move_result(false);
                Action::None
            }
            Down | Char('j') => {
                app.move_result(true);
                Action::None
            }
            _ => Action::None,
        },

        Route::Offers => match key.code {
            Up | Char('k') => {
                app.move_result(false);
                Action::None
            }
            Down | Char('j') => {
                app.move_result(true);
                Action::None
            }
            Char('r') => Action::SelectCategory(CategoryId::All),
            _ => Action::None,
        },

        Route::Home | Route::AboutUs | Route::Contact => match key.code {
            Enter => Action::Cycle(1),
            _ => Action::None,
        },
    }
}

fn activate_selector(index: usize) -> Action {
    let mut chosen = None;
    CategorySelector::new(|category| chosen = Some(category)).activate(index);
    chosen.map_or(Action::None, Action::SelectCategory)
}
