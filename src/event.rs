use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEvent, KeyEventKind, MouseEvent};
use tokio::sync::mpsc;

use crate::model::entities::Dataset;

#[derive(Debug, PartialEq)]
pub enum Action {
    Quit,
    SwitchTab(usize),
    NextTab,
    PrevTab,
    ToggleHelp,
    FocusFilter,
    Reload,
    SubmitFilter(String),
    ShowDetail(RecordDetail),
    CloseDetail,
    /// One-line notice for the status bar.
    Notify(String),
}

/// Label/value pairs of one row, shown in the detail popup.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordDetail {
    pub title: String,
    pub fields: Vec<(String, String)>,
}

/// Messages sent from background loader tasks back to the main UI thread.
#[derive(Debug)]
pub enum AppMessage {
    DatasetReady(Arc<Dataset>),
    LoadingStarted(String),
    LoadingFinished,
    Error(String),
}

/// Terminal input the UI reacts to.
#[derive(Debug, Clone, Copy)]
pub enum Input {
    Key(KeyEvent),
    Mouse(MouseEvent),
}

pub fn spawn_event_reader(tx: mpsc::UnboundedSender<Event>) {
    tokio::task::spawn_blocking(move || loop {
        if event::poll(Duration::from_millis(50)).unwrap_or(false) {
            if let Ok(ev) = event::read() {
                if tx.send(ev).is_err() {
                    break;
                }
            }
        }
    });
}

pub fn to_input(ev: &Event) -> Option<Input> {
    match ev {
        Event::Key(key) if key.kind == KeyEventKind::Press => Some(Input::Key(*key)),
        Event::Mouse(mouse) => Some(Input::Mouse(*mouse)),
        _ => None,
    }
}
