mod event;

pub use event::{ClickEvent, NewClick, NewVisit, VisitEvent};
