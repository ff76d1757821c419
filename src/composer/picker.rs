use super::EventDraft;
use crate::model::DateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Picker {
    Hidden,
    Visible,
}

impl Default for Picker {
    fn default() -> Self {
        Self::Hidden
    }
}

pub enum PickerEvent {
    Open,
    Confirm(DateTime),
    Cancel,
}

impl Picker {
    pub fn on_event(self, draft: &mut EventDraft, event: PickerEvent) -> Picker {
        use Picker as P;
        use PickerEvent as E;
        match (self, event) {
            (_, E::Open) => P::Visible,
            (P::Visible, E::Confirm(start)) => {
                draft.set_start(start);
                P::Hidden
            }
            (P::Visible, E::Cancel) => P::Hidden,
            (state, _) => state,
        }
    }
}
