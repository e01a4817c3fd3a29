/// Rating session state machine
///
/// Every decision the navigator makes lives here: which request an action
/// issues, what gets validated locally, and how a reply changes what is on
/// screen. The UI layer only feeds `Action`s in and executes the returned
/// `Effect`, so all of this is testable without a window.
///
/// At most one request is in flight. While a ticket is outstanding, any
/// action that would issue another request is dropped. Local validation
/// still runs first, so a bad jump number alerts even while busy.

use tracing::{debug, info, warn};

use super::data::{Sample, Slot};
use crate::api::wire::{Reply, Request};
use crate::error::ApiError;

/// Default number of samples in a survey
pub const DEFAULT_SAMPLE_COUNT: u32 = 87;

/// Something the rater did, or a reply arriving
#[derive(Debug, Clone)]
pub enum Action {
    /// Window opened: ask for the rater's current sample
    Start,
    /// Rater clicked one of the three images
    Pick(Slot),
    Submit,
    Previous,
    Next,
    /// Jump box edited
    JumpInput(String),
    Jump,
    /// The service answered (or failed to) for `ticket`
    Replied { ticket: u64, outcome: Result<Reply, ApiError> },
}

/// A request paired with the id its reply must carry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub id: u64,
    pub request: Request,
}

/// What the UI layer must do after an action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    /// Send this request and feed the outcome back as `Action::Replied`
    Send(Ticket),
    /// Show a blocking alert with this message
    Alert(String),
}

/// Client-side view of the rater's session
#[derive(Debug, Clone)]
pub struct Session {
    coder: String,
    sample_count: u32,
    current: Option<Sample>,
    pending: Option<Slot>,
    jump_input: String,
    all_done: bool,
    in_flight: Option<u64>,
    next_ticket: u64,
}

impl Session {
    pub fn new(coder: impl Into<String>, sample_count: u32) -> Self {
        Self {
            coder: coder.into(),
            sample_count,
            current: None,
            pending: None,
            jump_input: String::new(),
            all_done: false,
            in_flight: None,
            next_ticket: 0,
        }
    }

    pub fn coder(&self) -> &str {
        &self.coder
    }

    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }

    /// Sample currently on screen
    pub fn current(&self) -> Option<&Sample> {
        self.current.as_ref()
    }

    /// Slot picked but not yet submitted
    pub fn pending(&self) -> Option<Slot> {
        self.pending
    }

    pub fn jump_input(&self) -> &str {
        &self.jump_input
    }

    /// Whether the completion banner is visible
    pub fn all_done(&self) -> bool {
        self.all_done
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Apply one action and return the effect the UI must carry out
    pub fn apply(&mut self, action: Action) -> Effect {
        match action {
            Action::Start => self.issue(Request::Current { coder: self.coder.clone() }),

            Action::Pick(slot) => {
                if self.current.is_some() {
                    self.pending = Some(slot);
                }
                Effect::None
            }

            Action::Submit => {
                let Some(sample) = &self.current else {
                    return Effect::None;
                };
                let Some(slot) = self.pending else {
                    return Effect::Alert("Please select an image before submitting.".to_string());
                };
                let request = Request::StoreResponse {
                    coder: self.coder.clone(),
                    folder: sample.folder.clone(),
                    number: sample.number,
                    choice: sample.layout().choice_for(slot),
                };
                self.issue(request)
            }

            Action::Previous => match &self.current {
                Some(sample) if sample.number > 1 => {
                    let request = Request::Previous {
                        coder: self.coder.clone(),
                        number: sample.number,
                    };
                    self.issue(request)
                }
                _ => Effect::None,
            },

            Action::Next => match &self.current {
                Some(sample) => {
                    let request = Request::Next {
                        coder: self.coder.clone(),
                        number: sample.number,
                    };
                    self.issue(request)
                }
                None => Effect::None,
            },

            Action::JumpInput(text) => {
                self.jump_input = text;
                Effect::None
            }

            Action::Jump => match self.validate_jump() {
                Ok(number) => self.issue(Request::Sample { coder: self.coder.clone(), number }),
                Err(message) => Effect::Alert(message),
            },

            Action::Replied { ticket, outcome } => {
                self.receive(ticket, outcome);
                Effect::None
            }
        }
    }

    /// Check the jump box: numeric and within `1..=sample_count`
    fn validate_jump(&self) -> Result<u32, String> {
        let text = self.jump_input.trim();
        let number: i64 = text
            .parse()
            .map_err(|_| format!("\"{text}\" is not a sample number."))?;

        if number < 1 || number > i64::from(self.sample_count) {
            return Err(format!(
                "Sample number must be between 1 and {}.",
                self.sample_count
            ));
        }

        // In range of 1..=u32::MAX by the check above
        Ok(number as u32)
    }

    /// Hand out a ticket unless one is already outstanding
    fn issue(&mut self, request: Request) -> Effect {
        if let Some(id) = self.in_flight {
            debug!("⏳ Request #{} still in flight, dropping {:?}", id, request);
            return Effect::None;
        }

        let id = self.next_ticket;
        self.next_ticket += 1;
        self.in_flight = Some(id);

        Effect::Send(Ticket { id, request })
    }

    fn receive(&mut self, ticket: u64, outcome: Result<Reply, ApiError>) {
        if self.in_flight != Some(ticket) {
            debug!("Ignoring reply for stale ticket #{}", ticket);
            return;
        }
        self.in_flight = None;

        match outcome {
            Ok(Reply::Sample(sample)) => self.show(sample),
            Ok(Reply::AllDone) => {
                info!("🎉 All samples rated for {}", self.coder);
                self.all_done = true;
                self.pending = None;
            }
            Ok(Reply::NoPrevious) => {
                debug!("No previous sample, staying put");
            }
            Err(e) => {
                warn!("⚠️  Request #{} dropped: {}", ticket, e);
            }
        }
    }

    /// Render a sample: replaces what is on screen and clears the pick
    /// so it cannot be submitted against the new sample.
    fn show(&mut self, sample: Sample) {
        info!("🖼️  Showing sample {} ({})", sample.number, sample.folder);
        self.current = Some(sample);
        self.pending = None;
        self.all_done = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::{Choice, SlotOrder};

    fn sample(folder: &str, number: u32, order: SlotOrder) -> Sample {
        Sample { folder: folder.to_string(), number, order }
    }

    fn ticket_of(effect: Effect) -> Ticket {
        match effect {
            Effect::Send(ticket) => ticket,
            other => panic!("expected a request, got {other:?}"),
        }
    }

    /// A session already showing `current`, with no request in flight
    fn showing(current: Sample) -> Session {
        let mut session = Session::new("hossam", DEFAULT_SAMPLE_COUNT);
        let ticket = ticket_of(session.apply(Action::Start));
        session.apply(Action::Replied {
            ticket: ticket.id,
            outcome: Ok(Reply::Sample(current)),
        });
        assert!(!session.is_busy());
        session
    }

    #[test]
    fn test_start_requests_current_sample() {
        let mut session = Session::new("hossam", DEFAULT_SAMPLE_COUNT);
        let ticket = ticket_of(session.apply(Action::Start));
        assert_eq!(ticket.request, Request::Current { coder: "hossam".to_string() });
        assert!(session.is_busy());
    }

    #[test]
    fn test_inverted_sample_scenario() {
        let session = showing(sample("s12", 5, SlotOrder::from_flag("I")));
        let current = session.current().unwrap();
        assert_eq!(current.label(), "Sample 5");
        assert_eq!(current.layout().choice_for(Slot::TopLeft), Choice::B);
        assert_eq!(current.layout().choice_for(Slot::TopRight), Choice::A);
        assert_eq!(current.layout().choice_for(Slot::Reference), Choice::C);
    }

    #[test]
    fn test_submit_maps_pick_through_order() {
        let cases = [
            (SlotOrder::Normal, Slot::TopLeft, Choice::A),
            (SlotOrder::Normal, Slot::TopRight, Choice::B),
            (SlotOrder::Inverted, Slot::TopLeft, Choice::B),
            (SlotOrder::Inverted, Slot::TopRight, Choice::A),
            (SlotOrder::Inverted, Slot::Reference, Choice::C),
        ];
        for (order, slot, expected) in cases {
            let mut session = showing(sample("s12", 5, order));
            session.apply(Action::Pick(slot));
            let ticket = ticket_of(session.apply(Action::Submit));
            assert_eq!(
                ticket.request,
                Request::StoreResponse {
                    coder: "hossam".to_string(),
                    folder: "s12".to_string(),
                    number: 5,
                    choice: expected,
                }
            );
        }
    }

    #[test]
    fn test_submit_without_pick_alerts() {
        let mut session = showing(sample("s12", 5, SlotOrder::Normal));
        assert!(matches!(session.apply(Action::Submit), Effect::Alert(_)));
        assert!(!session.is_busy());
    }

    #[test]
    fn test_new_sample_clears_pick() {
        let mut session = showing(sample("s12", 5, SlotOrder::Normal));
        session.apply(Action::Pick(Slot::TopLeft));
        let ticket = ticket_of(session.apply(Action::Submit));
        session.apply(Action::Replied {
            ticket: ticket.id,
            outcome: Ok(Reply::Sample(sample("s13", 6, SlotOrder::Inverted))),
        });

        assert_eq!(session.pending(), None);
        assert_eq!(session.current().unwrap().number, 6);
        assert!(matches!(session.apply(Action::Submit), Effect::Alert(_)));
    }

    #[test]
    fn test_previous_is_noop_on_first_sample() {
        let mut session = showing(sample("s1", 1, SlotOrder::Normal));
        assert_eq!(session.apply(Action::Previous), Effect::None);
        assert!(!session.is_busy());
    }

    #[test]
    fn test_previous_and_next_carry_current_number() {
        let mut session = showing(sample("s9", 9, SlotOrder::Normal));
        let ticket = ticket_of(session.apply(Action::Previous));
        assert_eq!(ticket.request, Request::Previous { coder: "hossam".to_string(), number: 9 });
        session.apply(Action::Replied { ticket: ticket.id, outcome: Ok(Reply::NoPrevious) });

        let ticket = ticket_of(session.apply(Action::Next));
        assert_eq!(ticket.request, Request::Next { coder: "hossam".to_string(), number: 9 });
    }

    #[test]
    fn test_no_previous_sentinel_keeps_screen() {
        let mut session = showing(sample("s9", 9, SlotOrder::Normal));
        session.apply(Action::Pick(Slot::TopRight));
        let ticket = ticket_of(session.apply(Action::Previous));
        session.apply(Action::Replied { ticket: ticket.id, outcome: Ok(Reply::NoPrevious) });

        assert_eq!(session.current().unwrap().number, 9);
        assert_eq!(session.pending(), Some(Slot::TopRight));
        assert!(!session.is_busy());
    }

    #[test]
    fn test_jump_rejects_out_of_range_and_garbage() {
        for input in ["0", "88", "abc", "", "-3", "4.5"] {
            let mut session = showing(sample("s9", 9, SlotOrder::Normal));
            session.apply(Action::JumpInput(input.to_string()));
            assert!(
                matches!(session.apply(Action::Jump), Effect::Alert(_)),
                "input {input:?} should alert"
            );
            assert!(!session.is_busy(), "input {input:?} should not send");
        }
    }

    #[test]
    fn test_jump_accepts_bounds() {
        for (input, number) in [("1", 1), (" 87 ", 87), ("42", 42)] {
            let mut session = showing(sample("s9", 9, SlotOrder::Normal));
            session.apply(Action::JumpInput(input.to_string()));
            let ticket = ticket_of(session.apply(Action::Jump));
            assert_eq!(ticket.request, Request::Sample { coder: "hossam".to_string(), number });
        }
    }

    #[test]
    fn test_all_done_shows_banner_from_any_action() {
        let triggers = [Action::Submit, Action::Previous, Action::Next, Action::Jump];
        for trigger in triggers {
            let mut session = showing(sample("s9", 9, SlotOrder::Normal));
            session.apply(Action::Pick(Slot::TopLeft));
            session.apply(Action::JumpInput("10".to_string()));
            let ticket = ticket_of(session.apply(trigger.clone()));
            session.apply(Action::Replied { ticket: ticket.id, outcome: Ok(Reply::AllDone) });
            assert!(session.all_done(), "banner missing after {trigger:?}");
        }

        let mut session = Session::new("hossam", DEFAULT_SAMPLE_COUNT);
        let ticket = ticket_of(session.apply(Action::Start));
        session.apply(Action::Replied { ticket: ticket.id, outcome: Ok(Reply::AllDone) });
        assert!(session.all_done());
        assert!(session.current().is_none());
    }

    #[test]
    fn test_sample_after_all_done_hides_banner() {
        let mut session = showing(sample("s87", 87, SlotOrder::Normal));
        session.apply(Action::Pick(Slot::TopLeft));
        let ticket = ticket_of(session.apply(Action::Submit));
        session.apply(Action::Replied { ticket: ticket.id, outcome: Ok(Reply::AllDone) });
        assert!(session.all_done());

        let ticket = ticket_of(session.apply(Action::Previous));
        session.apply(Action::Replied {
            ticket: ticket.id,
            outcome: Ok(Reply::Sample(sample("s86", 86, SlotOrder::Inverted))),
        });
        assert!(!session.all_done());
    }

    #[test]
    fn test_second_request_dropped_while_in_flight() {
        let mut session = showing(sample("s9", 9, SlotOrder::Normal));
        let first = ticket_of(session.apply(Action::Next));
        assert_eq!(session.apply(Action::Next), Effect::None);
        assert_eq!(session.apply(Action::Previous), Effect::None);

        session.apply(Action::Replied {
            ticket: first.id,
            outcome: Ok(Reply::Sample(sample("s10", 10, SlotOrder::Normal))),
        });
        let second = ticket_of(session.apply(Action::Next));
        assert!(second.id > first.id);
    }

    #[test]
    fn test_validation_alerts_even_while_busy() {
        let mut session = showing(sample("s9", 9, SlotOrder::Normal));
        ticket_of(session.apply(Action::Next));
        session.apply(Action::JumpInput("500".to_string()));
        assert!(matches!(session.apply(Action::Jump), Effect::Alert(_)));
    }

    #[test]
    fn test_stale_ticket_is_ignored() {
        let mut session = showing(sample("s9", 9, SlotOrder::Normal));
        let ticket = ticket_of(session.apply(Action::Next));

        session.apply(Action::Replied {
            ticket: ticket.id + 100,
            outcome: Ok(Reply::Sample(sample("s50", 50, SlotOrder::Normal))),
        });
        assert_eq!(session.current().unwrap().number, 9);
        assert!(session.is_busy());
    }

    #[test]
    fn test_failed_request_leaves_screen_stale() {
        let mut session = showing(sample("s9", 9, SlotOrder::Normal));
        let ticket = ticket_of(session.apply(Action::Next));
        session.apply(Action::Replied {
            ticket: ticket.id,
            outcome: Err(ApiError::Status(500)),
        });

        assert_eq!(session.current().unwrap().number, 9);
        assert!(!session.is_busy());
    }

    #[test]
    fn test_actions_before_first_sample_do_nothing() {
        let mut session = Session::new("hossam", DEFAULT_SAMPLE_COUNT);
        session.apply(Action::Pick(Slot::TopLeft));
        assert_eq!(session.pending(), None);
        assert_eq!(session.apply(Action::Submit), Effect::None);
        assert_eq!(session.apply(Action::Previous), Effect::None);
        assert_eq!(session.apply(Action::Next), Effect::None);
    }
}
