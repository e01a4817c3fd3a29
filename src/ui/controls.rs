use iced::widget::{button, row, text, text_input};
use iced::{Alignment, Element, Length};

use crate::state::session::Session;
use crate::Message;

/// Navigation row: previous / submit / next, plus the jump box
///
/// Buttons stay enabled while a request is in flight; the session decides
/// whether a press turns into a request.
pub fn view(session: &Session) -> Element<'_, Message> {
    let jump = text_input("Sample #", session.jump_input())
        .on_input(Message::JumpInput)
        .on_submit(Message::Jump)
        .width(Length::Fixed(110.0))
        .padding(8);

    row![
        button("◀ Previous").on_press(Message::Previous).padding(10),
        button("Submit")
            .on_press(Message::Submit)
            .style(button::success)
            .padding(10),
        button("Next ▶").on_press(Message::Next).padding(10),
        jump,
        text(format!("/ {}", session.sample_count())).size(16),
        button("Go").on_press(Message::Jump).padding(10),
    ]
    .spacing(12)
    .align_y(Alignment::Center)
    .into()
}
